//! Transaction interpretation core for a Sui explorer.
//!
//! Turns raw fullnode records into human-readable views:
//!
//! - **Parsing**: simplified and detailed projections of a transaction, with
//!   heuristic classification ([`parser`])
//! - **Type formatting**: normalized move type trees rendered for display
//!   ([`move_type`])
//! - **Return decoding**: type-directed BCS decoding of dev-inspect results
//!   ([`decode`])
//! - **Journey view**: fixed four-stage narration of a transaction
//!   ([`journey`])
//! - **Logo cache**: two-tier token logo/metadata cache over CoinGecko
//!   ([`logo_cache`], [`market`])
//! - **Contract interaction**: read-function discovery and dev-inspect
//!   execution ([`contract`], [`rpc`])

pub mod args;
pub mod contract;
pub mod decode;
pub mod journey;
pub mod logo_cache;
pub mod market;
pub mod move_type;
pub mod parser;
pub mod rpc;
pub mod types;
pub mod utils;
