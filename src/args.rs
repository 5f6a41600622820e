use clap::{Parser, Subcommand};

use crate::contract::DEV_INSPECT_SENDER;
use crate::rpc::Network;
use crate::utils::env_var;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// Fullnode network to query.
    #[arg(long, value_enum, default_value_t = Network::Mainnet)]
    pub network: Network,

    /// Explicit RPC endpoint; overrides --network and SUI_LENS_RPC_URL.
    #[arg(long, value_name = "URL")]
    pub rpc_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch a transaction and show the detailed breakdown.
    Tx {
        digest: String,
        /// Emit the parsed record as JSON instead of formatted text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Show the four-stage journey view of a transaction.
    Journey { digest: String },
    /// List the read-only functions a package exposes.
    Inspect { package: String },
    /// Run a read-only function via dev-inspect and decode its returns.
    Call {
        package: String,
        module: String,
        function: String,
        /// Positional call argument; repeat once per parameter.
        #[arg(long = "arg", value_name = "VALUE")]
        args: Vec<String>,
        /// Sender address for the simulation (not signature-checked).
        #[arg(long, default_value = DEV_INSPECT_SENDER)]
        sender: String,
    },
    /// Look up a token logo and market data, using the on-disk cache.
    Logo { symbol: String },
}

impl Args {
    /// Endpoint precedence: --rpc-url, then SUI_LENS_RPC_URL, then the
    /// selected network's fullnode.
    pub fn endpoint(&self) -> String {
        self.rpc_url
            .clone()
            .or_else(|| env_var("SUI_LENS_RPC_URL"))
            .unwrap_or_else(|| self.network.fullnode_url().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_precedence() {
        let args = Args::parse_from(["sui-lens", "--network", "testnet", "tx", "D1"]);
        assert_eq!(args.endpoint(), "https://fullnode.testnet.sui.io:443");

        let args = Args::parse_from([
            "sui-lens",
            "--rpc-url",
            "http://localhost:9000",
            "tx",
            "D1",
        ]);
        assert_eq!(args.endpoint(), "http://localhost:9000");
    }

    #[test]
    fn test_call_args_repeat() {
        let args = Args::parse_from([
            "sui-lens", "call", "0x2", "registry", "lookup", "--arg", "0x5", "--arg", "42",
        ]);
        match args.command {
            Command::Call { args, sender, .. } => {
                assert_eq!(args, vec!["0x5", "42"]);
                assert_eq!(sender, DEV_INSPECT_SENDER);
            }
            _ => panic!("expected call command"),
        }
    }
}
