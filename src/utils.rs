use std::str::FromStr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

// =============================================================================
// Address Utilities
// =============================================================================
// Canonical address display functions. There are two deliberately distinct
// shortening rules: `shorten_address` (type formatter, tight "0x1234...abcd"
// form) and `shorten_id` (transaction views, wider "0x12345678..12345678"
// form). Keep them separate; display output depends on both verbatim.

/// Shorten an address for display (`0x1234...5678`).
///
/// Only shortens when the input is longer than `2 * chars + 4` characters.
pub fn shorten_address(addr: &str, chars: usize) -> String {
    if addr.len() <= chars * 2 + 4 {
        return addr.to_string();
    }
    format!("{}...{}", &addr[..chars + 2], &addr[addr.len() - chars..])
}

/// Shorten an object id / owner address for transaction views.
///
/// Addresses of 20 characters or fewer pass through unchanged.
pub fn shorten_id(addr: &str) -> String {
    if addr.len() <= 20 {
        return addr.to_string();
    }
    format!("{}...{}", &addr[..10], &addr[addr.len() - 8..])
}

/// `shorten_id` over an optional address; absent values render as `N/A`.
pub fn shorten_id_opt(addr: Option<&str>) -> String {
    match addr {
        Some(a) => shorten_id(a),
        None => "N/A".to_string(),
    }
}

/// Parse a 32-byte hex address (short or long form) into raw bytes.
pub fn parse_address_bytes(addr: &str) -> Option<[u8; 32]> {
    let s = addr.trim();
    let hex_str = s.strip_prefix("0x").unwrap_or(s);
    if hex_str.is_empty() || hex_str.len() > 64 {
        return None;
    }
    if !hex_str.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let padded = format!("{:0>64}", hex_str);
    let raw = hex::decode(padded).ok()?;
    let mut out = [0u8; 32];
    out.copy_from_slice(&raw);
    Some(out)
}

// =============================================================================
// Time
// =============================================================================

pub fn now_unix_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| Duration::from_secs(0))
        .as_millis() as u64
}

// =============================================================================
// Environment
// =============================================================================

/// Parse an environment variable into a type that implements `FromStr`.
///
/// Returns `None` if the variable is not set or cannot be parsed.
pub fn env_var<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

/// Parse an environment variable with a default value.
pub fn env_var_or<T: FromStr>(key: &str, default: T) -> T {
    env_var(key).unwrap_or(default)
}
