//! Type-directed decoding of BCS-encoded return values.
//!
//! Dev-inspect results arrive as `[bytes, typeName]` tuples where `bytes` is
//! either a JSON byte array or a base64 string. The declared type name from
//! the wire takes precedence over the statically-known return type when it
//! is recognized. Decoding is total: shapes without a schema render a raw
//! byte preview, and any decode error renders a literal failure marker.

use base64::Engine;
use serde_json::Value;

use crate::move_type::{format_move_type, MoveType};

/// Resolved BCS deserialization schema for a type-tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BcsSchema {
    Bool,
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
    Address,
    ByteVector,
    Utf8String,
}

/// Map a type node to a decoding schema. Primitives and a handful of
/// well-known structs only; everything else has no schema (not an error).
fn schema_for(ty: &MoveType) -> Option<BcsSchema> {
    match ty {
        MoveType::Bool => Some(BcsSchema::Bool),
        MoveType::U8 => Some(BcsSchema::U8),
        MoveType::U16 => Some(BcsSchema::U16),
        MoveType::U32 => Some(BcsSchema::U32),
        MoveType::U64 => Some(BcsSchema::U64),
        MoveType::U128 => Some(BcsSchema::U128),
        MoveType::U256 => Some(BcsSchema::U256),
        MoveType::Address => Some(BcsSchema::Address),
        MoveType::Vector(inner) => {
            if **inner == MoveType::U8 {
                Some(BcsSchema::ByteVector)
            } else {
                None
            }
        }
        MoveType::Struct {
            address,
            module,
            name,
            ..
        } => {
            let full = format!("{}::{}::{}", address, module, name);
            if full.contains("object::ID") || full.contains("id::ID") || name == "ID" {
                return Some(BcsSchema::Address);
            }
            if address == "0x1" && (module == "ascii" || module == "string") && name == "String" {
                return Some(BcsSchema::Utf8String);
            }
            None
        }
        _ => None,
    }
}

/// Render up to the first 8 raw bytes with an ellipsis marker if truncated.
fn raw_byte_preview(bytes: &[u8]) -> String {
    let shown: Vec<String> = bytes.iter().take(8).map(|b| b.to_string()).collect();
    let ellipsis = if bytes.len() > 8 { "..." } else { "" };
    format!("(raw bytes: [{}{}])", shown.join(", "), ellipsis)
}

/// Convert a little-endian 32-byte integer to a base-10 string.
fn u256_le_to_decimal(le: &[u8; 32]) -> String {
    let mut be: Vec<u8> = le.iter().rev().copied().collect();
    let mut digits: Vec<char> = Vec::new();
    while be.iter().any(|&b| b != 0) {
        let mut rem: u32 = 0;
        for b in be.iter_mut() {
            let cur = (rem << 8) | u32::from(*b);
            *b = (cur / 10) as u8;
            rem = cur % 10;
        }
        digits.push(char::from(b'0' + rem as u8));
    }
    if digits.is_empty() {
        return "0".to_string();
    }
    digits.iter().rev().collect()
}

/// Decode BCS bytes into a display string, directed by the declared type.
pub fn decode_return_value(bytes: &[u8], ty: &MoveType) -> String {
    let Some(schema) = schema_for(ty) else {
        return raw_byte_preview(bytes);
    };

    let decoded = match schema {
        BcsSchema::Bool => bcs::from_bytes::<bool>(bytes).map(|v| v.to_string()),
        BcsSchema::U8 => bcs::from_bytes::<u8>(bytes).map(|v| v.to_string()),
        BcsSchema::U16 => bcs::from_bytes::<u16>(bytes).map(|v| v.to_string()),
        BcsSchema::U32 => bcs::from_bytes::<u32>(bytes).map(|v| v.to_string()),
        BcsSchema::U64 => bcs::from_bytes::<u64>(bytes).map(|v| v.to_string()),
        BcsSchema::U128 => bcs::from_bytes::<u128>(bytes).map(|v| v.to_string()),
        BcsSchema::U256 => bcs::from_bytes::<[u8; 32]>(bytes).map(|v| u256_le_to_decimal(&v)),
        BcsSchema::Address => {
            bcs::from_bytes::<[u8; 32]>(bytes).map(|v| format!("0x{}", hex::encode(v)))
        }
        BcsSchema::ByteVector => bcs::from_bytes::<Vec<u8>>(bytes).map(|v| {
            // Byte vectors are usually text; fall back to a comma-joined list
            match String::from_utf8(v.clone()) {
                Ok(s) => s,
                Err(_) => v
                    .iter()
                    .map(|b| b.to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            }
        }),
        BcsSchema::Utf8String => bcs::from_bytes::<String>(bytes),
    };

    match decoded {
        Ok(s) => s,
        Err(_) => "(decode failed)".to_string(),
    }
}

/// Map an API-reported type name (e.g. `"u64"`, `"vector<u8>"`) to a type
/// node. Unrecognized names fall back to the statically-declared type.
fn type_from_api_name(name: &str) -> Option<MoveType> {
    match name.trim().to_ascii_lowercase().as_str() {
        "bool" => Some(MoveType::Bool),
        "u8" => Some(MoveType::U8),
        "u16" => Some(MoveType::U16),
        "u32" => Some(MoveType::U32),
        "u64" => Some(MoveType::U64),
        "u128" => Some(MoveType::U128),
        "u256" => Some(MoveType::U256),
        "address" => Some(MoveType::Address),
        "vector<u8>" | "vector" => Some(MoveType::Vector(Box::new(MoveType::U8))),
        _ => None,
    }
}

/// Normalize one `[byteArray | base64String, typeName]` tuple to bytes plus
/// the effective decode type.
fn parse_return_tuple(tuple: &Value, fallback: &MoveType) -> (Option<Vec<u8>>, MoveType) {
    let Some(parts) = tuple.as_array() else {
        return (None, fallback.clone());
    };
    if parts.len() < 2 {
        return (None, fallback.clone());
    }

    let ty = parts[1]
        .as_str()
        .and_then(type_from_api_name)
        .unwrap_or_else(|| fallback.clone());

    if let Some(arr) = parts[0].as_array() {
        let bytes: Option<Vec<u8>> = arr
            .iter()
            .map(|v| v.as_u64().filter(|&n| n <= 255).map(|n| n as u8))
            .collect();
        return (bytes, ty);
    }

    if let Some(s) = parts[0].as_str() {
        let bytes = base64::engine::general_purpose::STANDARD.decode(s).ok();
        return (bytes, ty);
    }

    (None, fallback.clone())
}

/// Decode an ordered list of return-value tuples into one labeled line per
/// tuple. Positions beyond the declared return types fall back to `U64`.
pub fn decode_dev_inspect_return_values(
    return_values: &[Value],
    return_types: &[MoveType],
) -> Vec<String> {
    let mut results = Vec::with_capacity(return_values.len());
    for (idx, tuple) in return_values.iter().enumerate() {
        let fallback = return_types.get(idx).cloned().unwrap_or(MoveType::U64);
        let (bytes, ty) = parse_return_tuple(tuple, &fallback);

        let Some(bytes) = bytes.filter(|b| !b.is_empty()) else {
            results.push(format!("Return {}: (no data)", idx + 1));
            continue;
        };

        let decoded = decode_return_value(&bytes, &ty);
        results.push(format!(
            "Return {} ({}): {}",
            idx + 1,
            format_move_type(&ty),
            decoded
        ));
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_u64_exact() {
        let value: u64 = 10035409013204225264;
        let bytes = value.to_le_bytes();
        assert_eq!(
            decode_return_value(&bytes, &MoveType::U64),
            "10035409013204225264"
        );
    }

    #[test]
    fn test_decode_primitives() {
        assert_eq!(decode_return_value(&[1], &MoveType::Bool), "true");
        assert_eq!(decode_return_value(&[0], &MoveType::Bool), "false");
        assert_eq!(decode_return_value(&[42], &MoveType::U8), "42");
        assert_eq!(
            decode_return_value(&1000u16.to_le_bytes(), &MoveType::U16),
            "1000"
        );
        assert_eq!(
            decode_return_value(&u128::MAX.to_le_bytes(), &MoveType::U128),
            u128::MAX.to_string()
        );
    }

    #[test]
    fn test_decode_u256() {
        let mut bytes = [0u8; 32];
        bytes[..16].copy_from_slice(&u128::MAX.to_le_bytes());
        assert_eq!(
            decode_return_value(&bytes, &MoveType::U256),
            u128::MAX.to_string()
        );

        let zero = [0u8; 32];
        assert_eq!(decode_return_value(&zero, &MoveType::U256), "0");

        // 2^128 = u128::MAX + 1
        let mut big = [0u8; 32];
        big[16] = 1;
        assert_eq!(
            decode_return_value(&big, &MoveType::U256),
            "340282366920938463463374607431768211456"
        );
    }

    #[test]
    fn test_decode_address() {
        let mut bytes = [0u8; 32];
        bytes[31] = 2;
        let decoded = decode_return_value(&bytes, &MoveType::Address);
        assert!(decoded.starts_with("0x"));
        assert!(decoded.ends_with("02"));
        assert_eq!(decoded.len(), 66);
    }

    #[test]
    fn test_decode_byte_vector_as_text() {
        // ULEB length prefix + utf8 payload
        let mut bytes = vec![5u8];
        bytes.extend_from_slice(b"hello");
        assert_eq!(
            decode_return_value(&bytes, &MoveType::Vector(Box::new(MoveType::U8))),
            "hello"
        );

        // Invalid utf8 renders as comma-joined byte values
        let bytes = vec![2u8, 0xff, 0xfe];
        assert_eq!(
            decode_return_value(&bytes, &MoveType::Vector(Box::new(MoveType::U8))),
            "255, 254"
        );
    }

    #[test]
    fn test_unrecognized_struct_falls_back_to_preview() {
        let ty = MoveType::Struct {
            address: "0xabc".to_string(),
            module: "pool".to_string(),
            name: "Pool".to_string(),
            type_arguments: vec![],
        };
        let decoded = decode_return_value(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10], &ty);
        assert_eq!(decoded, "(raw bytes: [1, 2, 3, 4, 5, 6, 7, 8...])");

        // Short payloads omit the ellipsis
        let decoded = decode_return_value(&[1, 2, 3], &ty);
        assert_eq!(decoded, "(raw bytes: [1, 2, 3])");
    }

    #[test]
    fn test_malformed_bytes_yield_marker() {
        // 3 bytes cannot decode as u64
        assert_eq!(
            decode_return_value(&[1, 2, 3], &MoveType::U64),
            "(decode failed)"
        );
    }

    #[test]
    fn test_id_struct_decodes_as_address() {
        let ty = MoveType::Struct {
            address: "0x2".to_string(),
            module: "object".to_string(),
            name: "ID".to_string(),
            type_arguments: vec![],
        };
        let bytes = [7u8; 32];
        assert!(decode_return_value(&bytes, &ty).starts_with("0x07"));
    }

    #[test]
    fn test_batch_decoding() {
        let values = vec![
            json!([[128, 0, 0, 0, 0, 0, 0, 0], "u64"]),
            json!([[], "u64"]),
        ];
        let lines = decode_dev_inspect_return_values(&values, &[MoveType::U64, MoveType::U64]);
        assert_eq!(lines, vec!["Return 1 (U64): 128", "Return 2: (no data)"]);
    }

    #[test]
    fn test_batch_wire_type_overrides_declared() {
        // Declared bool, wire says u64 -> wire wins
        let values = vec![json!([[1, 0, 0, 0, 0, 0, 0, 0], "u64"])];
        let lines = decode_dev_inspect_return_values(&values, &[MoveType::Bool]);
        assert_eq!(lines, vec!["Return 1 (U64): 1"]);
    }

    #[test]
    fn test_batch_base64_tuple() {
        let value: u64 = 300;
        let b64 = base64::engine::general_purpose::STANDARD.encode(value.to_le_bytes());
        let values = vec![json!([b64, "u64"])];
        let lines = decode_dev_inspect_return_values(&values, &[]);
        // Fallback type past the declared list is u64
        assert_eq!(lines, vec!["Return 1 (U64): 300"]);
    }

    #[test]
    fn test_batch_unknown_wire_type_uses_declared() {
        let values = vec![json!([[1], "0x2::thing::Thing"])];
        let lines = decode_dev_inspect_return_values(&values, &[MoveType::Bool]);
        assert_eq!(lines, vec!["Return 1 (Bool): true"]);
    }
}
