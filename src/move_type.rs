//! Move normalized type tree and display formatting.
//!
//! The RPC boundary delivers function signatures as a recursive tagged union
//! (`SuiMoveNormalizedType` in JSON form: primitives as bare strings, the
//! rest externally tagged). `MoveType` models that union as a closed enum so
//! the formatter and decoder can match exhaustively instead of probing
//! properties. All queries here are total: unrecognized shapes fall through
//! to `Unknown` / `InputKind::Object`, never an error.

use serde::Serialize;
use serde_json::Value;

use crate::utils::shorten_address;

/// A move normalized type tree node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum MoveType {
    Bool,
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
    Address,
    Signer,
    Struct {
        address: String,
        module: String,
        name: String,
        #[serde(rename = "typeArguments")]
        type_arguments: Vec<MoveType>,
    },
    Vector(Box<MoveType>),
    Reference(Box<MoveType>),
    MutableReference(Box<MoveType>),
    TypeParameter(u16),
    /// Shape not recognized at the boundary; formats as "Unknown".
    Unknown,
}

/// Which input widget a call argument should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Address,
    U64,
    String,
    Bool,
    Object,
}

impl MoveType {
    /// Build a type tree from the raw JSON a normalized-module RPC response
    /// carries. Tolerant: anything unrecognized becomes `Unknown`.
    pub fn from_value(value: &Value) -> MoveType {
        if let Some(name) = value.as_str() {
            return match name {
                "Bool" => MoveType::Bool,
                "U8" => MoveType::U8,
                "U16" => MoveType::U16,
                "U32" => MoveType::U32,
                "U64" => MoveType::U64,
                "U128" => MoveType::U128,
                "U256" => MoveType::U256,
                "Address" => MoveType::Address,
                "Signer" => MoveType::Signer,
                _ => MoveType::Unknown,
            };
        }

        let Some(obj) = value.as_object() else {
            return MoveType::Unknown;
        };

        if let Some(s) = obj.get("Struct").and_then(Value::as_object) {
            let field = |key: &str| {
                s.get(key)
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string()
            };
            let type_arguments = s
                .get("typeArguments")
                .and_then(Value::as_array)
                .map(|args| args.iter().map(MoveType::from_value).collect())
                .unwrap_or_default();
            return MoveType::Struct {
                address: field("address"),
                module: field("module"),
                name: field("name"),
                type_arguments,
            };
        }
        if let Some(inner) = obj.get("Vector") {
            return MoveType::Vector(Box::new(MoveType::from_value(inner)));
        }
        if let Some(inner) = obj.get("Reference") {
            return MoveType::Reference(Box::new(MoveType::from_value(inner)));
        }
        if let Some(inner) = obj.get("MutableReference") {
            return MoveType::MutableReference(Box::new(MoveType::from_value(inner)));
        }
        if let Some(idx) = obj.get("TypeParameter").and_then(Value::as_u64) {
            return MoveType::TypeParameter(idx as u16);
        }

        MoveType::Unknown
    }

    /// Fully-qualified `address::module::name` of a struct node, empty for
    /// anything else.
    fn struct_path(&self) -> Option<String> {
        match self {
            MoveType::Struct {
                address,
                module,
                name,
                ..
            } => Some(format!("{}::{}::{}", address, module, name)),
            _ => None,
        }
    }
}

/// Render a type tree in canonical form (`address::module::name<args>`).
pub fn format_move_type(ty: &MoveType) -> String {
    format_with(ty, &|addr| addr.to_string())
}

/// Render a type tree with struct addresses shortened for display.
pub fn format_move_type_short(ty: &MoveType) -> String {
    format_with(ty, &|addr| shorten_address(addr, 4))
}

fn format_with(ty: &MoveType, addr_fmt: &dyn Fn(&str) -> String) -> String {
    match ty {
        MoveType::Bool => "Bool".to_string(),
        MoveType::U8 => "U8".to_string(),
        MoveType::U16 => "U16".to_string(),
        MoveType::U32 => "U32".to_string(),
        MoveType::U64 => "U64".to_string(),
        MoveType::U128 => "U128".to_string(),
        MoveType::U256 => "U256".to_string(),
        MoveType::Address => "Address".to_string(),
        MoveType::Signer => "Signer".to_string(),
        MoveType::Struct {
            address,
            module,
            name,
            type_arguments,
        } => {
            let args = if type_arguments.is_empty() {
                String::new()
            } else {
                let inner: Vec<String> = type_arguments
                    .iter()
                    .map(|t| format_with(t, addr_fmt))
                    .collect();
                format!("<{}>", inner.join(", "))
            };
            format!("{}::{}::{}{}", addr_fmt(address), module, name, args)
        }
        MoveType::Vector(inner) => format!("Vector<{}>", format_with(inner, addr_fmt)),
        MoveType::Reference(inner) => format!("&{}", format_with(inner, addr_fmt)),
        MoveType::MutableReference(inner) => {
            format!("&mut {}", format_with(inner, addr_fmt))
        }
        MoveType::TypeParameter(idx) => format!("T{}", idx),
        MoveType::Unknown => "Unknown".to_string(),
    }
}

/// True for parameters the runtime supplies itself (`Signer`, `TxContext`);
/// these are filtered out before building an interactive call form.
pub fn is_system_type(ty: &MoveType) -> bool {
    let formatted = format_move_type(ty);
    formatted == "Signer" || formatted.contains("tx_context::TxContext")
}

/// True when an argument must be passed as an object reference rather than a
/// pure value: a `&T` / `&mut T` whose resolved inner type is an address or
/// a struct. Recurses through nested references.
pub fn is_object_reference(ty: &MoveType) -> bool {
    match ty {
        MoveType::Reference(inner) | MoveType::MutableReference(inner) => match inner.as_ref() {
            MoveType::Address => true,
            MoveType::Struct { .. } => true,
            MoveType::Reference(_) | MoveType::MutableReference(_) => is_object_reference(inner),
            _ => false,
        },
        _ => false,
    }
}

/// Classify a parameter type into an input widget kind. Defaults to
/// `Object` for anything opaque or unsupported.
pub fn input_kind(ty: &MoveType) -> InputKind {
    match ty {
        MoveType::Address => return InputKind::Address,
        MoveType::U8 | MoveType::U16 | MoveType::U32 | MoveType::U64 | MoveType::U128
        | MoveType::U256 => return InputKind::U64,
        MoveType::Bool => return InputKind::Bool,
        _ => {}
    }
    if let MoveType::Struct { module, name, .. } = ty {
        if let Some(full) = ty.struct_path() {
            if full.contains("object::ID") || full.contains("id::ID") || name == "ID" {
                return InputKind::Address;
            }
        }
        if (module == "ascii" || module == "string") && name == "String" {
            return InputKind::String;
        }
    }
    if let MoveType::Vector(inner) = ty {
        // A byte vector is entered as text
        if **inner == MoveType::U8 {
            return InputKind::String;
        }
    }
    InputKind::Object
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sui_struct() -> MoveType {
        MoveType::Struct {
            address: "0x2".to_string(),
            module: "sui".to_string(),
            name: "SUI".to_string(),
            type_arguments: vec![],
        }
    }

    #[test]
    fn test_format_struct_round_trip() {
        assert_eq!(format_move_type(&sui_struct()), "0x2::sui::SUI");
        // Address is already short, so the short form is identical
        assert_eq!(format_move_type_short(&sui_struct()), "0x2::sui::SUI");
    }

    #[test]
    fn test_format_short_compresses_long_addresses() {
        let ty = MoveType::Struct {
            address: "0x5d4b302506645c37ff133b98c4b50a5ae14841659738d6d733d59d0d217a93bf"
                .to_string(),
            module: "coin".to_string(),
            name: "COIN".to_string(),
            type_arguments: vec![],
        };
        assert_eq!(format_move_type_short(&ty), "0x5d4b...93bf::coin::COIN");
        // Canonical form keeps the full address and structure
        assert!(format_move_type(&ty).ends_with("::coin::COIN"));
    }

    #[test]
    fn test_format_nested() {
        let ty = MoveType::Reference(Box::new(MoveType::Struct {
            address: "0x2".to_string(),
            module: "coin".to_string(),
            name: "Coin".to_string(),
            type_arguments: vec![sui_struct()],
        }));
        assert_eq!(format_move_type(&ty), "&0x2::coin::Coin<0x2::sui::SUI>");

        let ty = MoveType::MutableReference(Box::new(MoveType::Vector(Box::new(MoveType::U8))));
        assert_eq!(format_move_type(&ty), "&mut Vector<U8>");

        assert_eq!(format_move_type(&MoveType::TypeParameter(1)), "T1");
    }

    #[test]
    fn test_from_value() {
        assert_eq!(MoveType::from_value(&json!("U64")), MoveType::U64);
        assert_eq!(
            MoveType::from_value(&json!({"Vector": "U8"})),
            MoveType::Vector(Box::new(MoveType::U8))
        );
        assert_eq!(
            MoveType::from_value(&json!({
                "Struct": {
                    "address": "0x2",
                    "module": "sui",
                    "name": "SUI",
                    "typeArguments": []
                }
            })),
            sui_struct()
        );
        assert_eq!(
            MoveType::from_value(&json!({"TypeParameter": 3})),
            MoveType::TypeParameter(3)
        );
        // Unrecognized shapes degrade instead of failing
        assert_eq!(MoveType::from_value(&json!("Weird")), MoveType::Unknown);
        assert_eq!(MoveType::from_value(&json!(42)), MoveType::Unknown);
    }

    #[test]
    fn test_is_system_type() {
        assert!(is_system_type(&MoveType::Signer));
        let ctx = MoveType::MutableReference(Box::new(MoveType::Struct {
            address: "0x2".to_string(),
            module: "tx_context".to_string(),
            name: "TxContext".to_string(),
            type_arguments: vec![],
        }));
        assert!(is_system_type(&ctx));
        assert!(!is_system_type(&MoveType::U64));
    }

    #[test]
    fn test_is_object_reference() {
        assert!(is_object_reference(&MoveType::Reference(Box::new(
            sui_struct()
        ))));
        assert!(is_object_reference(&MoveType::MutableReference(Box::new(
            MoveType::Address
        ))));
        // Nested references resolve through
        assert!(is_object_reference(&MoveType::Reference(Box::new(
            MoveType::Reference(Box::new(sui_struct()))
        ))));
        assert!(!is_object_reference(&MoveType::Reference(Box::new(
            MoveType::U64
        ))));
        assert!(!is_object_reference(&sui_struct()));
    }

    #[test]
    fn test_input_kind() {
        assert_eq!(input_kind(&MoveType::Address), InputKind::Address);
        assert_eq!(input_kind(&MoveType::U8), InputKind::U64);
        assert_eq!(input_kind(&MoveType::U256), InputKind::U64);
        assert_eq!(input_kind(&MoveType::Bool), InputKind::Bool);
        assert_eq!(
            input_kind(&MoveType::Vector(Box::new(MoveType::U8))),
            InputKind::String
        );

        let id_ty = MoveType::Struct {
            address: "0x2".to_string(),
            module: "object".to_string(),
            name: "ID".to_string(),
            type_arguments: vec![],
        };
        assert_eq!(input_kind(&id_ty), InputKind::Address);

        let str_ty = MoveType::Struct {
            address: "0x1".to_string(),
            module: "string".to_string(),
            name: "String".to_string(),
            type_arguments: vec![],
        };
        assert_eq!(input_kind(&str_ty), InputKind::String);

        // Everything else is an opaque object
        assert_eq!(input_kind(&sui_struct()), InputKind::Object);
        assert_eq!(input_kind(&MoveType::Unknown), InputKind::Object);
    }
}
