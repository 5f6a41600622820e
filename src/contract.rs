//! Contract introspection and read-only call execution.
//!
//! Extracts the callable read surface of a package from its normalized
//! modules, parses user-supplied argument text into typed values, encodes a
//! single-call programmable transaction in BCS, and runs it through
//! dev-inspect. Return tuples are decoded against the declared return types.
//!
//! The BCS enums below mirror the node's transaction wire format; variant
//! order is the wire contract and must not be reordered.

use anyhow::{anyhow, bail, Context, Result};
use base64::Engine;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::decode::decode_dev_inspect_return_values;
use crate::move_type::{
    format_move_type_short, input_kind, is_object_reference, is_system_type, InputKind, MoveType,
};
use crate::rpc::{ObjectRef, RpcClient};
use crate::utils::parse_address_bytes;

// =============================================================================
// Read-function extraction
// =============================================================================

/// One user-suppliable parameter of a read function.
#[derive(Debug, Clone)]
pub struct ReadParam {
    /// Positional name (`arg0`, `arg1`, ...), indexed before system-type
    /// filtering so positions stay stable.
    pub name: String,
    pub ty: MoveType,
    pub kind: InputKind,
}

/// A public, non-entry function eligible for dev-inspect calls.
#[derive(Debug, Clone)]
pub struct ReadFunction {
    pub module: String,
    pub name: String,
    pub params: Vec<ReadParam>,
    pub return_types: Vec<MoveType>,
}

impl ReadFunction {
    /// Human-readable signature for listings.
    pub fn signature(&self) -> String {
        let params: Vec<String> = self
            .params
            .iter()
            .map(|p| format!("{}: {}", p.name, format_move_type_short(&p.ty)))
            .collect();
        let returns: Vec<String> = self
            .return_types
            .iter()
            .map(format_move_type_short)
            .collect();
        let ret = if returns.is_empty() {
            String::new()
        } else {
            format!(" -> {}", returns.join(", "))
        };
        format!("{}::{}({}){}", self.module, self.name, params.join(", "), ret)
    }
}

/// Extract read functions from a `sui_getNormalizedMoveModulesByPackage`
/// response: public non-entry functions, with runtime-supplied parameters
/// (signer, transaction context) filtered out.
pub fn read_functions(modules: &Value) -> Vec<ReadFunction> {
    let Some(modules) = modules.as_object() else {
        return Vec::new();
    };

    let mut out = Vec::new();
    for (module_name, module) in modules {
        let Some(functions) = module.get("exposedFunctions").and_then(Value::as_object) else {
            continue;
        };
        for (fn_name, func) in functions {
            let is_entry = func.get("isEntry").and_then(Value::as_bool).unwrap_or(false);
            let visibility = func.get("visibility").and_then(Value::as_str).unwrap_or("");
            if is_entry || visibility != "Public" {
                continue;
            }

            let params: Vec<ReadParam> = func
                .get("parameters")
                .and_then(Value::as_array)
                .map(|raw| {
                    raw.iter()
                        .enumerate()
                        .map(|(i, p)| (i, MoveType::from_value(p)))
                        .filter(|(_, ty)| !is_system_type(ty))
                        .map(|(i, ty)| ReadParam {
                            name: format!("arg{}", i),
                            kind: input_kind(&ty),
                            ty,
                        })
                        .collect()
                })
                .unwrap_or_default();

            let return_types: Vec<MoveType> = func
                .get("return")
                .and_then(Value::as_array)
                .map(|raw| raw.iter().map(MoveType::from_value).collect())
                .unwrap_or_default();

            out.push(ReadFunction {
                module: module_name.clone(),
                name: fn_name.clone(),
                params,
                return_types,
            });
        }
    }
    out
}

// =============================================================================
// Argument parsing and encoding
// =============================================================================

/// A parsed call argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    Bool(bool),
    U64(u64),
    /// Raw text: an address, a string payload, or an object id depending on
    /// the parameter type.
    Text(String),
}

/// Parse user text into a typed argument for the given input kind.
pub fn parse_arg(text: &str, kind: InputKind) -> Result<ArgValue> {
    match kind {
        InputKind::Bool => Ok(ArgValue::Bool(
            text.eq_ignore_ascii_case("true") || text == "1",
        )),
        InputKind::U64 => {
            if text.is_empty() {
                return Ok(ArgValue::U64(0));
            }
            text.parse::<u64>()
                .map(ArgValue::U64)
                .with_context(|| format!("invalid integer argument: {:?}", text))
        }
        _ => Ok(ArgValue::Text(text.to_string())),
    }
}

/// BCS-encode a pure (non-object) argument.
fn encode_pure(arg: &ArgValue, kind: InputKind) -> Result<Vec<u8>> {
    let bytes = match (arg, kind) {
        (ArgValue::Bool(b), _) => bcs::to_bytes(b)?,
        (ArgValue::U64(n), _) => bcs::to_bytes(n)?,
        (ArgValue::Text(s), InputKind::Address) => {
            let addr = parse_address_bytes(s)
                .ok_or_else(|| anyhow!("invalid address argument: {:?}", s))?;
            bcs::to_bytes(&addr)?
        }
        (ArgValue::Text(s), _) => bcs::to_bytes(s)?,
    };
    Ok(bytes)
}

// =============================================================================
// Transaction-kind wire format (BCS)
// =============================================================================

#[derive(Serialize)]
#[allow(dead_code)] // only referenced through TypeTag, which we never construct
struct StructTag {
    address: [u8; 32],
    module: String,
    name: String,
    type_params: Vec<TypeTag>,
}

#[derive(Serialize)]
#[allow(dead_code)] // full variant list kept so wire indices stay correct
enum TypeTag {
    Bool,
    U8,
    U64,
    U128,
    Address,
    Signer,
    Vector(Box<TypeTag>),
    Struct(Box<StructTag>),
    U16,
    U32,
    U256,
}

#[derive(Serialize)]
#[allow(dead_code)]
enum ObjectArg {
    // (object id, version, digest bytes)
    ImmOrOwnedObject(([u8; 32], u64, Vec<u8>)),
    SharedObject {
        id: [u8; 32],
        initial_shared_version: u64,
        mutable: bool,
    },
}

#[derive(Serialize)]
enum CallArg {
    Pure(Vec<u8>),
    Object(ObjectArg),
}

#[derive(Serialize)]
#[allow(dead_code)]
enum Argument {
    GasCoin,
    Input(u16),
    Result(u16),
    NestedResult(u16, u16),
}

#[derive(Serialize)]
struct ProgrammableMoveCall {
    package: [u8; 32],
    module: String,
    function: String,
    type_arguments: Vec<TypeTag>,
    arguments: Vec<Argument>,
}

#[derive(Serialize)]
enum Command {
    MoveCall(Box<ProgrammableMoveCall>),
}

#[derive(Serialize)]
struct ProgrammableTransaction {
    inputs: Vec<CallArg>,
    commands: Vec<Command>,
}

#[derive(Serialize)]
enum TransactionKind {
    ProgrammableTransaction(ProgrammableTransaction),
}

fn object_call_arg(obj: &ObjectRef, mutable: bool) -> Result<CallArg> {
    let id = parse_address_bytes(&obj.object_id)
        .ok_or_else(|| anyhow!("invalid object id: {:?}", obj.object_id))?;
    let arg = match obj.initial_shared_version {
        Some(initial_shared_version) => ObjectArg::SharedObject {
            id,
            initial_shared_version,
            mutable,
        },
        None => {
            let digest = bs58::decode(&obj.digest)
                .into_vec()
                .with_context(|| format!("invalid object digest: {:?}", obj.digest))?;
            ObjectArg::ImmOrOwnedObject((id, obj.version, digest))
        }
    };
    Ok(CallArg::Object(arg))
}

/// BCS-encode a single-call transaction kind and return it base64-encoded
/// for dev-inspect submission.
fn encode_transaction_kind(
    package: &str,
    module: &str,
    function: &str,
    inputs: Vec<CallArg>,
) -> Result<String> {
    let package = parse_address_bytes(package)
        .ok_or_else(|| anyhow!("invalid package id: {:?}", package))?;
    let arguments = (0..inputs.len()).map(|i| Argument::Input(i as u16)).collect();
    let kind = TransactionKind::ProgrammableTransaction(ProgrammableTransaction {
        inputs,
        commands: vec![Command::MoveCall(Box::new(ProgrammableMoveCall {
            package,
            module: module.to_string(),
            function: function.to_string(),
            type_arguments: Vec::new(),
            arguments,
        }))],
    });
    let bytes = bcs::to_bytes(&kind).context("encoding transaction kind")?;
    Ok(base64::engine::general_purpose::STANDARD.encode(bytes))
}

// =============================================================================
// Dev-inspect orchestration
// =============================================================================

/// Sender used for read-only simulation; dev-inspect does not check it.
pub const DEV_INSPECT_SENDER: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000000";

/// Execute a read function through dev-inspect and decode its return
/// values. Arguments in object-reference positions must be object ids; they
/// are resolved to full references first. Node errors surface verbatim.
pub fn dev_inspect_call(
    client: &RpcClient,
    sender: &str,
    package: &str,
    function: &ReadFunction,
    args: &[ArgValue],
) -> Result<Vec<String>> {
    if args.len() != function.params.len() {
        bail!(
            "{}::{} takes {} argument(s), got {}",
            function.module,
            function.name,
            function.params.len(),
            args.len()
        );
    }

    let mut inputs = Vec::with_capacity(args.len());
    for (param, arg) in function.params.iter().zip(args) {
        if is_object_reference(&param.ty) {
            let ArgValue::Text(object_id) = arg else {
                bail!("{} expects an object id", param.name);
            };
            let obj = client
                .fetch_object_ref(object_id)
                .with_context(|| format!("resolving object argument {}", param.name))?;
            let mutable = matches!(param.ty, MoveType::MutableReference(_));
            inputs.push(object_call_arg(&obj, mutable)?);
        } else {
            inputs.push(CallArg::Pure(encode_pure(arg, param.kind)?));
        }
    }

    let tx_kind = encode_transaction_kind(package, &function.module, &function.name, inputs)?;
    debug!(package, module = %function.module, function = %function.name, "dev inspect");
    let result = client.dev_inspect(sender, &tx_kind)?;

    if let Some(error) = result.get("error").and_then(Value::as_str) {
        bail!("{}", error);
    }

    let mut lines = Vec::new();
    if let Some(results) = result.get("results").and_then(Value::as_array) {
        for entry in results {
            if let Some(return_values) = entry.get("returnValues").and_then(Value::as_array) {
                lines.extend(decode_dev_inspect_return_values(
                    return_values,
                    &function.return_types,
                ));
            }
        }
    }
    if lines.is_empty() {
        lines.push("Call succeeded (no return values)".to_string());
    }
    Ok(lines)
}
