//! Raw transaction normalization and classification.
//!
//! Converts one raw `sui_getTransactionBlock` record into the simplified and
//! detailed projections. Every field access defaults (empty sequence,
//! `"Unknown"`, `"0"`); a partial payload renders partial output, never an
//! error. The classification heuristic is an ordered rule table evaluated
//! top-down so precedence stays auditable.
//!
//! Known limitation: only the *first* programmable-transaction step is
//! inspected for classification. A transaction that swaps and then mints is
//! categorized by the swap alone.

use chrono::{Local, TimeZone};
use serde_json::Value;

use crate::types::{
    BalanceChange, DetailedTransaction, GasUsed, MoveCall, ObjectChange, ObjectTypeDetails,
    OperationType, SimplifiedTransaction, TransactionEffects, TransactionEvent, TransactionInput,
    TransactionOperation, TransactionSummary, TxCategory, TxStatus,
};
use crate::utils::{shorten_id, shorten_id_opt};

/// Convert raw MIST (1e9 per SUI) to a 6-decimal SUI string.
pub fn format_mist(mist: i128) -> String {
    format!("{:.6}", mist as f64 / 1_000_000_000.0)
}

/// Parse a raw transaction into the simplified projection.
pub fn parse_simplified(raw: &Value) -> SimplifiedTransaction {
    let effects = raw.get("effects");
    let status = match effects
        .and_then(|e| e.get("status"))
        .and_then(|s| s.get("status"))
        .and_then(Value::as_str)
    {
        Some("success") => TxStatus::Success,
        _ => TxStatus::Failure,
    };

    let total_gas = gas_total(effects.and_then(|e| e.get("gasUsed")));

    SimplifiedTransaction {
        digest: str_or(raw.get("digest"), "Unknown"),
        status,
        sender: sender_of(raw).unwrap_or("Unknown").to_string(),
        recipients: extract_recipients(raw),
        timestamp: format_timestamp(raw.get("timestampMs")),
        balance_changes: parse_balance_changes(array_of(raw.get("balanceChanges"))),
        gas_used: GasUsed {
            total: total_gas.to_string(),
            total_sui: format_mist(total_gas),
        },
        summary: generate_summary(raw),
    }
}

/// Parse a raw transaction into the detailed projection (a superset of the
/// simplified one, retaining the raw payload).
pub fn parse_detailed(raw: &Value) -> DetailedTransaction {
    let base = parse_simplified(raw);
    let effects = raw.get("effects");
    let gas = effects.and_then(|e| e.get("gasUsed"));
    let steps = tx_steps(raw);

    DetailedTransaction {
        inputs: parse_inputs(array_of(
            raw.pointer("/transaction/data/transaction/inputs"),
        )),
        move_calls: parse_move_calls(steps),
        object_changes: parse_object_changes(array_of(raw.get("objectChanges"))),
        events: parse_events(array_of(raw.get("events"))),
        operations: parse_operations(steps),
        effects: TransactionEffects {
            computation_cost: str_or(gas.and_then(|g| g.get("computationCost")), "0"),
            storage_cost: str_or(gas.and_then(|g| g.get("storageCost")), "0"),
            storage_rebate: str_or(gas.and_then(|g| g.get("storageRebate")), "0"),
            total_gas_cost: base.gas_used.total.clone(),
            dependencies: array_of(effects.and_then(|e| e.get("dependencies")))
                .iter()
                .filter_map(|d| d.as_str().map(String::from))
                .collect(),
        },
        raw_data: raw.clone(),
        base,
    }
}

// =============================================================================
// Classification
// =============================================================================

struct Refinement {
    keyword: &'static str,
    main_action: &'static str,
    description: &'static str,
}

/// One entry in the ordered classification table. A rule matches when the
/// first call's function name contains any of its keywords; the first
/// matching refinement then overrides the generic label.
struct CallRule {
    keywords: &'static [&'static str],
    category: TxCategory,
    refinements: &'static [Refinement],
}

/// Evaluated top-down; order is load-bearing ("transfer_order" is defi, not
/// a transfer).
const CALL_RULES: &[CallRule] = &[
    CallRule {
        keywords: &["swap", "trade", "order", "pool"],
        category: TxCategory::Defi,
        refinements: &[
            Refinement {
                keyword: "swap",
                main_action: "Token Swap",
                description: "Swapped tokens on DEX",
            },
            Refinement {
                keyword: "order",
                main_action: "Limit Order",
                description: "Placed trading order",
            },
        ],
    },
    CallRule {
        keywords: &["mint", "nft", "token"],
        category: TxCategory::Nft,
        refinements: &[Refinement {
            keyword: "mint",
            main_action: "NFT Mint",
            description: "Minted new NFT",
        }],
    },
    CallRule {
        keywords: &["transfer", "send"],
        category: TxCategory::Transfer,
        // Empty keyword matches any function: the transfer label is
        // unconditional once the rule fires.
        refinements: &[Refinement {
            keyword: "",
            main_action: "Transfer",
            description: "Transferred assets",
        }],
    },
];

/// Convert `snake_case` to `Title Case`.
fn format_function_name(func: &str) -> String {
    func.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn generate_summary(raw: &Value) -> TransactionSummary {
    let steps = tx_steps(raw);
    let object_changes = array_of(raw.get("objectChanges"));
    let events = array_of(raw.get("events"));

    let mut main_action = "Transaction".to_string();
    let mut description = "Executed a blockchain transaction".to_string();
    let mut category = TxCategory::Other;

    if let Some(call) = steps.first().and_then(|s| s.get("MoveCall")) {
        let func = str_or(call.get("function"), "");
        let module = str_or(call.get("module"), "");
        main_action = format_function_name(&func);
        description = format!("Called {} in {}", func, module);
        category = TxCategory::Contract;

        if let Some(rule) = CALL_RULES
            .iter()
            .find(|r| r.keywords.iter().any(|k| func.contains(k)))
        {
            category = rule.category;
            if let Some(refinement) = rule
                .refinements
                .iter()
                .find(|refi| func.contains(refi.keyword))
            {
                main_action = refinement.main_action.to_string();
                description = refinement.description.to_string();
            }
        }
    }

    // With no calls at all, mutated/transferred objects imply a plain
    // asset transfer.
    if steps.is_empty() && !object_changes.is_empty() {
        let has_transfer = object_changes.iter().any(|c| {
            matches!(
                c.get("type").and_then(Value::as_str),
                Some("mutated") | Some("transferred")
            )
        });
        if has_transfer {
            category = TxCategory::Transfer;
            main_action = "Asset Transfer".to_string();
            description = "Transferred objects between addresses".to_string();
        }
    }

    let count_kind = |kind: &str| {
        object_changes
            .iter()
            .filter(|c| c.get("type").and_then(Value::as_str) == Some(kind))
            .count()
    };

    TransactionSummary {
        main_action,
        description,
        objects_created: count_kind("created"),
        objects_mutated: count_kind("mutated"),
        events_emitted: events.len(),
        category,
    }
}

// =============================================================================
// Sub-parsers
// =============================================================================

fn gas_total(gas: Option<&Value>) -> i128 {
    let Some(gas) = gas else { return 0 };
    let cost = |key: &str| int_or_zero(gas.get(key));
    cost("computationCost") + cost("storageCost") - cost("storageRebate")
}

fn parse_balance_changes(changes: &[Value]) -> Vec<BalanceChange> {
    changes
        .iter()
        .map(|change| {
            let amount = int_or_zero(change.get("amount"));
            let owner = change
                .get("owner")
                .and_then(|o| o.get("AddressOwner").or(Some(o)))
                .and_then(Value::as_str);
            BalanceChange {
                coin_type: canonical_coin_symbol(&str_or(change.get("coinType"), "")),
                amount: amount.unsigned_abs().to_string(),
                is_positive: amount > 0,
                owner: shorten_id_opt(owner),
            }
        })
        .collect()
}

/// Union of object-change owners and positive balance-change owners,
/// deduplicated in first-seen order, always excluding the sender.
fn extract_recipients(raw: &Value) -> Vec<String> {
    let sender = sender_of(raw);
    let mut recipients: Vec<String> = Vec::new();
    let mut push = |addr: &str| {
        if !recipients.iter().any(|r| r == addr) {
            recipients.push(addr.to_string());
        }
    };

    for change in array_of(raw.get("objectChanges")) {
        if let Some(owner) = change.pointer("/owner/AddressOwner").and_then(Value::as_str) {
            if Some(owner) != sender {
                push(owner);
            }
        }
    }
    for change in array_of(raw.get("balanceChanges")) {
        if let Some(owner) = change.pointer("/owner/AddressOwner").and_then(Value::as_str) {
            if Some(owner) != sender && int_or_zero(change.get("amount")) > 0 {
                push(owner);
            }
        }
    }
    recipients
}

fn parse_inputs(inputs: &[Value]) -> Vec<TransactionInput> {
    inputs
        .iter()
        .enumerate()
        .map(|(index, input)| match input.get("type").and_then(Value::as_str) {
            Some("pure") => {
                let value_type = input.get("valueType").and_then(Value::as_str);
                let display = match input.get("value") {
                    Some(Value::String(s)) => s.clone(),
                    Some(v) => v.to_string(),
                    None => "N/A".to_string(),
                };
                // Large u64 pure values are almost always MIST amounts
                let formatted = match value_type {
                    Some("u64") => match display.parse::<i128>() {
                        Ok(n) if n > 1_000_000 => {
                            format!("{} SUI ({} MIST)", format_mist(n), display)
                        }
                        _ => display.clone(),
                    },
                    _ => display.clone(),
                };
                TransactionInput {
                    input_type: value_type.unwrap_or("pure").to_string(),
                    value: display,
                    formatted_value: formatted,
                    label: format!("Input {}: {}", index + 1, value_type.unwrap_or("Value")),
                    full_data: input.clone(),
                }
            }
            Some("object") => {
                let object_type = str_or(input.get("objectType"), "object");
                let object_id = str_or(input.get("objectId"), "");
                let details = parse_object_type_details(&object_type);
                let label_kind = if details.is_coin {
                    details.coin_name.clone().unwrap_or_else(|| "Coin".to_string())
                } else {
                    "Object".to_string()
                };
                TransactionInput {
                    input_type: object_type,
                    value: object_id.clone(),
                    formatted_value: shorten_id(&object_id),
                    label: format!("Input {}: {}", index + 1, label_kind),
                    full_data: input.clone(),
                }
            }
            other => TransactionInput {
                input_type: other.unwrap_or("unknown").to_string(),
                value: input.to_string(),
                formatted_value: input.to_string(),
                label: format!("Input {}", index + 1),
                full_data: input.clone(),
            },
        })
        .collect()
}

fn parse_move_calls(steps: &[Value]) -> Vec<MoveCall> {
    steps
        .iter()
        .filter_map(|step| step.get("MoveCall"))
        .map(|call| {
            let module = str_or(call.get("module"), "");
            let function = str_or(call.get("function"), "");
            MoveCall {
                package: shorten_id(&str_or(call.get("package"), "")),
                description: format!("{}::{}", module, function),
                module,
                function,
                type_arguments: array_of(call.get("type_arguments"))
                    .iter()
                    .filter_map(|t| t.as_str().map(String::from))
                    .collect(),
            }
        })
        .collect()
}

fn parse_object_changes(changes: &[Value]) -> Vec<ObjectChange> {
    changes
        .iter()
        .map(|change| {
            let object_type = str_or(change.get("objectType"), "");
            let object_id = str_or(change.get("objectId"), "");
            let owner = change.get("owner");
            // Owners come in three shapes: address-owned, shared, object-owned
            let (owner_full, owner_short) = match owner {
                Some(o) => {
                    if let Some(addr) = o.get("AddressOwner").and_then(Value::as_str) {
                        (Some(addr.to_string()), Some(shorten_id(addr)))
                    } else if o.get("Shared").is_some() {
                        (Some("Shared".to_string()), Some("Shared".to_string()))
                    } else if let Some(addr) = o.get("ObjectOwner").and_then(Value::as_str) {
                        (Some(addr.to_string()), Some(shorten_id(addr)))
                    } else {
                        (None, None)
                    }
                }
                None => (None, None),
            };
            ObjectChange {
                change_type: str_or(change.get("type"), "unknown"),
                object_id_short: shorten_id(&object_id),
                object_id,
                object_type_details: parse_object_type_details(&object_type),
                object_type,
                owner: owner_full,
                owner_short,
                version: opt_string(change.get("version")),
                previous_version: opt_string(change.get("previousVersion")),
                digest: change
                    .pointer("/reference/digest")
                    .or_else(|| change.get("digest"))
                    .and_then(Value::as_str)
                    .map(String::from),
            }
        })
        .collect()
}

fn parse_events(events: &[Value]) -> Vec<TransactionEvent> {
    events
        .iter()
        .map(|event| {
            let full_type = str_or(event.get("type"), "");
            let event_name = full_type.rsplit("::").next().unwrap_or("").to_string();
            TransactionEvent {
                description: format_event_description(&event_name),
                event_type: event_name,
                module: event
                    .get("transactionModule")
                    .and_then(Value::as_str)
                    .map(String::from),
                data: event.get("parsedJson").cloned().unwrap_or(Value::Object(Default::default())),
            }
        })
        .collect()
}

/// Split a CamelCase event name into words; a few event families get fixed
/// phrasings.
fn format_event_description(event_name: &str) -> String {
    if event_name.contains("Order") {
        return format!("Order {}", split_camel_case(event_name));
    }
    if event_name.contains("Swap") {
        return "Token swap executed".to_string();
    }
    if event_name.contains("Transfer") {
        return "Asset transferred".to_string();
    }
    split_camel_case(event_name)
}

fn split_camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() && !out.is_empty() {
            out.push(' ');
        }
        out.push(c);
    }
    out.trim().to_string()
}

fn parse_operations(steps: &[Value]) -> Vec<TransactionOperation> {
    let mut operations = Vec::new();
    for step in steps {
        let op = if let Some(split) = step.get("SplitCoins") {
            let parts = split
                .get("amounts")
                .and_then(Value::as_array)
                .map(|a| a.len().to_string())
                .unwrap_or_else(|| "multiple".to_string());
            Some((
                OperationType::Split,
                format!("Split coins into {} parts", parts),
                split,
            ))
        } else if let Some(merge) = step.get("MergeCoins") {
            Some((
                OperationType::Merge,
                "Merge multiple coins into one".to_string(),
                merge,
            ))
        } else if let Some(transfer) = step.get("TransferObjects") {
            let count = transfer
                .get("objects")
                .and_then(Value::as_array)
                .map(|a| a.len())
                .unwrap_or(1);
            Some((
                OperationType::Transfer,
                format!("Transfer {} object(s)", count),
                transfer,
            ))
        } else if let Some(publish) = step.get("Publish") {
            Some((
                OperationType::Publish,
                "Publish new package/module".to_string(),
                publish,
            ))
        } else if let Some(upgrade) = step.get("Upgrade") {
            Some((OperationType::Upgrade, "Upgrade package".to_string(), upgrade))
        } else if let Some(make_vec) = step.get("MakeMoveVec") {
            Some((
                OperationType::Other,
                "Create Move vector".to_string(),
                make_vec,
            ))
        } else {
            None
        };

        if let Some((op_type, description, details)) = op {
            operations.push(TransactionOperation {
                op_type,
                description,
                details: details.clone(),
            });
        }
    }
    operations
}

// =============================================================================
// Coin / object type canonicalization
// =============================================================================
// Two independent rules on purpose: balance changes canonicalize a bare coin
// type string, while object types additionally unwrap `coin::Coin<...>`.
// Merging them would silently change observed labels.

/// Canonical display symbol for a fully-qualified coin type.
pub fn canonical_coin_symbol(coin_type: &str) -> String {
    if coin_type.contains("::sui::SUI") {
        return "SUI".to_string();
    }
    if coin_type.contains("::usdc::USDC") {
        return "USDC".to_string();
    }
    if coin_type.contains("::usdt::USDT") {
        return "USDT".to_string();
    }
    coin_type
        .rsplit("::")
        .next()
        .unwrap_or(coin_type)
        .to_string()
}

/// Parse a full object type string into display details, unwrapping
/// `coin::Coin<...>` wrappers.
pub fn parse_object_type_details(object_type: &str) -> ObjectTypeDetails {
    if object_type.is_empty() {
        return ObjectTypeDetails {
            full_type: "Unknown".to_string(),
            main_type: "Unknown".to_string(),
            coin_type: None,
            is_coin: false,
            coin_name: None,
        };
    }

    const COIN_MARKER: &str = "::coin::Coin<";
    if let Some(start) = object_type.find(COIN_MARKER) {
        let rest = &object_type[start + COIN_MARKER.len()..];
        if let Some(end) = rest.find('>') {
            let coin_type = &rest[..end];
            let coin_name = canonical_coin_symbol(coin_type);
            let coin_name = if coin_name.is_empty() {
                "Unknown Coin".to_string()
            } else {
                coin_name
            };
            return ObjectTypeDetails {
                full_type: object_type.to_string(),
                main_type: format!("Coin<{}>", coin_name),
                coin_type: Some(coin_type.to_string()),
                is_coin: true,
                coin_name: Some(coin_name),
            };
        }
        return ObjectTypeDetails {
            full_type: object_type.to_string(),
            main_type: "Coin".to_string(),
            coin_type: None,
            is_coin: true,
            coin_name: None,
        };
    }

    let main_type = if object_type.contains("::nft::") {
        "NFT".to_string()
    } else if object_type.contains("::balance::Balance") {
        "Balance".to_string()
    } else if object_type.contains("::dynamic_field::Field") {
        "Dynamic Field".to_string()
    } else {
        object_type
            .rsplit("::")
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or(object_type)
            .to_string()
    };

    ObjectTypeDetails {
        full_type: object_type.to_string(),
        main_type,
        coin_type: None,
        is_coin: false,
        coin_name: None,
    }
}

// =============================================================================
// Value helpers
// =============================================================================

fn sender_of(raw: &Value) -> Option<&str> {
    raw.pointer("/transaction/data/sender").and_then(Value::as_str)
}

fn tx_steps(raw: &Value) -> &[Value] {
    array_of(raw.pointer("/transaction/data/transaction/transactions"))
}

fn array_of(value: Option<&Value>) -> &[Value] {
    value.and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[])
}

fn str_or(value: Option<&Value>, default: &str) -> String {
    value
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}

fn opt_string(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// Parse an integer from either a string or a number value; anything else
/// counts as zero.
fn int_or_zero(value: Option<&Value>) -> i128 {
    match value {
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(i128::from)
            .or_else(|| n.as_u64().map(i128::from))
            .unwrap_or(0),
        _ => 0,
    }
}

fn format_timestamp(timestamp_ms: Option<&Value>) -> String {
    let ms = match timestamp_ms {
        Some(Value::String(s)) => s.parse::<i64>().ok(),
        Some(Value::Number(n)) => n.as_i64(),
        _ => None,
    };
    match ms.and_then(|ms| Local.timestamp_millis_opt(ms).single()) {
        Some(dt) => dt.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string(),
        None => "Unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw_with_call(function: &str, module: &str) -> Value {
        json!({
            "digest": "D1",
            "transaction": { "data": {
                "sender": "0xsender",
                "transaction": { "transactions": [
                    { "MoveCall": { "package": "0x2", "module": module, "function": function } }
                ]}
            }},
            "effects": { "status": { "status": "success" } }
        })
    }

    #[test]
    fn test_empty_payload_defaults() {
        let tx = parse_simplified(&json!({}));
        assert_eq!(tx.digest, "Unknown");
        assert_eq!(tx.sender, "Unknown");
        assert_eq!(tx.status, TxStatus::Failure);
        assert_eq!(tx.timestamp, "Unknown");
        assert!(tx.recipients.is_empty());
        assert!(tx.balance_changes.is_empty());
        assert_eq!(tx.gas_used.total, "0");
        assert_eq!(tx.summary.main_action, "Transaction");
        assert_eq!(tx.summary.category, TxCategory::Other);

        let detailed = parse_detailed(&json!({}));
        assert!(detailed.inputs.is_empty());
        assert!(detailed.move_calls.is_empty());
        assert!(detailed.object_changes.is_empty());
        assert!(detailed.events.is_empty());
        assert!(detailed.operations.is_empty());
        assert_eq!(detailed.effects.computation_cost, "0");
    }

    #[test]
    fn test_gas_total_golden() {
        let raw = json!({
            "effects": {
                "status": { "status": "success" },
                "gasUsed": {
                    "computationCost": "530000",
                    "storageCost": "106027600",
                    "storageRebate": "103981680"
                }
            }
        });
        let tx = parse_simplified(&raw);
        assert_eq!(tx.gas_used.total, "2575920");
        assert_eq!(tx.gas_used.total_sui, "0.002576");
    }

    #[test]
    fn test_gas_total_may_go_negative() {
        let raw = json!({
            "effects": { "gasUsed": {
                "computationCost": "100",
                "storageCost": "0",
                "storageRebate": "500"
            }}
        });
        assert_eq!(parse_simplified(&raw).gas_used.total, "-400");
    }

    #[test]
    fn test_classification_limit_order() {
        let tx = parse_simplified(&raw_with_call("place_limit_order", "pool"));
        assert_eq!(tx.summary.category, TxCategory::Defi);
        assert_eq!(tx.summary.main_action, "Limit Order");
        assert_eq!(tx.summary.description, "Placed trading order");
    }

    #[test]
    fn test_classification_contract_fallback() {
        let tx = parse_simplified(&raw_with_call("generate_proof_as_trader", "vault"));
        assert_eq!(tx.summary.category, TxCategory::Contract);
        assert_eq!(tx.summary.main_action, "Generate Proof As Trader");
        assert_eq!(
            tx.summary.description,
            "Called generate_proof_as_trader in vault"
        );
    }

    #[test]
    fn test_classification_swap_and_mint() {
        let tx = parse_simplified(&raw_with_call("swap_exact_input", "router"));
        assert_eq!(tx.summary.category, TxCategory::Defi);
        assert_eq!(tx.summary.main_action, "Token Swap");

        let tx = parse_simplified(&raw_with_call("mint_hero", "heroes"));
        assert_eq!(tx.summary.category, TxCategory::Nft);
        assert_eq!(tx.summary.main_action, "NFT Mint");

        let tx = parse_simplified(&raw_with_call("send_gift", "gifting"));
        assert_eq!(tx.summary.category, TxCategory::Transfer);
        assert_eq!(tx.summary.main_action, "Transfer");
    }

    #[test]
    fn test_classification_defi_wins_over_transfer() {
        // "transfer_order" hits the defi rule first
        let tx = parse_simplified(&raw_with_call("transfer_order", "book"));
        assert_eq!(tx.summary.category, TxCategory::Defi);
        assert_eq!(tx.summary.main_action, "Limit Order");
    }

    #[test]
    fn test_no_calls_with_mutations_is_asset_transfer() {
        let raw = json!({
            "objectChanges": [
                { "type": "mutated", "objectId": "0x1", "objectType": "0x2::coin::Coin<0x2::sui::SUI>" }
            ]
        });
        let tx = parse_simplified(&raw);
        assert_eq!(tx.summary.category, TxCategory::Transfer);
        assert_eq!(tx.summary.main_action, "Asset Transfer");
        assert_eq!(tx.summary.objects_mutated, 1);
    }

    #[test]
    fn test_recipients_exclude_sender_and_dedup() {
        let raw = json!({
            "transaction": { "data": { "sender": "0xaaa" } },
            "objectChanges": [
                { "owner": { "AddressOwner": "0xaaa" } },
                { "owner": { "AddressOwner": "0xbbb" } },
                { "owner": { "AddressOwner": "0xbbb" } },
                { "owner": { "Shared": { "initial_shared_version": 1 } } }
            ],
            "balanceChanges": [
                { "owner": { "AddressOwner": "0xccc" }, "amount": "100" },
                { "owner": { "AddressOwner": "0xddd" }, "amount": "-50" },
                { "owner": { "AddressOwner": "0xaaa" }, "amount": "900" }
            ]
        });
        assert_eq!(extract_recipients(&raw), vec!["0xbbb", "0xccc"]);
    }

    #[test]
    fn test_balance_change_normalization() {
        let raw = json!({
            "balanceChanges": [
                {
                    "coinType": "0x2::sui::SUI",
                    "amount": "-2500000",
                    "owner": { "AddressOwner": "0xabcdef1234567890abcdef1234567890" }
                },
                { "coinType": "0xdead::memecoin::MEME", "amount": "7", "owner": "0xshort" }
            ]
        });
        let tx = parse_simplified(&raw);
        let first = &tx.balance_changes[0];
        assert_eq!(first.coin_type, "SUI");
        assert_eq!(first.amount, "2500000");
        assert!(!first.is_positive);
        assert_eq!(first.owner, "0xabcdef12...34567890");

        let second = &tx.balance_changes[1];
        assert_eq!(second.coin_type, "MEME");
        assert!(second.is_positive);
        assert_eq!(second.owner, "0xshort");
    }

    #[test]
    fn test_object_type_details_coin() {
        let details = parse_object_type_details("0x2::coin::Coin<0x2::sui::SUI>");
        assert!(details.is_coin);
        assert_eq!(details.coin_type.as_deref(), Some("0x2::sui::SUI"));
        assert_eq!(details.coin_name.as_deref(), Some("SUI"));
        assert_eq!(details.main_type, "Coin<SUI>");

        let details =
            parse_object_type_details("0x2::coin::Coin<0xbeef::wbtc::WBTC>");
        assert_eq!(details.main_type, "Coin<WBTC>");
    }

    #[test]
    fn test_object_type_details_special_cases() {
        assert_eq!(parse_object_type_details("0xa::nft::Hero").main_type, "NFT");
        assert_eq!(
            parse_object_type_details("0x2::balance::Balance<0x2::sui::SUI>").main_type,
            "Balance"
        );
        assert_eq!(
            parse_object_type_details("0x2::dynamic_field::Field<u64, bool>").main_type,
            "Dynamic Field"
        );
        assert_eq!(
            parse_object_type_details("0xa::registry::Entry").main_type,
            "Entry"
        );
        assert_eq!(parse_object_type_details("").main_type, "Unknown");
    }

    #[test]
    fn test_parse_inputs_pure_u64_mist() {
        let raw = json!({
            "transaction": { "data": { "transaction": { "inputs": [
                { "type": "pure", "valueType": "u64", "value": "6523000000" },
                { "type": "pure", "valueType": "u64", "value": "42" },
                { "type": "pure", "valueType": "address", "value": "0xabc" },
                { "type": "object", "objectType": "0x2::coin::Coin<0x2::sui::SUI>", "objectId": "0x99" }
            ]}}}
        });
        let tx = parse_detailed(&raw);
        assert_eq!(tx.inputs.len(), 4);
        assert_eq!(tx.inputs[0].formatted_value, "6.523000 SUI (6523000000 MIST)");
        // Below threshold: raw value passes through
        assert_eq!(tx.inputs[1].formatted_value, "42");
        assert_eq!(tx.inputs[2].label, "Input 3: address");
        assert_eq!(tx.inputs[3].label, "Input 4: SUI");
        assert_eq!(tx.inputs[3].value, "0x99");
    }

    #[test]
    fn test_parse_operations() {
        let raw = json!({
            "transaction": { "data": { "transaction": { "transactions": [
                { "SplitCoins": { "amounts": [1, 2, 3] } },
                { "MergeCoins": {} },
                { "TransferObjects": { "objects": [1, 2] } },
                { "Publish": {} },
                { "Upgrade": {} },
                { "MakeMoveVec": {} }
            ]}}}
        });
        let ops = parse_detailed(&raw).operations;
        assert_eq!(ops.len(), 6);
        assert_eq!(ops[0].op_type, OperationType::Split);
        assert_eq!(ops[0].description, "Split coins into 3 parts");
        assert_eq!(ops[2].description, "Transfer 2 object(s)");
        assert_eq!(ops[5].op_type, OperationType::Other);
    }

    #[test]
    fn test_parse_events() {
        let raw = json!({
            "events": [
                { "type": "0xabc::book::OrderPlaced", "transactionModule": "book", "parsedJson": { "qty": 5 } },
                { "type": "0xabc::amm::SwapEvent" },
                { "type": "0xabc::pay::TransferDone" }
            ]
        });
        let events = parse_detailed(&raw).events;
        assert_eq!(events[0].event_type, "OrderPlaced");
        assert_eq!(events[0].description, "Order Order Placed");
        assert_eq!(events[0].module.as_deref(), Some("book"));
        assert_eq!(events[1].description, "Token swap executed");
        assert_eq!(events[2].description, "Asset transferred");
    }

    #[test]
    fn test_move_calls_and_raw_retained() {
        let raw = raw_with_call("swap_a_b", "router");
        let tx = parse_detailed(&raw);
        assert_eq!(tx.move_calls.len(), 1);
        assert_eq!(tx.move_calls[0].description, "router::swap_a_b");
        assert_eq!(tx.raw_data, raw);
    }
}
