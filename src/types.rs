//! Data model for the transaction explorer core.
//!
//! `SimplifiedTransaction` is the narrative projection of a raw transaction
//! record; `DetailedTransaction` extends it with inputs, calls, object
//! changes, events, operations, and effects, plus the raw payload for
//! lossless drill-down. All fields serialize in the camelCase wire form the
//! explorer UI consumes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Overall execution status of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Success,
    Failure,
}

/// Heuristic transaction category. Drives journey narration, so the set and
/// spelling are fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxCategory {
    Defi,
    Nft,
    Transfer,
    Contract,
    Other,
}

/// One signed balance delta, normalized for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceChange {
    /// Canonical coin symbol (e.g. "SUI"), not the full move type.
    pub coin_type: String,
    /// Absolute value of the delta, integer string in base units.
    pub amount: String,
    pub is_positive: bool,
    /// Shortened owner address.
    pub owner: String,
}

/// Derived summary of what a transaction did.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummary {
    pub main_action: String,
    pub description: String,
    pub objects_created: usize,
    pub objects_mutated: usize,
    pub events_emitted: usize,
    pub category: TxCategory,
}

/// Gas usage with the total in both MIST and SUI denominations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasUsed {
    /// `computationCost + storageCost - storageRebate`, integer string.
    /// May be negative when the rebate exceeds the costs.
    pub total: String,
    /// Total divided by 1e9, fixed to 6 decimal places.
    #[serde(rename = "totalSUI")]
    pub total_sui: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedTransaction {
    pub digest: String,
    pub status: TxStatus,
    pub sender: String,
    /// Deduplicated, insertion-ordered recipient addresses (sender excluded).
    pub recipients: Vec<String>,
    pub timestamp: String,
    pub balance_changes: Vec<BalanceChange>,
    pub gas_used: GasUsed,
    pub summary: TransactionSummary,
}

/// One call argument or value fed into a programmable transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInput {
    #[serde(rename = "type")]
    pub input_type: String,
    pub value: String,
    pub formatted_value: String,
    pub label: String,
    /// Raw input payload for drill-down.
    pub full_data: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveCall {
    /// Shortened package id.
    pub package: String,
    pub module: String,
    pub function: String,
    #[serde(default)]
    pub type_arguments: Vec<String>,
    pub description: String,
}

/// Parsed view of a full move object type string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectTypeDetails {
    pub full_type: String,
    pub main_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coin_type: Option<String>,
    pub is_coin: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coin_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectChange {
    /// created / mutated / deleted / transferred / wrapped (raw kind kept
    /// as-is so unrecognized kinds still render).
    #[serde(rename = "type")]
    pub change_type: String,
    pub object_id: String,
    pub object_id_short: String,
    pub object_type: String,
    pub object_type_details: ObjectTypeDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_short: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionEvent {
    /// Last path segment of the full event type.
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    pub description: String,
    pub data: Value,
}

/// Kind of a programmable-transaction step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    Split,
    Merge,
    Transfer,
    Publish,
    Upgrade,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionOperation {
    #[serde(rename = "type")]
    pub op_type: OperationType,
    pub description: String,
    /// Raw step payload for drill-down.
    pub details: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionEffects {
    pub computation_cost: String,
    pub storage_cost: String,
    pub storage_rebate: String,
    pub total_gas_cost: String,
    pub dependencies: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedTransaction {
    #[serde(flatten)]
    pub base: SimplifiedTransaction,
    pub inputs: Vec<TransactionInput>,
    pub move_calls: Vec<MoveCall>,
    pub object_changes: Vec<ObjectChange>,
    pub events: Vec<TransactionEvent>,
    pub operations: Vec<TransactionOperation>,
    pub effects: TransactionEffects,
    /// Original raw payload, retained losslessly.
    pub raw_data: Value,
}

/// One CoinGecko market row. Only `image` is required for a response to be
/// treated as usable; everything else is best-effort.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketData {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub market_cap_rank: Option<u64>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_1h_in_currency: Option<f64>,
    #[serde(default)]
    pub last_updated: Option<String>,
}
