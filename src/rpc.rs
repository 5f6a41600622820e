//! JSON-RPC client for Sui fullnodes.
//!
//! Thin blocking wrapper over the handful of methods the explorer needs:
//! transaction lookup, normalized-module introspection, object metadata for
//! call arguments, and dev-inspect execution. Node-reported errors surface
//! verbatim; nothing here retries.

use anyhow::{anyhow, bail, Context, Result};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

/// Well-known fullnode networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Network {
    Mainnet,
    Testnet,
    Devnet,
}

impl Network {
    pub fn fullnode_url(self) -> &'static str {
        match self {
            Network::Mainnet => "https://fullnode.mainnet.sui.io:443",
            Network::Testnet => "https://fullnode.testnet.sui.io:443",
            Network::Devnet => "https://fullnode.devnet.sui.io:443",
        }
    }
}

/// Version/digest/owner triple needed to pass an object as a call argument.
#[derive(Debug, Clone)]
pub struct ObjectRef {
    pub object_id: String,
    pub version: u64,
    pub digest: String,
    /// Shared objects are passed by initial shared version instead of digest.
    pub initial_shared_version: Option<u64>,
}

#[derive(Clone)]
pub struct RpcClient {
    endpoint: String,
    agent: ureq::Agent,
}

impl RpcClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(10))
            .timeout_read(Duration::from_secs(60))
            .build();
        RpcClient {
            endpoint: endpoint.into(),
            agent,
        }
    }

    pub fn for_network(network: Network) -> Self {
        RpcClient::new(network.fullnode_url())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn call(&self, method: &str, params: Value) -> Result<Value> {
        debug!(method, "rpc request");
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        let response: Value = self
            .agent
            .post(&self.endpoint)
            .set("Content-Type", "application/json")
            .send_json(body)
            .with_context(|| format!("rpc {} to {}", method, self.endpoint))?
            .into_json()
            .with_context(|| format!("decoding {} response", method))?;

        if let Some(error) = response.get("error") {
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown rpc error");
            bail!("{}", message);
        }
        response
            .get("result")
            .cloned()
            .ok_or_else(|| anyhow!("rpc {} returned no result", method))
    }

    /// Full transaction record for a digest, with all detail sections
    /// populated.
    pub fn fetch_transaction(&self, digest: &str) -> Result<Value> {
        self.call(
            "sui_getTransactionBlock",
            json!([digest, {
                "showInput": true,
                "showEffects": true,
                "showEvents": true,
                "showObjectChanges": true,
                "showBalanceChanges": true,
            }]),
        )
    }

    /// Normalized move modules for a package (module name → module).
    pub fn fetch_normalized_modules(&self, package_id: &str) -> Result<Value> {
        self.call("sui_getNormalizedMoveModulesByPackage", json!([package_id]))
    }

    /// Resolve the reference data needed to pass an object argument.
    pub fn fetch_object_ref(&self, object_id: &str) -> Result<ObjectRef> {
        let result = self.call(
            "sui_getObject",
            json!([object_id, { "showOwner": true }]),
        )?;
        let data = result
            .get("data")
            .ok_or_else(|| anyhow!("object {} not found", object_id))?;

        let version = match data.get("version") {
            Some(Value::String(s)) => s.parse().unwrap_or(0),
            Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
            _ => 0,
        };
        let digest = data
            .get("digest")
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow!("object {} has no digest", object_id))?
            .to_string();
        let initial_shared_version = data
            .pointer("/owner/Shared/initial_shared_version")
            .and_then(Value::as_u64);

        Ok(ObjectRef {
            object_id: data
                .get("objectId")
                .and_then(Value::as_str)
                .unwrap_or(object_id)
                .to_string(),
            version,
            digest,
            initial_shared_version,
        })
    }

    /// Simulate a transaction kind without signing or committing.
    pub fn dev_inspect(&self, sender: &str, tx_kind_b64: &str) -> Result<Value> {
        self.call(
            "sui_devInspectTransactionBlock",
            json!([sender, tx_kind_b64, null, null]),
        )
    }
}
