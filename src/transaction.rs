//! Custody-event transaction types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sentinel sender for transactions originated by the node itself rather than
/// a supply-chain participant.
pub const SYSTEM_SENDER: &str = "0";

/// One custody event, immutable once created. The ledger accepts any field
/// content; schema checks belong to the boundary layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub sender: String,
    pub recipient: String,
    pub product_id: String,
    pub product_name: String,
    pub location: String,
    pub status: String,
    /// Creation time, fractional Unix seconds.
    pub timestamp: f64,
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

/// Caller-supplied fields of a custody event, before the ledger stamps an id
/// and creation time onto it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustodyEvent {
    pub sender: String,
    pub recipient: String,
    pub product_id: String,
    pub product_name: String,
    pub location: String,
    pub status: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl CustodyEvent {
    /// The synthetic event recorded alongside every sealed block.
    pub fn seal_reward() -> Self {
        CustodyEvent {
            sender: SYSTEM_SENDER.to_string(),
            recipient: "miner".to_string(),
            product_id: "system".to_string(),
            product_name: "Block Reward".to_string(),
            location: "Network".to_string(),
            status: "mined".to_string(),
            metadata: BTreeMap::new(),
        }
    }
}

impl Transaction {
    /// Stamp a custody event with a fresh random id and its creation time.
    /// Construction never fails.
    pub fn new(event: CustodyEvent) -> Self {
        Transaction {
            id: Uuid::new_v4(),
            sender: event.sender,
            recipient: event.recipient,
            product_id: event.product_id,
            product_name: event.product_name,
            location: event.location,
            status: event.status,
            timestamp: unix_time(),
            metadata: event.metadata,
        }
    }
}

/// Current wall-clock time as fractional Unix seconds.
pub(crate) fn unix_time() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
}
