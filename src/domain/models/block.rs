use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One event as emitted by the chain: a type tag plus ordered attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    /// Event type tag, e.g. `lava_relay_payment`
    pub type_tag: String,

    /// Attribute key/value pairs in emission order
    pub attributes: Vec<(String, String)>,

    /// Hash of the transaction that emitted the event, `None` for block-level events
    pub tx_hash: Option<String>,
}

impl RawEvent {
    pub fn new(type_tag: &str, attributes: &[(&str, &str)], tx_hash: Option<&str>) -> Self {
        Self {
            type_tag: type_tag.to_string(),
            attributes: attributes
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            tx_hash: tx_hash.map(|h| h.to_string()),
        }
    }
}

/// A block as fetched from the node, before any parsing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawBlock {
    pub height: u64,
    pub timestamp: DateTime<Utc>,
    pub events: Vec<RawEvent>,
}

/// The `blocks` row written for an ingested height
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRecord {
    pub height: u64,
    pub timestamp: DateTime<Utc>,
}
