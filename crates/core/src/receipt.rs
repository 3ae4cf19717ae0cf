//! Result of one broadcast chain transaction

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Receipt returned by every execute call once the transaction is included
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub tx_hash: String,
    pub height: u64,
    pub gas_wanted: u64,
    pub gas_used: u64,
    pub submitted_at: DateTime<Utc>,
}

impl TxReceipt {
    pub fn new(tx_hash: impl Into<String>, height: u64, gas_wanted: u64, gas_used: u64) -> Self {
        Self {
            tx_hash: tx_hash.into(),
            height,
            gas_wanted,
            gas_used,
            submitted_at: Utc::now(),
        }
    }
}
