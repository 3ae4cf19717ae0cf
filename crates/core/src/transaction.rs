//! Pending transfer requests recorded by the contract

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel returned by the contract when no transaction is waiting for a verdict
pub const NO_PENDING_ID: u64 = 0;

/// A native coin amount as the chain encodes it (`amount` is a `Uint128` string)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: String,
}

impl Coin {
    pub fn new(amount: impl Into<String>, denom: impl Into<String>) -> Self {
        Self {
            denom: denom.into(),
            amount: amount.into(),
        }
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// A transfer request awaiting an oracle verdict.
///
/// The contract stores these keyed by id; the id is not part of the stored
/// value, so the chain client attaches the id it queried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTransaction {
    pub id: u64,
    pub sender: String,
    pub recipient: String,
    pub amount: Coin,
}

impl PendingTransaction {
    pub fn new(
        id: u64,
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: Coin,
    ) -> Self {
        Self {
            id,
            sender: sender.into(),
            recipient: recipient.into(),
            amount,
        }
    }
}
