//! Wallet risk records and batch validation
//!
//! The contract owns the set of flagged wallets (keyed by address). This
//! system only proposes batch replacements and deletions, so every batch is
//! validated here before any signing or chain work happens.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::risk::RiskScore;

/// Longest reason string accepted in a batch
pub const MAX_REASON_LEN: usize = 256;

/// One flagged wallet
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WalletRiskEntry {
    pub wallet: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub risk_score: RiskScore,
}

impl WalletRiskEntry {
    pub fn new(wallet: impl Into<String>, reason: impl Into<String>, risk_score: RiskScore) -> Self {
        Self {
            wallet: wallet.into(),
            reason: reason.into(),
            risk_score,
        }
    }
}

/// The contract's answer to the oracle data query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletRiskData {
    #[serde(default)]
    pub data: Vec<WalletRiskEntry>,
}

/// Malformed admin input
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("msg must be a non-empty array of wallet entries")]
    EmptyBatch,

    #[error("entry {index}: wallet is required")]
    MissingWallet { index: usize },

    #[error("entry {index}: wallet {wallet} does not use the {prefix} address prefix")]
    WrongPrefix {
        index: usize,
        wallet: String,
        prefix: String,
    },

    #[error("entry {index}: reason exceeds 256 characters")]
    ReasonTooLong { index: usize },

    #[error("wallet is required")]
    EmptyWallet,

    #[error("{0}")]
    Malformed(String),
}

/// Validate a single wallet address.
///
/// With a prefix configured, the address must start with `<prefix>1`
/// (the bech32 human-readable part followed by the separator).
pub fn validate_wallet(wallet: &str, prefix: Option<&str>) -> Result<(), ValidationError> {
    if wallet.trim().is_empty() {
        return Err(ValidationError::EmptyWallet);
    }
    if let Some(prefix) = prefix {
        if !wallet.starts_with(&format!("{prefix}1")) {
            return Err(ValidationError::WrongPrefix {
                index: 0,
                wallet: wallet.to_string(),
                prefix: prefix.to_string(),
            });
        }
    }
    Ok(())
}

/// Validate a batch update before it is canonicalized and signed
pub fn validate_entries(entries: &[WalletRiskEntry], prefix: Option<&str>) -> Result<(), ValidationError> {
    if entries.is_empty() {
        return Err(ValidationError::EmptyBatch);
    }

    for (index, entry) in entries.iter().enumerate() {
        match validate_wallet(&entry.wallet, prefix) {
            Ok(()) => {}
            Err(ValidationError::EmptyWallet) => return Err(ValidationError::MissingWallet { index }),
            Err(ValidationError::WrongPrefix { wallet, prefix, .. }) => {
                return Err(ValidationError::WrongPrefix { index, wallet, prefix })
            }
            Err(other) => return Err(other),
        }

        if entry.reason.chars().count() > MAX_REASON_LEN {
            return Err(ValidationError::ReasonTooLong { index });
        }
    }

    Ok(())
}
