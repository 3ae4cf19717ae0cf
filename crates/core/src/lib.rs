//! AML Oracle Core - Domain types
//!
//! This crate contains the fundamental types shared by every oracle component:
//! - `RiskScore`: Bounded (0..=100) risk score
//! - `PendingTransaction`: Transfer request awaiting a verdict
//! - `AmlVerdict`: Decision submitted back to the contract
//! - `WalletRiskEntry`: Flagged wallet record pushed by the admin channel
//! - `TxReceipt`: Result of an execute transaction

pub mod receipt;
pub mod risk;
pub mod transaction;
pub mod verdict;
pub mod wallet;

pub use receipt::TxReceipt;
pub use risk::{RiskScore, RiskScoreError, MAX_RISK_SCORE};
pub use transaction::{Coin, PendingTransaction, NO_PENDING_ID};
pub use verdict::{AmlVerdict, FAIL_SAFE_REASON};
pub use wallet::{
    validate_entries, validate_wallet, ValidationError, WalletRiskData, WalletRiskEntry,
    MAX_REASON_LEN,
};
