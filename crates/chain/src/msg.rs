//! Contract message schema
//!
//! Variant names are the contract's wire names; the mix of PascalCase and
//! snake_case is what the deployed contract expects.

use aml_oracle_core::{AmlVerdict, Coin, PendingTransaction, RiskScore, WalletRiskEntry};
use serde::{Deserialize, Serialize};

/// Smart queries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryMsg {
    GetNextId {},
    GetPendingTx {
        id: u64,
    },
    #[serde(rename = "get_oracle_data")]
    GetOracleData {},
}

/// Execute messages sent by the oracle account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecuteMsg {
    OracleResponse {
        request_id: u64,
        approved: bool,
        flagged: bool,
        reason: String,
        risk_score: RiskScore,
    },
    #[serde(rename = "oracle_data_update")]
    OracleDataUpdate {
        data: Vec<WalletRiskEntry>,
        signature: String,
    },
    #[serde(rename = "delete_wallet")]
    DeleteWallet { wallet: String },
}

impl ExecuteMsg {
    /// Short name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            ExecuteMsg::OracleResponse { .. } => "OracleResponse",
            ExecuteMsg::OracleDataUpdate { .. } => "oracle_data_update",
            ExecuteMsg::DeleteWallet { .. } => "delete_wallet",
        }
    }
}

impl From<&AmlVerdict> for ExecuteMsg {
    fn from(verdict: &AmlVerdict) -> Self {
        ExecuteMsg::OracleResponse {
            request_id: verdict.request_id,
            approved: verdict.approved,
            flagged: verdict.flagged,
            reason: verdict.reason.clone(),
            risk_score: verdict.risk_score,
        }
    }
}

/// Stored pending transfer as returned by `GetPendingTx` (the id is the key, not a field)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTxResponse {
    pub sender: String,
    pub recipient: String,
    pub amount: Coin,
}

impl PendingTxResponse {
    pub fn into_pending(self, id: u64) -> PendingTransaction {
        PendingTransaction::new(id, self.sender, self.recipient, self.amount)
    }
}
