//! Chain client traits

use aml_oracle_core::{AmlVerdict, PendingTransaction, TxReceipt, WalletRiskEntry};
use async_trait::async_trait;

use crate::error::ChainResult;

/// Read-only access to the oracle contract.
///
/// Every method is an idempotent smart query and may be retried freely.
#[async_trait]
pub trait ChainQueryClient: Send + Sync {
    /// Id of the oldest transfer awaiting a verdict, or `NO_PENDING_ID` (0)
    async fn next_pending_id(&self) -> ChainResult<u64>;

    /// Pending transfer by id; `None` once it is resolved or if it never existed
    async fn pending_transaction(&self, id: u64) -> ChainResult<Option<PendingTransaction>>;

    /// Current flagged-wallet set
    async fn wallet_risk_data(&self) -> ChainResult<Vec<WalletRiskEntry>>;

    /// Check whether a transfer is still waiting for a verdict
    async fn is_pending(&self, id: u64) -> ChainResult<bool> {
        Ok(self.pending_transaction(id).await?.is_some())
    }
}

/// State-changing access to the oracle contract, signed by the oracle account.
///
/// Each call is one chain transaction. Implementations serialize their own
/// broadcasts so the account sequence is never reused.
#[async_trait]
pub trait ChainExecuteClient: ChainQueryClient {
    /// Record a verdict (`OracleResponse`) for `verdict.request_id`
    async fn submit_verdict(&self, verdict: &AmlVerdict) -> ChainResult<TxReceipt>;

    /// Replace the flagged-wallet set with a batch signed by the oracle key
    async fn submit_wallet_update(
        &self,
        entries: &[WalletRiskEntry],
        signature_base64: &str,
    ) -> ChainResult<TxReceipt>;

    /// Remove one wallet from the flagged set
    async fn delete_wallet_entry(&self, wallet: &str) -> ChainResult<TxReceipt>;
}
