//! In-memory chain for testing
//!
//! Mimics the oracle contract: pending transfers keyed by id, a flagged-wallet
//! set, and execute messages applied in order. Failures and latency can be
//! injected to exercise fallback and scheduling paths.

use aml_oracle_core::{AmlVerdict, PendingTransaction, TxReceipt, WalletRiskEntry, NO_PENDING_ID};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use crate::client::{ChainExecuteClient, ChainQueryClient};
use crate::error::{ChainError, ChainResult};
use crate::msg::ExecuteMsg;

#[derive(Debug, Default)]
struct MockState {
    pending: BTreeMap<u64, PendingTransaction>,
    next_id_override: Option<u64>,
    wallets: Vec<WalletRiskEntry>,
    executed: Vec<ExecuteMsg>,
    execute_failure: Option<(u32, String)>,
    query_failure: Option<String>,
    query_delay: Option<Duration>,
    execute_delay: Option<Duration>,
}

/// Mock oracle contract
///
/// Call counters make it easy to assert which chain operations a component
/// performed, e.g. "no fetch happened".
#[derive(Debug, Default)]
pub struct MockChain {
    state: RwLock<MockState>,
    height: AtomicU64,
    next_id_calls: AtomicUsize,
    pending_calls: AtomicUsize,
    execute_attempts: AtomicUsize,
    active_calls: AtomicUsize,
    max_active_calls: AtomicUsize,
}

impl MockChain {
    /// Create an empty contract (nothing pending)
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, MockState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, MockState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a pending transfer
    pub fn add_pending(&self, pending: PendingTransaction) {
        self.write().pending.insert(pending.id, pending);
    }

    /// Force the next id the contract reports, regardless of stored transfers
    pub fn set_next_id(&self, id: u64) {
        self.write().next_id_override = Some(id);
    }

    /// Replace the flagged-wallet set
    pub fn set_wallets(&self, wallets: Vec<WalletRiskEntry>) {
        self.write().wallets = wallets;
    }

    /// Make every execute fail with a contract rejection
    pub fn fail_executes(&self, code: u32, log: impl Into<String>) {
        self.write().execute_failure = Some((code, log.into()));
    }

    /// Make every query fail with a transport-like status error
    pub fn fail_queries(&self, body: impl Into<String>) {
        self.write().query_failure = Some(body.into());
    }

    /// Clear injected failures
    pub fn heal(&self) {
        let mut state = self.write();
        state.execute_failure = None;
        state.query_failure = None;
    }

    /// Delay every query
    pub fn set_query_delay(&self, delay: Duration) {
        self.write().query_delay = Some(delay);
    }

    /// Delay every execute
    pub fn set_execute_delay(&self, delay: Duration) {
        self.write().execute_delay = Some(delay);
    }

    /// Successfully applied execute messages, in order
    pub fn executed(&self) -> Vec<ExecuteMsg> {
        self.read().executed.clone()
    }

    /// Current flagged-wallet set
    pub fn wallets(&self) -> Vec<WalletRiskEntry> {
        self.read().wallets.clone()
    }

    pub fn next_id_calls(&self) -> usize {
        self.next_id_calls.load(Ordering::SeqCst)
    }

    pub fn pending_calls(&self) -> usize {
        self.pending_calls.load(Ordering::SeqCst)
    }

    /// Execute calls made, including failed ones
    pub fn execute_attempts(&self) -> usize {
        self.execute_attempts.load(Ordering::SeqCst)
    }

    /// Highest number of chain calls observed in flight at once
    pub fn max_concurrent_calls(&self) -> usize {
        self.max_active_calls.load(Ordering::SeqCst)
    }

    async fn enter(&self, delay: Option<Duration>) -> ActiveCall<'_> {
        let active = self.active_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active_calls.fetch_max(active, Ordering::SeqCst);
        let call = ActiveCall { chain: self };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        call
    }

    async fn begin_query(&self) -> ChainResult<ActiveCall<'_>> {
        let (delay, failure) = {
            let state = self.read();
            (state.query_delay, state.query_failure.clone())
        };
        let call = self.enter(delay).await;
        match failure {
            Some(body) => Err(ChainError::Status { status: 503, body }),
            None => Ok(call),
        }
    }

    async fn apply(&self, msg: ExecuteMsg) -> ChainResult<TxReceipt> {
        self.execute_attempts.fetch_add(1, Ordering::SeqCst);
        let delay = self.read().execute_delay;
        let _call = self.enter(delay).await;

        let mut state = self.write();
        if let Some((code, log)) = &state.execute_failure {
            return Err(ChainError::rejected(*code, log.clone()));
        }

        match &msg {
            ExecuteMsg::OracleResponse { request_id, .. } => {
                if state.pending.remove(request_id).is_none() {
                    return Err(ChainError::rejected(
                        5,
                        format!("no pending transaction {}", request_id),
                    ));
                }
                if state.next_id_override == Some(*request_id) {
                    state.next_id_override = None;
                }
            }
            ExecuteMsg::OracleDataUpdate { data, .. } => {
                state.wallets = data.clone();
            }
            ExecuteMsg::DeleteWallet { wallet } => {
                state.wallets.retain(|entry| &entry.wallet != wallet);
            }
        }
        state.executed.push(msg);

        let height = self.height.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(TxReceipt::new(format!("MOCKTX{:08}", height), height, 200_000, 150_000))
    }
}

struct ActiveCall<'a> {
    chain: &'a MockChain,
}

impl Drop for ActiveCall<'_> {
    fn drop(&mut self) {
        self.chain.active_calls.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ChainQueryClient for MockChain {
    async fn next_pending_id(&self) -> ChainResult<u64> {
        self.next_id_calls.fetch_add(1, Ordering::SeqCst);
        let _call = self.begin_query().await?;
        let state = self.read();
        Ok(state
            .next_id_override
            .or_else(|| state.pending.keys().next().copied())
            .unwrap_or(NO_PENDING_ID))
    }

    async fn pending_transaction(&self, id: u64) -> ChainResult<Option<PendingTransaction>> {
        self.pending_calls.fetch_add(1, Ordering::SeqCst);
        let _call = self.begin_query().await?;
        Ok(self.read().pending.get(&id).cloned())
    }

    async fn wallet_risk_data(&self) -> ChainResult<Vec<WalletRiskEntry>> {
        let _call = self.begin_query().await?;
        Ok(self.wallets())
    }
}

#[async_trait]
impl ChainExecuteClient for MockChain {
    async fn submit_verdict(&self, verdict: &AmlVerdict) -> ChainResult<TxReceipt> {
        self.apply(ExecuteMsg::from(verdict)).await
    }

    async fn submit_wallet_update(
        &self,
        entries: &[WalletRiskEntry],
        signature_base64: &str,
    ) -> ChainResult<TxReceipt> {
        self.apply(ExecuteMsg::OracleDataUpdate {
            data: entries.to_vec(),
            signature: signature_base64.to_string(),
        })
        .await
    }

    async fn delete_wallet_entry(&self, wallet: &str) -> ChainResult<TxReceipt> {
        self.apply(ExecuteMsg::DeleteWallet {
            wallet: wallet.to_string(),
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aml_oracle_core::{Coin, RiskScore};

    fn pending(id: u64) -> PendingTransaction {
        PendingTransaction::new(id, "wasm1sender", "wasm1recipient", Coin::new("500", "ustake"))
    }

    #[tokio::test]
    async fn test_empty_chain_has_nothing_pending() {
        let chain = MockChain::new();
        assert_eq!(chain.next_pending_id().await.unwrap(), NO_PENDING_ID);
        assert_eq!(chain.pending_transaction(1).await.unwrap(), None);
        assert_eq!(chain.next_id_calls(), 1);
        assert_eq!(chain.pending_calls(), 1);
    }

    #[tokio::test]
    async fn test_verdict_resolves_pending() {
        let chain = MockChain::new();
        chain.add_pending(pending(7));
        assert_eq!(chain.next_pending_id().await.unwrap(), 7);
        assert!(chain.is_pending(7).await.unwrap());

        let verdict = AmlVerdict::new(true, false, "", RiskScore::new(5).unwrap()).with_request_id(7);
        let receipt = chain.submit_verdict(&verdict).await.unwrap();
        assert_eq!(receipt.height, 1);

        assert!(!chain.is_pending(7).await.unwrap());
        assert_eq!(chain.next_pending_id().await.unwrap(), NO_PENDING_ID);
        assert_eq!(chain.executed(), vec![ExecuteMsg::from(&verdict)]);
    }

    #[tokio::test]
    async fn test_verdict_for_unknown_id_rejected() {
        let chain = MockChain::new();
        let verdict = AmlVerdict::fail_safe().with_request_id(3);
        let err = chain.submit_verdict(&verdict).await.unwrap_err();
        assert!(err.is_rejection());
        assert_eq!(chain.execute_attempts(), 1);
        assert!(chain.executed().is_empty());
    }

    #[tokio::test]
    async fn test_wallet_update_and_delete() {
        let chain = MockChain::new();
        let entries = vec![
            WalletRiskEntry::new("wasm1a", "sanctioned", RiskScore::new(90).unwrap()),
            WalletRiskEntry::new("wasm1b", "mixer", RiskScore::new(40).unwrap()),
        ];
        chain.submit_wallet_update(&entries, "c2ln").await.unwrap();
        assert_eq!(chain.wallet_risk_data().await.unwrap(), entries);

        chain.delete_wallet_entry("wasm1a").await.unwrap();
        let remaining = chain.wallet_risk_data().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].wallet, "wasm1b");
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let chain = MockChain::new();
        chain.fail_queries("node down");
        chain.fail_executes(11, "out of gas");

        assert!(chain.next_pending_id().await.unwrap_err().is_transport());
        assert!(chain.delete_wallet_entry("wasm1a").await.unwrap_err().is_rejection());

        chain.heal();
        assert!(chain.next_pending_id().await.is_ok());
        assert!(chain.delete_wallet_entry("wasm1a").await.is_ok());
    }

    #[tokio::test]
    async fn test_concurrency_tracking() {
        let chain = MockChain::new();
        chain.set_query_delay(Duration::from_millis(20));
        let (a, b) = tokio::join!(chain.next_pending_id(), chain.next_pending_id());
        assert!(a.is_ok() && b.is_ok());
        assert_eq!(chain.max_concurrent_calls(), 2);
    }
}
