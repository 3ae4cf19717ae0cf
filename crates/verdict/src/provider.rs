//! Verdict provider trait and the fixed-answer provider

use aml_oracle_core::{AmlVerdict, PendingTransaction, RiskScore};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

/// Source of AML decisions for pending transfers.
///
/// `evaluate` is infallible: implementations resolve their own failures into
/// [`AmlVerdict::fail_safe`]. The returned verdict has `request_id = 0`.
#[async_trait]
pub trait AmlVerdictProvider: Send + Sync {
    /// Provider name for logs
    fn name(&self) -> &str;

    async fn evaluate(&self, tx: &PendingTransaction) -> AmlVerdict;
}

/// Returns the same verdict for every transfer and records what it saw
#[derive(Debug)]
pub struct StaticVerdictProvider {
    verdict: AmlVerdict,
    calls: AtomicUsize,
    seen: Mutex<Vec<u64>>,
}

impl StaticVerdictProvider {
    pub fn new(verdict: AmlVerdict) -> Self {
        Self {
            verdict,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Always approve with zero risk
    pub fn approve_all() -> Self {
        Self::new(AmlVerdict::new(true, false, "", RiskScore::MIN))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Ids of the transfers evaluated so far
    pub fn seen(&self) -> Vec<u64> {
        self.seen.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[async_trait]
impl AmlVerdictProvider for StaticVerdictProvider {
    fn name(&self) -> &str {
        "static"
    }

    async fn evaluate(&self, tx: &PendingTransaction) -> AmlVerdict {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap_or_else(PoisonError::into_inner).push(tx.id);
        self.verdict.clone().with_request_id(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aml_oracle_core::Coin;

    #[tokio::test]
    async fn test_static_provider_counts_calls() {
        let verdict = AmlVerdict::new(false, true, "ofac", RiskScore::new(80).unwrap());
        let provider = StaticVerdictProvider::new(verdict.clone());
        let tx = PendingTransaction::new(3, "wasm1s", "wasm1r", Coin::new("1", "ustake"));

        assert_eq!(provider.evaluate(&tx).await, verdict);
        assert_eq!(provider.evaluate(&tx).await, verdict);
        assert_eq!(provider.calls(), 2);
        assert_eq!(provider.seen(), vec![3, 3]);
    }

    #[tokio::test]
    async fn test_request_id_is_never_set() {
        let provider = StaticVerdictProvider::new(AmlVerdict::fail_safe().with_request_id(9));
        let tx = PendingTransaction::new(3, "wasm1s", "wasm1r", Coin::new("1", "ustake"));
        assert_eq!(provider.evaluate(&tx).await.request_id, 0);
    }
}
