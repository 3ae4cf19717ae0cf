//! AML verdict attached to a pending transaction

use serde::{Deserialize, Serialize};

use crate::risk::RiskScore;

/// Reason carried by the fail-safe verdict
pub const FAIL_SAFE_REASON: &str = "AML API error";

/// Decision recorded on-chain for one pending transaction.
///
/// Providers build verdicts with `request_id = 0`; the scheduler attaches the
/// id of the transaction it fetched before submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmlVerdict {
    pub request_id: u64,
    pub approved: bool,
    pub flagged: bool,
    pub reason: String,
    pub risk_score: RiskScore,
}

impl AmlVerdict {
    /// Create a verdict without a request id
    pub fn new(approved: bool, flagged: bool, reason: impl Into<String>, risk_score: RiskScore) -> Self {
        Self {
            request_id: 0,
            approved,
            flagged,
            reason: reason.into(),
            risk_score,
        }
    }

    /// Conservative verdict used when the decision service cannot answer:
    /// not approved, flagged, maximum risk.
    pub fn fail_safe() -> Self {
        Self::new(false, true, FAIL_SAFE_REASON, RiskScore::MAX)
    }

    /// Attach the id of the transaction this verdict answers
    pub fn with_request_id(mut self, request_id: u64) -> Self {
        self.request_id = request_id;
        self
    }

    /// Check if this is the fail-safe verdict
    pub fn is_fail_safe(&self) -> bool {
        !self.approved && self.flagged && self.reason == FAIL_SAFE_REASON && self.risk_score == RiskScore::MAX
    }
}
