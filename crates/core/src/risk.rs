//! RiskScore - Bounded integer risk score (0..=100)
//!
//! Every risk score that crosses a boundary of this system (AML service
//! response, admin API input, contract message) MUST lie in `0..=MAX_RISK_SCORE`.
//! This is enforced at the type level.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Highest risk score accepted by the contract
pub const MAX_RISK_SCORE: u8 = 100;

/// Errors that can occur when building a risk score
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RiskScoreError {
    #[error("Risk score {0} is out of range (0..=100)")]
    OutOfRange(u64),
}

/// A risk score in `0..=100`.
///
/// # Invariant
/// The inner value is always <= [`MAX_RISK_SCORE`]. This is enforced by the constructor
/// and by deserialization.
///
/// # Example
/// ```
/// use aml_oracle_core::RiskScore;
///
/// let score = RiskScore::new(90).unwrap();
/// assert_eq!(score.value(), 90);
///
/// // Scores above 100 are rejected
/// assert!(RiskScore::new(101).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct RiskScore(u8);

impl RiskScore {
    /// Lowest risk
    pub const MIN: Self = Self(0);

    /// Highest risk, used by the fail-safe verdict
    pub const MAX: Self = Self(MAX_RISK_SCORE);

    /// Create a new RiskScore.
    ///
    /// Returns an error if the value is above [`MAX_RISK_SCORE`].
    pub fn new(value: u64) -> Result<Self, RiskScoreError> {
        if value > MAX_RISK_SCORE as u64 {
            Err(RiskScoreError::OutOfRange(value))
        } else {
            Ok(Self(value as u8))
        }
    }

    /// Build a score from an untrusted numeric value, rounding and clamping into range.
    ///
    /// NaN maps to [`RiskScore::MAX`].
    pub fn saturating_from_f64(value: f64) -> Self {
        if value.is_nan() {
            return Self::MAX;
        }
        let rounded = value.round().clamp(0.0, MAX_RISK_SCORE as f64);
        Self(rounded as u8)
    }

    /// Get the inner value
    #[inline]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for RiskScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u64> for RiskScore {
    type Error = RiskScoreError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RiskScore> for u64 {
    fn from(score: RiskScore) -> Self {
        score.0 as u64
    }
}
