//! HTTP client for the external AML decision service

use aml_oracle_core::{AmlVerdict, PendingTransaction, RiskScore};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::AmlConfig;
use crate::error::{AmlError, AmlResult};
use crate::provider::AmlVerdictProvider;

/// Request body sent for every pending transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmlRequest {
    pub sender: String,
    pub recipient: String,
    pub amount: String,
    pub denom: String,
}

impl From<&PendingTransaction> for AmlRequest {
    fn from(tx: &PendingTransaction) -> Self {
        Self {
            sender: tx.sender.clone(),
            recipient: tx.recipient.clone(),
            amount: tx.amount.amount.clone(),
            denom: tx.amount.denom.clone(),
        }
    }
}

/// Service answer. `approved` and `flagged` are mandatory; the rest default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AmlResponse {
    pub approved: bool,
    pub flagged: bool,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub risk_score: Option<f64>,
}

impl AmlResponse {
    /// Normalize into a verdict: missing reason -> "", score rounded and clamped to 0..=100
    pub fn into_verdict(self) -> AmlVerdict {
        let risk_score = self
            .risk_score
            .map(RiskScore::saturating_from_f64)
            .unwrap_or(RiskScore::MIN);
        AmlVerdict::new(
            self.approved,
            self.flagged,
            self.reason.unwrap_or_default(),
            risk_score,
        )
    }
}

/// Verdict provider backed by the AML HTTP service
#[derive(Debug, Clone)]
pub struct HttpVerdictProvider {
    http: reqwest::Client,
    config: AmlConfig,
}

impl HttpVerdictProvider {
    pub fn new(config: AmlConfig) -> AmlResult<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &AmlConfig {
        &self.config
    }

    /// One request, no retry
    pub async fn check(&self, tx: &PendingTransaction) -> AmlResult<AmlVerdict> {
        let response = self
            .http
            .post(&self.config.url)
            .json(&AmlRequest::from(tx))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AmlError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let parsed: AmlResponse =
            serde_json::from_slice(&body).map_err(|e| AmlError::Decode(e.to_string()))?;
        Ok(parsed.into_verdict())
    }
}

#[async_trait]
impl AmlVerdictProvider for HttpVerdictProvider {
    fn name(&self) -> &str {
        "http"
    }

    async fn evaluate(&self, tx: &PendingTransaction) -> AmlVerdict {
        match self.check(tx).await {
            Ok(verdict) => {
                debug!(
                    tx_id = tx.id,
                    approved = verdict.approved,
                    flagged = verdict.flagged,
                    risk_score = %verdict.risk_score,
                    "AML check finished"
                );
                verdict
            }
            Err(e) => {
                warn!(tx_id = tx.id, error = %e, "AML check failed, using fail-safe verdict");
                AmlVerdict::fail_safe()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aml_oracle_core::Coin;

    fn parse(body: &str) -> AmlVerdict {
        serde_json::from_str::<AmlResponse>(body).unwrap().into_verdict()
    }

    #[test]
    fn test_request_body() {
        let tx = PendingTransaction::new(7, "wasm1s", "wasm1r", Coin::new("500", "ustake"));
        assert_eq!(
            serde_json::to_value(AmlRequest::from(&tx)).unwrap(),
            serde_json::json!({"sender":"wasm1s","recipient":"wasm1r","amount":"500","denom":"ustake"})
        );
    }

    #[test]
    fn test_missing_optional_fields() {
        let verdict = parse(r#"{"approved":true,"flagged":false}"#);
        assert_eq!(verdict, AmlVerdict::new(true, false, "", RiskScore::MIN));
    }

    #[test]
    fn test_null_reason() {
        let verdict = parse(r#"{"approved":false,"flagged":true,"reason":null,"risk_score":60}"#);
        assert_eq!(verdict.reason, "");
        assert_eq!(verdict.risk_score.value(), 60);
    }

    #[test]
    fn test_score_rounded_and_clamped() {
        assert_eq!(parse(r#"{"approved":true,"flagged":false,"risk_score":4.6}"#).risk_score.value(), 5);
        assert_eq!(parse(r#"{"approved":true,"flagged":true,"risk_score":250}"#).risk_score.value(), 100);
        assert_eq!(parse(r#"{"approved":true,"flagged":false,"risk_score":-3}"#).risk_score.value(), 0);
    }

    #[test]
    fn test_missing_decision_is_undecodable() {
        assert!(serde_json::from_str::<AmlResponse>(r#"{"reason":"x"}"#).is_err());
    }
}
