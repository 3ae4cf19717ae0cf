//! AML decision service settings

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the HTTP verdict provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmlConfig {
    /// Endpoint receiving `POST {sender, recipient, amount, denom}`
    pub url: String,

    /// Request timeout; a slow service yields the fail-safe verdict
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    5_000
}

impl AmlConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout_ms: default_timeout_ms(),
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
