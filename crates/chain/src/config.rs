//! Chain endpoint and fee settings

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ChainError;

/// Chain client configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChainConfig {
    /// Node REST (LCD) base URL
    pub rest_url: String,

    /// Oracle contract address
    pub contract_address: String,

    /// Bech32 prefix of the chain's accounts
    #[serde(default = "default_address_prefix")]
    pub address_prefix: String,

    /// Gas price, e.g. `0.025ustake`
    #[serde(default = "default_gas_price")]
    pub gas_price: String,

    /// Multiplier applied to simulated gas
    #[serde(default = "default_gas_adjustment")]
    pub gas_adjustment: f64,

    /// Chain id; fetched from the node when absent
    #[serde(default)]
    pub chain_id: Option<String>,

    /// Per-request HTTP timeout
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// How long to wait for a broadcast transaction to land in a block
    #[serde(default = "default_inclusion_timeout_ms")]
    pub inclusion_timeout_ms: u64,

    /// Delay between inclusion checks
    #[serde(default = "default_inclusion_poll_ms")]
    pub inclusion_poll_ms: u64,
}

fn default_address_prefix() -> String {
    "wasm".to_string()
}

fn default_gas_price() -> String {
    "0.025ustake".to_string()
}

fn default_gas_adjustment() -> f64 {
    1.3
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_inclusion_timeout_ms() -> u64 {
    30_000
}

fn default_inclusion_poll_ms() -> u64 {
    1_000
}

impl ChainConfig {
    pub fn new(rest_url: impl Into<String>, contract_address: impl Into<String>) -> Self {
        Self {
            rest_url: rest_url.into(),
            contract_address: contract_address.into(),
            address_prefix: default_address_prefix(),
            gas_price: default_gas_price(),
            gas_adjustment: default_gas_adjustment(),
            chain_id: None,
            request_timeout_ms: default_request_timeout_ms(),
            inclusion_timeout_ms: default_inclusion_timeout_ms(),
            inclusion_poll_ms: default_inclusion_poll_ms(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn inclusion_timeout(&self) -> Duration {
        Duration::from_millis(self.inclusion_timeout_ms)
    }

    pub fn inclusion_poll(&self) -> Duration {
        Duration::from_millis(self.inclusion_poll_ms)
    }

    /// Check the settings that do not need the network
    pub fn validate(&self) -> Result<(), ChainError> {
        if !(self.rest_url.starts_with("http://") || self.rest_url.starts_with("https://")) {
            return Err(ChainError::Config(format!(
                "rest url must be http(s), got {}",
                self.rest_url
            )));
        }
        if self.contract_address.trim().is_empty() {
            return Err(ChainError::Config("contract address is empty".to_string()));
        }
        if !(self.gas_adjustment.is_finite() && self.gas_adjustment >= 1.0) {
            return Err(ChainError::Config(format!(
                "gas adjustment must be >= 1.0, got {}",
                self.gas_adjustment
            )));
        }
        self.gas_price.parse::<GasPrice>()?;
        Ok(())
    }
}

/// Parsed gas price: decimal amount per gas unit plus fee denom
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasPrice {
    pub amount: Decimal,
    pub denom: String,
}

impl GasPrice {
    /// Fee for a gas limit, rounded up to a whole base unit
    pub fn fee_for(&self, gas_limit: u64) -> Result<u128, ChainError> {
        (Decimal::from(gas_limit) * self.amount)
            .ceil()
            .to_u128()
            .ok_or_else(|| ChainError::Config(format!("fee overflow for gas {}", gas_limit)))
    }
}

impl FromStr for GasPrice {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(|| ChainError::Config(format!("gas price {:?} has no denom", s)))?;
        let (amount, denom) = s.split_at(split);
        let amount = Decimal::from_str(amount)
            .map_err(|e| ChainError::Config(format!("gas price {:?}: {}", s, e)))?;
        if amount.is_sign_negative() {
            return Err(ChainError::Config(format!("gas price {:?} is negative", s)));
        }
        Ok(Self {
            amount,
            denom: denom.to_string(),
        })
    }
}

impl fmt::Display for GasPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// Gas limit after applying the adjustment to a simulated amount
pub fn adjusted_gas(simulated: u64, adjustment: f64) -> u64 {
    (simulated as f64 * adjustment).ceil() as u64
}
