//! Process configuration
//!
//! Loaded from environment variables or from a JSON file, then validated
//! before anything talks to the network. The oracle private key is only ever
//! read from the environment and never serialized or printed.

use aml_oracle_chain::ChainConfig;
use aml_oracle_scheduler::SchedulerConfig;
use aml_oracle_signer::CanonicalSchema;
use aml_oracle_verdict::AmlConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

pub const ENV_RPC_URL: &str = "RPC_URL";
pub const ENV_CONTRACT_ADDRESS: &str = "CONTRACT_ADDRESS";
pub const ENV_AML_API: &str = "AML_API";
pub const ENV_ORACLE_PRIVKEY: &str = "ORACLE_PRIVKEY";
pub const ENV_CHAIN_PREFIX: &str = "CHAIN_PREFIX";
pub const ENV_CHAIN_ID: &str = "CHAIN_ID";
pub const ENV_GAS_PRICE: &str = "GAS_PRICE";
pub const ENV_GAS_ADJUSTMENT: &str = "GAS_ADJUSTMENT";
pub const ENV_CHAIN_TIMEOUT_MS: &str = "CHAIN_TIMEOUT_MS";
pub const ENV_INCLUSION_TIMEOUT_MS: &str = "INCLUSION_TIMEOUT_MS";
pub const ENV_AML_TIMEOUT_MS: &str = "AML_TIMEOUT_MS";
pub const ENV_POLL_INTERVAL_MS: &str = "POLL_INTERVAL_MS";
pub const ENV_BIND_ADDR: &str = "BIND_ADDR";
pub const ENV_CANONICAL_SCHEMA: &str = "CANONICAL_SCHEMA";

/// Configuration errors; all of them are fatal at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Oracle node configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Chain node REST endpoint
    pub rpc_url: String,

    pub contract_address: String,

    /// AML decision service endpoint
    pub aml_api: String,

    // === Chain ===
    #[serde(default = "default_chain_prefix")]
    pub chain_prefix: String,

    /// Resolved from the node when absent
    #[serde(default)]
    pub chain_id: Option<String>,

    #[serde(default = "default_gas_price")]
    pub gas_price: String,

    #[serde(default = "default_gas_adjustment")]
    pub gas_adjustment: f64,

    #[serde(default = "default_chain_timeout_ms")]
    pub chain_timeout_ms: u64,

    #[serde(default = "default_inclusion_timeout_ms")]
    pub inclusion_timeout_ms: u64,

    // === AML service ===
    #[serde(default = "default_aml_timeout_ms")]
    pub aml_timeout_ms: u64,

    // === Scheduler ===
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    // === Admin API ===
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Signed payload layout for wallet batches
    #[serde(default)]
    pub canonical_schema: CanonicalSchema,

    /// Hex secret, environment only
    #[serde(skip)]
    pub oracle_privkey: String,
}

fn default_chain_prefix() -> String {
    "wasm".to_string()
}

fn default_gas_price() -> String {
    "0.025ustake".to_string()
}

fn default_gas_adjustment() -> f64 {
    1.3
}

fn default_chain_timeout_ms() -> u64 {
    10_000
}

fn default_inclusion_timeout_ms() -> u64 {
    30_000
}

fn default_aml_timeout_ms() -> u64 {
    5_000
}

fn default_poll_interval_ms() -> u64 {
    10_000
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

impl OracleConfig {
    /// Load from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from a JSON file; the private key still comes from the environment
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_file_with_lookup(path, |key| std::env::var(key).ok())
    }

    pub fn from_file_with_lookup<F>(path: impl AsRef<Path>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = serde_json::from_str(&content)?;
        config.oracle_privkey = lookup(ENV_ORACLE_PRIVKEY).unwrap_or_default();
        Ok(config)
    }

    /// Load through an arbitrary variable lookup (the environment in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &'static str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        Ok(Self {
            rpc_url: required(ENV_RPC_URL)?,
            contract_address: required(ENV_CONTRACT_ADDRESS)?,
            aml_api: required(ENV_AML_API)?,
            chain_prefix: get(ENV_CHAIN_PREFIX).unwrap_or_else(default_chain_prefix),
            chain_id: get(ENV_CHAIN_ID),
            gas_price: get(ENV_GAS_PRICE).unwrap_or_else(default_gas_price),
            gas_adjustment: parse_or(ENV_GAS_ADJUSTMENT, get(ENV_GAS_ADJUSTMENT), default_gas_adjustment)?,
            chain_timeout_ms: parse_or(ENV_CHAIN_TIMEOUT_MS, get(ENV_CHAIN_TIMEOUT_MS), default_chain_timeout_ms)?,
            inclusion_timeout_ms: parse_or(
                ENV_INCLUSION_TIMEOUT_MS,
                get(ENV_INCLUSION_TIMEOUT_MS),
                default_inclusion_timeout_ms,
            )?,
            aml_timeout_ms: parse_or(ENV_AML_TIMEOUT_MS, get(ENV_AML_TIMEOUT_MS), default_aml_timeout_ms)?,
            poll_interval_ms: parse_or(ENV_POLL_INTERVAL_MS, get(ENV_POLL_INTERVAL_MS), default_poll_interval_ms)?,
            bind_addr: get(ENV_BIND_ADDR).unwrap_or_else(default_bind_addr),
            canonical_schema: parse_or(ENV_CANONICAL_SCHEMA, get(ENV_CANONICAL_SCHEMA), CanonicalSchema::default)?,
            oracle_privkey: required(ENV_ORACLE_PRIVKEY)?,
        })
    }

    /// Check everything that can be checked offline
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            (ENV_RPC_URL, &self.rpc_url),
            (ENV_CONTRACT_ADDRESS, &self.contract_address),
            (ENV_AML_API, &self.aml_api),
            (ENV_ORACLE_PRIVKEY, &self.oracle_privkey),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Missing(key));
            }
        }

        for (key, url) in [(ENV_RPC_URL, &self.rpc_url), (ENV_AML_API, &self.aml_api)] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::Invalid {
                    key,
                    message: format!("expected an http(s) URL, got {}", url),
                });
            }
        }

        if self.chain_prefix.is_empty() || !self.chain_prefix.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()) {
            return Err(ConfigError::Invalid {
                key: ENV_CHAIN_PREFIX,
                message: format!("{:?} is not a bech32 prefix", self.chain_prefix),
            });
        }

        for (key, value) in [
            (ENV_POLL_INTERVAL_MS, self.poll_interval_ms),
            (ENV_CHAIN_TIMEOUT_MS, self.chain_timeout_ms),
            (ENV_AML_TIMEOUT_MS, self.aml_timeout_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    key,
                    message: "must be greater than zero".to_string(),
                });
            }
        }

        self.bind_addr.parse::<SocketAddr>().map_err(|e| ConfigError::Invalid {
            key: ENV_BIND_ADDR,
            message: e.to_string(),
        })?;

        self.chain_config().validate().map_err(|e| ConfigError::Invalid {
            key: ENV_GAS_PRICE,
            message: e.to_string(),
        })?;

        Ok(())
    }

    pub fn chain_config(&self) -> ChainConfig {
        let mut chain = ChainConfig::new(&self.rpc_url, &self.contract_address);
        chain.address_prefix = self.chain_prefix.clone();
        chain.gas_price = self.gas_price.clone();
        chain.gas_adjustment = self.gas_adjustment;
        chain.chain_id = self.chain_id.clone();
        chain.request_timeout_ms = self.chain_timeout_ms;
        chain.inclusion_timeout_ms = self.inclusion_timeout_ms;
        chain
    }

    pub fn aml_config(&self) -> AmlConfig {
        AmlConfig::new(&self.aml_api).with_timeout_ms(self.aml_timeout_ms)
    }

    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig::with_interval_ms(self.poll_interval_ms)
    }
}

fn parse_or<T, D>(key: &'static str, raw: Option<String>, default: D) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
    D: FnOnce() -> T,
{
    match raw {
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            message: format!("{:?}: {}", raw, e),
        }),
        None => Ok(default()),
    }
}

impl fmt::Debug for OracleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OracleConfig")
            .field("rpc_url", &self.rpc_url)
            .field("contract_address", &self.contract_address)
            .field("aml_api", &self.aml_api)
            .field("chain_prefix", &self.chain_prefix)
            .field("chain_id", &self.chain_id)
            .field("gas_price", &self.gas_price)
            .field("gas_adjustment", &self.gas_adjustment)
            .field("chain_timeout_ms", &self.chain_timeout_ms)
            .field("inclusion_timeout_ms", &self.inclusion_timeout_ms)
            .field("aml_timeout_ms", &self.aml_timeout_ms)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .field("bind_addr", &self.bind_addr)
            .field("canonical_schema", &self.canonical_schema)
            .field("oracle_privkey", &"<redacted>")
            .finish()
    }
}
