//! Oracle context - wires everything together

use aml_oracle_api::AppState;
use aml_oracle_chain::SigningChainClient;
use aml_oracle_scheduler::PollingScheduler;
use aml_oracle_signer::SigningService;
use aml_oracle_verdict::HttpVerdictProvider;
use anyhow::Context;
use std::sync::Arc;
use tracing::info;

use crate::config::OracleConfig;

/// Fully initialized oracle components.
///
/// The scheduler and the admin router are only built from a context, so
/// neither can run before the key is loaded and the chain client connected.
pub struct OracleContext {
    pub config: OracleConfig,
    pub signer: Arc<SigningService>,
    pub chain: Arc<SigningChainClient>,
    pub provider: Arc<HttpVerdictProvider>,
}

impl OracleContext {
    /// Load the key, connect the chain client, build the AML provider
    pub async fn init(config: OracleConfig) -> anyhow::Result<Self> {
        config.validate().context("Invalid configuration")?;

        let signer = SigningService::from_hex(&config.oracle_privkey)
            .context("Failed to load oracle private key")?
            .with_schema(config.canonical_schema);
        let signer = Arc::new(signer);

        let chain = SigningChainClient::connect(&config.chain_config(), Arc::clone(&signer))
            .await
            .context("Failed to connect chain client")?;
        info!(
            oracle = %chain.sender(),
            chain_id = chain.chain_id(),
            contract = %config.contract_address,
            "Chain client ready"
        );

        let provider = HttpVerdictProvider::new(config.aml_config()).context("Failed to build AML client")?;

        Ok(Self {
            config,
            signer,
            chain: Arc::new(chain),
            provider: Arc::new(provider),
        })
    }

    /// Admin API state
    pub fn app_state(&self) -> anyhow::Result<AppState> {
        AppState::new(self.chain.clone(), Arc::clone(&self.signer), &self.config.chain_prefix)
            .context("Failed to derive oracle address")
    }

    /// Verdict polling loop
    pub fn scheduler(&self) -> PollingScheduler {
        PollingScheduler::new(
            self.chain.clone(),
            self.provider.clone(),
            self.config.scheduler_config(),
        )
    }
}
