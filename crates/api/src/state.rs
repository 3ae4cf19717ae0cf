//! Application state

use aml_oracle_chain::ChainExecuteClient;
use aml_oracle_signer::{SignerError, SigningService};
use std::sync::Arc;

/// Shared application state
///
/// Only constructible from a ready chain client and signer, so no handler can
/// run before the oracle is initialized.
#[derive(Clone)]
pub struct AppState {
    pub chain: Arc<dyn ChainExecuteClient>,
    pub signer: Arc<SigningService>,
    pub address_prefix: String,
    pub oracle_address: String,
}

impl AppState {
    pub fn new(
        chain: Arc<dyn ChainExecuteClient>,
        signer: Arc<SigningService>,
        address_prefix: impl Into<String>,
    ) -> Result<Self, SignerError> {
        let address_prefix = address_prefix.into();
        let oracle_address = signer.account_id(&address_prefix)?.to_string();
        Ok(Self {
            chain,
            signer,
            address_prefix,
            oracle_address,
        })
    }
}
