//! Signed execute transactions for the oracle account

use aml_oracle_core::{AmlVerdict, PendingTransaction, TxReceipt, WalletRiskEntry};
use aml_oracle_signer::{SignerError, SigningService};
use async_trait::async_trait;
use cosmrs::cosmwasm::MsgExecuteContract;
use cosmrs::tendermint::chain;
use cosmrs::tx::{self, Fee, Msg, SignDoc, SignerInfo};
use cosmrs::{AccountId, Coin, Denom};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::client::{ChainExecuteClient, ChainQueryClient};
use crate::config::{adjusted_gas, ChainConfig, GasPrice};
use crate::error::{ChainError, ChainResult};
use crate::lcd::BaseAccount;
use crate::msg::ExecuteMsg;
use crate::query::RestQueryClient;

/// Contract client that signs with the oracle key.
///
/// Flow per execute: fetch account -> simulate -> sign with adjusted fee ->
/// broadcast (sync) -> poll for inclusion. The whole flow runs under one
/// mutex, so two broadcasts never share a sequence number.
pub struct SigningChainClient {
    query: RestQueryClient,
    signer: Arc<SigningService>,
    sender: AccountId,
    contract: AccountId,
    chain_id: chain::Id,
    gas_price: GasPrice,
    fee_denom: Denom,
    gas_adjustment: f64,
    inclusion_timeout: Duration,
    inclusion_poll: Duration,
    broadcast_lock: Mutex<()>,
}

impl SigningChainClient {
    /// Build the client, resolving the chain id from the node when not configured
    pub async fn connect(config: &ChainConfig, signer: Arc<SigningService>) -> ChainResult<Self> {
        let query = RestQueryClient::new(config)?;
        let chain_id = match &config.chain_id {
            Some(id) => id.clone(),
            None => {
                let id = query.chain_id().await?;
                info!(chain_id = %id, "Resolved chain id from node");
                id
            }
        };
        Self::with_chain_id(query, config, signer, &chain_id)
    }

    fn with_chain_id(
        query: RestQueryClient,
        config: &ChainConfig,
        signer: Arc<SigningService>,
        chain_id: &str,
    ) -> ChainResult<Self> {
        let sender = signer.account_id(&config.address_prefix)?;
        let contract: AccountId = config
            .contract_address
            .parse()
            .map_err(|e| ChainError::Config(format!("contract address: {}", e)))?;
        let chain_id: chain::Id = chain_id
            .parse()
            .map_err(|e| ChainError::Config(format!("chain id {:?}: {}", chain_id, e)))?;
        let gas_price: GasPrice = config.gas_price.parse()?;
        let fee_denom: Denom = gas_price
            .denom
            .parse()
            .map_err(|e| ChainError::Config(format!("fee denom {:?}: {}", gas_price.denom, e)))?;

        Ok(Self {
            query,
            signer,
            sender,
            contract,
            chain_id,
            gas_price,
            fee_denom,
            gas_adjustment: config.gas_adjustment,
            inclusion_timeout: config.inclusion_timeout(),
            inclusion_poll: config.inclusion_poll(),
            broadcast_lock: Mutex::new(()),
        })
    }

    /// Oracle account address
    pub fn sender(&self) -> &AccountId {
        &self.sender
    }

    pub fn chain_id(&self) -> &str {
        self.chain_id.as_str()
    }

    /// Sign, broadcast and confirm one contract execution
    pub async fn execute(&self, msg: &ExecuteMsg) -> ChainResult<TxReceipt> {
        let _guard = self.broadcast_lock.lock().await;

        let payload = serde_json::to_vec(msg).map_err(|e| ChainError::Decode(e.to_string()))?;
        let any = MsgExecuteContract {
            sender: self.sender.clone(),
            contract: self.contract.clone(),
            msg: payload,
            funds: vec![],
        }
        .to_any()
        .map_err(|e| ChainError::Decode(e.to_string()))?;
        let body = tx::Body::new(vec![any], "", 0u32);

        let account = self.query.account(self.sender.as_ref()).await?;

        let probe = self.sign(&body, self.fee(0)?, &account)?;
        let simulated = self.query.simulate(&probe).await?;
        let gas_limit = adjusted_gas(simulated, self.gas_adjustment);
        debug!(kind = msg.kind(), simulated, gas_limit, "Simulated execute");

        let signed = self.sign(&body, self.fee(gas_limit)?, &account)?;
        let broadcast = self.query.broadcast(&signed).await?;
        info!(kind = msg.kind(), tx_hash = %broadcast.txhash, sequence = account.sequence, "Broadcast execute");

        let included = self
            .query
            .wait_for_inclusion(&broadcast.txhash, self.inclusion_timeout, self.inclusion_poll)
            .await
            .map_err(|e| {
                warn!(kind = msg.kind(), tx_hash = %broadcast.txhash, error = %e, "Execute not confirmed");
                e
            })?;

        Ok(TxReceipt::new(
            included.txhash,
            included.height,
            included.gas_wanted,
            included.gas_used,
        ))
    }

    fn fee(&self, gas_limit: u64) -> ChainResult<Fee> {
        let amount = Coin {
            denom: self.fee_denom.clone(),
            amount: self.gas_price.fee_for(gas_limit)?,
        };
        Ok(Fee::from_amount_and_gas(amount, gas_limit))
    }

    fn sign(&self, body: &tx::Body, fee: Fee, account: &BaseAccount) -> ChainResult<Vec<u8>> {
        let signer_info = SignerInfo::single_direct(Some(self.signer.tx_public_key()?), account.sequence);
        let auth_info = signer_info.auth_info(fee);
        let sign_doc = SignDoc::new(body, &auth_info, &self.chain_id, account.account_number)
            .map_err(|e| ChainError::Signing(SignerError::Tx(e.to_string())))?;
        let raw = self.signer.sign_tx(sign_doc)?;
        raw.to_bytes()
            .map_err(|e| ChainError::Signing(SignerError::Tx(e.to_string())))
    }
}

#[async_trait]
impl ChainQueryClient for SigningChainClient {
    async fn next_pending_id(&self) -> ChainResult<u64> {
        self.query.next_pending_id().await
    }

    async fn pending_transaction(&self, id: u64) -> ChainResult<Option<PendingTransaction>> {
        self.query.pending_transaction(id).await
    }

    async fn wallet_risk_data(&self) -> ChainResult<Vec<WalletRiskEntry>> {
        self.query.wallet_risk_data().await
    }
}

#[async_trait]
impl ChainExecuteClient for SigningChainClient {
    async fn submit_verdict(&self, verdict: &AmlVerdict) -> ChainResult<TxReceipt> {
        self.execute(&ExecuteMsg::from(verdict)).await
    }

    async fn submit_wallet_update(
        &self,
        entries: &[WalletRiskEntry],
        signature_base64: &str,
    ) -> ChainResult<TxReceipt> {
        self.execute(&ExecuteMsg::OracleDataUpdate {
            data: entries.to_vec(),
            signature: signature_base64.to_string(),
        })
        .await
    }

    async fn delete_wallet_entry(&self, wallet: &str) -> ChainResult<TxReceipt> {
        self.execute(&ExecuteMsg::DeleteWallet {
            wallet: wallet.to_string(),
        })
        .await
    }
}
