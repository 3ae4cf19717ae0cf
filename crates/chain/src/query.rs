//! REST (LCD) client for contract smart queries and node endpoints

use aml_oracle_core::{PendingTransaction, WalletRiskData, WalletRiskEntry, NO_PENDING_ID};
use async_trait::async_trait;
use base64::engine::general_purpose::{STANDARD as BASE64, URL_SAFE};
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use crate::client::ChainQueryClient;
use crate::config::ChainConfig;
use crate::error::{ChainError, ChainResult};
use crate::lcd::{
    AccountResponse, BaseAccount, BroadcastRequest, GatewayError, NodeInfoResponse, SimulateRequest,
    SimulateResponse, SmartQueryResponse, TxResponse, TxResponseEnvelope, BROADCAST_MODE_SYNC,
};
use crate::msg::{PendingTxResponse, QueryMsg};

/// Read-only contract client over the node's REST gateway
#[derive(Debug, Clone)]
pub struct RestQueryClient {
    http: reqwest::Client,
    base_url: String,
    contract: String,
}

impl RestQueryClient {
    pub fn new(config: &ChainConfig) -> ChainResult<Self> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            http,
            base_url: config.rest_url.trim_end_matches('/').to_string(),
            contract: config.contract_address.clone(),
        })
    }

    pub fn contract(&self) -> &str {
        &self.contract
    }

    /// Run a smart query against the oracle contract
    pub async fn smart_query<T: DeserializeOwned>(&self, msg: &QueryMsg) -> ChainResult<T> {
        let encoded = URL_SAFE.encode(serde_json::to_vec(msg).map_err(|e| ChainError::Decode(e.to_string()))?);
        let path = format!("/cosmwasm/wasm/v1/contract/{}/smart/{}", self.contract, encoded);
        let response: SmartQueryResponse<T> = self.get_json(&path).await?;
        Ok(response.data)
    }

    /// Account number and sequence of a signer
    pub async fn account(&self, address: &str) -> ChainResult<BaseAccount> {
        let response: AccountResponse = self
            .get_json(&format!("/cosmos/auth/v1beta1/accounts/{}", address))
            .await?;
        Ok(response.account)
    }

    /// Chain id reported by the node
    pub async fn chain_id(&self) -> ChainResult<String> {
        let response: NodeInfoResponse = self
            .get_json("/cosmos/base/tendermint/v1beta1/node_info")
            .await?;
        Ok(response.default_node_info.network)
    }

    /// Gas a signed transaction would consume.
    ///
    /// A failing simulation means the contract would reject the message, so a
    /// gateway error body is reported as a rejection.
    pub async fn simulate(&self, tx_bytes: &[u8]) -> ChainResult<u64> {
        let encoded = BASE64.encode(tx_bytes);
        let result: ChainResult<SimulateResponse> = self
            .post_json("/cosmos/tx/v1beta1/simulate", &SimulateRequest { tx_bytes: &encoded })
            .await;
        match result {
            Ok(response) => Ok(response.gas_info.gas_used),
            Err(ChainError::Status { status, body }) => match serde_json::from_str::<GatewayError>(&body) {
                Ok(gateway) if !gateway.message.is_empty() => Err(ChainError::rejected(gateway.code, gateway.message)),
                _ => Err(ChainError::Status { status, body }),
            },
            Err(e) => Err(e),
        }
    }

    /// Broadcast in sync mode; fails when CheckTx rejects the transaction
    pub async fn broadcast(&self, tx_bytes: &[u8]) -> ChainResult<TxResponse> {
        let encoded = BASE64.encode(tx_bytes);
        let request = BroadcastRequest {
            tx_bytes: &encoded,
            mode: BROADCAST_MODE_SYNC,
        };
        let response: TxResponseEnvelope = self.post_json("/cosmos/tx/v1beta1/txs", &request).await?;
        check_code(response.tx_response)
    }

    /// Poll until the transaction is in a block; fails when DeliverTx rejected it
    pub async fn wait_for_inclusion(
        &self,
        tx_hash: &str,
        timeout: Duration,
        poll: Duration,
    ) -> ChainResult<TxResponse> {
        let started = Instant::now();
        let path = format!("/cosmos/tx/v1beta1/txs/{}", tx_hash);
        loop {
            match self.get_json::<TxResponseEnvelope>(&path).await {
                Ok(found) => return check_code(found.tx_response),
                Err(ChainError::Status { status, .. }) => {
                    debug!(tx_hash = %tx_hash, status, "Transaction not yet included");
                }
                Err(e) => return Err(e),
            }

            if started.elapsed() >= timeout {
                return Err(ChainError::InclusionTimeout {
                    tx_hash: tx_hash.to_string(),
                    waited_ms: started.elapsed().as_millis() as u64,
                });
            }
            tokio::time::sleep(poll).await;
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ChainResult<T> {
        let response = self.http.get(format!("{}{}", self.base_url, path)).send().await?;
        decode(response).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> ChainResult<T> {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ChainResult<T> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(ChainError::Status {
            status: status.as_u16(),
            body,
        });
    }
    serde_json::from_str(&body).map_err(|e| ChainError::Decode(format!("{}: {}", e, body)))
}

fn check_code(response: TxResponse) -> ChainResult<TxResponse> {
    if response.code != 0 {
        return Err(ChainError::Rejected {
            code: response.code,
            log: response.raw_log,
            tx_hash: Some(response.txhash),
        });
    }
    Ok(response)
}

#[async_trait]
impl ChainQueryClient for RestQueryClient {
    async fn next_pending_id(&self) -> ChainResult<u64> {
        let id: Option<u64> = self.smart_query(&QueryMsg::GetNextId {}).await?;
        Ok(id.unwrap_or(NO_PENDING_ID))
    }

    async fn pending_transaction(&self, id: u64) -> ChainResult<Option<PendingTransaction>> {
        let pending: Option<PendingTxResponse> = self.smart_query(&QueryMsg::GetPendingTx { id }).await?;
        Ok(pending.map(|p| p.into_pending(id)))
    }

    async fn wallet_risk_data(&self) -> ChainResult<Vec<WalletRiskEntry>> {
        let data: WalletRiskData = self.smart_query(&QueryMsg::GetOracleData {}).await?;
        Ok(data.data)
    }
}
