//! API Handlers

use aml_oracle_chain::{ChainExecuteClient, ChainQueryClient};
use aml_oracle_core::{validate_entries, validate_wallet, TxReceipt, WalletRiskData, WalletRiskEntry};
use aml_oracle_signer::{KEY_TYPE, SIGNATURE_LEN};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

// ============ Request Types ============

/// Batch replacement of the flagged-wallet set
#[derive(Debug, Deserialize)]
pub struct UpdateOracleDataRequest {
    pub msg: Vec<WalletRiskEntry>,
    /// Pre-computed base64 signature; the server signs when absent
    #[serde(default)]
    pub signature: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteOracleEntryRequest {
    #[serde(default)]
    pub wallet: String,
}

// ============ Response Types ============

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateOracleDataResponse {
    pub success: bool,
    pub result: TxReceipt,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteOracleEntryResponse {
    pub status: String,
    pub wallet: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PubkeyResponse {
    pub pubkey: String,
    pub key_type: String,
    pub address: String,
}

// ============ Handlers ============

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "oracle": state.oracle_address,
    }))
}

/// Oracle public key, as registered on the contract
pub async fn oracle_pubkey(State(state): State<AppState>) -> Json<PubkeyResponse> {
    Json(PubkeyResponse {
        pubkey: state.signer.public_key_base64(),
        key_type: KEY_TYPE.to_string(),
        address: state.oracle_address.clone(),
    })
}

/// Current flagged-wallet set
pub async fn get_oracle_data(State(state): State<AppState>) -> ApiResult<Json<WalletRiskData>> {
    let data = state.chain.wallet_risk_data().await?;
    Ok(Json(WalletRiskData { data }))
}

/// Sign (or forward a pre-signed) wallet batch and submit it
pub async fn update_oracle_data(
    State(state): State<AppState>,
    payload: Result<Json<UpdateOracleDataRequest>, JsonRejection>,
) -> ApiResult<Json<UpdateOracleDataResponse>> {
    let Json(request) = payload?;
    validate_entries(&request.msg, Some(state.address_prefix.as_str()))?;

    let signature = match request.signature {
        Some(signature) => {
            check_signature(&signature)?;
            signature
        }
        None => state.signer.sign_envelope(&request.msg)?.signature_base64(),
    };

    let receipt = state.chain.submit_wallet_update(&request.msg, &signature).await?;
    info!(
        entries = request.msg.len(),
        tx_hash = %receipt.tx_hash,
        "Wallet risk data updated"
    );

    Ok(Json(UpdateOracleDataResponse {
        success: true,
        result: receipt,
    }))
}

/// Remove one wallet from the flagged set
pub async fn delete_oracle_entry(
    State(state): State<AppState>,
    payload: Result<Json<DeleteOracleEntryRequest>, JsonRejection>,
) -> ApiResult<Json<DeleteOracleEntryResponse>> {
    let Json(request) = payload?;
    validate_wallet(&request.wallet, Some(state.address_prefix.as_str()))?;

    let receipt = state.chain.delete_wallet_entry(&request.wallet).await?;
    info!(wallet = %request.wallet, tx_hash = %receipt.tx_hash, "Wallet risk entry deleted");

    Ok(Json(DeleteOracleEntryResponse {
        status: "deleted".to_string(),
        wallet: request.wallet,
    }))
}

fn check_signature(signature: &str) -> ApiResult<()> {
    let bytes = BASE64
        .decode(signature)
        .map_err(|e| ApiError::BadRequest(format!("signature is not valid base64: {}", e)))?;
    if bytes.len() != SIGNATURE_LEN {
        return Err(ApiError::BadRequest(format!(
            "signature must decode to {} bytes, got {}",
            SIGNATURE_LEN,
            bytes.len()
        )));
    }
    Ok(())
}
