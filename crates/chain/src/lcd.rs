//! Cosmos SDK REST (LCD) request and response bodies
//!
//! The gateway renders 64-bit integers as strings; `de_u64` accepts both.

use serde::{Deserialize, Deserializer, Serialize};

pub(crate) const BROADCAST_MODE_SYNC: &str = "BROADCAST_MODE_SYNC";

#[derive(Debug, Deserialize)]
pub(crate) struct SmartQueryResponse<T> {
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AccountResponse {
    pub account: BaseAccount,
}

/// Signing state of the oracle account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct BaseAccount {
    #[serde(default, deserialize_with = "de_u64")]
    pub account_number: u64,
    #[serde(default, deserialize_with = "de_u64")]
    pub sequence: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NodeInfoResponse {
    pub default_node_info: DefaultNodeInfo,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DefaultNodeInfo {
    pub network: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct SimulateRequest<'a> {
    pub tx_bytes: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SimulateResponse {
    pub gas_info: GasInfo,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GasInfo {
    #[serde(default, deserialize_with = "de_u64")]
    pub gas_used: u64,
}

#[derive(Debug, Serialize)]
pub(crate) struct BroadcastRequest<'a> {
    pub tx_bytes: &'a str,
    pub mode: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TxResponseEnvelope {
    pub tx_response: TxResponse,
}

/// Node's view of a broadcast or included transaction
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TxResponse {
    pub txhash: String,
    #[serde(default)]
    pub code: u32,
    #[serde(default)]
    pub raw_log: String,
    #[serde(default, deserialize_with = "de_u64")]
    pub height: u64,
    #[serde(default, deserialize_with = "de_u64")]
    pub gas_wanted: u64,
    #[serde(default, deserialize_with = "de_u64")]
    pub gas_used: u64,
}

/// gRPC-gateway error body
#[derive(Debug, Deserialize)]
pub(crate) struct GatewayError {
    #[serde(default)]
    pub code: u32,
    #[serde(default)]
    pub message: String,
}

fn de_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Number {
        Text(String),
        Int(u64),
    }

    match Number::deserialize(deserializer)? {
        Number::Text(s) => s.parse().map_err(serde::de::Error::custom),
        Number::Int(n) => Ok(n),
    }
}
