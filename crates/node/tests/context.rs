//! Startup wiring

use aml_oracle_node::config::{
    ENV_AML_API, ENV_CHAIN_ID, ENV_CONTRACT_ADDRESS, ENV_ORACLE_PRIVKEY, ENV_POLL_INTERVAL_MS, ENV_RPC_URL,
};
use aml_oracle_node::{OracleConfig, OracleContext};
use aml_oracle_signer::SigningService;
use std::collections::HashMap;

const KEY: &str = "0101010101010101010101010101010101010101010101010101010101010101";

fn contract_address() -> String {
    SigningService::from_hex(&"02".repeat(32))
        .unwrap()
        .account_id("wasm")
        .unwrap()
        .to_string()
}

fn config(key: &str) -> OracleConfig {
    let vars: HashMap<&str, String> = HashMap::from([
        (ENV_RPC_URL, "http://127.0.0.1:1317".to_string()),
        (ENV_CONTRACT_ADDRESS, contract_address()),
        (ENV_AML_API, "http://127.0.0.1:8080/check".to_string()),
        (ENV_ORACLE_PRIVKEY, key.to_string()),
        // Known chain id: no node round-trip during init
        (ENV_CHAIN_ID, "testing".to_string()),
        (ENV_POLL_INTERVAL_MS, "2500".to_string()),
    ]);
    OracleConfig::from_lookup(|k| vars.get(k).cloned()).unwrap()
}

#[tokio::test]
async fn test_init_wires_components() {
    let ctx = OracleContext::init(config(KEY)).await.unwrap();
    let expected = SigningService::from_hex(KEY).unwrap().account_id("wasm").unwrap();

    assert_eq!(ctx.chain.sender(), &expected);
    assert_eq!(ctx.chain.chain_id(), "testing");

    let state = ctx.app_state().unwrap();
    assert_eq!(state.oracle_address, expected.to_string());
    assert_eq!(state.address_prefix, "wasm");

    assert_eq!(ctx.scheduler().config().poll_interval_ms, 2500);
    assert_eq!(ctx.provider.config().timeout_ms, 5000);
}

#[tokio::test]
async fn test_init_rejects_bad_key() {
    let err = OracleContext::init(config("not-hex")).await.err().unwrap();
    assert!(format!("{:#}", err).contains("private key"));
}

#[tokio::test]
async fn test_init_rejects_invalid_contract_address() {
    let mut config = config(KEY);
    config.contract_address = "wasm1notbech32".to_string();
    assert!(OracleContext::init(config).await.is_err());
}
