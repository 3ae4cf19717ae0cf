//! AML Oracle chain clients
//!
//! Talks to the oracle CosmWasm contract:
//! - `ChainQueryClient`: smart queries (next pending id, pending transfer, wallet data)
//! - `ChainExecuteClient`: signed execute transactions from the oracle account
//! - `RestQueryClient` / `SigningChainClient`: implementations over the node's REST gateway
//! - `MockChain`: in-memory contract for tests

mod client;
mod config;
mod error;
mod execute;
mod lcd;
mod mock;
mod msg;
mod query;

pub use client::{ChainExecuteClient, ChainQueryClient};
pub use config::{adjusted_gas, ChainConfig, GasPrice};
pub use error::{ChainError, ChainResult};
pub use execute::SigningChainClient;
pub use lcd::{BaseAccount, TxResponse};
pub use mock::MockChain;
pub use msg::{ExecuteMsg, PendingTxResponse, QueryMsg};
pub use query::RestQueryClient;
