//! AML Oracle node
//!
//! Process-level pieces of the `aml-oracle` binary: configuration loading,
//! component wiring and logging setup.

pub mod config;
pub mod context;
pub mod logging;

pub use config::{ConfigError, OracleConfig};
pub use context::OracleContext;
pub use logging::init_logging;
