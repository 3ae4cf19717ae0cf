//! AML Oracle polling scheduler
//!
//! Periodically asks the contract for the next pending transfer, obtains a
//! verdict from an [`aml_oracle_verdict::AmlVerdictProvider`] and submits it
//! back through an [`aml_oracle_chain::ChainExecuteClient`].

mod config;
mod scheduler;

pub use config::SchedulerConfig;
pub use scheduler::{CycleOutcome, PollingScheduler};
