//! Polling scheduler
//!
//! One cycle walks the pending-transfer lifecycle:
//!
//! ```text
//! IDLE -> next id -> FETCHING -> EVALUATING -> still pending? -> SUBMITTING -> IDLE
//!           |0          |None                     |no              |error
//!        NoPending    NotFound             AlreadyResolved     SubmitFailed
//! ```
//!
//! Cycles never overlap. A tick that arrives while a cycle is in flight is
//! dropped with [`CycleOutcome::Skipped`].

use aml_oracle_chain::{ChainExecuteClient, ChainQueryClient};
use aml_oracle_core::NO_PENDING_ID;
use aml_oracle_verdict::AmlVerdictProvider;
use std::sync::Arc;
use strum_macros::{Display, IntoStaticStr};
use tokio::sync::{watch, Mutex};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::config::SchedulerConfig;

/// How a cycle ended
#[derive(Debug, Clone, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum CycleOutcome {
    /// Contract reported no pending transfer
    NoPending,
    /// Id was reported but the transfer was not there
    NotFound(u64),
    /// Transfer resolved by someone else while it was being evaluated
    AlreadyResolved(u64),
    Submitted { id: u64, tx_hash: String },
    SubmitFailed { id: u64 },
    /// A read query failed; nothing was submitted
    QueryFailed,
    /// Previous cycle still running
    Skipped,
}

/// Drives the verdict loop
pub struct PollingScheduler {
    chain: Arc<dyn ChainExecuteClient>,
    provider: Arc<dyn AmlVerdictProvider>,
    config: SchedulerConfig,
    in_flight: Mutex<()>,
}

impl PollingScheduler {
    pub fn new(
        chain: Arc<dyn ChainExecuteClient>,
        provider: Arc<dyn AmlVerdictProvider>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            chain,
            provider,
            config,
            in_flight: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Run one cycle unless another is in flight
    pub async fn run_cycle(&self) -> CycleOutcome {
        let Ok(_guard) = self.in_flight.try_lock() else {
            debug!("Previous cycle still running, skipping tick");
            return CycleOutcome::Skipped;
        };

        let span = info_span!("cycle", cycle_id = %Uuid::new_v4());
        let outcome = self.cycle().instrument(span.clone()).await;
        span.in_scope(|| debug!(outcome = %outcome, "Cycle finished"));
        outcome
    }

    async fn cycle(&self) -> CycleOutcome {
        let id = match self.chain.next_pending_id().await {
            Ok(id) => id,
            Err(e) => {
                error!(error = %e, "Failed to query next pending id");
                return CycleOutcome::QueryFailed;
            }
        };

        if id == NO_PENDING_ID {
            debug!("No pending transactions");
            return CycleOutcome::NoPending;
        }

        let tx = match self.chain.pending_transaction(id).await {
            Ok(Some(tx)) => tx,
            Ok(None) => {
                info!(request_id = id, "Pending transaction not found");
                return CycleOutcome::NotFound(id);
            }
            Err(e) => {
                error!(request_id = id, error = %e, "Failed to fetch pending transaction");
                return CycleOutcome::QueryFailed;
            }
        };

        info!(
            request_id = id,
            sender = %tx.sender,
            recipient = %tx.recipient,
            amount = %tx.amount,
            "Evaluating pending transaction"
        );
        let verdict = self.provider.evaluate(&tx).await.with_request_id(id);

        match self.chain.is_pending(id).await {
            Ok(true) => {}
            Ok(false) => {
                info!(request_id = id, "Transaction resolved during evaluation, not submitting");
                return CycleOutcome::AlreadyResolved(id);
            }
            Err(e) => {
                error!(request_id = id, error = %e, "Failed to re-check pending transaction");
                return CycleOutcome::QueryFailed;
            }
        }

        match self.chain.submit_verdict(&verdict).await {
            Ok(receipt) => {
                info!(
                    request_id = id,
                    tx_hash = %receipt.tx_hash,
                    approved = verdict.approved,
                    flagged = verdict.flagged,
                    risk_score = %verdict.risk_score,
                    fail_safe = verdict.is_fail_safe(),
                    "Verdict submitted"
                );
                CycleOutcome::Submitted {
                    id,
                    tx_hash: receipt.tx_hash,
                }
            }
            Err(e) => {
                error!(
                    request_id = id,
                    error = %e,
                    rejected = e.is_rejection(),
                    "Failed to submit verdict"
                );
                CycleOutcome::SubmitFailed { id }
            }
        }
    }

    /// Tick until `shutdown` flips to true (or its sender is dropped).
    ///
    /// Each tick spawns a cycle; overlapping ticks are skipped by the
    /// in-flight guard. On shutdown the loop waits for a running cycle.
    pub async fn run(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.config.poll_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            interval_ms = self.config.poll_interval_ms,
            provider = self.provider.name(),
            "Polling scheduler started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let scheduler = Arc::clone(&self);
                    tokio::spawn(async move {
                        if scheduler.run_cycle().await == CycleOutcome::Skipped {
                            warn!("Tick skipped, previous cycle still in flight");
                        }
                    });
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        let _drained = self.in_flight.lock().await;
        info!("Polling scheduler stopped");
    }
}
