//! Verification reconciler
//!
//! After a delivery that could not be acknowledged, re-reads the remote store
//! until the record shows up or the poll budget runs out. Giving up is not a
//! failure: the submission probably landed, it just could not be confirmed.

use super::state::{PollResult, ReconcilerPhase, VerificationState};
use crate::adapters::store::RecordStore;
use crate::config::VerificationConfig;
use crate::core::schedule::{Scheduler, TokioScheduler};
use crate::domain::TrackingCode;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

/// Poll timings and budget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    pub max_attempts: usize,
    pub initial_delay: Duration,
    pub interval: Duration,
    pub jitter: Duration,
}

impl From<&VerificationConfig> for PollPolicy {
    fn from(config: &VerificationConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            initial_delay: Duration::from_millis(config.initial_delay_ms),
            interval: Duration::from_millis(config.interval_ms),
            jitter: Duration::from_millis(config.jitter_ms),
        }
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::from(&VerificationConfig::default())
    }
}

impl PollPolicy {
    /// Wait before the first poll: the initial delay plus a random jitter
    fn first_delay(&self) -> Duration {
        let jitter_ms = self.jitter.as_millis() as u64;
        if jitter_ms == 0 {
            return self.initial_delay;
        }
        self.initial_delay + Duration::from_millis(rand::thread_rng().gen_range(0..=jitter_ms))
    }
}

/// Polls a [`RecordStore`] to confirm an unacknowledged delivery
pub struct VerificationReconciler {
    store: Arc<dyn RecordStore>,
    policy: PollPolicy,
    scheduler: Arc<dyn Scheduler>,
}

impl VerificationReconciler {
    pub fn new(store: Arc<dyn RecordStore>, policy: PollPolicy) -> Self {
        Self {
            store,
            policy,
            scheduler: Arc::new(TokioScheduler),
        }
    }

    /// Replace the scheduler used between polls
    pub fn with_scheduler(mut self, scheduler: Arc<dyn Scheduler>) -> Self {
        self.scheduler = scheduler;
        self
    }

    /// Poll until the record is found or the budget is spent
    ///
    /// Always ends in [`ReconcilerPhase::Confirmed`] or
    /// [`ReconcilerPhase::GaveUp`]. Store read failures count as attempts.
    pub async fn reconcile(&self, tracking: &TrackingCode) -> VerificationState {
        let mut state = VerificationState::new(tracking.clone(), self.policy.max_attempts);
        state.begin();

        tracing::info!(
            tracking_number = %tracking,
            max_attempts = self.policy.max_attempts,
            "Verifying unacknowledged submission"
        );

        if state.phase.is_terminal() {
            return state;
        }

        let first_delay = self.policy.first_delay();
        self.scheduler.sleep(first_delay).await;

        loop {
            let result = match self.store.exists(tracking).await {
                Ok(true) => PollResult::Found,
                Ok(false) => PollResult::NotFound,
                Err(e) => {
                    tracing::warn!(tracking_number = %tracking, error = %e, "Verification read failed");
                    PollResult::ReadFailed(e.to_string())
                }
            };

            crate::log_verification_poll!(
                tracking,
                state.attempts_made + 1,
                self.policy.max_attempts,
                result.label()
            );

            match state.record(result) {
                ReconcilerPhase::Polling => {
                    tracing::debug!(
                        tracking_number = %tracking,
                        remaining = state.attempts_remaining(),
                        "Record not confirmed yet"
                    );
                    self.scheduler.sleep(self.policy.interval).await;
                }
                phase => {
                    tracing::info!(
                        tracking_number = %tracking,
                        phase = ?phase,
                        attempts = state.attempts_made,
                        "Verification finished"
                    );
                    return state;
                }
            }
        }
    }
}
