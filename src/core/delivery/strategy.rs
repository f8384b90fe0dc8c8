//! Delivery strategy
//!
//! Drives one transport through a submission: one attempt, then retries for
//! transient failures only, then a single [`DeliveryOutcome`].

use super::retry::RetryPolicy;
use crate::adapters::transport::{Transport, TransportReply};
use crate::core::schedule::{Scheduler, TokioScheduler};
use crate::domain::payload::truncate_chars;
use crate::domain::{
    Confirmation, DeliveryAttempt, DeliveryOutcome, FailureReason, RemoteResponse,
    SubmissionPayload,
};
use std::sync::Arc;
use std::time::Instant;

/// Fallback text when the endpoint rejects without a usable message
pub const UNKNOWN_REJECTION: &str = "Unknown server error";

/// Default cap on the length of a displayed rejection message
pub const DEFAULT_REJECTION_MAX_LENGTH: usize = 200;

/// Outcome of a delivery plus the attempts that led to it
#[derive(Debug, Clone)]
pub struct DeliveryReport {
    pub outcome: DeliveryOutcome,
    pub attempts: Vec<DeliveryAttempt>,
}

impl DeliveryReport {
    fn finish(outcome: DeliveryOutcome, attempts: Vec<DeliveryAttempt>) -> Self {
        Self { outcome, attempts }
    }
}

/// Delivery state machine over a single transport
pub struct DeliveryStrategy {
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
    scheduler: Arc<dyn Scheduler>,
    rejection_max_length: usize,
}

impl DeliveryStrategy {
    /// Create a strategy that waits on the tokio timer between retries
    pub fn new(transport: Arc<dyn Transport>, policy: RetryPolicy) -> Self {
        Self {
            transport,
            policy,
            scheduler: Arc::new(TokioScheduler),
            rejection_max_length: DEFAULT_REJECTION_MAX_LENGTH,
        }
    }

    /// Replace the scheduler used for backoff delays
    pub fn with_scheduler(mut self, scheduler: Arc<dyn Scheduler>) -> Self {
        self.scheduler = scheduler;
        self
    }

    /// Cap the length of rejection messages
    pub fn with_rejection_max_length(mut self, max_length: usize) -> Self {
        self.rejection_max_length = max_length;
        self
    }

    /// Deliver a payload
    ///
    /// Never returns an error: every failure ends up in
    /// [`DeliveryOutcome::Failed`]. Only transient transport failures are
    /// retried, and never more than the policy allows; server rejections and
    /// invalid payloads end the delivery at once.
    pub async fn deliver(&self, payload: &SubmissionPayload) -> DeliveryReport {
        let kind = self.transport.kind();
        let started = Instant::now();
        let mut attempts = Vec::new();
        let mut retries = 0;

        let outcome = loop {
            let mut attempt = DeliveryAttempt::start(kind);
            crate::log_delivery_start!(payload.tracking_number, kind, attempt.id);

            match self.transport.send(payload, &attempt.id).await {
                Ok(TransportReply::Acknowledged(response)) => {
                    let outcome = self.judge(response);
                    match &outcome {
                        DeliveryOutcome::Failed(reason) => attempt.fail(reason.to_string()),
                        _ => attempt.succeed(),
                    }
                    attempts.push(attempt);
                    break outcome;
                }
                Ok(TransportReply::Dispatched) => {
                    attempt.succeed();
                    attempts.push(attempt);
                    break DeliveryOutcome::DeliveredUnconfirmed;
                }
                Err(FailureReason::Transport(error)) => {
                    attempt.fail(error.to_string());
                    attempts.push(attempt);

                    if !self.policy.should_retry(&error, retries) {
                        break DeliveryOutcome::Failed(FailureReason::Transport(error));
                    }

                    retries += 1;
                    let delay = self.policy.delay_for(retries);
                    crate::log_retry_attempt!(
                        retries,
                        self.policy.max_retries,
                        delay.as_millis() as u64,
                        error
                    );
                    self.scheduler.sleep(delay).await;
                }
                Err(FailureReason::ServerRejection(message)) => {
                    let message = sanitize_rejection(&message, self.rejection_max_length);
                    attempt.fail(message.clone());
                    attempts.push(attempt);
                    break DeliveryOutcome::Failed(FailureReason::ServerRejection(message));
                }
                Err(reason @ FailureReason::Invalid(_)) => {
                    attempt.fail(reason.to_string());
                    attempts.push(attempt);
                    break DeliveryOutcome::Failed(reason);
                }
            }
        };

        crate::log_delivery_outcome!(
            payload.tracking_number,
            outcome.label(),
            attempts.len(),
            started.elapsed()
        );

        DeliveryReport::finish(outcome, attempts)
    }

    fn judge(&self, response: RemoteResponse) -> DeliveryOutcome {
        if response.success {
            return DeliveryOutcome::Delivered(Confirmation {
                message: response.message,
            });
        }

        let raw = response
            .error
            .or(response.message)
            .unwrap_or_default();
        DeliveryOutcome::Failed(FailureReason::ServerRejection(sanitize_rejection(
            &raw,
            self.rejection_max_length,
        )))
    }
}

/// Restricts a server-provided message to plain, displayable text
///
/// Keeps ASCII letters, digits and common punctuation, collapses whitespace
/// and truncates to `max_length` characters. A message with nothing left
/// becomes [`UNKNOWN_REJECTION`].
pub fn sanitize_rejection(message: &str, max_length: usize) -> String {
    const PUNCTUATION: &str = ".,:;!?'\"()-_/@#%&+=*";

    let filtered: String = message
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ' || PUNCTUATION.contains(*c))
        .collect();
    let collapsed = filtered.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.is_empty() {
        return UNKNOWN_REJECTION.to_string();
    }
    truncate_chars(&collapsed, max_length)
}
