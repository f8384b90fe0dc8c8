//! Submission coordinator - orchestrates one submit from form to notification
//!
//! Validate → encode → deliver → (unacknowledged) verify → notify. Every
//! failure on the way is turned into exactly one final notification; the
//! form is reset only when the submission was accepted.

use super::summary::{SubmitStatus, SubmitSummary};
use crate::adapters::store::HttpRecordStore;
use crate::adapters::transport::{build_http_client, create_transport};
use crate::config::{CourierConfig, LimitsConfig};
use crate::core::delivery::{DeliveryStrategy, RetryPolicy};
use crate::core::encoding::encode_files;
use crate::core::validation::validate_form;
use crate::core::verification::{PollPolicy, ReconcilerPhase, VerificationReconciler};
use crate::domain::{DeclarationForm, DeliveryOutcome, Result, ValidationError};
use crate::notify::{Notifier, Severity};
use std::sync::Arc;
use std::time::Instant;

/// Shown while the payload is on its way
pub const SUBMITTING_MESSAGE: &str = "Submitting...";

/// Shown on acknowledged delivery when the endpoint sends no message
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Submission received";

/// Submission coordinator
pub struct SubmissionCoordinator {
    limits: LimitsConfig,
    file_name_max_length: usize,
    strategy: DeliveryStrategy,
    reconciler: Option<VerificationReconciler>,
    notifier: Arc<Notifier>,
}

impl SubmissionCoordinator {
    /// Create a coordinator from its parts
    pub fn new(
        limits: LimitsConfig,
        file_name_max_length: usize,
        strategy: DeliveryStrategy,
        reconciler: Option<VerificationReconciler>,
        notifier: Arc<Notifier>,
    ) -> Self {
        Self {
            limits,
            file_name_max_length,
            strategy,
            reconciler,
            notifier,
        }
    }

    /// Create a coordinator wired to the configured endpoint
    ///
    /// # Errors
    ///
    /// Returns an error if the transport or the HTTP client cannot be built.
    pub fn from_config(config: &CourierConfig, notifier: Arc<Notifier>) -> Result<Self> {
        let transport = create_transport(config)?;
        let strategy = DeliveryStrategy::new(transport, RetryPolicy::from(&config.transport.retry))
            .with_rejection_max_length(config.transport.rejection_message_max_length);

        let reconciler = if config.verification.enabled {
            let store = HttpRecordStore::new(
                build_http_client(&config.endpoint)?,
                config.endpoint.verification_url(),
                config.endpoint.timeout(),
            );
            Some(VerificationReconciler::new(
                Arc::new(store),
                PollPolicy::from(&config.verification),
            ))
        } else {
            tracing::debug!("Verification disabled");
            None
        };

        Ok(Self::new(
            config.limits.clone(),
            config.transport.file_name_max_length,
            strategy,
            reconciler,
            notifier,
        ))
    }

    /// Submit a form
    ///
    /// Never fails: the outcome is in the returned summary and on the
    /// notifier. The form is reset when the submission was accepted.
    pub async fn submit(&self, form: &mut DeclarationForm) -> SubmitSummary {
        let started = Instant::now();
        let mut summary = self.run(form).await;
        summary.duration = started.elapsed();

        if summary.is_accepted() {
            form.reset();
        }

        tracing::info!(
            status = summary.status.label(),
            attempts = summary.attempts.len(),
            duration_ms = summary.duration.as_millis() as u64,
            "Submit finished"
        );
        summary
    }

    async fn run(&self, form: &DeclarationForm) -> SubmitSummary {
        let builder = match validate_form(form, &self.limits) {
            Ok(builder) => builder,
            Err(e) => {
                tracing::info!(error = %e, "Form rejected by validation");
                return self.finish(SubmitStatus::Invalid(e.clone()), format!("Error: {e}"));
            }
        };

        let files = match encode_files(&form.files, self.file_name_max_length).await {
            Ok(files) => files,
            Err(e) => {
                crate::log_error_with_context!(&e, "Attachment encoding failed");
                return self.finish(SubmitStatus::EncodingFailed(e.clone()), format!("Error: {e}"));
            }
        };
        let files_encoded = files.len();

        let payload = match builder.files(files).build() {
            Ok(payload) => payload,
            Err(missing) => {
                let e = ValidationError::MissingField(missing);
                return self.finish(SubmitStatus::Invalid(e.clone()), format!("Error: {e}"));
            }
        };
        let tracking = payload.tracking_number.clone();

        tracing::debug!(
            tracking_number = %tracking,
            files = files_encoded,
            attachment_bytes = payload.total_file_size(),
            "Payload assembled"
        );
        self.notifier.pending(SUBMITTING_MESSAGE);
        let report = self.strategy.deliver(&payload).await;

        let mut summary = match report.outcome {
            DeliveryOutcome::Delivered(confirmation) => {
                let message = confirmation
                    .message
                    .clone()
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_string());
                self.finish(
                    SubmitStatus::Delivered {
                        message: confirmation.message,
                    },
                    message,
                )
            }
            DeliveryOutcome::Failed(reason) => {
                let message = format!("Error: {reason}");
                self.finish(SubmitStatus::Failed(reason), message)
            }
            DeliveryOutcome::DeliveredUnconfirmed => match &self.reconciler {
                None => self.finish(
                    SubmitStatus::PendingVerification,
                    format!("Submission sent for {tracking}; delivery could not be confirmed."),
                ),
                Some(reconciler) => {
                    self.notifier.pending("Submission sent. Verifying delivery...");
                    let state = reconciler.reconcile(&tracking).await;
                    let mut summary = if state.phase == ReconcilerPhase::Confirmed {
                        self.finish(
                            SubmitStatus::Confirmed,
                            format!("Submission confirmed for tracking number {tracking}"),
                        )
                    } else {
                        self.finish(
                            SubmitStatus::PendingVerification,
                            format!(
                                "Submission received, verification pending for tracking number {tracking}. Please check again later."
                            ),
                        )
                    };
                    summary.verification = Some(state);
                    summary
                }
            },
        };

        summary.tracking_number = Some(tracking.to_string());
        summary.attempts = report.attempts;
        summary.files_encoded = files_encoded;
        summary
    }

    /// Show the final notification and start a summary
    fn finish(&self, status: SubmitStatus, message: String) -> SubmitSummary {
        let severity = match status {
            SubmitStatus::Delivered { .. } | SubmitStatus::Confirmed => Severity::Success,
            SubmitStatus::PendingVerification => Severity::Pending,
            SubmitStatus::Invalid(_) | SubmitStatus::EncodingFailed(_) | SubmitStatus::Failed(_) => {
                Severity::Error
            }
        };
        self.notifier.show(message.clone(), severity);
        SubmitSummary::new(status, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::store::RecordStore;
    use crate::adapters::transport::{Transport, TransportReply};
    use crate::core::schedule::RecordingScheduler;
    use crate::domain::{
        AttachedFile, AttemptId, FailureReason, RemoteResponse, SubmissionPayload, TrackingCode,
        TransportError, TransportKind,
    };
    use crate::notify::MemorySink;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FixedTransport {
        kind: TransportKind,
        reply: std::result::Result<TransportReply, FailureReason>,
        seen: Mutex<Vec<SubmissionPayload>>,
    }

    impl FixedTransport {
        fn new(kind: TransportKind, reply: std::result::Result<TransportReply, FailureReason>) -> Arc<Self> {
            Arc::new(Self {
                kind,
                reply,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Transport for FixedTransport {
        fn kind(&self) -> TransportKind {
            self.kind
        }

        async fn send(
            &self,
            payload: &SubmissionPayload,
            _attempt: &AttemptId,
        ) -> std::result::Result<TransportReply, FailureReason> {
            self.seen.lock().unwrap().push(payload.clone());
            self.reply.clone()
        }
    }

    struct FixedStore(bool);

    #[async_trait]
    impl RecordStore for FixedStore {
        async fn exists(&self, _tracking: &TrackingCode) -> std::result::Result<bool, TransportError> {
            Ok(self.0)
        }
    }

    fn form() -> DeclarationForm {
        DeclarationForm {
            tracking_number: "ABC-123".into(),
            phone: "0123456789".into(),
            quantity: "2".into(),
            price: "19.99".into(),
            description: "Two shirts".into(),
            collection_point: "Hub 4".into(),
            category: "*Gadgets".into(),
            files: vec![AttachedFile::in_memory("receipt.pdf", None, b"%PDF-1.4".to_vec())],
        }
    }

    fn coordinator(
        transport: Arc<FixedTransport>,
        store: Option<bool>,
    ) -> (SubmissionCoordinator, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let notifier = Arc::new(Notifier::default().with_sink(sink.clone()));
        let scheduler = Arc::new(RecordingScheduler::new());
        let strategy = DeliveryStrategy::new(transport, RetryPolicy::default())
            .with_scheduler(scheduler.clone());
        let reconciler = store.map(|exists| {
            VerificationReconciler::new(Arc::new(FixedStore(exists)), PollPolicy::default())
                .with_scheduler(scheduler.clone())
        });
        (
            SubmissionCoordinator::new(LimitsConfig::default(), 100, strategy, reconciler, notifier),
            sink,
        )
    }

    fn acknowledged(success: bool, text: &str) -> std::result::Result<TransportReply, FailureReason> {
        Ok(TransportReply::Acknowledged(RemoteResponse {
            success,
            message: success.then(|| text.to_string()),
            error: (!success).then(|| text.to_string()),
        }))
    }

    #[tokio::test]
    async fn test_delivered_resets_form() {
        let transport = FixedTransport::new(TransportKind::Direct, acknowledged(true, "Saved!"));
        let (coordinator, sink) = coordinator(transport.clone(), None);
        let mut form = form();

        let summary = coordinator.submit(&mut form).await;

        assert_eq!(
            summary.status,
            SubmitStatus::Delivered {
                message: Some("Saved!".to_string())
            }
        );
        assert!(form.is_blank());
        assert_eq!(
            sink.history(),
            vec![
                (Severity::Pending, SUBMITTING_MESSAGE.to_string()),
                (Severity::Success, "Saved!".to_string()),
            ]
        );

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen[0].files[0].mime_type, "application/pdf");
        assert_eq!(summary.files_encoded, 1);
    }

    #[tokio::test]
    async fn test_validation_failure_sends_nothing() {
        let transport = FixedTransport::new(TransportKind::Direct, acknowledged(true, "Saved"));
        let (coordinator, sink) = coordinator(transport.clone(), None);
        let mut form = form();
        form.quantity = "2.5".into();

        let summary = coordinator.submit(&mut form).await;

        assert_eq!(summary.status, SubmitStatus::Invalid(ValidationError::InvalidQuantity));
        assert_eq!(summary.exit_code(), 2);
        assert!(transport.seen.lock().unwrap().is_empty());
        assert_eq!(form.quantity, "2.5");
        assert_eq!(
            sink.history(),
            vec![(
                Severity::Error,
                "Error: Quantity must be a whole number greater than 0".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_encoding_failure_sends_nothing() {
        let transport = FixedTransport::new(TransportKind::Direct, acknowledged(true, "Saved"));
        let (coordinator, _sink) = coordinator(transport.clone(), None);
        let mut form = form();
        form.files = vec![AttachedFile::in_memory("mystery", None, vec![1, 2, 3])];

        let summary = coordinator.submit(&mut form).await;

        assert!(matches!(summary.status, SubmitStatus::EncodingFailed(_)));
        assert!(transport.seen.lock().unwrap().is_empty());
        assert!(!form.is_blank());
    }

    #[tokio::test]
    async fn test_rejection_keeps_form() {
        let transport =
            FixedTransport::new(TransportKind::Direct, acknowledged(false, "Duplicate entry"));
        let (coordinator, sink) = coordinator(transport, None);
        let mut form = form();

        let summary = coordinator.submit(&mut form).await;

        assert_eq!(
            summary.status,
            SubmitStatus::Failed(FailureReason::ServerRejection("Duplicate entry".to_string()))
        );
        assert_eq!(form.tracking_number, "ABC-123");
        assert_eq!(
            sink.last(),
            Some((Severity::Error, "Error: Duplicate entry".to_string()))
        );
    }

    #[tokio::test]
    async fn test_unconfirmed_then_confirmed() {
        let transport =
            FixedTransport::new(TransportKind::HiddenFrame, Ok(TransportReply::Dispatched));
        let (coordinator, sink) = coordinator(transport, Some(true));
        let mut form = form();

        let summary = coordinator.submit(&mut form).await;

        assert_eq!(summary.status, SubmitStatus::Confirmed);
        assert_eq!(summary.verification.as_ref().unwrap().attempts_made, 1);
        assert!(form.is_blank());
        assert_eq!(sink.last().unwrap().0, Severity::Success);
    }

    #[tokio::test]
    async fn test_unconfirmed_gives_up_as_pending() {
        let transport =
            FixedTransport::new(TransportKind::HiddenFrame, Ok(TransportReply::Dispatched));
        let (coordinator, sink) = coordinator(transport, Some(false));
        let mut form = form();

        let summary = coordinator.submit(&mut form).await;

        assert_eq!(summary.status, SubmitStatus::PendingVerification);
        assert_eq!(summary.exit_code(), 3);
        assert_eq!(summary.verification.as_ref().unwrap().attempts_made, 5);
        let (severity, text) = sink.last().unwrap();
        assert_eq!(severity, Severity::Pending);
        assert!(text.contains("verification pending"));
        assert!(form.is_blank());
    }

    #[tokio::test]
    async fn test_unconfirmed_without_verification() {
        let transport =
            FixedTransport::new(TransportKind::HiddenFrame, Ok(TransportReply::Dispatched));
        let (coordinator, _sink) = coordinator(transport, None);
        let mut form = form();

        let summary = coordinator.submit(&mut form).await;
        assert_eq!(summary.status, SubmitStatus::PendingVerification);
        assert!(summary.verification.is_none());
    }
}
