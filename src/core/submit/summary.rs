//! Submission summary and reporting

use crate::core::verification::{ReconcilerPhase, VerificationState};
use crate::domain::{DeliveryAttempt, EncodingError, FailureReason, ValidationError};
use std::time::Duration;

/// How a submit ended
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitStatus {
    /// A field failed validation; nothing was sent
    Invalid(ValidationError),

    /// An attachment could not be encoded; nothing was sent
    EncodingFailed(EncodingError),

    /// The endpoint acknowledged the submission
    Delivered { message: Option<String> },

    /// Sent without acknowledgement, then found in the remote store
    Confirmed,

    /// Sent without acknowledgement and not confirmed (yet)
    PendingVerification,

    /// Delivery failed
    Failed(FailureReason),
}

impl SubmitStatus {
    /// Whether the submission left the client and was not refused
    pub fn is_accepted(&self) -> bool {
        matches!(
            self,
            SubmitStatus::Delivered { .. }
                | SubmitStatus::Confirmed
                | SubmitStatus::PendingVerification
        )
    }

    /// Process exit code for this status
    pub fn exit_code(&self) -> i32 {
        match self {
            SubmitStatus::Delivered { .. } | SubmitStatus::Confirmed => 0,
            SubmitStatus::Failed(_) => 1,
            SubmitStatus::Invalid(_) | SubmitStatus::EncodingFailed(_) => 2,
            SubmitStatus::PendingVerification => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SubmitStatus::Invalid(_) => "invalid",
            SubmitStatus::EncodingFailed(_) => "encoding_failed",
            SubmitStatus::Delivered { .. } => "delivered",
            SubmitStatus::Confirmed => "confirmed",
            SubmitStatus::PendingVerification => "pending_verification",
            SubmitStatus::Failed(_) => "failed",
        }
    }
}

/// Summary of one submit
#[derive(Debug, Clone)]
pub struct SubmitSummary {
    /// Tracking code, when it passed validation
    pub tracking_number: Option<String>,

    /// Final status
    pub status: SubmitStatus,

    /// Delivery attempts, in order
    pub attempts: Vec<DeliveryAttempt>,

    /// Verification progress, when verification ran
    pub verification: Option<VerificationState>,

    /// Number of attachments encoded
    pub files_encoded: usize,

    /// Text of the final notification
    pub message: String,

    /// Wall-clock time of the submit
    pub duration: Duration,
}

impl SubmitSummary {
    pub(crate) fn new(status: SubmitStatus, message: impl Into<String>) -> Self {
        Self {
            tracking_number: None,
            status,
            attempts: Vec::new(),
            verification: None,
            files_encoded: 0,
            message: message.into(),
            duration: Duration::ZERO,
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.status.is_accepted()
    }

    pub fn exit_code(&self) -> i32 {
        self.status.exit_code()
    }

    /// Format the summary as a human-readable string
    pub fn format_summary(&self) -> String {
        let mut summary = String::new();
        summary.push_str("📊 Submission Summary\n");
        if let Some(tracking) = &self.tracking_number {
            summary.push_str(&format!("  Tracking number: {tracking}\n"));
        }
        summary.push_str(&format!("  Status: {}\n", self.status.label()));
        summary.push_str(&format!("  Files encoded: {}\n", self.files_encoded));
        summary.push_str(&format!("  Delivery attempts: {}\n", self.attempts.len()));
        for (i, attempt) in self.attempts.iter().enumerate() {
            summary.push_str(&format!(
                "    {}. {} via {} ({:?})",
                i + 1,
                attempt.id,
                attempt.transport,
                attempt.status
            ));
            if let Some(error) = &attempt.error {
                summary.push_str(&format!(": {error}"));
            }
            summary.push('\n');
        }
        if let Some(verification) = &self.verification {
            let verdict = match verification.phase {
                ReconcilerPhase::Confirmed => "confirmed",
                ReconcilerPhase::GaveUp => "pending",
                ReconcilerPhase::Idle | ReconcilerPhase::Polling => "incomplete",
            };
            summary.push_str(&format!(
                "  Verification: {} after {}/{} polls\n",
                verdict, verification.attempts_made, verification.max_attempts
            ));
        }
        summary.push_str(&format!("  Duration: {} ms\n", self.duration.as_millis()));
        summary
    }
}
