//! Verification state
//!
//! The transient record a reconciler keeps for one tracking code.

use crate::domain::TrackingCode;
use serde::Serialize;

/// Result of one read against the record store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", content = "detail", rename_all = "snake_case")]
pub enum PollResult {
    Found,
    NotFound,
    ReadFailed(String),
}

impl PollResult {
    pub fn label(&self) -> &'static str {
        match self {
            PollResult::Found => "found",
            PollResult::NotFound => "not_found",
            PollResult::ReadFailed(_) => "read_failed",
        }
    }
}

/// Reconciler phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcilerPhase {
    Idle,
    Polling,
    Confirmed,
    GaveUp,
}

impl ReconcilerPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReconcilerPhase::Confirmed | ReconcilerPhase::GaveUp)
    }
}

/// Verification progress for one tracking code
#[derive(Debug, Clone, Serialize)]
pub struct VerificationState {
    /// Tracking code being confirmed
    pub tracking_code: TrackingCode,

    /// Polls made so far
    pub attempts_made: usize,

    /// Poll budget
    pub max_attempts: usize,

    /// Result of the latest poll
    pub last_result: Option<PollResult>,

    /// Current phase
    pub phase: ReconcilerPhase,
}

impl VerificationState {
    /// Create an idle state
    pub fn new(tracking_code: TrackingCode, max_attempts: usize) -> Self {
        Self {
            tracking_code,
            attempts_made: 0,
            max_attempts,
            last_result: None,
            phase: ReconcilerPhase::Idle,
        }
    }

    /// Enter polling; only an idle state moves
    pub fn begin(&mut self) {
        if self.phase == ReconcilerPhase::Idle {
            self.phase = if self.max_attempts == 0 {
                ReconcilerPhase::GaveUp
            } else {
                ReconcilerPhase::Polling
            };
        }
    }

    /// Record a poll and move to the next phase
    ///
    /// Every result consumes an attempt, a read failure included. Results
    /// arriving outside `Polling` are ignored.
    pub fn record(&mut self, result: PollResult) -> ReconcilerPhase {
        if self.phase != ReconcilerPhase::Polling {
            return self.phase;
        }

        self.attempts_made += 1;
        self.phase = if result == PollResult::Found {
            ReconcilerPhase::Confirmed
        } else if self.attempts_made >= self.max_attempts {
            ReconcilerPhase::GaveUp
        } else {
            ReconcilerPhase::Polling
        };
        self.last_result = Some(result);
        self.phase
    }

    pub fn attempts_remaining(&self) -> usize {
        self.max_attempts.saturating_sub(self.attempts_made)
    }

    pub fn is_confirmed(&self) -> bool {
        self.phase == ReconcilerPhase::Confirmed
    }

    /// Format the state as a human-readable string
    pub fn format_summary(&self) -> String {
        let mut summary = String::new();
        summary.push_str(&format!("📦 Verification of {}\n", self.tracking_code));
        summary.push_str(&format!(
            "  Polls: {}/{}\n",
            self.attempts_made, self.max_attempts
        ));
        if let Some(PollResult::ReadFailed(detail)) = &self.last_result {
            summary.push_str(&format!("  Last read failed: {detail}\n"));
        }
        let verdict = match self.phase {
            ReconcilerPhase::Confirmed => "  ✅ Record confirmed\n",
            ReconcilerPhase::GaveUp => "  ⏳ Not confirmed yet; verification pending\n",
            ReconcilerPhase::Idle | ReconcilerPhase::Polling => "  … Verification in progress\n",
        };
        summary.push_str(verdict);
        summary
    }
}
