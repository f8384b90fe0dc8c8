//! Delivery outcome and attempt records
//!
//! These types describe what happened when a payload was handed to a
//! transport: the per-attempt record kept while a submit is in flight and
//! the single outcome the submit resolves to.

use super::errors::{TransportError, ValidationError};
use super::ids::AttemptId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Transport mechanism used to reach the remote endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransportKind {
    /// JSON POST with a synchronous response
    #[default]
    Direct,
    /// Query-string request answered through a named callback
    ScriptCallback,
    /// Fire-and-forget form post
    HiddenFrame,
    /// Host-provided procedure call
    HostBridge,
}

impl TransportKind {
    /// Configuration name of the transport
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportKind::Direct => "direct",
            TransportKind::ScriptCallback => "script_callback",
            TransportKind::HiddenFrame => "hidden_frame",
            TransportKind::HostBridge => "host_bridge",
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "direct" => Ok(TransportKind::Direct),
            "script_callback" | "jsonp" => Ok(TransportKind::ScriptCallback),
            "hidden_frame" | "iframe" => Ok(TransportKind::HiddenFrame),
            "host_bridge" | "bridge" => Ok(TransportKind::HostBridge),
            other => Err(format!(
                "Unknown transport '{other}'. Must be one of: direct, script_callback, hidden_frame, host_bridge"
            )),
        }
    }
}

/// Response body of the remote submission endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RemoteResponse {
    /// Whether the remote accepted the submission
    #[serde(default)]
    pub success: bool,

    /// Human readable confirmation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Human readable failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Acknowledgment from the remote endpoint
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Confirmation {
    /// Message returned by the remote, if any
    pub message: Option<String>,
}

/// Why a delivery failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The payload cannot be sent through this transport as-is
    Invalid(ValidationError),
    /// The transport could not deliver, after any retries
    Transport(TransportError),
    /// The remote answered and refused; the message is already sanitized
    ServerRejection(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Invalid(e) => write!(f, "{e}"),
            FailureReason::Transport(e) => write!(f, "{e}"),
            FailureReason::ServerRejection(msg) => write!(f, "{msg}"),
        }
    }
}

/// Final result of delivering one payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The remote acknowledged the submission
    Delivered(Confirmation),
    /// The request went out but the transport has no way to acknowledge it
    DeliveredUnconfirmed,
    /// Delivery failed
    Failed(FailureReason),
}

impl DeliveryOutcome {
    /// Short label for logs and summaries
    pub fn label(&self) -> &'static str {
        match self {
            DeliveryOutcome::Delivered(_) => "delivered",
            DeliveryOutcome::DeliveredUnconfirmed => "delivered_unconfirmed",
            DeliveryOutcome::Failed(_) => "failed",
        }
    }
}

/// Status of a single attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttemptStatus {
    Pending,
    Success,
    Failure,
}

/// Transient record of one delivery attempt
#[derive(Debug, Clone)]
pub struct DeliveryAttempt {
    /// Unique attempt id
    pub id: AttemptId,

    /// Transport used
    pub transport: TransportKind,

    /// When the attempt started
    pub started_at: DateTime<Utc>,

    /// Current status
    pub status: AttemptStatus,

    /// Error detail for failed attempts
    pub error: Option<String>,
}

impl DeliveryAttempt {
    /// Starts a new pending attempt
    pub fn start(transport: TransportKind) -> Self {
        Self {
            id: AttemptId::new(),
            transport,
            started_at: Utc::now(),
            status: AttemptStatus::Pending,
            error: None,
        }
    }

    /// Marks the attempt successful
    pub fn succeed(&mut self) {
        self.status = AttemptStatus::Success;
        self.error = None;
    }

    /// Marks the attempt failed
    pub fn fail(&mut self, detail: impl Into<String>) {
        self.status = AttemptStatus::Failure;
        self.error = Some(detail.into());
    }
}
