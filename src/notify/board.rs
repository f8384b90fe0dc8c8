//! Notification board
//!
//! Holds the single notification currently on display. A new notification
//! replaces the old one; success and error messages expire after their
//! configured lifetime, pending ones stay until replaced. Expiry is checked
//! on read, so no timer task is needed.

use super::sink::NotificationSink;
use crate::config::NotificationConfig;
use serde::Serialize;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Pending,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Pending => "pending",
        };
        f.write_str(name)
    }
}

/// A message on display
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub text: String,
    pub severity: Severity,
    pub shown_at: Instant,
}

/// Write-last-wins notification display
pub struct Notifier {
    current: Mutex<Option<Notification>>,
    success_ttl: Duration,
    error_ttl: Duration,
    sinks: Vec<Arc<dyn NotificationSink>>,
}

impl Notifier {
    pub fn new(config: &NotificationConfig) -> Self {
        Self {
            current: Mutex::new(None),
            success_ttl: Duration::from_millis(config.success_ttl_ms),
            error_ttl: Duration::from_millis(config.error_ttl_ms),
            sinks: Vec::new(),
        }
    }

    /// Add a sink that renders every shown notification
    pub fn with_sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// How long a notification of `severity` stays up; `None` means until replaced
    pub fn ttl(&self, severity: Severity) -> Option<Duration> {
        match severity {
            Severity::Success => Some(self.success_ttl),
            Severity::Error => Some(self.error_ttl),
            Severity::Pending => None,
        }
    }

    /// Show a notification, replacing the current one
    pub fn show(&self, text: impl Into<String>, severity: Severity) {
        let notification = Notification {
            text: text.into(),
            severity,
            shown_at: Instant::now(),
        };

        tracing::debug!(severity = %severity, text = %notification.text, "Notification shown");
        for sink in &self.sinks {
            sink.render(&notification);
        }
        *self.lock() = Some(notification);
    }

    pub fn success(&self, text: impl Into<String>) {
        self.show(text, Severity::Success);
    }

    pub fn error(&self, text: impl Into<String>) {
        self.show(text, Severity::Error);
    }

    pub fn pending(&self, text: impl Into<String>) {
        self.show(text, Severity::Pending);
    }

    /// The notification still on display, if any
    pub fn current(&self) -> Option<Notification> {
        let mut current = self.lock();
        let expired = current.as_ref().is_some_and(|n| {
            self.ttl(n.severity)
                .is_some_and(|ttl| n.shown_at.elapsed() >= ttl)
        });
        if expired {
            *current = None;
        }
        current.clone()
    }

    /// Remove whatever is on display
    pub fn clear(&self) {
        *self.lock() = None;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Notification>> {
        self.current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(&NotificationConfig::default())
    }
}
