//! Notification sinks

use super::board::{Notification, Severity};
use std::sync::Mutex;

/// Where notifications are rendered
pub trait NotificationSink: Send + Sync {
    /// Show a notification, replacing whatever was shown before
    fn render(&self, notification: &Notification);
}

/// Prints notifications to stdout, one line each
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl ConsoleSink {
    fn icon(severity: Severity) -> &'static str {
        match severity {
            Severity::Success => "✅",
            Severity::Error => "❌",
            Severity::Pending => "⏳",
        }
    }
}

impl NotificationSink for ConsoleSink {
    fn render(&self, notification: &Notification) {
        println!("{} {}", Self::icon(notification.severity), notification.text);
    }
}

/// Keeps every rendered notification in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    history: Mutex<Vec<(Severity, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything rendered so far, oldest first
    pub fn history(&self) -> Vec<(Severity, String)> {
        self.history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// The most recently rendered notification
    pub fn last(&self) -> Option<(Severity, String)> {
        self.history().pop()
    }
}

impl NotificationSink for MemorySink {
    fn render(&self, notification: &Notification) {
        self.history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((notification.severity, notification.text.clone()));
    }
}
