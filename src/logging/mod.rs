//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Human-readable console output filtered by `RUST_LOG` or the configured level
//! - JSON-formatted local log files with rotation
//! - Event macros for the recurring delivery and verification events
//!
//! Structured logs never carry payload contents; attempts are identified by
//! their tracking code, transport and attempt id.
//!
//! # Example
//!
//! ```no_run
//! use courier::logging::init_logging;
//! use courier::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, parse_log_level, LoggingGuard};

/// Log the start of a delivery attempt
///
/// # Example
///
/// ```no_run
/// use courier::log_delivery_start;
/// use courier::domain::{AttemptId, TransportKind};
///
/// let attempt = AttemptId::new();
/// log_delivery_start!("ABC-123", TransportKind::Direct, &attempt);
/// ```
#[macro_export]
macro_rules! log_delivery_start {
    ($tracking:expr, $transport:expr, $attempt:expr) => {
        tracing::info!(
            tracking_number = %$tracking,
            transport = %$transport,
            attempt_id = %$attempt,
            "Delivering submission"
        );
    };
}

/// Log the outcome of a delivery
///
/// # Example
///
/// ```no_run
/// use courier::log_delivery_outcome;
/// use std::time::Duration;
///
/// log_delivery_outcome!("ABC-123", "delivered", 1, Duration::from_millis(320));
/// ```
#[macro_export]
macro_rules! log_delivery_outcome {
    ($tracking:expr, $outcome:expr, $attempts:expr, $duration:expr) => {
        tracing::info!(
            tracking_number = %$tracking,
            outcome = $outcome,
            attempts = $attempts,
            duration_ms = $duration.as_millis() as u64,
            "Delivery finished"
        );
    };
}

/// Log a retry attempt
///
/// # Example
///
/// ```no_run
/// use courier::log_retry_attempt;
///
/// log_retry_attempt!(1, 1, 2000u64, "Connection failed: reset by peer");
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($retry:expr, $max_retries:expr, $delay_ms:expr, $reason:expr) => {
        tracing::warn!(
            retry = $retry,
            max_retries = $max_retries,
            delay_ms = $delay_ms,
            reason = %$reason,
            "Retrying delivery"
        );
    };
}

/// Log a single verification poll
///
/// # Example
///
/// ```no_run
/// use courier::log_verification_poll;
///
/// log_verification_poll!("ABC-123", 2, 5, "not_found");
/// ```
#[macro_export]
macro_rules! log_verification_poll {
    ($tracking:expr, $attempt:expr, $max_attempts:expr, $result:expr) => {
        tracing::debug!(
            tracking_number = %$tracking,
            attempt = $attempt,
            max_attempts = $max_attempts,
            result = $result,
            "Verification poll"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use courier::log_error_with_context;
/// use courier::domain::CourierError;
///
/// let error = CourierError::Configuration("endpoint.url is required".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
