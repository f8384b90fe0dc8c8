//! Domain error types
//!
//! This module defines the error hierarchy for Courier. Errors are grouped by
//! the stage of a submission that raises them, so the coordinator can decide
//! what the user sees and whether a retry makes sense.
//! None of these types expose third-party client errors.

use std::time::Duration;
use thiserror::Error;

/// Main Courier error type
///
/// This is the primary error type used throughout the application.
/// It wraps the stage-specific error types and adds the ambient failures
/// (configuration, I/O, serialization).
#[derive(Debug, Error)]
pub enum CourierError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A form field failed validation
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// An attached file could not be encoded
    #[error("{0}")]
    Encoding(#[from] EncodingError),

    /// The transport could not hand the payload over
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

/// Field validation failures
///
/// These are user-correctable and are raised before any network activity.
/// The display text is shown to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Tracking code is empty, has characters outside `[A-Za-z0-9-]`
    /// or starts/ends with a hyphen
    #[error("Invalid tracking number format. Only letters, numbers, and hyphens allowed, and it must not start or end with a hyphen.")]
    InvalidTrackingFormat,

    /// Phone is not a digit string of the allowed length
    #[error("{0}")]
    InvalidPhone(String),

    /// Quantity is not a whole number greater than zero
    #[error("Quantity must be a whole number greater than 0")]
    InvalidQuantity,

    /// Price is not a valid non-negative number
    #[error("Price must be a valid positive number")]
    InvalidPrice,

    /// Starred category with too few or too many attachments
    #[error("Category '{category}' requires between {min} and {max} files, got {count}")]
    FileCountOutOfRange {
        category: String,
        count: usize,
        min: usize,
        max: usize,
    },

    /// Single attachment over the per-file ceiling
    #[error("File '{name}' is {size} bytes, which exceeds the {limit} byte limit")]
    FileTooLarge { name: String, size: u64, limit: u64 },

    /// Combined attachments over the payload ceiling
    #[error("Attachments total {total} bytes, which exceeds the {limit} byte limit")]
    PayloadTooLarge { total: u64, limit: u64 },

    /// Payload could not be assembled from the validated fields
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Encoded request does not fit the URL budget of the script-callback transport
    #[error("{what} needs {length} characters, which exceeds the {limit} character URL budget")]
    UrlBudgetExceeded {
        what: String,
        length: usize,
        limit: usize,
    },
}

/// Kind of file encoding failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingErrorKind {
    /// The file could not be read
    UnreadableFile,
    /// No media type was declared and none could be detected
    MissingMediaType,
}

/// Failure to turn an attached file into its transport representation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to process file: {file_name} ({detail})")]
pub struct EncodingError {
    /// What went wrong
    pub kind: EncodingErrorKind,

    /// Name of the file that failed
    pub file_name: String,

    /// Underlying detail
    pub detail: String,
}

impl EncodingError {
    /// Creates an unreadable-file error
    pub fn unreadable(file_name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            kind: EncodingErrorKind::UnreadableFile,
            file_name: file_name.into(),
            detail: detail.into(),
        }
    }

    /// Creates a missing-media-type error
    pub fn missing_media_type(file_name: impl Into<String>) -> Self {
        Self {
            kind: EncodingErrorKind::MissingMediaType,
            file_name: file_name.into(),
            detail: "no media type declared or detectable".to_string(),
        }
    }
}

/// Transport-level failures
///
/// Only some of these are worth retrying; see [`TransportError::is_transient`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Could not connect or the connection dropped
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The injected script request failed to load
    #[error("Script load failed: {0}")]
    ScriptLoad(String),

    /// No response arrived in time
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Non-success HTTP status
    #[error("HTTP error! Status: {status} - {body}")]
    Http { status: u16, body: String },

    /// The response could not be understood
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The callback registry is full
    #[error("Too many pending callbacks (limit {0})")]
    TooManyPending(usize),
}

impl TransportError {
    /// Whether the failure is plausibly transient and worth another attempt
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            TransportError::Connection(_) | TransportError::ScriptLoad(_) | TransportError::Timeout(_)
        )
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for CourierError {
    fn from(err: std::io::Error) -> Self {
        CourierError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for CourierError {
    fn from(err: serde_json::Error) -> Self {
        CourierError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for CourierError {
    fn from(err: toml::de::Error) -> Self {
        CourierError::Configuration(format!("TOML parse error: {err}"))
    }
}
