//! Domain identifier types with validation
//!
//! Newtype wrappers for the identifiers that flow through a submission.

use super::errors::ValidationError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use uuid::Uuid;

fn tracking_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9-]+$").expect("tracking pattern is valid"))
}

/// Parcel tracking code
///
/// Letters, digits and hyphens only, never starting or ending with a hyphen.
/// Surrounding whitespace is trimmed before checking.
///
/// # Examples
///
/// ```
/// use courier::domain::ids::TrackingCode;
///
/// let code = TrackingCode::parse("  ABC-123 ").unwrap();
/// assert_eq!(code.as_str(), "ABC-123");
/// assert!(TrackingCode::parse("-ABC").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TrackingCode(String);

impl TrackingCode {
    /// Parses and validates a tracking code
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty()
            || !tracking_pattern().is_match(trimmed)
            || trimmed.starts_with('-')
            || trimmed.ends_with('-')
        {
            return Err(ValidationError::InvalidTrackingFormat);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the tracking code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackingCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TrackingCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TrackingCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TrackingCode> for String {
    fn from(code: TrackingCode) -> Self {
        code.0
    }
}

impl AsRef<str> for TrackingCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Identifier of a single delivery attempt
///
/// Every attempt, including retries, gets its own id. Callback names for the
/// script-callback transport are derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttemptId(Uuid);

impl AttemptId {
    /// Generates a fresh attempt id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Short form used inside callback names
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..12].to_string()
    }
}

impl Default for AttemptId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
