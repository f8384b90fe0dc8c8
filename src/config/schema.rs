//! Configuration schema types
//!
//! This module defines the configuration structure for Courier. Every tunable
//! the submission pipeline relies on is a named option here; nothing in the
//! core hard-codes limits or timings.

use crate::config::SecretString;
use crate::domain::TransportKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Main Courier configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourierConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Remote endpoint settings
    pub endpoint: EndpointConfig,

    /// Transport selection and tuning
    #[serde(default)]
    pub transport: TransportConfig,

    /// Field and attachment limits
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Delivery verification polling
    #[serde(default)]
    pub verification: VerificationConfig,

    /// Notification display timings
    #[serde(default)]
    pub notifications: NotificationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CourierConfig {
    /// Creates a configuration with defaults for everything but the endpoint
    pub fn with_endpoint(url: impl Into<String>) -> Self {
        Self {
            application: ApplicationConfig::default(),
            endpoint: EndpointConfig {
                url: url.into(),
                ..Default::default()
            },
            transport: TransportConfig::default(),
            limits: LimitsConfig::default(),
            verification: VerificationConfig::default(),
            notifications: NotificationConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.endpoint.validate()?;
        self.transport.validate()?;
        self.limits.validate()?;
        self.verification.validate()?;
        self.notifications.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Remote endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Submission endpoint URL (required)
    #[serde(default)]
    pub url: String,

    /// Verification read endpoint; defaults to `url`
    #[serde(default)]
    pub verify_url: Option<String>,

    /// Optional bearer token sent with every request
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub auth_token: Option<SecretString>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl EndpointConfig {
    fn validate(&self) -> Result<(), String> {
        if self.url.trim().is_empty() {
            return Err("endpoint.url cannot be empty".to_string());
        }

        check_http_url("endpoint.url", &self.url)?;
        if let Some(verify_url) = &self.verify_url {
            check_http_url("endpoint.verify_url", verify_url)?;
        }

        if self.timeout_seconds == 0 {
            return Err("endpoint.timeout_seconds must be > 0".to_string());
        }
        Ok(())
    }

    /// URL used for verification reads
    pub fn verification_url(&self) -> &str {
        self.verify_url.as_deref().unwrap_or(&self.url)
    }

    /// Request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            verify_url: None,
            auth_token: None,
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

fn check_http_url(field: &str, value: &str) -> Result<(), String> {
    if !value.starts_with("http://") && !value.starts_with("https://") {
        return Err(format!("{field} must start with http:// or https://"));
    }
    url::Url::parse(value).map_err(|e| format!("{field} is not a valid URL: {e}"))?;
    Ok(())
}

/// Retry configuration for transient transport failures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Delay before the first retry in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Backoff multiplier
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_retries > 10 {
            return Err(format!(
                "transport.retry.max_retries must be <= 10, got {}",
                self.max_retries
            ));
        }
        if self.backoff_multiplier < 1.0 {
            return Err(format!(
                "transport.retry.backoff_multiplier must be >= 1.0, got {}",
                self.backoff_multiplier
            ));
        }
        if self.max_delay_ms < self.initial_delay_ms {
            return Err("transport.retry.max_delay_ms must be >= initial_delay_ms".to_string());
        }
        Ok(())
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

/// Transport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Which transport delivers submissions
    #[serde(default)]
    pub kind: TransportKind,

    /// Maximum URL length for the script-callback transport
    #[serde(default = "default_max_url_length")]
    pub max_url_length: usize,

    /// How long the script-callback transport waits for its callback
    #[serde(default = "default_callback_timeout_seconds")]
    pub callback_timeout_seconds: u64,

    /// Maximum callbacks awaiting an answer at once
    #[serde(default = "default_max_pending_callbacks")]
    pub max_pending_callbacks: usize,

    /// Procedure name invoked by the host-bridge transport
    #[serde(default = "default_bridge_procedure")]
    pub bridge_procedure: String,

    /// Maximum length of a server rejection message shown to the user
    #[serde(default = "default_rejection_message_max_length")]
    pub rejection_message_max_length: usize,

    /// Attachment names are truncated to this many characters
    #[serde(default = "default_file_name_max_length")]
    pub file_name_max_length: usize,

    /// Description is truncated to this many characters in query strings
    #[serde(default = "default_description_max_length")]
    pub description_max_length: usize,

    /// Short query keys used by the script-callback transport
    /// (field name -> alias); missing entries use the full field name
    #[serde(default = "default_aliases")]
    pub aliases: BTreeMap<String, String>,

    /// Retry policy
    #[serde(default)]
    pub retry: RetryConfig,
}

impl TransportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_url_length < 256 {
            return Err(format!(
                "transport.max_url_length must be >= 256, got {}",
                self.max_url_length
            ));
        }
        if self.callback_timeout_seconds == 0 {
            return Err("transport.callback_timeout_seconds must be > 0".to_string());
        }
        if self.max_pending_callbacks == 0 || self.max_pending_callbacks > 1024 {
            return Err(format!(
                "transport.max_pending_callbacks must be between 1 and 1024, got {}",
                self.max_pending_callbacks
            ));
        }
        if self.bridge_procedure.trim().is_empty() {
            return Err("transport.bridge_procedure cannot be empty".to_string());
        }
        if self.file_name_max_length == 0 {
            return Err("transport.file_name_max_length must be > 0".to_string());
        }

        let mut seen = std::collections::BTreeSet::new();
        for (field, alias) in &self.aliases {
            if alias.is_empty() {
                return Err(format!("transport.aliases.{field} cannot be empty"));
            }
            if !seen.insert(alias.as_str()) {
                return Err(format!("transport.aliases has duplicate alias '{alias}'"));
            }
        }

        self.retry.validate()?;
        Ok(())
    }

    /// Callback wait as a Duration
    pub fn callback_timeout(&self) -> Duration {
        Duration::from_secs(self.callback_timeout_seconds)
    }

    /// Query key for a field, falling back to the field name
    pub fn alias<'a>(&'a self, field: &'a str) -> &'a str {
        self.aliases.get(field).map(String::as_str).unwrap_or(field)
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            kind: TransportKind::default(),
            max_url_length: default_max_url_length(),
            callback_timeout_seconds: default_callback_timeout_seconds(),
            max_pending_callbacks: default_max_pending_callbacks(),
            bridge_procedure: default_bridge_procedure(),
            rejection_message_max_length: default_rejection_message_max_length(),
            file_name_max_length: default_file_name_max_length(),
            description_max_length: default_description_max_length(),
            aliases: default_aliases(),
            retry: RetryConfig::default(),
        }
    }
}

/// Field and attachment limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Per-file size ceiling in bytes
    #[serde(default = "default_max_file_size_bytes")]
    pub max_file_size_bytes: u64,

    /// Combined attachment ceiling in bytes
    #[serde(default = "default_max_total_size_bytes")]
    pub max_total_size_bytes: u64,

    /// Minimum phone digits
    #[serde(default = "default_phone_min_digits")]
    pub phone_min_digits: usize,

    /// Maximum phone digits; `0` in TOML means no upper bound
    #[serde(
        default = "default_phone_max_digits",
        deserialize_with = "deserialize_optional_bound"
    )]
    pub phone_max_digits: Option<usize>,

    /// Minimum attachments for starred categories
    #[serde(default = "default_min_files")]
    pub min_files: usize,

    /// Maximum attachments for starred categories
    #[serde(default = "default_max_files")]
    pub max_files: usize,

    /// Categories that require evidence files
    #[serde(default = "default_starred_categories")]
    pub starred_categories: Vec<String>,
}

fn deserialize_optional_bound<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let bound = usize::deserialize(deserializer)?;
    Ok((bound > 0).then_some(bound))
}

impl LimitsConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_file_size_bytes == 0 {
            return Err("limits.max_file_size_bytes must be > 0".to_string());
        }
        if self.max_total_size_bytes < self.max_file_size_bytes {
            return Err(
                "limits.max_total_size_bytes must be >= limits.max_file_size_bytes".to_string(),
            );
        }
        if self.phone_min_digits == 0 {
            return Err("limits.phone_min_digits must be > 0".to_string());
        }
        if let Some(max) = self.phone_max_digits {
            if max < self.phone_min_digits {
                return Err(format!(
                    "limits.phone_max_digits ({max}) must be >= phone_min_digits ({})",
                    self.phone_min_digits
                ));
            }
        }
        if self.max_files < self.min_files {
            return Err(format!(
                "limits.max_files ({}) must be >= limits.min_files ({})",
                self.max_files, self.min_files
            ));
        }
        Ok(())
    }

    /// Whether a category requires evidence files
    pub fn is_starred(&self, category: &str) -> bool {
        self.starred_categories.iter().any(|c| c == category)
    }

    /// The stricter profile observed on the script-callback deployment
    pub fn strict() -> Self {
        Self {
            max_file_size_bytes: 3 * 1024 * 1024,
            ..Self::default()
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: default_max_file_size_bytes(),
            max_total_size_bytes: default_max_total_size_bytes(),
            phone_min_digits: default_phone_min_digits(),
            phone_max_digits: default_phone_max_digits(),
            min_files: default_min_files(),
            max_files: default_max_files(),
            starred_categories: default_starred_categories(),
        }
    }
}

/// Delivery verification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationConfig {
    /// Poll for unconfirmed deliveries
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Maximum number of polls
    #[serde(default = "default_verify_max_attempts")]
    pub max_attempts: usize,

    /// Delay before the first poll in milliseconds
    #[serde(default = "default_verify_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Delay between polls in milliseconds
    #[serde(default = "default_verify_interval_ms")]
    pub interval_ms: u64,

    /// Upper bound of random jitter added to the first delay
    #[serde(default)]
    pub jitter_ms: u64,
}

impl VerificationConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 || self.max_attempts > 20 {
            return Err(format!(
                "verification.max_attempts must be between 1 and 20, got {}",
                self.max_attempts
            ));
        }
        Ok(())
    }
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_attempts: default_verify_max_attempts(),
            initial_delay_ms: default_verify_initial_delay_ms(),
            interval_ms: default_verify_interval_ms(),
            jitter_ms: 0,
        }
    }
}

/// Notification display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// How long success messages stay visible in milliseconds
    #[serde(default = "default_success_ttl_ms")]
    pub success_ttl_ms: u64,

    /// How long error messages stay visible in milliseconds
    #[serde(default = "default_error_ttl_ms")]
    pub error_ttl_ms: u64,
}

impl NotificationConfig {
    fn validate(&self) -> Result<(), String> {
        if self.success_ttl_ms == 0 || self.error_ttl_ms == 0 {
            return Err("notifications TTLs must be > 0".to_string());
        }
        Ok(())
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            success_ttl_ms: default_success_ttl_ms(),
            error_ttl_ms: default_error_ttl_ms(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log file path
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_max_retries() -> usize {
    1
}

fn default_initial_delay_ms() -> u64 {
    2000
}

fn default_max_delay_ms() -> u64 {
    30000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_max_url_length() -> usize {
    2000
}

fn default_callback_timeout_seconds() -> u64 {
    15
}

fn default_max_pending_callbacks() -> usize {
    32
}

fn default_bridge_procedure() -> String {
    "processForm".to_string()
}

fn default_rejection_message_max_length() -> usize {
    200
}

fn default_file_name_max_length() -> usize {
    100
}

fn default_description_max_length() -> usize {
    500
}

fn default_aliases() -> BTreeMap<String, String> {
    [
        ("trackingNumber", "t"),
        ("phone", "p"),
        ("quantity", "q"),
        ("price", "pr"),
        ("description", "d"),
        ("collectionPoint", "cp"),
        ("itemCategory", "c"),
        ("fileName", "fn"),
        ("fileType", "ft"),
        ("fileData", "fd"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn default_max_file_size_bytes() -> u64 {
    5 * 1024 * 1024
}

fn default_max_total_size_bytes() -> u64 {
    5 * 1024 * 1024
}

fn default_phone_min_digits() -> usize {
    6
}

fn default_phone_max_digits() -> Option<usize> {
    Some(15)
}

fn default_min_files() -> usize {
    1
}

fn default_max_files() -> usize {
    3
}

fn default_starred_categories() -> Vec<String> {
    [
        "*Books",
        "*Cosmetics/Skincare/Bodycare",
        "*Food Beverage/Drinks",
        "*Gadgets",
        "*Oil Ointment",
        "*Supplement",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

fn default_verify_max_attempts() -> usize {
    5
}

fn default_verify_initial_delay_ms() -> u64 {
    3000
}

fn default_verify_interval_ms() -> u64 {
    2000
}

fn default_success_ttl_ms() -> u64 {
    5000
}

fn default_error_ttl_ms() -> u64 {
    8000
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
