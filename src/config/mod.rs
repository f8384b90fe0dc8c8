//! Configuration management for Courier.
//!
//! Courier reads a TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `COURIER_<SECTION>_<KEY>` environment overrides
//! - Default values for every optional tunable
//! - Validation on load (a missing `endpoint.url` fails fast)
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use courier::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("courier.toml")?;
//! println!("Endpoint: {}", config.endpoint.url);
//! println!("Transport: {}", config.transport.kind);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - log level
//! - [`EndpointConfig`] - submission and verification URLs, token, timeout
//! - [`TransportConfig`] - transport kind, URL budget, aliases, retry policy
//! - [`LimitsConfig`] - file sizes, phone length, starred categories
//! - [`VerificationConfig`] - poll count and timings
//! - [`NotificationConfig`] - message lifetimes
//! - [`LoggingConfig`] - local file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [endpoint]
//! url = "https://script.google.com/macros/s/DEPLOYMENT/exec"
//! auth_token = "${COURIER_TOKEN}"
//!
//! [transport]
//! kind = "script_callback"
//! max_url_length = 2000
//!
//! [transport.retry]
//! max_retries = 1
//! initial_delay_ms = 2000
//!
//! [limits]
//! max_file_size_bytes = 3145728
//!
//! [verification]
//! max_attempts = 5
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, CourierConfig, EndpointConfig, LimitsConfig, LoggingConfig,
    NotificationConfig, RetryConfig, TransportConfig, VerificationConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
