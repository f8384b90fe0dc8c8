//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::CourierConfig;
use crate::config::secret_string;
use crate::domain::errors::CourierError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into CourierConfig
/// 4. Applies environment variable overrides (COURIER_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`CourierError::Configuration`] if the file is missing or
/// unreadable, a referenced variable is unset, parsing fails, or validation
/// fails (for example when `endpoint.url` is absent).
///
/// # Examples
///
/// ```no_run
/// use courier::config::loader::load_config;
///
/// let config = load_config("courier.toml").expect("Failed to load config");
/// println!("Submitting to {}", config.endpoint.url);
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<CourierConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(CourierError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        CourierError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses configuration text, applying substitution, overrides and validation
pub fn parse_config(contents: &str) -> Result<CourierConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: CourierConfig = toml::from_str(&contents)
        .map_err(|e| CourierError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        CourierError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied untouched. Every unset variable is reported in a
/// single error.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap();
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let processed = re.replace_all(line, |cap: &regex::Captures<'_>| {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|m| m == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    cap[0].to_string()
                }
            }
        });
        result.push_str(&processed);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(CourierError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

/// Applies environment variable overrides using COURIER_* prefix
///
/// Environment variables follow the pattern: COURIER_<SECTION>_<KEY>
/// For example: COURIER_ENDPOINT_URL, COURIER_TRANSPORT_KIND
fn apply_env_overrides(config: &mut CourierConfig) -> Result<()> {
    if let Ok(val) = std::env::var("COURIER_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Endpoint overrides
    if let Ok(val) = std::env::var("COURIER_ENDPOINT_URL") {
        config.endpoint.url = val;
    }
    if let Ok(val) = std::env::var("COURIER_ENDPOINT_VERIFY_URL") {
        config.endpoint.verify_url = Some(val);
    }
    if let Ok(val) = std::env::var("COURIER_ENDPOINT_AUTH_TOKEN") {
        config.endpoint.auth_token = Some(secret_string(val));
    }
    if let Some(timeout) = env_parse("COURIER_ENDPOINT_TIMEOUT_SECONDS") {
        config.endpoint.timeout_seconds = timeout;
    }

    // Transport overrides
    if let Ok(val) = std::env::var("COURIER_TRANSPORT_KIND") {
        config.transport.kind = val.parse().map_err(CourierError::Configuration)?;
    }
    if let Some(length) = env_parse("COURIER_TRANSPORT_MAX_URL_LENGTH") {
        config.transport.max_url_length = length;
    }
    if let Some(timeout) = env_parse("COURIER_TRANSPORT_CALLBACK_TIMEOUT_SECONDS") {
        config.transport.callback_timeout_seconds = timeout;
    }
    if let Some(retries) = env_parse("COURIER_TRANSPORT_RETRY_MAX_RETRIES") {
        config.transport.retry.max_retries = retries;
    }
    if let Some(delay) = env_parse("COURIER_TRANSPORT_RETRY_INITIAL_DELAY_MS") {
        config.transport.retry.initial_delay_ms = delay;
    }

    // Limits overrides
    if let Some(size) = env_parse("COURIER_LIMITS_MAX_FILE_SIZE_BYTES") {
        config.limits.max_file_size_bytes = size;
    }
    if let Some(size) = env_parse("COURIER_LIMITS_MAX_TOTAL_SIZE_BYTES") {
        config.limits.max_total_size_bytes = size;
    }

    // Verification overrides
    if let Ok(val) = std::env::var("COURIER_VERIFICATION_ENABLED") {
        config.verification.enabled = val.parse().unwrap_or(true);
    }
    if let Some(attempts) = env_parse("COURIER_VERIFICATION_MAX_ATTEMPTS") {
        config.verification.max_attempts = attempts;
    }
    if let Some(interval) = env_parse("COURIER_VERIFICATION_INTERVAL_MS") {
        config.verification.interval_ms = interval;
    }

    // Logging overrides
    if let Ok(val) = std::env::var("COURIER_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("COURIER_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}
