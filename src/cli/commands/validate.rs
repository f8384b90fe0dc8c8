//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Courier configuration file.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates as part of loading
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(2);
            }
        };

        let phone_range = match config.limits.phone_max_digits {
            Some(max) => format!("{}-{max} digits", config.limits.phone_min_digits),
            None => format!("{}+ digits", config.limits.phone_min_digits),
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Endpoint: {}", config.endpoint.url);
        println!("  Verify Endpoint: {}", config.endpoint.verification_url());
        println!(
            "  Auth Token: {}",
            if config.endpoint.auth_token.is_some() { "set" } else { "not set" }
        );
        println!("  Transport: {}", config.transport.kind);
        println!("  Max URL Length: {}", config.transport.max_url_length);
        println!(
            "  Retries: {} (initial delay {}ms)",
            config.transport.retry.max_retries, config.transport.retry.initial_delay_ms
        );
        println!(
            "  Max File Size: {} bytes (total {} bytes)",
            config.limits.max_file_size_bytes, config.limits.max_total_size_bytes
        );
        println!("  Phone: {phone_range}");
        println!(
            "  Starred Categories: {} ({}-{} files)",
            config.limits.starred_categories.len(),
            config.limits.min_files,
            config.limits.max_files
        );
        println!(
            "  Verification: {}",
            if config.verification.enabled {
                format!("{} polls", config.verification.max_attempts)
            } else {
                "disabled".to_string()
            }
        );
        println!();
        Ok(0)
    }
}
