//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "courier.toml")]
    pub output: String,

    /// Generate the strict profile (script callback transport, 3 MiB files)
    #[arg(long)]
    pub strict: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, strict = self.strict, "Initializing configuration file");

        println!("📝 Initializing Courier configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.strict {
            Self::generate_strict_config()
        } else {
            Self::generate_default_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Set endpoint.url in {} to your deployment", self.output);
                println!("  2. Optionally set COURIER_ENDPOINT_AUTH_TOKEN in a .env file");
                println!("  3. Validate configuration: courier validate-config");
                println!("  4. Check connectivity: courier ping");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    /// Configuration for the direct JSON transport
    fn generate_default_config() -> String {
        r#"# Courier Configuration File
# Parcel declaration submission client

[application]
log_level = "info"

[endpoint]
url = "https://script.google.com/macros/s/YOUR_DEPLOYMENT_ID/exec"
# verify_url = "https://script.google.com/macros/s/YOUR_DEPLOYMENT_ID/exec"
# auth_token = "${COURIER_TOKEN}"
timeout_seconds = 30

[transport]
# direct, script_callback, hidden_frame or host_bridge
kind = "direct"

[transport.retry]
max_retries = 1
initial_delay_ms = 2000

[limits]
max_file_size_bytes = 5242880
max_total_size_bytes = 5242880
phone_min_digits = 6
phone_max_digits = 15
min_files = 1
max_files = 3

[verification]
enabled = true
max_attempts = 5
initial_delay_ms = 3000
interval_ms = 2000

[notifications]
success_ttl_ms = 5000
error_ttl_ms = 8000

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Configuration for deployments only reachable through script callbacks
    fn generate_strict_config() -> String {
        r#"# Courier Configuration File (strict profile)
# Parcel declaration submission client
#
# Every field travels in the query string, so the URL budget and the
# short field aliases below decide how large an attachment can be.

[application]
log_level = "info"

[endpoint]
url = "https://script.google.com/macros/s/YOUR_DEPLOYMENT_ID/exec"
# auth_token = "${COURIER_TOKEN}"
timeout_seconds = 30

[transport]
kind = "script_callback"
max_url_length = 2000
callback_timeout_seconds = 15
max_pending_callbacks = 32

[transport.aliases]
trackingNumber = "t"
phone = "p"
quantity = "q"
price = "pr"
description = "d"
collectionPoint = "cp"
itemCategory = "c"
fileName = "fn"
fileType = "ft"
fileData = "fd"

[transport.retry]
max_retries = 1
initial_delay_ms = 2000

[limits]
max_file_size_bytes = 3145728
max_total_size_bytes = 5242880
phone_min_digits = 6
# 0 leaves the phone number unbounded above
phone_max_digits = 15
min_files = 1
max_files = 3
starred_categories = [
    "*Books",
    "*Cosmetics/Skincare/Bodycare",
    "*Food Beverage/Drinks",
    "*Gadgets",
    "*Oil Ointment",
    "*Supplement",
]

[verification]
enabled = true
max_attempts = 5
initial_delay_ms = 3000
interval_ms = 2000
jitter_ms = 500

[notifications]
success_ttl_ms = 5000
error_ttl_ms = 8000

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#
        .to_string()
    }
}
