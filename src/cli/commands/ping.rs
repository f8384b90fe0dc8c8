//! Ping command implementation
//!
//! Sends an empty POST to the configured endpoint and reports whether it
//! answered. Any HTTP status counts as reachable.

use crate::adapters::transport::build_http_client;
use crate::adapters::transport::client::classify_request_error;
use crate::config::load_config;
use clap::Args;
use std::time::Instant;

/// Arguments for the ping command
#[derive(Args, Debug)]
pub struct PingArgs {}

impl PingArgs {
    /// Execute the ping command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Pinging endpoint");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!("📡 Pinging {}", config.endpoint.url);

        let client = build_http_client(&config.endpoint)?;
        let started = Instant::now();
        let result = client
            .post(&config.endpoint.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body("{}")
            .send()
            .await;

        match result {
            Ok(response) => {
                let status = response.status();
                let elapsed = started.elapsed();
                tracing::debug!(status = status.as_u16(), elapsed_ms = elapsed.as_millis() as u64, "Endpoint answered");
                println!("✅ Endpoint reachable: HTTP {status} in {}ms", elapsed.as_millis());
                Ok(0)
            }
            Err(e) => {
                let error = classify_request_error(&e, config.endpoint.timeout());
                crate::log_error_with_context!(error, "endpoint ping");
                println!("❌ Endpoint unreachable");
                println!("   Error: {error}");
                Ok(1)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn config_file(url: &str) -> NamedTempFile {
        let mut temp = NamedTempFile::new().unwrap();
        write!(temp, "[endpoint]\nurl = \"{url}\"\ntimeout_seconds = 2\n").unwrap();
        temp.flush().unwrap();
        temp
    }

    #[tokio::test]
    async fn test_ping_reachable() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/exec")
            .with_status(405)
            .create_async()
            .await;

        let config = config_file(&format!("{}/exec", server.url()));
        let code = PingArgs {}
            .execute(config.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 0);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_ping_unreachable() {
        let config = config_file("http://127.0.0.1:1/exec");
        let code = PingArgs {}
            .execute(config.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 1);
    }

    #[tokio::test]
    async fn test_ping_missing_config() {
        let code = PingArgs {}.execute("missing-courier.toml").await.unwrap();
        assert_eq!(code, 2);
    }
}
