//! Verify command implementation
//!
//! Polls the record store for a tracking number using the configured
//! verification budget. Useful after a submission ended pending.

use crate::adapters::store::HttpRecordStore;
use crate::adapters::transport::build_http_client;
use crate::config::load_config;
use crate::core::verification::{PollPolicy, VerificationReconciler};
use crate::domain::TrackingCode;
use clap::Args;
use std::sync::Arc;

/// Arguments for the verify command
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Tracking number to look up
    #[arg(short, long)]
    pub tracking: String,

    /// Override the configured number of polls
    #[arg(long)]
    pub attempts: Option<usize>,
}

impl VerifyArgs {
    /// Execute the verify command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, tracking = %self.tracking, "Verifying submission");

        let tracking = match TrackingCode::parse(&self.tracking) {
            Ok(code) => code,
            Err(e) => {
                println!("❌ {e}");
                return Ok(2);
            }
        };

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let client = build_http_client(&config.endpoint)?;
        let store = Arc::new(HttpRecordStore::new(
            client,
            config.endpoint.verification_url(),
            config.endpoint.timeout(),
        ));

        let mut policy = PollPolicy::from(&config.verification);
        if let Some(attempts) = self.attempts {
            policy.max_attempts = attempts;
        }

        println!("🔍 Checking tracking number {tracking}");
        let state = VerificationReconciler::new(store, policy)
            .reconcile(&tracking)
            .await;

        println!();
        print!("{}", state.format_summary());

        if state.is_confirmed() {
            println!("✅ Submission found");
            Ok(0)
        } else {
            println!("⏳ Submission not found yet. Please check again later.");
            Ok(3)
        }
    }
}
