//! Submit command implementation
//!
//! This module implements the `submit` command: it builds a declaration form
//! from flags, runs it through the submission coordinator and prints the
//! resulting notification.

use crate::config::{load_config, CourierConfig};
use crate::core::submit::SubmissionCoordinator;
use crate::domain::{AttachedFile, DeclarationForm, TransportKind};
use crate::notify::{ConsoleSink, Notifier};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the submit command
#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// Parcel tracking number
    #[arg(short, long)]
    pub tracking: String,

    /// Contact phone number (digits only)
    #[arg(short, long)]
    pub phone: String,

    /// Number of items
    #[arg(short, long)]
    pub quantity: String,

    /// Declared price
    #[arg(long)]
    pub price: String,

    /// Item category; starred categories require evidence files
    #[arg(long)]
    pub category: String,

    /// Item description
    #[arg(short, long, default_value = "")]
    pub description: String,

    /// Collection point
    #[arg(long, default_value = "")]
    pub collection_point: String,

    /// Evidence file to attach (repeatable)
    #[arg(short, long = "file")]
    pub files: Vec<PathBuf>,

    /// Override the configured transport
    #[arg(long)]
    pub transport: Option<TransportKind>,

    /// Skip verification of unacknowledged deliveries
    #[arg(long)]
    pub no_verify: bool,

    /// Print a detailed summary after the notification
    #[arg(long)]
    pub summary: bool,
}

impl SubmitArgs {
    /// Execute the submit command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Starting submission");

        let config = match load_config(config_path) {
            Ok(c) => self.apply_overrides(c),
            Err(e) => {
                println!("❌ Failed to load configuration");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let mut form = match self.build_form() {
            Ok(form) => form,
            Err(e) => {
                println!("❌ {e}");
                return Ok(2);
            }
        };

        let notifier = Arc::new(
            Notifier::new(&config.notifications).with_sink(Arc::new(ConsoleSink)),
        );
        let coordinator = match SubmissionCoordinator::from_config(&config, notifier) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to prepare transport");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let summary = coordinator.submit(&mut form).await;

        if self.summary {
            println!();
            print!("{}", summary.format_summary());
        }

        Ok(summary.exit_code())
    }

    fn apply_overrides(&self, mut config: CourierConfig) -> CourierConfig {
        if let Some(kind) = self.transport {
            config.transport.kind = kind;
        }
        if self.no_verify {
            config.verification.enabled = false;
        }
        config
    }

    /// Build the raw form; attachments are checked for existence only
    fn build_form(&self) -> anyhow::Result<DeclarationForm> {
        let files = self
            .files
            .iter()
            .map(|path| {
                AttachedFile::from_path(path)
                    .map_err(|e| anyhow::anyhow!("Cannot attach {}: {e}", path.display()))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(DeclarationForm {
            tracking_number: self.tracking.clone(),
            phone: self.phone.clone(),
            quantity: self.quantity.clone(),
            price: self.price.clone(),
            description: self.description.clone(),
            collection_point: self.collection_point.clone(),
            category: self.category.clone(),
            files,
        })
    }
}
