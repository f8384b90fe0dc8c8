// Courier - Parcel declaration submission client
// Copyright (c) 2025 Courier Contributors
// Licensed under the MIT License

//! # Courier - Parcel declaration submission
//!
//! Courier validates a parcel declaration form, encodes its evidence files
//! and delivers the submission to a remote script endpoint over one of
//! several transports. When a transport cannot acknowledge the delivery,
//! Courier polls the remote record store until the submission shows up.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Validation, encoding, delivery, verification and the submission flow
//! - [`adapters`] - Transports and the remote record store
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`notify`] - User-facing status notifications
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use courier::config::load_config;
//! use courier::core::submit::SubmissionCoordinator;
//! use courier::domain::DeclarationForm;
//! use courier::notify::Notifier;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("courier.toml")?;
//!     let notifier = Arc::new(Notifier::new(&config.notifications));
//!     let coordinator = SubmissionCoordinator::from_config(&config, notifier)?;
//!
//!     let mut form = DeclarationForm {
//!         tracking_number: "ABC-123".into(),
//!         phone: "0123456789".into(),
//!         quantity: "1".into(),
//!         price: "19.99".into(),
//!         category: "Clothing".into(),
//!         ..Default::default()
//!     };
//!
//!     let summary = coordinator.submit(&mut form).await;
//!     println!("{}", summary.format_summary());
//!     Ok(())
//! }
//! ```
//!
//! ## Transports
//!
//! - **direct**: JSON POST answered synchronously
//! - **script_callback**: query-string GET answered by a named callback
//! - **hidden_frame**: fire-and-forget form post, always verified afterwards
//! - **host_bridge**: procedure call through a host-provided bridge
//!
//! ## Error Handling
//!
//! Fallible library calls return [`domain::Result`], an alias over
//! [`domain::CourierError`]. The submission flow itself never fails: every
//! outcome is folded into a [`core::submit::SubmitSummary`].

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
pub mod notify;
