//! Core business logic for Courier.
//!
//! # Modules
//!
//! - [`validation`] - Pure field checks over the raw form
//! - [`encoding`] - Concurrent attachment encoding
//! - [`delivery`] - Delivery state machine with retry policy
//! - [`verification`] - Reconciler confirming unacknowledged deliveries
//! - [`submit`] - Coordinator tying the stages together
//! - [`schedule`] - Injectable delays for retries and polling
//!
//! # Submission Workflow
//!
//! 1. **Validate**: fail fast on the first bad field
//! 2. **Encode**: read and base64-encode every attachment, all or nothing
//! 3. **Deliver**: one transport, retrying transient failures
//! 4. **Verify** (unacknowledged deliveries only): poll the remote store
//! 5. **Notify**: exactly one final message; reset the form on acceptance
//!
//! # Example
//!
//! ```rust,no_run
//! use courier::config::load_config;
//! use courier::core::submit::SubmissionCoordinator;
//! use courier::domain::DeclarationForm;
//! use courier::notify::Notifier;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("courier.toml")?;
//! let notifier = Arc::new(Notifier::new(&config.notifications));
//! let coordinator = SubmissionCoordinator::from_config(&config, notifier)?;
//!
//! let mut form = DeclarationForm {
//!     tracking_number: "ABC-123".into(),
//!     phone: "0123456789".into(),
//!     quantity: "1".into(),
//!     price: "9.90".into(),
//!     category: "Clothing".into(),
//!     ..Default::default()
//! };
//! let summary = coordinator.submit(&mut form).await;
//! println!("{}", summary.message);
//! # Ok(())
//! # }
//! ```

pub mod delivery;
pub mod encoding;
pub mod schedule;
pub mod submit;
pub mod validation;
pub mod verification;
