//! Delivery
//!
//! [`DeliveryStrategy`] runs a transport under a [`RetryPolicy`] and reduces
//! everything that can happen on the wire to a single
//! [`DeliveryOutcome`](crate::domain::DeliveryOutcome).

pub mod retry;
pub mod strategy;

pub use retry::RetryPolicy;
pub use strategy::{sanitize_rejection, DeliveryReport, DeliveryStrategy, UNKNOWN_REJECTION};
