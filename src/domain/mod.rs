//! Domain models and types for Courier.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Identifiers** ([`TrackingCode`], [`AttemptId`])
//! - **Form input** ([`DeclarationForm`], [`AttachedFile`])
//! - **Payload** ([`SubmissionPayload`], [`EncodedFile`])
//! - **Delivery records** ([`DeliveryOutcome`], [`DeliveryAttempt`], [`TransportKind`])
//! - **Error types** ([`CourierError`], [`ValidationError`], [`EncodingError`], [`TransportError`])
//! - **Result type alias** ([`Result`])
//!
//! # Builder Pattern
//!
//! ```rust
//! use courier::domain::{SubmissionPayload, TrackingCode};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let payload = SubmissionPayload::builder()
//!     .tracking_number(TrackingCode::parse("ABC-123")?)
//!     .phone("0123456789")
//!     .quantity(2)
//!     .price(19.99)
//!     .category("Clothing")
//!     .build()?;
//! # Ok(())
//! # }
//! ```

pub mod delivery;
pub mod errors;
pub mod form;
pub mod ids;
pub mod payload;
pub mod result;

// Re-export commonly used types for convenience
pub use delivery::{
    AttemptStatus, Confirmation, DeliveryAttempt, DeliveryOutcome, FailureReason,
    RemoteResponse, TransportKind,
};
pub use errors::{CourierError, EncodingError, EncodingErrorKind, TransportError, ValidationError};
pub use form::{AttachedFile, DeclarationForm, FileSource};
pub use ids::{AttemptId, TrackingCode};
pub use payload::{EncodedFile, SubmissionPayload, SubmissionPayloadBuilder};
pub use result::Result;
