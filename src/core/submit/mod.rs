//! Submission orchestration
//!
//! [`SubmissionCoordinator`] ties validation, encoding, delivery and
//! verification together and reports the result through the notifier.

pub mod coordinator;
pub mod summary;

pub use coordinator::{SubmissionCoordinator, DEFAULT_SUCCESS_MESSAGE, SUBMITTING_MESSAGE};
pub use summary::{SubmitStatus, SubmitSummary};
