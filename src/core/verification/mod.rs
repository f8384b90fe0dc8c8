//! Delivery verification
//!
//! Confirms deliveries whose transport could not observe an answer by
//! re-reading the remote store. States move `Idle → Polling → {Confirmed,
//! GaveUp}`; see [`VerificationReconciler`].

pub mod reconciler;
pub mod state;

pub use reconciler::{PollPolicy, VerificationReconciler};
pub use state::{PollResult, ReconcilerPhase, VerificationState};
