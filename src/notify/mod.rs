//! User-visible notifications
//!
//! A [`Notifier`] shows one `{text, severity}` message at a time and hands
//! it to every attached [`NotificationSink`].
//!
//! ```rust
//! use courier::notify::{Notifier, Severity};
//!
//! let notifier = Notifier::default();
//! notifier.pending("Submitting...");
//! assert_eq!(notifier.current().unwrap().severity, Severity::Pending);
//! ```

pub mod board;
pub mod sink;

pub use board::{Notification, Notifier, Severity};
pub use sink::{ConsoleSink, MemorySink, NotificationSink};
