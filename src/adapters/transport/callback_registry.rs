//! Registry of callbacks awaiting a script answer
//!
//! Each script-callback attempt registers a uniquely named callback together
//! with the handle of the task that loads the script. Whoever takes an entry
//! out of the map (the answer, a load error, or the timeout) owns it: that
//! party resolves the waiter and releases the loader, and every later attempt
//! to do the same finds nothing and does nothing.

use crate::domain::{AttemptId, RemoteResponse, TransportError};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::oneshot;
use tokio::task::AbortHandle;

/// What a pending callback resolves to
pub type CallbackResult = Result<RemoteResponse, TransportError>;

/// Prefix of every generated callback name
pub const CALLBACK_PREFIX: &str = "courier_cb_";

struct PendingCallback {
    sender: oneshot::Sender<CallbackResult>,
    loader: Option<AbortHandle>,
}

/// Bounded, idempotent callback registry
pub struct CallbackRegistry {
    entries: Mutex<HashMap<String, PendingCallback>>,
    capacity: usize,
    released: AtomicUsize,
}

impl CallbackRegistry {
    /// Create a registry holding at most `capacity` pending callbacks
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            capacity,
            released: AtomicUsize::new(0),
        }
    }

    /// Unique callback name for an attempt
    ///
    /// The millisecond timestamp orders names; the attempt id keeps two
    /// attempts in the same millisecond apart.
    pub fn callback_name(attempt: &AttemptId) -> String {
        format!(
            "{}{}_{}",
            CALLBACK_PREFIX,
            Utc::now().timestamp_millis(),
            attempt.short()
        )
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, PendingCallback>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register a callback and get the receiver its answer arrives on
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::TooManyPending`] when the registry is full and
    /// [`TransportError::InvalidResponse`] if the name is already pending.
    pub fn register(&self, name: &str) -> Result<oneshot::Receiver<CallbackResult>, TransportError> {
        let mut entries = self.lock();
        if entries.len() >= self.capacity {
            return Err(TransportError::TooManyPending(self.capacity));
        }
        if entries.contains_key(name) {
            return Err(TransportError::InvalidResponse(format!(
                "callback '{name}' is already pending"
            )));
        }

        let (sender, receiver) = oneshot::channel();
        entries.insert(
            name.to_string(),
            PendingCallback {
                sender,
                loader: None,
            },
        );
        Ok(receiver)
    }

    /// Attach the loader task to a pending callback
    ///
    /// Returns false when the callback already finished; the loader is then
    /// left alone because it has nothing more to do.
    pub fn attach_loader(&self, name: &str, loader: AbortHandle) -> bool {
        match self.lock().get_mut(name) {
            Some(entry) => {
                entry.loader = Some(loader);
                true
            }
            None => false,
        }
    }

    /// Resolve a callback with its answer
    ///
    /// Returns true only for the call that actually resolved it.
    pub fn complete(&self, name: &str, result: CallbackResult) -> bool {
        let Some(entry) = self.take(name) else {
            tracing::debug!(callback = %name, "Callback already resolved, ignoring");
            return false;
        };
        // The waiter may have gone away; the entry is released either way.
        let _ = entry.sender.send(result);
        true
    }

    /// Drop a pending callback without an answer and stop its loader
    ///
    /// Returns true only for the call that actually removed it.
    pub fn cancel(&self, name: &str) -> bool {
        let Some(entry) = self.take(name) else {
            return false;
        };
        if let Some(loader) = entry.loader {
            loader.abort();
        }
        true
    }

    fn take(&self, name: &str) -> Option<PendingCallback> {
        let entry = self.lock().remove(name)?;
        self.released.fetch_add(1, Ordering::SeqCst);
        Some(entry)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lock().contains_key(name)
    }

    /// Number of pending callbacks
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How many entries have been released over the registry's lifetime
    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}
