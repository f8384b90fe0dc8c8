//! Delay scheduling
//!
//! Retry backoff and verification polling wait through a [`Scheduler`] so the
//! timing policy can be exercised without real sleeps.

use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

/// Source of delays for retry and polling loops
#[async_trait]
pub trait Scheduler: Send + Sync {
    /// Wait for `duration` before resuming
    async fn sleep(&self, duration: Duration);
}

/// Scheduler backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

#[async_trait]
impl Scheduler for TokioScheduler {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Scheduler that returns immediately and remembers every requested delay
#[derive(Debug, Default)]
pub struct RecordingScheduler {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays requested so far, in order
    pub fn delays(&self) -> Vec<Duration> {
        self.delays
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl Scheduler for RecordingScheduler {
    async fn sleep(&self, duration: Duration) {
        self.delays
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recording_scheduler_keeps_order() {
        let scheduler = RecordingScheduler::new();
        scheduler.sleep(Duration::from_millis(3000)).await;
        scheduler.sleep(Duration::from_millis(2000)).await;
        assert_eq!(
            scheduler.delays(),
            vec![Duration::from_millis(3000), Duration::from_millis(2000)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_scheduler_waits() {
        let start = tokio::time::Instant::now();
        TokioScheduler.sleep(Duration::from_secs(2)).await;
        assert!(start.elapsed() >= Duration::from_secs(2));
    }
}
