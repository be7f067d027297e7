//! Poll scheduling
//!
//! The delay between two polls goes through [`Scheduler`] rather than calling
//! the clock directly, so the controller can be driven by a fake in tests.

use async_trait::async_trait;
use std::time::Duration;

/// Waits between polls
#[async_trait]
pub trait Scheduler: Send + Sync {
    /// Completes once `duration` has elapsed
    ///
    /// Dropping the returned future must cancel the wait.
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
