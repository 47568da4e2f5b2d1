//! Inter-request pacing.
//!
//! Pacing is a politeness policy toward the backend, not a correctness
//! requirement, so the dispatcher takes it as a pluggable strategy.

use std::time::Duration;

use async_trait::async_trait;

/// Default pause between two prompts.
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_secs(1);

/// Waits between two consecutive prompt dispatches.
#[async_trait]
pub trait RequestPacer: Send + Sync {
    async fn pause(&self);
}

/// Sleeps for a fixed duration. A zero delay does not sleep at all.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelayPacer {
    delay: Duration,
}

impl FixedDelayPacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn none() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for FixedDelayPacer {
    fn default() -> Self {
        Self::new(DEFAULT_REQUEST_DELAY)
    }
}

#[async_trait]
impl RequestPacer for FixedDelayPacer {
    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}
