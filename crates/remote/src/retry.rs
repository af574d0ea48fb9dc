//! Exponential backoff for retryable remote failures.

use std::future::Future;
use std::time::Duration;

use log::debug;
use tokio::time::sleep;

use crate::error::{Result, RetryClass};

pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(500);
const MAX_EXPONENT: u32 = 16;

/// Retry ceiling and base delay. The delay doubles after every attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Delay before retry number `retry` (0-based): `base * 2^retry`.
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.base_delay
            .saturating_mul(1_u32 << retry.min(MAX_EXPONENT))
    }

    /// Total attempts including the first.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Runs `operation`, retrying [`RetryClass::Retryable`] failures until
    /// the ceiling. Exhausting retries returns the last error.
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut retry = 0u32;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err)
                    if err.retry_class() == RetryClass::Retryable && retry < self.max_retries =>
                {
                    let delay = self.delay_for(retry);
                    debug!(
                        "Retry attempt {}/{} after {}ms: {}",
                        retry + 2,
                        self.max_attempts(),
                        delay.as_millis(),
                        err
                    );
                    sleep(delay).await;
                    retry += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
