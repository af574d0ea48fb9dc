//! Serializing request throttle.

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};

/// Minimum interval between requests to the reference services.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(350);

/// Enforces a minimum interval between consecutive requests to one service.
///
/// Callers queue on the inner lock, which is held across the wait, so
/// concurrent callers are released one at a time at least `min_interval`
/// apart. Share one pacer (via `Arc`) per remote service; independent
/// services get independent pacers. Time comes from `tokio::time`, so tests
/// can drive it with a paused clock.
#[derive(Debug)]
pub struct Pacer {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl Pacer {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    pub fn shared(min_interval: Duration) -> Arc<Self> {
        Arc::new(Self::new(min_interval))
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Waits until a request may be issued and records it as issued now.
    pub async fn wait(&self) {
        let mut last_request = self.last_request.lock().await;
        if let Some(previous) = *last_request {
            let ready_at = previous + self.min_interval;
            if ready_at > Instant::now() {
                debug!(
                    "Pacing request for {}ms",
                    (ready_at - Instant::now()).as_millis()
                );
                sleep_until(ready_at).await;
            }
        }
        *last_request = Some(Instant::now());
    }
}

impl Default for Pacer {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }
}
