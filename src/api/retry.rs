use std::future::Future;
use std::time::Duration;

use tracing::{error, warn};

use crate::error::{Result, StudioError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(2000),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Back-off after the 1-based `attempt` failed: linear in the attempt.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

/// Runs `call` until it succeeds, fails with a non-transient error, or the
/// attempts run out. Exhaustion surfaces as
/// [`StudioError::ServiceOverloaded`].
pub async fn with_retry<T, F, Fut>(policy: RetryPolicy, label: &str, mut call: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = policy.max_attempts.max(1);

    for attempt in 1..=attempts {
        match call().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() => {
                if attempt == attempts {
                    error!("{} still unavailable after {} attempts: {}", label, attempts, e);
                    break;
                }
                let delay = policy.delay_for(attempt);
                warn!(
                    "{} attempt {}/{} failed: {}. Retrying in {:?}",
                    label, attempt, attempts, e, delay
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => {
                error!("{} failed: {}", label, e);
                return Err(e);
            }
        }
    }

    Err(StudioError::ServiceOverloaded)
}
