//! Fixed-delay retry for fallible async operations
//!
//! Provides the bounded retry policy and combinator the connection
//! bootstrapper wraps its connect sequence in. The combinator knows
//! nothing about connections and works for any fallible async operation.

use crate::error::Result;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Retry policy: a bounded attempt budget with a fixed delay
///
/// `max_attempts` is the total number of attempts, so a policy of 3
/// attempts sleeps at most twice. A budget of 0 still performs one
/// attempt; the failure then propagates without any retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts
    pub max_attempts: u32,
    /// Delay between attempts
    pub delay: Duration,
}

impl RetryPolicy {
    /// Create a policy with a fixed delay between attempts
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            delay: Duration::from_millis(3000),
        }
    }
}

/// Execute an async operation, retrying failures under the given policy
///
/// Every failure is retried until the attempt budget is exhausted; the
/// last failure is then returned to the caller. There is no backoff and
/// no jitter, and a retry loop cannot be cancelled from the outside:
/// it runs to success or exhaustion.
pub async fn with_retry<F, Fut, T>(policy: RetryPolicy, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let budget = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) => {
                if attempt >= budget {
                    return Err(error);
                }

                log::warn!(
                    "Attempt {}/{} failed, retrying in {:?}: {}",
                    attempt,
                    budget,
                    policy.delay,
                    error
                );

                attempt += 1;
                sleep(policy.delay).await;
            }
        }
    }
}
