//! Bounded fixed-delay retry.

use std::future::Future;
use std::time::Duration;

/// A bounded retry budget with a fixed delay between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay between consecutive attempts.
    pub delay: Duration,
}

impl RetryPolicy {
    /// A policy with a fixed delay and no backoff growth.
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Run `op` until it succeeds or the budget is exhausted.
    ///
    /// Returns the error of the final attempt on exhaustion. The budget
    /// is at least one attempt even if `max_attempts` is 0.
    pub async fn run<T, E, F, Fut>(&self, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let attempts = self.max_attempts.max(1);
        let mut last_err = None;

        for attempt in 1..=attempts {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    tracing::debug!(attempt, max_attempts = attempts, "attempt failed");
                    last_err = Some(e);
                }
            }
            if attempt < attempts {
                tokio::time::sleep(self.delay).await;
            }
        }

        Err(last_err.expect("at least one attempt was made"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn succeeds_without_using_the_budget() {
        let policy = RetryPolicy::fixed(5, Duration::from_secs(2));
        let calls = AtomicU32::new(0);

        let result: Result<u32, &str> = policy
            .run(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(7)
            })
            .await;

        assert_eq!(result, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn retries_until_success() {
        let policy = RetryPolicy::fixed(5, Duration::from_secs(2));
        let calls = AtomicU32::new(0);

        let result: Result<&str, &str> = policy
            .run(|| async {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err("down")
                } else {
                    Ok("up")
                }
            })
            .await;

        assert_eq!(result, Ok("up"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn exhaustion_returns_the_last_error() {
        let policy = RetryPolicy::fixed(5, Duration::from_secs(2));
        let calls = AtomicU32::new(0);

        let result: Result<(), u32> = policy
            .run(|| async { Err(calls.fetch_add(1, Ordering::SeqCst)) })
            .await;

        assert_eq!(result, Err(4));
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }
}
