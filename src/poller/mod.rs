//! Metrics polling subsystem.
//!
//! # Data Flow
//! ```text
//! worker /metrics endpoint (HTTP GET, bounded retry)
//!     → exposition.rs (extract the cumulative request counter)
//!     → window.rs (append sample, derive rate, evict)
//!     → FleetState.current_load
//! ```
//!
//! # Design Decisions
//! - Workers are scraped one at a time inside the tick; tick latency
//!   grows linearly with fleet size
//! - Retry exhaustion leaves the worker's load undefined for the tick,
//!   never coerced to 0

pub mod exposition;
pub mod window;

use std::time::Instant;

use crate::error::{Result, ScalerError};
use crate::fleet::FleetState;
use crate::resilience::RetryPolicy;

pub use window::{LoadSample, LoadWindow};

/// Scrapes worker metrics endpoints and maintains the load windows.
pub struct MetricsPoller {
    client: reqwest::Client,
    retry: RetryPolicy,
    base_host: String,
    metrics_path: String,
}

impl MetricsPoller {
    pub fn new(base_host: impl Into<String>, metrics_path: impl Into<String>, retry: RetryPolicy) -> Self {
        Self {
            client: reqwest::Client::new(),
            retry,
            base_host: base_host.into(),
            metrics_path: metrics_path.into(),
        }
    }

    /// Scrape one worker's cumulative request counter.
    ///
    /// Retries on any transport or status failure with the fixed-delay
    /// budget; exhaustion is `UnreachableServerError`. A reachable
    /// endpoint whose body carries no counter line reports 0.
    pub async fn fetch(&self, address: &str) -> Result<f64> {
        let url = format!("http://{}{}", address, self.metrics_path);

        let outcome = self
            .retry
            .run(|| {
                let client = self.client.clone();
                let url = url.clone();
                async move {
                    let response = client.get(&url).send().await?.error_for_status()?;
                    Ok::<_, ScalerError>(response.text().await?)
                }
            })
            .await;

        let body = match outcome {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(%address, error = %e, "metrics endpoint unreachable");
                return Err(ScalerError::UnreachableServer {
                    address: address.to_string(),
                    attempts: self.retry.max_attempts,
                });
            }
        };

        match exposition::extract_counter(&body) {
            Some(value) => Ok(value),
            None => {
                tracing::warn!(%address, "no counter line in metrics response");
                Ok(0.0)
            }
        }
    }

    /// Append a counter observation to a worker's window.
    pub fn sample(&self, state: &mut FleetState, port: u16, counter: f64) {
        state.window_mut(port).push(Instant::now(), counter);
    }

    /// Derive the current rate for a worker from its window.
    pub fn rate(&self, state: &mut FleetState, port: u16) -> f64 {
        state.window_mut(port).rate()
    }

    /// Scrape one worker and update its load in the fleet state.
    pub async fn poll(&self, state: &mut FleetState, port: u16) -> Result<f64> {
        let address = format!("{}:{}", self.base_host, port);
        let counter = self.fetch(&address).await?;

        self.sample(state, port, counter);
        let rate = self.rate(state, port);
        state.set_load(port, Some(rate));

        tracing::debug!(port, counter, rate, "worker polled");
        Ok(rate)
    }
}
