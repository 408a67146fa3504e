//! The control loop.
//!
//! # Data Flow
//! ```text
//! Tick:
//!     ConfigSynchronizer.reconcile (adopt file entries)
//!     → MetricsPoller.poll for each tracked worker, sequentially
//!     → ScalingPolicy.evaluate (once)
//!     → FleetController applies at most one action
//!     → sleep fixed interval → Tick
//! ```
//!
//! # Design Decisions
//! - One logical thread of control owns all fleet state; no locks
//! - No tick timeout and no graceful-shutdown path: the loop ends only
//!   on an unhandled error or an external process kill
//! - Reload and config-format failures abort the tick's mutation and
//!   the loop keeps going; everything else terminates it

use std::sync::Arc;
use std::time::Duration;

use crate::config::ScalerConfig;
use crate::error::{Result, ScalerError};
use crate::fleet::{Decision, FleetController, FleetState, ScalingPolicy};
use crate::nginx::ConfigSynchronizer;
use crate::observability::metrics;
use crate::poller::MetricsPoller;
use crate::resilience::RetryPolicy;
use crate::runtime::ContainerRuntime;

/// Drives the resync → poll → decide → act cycle.
pub struct ControlLoop<R: ContainerRuntime> {
    state: FleetState,
    poller: MetricsPoller,
    policy: ScalingPolicy,
    controller: FleetController<R>,
    interval: Duration,
    name_prefix: String,
    name_counter: u64,
}

impl<R: ContainerRuntime> ControlLoop<R> {
    pub fn new(config: &ScalerConfig, runtime: Arc<R>) -> Self {
        let synchronizer = ConfigSynchronizer::new(
            &config.nginx.conf_path,
            &config.nginx.upstream_name,
            &config.nginx.lb_container,
            config.nginx.reload_command.clone(),
            runtime.clone(),
        );
        let controller = FleetController::new(
            runtime,
            synchronizer,
            &config.fleet.image,
            &config.fleet.network,
            config.fleet.worker_command.clone(),
        );
        let poller = MetricsPoller::new(
            &config.fleet.base_host,
            &config.poll.metrics_path,
            RetryPolicy::fixed(
                config.poll.retry_attempts,
                Duration::from_millis(config.poll.retry_delay_ms),
            ),
        );
        let policy = ScalingPolicy::new(&config.fleet, &config.policy);

        Self {
            state: FleetState::new(),
            poller,
            policy,
            controller,
            interval: Duration::from_secs(config.poll.interval_secs),
            name_prefix: config.fleet.worker_name_prefix.clone(),
            name_counter: 1,
        }
    }

    pub fn state(&self) -> &FleetState {
        &self.state
    }

    /// Run ticks forever.
    pub async fn run(mut self) -> Result<()> {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            "control loop started"
        );

        loop {
            match self.tick().await {
                Ok(decision) => {
                    tracing::debug!(?decision, fleet_size = self.state.len(), "tick complete")
                }
                Err(e @ (ScalerError::ConfigFormat(_) | ScalerError::Reload(_))) => {
                    tracing::error!(error = %e, "tick aborted; fleet and LB may be out of sync");
                }
                Err(e) => return Err(e),
            }
            tokio::time::sleep(self.interval).await;
        }
    }

    /// One full iteration: resync, poll, decide, act.
    pub async fn tick(&mut self) -> Result<Decision> {
        if let Some(pending) = self.state.pending() {
            tracing::warn!(
                pending = %pending,
                "previous mutation never committed; LB may be routing stale state"
            );
        }

        self.controller.synchronizer().reconcile(&mut self.state)?;

        for port in self.state.ports() {
            match self.poller.poll(&mut self.state, port).await {
                Ok(rate) => {
                    tracing::info!(port, rate, "worker load updated");
                }
                Err(ScalerError::UnreachableServer { address, attempts }) => {
                    tracing::warn!(
                        %address,
                        attempts,
                        "worker unreachable; excluded from this tick's decision"
                    );
                    self.state.set_load(port, None);
                }
                Err(e) => return Err(e),
            }
        }

        let decision = self.policy.evaluate(&self.state.snapshot());
        self.apply(decision).await?;

        metrics::record_decision(&decision);
        metrics::record_fleet_size(self.state.len());
        Ok(decision)
    }

    async fn apply(&mut self, decision: Decision) -> Result<()> {
        match decision {
            Decision::ScaleUp => {
                let Some(highest) = self.state.highest_port() else {
                    tracing::warn!("scale-up decided with no tracked workers; skipping");
                    return Ok(());
                };
                let port = highest + 1;
                let name = format!("{}-{}", self.name_prefix, self.name_counter);
                self.name_counter += 1;
                self.controller.scale_up(&mut self.state, &name, port).await?;
            }
            Decision::ScaleDown { port } => {
                let name = match self.state.worker(port) {
                    Some(worker) => worker.name.clone(),
                    None => {
                        tracing::warn!(port, "scale-down candidate vanished; skipping");
                        return Ok(());
                    }
                };
                self.controller.scale_down(&mut self.state, &name, port).await?;
            }
            Decision::Noop => {
                tracing::debug!("fleet load inside the neutral band");
            }
        }
        Ok(())
    }
}
