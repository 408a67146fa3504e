//! Worker lifecycle execution.
//!
//! # Responsibilities
//! - Start and tear down worker containers
//! - Keep the LB upstream block and the tracked fleet in step
//!
//! # Known gaps (documented, not auto-corrected)
//! - A failure after the worker starts but before the LB entry commits
//!   leaves a running worker that is not routable; the pending marker on
//!   the fleet state records the window.
//! - Between worker removal and the LB reload completing, in-flight
//!   traffic to the removed worker fails.

use std::sync::Arc;

use crate::error::{Result, ScalerError};
use crate::fleet::{FleetState, PendingAction, PendingMutation, WorkerRecord};
use crate::nginx::{ConfigSynchronizer, UpstreamAction};
use crate::runtime::{ContainerRuntime, ContainerSpec};

/// Executes fleet mutations against the container runtime and the LB
/// config.
pub struct FleetController<R> {
    runtime: Arc<R>,
    synchronizer: ConfigSynchronizer<R>,
    image: String,
    network: String,
    worker_command: Vec<String>,
}

impl<R: ContainerRuntime> FleetController<R> {
    pub fn new(
        runtime: Arc<R>,
        synchronizer: ConfigSynchronizer<R>,
        image: impl Into<String>,
        network: impl Into<String>,
        worker_command: Vec<String>,
    ) -> Self {
        Self {
            runtime,
            synchronizer,
            image: image.into(),
            network: network.into(),
            worker_command,
        }
    }

    pub fn synchronizer(&self) -> &ConfigSynchronizer<R> {
        &self.synchronizer
    }

    /// Start a fresh worker and route traffic to it.
    ///
    /// Any stale container or routing entry with the same name is torn
    /// down first; a missing stale container is benign. The new worker
    /// is registered with an undefined load, so policy ignores it until
    /// it reports.
    pub async fn scale_up(&self, state: &mut FleetState, name: &str, port: u16) -> Result<()> {
        let address = format!("{name}:{port}");

        match self.runtime.get(name).await {
            Ok(stale) => {
                tracing::info!(%name, "stale worker found; tearing it down first");
                self.runtime.stop(&stale).await?;
                self.runtime.remove(&stale).await?;
                self.synchronizer.mutate(&address, UpstreamAction::Remove)?;
            }
            Err(ScalerError::ContainerNotFound(_)) => {}
            Err(e) => return Err(e),
        }

        state.set_pending(PendingMutation {
            action: PendingAction::ScaleUp,
            address: address.clone(),
        });

        let mut command = self.worker_command.clone();
        command.extend([
            "--name".to_string(),
            name.to_string(),
            "--port".to_string(),
            port.to_string(),
        ]);
        let id = self
            .runtime
            .run(&ContainerSpec {
                image: self.image.clone(),
                name: name.to_string(),
                network: self.network.clone(),
                port,
                command,
            })
            .await?;

        state.register(WorkerRecord::new(name.to_string(), port));
        tracing::info!(%name, port, container = %id, "worker started");

        self.synchronizer.mutate(&address, UpstreamAction::Add)?;
        self.synchronizer.reload().await?;
        state.clear_pending();

        tracing::info!(%name, port, fleet_size = state.len(), "scale-up committed");
        Ok(())
    }

    /// Tear a worker down and stop routing traffic to it.
    pub async fn scale_down(&self, state: &mut FleetState, name: &str, port: u16) -> Result<()> {
        let address = format!("{name}:{port}");
        tracing::info!(%name, port, "scaling down worker");

        state.set_pending(PendingMutation {
            action: PendingAction::ScaleDown,
            address: address.clone(),
        });

        let id = self.runtime.get(name).await?;
        self.runtime.stop(&id).await?;
        self.runtime.remove(&id).await?;

        state.remove(port);

        self.synchronizer.mutate(&address, UpstreamAction::Remove)?;
        self.synchronizer.reload().await?;
        state.clear_pending();

        tracing::info!(%name, port, fleet_size = state.len(), "scale-down committed");
        Ok(())
    }
}
