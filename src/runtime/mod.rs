//! Container runtime subsystem.
//!
//! # Data Flow
//! ```text
//! FleetController / ConfigSynchronizer
//!     → ContainerRuntime trait (run / get / stop / remove / exec)
//!     → docker.rs (shells out to the docker binary)
//! ```
//!
//! # Design Decisions
//! - The trait is the seam for tests; integration tests drive the fleet
//!   with an in-memory fake instead of a docker daemon
//! - Not-found is a distinct error variant so callers can treat it as a
//!   benign precondition during cleanup

pub mod docker;

use crate::error::Result;

pub use docker::DockerCli;

/// Opaque handle to a running container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerId(pub String);

impl std::fmt::Display for ContainerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything needed to start a worker container.
#[derive(Debug, Clone)]
pub struct ContainerSpec {
    pub image: String,
    pub name: String,
    pub network: String,
    /// TCP port published as host:container with the same number.
    pub port: u16,
    pub command: Vec<String>,
}

/// Lifecycle operations required from the container runtime.
pub trait ContainerRuntime {
    /// Start a detached container and return its handle.
    fn run(&self, spec: &ContainerSpec) -> impl std::future::Future<Output = Result<ContainerId>>;

    /// Look up a container by name. Missing containers are
    /// `ScalerError::ContainerNotFound`.
    fn get(&self, name: &str) -> impl std::future::Future<Output = Result<ContainerId>>;

    /// Stop a running container.
    fn stop(&self, id: &ContainerId) -> impl std::future::Future<Output = Result<()>>;

    /// Remove a stopped container.
    fn remove(&self, id: &ContainerId) -> impl std::future::Future<Output = Result<()>>;

    /// Run a command inside a container by name. Used solely to trigger
    /// the LB reload in its own runtime context.
    fn exec(
        &self,
        name: &str,
        command: &[String],
    ) -> impl std::future::Future<Output = Result<()>>;
}
