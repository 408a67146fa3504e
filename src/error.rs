//! Error taxonomy for the autoscaler.
//!
//! # Design Decisions
//! - Only two failure classes recover locally: the bounded polling retry
//!   (a worker's load stays undefined for the tick) and a not-found
//!   container during defensive cleanup.
//! - Reload and config-format failures abort the current mutation; the
//!   loop keeps ticking but the inconsistency is surfaced, not healed.
//! - Everything else propagates and terminates the control loop.

use thiserror::Error;

/// Errors produced by the autoscaler subsystems.
#[derive(Debug, Error)]
pub enum ScalerError {
    /// The upstream routing block is missing or malformed.
    #[error("upstream block error: {0}")]
    ConfigFormat(String),

    /// A worker's metrics endpoint stayed unreachable for the whole
    /// retry budget.
    #[error("worker {address} unreachable after {attempts} attempts")]
    UnreachableServer { address: String, attempts: u32 },

    /// The container runtime has no container with the given name.
    #[error("container not found: {0}")]
    ContainerNotFound(String),

    /// The load balancer rejected or failed the reload command. The LB's
    /// in-memory routing may now diverge from the config file.
    #[error("load balancer reload failed: {0}")]
    Reload(String),

    /// A container runtime command failed for a reason other than
    /// not-found.
    #[error("container runtime command failed: {0}")]
    Runtime(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ScalerError>;
