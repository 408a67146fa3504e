//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! autoscaler. All types derive Serde traits for deserialization from
//! TOML config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the fleet autoscaler.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ScalerConfig {
    /// Load balancer config file handling.
    pub nginx: NginxConfig,

    /// Worker fleet bounds and container settings.
    pub fleet: FleetConfig,

    /// Scaling thresholds.
    pub policy: PolicyConfig,

    /// Metrics polling settings.
    pub poll: PollConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Load balancer configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NginxConfig {
    /// Path to the nginx config file containing the upstream block.
    pub conf_path: String,

    /// Name of the upstream block enumerating worker addresses.
    pub upstream_name: String,

    /// Name of the container running the load balancer; the reload
    /// command is executed inside it.
    pub lb_container: String,

    /// Command executed in the LB container to reload its config.
    pub reload_command: Vec<String>,
}

impl Default for NginxConfig {
    fn default() -> Self {
        Self {
            conf_path: "./lb.conf".to_string(),
            upstream_name: "backend_servers".to_string(),
            lb_container: "autoscaler-web-1".to_string(),
            reload_command: vec!["nginx".to_string(), "-s".to_string(), "reload".to_string()],
        }
    }
}

/// Worker fleet configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FleetConfig {
    /// Container image every worker runs.
    pub image: String,

    /// Docker network shared by the LB and the workers.
    pub network: String,

    /// Host used to reach worker metrics endpoints from the scaler
    /// (workers publish their port on this host).
    pub base_host: String,

    /// Minimum number of workers kept alive.
    pub min_servers: usize,

    /// Maximum number of workers.
    pub max_servers: usize,

    /// Prefix for generated worker container names.
    pub worker_name_prefix: String,

    /// Command run inside a new worker container; `--name <name>` and
    /// `--port <port>` are appended.
    pub worker_command: Vec<String>,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            image: "demo-worker".to_string(),
            network: "autoscaler_mynet".to_string(),
            base_host: "localhost".to_string(),
            min_servers: 1,
            max_servers: 10,
            worker_name_prefix: "backend-app".to_string(),
            worker_command: vec!["demo-worker".to_string()],
        }
    }
}

/// Scaling policy thresholds.
///
/// The gap between `low_threshold` and `high_threshold` is the neutral
/// band: a fleet whose rates fall inside it is left alone.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Scale up when every reporting worker exceeds this rate (req/s).
    pub high_threshold: f64,

    /// Scale down when every reporting worker is below this rate (req/s).
    pub low_threshold: f64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            high_threshold: 10.0,
            low_threshold: 5.0,
        }
    }
}

/// Metrics polling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PollConfig {
    /// Seconds between control loop ticks.
    pub interval_secs: u64,

    /// Path of the worker metrics endpoint.
    pub metrics_path: String,

    /// Attempts before a worker is declared unreachable for the tick.
    pub retry_attempts: u32,

    /// Fixed delay between attempts, in milliseconds.
    pub retry_delay_ms: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: 2,
            metrics_path: "/metrics".to_string(),
            retry_attempts: 5,
            retry_delay_ms: 2000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Enable the Prometheus exporter.
    pub metrics_enabled: bool,

    /// Bind address for the Prometheus exporter.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
