//! The scaling decision rule.
//!
//! # Design Decisions
//! - Pure function over a load snapshot; no clock, no I/O, no state
//! - The gap between the thresholds is a neutral band giving hysteresis
//!   against oscillation from a single noisy sample
//! - The base worker is never a removal candidate, guaranteeing a
//!   standing capacity unit independent of the min-servers bound

use crate::config::{FleetConfig, PolicyConfig};

/// Load snapshot the policy evaluates: per-worker rates in first-seen
/// order (None = not yet reported or unreachable this tick) plus the
/// base worker's port.
#[derive(Debug, Clone, PartialEq)]
pub struct FleetSnapshot {
    pub loads: Vec<(u16, Option<f64>)>,
    pub base_port: Option<u16>,
}

/// What the fleet should do this tick. At most one action is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    ScaleUp,
    ScaleDown { port: u16 },
    Noop,
}

/// Hysteresis-based scaling rule.
#[derive(Debug, Clone)]
pub struct ScalingPolicy {
    min_servers: usize,
    max_servers: usize,
    low_threshold: f64,
    high_threshold: f64,
}

impl ScalingPolicy {
    pub fn new(fleet: &FleetConfig, policy: &PolicyConfig) -> Self {
        Self {
            min_servers: fleet.min_servers,
            max_servers: fleet.max_servers,
            low_threshold: policy.low_threshold,
            high_threshold: policy.high_threshold,
        }
    }

    /// Evaluate the snapshot.
    ///
    /// Workers without a defined rate are excluded from the min/max; a
    /// snapshot with no defined rates is a Noop. Scale-up requires every
    /// reporting worker above the high threshold, scale-down every one
    /// below the low threshold; the removal candidate is the
    /// lowest-rate non-base worker, ties resolved to the earliest.
    pub fn evaluate(&self, snapshot: &FleetSnapshot) -> Decision {
        let size = snapshot.loads.len();
        let defined: Vec<(u16, f64)> = snapshot
            .loads
            .iter()
            .filter_map(|(port, load)| load.map(|rate| (*port, rate)))
            .collect();

        if defined.is_empty() {
            tracing::debug!("no worker has reported a load yet");
            return Decision::Noop;
        }

        let min_rate = defined.iter().map(|(_, r)| *r).fold(f64::INFINITY, f64::min);
        let max_rate = defined
            .iter()
            .map(|(_, r)| *r)
            .fold(f64::NEG_INFINITY, f64::max);

        if size < self.max_servers && min_rate > self.high_threshold {
            return Decision::ScaleUp;
        }

        if size > self.min_servers && max_rate < self.low_threshold {
            // Strict less-than keeps the earliest worker on ties.
            let mut candidate: Option<(u16, f64)> = None;
            for (port, rate) in &defined {
                if Some(*port) == snapshot.base_port {
                    continue;
                }
                if candidate.map_or(true, |(_, best)| *rate < best) {
                    candidate = Some((*port, *rate));
                }
            }
            if let Some((port, _)) = candidate {
                return Decision::ScaleDown { port };
            }
        }

        Decision::Noop
    }
}
