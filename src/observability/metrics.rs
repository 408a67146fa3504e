//! Metrics collection and exposition.
//!
//! # Metrics
//! - `autoscaler_scale_up_total` (counter): scale-up actions taken
//! - `autoscaler_scale_down_total` (counter): scale-down actions taken
//! - `autoscaler_noop_ticks_total` (counter): ticks with no action
//! - `autoscaler_fleet_size` (gauge): current tracked worker count

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::fleet::Decision;

/// Install the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "failed to install metrics exporter"),
    }
}

pub fn record_decision(decision: &Decision) {
    match decision {
        Decision::ScaleUp => metrics::counter!("autoscaler_scale_up_total").increment(1),
        Decision::ScaleDown { .. } => {
            metrics::counter!("autoscaler_scale_down_total").increment(1)
        }
        Decision::Noop => metrics::counter!("autoscaler_noop_ticks_total").increment(1),
    }
}

pub fn record_fleet_size(size: usize) {
    metrics::gauge!("autoscaler_fleet_size").set(size as f64);
}
