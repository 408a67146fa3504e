//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (decision counters, fleet size gauge)
//!
//! Consumers:
//!     → stdout logs
//!     → Prometheus scrape of the exporter endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - This daemon is unattended: process logs and termination are the
//!   entire user-facing error surface
//! - Metric updates are cheap atomic operations; the exporter is off by
//!   default

pub mod logging;
pub mod metrics;
