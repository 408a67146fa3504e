//! Fleet Autoscaler
//!
//! An autoscaling control loop for a fleet of stateless HTTP workers
//! behind a single nginx load balancer.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────┐
//!                 │                 CONTROL LOOP                  │
//!                 │                                               │
//!   lb.conf ◀─────┼─▶ nginx (upstream parse / mutate / reload)    │
//!                 │          │                                    │
//!                 │          ▼                                    │
//!                 │    FleetState (workers, windows, loads)       │
//!                 │          ▲              │                     │
//!   worker        │          │              ▼                     │
//!   /metrics ─────┼─▶ poller (scrape,   fleet::policy (decide)    │
//!   endpoints     │    rate derivative)     │                     │
//!                 │                         ▼                     │
//!   docker ◀──────┼────────────── fleet::controller (act)         │
//!                 │                                               │
//!                 │  ┌─────────────────────────────────────────┐  │
//!                 │  │          Cross-Cutting Concerns          │  │
//!                 │  │  config   observability   resilience     │  │
//!                 │  └─────────────────────────────────────────┘  │
//!                 └──────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod config;
pub mod control;
pub mod error;
pub mod fleet;
pub mod nginx;
pub mod poller;
pub mod runtime;

// Cross-cutting concerns
pub mod observability;
pub mod resilience;

pub use config::ScalerConfig;
pub use control::ControlLoop;
pub use error::{Result, ScalerError};
