//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Metrics scrape:
//!     → retry.rs (bounded fixed-delay retry around the request)
//!     → On exhaustion: worker marked unreachable for the tick
//! ```
//!
//! # Design Decisions
//! - A fixed inter-attempt delay, no backoff growth and no jitter; the
//!   retry budget is the only cancellation primitive in the system
//! - The policy is a plain value so tests can shrink the budget and run
//!   under paused tokio time

pub mod retry;

pub use retry::RetryPolicy;
