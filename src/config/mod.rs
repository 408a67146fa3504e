//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ScalerConfig (validated, immutable)
//!     → handed to the control loop at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the daemon must be restarted to
//!   pick up changes
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    FleetConfig, NginxConfig, ObservabilityConfig, PolicyConfig, PollConfig, ScalerConfig,
};
