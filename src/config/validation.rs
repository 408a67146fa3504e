//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (fleet bounds, threshold ordering, intervals)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: ScalerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::ScalerConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("fleet.min_servers must be at least 1")]
    MinServersZero,

    #[error("fleet.min_servers ({min}) exceeds fleet.max_servers ({max})")]
    FleetBoundsInverted { min: usize, max: usize },

    #[error("policy.low_threshold ({low}) must be below policy.high_threshold ({high})")]
    ThresholdsInverted { low: f64, high: f64 },

    #[error("poll.interval_secs must be greater than 0")]
    ZeroInterval,

    #[error("poll.retry_attempts must be at least 1")]
    ZeroRetries,

    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
}

/// Check a deserialized config for semantic problems.
pub fn validate_config(config: &ScalerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.fleet.min_servers == 0 {
        errors.push(ValidationError::MinServersZero);
    }
    if config.fleet.min_servers > config.fleet.max_servers {
        errors.push(ValidationError::FleetBoundsInverted {
            min: config.fleet.min_servers,
            max: config.fleet.max_servers,
        });
    }
    if config.policy.low_threshold >= config.policy.high_threshold {
        errors.push(ValidationError::ThresholdsInverted {
            low: config.policy.low_threshold,
            high: config.policy.high_threshold,
        });
    }
    if config.poll.interval_secs == 0 {
        errors.push(ValidationError::ZeroInterval);
    }
    if config.poll.retry_attempts == 0 {
        errors.push(ValidationError::ZeroRetries);
    }
    for (field, value) in [
        ("nginx.conf_path", &config.nginx.conf_path),
        ("nginx.upstream_name", &config.nginx.upstream_name),
        ("nginx.lb_container", &config.nginx.lb_container),
        ("fleet.image", &config.fleet.image),
        ("fleet.network", &config.fleet.network),
        ("fleet.base_host", &config.fleet.base_host),
    ] {
        if value.is_empty() {
            errors.push(ValidationError::EmptyField { field });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&ScalerConfig::default()).is_ok());
    }

    #[test]
    fn reports_every_problem() {
        let mut config = ScalerConfig::default();
        config.fleet.min_servers = 0;
        config.poll.interval_secs = 0;
        config.fleet.image = String::new();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn equal_thresholds_are_rejected() {
        let mut config = ScalerConfig::default();
        config.policy.low_threshold = 7.0;
        config.policy.high_threshold = 7.0;

        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(
            errors[0],
            ValidationError::ThresholdsInverted { .. }
        ));
    }
}
