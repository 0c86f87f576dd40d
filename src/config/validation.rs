//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that the default mode exists and mode names are unique
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::RouterConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no modes configured")]
    NoModes,

    #[error("mode #{0} has an empty name")]
    EmptyModeName(usize),

    #[error("mode {0:?} is configured more than once")]
    DuplicateMode(String),

    #[error("default mode {0:?} is not configured")]
    UnknownDefaultMode(String),

    #[error("{field} must be greater than zero")]
    ZeroTimeout { field: &'static str },

    #[error("{field} {value:?} is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },
}

/// Check `config` and collect every problem found.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.modes.is_empty() {
        errors.push(ValidationError::NoModes);
    }

    let mut seen = HashSet::new();
    for (i, mode) in config.modes.iter().enumerate() {
        if mode.name.is_empty() {
            errors.push(ValidationError::EmptyModeName(i));
        } else if !seen.insert(mode.name.as_str()) {
            errors.push(ValidationError::DuplicateMode(mode.name.clone()));
        }
    }

    if !config.modes.is_empty() && !seen.contains(config.default_mode.as_str()) {
        errors.push(ValidationError::UnknownDefaultMode(config.default_mode.clone()));
    }

    for (field, value) in [
        ("timeouts.request_secs", config.timeouts.request_secs),
        ("timeouts.provider_secs", config.timeouts.provider_secs),
        ("health.check_timeout_secs", config.health.check_timeout_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroTimeout { field });
        }
    }

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::ModeConfig;

    fn mode(name: &str) -> ModeConfig {
        ModeConfig {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn default_config_is_valid() {
        assert_eq!(validate_config(&RouterConfig::default()), Ok(()));
    }

    #[test]
    fn reports_every_error() {
        let mut config = RouterConfig::default();
        config.default_mode = "ingress".into();
        config.modes = vec![mode("lb"), mode("lb"), mode("")];
        config.timeouts.provider_secs = 0;
        config.listener.bind_address = "not-an-address".into();

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::DuplicateMode("lb".into())));
        assert!(errors.contains(&ValidationError::EmptyModeName(2)));
        assert!(errors.contains(&ValidationError::UnknownDefaultMode("ingress".into())));
        assert!(errors.contains(&ValidationError::ZeroTimeout {
            field: "timeouts.provider_secs"
        }));
        assert_eq!(errors.len(), 5);
    }

    #[test]
    fn empty_modes_rejected() {
        let mut config = RouterConfig::default();
        config.modes.clear();
        assert_eq!(validate_config(&config), Err(vec![ValidationError::NoModes]));
    }

    #[test]
    fn metrics_address_checked_only_when_enabled() {
        let mut config = RouterConfig::default();
        config.observability.metrics_address = "nope".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}
