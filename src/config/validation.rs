//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (intervals > 0, probe budget below readiness budget)
//! - Validate URLs and addresses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: PackageConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::{IpAddr, SocketAddr};

use crate::config::schema::PackageConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error(
        "readiness.probe_timeout_ms ({probe_ms}ms) must be shorter than \
         readiness.timeout_secs ({total_secs}s)"
    )]
    ProbeExceedsReadiness { probe_ms: u64, total_secs: u64 },

    #[error("health_check.url `{url}` is invalid: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("{field} `{value}` is not a valid address")]
    InvalidAddress { field: &'static str, value: String },
}

/// Validate a parsed configuration.
pub fn validate_config(config: &PackageConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let readiness = &config.readiness;
    for (field, value) in [
        ("readiness.poll_interval_ms", readiness.poll_interval_ms),
        ("readiness.probe_timeout_ms", readiness.probe_timeout_ms),
        ("readiness.timeout_secs", readiness.timeout_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::Zero { field });
        }
    }
    if readiness.timeout_secs > 0
        && readiness.probe_timeout_ms >= readiness.timeout_secs.saturating_mul(1_000)
    {
        errors.push(ValidationError::ProbeExceedsReadiness {
            probe_ms: readiness.probe_timeout_ms,
            total_secs: readiness.timeout_secs,
        });
    }

    let health = &config.health_check;
    if health.enabled {
        if health.interval_secs == 0 {
            errors.push(ValidationError::Zero { field: "health_check.interval_secs" });
        }
        if health.timeout_secs == 0 {
            errors.push(ValidationError::Zero { field: "health_check.timeout_secs" });
        }
        match url::Url::parse(&health.url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
            Ok(parsed) => errors.push(ValidationError::InvalidUrl {
                url: health.url.clone(),
                reason: format!("unsupported scheme `{}`", parsed.scheme()),
            }),
            Err(e) => errors.push(ValidationError::InvalidUrl {
                url: health.url.clone(),
                reason: e.to_string(),
            }),
        }
    }

    let observability = &config.observability;
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: observability.metrics_address.clone(),
        });
    }

    if config.local.bind_address.parse::<IpAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "local.bind_address",
            value: config.local.bind_address.clone(),
        });
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
    fn defaults_are_valid() {
        assert!(validate_config(&PackageConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_error() {
        let mut config = PackageConfig::default();
        config.readiness.poll_interval_ms = 0;
        config.health_check.url = "not a url".into();
        config.local.bind_address = "localhost:80".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::Zero { field: "readiness.poll_interval_ms" }));
    }

    #[test]
    fn probe_budget_must_fit_readiness_budget() {
        let mut config = PackageConfig::default();
        config.readiness.timeout_secs = 1;
        config.readiness.probe_timeout_ms = 1_000;

        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors[0], ValidationError::ProbeExceedsReadiness { .. }));
    }

    #[test]
    fn disabled_health_check_skips_url_validation() {
        let mut config = PackageConfig::default();
        config.health_check.enabled = false;
        config.health_check.url = "ftp://example".into();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn metrics_address_checked_only_when_enabled() {
        let mut config = PackageConfig::default();
        config.observability.metrics_address = "nowhere".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}
