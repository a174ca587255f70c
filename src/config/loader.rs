//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::PackageConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<PackageConfig, ConfigError> {
    let config: PackageConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<PackageConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_yields_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.readiness.poll_interval_ms, 500);
        assert_eq!(config.health_check.url, "http://tailrelay.embassy:8021");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = parse_config(
            r#"
            [readiness]
            timeout_secs = 30

            [observability]
            json_logs = true
            "#,
        )
        .unwrap();
        assert_eq!(config.readiness.timeout_secs, 30);
        assert_eq!(config.readiness.poll_interval_ms, 500);
        assert!(config.observability.json_logs);
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn invalid_values_are_reported() {
        let err = parse_config("[readiness]\npoll_interval_ms = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("readiness.poll_interval_ms"));
    }

    #[test]
    fn syntax_errors_are_parse_errors() {
        let err = parse_config("[readiness\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[health_check]\ninterval_secs = 60").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.health_check.interval_secs, 60);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_config(Path::new("/nonexistent/tailrelay.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
