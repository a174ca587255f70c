//! Operator configuration schema.
//!
//! Settings for the orchestration core itself: how often readiness is polled,
//! how the liveness check runs, logging, and the local host. All types derive
//! Serde traits for deserialization from a TOML file.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration for the package orchestration core.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PackageConfig {
    /// Readiness polling cadence and budget.
    pub readiness: ReadinessConfig,

    /// Post-start liveness check settings.
    pub health_check: HealthCheckConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Settings for running outside the host platform.
    pub local: LocalHostConfig,
}

/// Readiness polling configuration.
///
/// On the platform these values are owned by the host scheduler; they are
/// configurable here so the orchestrator can be driven locally and in tests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReadinessConfig {
    /// Delay between two readiness probes in milliseconds.
    pub poll_interval_ms: u64,

    /// Budget for a single probe in milliseconds.
    pub probe_timeout_ms: u64,

    /// Total time allowed to reach `Ready` in seconds.
    pub timeout_secs: u64,
}

impl ReadinessConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 500,
            probe_timeout_ms: 1_000,
            timeout_secs: 120,
        }
    }
}

/// Liveness check configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// Enable the periodic liveness check once the daemon is ready.
    pub enabled: bool,

    /// URL probed by the `web-ui` check.
    pub url: String,

    /// Interval between checks in seconds.
    pub interval_secs: u64,

    /// Budget for one check in seconds.
    pub timeout_secs: u64,
}

impl HealthCheckConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: crate::health::web::WEB_UI_URL.to_string(),
            interval_secs: 30,
            timeout_secs: 5,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines instead of human-readable text.
    pub json_logs: bool,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// Settings for [`LocalHost`](crate::host::local::LocalHost).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LocalHostConfig {
    /// Directory holding one sub-directory per declared volume.
    pub volume_root: PathBuf,

    /// File the stored user configuration is kept in.
    pub config_path: PathBuf,

    /// Directory the daemon command is resolved against. `None` uses `PATH`.
    pub command_dir: Option<PathBuf>,

    /// Address ports are probed on.
    pub bind_address: String,
}

impl Default for LocalHostConfig {
    fn default() -> Self {
        Self {
            volume_root: PathBuf::from("./data"),
            config_path: PathBuf::from("./data/config.json"),
            command_dir: None,
            bind_address: "127.0.0.1".to_string(),
        }
    }
}
