//! Health check results.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Success,
    Failure,
    /// The check did not finish within its budget.
    Timeout,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Success => "success",
            HealthStatus::Failure => "failure",
            HealthStatus::Timeout => "timeout",
        }
    }
}

/// Outcome of one check, reported to the host as-is.
///
/// Checks never return errors: every fault becomes a `Failure` or `Timeout`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthCheckResult {
    pub result: HealthStatus,
    pub message: String,
}

impl HealthCheckResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            result: HealthStatus::Success,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            result: HealthStatus::Failure,
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            result: HealthStatus::Timeout,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.result == HealthStatus::Success
    }
}
