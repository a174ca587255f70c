//! Port-listening readiness predicate.

use serde::Serialize;
use std::time::Duration;
use tokio::time;

use crate::health::result::HealthCheckResult;
use crate::host::{Effects, SubcontainerHandle};
use crate::observability::metrics;

/// Readiness check: `port` accepts connections inside the subcontainer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortListeningCheck {
    pub port: u16,
    pub success_message: &'static str,
    pub error_message: &'static str,
}

/// Run the check once.
///
/// Purely observational: one connection attempt, no payload. Stateless, so
/// it may be called repeatedly and concurrently.
pub async fn check_port_listening(
    effects: &dyn Effects,
    subcontainer: &SubcontainerHandle,
    check: &PortListeningCheck,
    budget: Duration,
) -> HealthCheckResult {
    let probe = effects.is_port_listening(subcontainer, check.port);
    let result = match time::timeout(budget, probe).await {
        Ok(Ok(true)) => HealthCheckResult::success(check.success_message),
        Ok(Ok(false)) => HealthCheckResult::failure(check.error_message),
        Ok(Err(e)) => {
            tracing::debug!(port = check.port, error = %e, "Port probe failed");
            HealthCheckResult::failure(check.error_message)
        }
        Err(_) => {
            tracing::debug!(
                port = check.port,
                budget_ms = budget.as_millis() as u64,
                "Port probe timed out"
            );
            HealthCheckResult::timeout(check.error_message)
        }
    };
    metrics::record_health_check("readiness", result.result.as_str());
    result
}
