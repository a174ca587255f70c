//! HTTP reachability check for the Web UI.

use reqwest::header::USER_AGENT;
use std::time::Duration;
use tokio::time;

use crate::health::result::HealthCheckResult;
use crate::messages;
use crate::observability::metrics;

/// Name under which the check is reported to the host.
pub const WEB_UI_CHECK: &str = "web-ui";

/// Address of the Web UI as seen from the host network.
pub const WEB_UI_URL: &str = "http://tailrelay.embassy:8021";

/// HTTP client used for liveness checks.
///
/// Connections are not pooled so every check opens a fresh one.
pub fn health_client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .pool_max_idle_per_host(0)
        .build()
        .unwrap_or_default()
}

/// Fetch `url` once.
///
/// Any HTTP response counts as reachable. Connection faults become a
/// `Failure`, exceeding `budget` a `Timeout`; nothing is propagated.
pub async fn check_web_url(
    client: &reqwest::Client,
    url: &str,
    budget: Duration,
) -> HealthCheckResult {
    let request = client
        .get(url)
        .header(USER_AGENT, "tailrelay-health-check")
        .send();

    let result = match time::timeout(budget, request).await {
        Ok(Ok(response)) => {
            tracing::debug!(url, status = %response.status(), "Web UI responded");
            HealthCheckResult::success(messages::WEB_UI_REACHABLE)
        }
        Ok(Err(e)) if e.is_timeout() => {
            tracing::warn!(url, "Health check failed: timeout");
            HealthCheckResult::timeout(messages::WEB_UI_TIMEOUT)
        }
        Ok(Err(e)) => {
            tracing::warn!(url, error = %e, "Health check failed: connection error");
            HealthCheckResult::failure(messages::WEB_UI_UNREACHABLE)
        }
        Err(_) => {
            tracing::warn!(
                url,
                budget_ms = budget.as_millis() as u64,
                "Health check failed: timeout"
            );
            HealthCheckResult::timeout(messages::WEB_UI_TIMEOUT)
        }
    };
    metrics::record_health_check(WEB_UI_CHECK, result.result.as_str());
    result
}
