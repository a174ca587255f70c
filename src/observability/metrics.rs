//! Metrics collection and exposition.
//!
//! # Metrics
//! - `tailrelay_lifecycle_transitions_total` (counter): by `from`, `to`
//! - `tailrelay_health_checks_total` (counter): by `check`, `result`
//! - `tailrelay_migrations_total` (counter): by `outcome`
//! - `tailrelay_ready` (gauge): 1 while the daemon is ready
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its HTTP listener on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_lifecycle_transition(from: &'static str, to: &'static str) {
    ::metrics::counter!("tailrelay_lifecycle_transitions_total", "from" => from, "to" => to)
        .increment(1);
}

pub fn record_health_check(check: &'static str, result: &'static str) {
    ::metrics::counter!("tailrelay_health_checks_total", "check" => check, "result" => result)
        .increment(1);
}

pub fn record_migration(outcome: &'static str) {
    ::metrics::counter!("tailrelay_migrations_total", "outcome" => outcome).increment(1);
}

pub fn set_ready(ready: bool) {
    ::metrics::gauge!("tailrelay_ready").set(if ready { 1.0 } else { 0.0 });
}
