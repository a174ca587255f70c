//! Readiness and liveness checks.

use std::sync::Arc;
use std::time::Duration;

use tailrelay_package::config::HealthCheckConfig;
use tailrelay_package::health::{
    check_port_listening, check_web_url, health_client, HealthMonitor, HealthStatus,
};
use tailrelay_package::host::{Effects, SubcontainerHandle};
use tailrelay_package::lifecycle::{primary_daemon, Shutdown};
use tailrelay_package::messages;

mod common;
use common::{refused_addr, start_mock_backend, start_silent_backend, MockHost};

async fn launched(host: &MockHost) -> SubcontainerHandle {
    host.launch_subcontainer(&primary_daemon()).await.unwrap()
}

#[tokio::test]
async fn reachable_web_ui_is_success() {
    let addr = start_mock_backend(200, "ok").await;
    let url = format!("http://{}/", addr);

    let result = check_web_url(&health_client(), &url, Duration::from_secs(2)).await;

    assert_eq!(result.result, HealthStatus::Success);
    assert_eq!(result.message, messages::WEB_UI_REACHABLE);
}

#[tokio::test]
async fn error_status_still_counts_as_reachable() {
    let addr = start_mock_backend(500, "boom").await;
    let url = format!("http://{}/", addr);

    let result = check_web_url(&health_client(), &url, Duration::from_secs(2)).await;

    assert!(result.is_success());
}

#[tokio::test]
async fn refused_connection_is_failure() {
    let url = format!("http://{}/", refused_addr());

    let result = check_web_url(&health_client(), &url, Duration::from_secs(2)).await;

    assert_eq!(result.result, HealthStatus::Failure);
    assert_eq!(result.message, messages::WEB_UI_UNREACHABLE);
}

#[tokio::test]
async fn silent_backend_is_timeout() {
    let addr = start_silent_backend().await;
    let url = format!("http://{}/", addr);

    let result = check_web_url(&health_client(), &url, Duration::from_millis(200)).await;

    assert_eq!(result.result, HealthStatus::Timeout);
}

#[tokio::test]
async fn port_probe_reports_declared_messages() {
    let host = MockHost::new().listening_after(1);
    let handle = launched(&host).await;
    let probe = primary_daemon().ready.probe;

    let first = check_port_listening(&host, &handle, &probe, Duration::from_secs(1)).await;
    assert_eq!(first.result, HealthStatus::Failure);
    assert_eq!(first.message, messages::READY_FAILURE);

    let second = check_port_listening(&host, &handle, &probe, Duration::from_secs(1)).await;
    assert_eq!(second.result, HealthStatus::Success);
    assert_eq!(second.message, messages::READY_SUCCESS);
}

#[tokio::test]
async fn slow_port_probe_times_out() {
    let host = MockHost::new().slow_probe(Duration::from_millis(500));
    let handle = launched(&host).await;
    let probe = primary_daemon().ready.probe;

    let result = check_port_listening(&host, &handle, &probe, Duration::from_millis(50)).await;

    assert_eq!(result.result, HealthStatus::Timeout);
    assert_eq!(result.message, messages::READY_FAILURE);
}

#[tokio::test]
async fn port_probes_run_concurrently() {
    let host = Arc::new(MockHost::new().slow_probe(Duration::from_millis(100)));
    let handle = launched(&host).await;
    let probe = primary_daemon().ready.probe;

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let host = host.clone();
        let handle = handle.clone();
        let probe = probe.clone();
        tasks.push(tokio::spawn(async move {
            check_port_listening(host.as_ref(), &handle, &probe, Duration::from_secs(2)).await
        }));
    }

    for task in tasks {
        assert!(task.await.unwrap().is_success());
    }
    assert_eq!(host.probes(), 8);
}

#[tokio::test]
async fn monitor_exits_on_stop() {
    let addr = start_mock_backend(200, "ok").await;
    let monitor = HealthMonitor::new(HealthCheckConfig {
        enabled: true,
        url: format!("http://{}/", addr),
        interval_secs: 1,
        timeout_secs: 1,
    });
    assert!(monitor.check_once().await.is_success());

    let shutdown = Shutdown::new();
    let task = tokio::spawn(monitor.run(shutdown.subscribe()));

    tokio::time::sleep(Duration::from_millis(50)).await;
    shutdown.trigger();

    tokio::time::timeout(Duration::from_secs(2), task)
        .await
        .expect("monitor should exit")
        .unwrap();
}

#[tokio::test]
async fn disabled_monitor_returns_immediately() {
    let monitor = HealthMonitor::new(HealthCheckConfig {
        enabled: false,
        ..HealthCheckConfig::default()
    });
    let shutdown = Shutdown::new();

    tokio::time::timeout(Duration::from_secs(1), monitor.run(shutdown.subscribe()))
        .await
        .expect("disabled monitor should not loop");
}
