//! Interface export through the host.

use tailrelay_package::interfaces::{
    setup_interfaces, ui_interface, InterfaceError, InterfaceRegistry, UI_HOST_ID,
};
use tailrelay_package::lifecycle::primary_daemon;
use tailrelay_package::UI_PORT;

mod common;
use common::MockHost;

#[tokio::test]
async fn setup_binds_and_exports_web_ui() {
    let host = MockHost::new();

    let receipts = setup_interfaces(&host).await.unwrap();

    assert_eq!(receipts.len(), 1);
    assert_eq!(receipts[0].host_id, UI_HOST_ID);
    assert_eq!(receipts[0].ports, vec![UI_PORT]);
    assert_eq!(receipts[0].interfaces, vec!["ui".to_string()]);
    assert_eq!(
        host.calls(),
        vec![format!("bind:{}:{}", UI_HOST_ID, UI_PORT), format!("export:{}", UI_HOST_ID)]
    );
}

#[tokio::test]
async fn repeated_setup_replaces_export() {
    let host = MockHost::new();

    let first = setup_interfaces(&host).await.unwrap();
    let second = setup_interfaces(&host).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(host.exported(UI_HOST_ID), vec![ui_interface()]);
}

#[tokio::test]
async fn exported_port_matches_readiness_probe() {
    let host = MockHost::new();
    setup_interfaces(&host).await.unwrap();

    let exported = host.exported(UI_HOST_ID);
    assert_eq!(exported[0].port, primary_daemon().probe_port());
}

#[tokio::test]
async fn empty_registry_exports_nothing() {
    let host = MockHost::new();

    let receipts = InterfaceRegistry::new().export(&host).await.unwrap();

    assert!(receipts.is_empty());
    assert!(host.calls().is_empty());
}

#[tokio::test]
async fn port_is_claimed_once_per_package() {
    let host = MockHost::new();
    let mut registry = InterfaceRegistry::new();
    registry.bind(ui_interface()).unwrap();

    let mut second = ui_interface();
    second.id = "admin".into();
    second.host_id = "admin-multi".into();
    assert!(matches!(
        registry.bind(second),
        Err(InterfaceError::PortConflict { port: UI_PORT, .. })
    ));

    let receipts = registry.export(&host).await.unwrap();
    assert_eq!(receipts.len(), 1);
    assert!(host.exported("admin-multi").is_empty());
}
