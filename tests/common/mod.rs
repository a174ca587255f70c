//! Shared utilities for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use tailrelay_package::config::ReadinessConfig;
use tailrelay_package::host::{Effects, HostError, SubcontainerHandle, SubcontainerId};
use tailrelay_package::interfaces::{InterfaceBinding, Protocol};
use tailrelay_package::lifecycle::DaemonSpec;
use tailrelay_package::migration::StoredConfig;

/// Start a mock HTTP backend that answers every request with `status`.
///
/// Returns the bound address.
pub async fn start_mock_backend(status: u16, body: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buf = [0u8; 1024];
                        let _ = socket.read(&mut buf).await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start a backend that accepts connections and never answers.
pub async fn start_silent_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    addr
}

/// A port nothing listens on.
pub fn refused_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

/// Readiness settings short enough for tests.
pub fn fast_readiness(timeout_secs: u64) -> ReadinessConfig {
    ReadinessConfig {
        poll_interval_ms: 20,
        probe_timeout_ms: 100,
        timeout_secs,
    }
}

/// Scriptable [`Effects`] implementation that records every call.
#[derive(Default)]
pub struct MockHost {
    /// Probes answered `false` before the port starts listening; `None` never listens.
    listening_after: Option<u32>,
    /// The process dies once this many probes were made.
    exits_after: Option<u32>,
    probe_delay: Option<Duration>,
    launch_error: bool,
    stop_error: bool,
    probes: AtomicU32,
    running: Mutex<HashSet<SubcontainerId>>,
    stored: Mutex<Option<StoredConfig>>,
    exports: Mutex<BTreeMap<String, Vec<InterfaceBinding>>>,
    calls: Mutex<Vec<String>>,
}

impl MockHost {
    /// A host whose daemon listens on the first probe.
    pub fn new() -> Self {
        Self {
            listening_after: Some(0),
            ..Self::default()
        }
    }

    pub fn listening_after(mut self, probes: u32) -> Self {
        self.listening_after = Some(probes);
        self
    }

    pub fn never_listening(mut self) -> Self {
        self.listening_after = None;
        self
    }

    pub fn exits_after(mut self, probes: u32) -> Self {
        self.exits_after = Some(probes);
        self
    }

    pub fn slow_probe(mut self, delay: Duration) -> Self {
        self.probe_delay = Some(delay);
        self
    }

    pub fn failing_launch(mut self) -> Self {
        self.launch_error = true;
        self
    }

    pub fn failing_stop(mut self) -> Self {
        self.stop_error = true;
        self
    }

    pub fn with_stored(self, stored: StoredConfig) -> Self {
        *self.stored.lock().unwrap() = Some(stored);
        self
    }

    /// Kill every running subcontainer as if the process crashed.
    pub fn crash(&self) {
        self.running.lock().unwrap().clear();
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == call).count()
    }

    /// Index of the first call starting with `prefix`.
    pub fn position(&self, prefix: &str) -> Option<usize> {
        self.calls().iter().position(|c| c.starts_with(prefix))
    }

    pub fn probes(&self) -> u32 {
        self.probes.load(Ordering::SeqCst)
    }

    pub fn running_count(&self) -> usize {
        self.running.lock().unwrap().len()
    }

    pub fn stored(&self) -> Option<StoredConfig> {
        self.stored.lock().unwrap().clone()
    }

    pub fn exported(&self, host_id: &str) -> Vec<InterfaceBinding> {
        self.exports.lock().unwrap().get(host_id).cloned().unwrap_or_default()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

#[async_trait]
impl Effects for MockHost {
    async fn launch_subcontainer(
        &self,
        daemon: &DaemonSpec,
    ) -> Result<SubcontainerHandle, HostError> {
        self.record("launch");
        if self.launch_error {
            return Err(HostError::Launch("image not found".into()));
        }
        let id = SubcontainerId::new();
        self.running.lock().unwrap().insert(id);
        Ok(SubcontainerHandle {
            id,
            daemon: daemon.name.clone(),
        })
    }

    async fn subcontainer_running(&self, subcontainer: &SubcontainerHandle) -> bool {
        let mut running = self.running.lock().unwrap();
        if matches!(self.exits_after, Some(n) if self.probes() >= n) {
            running.remove(&subcontainer.id);
        }
        running.contains(&subcontainer.id)
    }

    async fn stop_subcontainer(&self, subcontainer: &SubcontainerHandle) -> Result<(), HostError> {
        self.record("stop");
        if self.stop_error {
            return Err(HostError::UnknownSubcontainer(subcontainer.id));
        }
        self.running.lock().unwrap().remove(&subcontainer.id);
        Ok(())
    }

    async fn is_port_listening(
        &self,
        _subcontainer: &SubcontainerHandle,
        _port: u16,
    ) -> Result<bool, HostError> {
        if let Some(delay) = self.probe_delay {
            tokio::time::sleep(delay).await;
        }
        let made = self.probes.fetch_add(1, Ordering::SeqCst);
        Ok(matches!(self.listening_after, Some(n) if made >= n))
    }

    async fn bind_port(
        &self,
        host_id: &str,
        port: u16,
        _protocol: Protocol,
    ) -> Result<(), HostError> {
        self.record(format!("bind:{}:{}", host_id, port));
        Ok(())
    }

    async fn export_interfaces(
        &self,
        host_id: &str,
        interfaces: &[InterfaceBinding],
    ) -> Result<(), HostError> {
        self.record(format!("export:{}", host_id));
        self.exports
            .lock()
            .unwrap()
            .insert(host_id.to_string(), interfaces.to_vec());
        Ok(())
    }

    async fn load_config(&self) -> Result<Option<StoredConfig>, HostError> {
        self.record("load");
        Ok(self.stored())
    }

    async fn save_config(&self, stored: &StoredConfig) -> Result<(), HostError> {
        self.record(format!("save:{}", stored.migration.version));
        *self.stored.lock().unwrap() = Some(stored.clone());
        Ok(())
    }
}
