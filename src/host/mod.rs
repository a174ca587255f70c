//! Host platform capability interface.
//!
//! # Responsibilities
//! - Define everything the package asks of the host: subcontainers, port
//!   probes, interface export, configuration storage
//! - Carry host failures back as one error type
//!
//! # Design Decisions
//! - Passed explicitly (`&dyn Effects` / `Arc<dyn Effects>`) to every
//!   orchestration call; there is no global host handle
//! - Probing methods take `&self` and hold no state between calls
//! - `local.rs` implements it with child processes for running off-platform

pub mod local;

use async_trait::async_trait;
use std::fmt;

use crate::interfaces::{InterfaceBinding, Protocol};
use crate::lifecycle::daemon::DaemonSpec;
use crate::migration::StoredConfig;

/// Error reported by the host.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("failed to launch subcontainer: {0}")]
    Launch(String),

    #[error("failed to mount volume `{volume}`: {reason}")]
    Mount { volume: String, reason: String },

    #[error("unknown subcontainer {0}")]
    UnknownSubcontainer(SubcontainerId),

    #[error("configuration store: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Identifier the host assigns to a launched subcontainer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubcontainerId(uuid::Uuid);

impl SubcontainerId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for SubcontainerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubcontainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "subcontainer-{}", self.0)
    }
}

/// A running subcontainer as handed back by [`Effects::launch_subcontainer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubcontainerHandle {
    pub id: SubcontainerId,
    /// Name of the daemon running inside.
    pub daemon: String,
}

/// Capabilities the host platform offers to the package.
#[async_trait]
pub trait Effects: Send + Sync {
    /// Start the daemon's command in a fresh subcontainer with its mounts.
    async fn launch_subcontainer(
        &self,
        daemon: &DaemonSpec,
    ) -> Result<SubcontainerHandle, HostError>;

    /// Whether the subcontainer's process is still alive.
    async fn subcontainer_running(&self, subcontainer: &SubcontainerHandle) -> bool;

    /// Tear the subcontainer down. Stopping an exited one is not an error.
    async fn stop_subcontainer(&self, subcontainer: &SubcontainerHandle) -> Result<(), HostError>;

    /// Whether `port` accepts TCP connections inside the subcontainer's network.
    async fn is_port_listening(
        &self,
        subcontainer: &SubcontainerHandle,
        port: u16,
    ) -> Result<bool, HostError>;

    /// Bind `port` on the named multi-host.
    async fn bind_port(
        &self,
        host_id: &str,
        port: u16,
        protocol: Protocol,
    ) -> Result<(), HostError>;

    /// Publish interfaces on a multi-host, replacing what it exported before.
    async fn export_interfaces(
        &self,
        host_id: &str,
        interfaces: &[InterfaceBinding],
    ) -> Result<(), HostError>;

    /// Stored user configuration; `None` before first install.
    async fn load_config(&self) -> Result<Option<StoredConfig>, HostError>;

    async fn save_config(&self, stored: &StoredConfig) -> Result<(), HostError>;
}
