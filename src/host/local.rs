//! Host implementation for running outside the platform.
//!
//! # Responsibilities
//! - Run subcontainers as local child processes
//! - Map declared volumes to directories under `volume_root`
//! - Probe ports on `bind_address`
//! - Keep the stored configuration as a JSON file
//!
//! # Design Decisions
//! - Children are killed when dropped, so a crashed runner leaves nothing behind
//! - Interface exports are recorded and logged; there is no reverse proxy
//! - Config writes go through a temporary file and a rename

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::net::TcpStream;
use tokio::process::{Child, Command};
use tokio::sync::Mutex;

use crate::config::LocalHostConfig;
use crate::host::{Effects, HostError, SubcontainerHandle, SubcontainerId};
use crate::interfaces::{InterfaceBinding, Protocol};
use crate::lifecycle::daemon::{DaemonSpec, Mount};
use crate::migration::StoredConfig;

pub struct LocalHost {
    config: LocalHostConfig,
    children: Mutex<HashMap<SubcontainerId, Child>>,
    ports: Mutex<BTreeMap<String, BTreeSet<(u16, Protocol)>>>,
    exports: Mutex<BTreeMap<String, Vec<InterfaceBinding>>>,
}

impl LocalHost {
    pub fn new(config: LocalHostConfig) -> Self {
        Self {
            config,
            children: Mutex::new(HashMap::new()),
            ports: Mutex::new(BTreeMap::new()),
            exports: Mutex::new(BTreeMap::new()),
        }
    }

    /// Directory standing in for `mount`.
    pub fn volume_dir(&self, mount: &Mount) -> PathBuf {
        let mut dir = self.config.volume_root.join(&mount.volume_id);
        if let Some(subpath) = &mount.subpath {
            dir.push(subpath.trim_start_matches('/'));
        }
        dir
    }

    /// Interfaces currently exported on `host_id`.
    pub async fn exported(&self, host_id: &str) -> Vec<InterfaceBinding> {
        self.exports.lock().await.get(host_id).cloned().unwrap_or_default()
    }

    fn program(&self, command: &str) -> PathBuf {
        match &self.config.command_dir {
            Some(dir) => dir.join(command),
            None => PathBuf::from(command),
        }
    }

    fn volume_env_key(volume_id: &str) -> String {
        format!(
            "VOLUME_{}",
            volume_id
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
                .collect::<String>()
        )
    }
}

#[async_trait]
impl Effects for LocalHost {
    async fn launch_subcontainer(
        &self,
        daemon: &DaemonSpec,
    ) -> Result<SubcontainerHandle, HostError> {
        let Some((program, args)) = daemon.exec.command.split_first() else {
            return Err(HostError::Launch(format!("daemon `{}` has an empty command", daemon.name)));
        };

        let mut command = Command::new(self.program(program));
        command
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        for (i, mount) in daemon.mounts.iter().enumerate() {
            let dir = self.volume_dir(mount);
            tokio::fs::create_dir_all(&dir).await.map_err(|e| HostError::Mount {
                volume: mount.volume_id.clone(),
                reason: format!("{}: {}", dir.display(), e),
            })?;
            if i == 0 {
                command.current_dir(&dir);
            }
            command.env(Self::volume_env_key(&mount.volume_id), &dir);
            tracing::debug!(
                volume = %mount.volume_id,
                mountpoint = %mount.mountpoint,
                path = %dir.display(),
                readonly = mount.readonly,
                "Volume mapped"
            );
        }

        let child = command
            .spawn()
            .map_err(|e| HostError::Launch(format!("{}: {}", program, e)))?;

        let id = SubcontainerId::new();
        tracing::info!(
            subcontainer = %id,
            daemon = %daemon.name,
            pid = child.id(),
            "Subcontainer process spawned"
        );
        self.children.lock().await.insert(id, child);

        Ok(SubcontainerHandle {
            id,
            daemon: daemon.name.clone(),
        })
    }

    async fn subcontainer_running(&self, subcontainer: &SubcontainerHandle) -> bool {
        let mut children = self.children.lock().await;
        match children.get_mut(&subcontainer.id) {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        }
    }

    async fn stop_subcontainer(&self, subcontainer: &SubcontainerHandle) -> Result<(), HostError> {
        let Some(mut child) = self.children.lock().await.remove(&subcontainer.id) else {
            return Err(HostError::UnknownSubcontainer(subcontainer.id));
        };

        match child.kill().await {
            Ok(()) => {}
            // Already exited.
            Err(e) if e.kind() == ErrorKind::InvalidInput => {}
            Err(e) => return Err(HostError::Io(e)),
        }
        tracing::info!(subcontainer = %subcontainer.id, "Subcontainer stopped");
        Ok(())
    }

    async fn is_port_listening(
        &self,
        _subcontainer: &SubcontainerHandle,
        port: u16,
    ) -> Result<bool, HostError> {
        match TcpStream::connect((self.config.bind_address.as_str(), port)).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == ErrorKind::ConnectionRefused => Ok(false),
            Err(e) => Err(HostError::Io(e)),
        }
    }

    async fn bind_port(
        &self,
        host_id: &str,
        port: u16,
        protocol: Protocol,
    ) -> Result<(), HostError> {
        let inserted = self
            .ports
            .lock()
            .await
            .entry(host_id.to_string())
            .or_default()
            .insert((port, protocol));
        if inserted {
            tracing::info!(host_id, port, protocol = ?protocol, "Port bound");
        }
        Ok(())
    }

    async fn export_interfaces(
        &self,
        host_id: &str,
        interfaces: &[InterfaceBinding],
    ) -> Result<(), HostError> {
        for interface in interfaces {
            tracing::info!(
                host_id,
                interface = %interface.id,
                url = %format!(
                    "http://{}:{}{}",
                    self.config.bind_address, interface.port, interface.path
                ),
                "Interface available"
            );
        }
        self.exports
            .lock()
            .await
            .insert(host_id.to_string(), interfaces.to_vec());
        Ok(())
    }

    async fn load_config(&self) -> Result<Option<StoredConfig>, HostError> {
        read_stored_config(&self.config.config_path).await
    }

    async fn save_config(&self, stored: &StoredConfig) -> Result<(), HostError> {
        write_stored_config(&self.config.config_path, stored).await
    }
}

/// Read a stored configuration file; a missing file means first install.
pub async fn read_stored_config(path: &Path) -> Result<Option<StoredConfig>, HostError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(HostError::Io(e)),
    };
    serde_json::from_str(&content)
        .map(Some)
        .map_err(|e| HostError::Store(format!("{}: {}", path.display(), e)))
}

/// Write a stored configuration file atomically.
pub async fn write_stored_config(path: &Path, stored: &StoredConfig) -> Result<(), HostError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_vec_pretty(stored)
        .map_err(|e| HostError::Store(e.to_string()))?;

    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, json).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}
