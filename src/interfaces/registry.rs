//! Interface registry and export.
//!
//! # Responsibilities
//! - Collect the package's interface bindings
//! - Reject two interfaces on one port, across every multi-host of the package
//! - Bind ports and export interfaces through the host
//!
//! # Design Decisions
//! - Binding an equal interface twice is a no-op
//! - Every setup builds a fresh registry; the previous export is replaced
//! - Conflicts are setup-time errors, raised before the host is called

use serde::Serialize;
use std::collections::BTreeMap;

use crate::host::{Effects, HostError};
use crate::interfaces::binding::{ui_interface, InterfaceBinding, Protocol};

/// Error type for interface setup.
#[derive(Debug, thiserror::Error)]
pub enum InterfaceError {
    #[error(
        "port {port} on `{host_id}` is already claimed by interface `{owner}`, \
         cannot bind `{requested}`"
    )]
    PortConflict {
        host_id: String,
        port: u16,
        owner: String,
        requested: String,
    },

    #[error("interface `{0}` is already declared with a different binding")]
    DuplicateId(String),

    #[error("host error: {0}")]
    Host(#[from] HostError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindOutcome {
    Added,
    Unchanged,
}

/// What the host acknowledged for one multi-host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportReceipt {
    pub host_id: String,
    pub ports: Vec<u16>,
    pub interfaces: Vec<String>,
}

/// Interface bindings of one package, keyed by id.
#[derive(Debug, Default)]
pub struct InterfaceRegistry {
    bindings: BTreeMap<String, InterfaceBinding>,
}

impl InterfaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, binding: InterfaceBinding) -> Result<BindOutcome, InterfaceError> {
        if let Some(existing) = self.bindings.get(&binding.id) {
            return if *existing == binding {
                Ok(BindOutcome::Unchanged)
            } else {
                Err(InterfaceError::DuplicateId(binding.id))
            };
        }

        if let Some(owner) = self.bindings.values().find(|b| b.port == binding.port) {
            return Err(InterfaceError::PortConflict {
                host_id: owner.host_id.clone(),
                port: binding.port,
                owner: owner.id.clone(),
                requested: binding.id,
            });
        }

        self.bindings.insert(binding.id.clone(), binding);
        Ok(BindOutcome::Added)
    }

    pub fn bindings(&self) -> impl Iterator<Item = &InterfaceBinding> {
        self.bindings.values()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bind every port and export every interface, one call pair per multi-host.
    pub async fn export(
        &self,
        effects: &dyn Effects,
    ) -> Result<Vec<ExportReceipt>, InterfaceError> {
        let mut by_host: BTreeMap<&str, Vec<InterfaceBinding>> = BTreeMap::new();
        for binding in self.bindings.values() {
            by_host.entry(&binding.host_id).or_default().push(binding.clone());
        }

        let mut receipts = Vec::with_capacity(by_host.len());
        for (host_id, interfaces) in by_host {
            let mut ports: Vec<(u16, Protocol)> =
                interfaces.iter().map(|i| (i.port, i.protocol)).collect();
            ports.sort_unstable();
            ports.dedup();

            for (port, protocol) in &ports {
                effects.bind_port(host_id, *port, *protocol).await?;
            }
            effects.export_interfaces(host_id, &interfaces).await?;

            tracing::info!(
                host_id,
                interfaces = interfaces.len(),
                "Interfaces exported"
            );
            receipts.push(ExportReceipt {
                host_id: host_id.to_string(),
                ports: ports.into_iter().map(|(port, _)| port).collect(),
                interfaces: interfaces.into_iter().map(|i| i.id).collect(),
            });
        }
        Ok(receipts)
    }
}

/// Declare and export the package's interfaces.
pub async fn setup_interfaces(effects: &dyn Effects) -> Result<Vec<ExportReceipt>, InterfaceError> {
    let mut registry = InterfaceRegistry::new();
    registry.bind(ui_interface())?;
    registry.export(effects).await
}
