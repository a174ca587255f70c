//! Startup orchestration.
//!
//! # Responsibilities
//! - Bring stored configuration to the current version
//! - Declare and export the package interfaces
//! - Launch the daemon and wait for readiness
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal for this attempt
//! - Migration runs strictly before launch; a failed migration launches nothing
//! - Interfaces are exported before readiness; traffic flows once the daemon listens

use std::sync::Arc;

use crate::config::{config_spec, PackageConfig};
use crate::host::Effects;
use crate::interfaces::{setup_interfaces, ExportReceipt, InterfaceError};
use crate::lifecycle::daemon::primary_daemon;
use crate::lifecycle::orchestrator::{LifecycleError, Orchestrator};
use crate::lifecycle::shutdown::StopListener;
use crate::lifecycle::state::LifecycleState;
use crate::migration::{package_chain, run_migrations, MigrationError, MigrationReport};

/// Error type for the start pipeline.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("configuration migration failed: {0}")]
    Migration(#[from] MigrationError),

    #[error("interface setup failed: {0}")]
    Interfaces(#[from] InterfaceError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

/// A package that went through the start pipeline.
pub struct StartedPackage {
    pub migration: MigrationReport,
    pub receipts: Vec<ExportReceipt>,
    pub orchestrator: Orchestrator,
}

impl StartedPackage {
    pub fn state(&self) -> &LifecycleState {
        self.orchestrator.state()
    }
}

/// Run the full start sequence against `effects`.
pub async fn start_package(
    effects: Arc<dyn Effects>,
    config: &PackageConfig,
    stop: &mut StopListener,
) -> Result<StartedPackage, StartupError> {
    let migration = run_migrations(effects.as_ref(), &package_chain(), &config_spec()).await?;
    let receipts = setup_interfaces(effects.as_ref()).await?;

    let mut orchestrator = Orchestrator::new(effects, primary_daemon(), config.readiness.clone());
    let state = orchestrator.start(stop).await?;
    tracing::info!(state = %state, "Start sequence finished");

    Ok(StartedPackage {
        migration,
        receipts,
        orchestrator,
    })
}
