//! Persisted configuration and the pre-start migration run.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::{ConfigSpec, UserConfig};
use crate::host::local::{read_stored_config, write_stored_config};
use crate::host::Effects;
use crate::migration::chain::{MigrationChain, MigrationError};
use crate::migration::version::ConfigVersion;
use crate::observability::metrics;

/// How a migration was produced. Only script migrations exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MigrationKind {
    Script,
}

/// Version metadata stamped next to the stored payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MigrationMetadata {
    pub version: ConfigVersion,
    #[serde(rename = "type")]
    pub kind: MigrationKind,
}

impl MigrationMetadata {
    pub fn script(version: ConfigVersion) -> Self {
        Self {
            version,
            kind: MigrationKind::Script,
        }
    }
}

/// User configuration as the host persists it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StoredConfig {
    pub config: UserConfig,
    pub migration: MigrationMetadata,
}

impl StoredConfig {
    /// Empty configuration, as created at install time.
    pub fn fresh(version: ConfigVersion) -> Self {
        Self {
            config: UserConfig::default(),
            migration: MigrationMetadata::script(version),
        }
    }
}

/// Outcome of [`run_migrations`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    /// Version found in the store; `None` on first install.
    pub from: Option<ConfigVersion>,
    pub to: ConfigVersion,
    pub steps: usize,
}

/// Bring the host's stored configuration to the chain's current version.
///
/// The store is written at most once, after every step has succeeded and the
/// resulting payload satisfies `spec`. Any error leaves the store as it was
/// and must block the daemon start. A first install is saved empty and left
/// for the host UI to fill in.
pub async fn run_migrations(
    effects: &dyn Effects,
    chain: &MigrationChain,
    spec: &ConfigSpec,
) -> Result<MigrationReport, MigrationError> {
    let target = chain.current().clone();

    let Some(stored) = effects.load_config().await? else {
        tracing::info!(version = %target, "No stored configuration, creating empty one");
        effects.save_config(&StoredConfig::fresh(target.clone())).await?;
        metrics::record_migration("created");
        return Ok(MigrationReport {
            from: None,
            to: target,
            steps: 0,
        });
    };

    let from = stored.migration.version.clone();
    if from == target {
        check_payload(&stored, spec)?;
        tracing::debug!(version = %target, "Stored configuration is current");
        metrics::record_migration("current");
        return Ok(MigrationReport {
            from: Some(from),
            to: target,
            steps: 0,
        });
    }

    let plan = match chain.plan(&from, &target) {
        Ok(plan) => plan,
        Err(e) => {
            tracing::error!(
                stored = %from,
                target = %target,
                error = %e,
                "Refusing to migrate configuration"
            );
            metrics::record_migration("failed");
            return Err(e);
        }
    };

    let mut migrated = stored;
    for step in &plan {
        tracing::info!(
            direction = ?step.direction,
            from = %step.from,
            to = %step.to,
            "Applying configuration migration"
        );
        migrated = step.apply(migrated).inspect_err(|e| {
            tracing::error!(to = %step.to, error = %e, "Configuration migration failed");
            metrics::record_migration("failed");
        })?;
    }

    check_payload(&migrated, spec)?;
    effects.save_config(&migrated).await?;
    metrics::record_migration("applied");
    tracing::info!(from = %from, to = %target, steps = plan.len(), "Configuration migrated");

    Ok(MigrationReport {
        from: Some(from),
        to: target,
        steps: plan.len(),
    })
}

/// Result of [`migrate_file`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileMigration {
    pub from: ConfigVersion,
    pub to: ConfigVersion,
    pub steps: usize,
    pub path: PathBuf,
}

/// Migrate a stored configuration file in place to `target`.
///
/// The file is rewritten only when the whole plan succeeded and the payload
/// satisfies `spec`; a file already at `target` is left untouched.
pub async fn migrate_file(
    path: &Path,
    chain: &MigrationChain,
    spec: &ConfigSpec,
    target: &ConfigVersion,
) -> Result<FileMigration, MigrationError> {
    let stored = read_stored_config(path)
        .await?
        .ok_or_else(|| MigrationError::NoStoredConfig(path.to_path_buf()))?;
    let from = stored.migration.version.clone();
    let steps = chain.plan(&from, target)?.len();

    let migrated = chain.migrate(&stored, target)?;
    check_payload(&migrated, spec)?;
    if steps > 0 {
        write_stored_config(path, &migrated).await?;
        tracing::info!(
            path = %path.display(),
            from = %from,
            to = %target,
            steps,
            "Stored file migrated"
        );
    }

    Ok(FileMigration {
        from,
        to: target.clone(),
        steps,
        path: path.to_path_buf(),
    })
}

fn check_payload(stored: &StoredConfig, spec: &ConfigSpec) -> Result<(), MigrationError> {
    stored.config.validate(spec).map_err(|e| {
        tracing::error!(
            version = %stored.migration.version,
            error = %e,
            "Stored configuration does not match its declaration"
        );
        metrics::record_migration("failed");
        MigrationError::InvalidConfig(e)
    })
}
