//! Linear migration chain.
//!
//! # Responsibilities
//! - Hold the ordered list of known configuration versions
//! - Plan the `up`/`down` steps between a stored and a target version
//! - Apply a plan to a stored configuration without touching the original
//!
//! # Design Decisions
//! - The chain is validated once at construction: strictly ascending, no gaps
//! - Unknown versions fail the whole plan; nothing is applied partially
//! - Every step stamps its own version into the metadata it produces

use serde::Serialize;
use std::path::PathBuf;

use crate::config::{UserConfig, UserConfigError};
use crate::host::HostError;
use crate::migration::store::{MigrationMetadata, StoredConfig};
use crate::migration::version::ConfigVersion;

/// A payload transform between two adjacent versions.
pub type Transform = fn(UserConfig) -> Result<UserConfig, MigrationError>;

/// Error type for migration planning and execution.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("unknown configuration version {0}")]
    UnknownVersion(ConfigVersion),

    #[error("migration chain is not linear: {next} does not follow {previous}")]
    BrokenChain {
        previous: ConfigVersion,
        next: ConfigVersion,
    },

    #[error("transform to {version} failed: {reason}")]
    Transform {
        version: ConfigVersion,
        reason: String,
    },

    #[error("no stored configuration at {}", .0.display())]
    NoStoredConfig(PathBuf),

    #[error("stored configuration is invalid: {0}")]
    InvalidConfig(#[from] UserConfigError),

    #[error("configuration store: {0}")]
    Host(#[from] HostError),
}

/// The `{up, down}` pair that leads into `version`.
#[derive(Debug, Clone)]
pub struct MigrationStep {
    pub version: ConfigVersion,
    /// Converts a payload of the previous version into this version's shape.
    pub up: Transform,
    /// Reverses `up`.
    pub down: Transform,
}

impl MigrationStep {
    /// A step whose transforms leave the payload untouched.
    pub fn identity(version: ConfigVersion) -> Self {
        Self {
            version,
            up: identity,
            down: identity,
        }
    }
}

fn identity(config: UserConfig) -> Result<UserConfig, MigrationError> {
    Ok(config)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

/// One transform scheduled by [`MigrationChain::plan`].
#[derive(Debug, Clone, Serialize)]
pub struct PlannedStep {
    pub direction: Direction,
    pub from: ConfigVersion,
    pub to: ConfigVersion,
    #[serde(skip)]
    transform: Transform,
}

impl PlannedStep {
    /// Apply the transform and stamp `to` into the metadata.
    pub fn apply(&self, stored: StoredConfig) -> Result<StoredConfig, MigrationError> {
        let config = (self.transform)(stored.config)?;
        Ok(StoredConfig {
            config,
            migration: MigrationMetadata::script(self.to.clone()),
        })
    }
}

/// Version list exported to the host's configuration manager.
#[derive(Debug, Clone, Serialize)]
pub struct MigrationRegistry {
    pub current: ConfigVersion,
    pub versions: Vec<ConfigVersion>,
}

/// Ordered chain of configuration versions.
#[derive(Debug, Clone)]
pub struct MigrationChain {
    base: ConfigVersion,
    steps: Vec<MigrationStep>,
}

impl MigrationChain {
    /// Build a chain starting at `base`. Steps must be strictly ascending.
    pub fn new(base: ConfigVersion, steps: Vec<MigrationStep>) -> Result<Self, MigrationError> {
        let mut previous = &base;
        for step in &steps {
            if step.version <= *previous {
                return Err(MigrationError::BrokenChain {
                    previous: previous.clone(),
                    next: step.version.clone(),
                });
            }
            previous = &step.version;
        }
        Ok(Self { base, steps })
    }

    /// The version stored configuration is normalized to.
    pub fn current(&self) -> &ConfigVersion {
        self.steps.last().map(|s| &s.version).unwrap_or(&self.base)
    }

    /// Every known version, oldest first.
    pub fn versions(&self) -> impl Iterator<Item = &ConfigVersion> {
        std::iter::once(&self.base).chain(self.steps.iter().map(|s| &s.version))
    }

    pub fn contains(&self, version: &ConfigVersion) -> bool {
        self.position(version).is_some()
    }

    pub fn registry(&self) -> MigrationRegistry {
        MigrationRegistry {
            current: self.current().clone(),
            versions: self.versions().cloned().collect(),
        }
    }

    /// Index of `version` in the chain; the base is 0.
    fn position(&self, version: &ConfigVersion) -> Option<usize> {
        self.versions().position(|v| v == version)
    }

    fn version_at(&self, index: usize) -> &ConfigVersion {
        if index == 0 {
            &self.base
        } else {
            &self.steps[index - 1].version
        }
    }

    /// Compute the steps that bring `stored` to `target`.
    pub fn plan(
        &self,
        stored: &ConfigVersion,
        target: &ConfigVersion,
    ) -> Result<Vec<PlannedStep>, MigrationError> {
        let from = self
            .position(stored)
            .ok_or_else(|| MigrationError::UnknownVersion(stored.clone()))?;
        let to = self
            .position(target)
            .ok_or_else(|| MigrationError::UnknownVersion(target.clone()))?;

        let plan = if from <= to {
            (from + 1..=to)
                .map(|i| PlannedStep {
                    direction: Direction::Up,
                    from: self.version_at(i - 1).clone(),
                    to: self.version_at(i).clone(),
                    transform: self.steps[i - 1].up,
                })
                .collect()
        } else {
            (to + 1..=from)
                .rev()
                .map(|i| PlannedStep {
                    direction: Direction::Down,
                    from: self.version_at(i).clone(),
                    to: self.version_at(i - 1).clone(),
                    transform: self.steps[i - 1].down,
                })
                .collect()
        };
        Ok(plan)
    }

    /// Migrate a copy of `stored` to `target`.
    ///
    /// The input is never modified; on error no migrated value exists.
    pub fn migrate(
        &self,
        stored: &StoredConfig,
        target: &ConfigVersion,
    ) -> Result<StoredConfig, MigrationError> {
        let plan = self.plan(&stored.migration.version, target)?;
        plan.iter().try_fold(stored.clone(), |acc, step| step.apply(acc))
    }
}

/// The Tailrelay configuration chain: 0.4.1 → 0.4.2 → 0.4.3.
///
/// No schema change has happened yet across these versions, so every step is
/// the identity on the payload.
pub fn package_chain() -> MigrationChain {
    MigrationChain {
        base: ConfigVersion::new(0, 4, 1),
        steps: vec![
            MigrationStep::identity(ConfigVersion::new(0, 4, 2)),
            MigrationStep::identity(ConfigVersion::new(0, 4, 3)),
        ],
    }
}
