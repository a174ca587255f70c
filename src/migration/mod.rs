//! Configuration migration subsystem.
//!
//! # Data Flow
//! ```text
//! Package start:
//!     Effects::load_config (host store)
//!     → chain.rs plans up/down steps (stored → current)
//!     → each step transforms the payload and stamps its version
//!     → Effects::save_config, once, after the whole plan succeeded
//!     → lifecycle/ may launch the daemon
//! ```
//!
//! # Design Decisions
//! - Fail closed: an unknown stored version blocks the start
//! - Payload transforms are typed functions, one pair per version
//! - No step is assumed to be the identity; the chain runs whatever it holds

pub mod chain;
pub mod store;
pub mod version;

pub use chain::{
    package_chain, Direction, MigrationChain, MigrationError, MigrationRegistry, MigrationStep,
    PlannedStep,
};
pub use store::{
    migrate_file, run_migrations, FileMigration, MigrationKind, MigrationMetadata, MigrationReport,
    StoredConfig,
};
pub use version::ConfigVersion;
