//! Configuration subsystem.
//!
//! # Data Flow
//! ```text
//! Operator settings (TOML):
//!     tailrelay.toml
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → PackageConfig (validated, immutable)
//!
//! User settings (host-owned):
//!     user.rs declares `tailscale-auth-key`
//!     → host UI renders and persists it
//!     → migration/ keeps the stored version current
//! ```
//!
//! # Design Decisions
//! - Operator config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod user;
pub mod validation;

pub use schema::HealthCheckConfig;
pub use schema::LocalHostConfig;
pub use schema::ObservabilityConfig;
pub use schema::PackageConfig;
pub use schema::ReadinessConfig;
pub use user::{config_spec, ConfigSpec, UserConfig, UserConfigError, ValueSpec};
