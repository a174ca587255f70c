//! Tailrelay package orchestration core.
//!
//! Packages Tailscale, Caddy and socat relays behind one Web UI for a host
//! orchestration platform: declares the user configuration, keeps its stored
//! version current, starts the daemon, gates readiness on the Web UI port and
//! exports the Web UI interface.

pub mod config;
pub mod declarations;
pub mod health;
pub mod host;
pub mod interfaces;
pub mod lifecycle;
pub mod manifest;
pub mod messages;
pub mod migration;
pub mod observability;

pub use config::PackageConfig;
pub use host::Effects;
pub use lifecycle::{start_package, Orchestrator, Shutdown};

/// Port the Web UI listens on. Both the interface binding and the readiness
/// probe use it.
pub const UI_PORT: u16 = 8021;
