//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Migrate config → Export interfaces → Launch daemon → Poll readiness
//!
//! Orchestrator (orchestrator.rs):
//!     Stopped → Starting → Ready, driven by state.rs
//!
//! Stop (shutdown.rs, signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger → subcontainer torn down → Stopped
//! ```
//!
//! # Design Decisions
//! - One supervised daemon, no internal worker pool
//! - No internal retries; retry policy belongs to the host
//! - Nothing persists across restarts; every start begins at Stopped

pub mod daemon;
pub mod orchestrator;
pub mod shutdown;
pub mod signals;
pub mod startup;
pub mod state;

pub use daemon::{primary_daemon, DaemonSpec};
pub use orchestrator::{LifecycleError, Orchestrator};
pub use shutdown::{Shutdown, StopListener};
pub use startup::{start_package, StartedPackage, StartupError};
pub use state::{FailureReason, LifecycleEvent, LifecycleState};
