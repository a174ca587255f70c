//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Readiness (port.rs):
//!     Orchestrator poll tick
//!     → Effects::is_port_listening
//!     → HealthCheckResult gates Starting → Ready
//!
//! Liveness (web.rs, active.rs):
//!     Periodic timer after Ready
//!     → HTTP GET on the Web UI
//!     → HealthCheckResult logged and counted
//! ```
//!
//! # Design Decisions
//! - Checks are stateless functions with an explicit budget
//! - Faults are converted into results, never propagated
//! - Liveness failures do not restart the daemon

pub mod active;
pub mod port;
pub mod result;
pub mod web;

pub use active::HealthMonitor;
pub use port::{check_port_listening, PortListeningCheck};
pub use result::{HealthCheckResult, HealthStatus};
pub use web::{check_web_url, health_client, WEB_UI_CHECK, WEB_UI_URL};
