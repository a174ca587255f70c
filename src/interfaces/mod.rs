//! Interface export subsystem.
//!
//! # Data Flow
//! ```text
//! binding.rs declares the Web UI (http, UI_PORT)
//!     → registry.rs checks ids and ports
//!     → Effects::bind_port per multi-host port
//!     → Effects::export_interfaces per multi-host
//! ```

pub mod binding;
pub mod registry;

pub use binding::{ui_interface, InterfaceBinding, InterfaceType, Protocol, UI_HOST_ID};
pub use registry::{setup_interfaces, BindOutcome, ExportReceipt, InterfaceError, InterfaceRegistry};
