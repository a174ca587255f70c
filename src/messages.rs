//! Fixed, user-visible display strings.
//!
//! Every message shown by the host UI is declared here once so that success
//! and failure text stays identical across starts and locales.

/// Language the strings below are written in.
pub const DEFAULT_LANG: &str = "en_US";

/// Logged when the start sequence begins.
pub const STARTING: &str = "Starting Tailrelay...";

/// Label of the readiness check shown while the daemon starts.
pub const READY_DISPLAY: &str = "Web Interface";

/// Readiness probe succeeded.
pub const READY_SUCCESS: &str = "The Web UI is ready";

/// Readiness probe failed or has not succeeded yet.
pub const READY_FAILURE: &str = "The Web UI is not ready";

/// Name of the exported interface.
pub const INTERFACE_NAME: &str = "Web UI";

pub const INTERFACE_DESCRIPTION: &str =
    "The Tailrelay management interface for configuring proxies, relays, and Tailscale connection.";

/// Liveness check succeeded.
pub const WEB_UI_REACHABLE: &str = "The Web UI is reachable";

/// Liveness check could not reach the Web UI.
pub const WEB_UI_UNREACHABLE: &str = "Error while fetching URL";

/// Liveness check did not finish within its budget.
pub const WEB_UI_TIMEOUT: &str = "Timed out while fetching URL";
