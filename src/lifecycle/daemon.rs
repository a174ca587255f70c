//! Supervised daemon declaration.

use serde::Serialize;

use crate::health::port::PortListeningCheck;
use crate::manifest::{MAIN_IMAGE, MAIN_VOLUME};
use crate::messages;
use crate::UI_PORT;

/// Where the data volume appears inside the subcontainer.
pub const DATA_MOUNTPOINT: &str = "/var/lib/tailscale";

/// A volume mounted into the subcontainer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Mount {
    pub volume_id: String,
    /// Path inside the volume; `None` mounts the whole volume.
    pub subpath: Option<String>,
    pub mountpoint: String,
    pub readonly: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecSpec {
    pub command: Vec<String>,
}

/// How the host decides the daemon is ready.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadySpec {
    pub display: &'static str,
    pub probe: PortListeningCheck,
}

/// One supervised process.
///
/// Rebuilt on every start and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaemonSpec {
    pub name: String,
    pub image: String,
    /// Name given to the subcontainer.
    pub subcontainer: String,
    pub mounts: Vec<Mount>,
    pub exec: ExecSpec,
    pub ready: ReadySpec,
    /// Sibling daemons that must be ready first.
    pub requires: Vec<String>,
}

impl DaemonSpec {
    /// Port the readiness probe waits on.
    pub fn probe_port(&self) -> u16 {
        self.ready.probe.port
    }
}

/// The `primary` daemon: `start.sh` in the `main` image with the data volume
/// mounted read-write.
pub fn primary_daemon() -> DaemonSpec {
    DaemonSpec {
        name: "primary".to_string(),
        image: MAIN_IMAGE.to_string(),
        subcontainer: "tailrelay".to_string(),
        mounts: vec![Mount {
            volume_id: MAIN_VOLUME.to_string(),
            subpath: None,
            mountpoint: DATA_MOUNTPOINT.to_string(),
            readonly: false,
        }],
        exec: ExecSpec {
            command: vec!["start.sh".to_string()],
        },
        ready: ReadySpec {
            display: messages::READY_DISPLAY,
            probe: PortListeningCheck {
                port: UI_PORT,
                success_message: messages::READY_SUCCESS,
                error_message: messages::READY_FAILURE,
            },
        },
        requires: Vec::new(),
    }
}
