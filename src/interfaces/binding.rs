//! Interface declarations.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::messages;
use crate::UI_PORT;

/// Multi-host the Web UI is bound on.
pub const UI_HOST_ID: &str = "ui-multi";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceType {
    Ui,
}

/// A named interface bound to a port, as exported to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceBinding {
    pub name: String,
    pub id: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: InterfaceType,
    pub protocol: Protocol,
    pub port: u16,
    pub path: String,
    pub query: BTreeMap<String, String>,
    pub masked: bool,
    pub scheme_override: Option<String>,
    pub username: Option<String>,
    /// Multi-host carrying the port.
    #[serde(skip)]
    pub host_id: String,
}

/// The Web UI interface.
pub fn ui_interface() -> InterfaceBinding {
    InterfaceBinding {
        name: messages::INTERFACE_NAME.to_string(),
        id: "ui".to_string(),
        description: messages::INTERFACE_DESCRIPTION.to_string(),
        kind: InterfaceType::Ui,
        protocol: Protocol::Http,
        port: UI_PORT,
        path: String::new(),
        query: BTreeMap::new(),
        masked: false,
        scheme_override: None,
        username: None,
        host_id: UI_HOST_ID.to_string(),
    }
}
