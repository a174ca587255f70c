//! Everything the package declares to the host, in one document.

use serde::Serialize;

use crate::config::{config_spec, ConfigSpec};
use crate::health::WEB_UI_CHECK;
use crate::interfaces::{ui_interface, InterfaceBinding};
use crate::lifecycle::daemon::{primary_daemon, DaemonSpec};
use crate::manifest::{manifest, Manifest};
use crate::messages::DEFAULT_LANG;
use crate::migration::{package_chain, MigrationRegistry};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageDeclarations {
    pub lang: &'static str,
    pub manifest: Manifest,
    pub config: ConfigSpec,
    pub migrations: MigrationRegistry,
    pub daemons: Vec<DaemonSpec>,
    pub interfaces: Vec<InterfaceBinding>,
    pub health_checks: Vec<&'static str>,
}

pub fn declarations() -> PackageDeclarations {
    PackageDeclarations {
        lang: DEFAULT_LANG,
        manifest: manifest(),
        config: config_spec(),
        migrations: package_chain().registry(),
        daemons: vec![primary_daemon()],
        interfaces: vec![ui_interface()],
        health_checks: vec![WEB_UI_CHECK],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interface_and_probe_share_port() {
        let decl = declarations();
        assert_eq!(decl.interfaces.len(), 1);
        assert_eq!(decl.daemons.len(), 1);
        assert_eq!(decl.interfaces[0].port, decl.daemons[0].probe_port());
    }

    #[test]
    fn serializes_every_section() {
        let json = serde_json::to_value(declarations()).unwrap();
        for key in ["manifest", "config", "migrations", "daemons", "interfaces", "healthChecks"] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(json["migrations"]["current"], "0.4.3");
        assert_eq!(json["healthChecks"], serde_json::json!(["web-ui"]));
    }
}
