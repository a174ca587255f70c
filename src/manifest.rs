//! Package manifest metadata.
//!
//! Static description of the package as the host platform lists it. Nothing
//! here has behavior; it is serialized by `declarations` for the host.

use serde::Serialize;

/// Package version string (upstream version, then wrapper revision).
pub const PACKAGE_VERSION: &str = "0.4.0:0.4-beta.0";

/// Identifier of the only data volume.
pub const MAIN_VOLUME: &str = "main";

/// Identifier of the only container image.
pub const MAIN_IMAGE: &str = "main";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub id: &'static str,
    pub title: &'static str,
    pub version: &'static str,
    pub release_notes: &'static str,
    pub license: &'static str,
    pub wrapper_repo: &'static str,
    pub upstream_repo: &'static str,
    pub support_site: &'static str,
    pub marketing_site: &'static str,
    pub donation_url: Option<&'static str>,
    pub docs_url: &'static str,
    pub description: Description,
    pub volumes: Vec<&'static str>,
    pub images: Vec<ImageSource>,
    pub alerts: Alerts,
    /// Ids of sibling packages this one depends on (none).
    pub dependencies: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Description {
    pub short: &'static str,
    pub long: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSource {
    pub id: &'static str,
    pub dockerfile: &'static str,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Alerts {
    pub install: Option<&'static str>,
    pub update: Option<&'static str>,
    pub uninstall: Option<&'static str>,
    pub restore: Option<&'static str>,
    pub start: Option<&'static str>,
    pub stop: Option<&'static str>,
}

/// The Tailrelay manifest.
pub fn manifest() -> Manifest {
    Manifest {
        id: "tailrelay",
        title: "Tailrelay",
        version: PACKAGE_VERSION,
        release_notes: "Initial package. Web UI for managing Tailscale, Caddy reverse proxies, \
                        and socat TCP relays.",
        license: "mit",
        wrapper_repo: "https://github.com/sudocarlos/tailrelay-startos",
        upstream_repo: "https://github.com/sudocarlos/tailscale-socaddy-proxy",
        support_site: "https://github.com/sudocarlos/tailscale-socaddy-proxy/issues",
        marketing_site: "https://github.com/sudocarlos/tailscale-socaddy-proxy",
        donation_url: None,
        docs_url: "https://github.com/sudocarlos/tailrelay-startos/blob/master/docs",
        description: Description {
            short: "Expose local services to your Tailscale network with automatic TLS, \
                    HTTP proxies, and TCP relays.",
            long: "Tailrelay combines Tailscale VPN, Caddy reverse proxy, socat TCP relays, \
                   and a Web UI for browser-based management. Securely access self-hosted \
                   services like BTCPayServer, LND, electrs, and Mempool without Tor. \
                   Features automatic HTTPS certificates via Tailscale, protocol support \
                   for both HTTP/HTTPS proxies and raw TCP relays, and backup/restore \
                   functionality.",
        },
        volumes: vec![MAIN_VOLUME],
        images: vec![ImageSource {
            id: MAIN_IMAGE,
            dockerfile: "Dockerfile",
        }],
        alerts: Alerts {
            install: Some(
                "Tailrelay requires a Tailscale account with HTTPS certificates enabled. \
                 After installation, visit the Web UI to authenticate with Tailscale.",
            ),
            ..Alerts::default()
        },
        dependencies: Vec::new(),
    }
}
