//! User-settable package configuration.
//!
//! # Responsibilities
//! - Declare the one option the host UI renders (`tailscale-auth-key`)
//! - Provide the typed payload the host persists for it
//!
//! # Design Decisions
//! - The declaration is static data; building it cannot fail
//! - The payload is a typed struct, not a dynamic map
//! - The token never appears in `Debug` output

use serde::{Deserialize, Serialize};
use std::fmt;

/// Key of the auth-key option in the host's configuration store.
pub const AUTH_KEY_FIELD: &str = "tailscale-auth-key";

/// Presentation metadata for a single configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ValueSpec {
    String {
        name: &'static str,
        description: &'static str,
        nullable: bool,
        masked: bool,
        copyable: bool,
        placeholder: Option<&'static str>,
    },
}

impl ValueSpec {
    pub fn is_nullable(&self) -> bool {
        match self {
            ValueSpec::String { nullable, .. } => *nullable,
        }
    }
}

/// Ordered set of configuration declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSpec {
    fields: Vec<(&'static str, ValueSpec)>,
}

impl ConfigSpec {
    pub fn new(fields: Vec<(&'static str, ValueSpec)>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &ValueSpec)> {
        self.fields.iter().map(|(key, spec)| (*key, spec))
    }

    pub fn get(&self, key: &str) -> Option<&ValueSpec> {
        self.fields
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, spec)| spec)
    }
}

impl Serialize for ConfigSpec {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, spec) in &self.fields {
            map.serialize_entry(key, spec)?;
        }
        map.end()
    }
}

/// The package's configuration declaration.
pub fn config_spec() -> ConfigSpec {
    ConfigSpec {
        fields: vec![(
            AUTH_KEY_FIELD,
            ValueSpec::String {
                name: "Tailscale Auth Key",
                description: "Reusable auth key from your Tailscale admin console \
                              (https://login.tailscale.com/admin/settings/keys).",
                nullable: true,
                masked: true,
                copyable: true,
                placeholder: Some("tskey-auth-..."),
            },
        )],
    }
}

/// Error raised when a payload does not satisfy the declaration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserConfigError {
    #[error("required field `{0}` is missing")]
    MissingField(&'static str),
}

/// Persisted user configuration.
#[derive(Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserConfig {
    #[serde(rename = "tailscale-auth-key", default)]
    pub tailscale_auth_key: Option<String>,
}

impl UserConfig {
    /// Check the payload against `spec`.
    ///
    /// Types are enforced by deserialization, so only presence of
    /// non-nullable fields is left to verify.
    pub fn validate(&self, spec: &ConfigSpec) -> Result<(), UserConfigError> {
        for (key, value) in spec.fields() {
            if key == AUTH_KEY_FIELD && !value.is_nullable() && self.tailscale_auth_key.is_none() {
                return Err(UserConfigError::MissingField(AUTH_KEY_FIELD));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for UserConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserConfig")
            .field(
                "tailscale_auth_key",
                &self.tailscale_auth_key.as_ref().map(|_| "********"),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_serializes_to_host_shape() {
        let json = serde_json::to_value(config_spec()).unwrap();
        let field = &json[AUTH_KEY_FIELD];
        assert_eq!(field["type"], "string");
        assert_eq!(field["name"], "Tailscale Auth Key");
        assert_eq!(field["nullable"], true);
        assert_eq!(field["masked"], true);
        assert_eq!(field["copyable"], true);
        assert_eq!(field["placeholder"], "tskey-auth-...");
    }

    #[test]
    fn empty_config_is_valid() {
        let config = UserConfig::default();
        assert!(config.validate(&config_spec()).is_ok());
    }

    #[test]
    fn missing_required_key_is_rejected() {
        let mut required = config_spec();
        if let Some((_, ValueSpec::String { nullable, .. })) = required.fields.first_mut() {
            *nullable = false;
        }

        assert_eq!(
            UserConfig::default().validate(&required),
            Err(UserConfigError::MissingField(AUTH_KEY_FIELD))
        );
        let filled = UserConfig {
            tailscale_auth_key: Some("tskey-auth-abc".into()),
        };
        assert!(filled.validate(&required).is_ok());
    }

    #[test]
    fn payload_uses_kebab_key() {
        let config: UserConfig =
            serde_json::from_str(r#"{"tailscale-auth-key": "tskey-auth-abc"}"#).unwrap();
        assert_eq!(config.tailscale_auth_key.as_deref(), Some("tskey-auth-abc"));

        let absent: UserConfig = serde_json::from_str("{}").unwrap();
        assert!(absent.tailscale_auth_key.is_none());

        let null: UserConfig = serde_json::from_str(r#"{"tailscale-auth-key": null}"#).unwrap();
        assert!(null.tailscale_auth_key.is_none());
    }

    #[test]
    fn non_string_value_is_rejected() {
        let result: Result<UserConfig, _> = serde_json::from_str(r#"{"tailscale-auth-key": 42}"#);
        assert!(result.is_err());
    }

    #[test]
    fn debug_masks_token() {
        let config = UserConfig {
            tailscale_auth_key: Some("tskey-auth-secret".into()),
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("********"));
    }
}
