//! OIDC auth method configuration.
//!
//! Reconciles `/v1/auth/{mount}/config` for an enabled OIDC auth mount.
//! Vault expects the full field set on every write, so unset string
//! fields are sent as `""` and unset lists as `[]` rather than omitted.
//! A 404 on the config read means the mount has never been configured;
//! that counts as a change, not an error.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::client::VaultApi;
use crate::config::SecretString;
use crate::errors::{Result, VaultsmithError};
use crate::modules::{data_object, mount_enabled};
use crate::reconcile::{reconcile, ConfigTarget, Report, State};

/// Desired OIDC auth method configuration.
#[derive(Debug, Clone)]
pub struct OidcAuthConfig {
    /// Auth method mount point (without trailing slash)
    pub mount_point: String,
    /// OIDC discovery base URL; mutually exclusive with `jwks_url`
    pub oidc_discovery_url: Option<String>,
    pub oidc_client_id: Option<String>,
    pub oidc_client_secret: Option<SecretString>,
    /// Default role used when none is provided during login
    pub default_role: Option<String>,
    pub bound_issuer: String,
    pub jwks_ca_pem: String,
    pub jwks_url: Option<String>,
    pub jwt_supported_algs: Vec<String>,
    pub jwt_validation_pubkeys: Vec<String>,
    pub oidc_discovery_ca_pem: String,
}

impl Default for OidcAuthConfig {
    fn default() -> Self {
        Self {
            mount_point: "oidc".to_string(),
            oidc_discovery_url: None,
            oidc_client_id: None,
            oidc_client_secret: None,
            default_role: None,
            bound_issuer: String::new(),
            jwks_ca_pem: String::new(),
            jwks_url: None,
            jwt_supported_algs: Vec::new(),
            jwt_validation_pubkeys: Vec::new(),
            oidc_discovery_ca_pem: String::new(),
        }
    }
}

impl OidcAuthConfig {
    /// Build the desired-state payload, including the write-only secret.
    pub fn desired_state(&self) -> Result<State> {
        if self.oidc_discovery_url.is_none() && self.jwks_url.is_none() {
            return Err(VaultsmithError::config(
                "one of oidc_discovery_url or jwks_url is required",
            ));
        }

        let mut desired = State::new();
        desired.insert(
            "oidc_discovery_url".into(),
            Value::String(self.oidc_discovery_url.clone().unwrap_or_default()),
        );
        desired.insert("oidc_client_id".into(), option_value(&self.oidc_client_id));
        desired.insert("default_role".into(), option_value(&self.default_role));
        desired.insert("bound_issuer".into(), Value::String(self.bound_issuer.clone()));
        desired.insert("jwks_ca_pem".into(), Value::String(self.jwks_ca_pem.clone()));
        desired.insert(
            "jwks_url".into(),
            Value::String(self.jwks_url.clone().unwrap_or_default()),
        );
        desired.insert("jwt_supported_algs".into(), json!(self.jwt_supported_algs));
        desired.insert("jwt_validation_pubkeys".into(), json!(self.jwt_validation_pubkeys));
        desired.insert(
            "oidc_discovery_ca_pem".into(),
            Value::String(self.oidc_discovery_ca_pem.clone()),
        );
        desired.insert(
            "oidc_client_secret".into(),
            match &self.oidc_client_secret {
                Some(secret) => Value::String(secret.expose_secret().to_string()),
                None => Value::Null,
            },
        );
        Ok(desired)
    }
}

fn option_value(value: &Option<String>) -> Value {
    match value {
        Some(s) => Value::String(s.clone()),
        None => Value::Null,
    }
}

struct OidcAuthTarget<'a> {
    api: &'a VaultApi,
    mount_point: &'a str,
}

#[async_trait]
impl ConfigTarget for OidcAuthTarget<'_> {
    fn kind(&self) -> &'static str {
        "oidc auth method"
    }

    fn write_only_keys(&self) -> &'static [&'static str] {
        &["oidc_client_secret"]
    }

    async fn check_precondition(&self) -> Result<()> {
        if mount_enabled(self.api, "sys/auth", self.mount_point).await? {
            Ok(())
        } else {
            Err(VaultsmithError::precondition("auth mount is not enabled"))
        }
    }

    async fn fetch_current(&self) -> Result<State> {
        let path = format!("auth/{}/config", self.mount_point);
        match self.api.get_optional(&path).await? {
            Some(response) => Ok(data_object(&response)),
            None => Ok(State::new()),
        }
    }

    async fn apply(&self, desired: &State) -> Result<()> {
        let path = format!("auth/{}/config", self.mount_point);
        self.api.post_json(&path, &Value::Object(desired.clone())).await?;
        Ok(())
    }
}

/// Reconcile the auth method configuration toward `config`.
pub async fn run(api: &VaultApi, config: &OidcAuthConfig, check_mode: bool) -> Result<Report> {
    let desired = config.desired_state()?;
    let target = OidcAuthTarget { api, mount_point: config.mount_point.trim_end_matches('/') };
    reconcile(&target, &desired, check_mode).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desired_state_defaults() {
        let config = OidcAuthConfig {
            oidc_discovery_url: Some("https://accounts.google.com".to_string()),
            oidc_client_id: Some("123456".to_string()),
            default_role: Some("gmail".to_string()),
            ..OidcAuthConfig::default()
        };

        let desired = config.desired_state().unwrap();
        assert_eq!(desired.get("oidc_discovery_url").unwrap(), "https://accounts.google.com");
        assert_eq!(desired.get("jwks_url").unwrap(), "");
        assert_eq!(desired.get("bound_issuer").unwrap(), "");
        assert_eq!(desired.get("jwt_supported_algs").unwrap(), &json!([]));
        assert_eq!(desired.get("jwt_validation_pubkeys").unwrap(), &json!([]));
        assert_eq!(desired.get("oidc_client_secret").unwrap(), &Value::Null);
    }

    #[test]
    fn test_desired_state_requires_discovery_or_jwks() {
        let err = OidcAuthConfig::default().desired_state().unwrap_err();
        assert!(err.to_string().contains("oidc_discovery_url or jwks_url"));

        let config = OidcAuthConfig {
            jwks_url: Some("https://idp.example.com/jwks".to_string()),
            ..OidcAuthConfig::default()
        };
        assert!(config.desired_state().is_ok());
    }

    #[test]
    fn test_secret_included_in_payload() {
        let config = OidcAuthConfig {
            oidc_discovery_url: Some("https://accounts.google.com".to_string()),
            oidc_client_secret: Some(SecretString::new("topsecret")),
            ..OidcAuthConfig::default()
        };
        let desired = config.desired_state().unwrap();
        assert_eq!(desired.get("oidc_client_secret").unwrap(), "topsecret");
    }
}
