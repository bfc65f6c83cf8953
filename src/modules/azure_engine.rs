//! Azure secret engine configuration.
//!
//! Reconciles the service-principal configuration of a mounted `azure`
//! secret engine (`/v1/{mount}/config`). The engine must already be
//! enabled; enabling it is a separate administrative action and a missing
//! mount is a terminal failure here.

use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;

use crate::client::VaultApi;
use crate::config::{load_config_object, SecretString};
use crate::errors::{Result, VaultsmithError};
use crate::modules::{data_object, mount_enabled};
use crate::reconcile::{reconcile, ConfigTarget, Report, State};

/// Desired Azure service-principal configuration.
#[derive(Debug, Clone)]
pub struct AzureEngineConfig {
    /// Secret engine mount point (without trailing slash)
    pub mount_point: String,
    pub subscription_id: Option<String>,
    pub tenant_id: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<SecretString>,
    /// Azure cloud environment
    pub environment: String,
}

impl AzureEngineConfig {
    /// Replace the service-principal fields with values from a JSON file.
    ///
    /// The file takes over all four fields; flags set alongside it are
    /// ignored, matching the "alternate source" contract.
    pub fn apply_config_file(&mut self, path: &Path) -> Result<()> {
        let map = load_config_object(path)?;
        self.subscription_id = string_field(&map, "subscription_id");
        self.tenant_id = string_field(&map, "tenant_id");
        self.client_id = string_field(&map, "client_id");
        self.client_secret = string_field(&map, "client_secret").map(SecretString::new);
        Ok(())
    }

    /// Build the desired-state payload, validating required fields.
    ///
    /// The four SPN fields are required together; the error is raised
    /// before any remote call.
    pub fn desired_state(&self) -> Result<State> {
        let (subscription_id, tenant_id, client_id, client_secret) = match (
            &self.subscription_id,
            &self.tenant_id,
            &self.client_id,
            &self.client_secret,
        ) {
            (Some(s), Some(t), Some(c), Some(k)) => (s, t, c, k),
            _ => {
                return Err(VaultsmithError::config(
                    "subscription_id, tenant_id, client_id and client_secret are required \
                     together (flags or config file)",
                ))
            }
        };

        let mut desired = State::new();
        desired.insert("subscription_id".into(), Value::String(subscription_id.clone()));
        desired.insert("tenant_id".into(), Value::String(tenant_id.clone()));
        desired.insert("client_id".into(), Value::String(client_id.clone()));
        desired.insert(
            "client_secret".into(),
            Value::String(client_secret.expose_secret().to_string()),
        );
        desired.insert("environment".into(), Value::String(self.environment.clone()));
        Ok(desired)
    }
}

fn string_field(map: &State, key: &str) -> Option<String> {
    map.get(key).and_then(Value::as_str).map(str::to_string)
}

struct AzureEngineTarget<'a> {
    api: &'a VaultApi,
    mount_point: &'a str,
}

#[async_trait]
impl ConfigTarget for AzureEngineTarget<'_> {
    fn kind(&self) -> &'static str {
        "azure secret engine"
    }

    fn write_only_keys(&self) -> &'static [&'static str] {
        // Vault never returns the client secret from the config read.
        &["client_secret"]
    }

    async fn check_precondition(&self) -> Result<()> {
        if mount_enabled(self.api, "sys/mounts", self.mount_point).await? {
            Ok(())
        } else {
            Err(VaultsmithError::precondition("secret engine is not enabled"))
        }
    }

    async fn fetch_current(&self) -> Result<State> {
        let path = format!("{}/config", self.mount_point);
        match self.api.get_optional(&path).await? {
            Some(response) => Ok(data_object(&response)),
            None => Ok(State::new()),
        }
    }

    async fn apply(&self, desired: &State) -> Result<()> {
        let path = format!("{}/config", self.mount_point);
        self.api.post_json(&path, &Value::Object(desired.clone())).await?;
        Ok(())
    }
}

/// Reconcile the engine configuration toward `config`.
pub async fn run(api: &VaultApi, config: &AzureEngineConfig, check_mode: bool) -> Result<Report> {
    let desired = config.desired_state()?;
    let target =
        AzureEngineTarget { api, mount_point: config.mount_point.trim_end_matches('/') };
    reconcile(&target, &desired, check_mode).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn full_config() -> AzureEngineConfig {
        AzureEngineConfig {
            mount_point: "azure".to_string(),
            subscription_id: Some("1234".to_string()),
            tenant_id: Some("5689-1234".to_string()),
            client_id: Some("1012-1234".to_string()),
            client_secret: Some(SecretString::new("1314-1234")),
            environment: "AzurePublicCloud".to_string(),
        }
    }

    #[test]
    fn test_desired_state_fields() {
        let desired = full_config().desired_state().unwrap();
        assert_eq!(desired.get("subscription_id").unwrap(), "1234");
        assert_eq!(desired.get("tenant_id").unwrap(), "5689-1234");
        assert_eq!(desired.get("client_id").unwrap(), "1012-1234");
        assert_eq!(desired.get("client_secret").unwrap(), "1314-1234");
        assert_eq!(desired.get("environment").unwrap(), "AzurePublicCloud");
    }

    #[test]
    fn test_desired_state_requires_all_spn_fields() {
        let mut config = full_config();
        config.client_secret = None;
        let err = config.desired_state().unwrap_err();
        assert!(err.to_string().contains("required together"));
    }

    #[test]
    fn test_config_file_replaces_flag_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "subscription_id": "file-sub",
                "tenant_id": "file-tenant",
                "client_id": "file-client",
                "client_secret": "file-secret"
            }}"#
        )
        .unwrap();

        let mut config = full_config();
        config.apply_config_file(file.path()).unwrap();
        assert_eq!(config.subscription_id.as_deref(), Some("file-sub"));
        assert_eq!(config.client_secret.unwrap().expose_secret(), "file-secret");
    }

    #[test]
    fn test_config_file_missing_field_clears_flag_value() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"subscription_id": "file-sub"}}"#).unwrap();

        let mut config = full_config();
        config.apply_config_file(file.path()).unwrap();
        // File is the sole source once given; partial files fail validation.
        assert!(config.tenant_id.is_none());
        assert!(config.desired_state().is_err());
    }
}
