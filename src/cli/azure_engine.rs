//! `azure-engine` command.

use clap::Args;
use std::path::PathBuf;

use crate::config::SecretString;
use crate::errors::Result;
use crate::modules::azure_engine::AzureEngineConfig;

/// Arguments for reconciling the Azure secret engine configuration.
#[derive(Args, Debug)]
pub struct AzureEngineArgs {
    /// Secret engine mount point
    #[arg(long, default_value = "azure")]
    pub mount_point: String,

    /// Azure SPN subscription id
    #[arg(long)]
    pub subscription_id: Option<String>,

    /// Azure SPN tenant id
    #[arg(long)]
    pub tenant_id: Option<String>,

    /// Azure SPN client id
    #[arg(long)]
    pub client_id: Option<String>,

    /// Azure SPN client secret
    #[arg(long)]
    pub client_secret: Option<String>,

    /// Azure cloud environment
    #[arg(long, default_value = "AzurePublicCloud")]
    pub environment: String,

    /// JSON file supplying the SPN fields, replacing the individual flags
    #[arg(long)]
    pub config_file: Option<PathBuf>,
}

impl AzureEngineArgs {
    /// Build the module configuration, loading the config file if given.
    pub fn into_config(self) -> Result<AzureEngineConfig> {
        let mut config = AzureEngineConfig {
            mount_point: self.mount_point,
            subscription_id: self.subscription_id,
            tenant_id: self.tenant_id,
            client_id: self.client_id,
            client_secret: self.client_secret.map(SecretString::new),
            environment: self.environment,
        };

        if let Some(path) = &self.config_file {
            config.apply_config_file(path)?;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_config_from_flags() {
        let args = AzureEngineArgs {
            mount_point: "azure".to_string(),
            subscription_id: Some("1234".to_string()),
            tenant_id: Some("5689-1234".to_string()),
            client_id: Some("1012-1234".to_string()),
            client_secret: Some("1314-1234".to_string()),
            environment: "AzurePublicCloud".to_string(),
            config_file: None,
        };

        let config = args.into_config().unwrap();
        assert_eq!(config.subscription_id.as_deref(), Some("1234"));
        assert!(config.desired_state().is_ok());
    }
}
