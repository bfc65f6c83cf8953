//! Auth-method login.
//!
//! Exchanges the configured credentials for a Vault client token using
//! `vaultrs`. Token auth short-circuits; userpass, ldap, and approle
//! perform a login call against the method's default mount.

use vaultrs::client::{VaultClient, VaultClientSettingsBuilder};

use crate::config::{AuthMethod, SecretString, VaultSettings};
use crate::errors::{Result, VaultsmithError};

/// Resolve a client token for the configured auth method.
pub async fn login(settings: &VaultSettings) -> Result<SecretString> {
    match settings.auth_method {
        AuthMethod::Token => {
            tracing::debug!("using pre-issued token");
            Ok(settings.token.clone())
        }
        AuthMethod::Userpass => {
            require(&settings.username, "username is required for userpass auth")?;
            let client = build_login_client(settings)?;
            let auth = vaultrs::auth::userpass::login(
                &client,
                "userpass",
                &settings.username,
                settings.password.expose_secret(),
            )
            .await
            .map_err(|e| VaultsmithError::auth(format!("userpass login failed: {}", e)))?;
            tracing::debug!(username = %settings.username, "userpass login succeeded");
            Ok(SecretString::new(auth.client_token))
        }
        AuthMethod::Ldap => {
            require(&settings.username, "username is required for ldap auth")?;
            let client = build_login_client(settings)?;
            // vaultrs has no dedicated ldap module; the LDAP login endpoint
            // (POST /auth/{mount}/login/{username} with {"password"}) is
            // wire-identical to userpass, so reuse it against the ldap mount.
            let auth = vaultrs::auth::userpass::login(
                &client,
                "ldap",
                &settings.username,
                settings.password.expose_secret(),
            )
            .await
            .map_err(|e| VaultsmithError::auth(format!("ldap login failed: {}", e)))?;
            Ok(SecretString::new(auth.client_token))
        }
        AuthMethod::AppRole => {
            require(&settings.role_id, "role id is required for approle auth")?;
            let client = build_login_client(settings)?;
            let auth = vaultrs::auth::approle::login(
                &client,
                "approle",
                &settings.role_id,
                settings.secret_id.expose_secret(),
            )
            .await
            .map_err(|e| VaultsmithError::auth(format!("approle login failed: {}", e)))?;
            Ok(SecretString::new(auth.client_token))
        }
    }
}

fn require(value: &str, message: &str) -> Result<()> {
    if value.is_empty() {
        return Err(VaultsmithError::config(message));
    }
    Ok(())
}

fn build_login_client(settings: &VaultSettings) -> Result<VaultClient> {
    let mut settings_builder = VaultClientSettingsBuilder::default();
    settings_builder.address(&settings.address);
    settings_builder.verify(settings.verify);

    if let Some(namespace) = &settings.namespace {
        settings_builder.namespace(Some(namespace.clone()));
    }
    if let Some(ca_cert) = &settings.ca_cert {
        settings_builder.ca_certs(vec![ca_cert.clone()]);
    }

    let vault_settings = settings_builder
        .build()
        .map_err(|e| VaultsmithError::config(format!("invalid Vault client configuration: {}", e)))?;

    VaultClient::new(vault_settings)
        .map_err(|e| VaultsmithError::auth(format!("failed to create Vault client: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_token_auth_returns_configured_token() {
        let settings = VaultSettings {
            token: SecretString::new("hvs.abc"),
            ..VaultSettings::default()
        };
        let token = login(&settings).await.unwrap();
        assert_eq!(token.expose_secret(), "hvs.abc");
    }

    #[tokio::test]
    async fn test_userpass_requires_username() {
        let settings = VaultSettings {
            auth_method: AuthMethod::Userpass,
            ..VaultSettings::default()
        };
        let err = login(&settings).await.unwrap_err();
        assert!(matches!(err, VaultsmithError::Config { .. }));
        assert!(err.to_string().contains("username is required"));
    }

    #[tokio::test]
    async fn test_approle_requires_role_id() {
        let settings = VaultSettings {
            auth_method: AuthMethod::AppRole,
            ..VaultSettings::default()
        };
        let err = login(&settings).await.unwrap_err();
        assert!(err.to_string().contains("role id is required"));
    }
}
