//! Vault connection settings.
//!
//! Field defaults mirror the standard Vault client environment variables
//! (`VAULT_ADDR`, `VAULT_TOKEN`, `VAULT_CACERT`, ...) so the tool drops
//! into environments already configured for the Vault CLI. The token
//! additionally falls back to the `~/.vault-token` file the Vault CLI
//! writes on login.

use std::path::PathBuf;
use std::str::FromStr;

use crate::config::SecretString;
use crate::errors::{Result, VaultsmithError};

/// How to authenticate against Vault before issuing API calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMethod {
    /// Use a pre-issued client token directly
    #[default]
    Token,
    /// Username/password login against the userpass auth method
    Userpass,
    /// Username/password login against the LDAP auth method
    Ldap,
    /// Role-id/secret-id login against the AppRole auth method
    AppRole,
}

impl FromStr for AuthMethod {
    type Err = VaultsmithError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "token" => Ok(AuthMethod::Token),
            "userpass" => Ok(AuthMethod::Userpass),
            "ldap" => Ok(AuthMethod::Ldap),
            "approle" => Ok(AuthMethod::AppRole),
            other => Err(VaultsmithError::config(format!(
                "unsupported auth method '{}', expected token, userpass, ldap or approle",
                other
            ))),
        }
    }
}

impl std::fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthMethod::Token => write!(f, "token"),
            AuthMethod::Userpass => write!(f, "userpass"),
            AuthMethod::Ldap => write!(f, "ldap"),
            AuthMethod::AppRole => write!(f, "approle"),
        }
    }
}

/// Connection and authentication settings for one invocation.
#[derive(Debug, Clone)]
pub struct VaultSettings {
    /// Vault server address (e.g. "https://vault.example.com:8200")
    pub address: String,

    /// Path to a PEM-encoded CA certificate file used to verify the server
    pub ca_cert: Option<String>,

    /// Path to a directory of PEM-encoded CA certificate files
    pub ca_path: Option<String>,

    /// Path to a PEM-encoded client certificate for TLS authentication
    pub client_cert: Option<String>,

    /// Path to the unencrypted private key matching the client certificate
    pub client_key: Option<String>,

    /// Whether to verify the server TLS certificate
    pub verify: bool,

    /// Authentication method used to obtain a client token
    pub auth_method: AuthMethod,

    /// Pre-issued client token (token auth)
    pub token: SecretString,

    /// Username for userpass/ldap login
    pub username: String,

    /// Password for userpass/ldap login
    pub password: SecretString,

    /// Role id for approle login
    pub role_id: String,

    /// Secret id for approle login
    pub secret_id: SecretString,

    /// Vault Enterprise namespace
    pub namespace: Option<String>,
}

impl Default for VaultSettings {
    fn default() -> Self {
        Self {
            address: "http://127.0.0.1:8200".to_string(),
            ca_cert: None,
            ca_path: None,
            client_cert: None,
            client_key: None,
            verify: true,
            auth_method: AuthMethod::Token,
            token: SecretString::default(),
            username: String::new(),
            password: SecretString::default(),
            role_id: String::new(),
            secret_id: SecretString::default(),
            namespace: None,
        }
    }
}

impl VaultSettings {
    /// Build settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build settings from an arbitrary variable lookup.
    ///
    /// Separated from [`VaultSettings::from_env`] so tests can supply a
    /// fixed variable map instead of mutating the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let auth_method = match non_empty(lookup("VAULT_AUTHTYPE")) {
            Some(raw) => raw.parse()?,
            None => AuthMethod::Token,
        };

        // VAULT_SKIP_VERIFY set to any non-empty value disables verification.
        let verify = non_empty(lookup("VAULT_SKIP_VERIFY")).is_none();

        Ok(Self {
            address: non_empty(lookup("VAULT_ADDR")).unwrap_or(defaults.address),
            ca_cert: non_empty(lookup("VAULT_CACERT")),
            ca_path: non_empty(lookup("VAULT_CAPATH")),
            client_cert: non_empty(lookup("VAULT_CLIENT_CERT")),
            client_key: non_empty(lookup("VAULT_CLIENT_KEY")),
            verify,
            auth_method,
            token: default_token(&lookup),
            username: non_empty(lookup("VAULT_USER")).unwrap_or_default(),
            password: non_empty(lookup("VAULT_PASSWORD")).map(SecretString::new).unwrap_or_default(),
            role_id: non_empty(lookup("VAULT_ROLE_ID")).unwrap_or_default(),
            secret_id: non_empty(lookup("VAULT_SECRET_ID")).map(SecretString::new).unwrap_or_default(),
            namespace: non_empty(lookup("VAULT_NAMESPACE")),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Resolve the default token: `VAULT_TOKEN`, then the `~/.vault-token`
/// file the Vault CLI leaves behind, then empty.
fn default_token<F>(lookup: &F) -> SecretString
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(token) = non_empty(lookup("VAULT_TOKEN")) {
        return SecretString::new(token);
    }

    if let Some(home) = non_empty(lookup("HOME")).or_else(|| non_empty(lookup("USERPROFILE"))) {
        let mut path = PathBuf::from(home);
        path.push(".vault-token");
        if let Ok(contents) = std::fs::read_to_string(&path) {
            let token = contents.trim();
            if !token.is_empty() {
                tracing::debug!(path = %path.display(), "using token from vault token file");
                return SecretString::new(token);
            }
        }
    }

    SecretString::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let settings = VaultSettings::from_lookup(|_| None).unwrap();
        assert_eq!(settings.address, "http://127.0.0.1:8200");
        assert!(settings.verify);
        assert_eq!(settings.auth_method, AuthMethod::Token);
        assert!(settings.token.is_empty());
        assert!(settings.namespace.is_none());
    }

    #[test]
    fn test_environment_fallback() {
        let lookup = lookup_from(&[
            ("VAULT_ADDR", "https://vault.example.com:8200"),
            ("VAULT_TOKEN", "hvs.abc"),
            ("VAULT_NAMESPACE", "team-a"),
            ("VAULT_CACERT", "/etc/ssl/vault-ca.pem"),
        ]);

        let settings = VaultSettings::from_lookup(lookup).unwrap();
        assert_eq!(settings.address, "https://vault.example.com:8200");
        assert_eq!(settings.token.expose_secret(), "hvs.abc");
        assert_eq!(settings.namespace.as_deref(), Some("team-a"));
        assert_eq!(settings.ca_cert.as_deref(), Some("/etc/ssl/vault-ca.pem"));
    }

    #[test]
    fn test_skip_verify_variable() {
        let settings =
            VaultSettings::from_lookup(lookup_from(&[("VAULT_SKIP_VERIFY", "1")])).unwrap();
        assert!(!settings.verify);

        // An empty value does not disable verification.
        let settings =
            VaultSettings::from_lookup(lookup_from(&[("VAULT_SKIP_VERIFY", "")])).unwrap();
        assert!(settings.verify);
    }

    #[test]
    fn test_auth_method_from_environment() {
        let settings = VaultSettings::from_lookup(lookup_from(&[
            ("VAULT_AUTHTYPE", "approle"),
            ("VAULT_ROLE_ID", "role-1"),
            ("VAULT_SECRET_ID", "secret-1"),
        ]))
        .unwrap();
        assert_eq!(settings.auth_method, AuthMethod::AppRole);
        assert_eq!(settings.role_id, "role-1");
        assert_eq!(settings.secret_id.expose_secret(), "secret-1");

        let err = VaultSettings::from_lookup(lookup_from(&[("VAULT_AUTHTYPE", "github")]))
            .unwrap_err();
        assert!(err.to_string().contains("unsupported auth method"));
    }

    #[test]
    fn test_token_file_fallback() {
        let home = tempfile::TempDir::new().unwrap();
        let token_path = home.path().join(".vault-token");
        let mut file = std::fs::File::create(&token_path).unwrap();
        writeln!(file, "hvs.from-file  ").unwrap();

        let home_str = home.path().to_str().unwrap().to_string();
        let settings =
            VaultSettings::from_lookup(lookup_from(&[("HOME", home_str.as_str())])).unwrap();
        assert_eq!(settings.token.expose_secret(), "hvs.from-file");
    }

    #[test]
    fn test_explicit_token_wins_over_file() {
        let home = tempfile::TempDir::new().unwrap();
        std::fs::write(home.path().join(".vault-token"), "hvs.from-file").unwrap();

        let home_str = home.path().to_str().unwrap().to_string();
        let settings = VaultSettings::from_lookup(lookup_from(&[
            ("HOME", home_str.as_str()),
            ("VAULT_TOKEN", "hvs.explicit"),
        ]))
        .unwrap();
        assert_eq!(settings.token.expose_secret(), "hvs.explicit");
    }

    #[test]
    fn test_auth_method_parsing() {
        assert_eq!("token".parse::<AuthMethod>().unwrap(), AuthMethod::Token);
        assert_eq!("Userpass".parse::<AuthMethod>().unwrap(), AuthMethod::Userpass);
        assert_eq!("LDAP".parse::<AuthMethod>().unwrap(), AuthMethod::Ldap);
        assert_eq!("approle".parse::<AuthMethod>().unwrap(), AuthMethod::AppRole);
        assert!("aws".parse::<AuthMethod>().is_err());
    }

    #[test]
    fn test_auth_method_display() {
        assert_eq!(AuthMethod::Token.to_string(), "token");
        assert_eq!(AuthMethod::AppRole.to_string(), "approle");
    }
}
