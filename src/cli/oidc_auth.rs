//! `oidc-auth` command.

use clap::Args;

use crate::config::SecretString;
use crate::modules::oidc_auth::OidcAuthConfig;

/// Arguments for reconciling an OIDC auth method configuration.
#[derive(Args, Debug)]
pub struct OidcAuthArgs {
    /// Auth method mount point
    #[arg(long, default_value = "oidc")]
    pub mount_point: String,

    /// OIDC discovery URL, without any .well-known component
    #[arg(long)]
    pub oidc_discovery_url: Option<String>,

    /// OAuth client id from the provider
    #[arg(long)]
    pub oidc_client_id: Option<String>,

    /// OAuth client secret from the provider
    #[arg(long)]
    pub oidc_client_secret: Option<String>,

    /// Default role to use if none is provided during login
    #[arg(long)]
    pub default_role: Option<String>,

    /// Value to match against the iss claim
    #[arg(long, default_value = "")]
    pub bound_issuer: String,

    /// CA certificate chain (PEM) for validating connections to the JWKS URL
    #[arg(long, default_value = "")]
    pub jwks_ca_pem: String,

    /// JWKS URL to use to authenticate signatures
    #[arg(long)]
    pub jwks_url: Option<String>,

    /// Supported signing algorithms
    #[arg(long, value_delimiter = ',')]
    pub jwt_supported_algs: Vec<String>,

    /// PEM-encoded public keys for local signature validation
    #[arg(long)]
    pub jwt_validation_pubkeys: Vec<String>,

    /// CA certificate chain (PEM) for validating the discovery URL connection
    #[arg(long, default_value = "")]
    pub oidc_discovery_ca_pem: String,
}

impl OidcAuthArgs {
    pub fn into_config(self) -> OidcAuthConfig {
        OidcAuthConfig {
            mount_point: self.mount_point,
            oidc_discovery_url: self.oidc_discovery_url,
            oidc_client_id: self.oidc_client_id,
            oidc_client_secret: self.oidc_client_secret.map(SecretString::new),
            default_role: self.default_role,
            bound_issuer: self.bound_issuer,
            jwks_ca_pem: self.jwks_ca_pem,
            jwks_url: self.jwks_url,
            jwt_supported_algs: self.jwt_supported_algs,
            jwt_validation_pubkeys: self.jwt_validation_pubkeys,
            oidc_discovery_ca_pem: self.oidc_discovery_ca_pem,
        }
    }
}
