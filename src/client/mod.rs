//! Vault client construction.
//!
//! Two layers: [`auth::login`] exchanges configured credentials for a
//! client token via `vaultrs`, and [`VaultApi`] is a thin `reqwest`-based
//! client for the `/v1/` API endpoints the reconcilers touch. One client
//! is built per invocation and never shared across invocations.

mod auth;
mod http;

pub use auth::login;
pub use http::VaultApi;

use crate::config::VaultSettings;
use crate::errors::Result;

/// Build an authenticated API client from settings.
///
/// Performs the auth-method login first, then constructs the HTTP client
/// carrying the resulting token.
pub async fn authenticated_api(settings: &VaultSettings) -> Result<VaultApi> {
    let token = login(settings).await?;
    VaultApi::new(settings, token)
}
