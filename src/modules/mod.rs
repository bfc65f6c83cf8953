//! Per-operation reconcilers.
//!
//! One file per Vault subsystem, each a thin instantiation of the
//! check-then-apply pattern from [`crate::reconcile`] with its own field
//! names and read/write endpoints. `azure_engine` and `oidc_auth` are
//! declarative; `unseal` is a one-shot imperative action; `approle` is
//! read-only.

pub mod approle;
pub mod azure_engine;
pub mod oidc_auth;
pub mod unseal;

use serde_json::Value;

use crate::client::VaultApi;
use crate::errors::Result;
use crate::reconcile::State;

/// Extract the `data` object from a Vault response, or an empty map.
pub(crate) fn data_object(value: &Value) -> State {
    value.get("data").and_then(Value::as_object).cloned().unwrap_or_default()
}

/// Whether `mount` appears in a sys listing (`sys/mounts` or `sys/auth`).
///
/// Vault lists mounts with a trailing slash. Newer servers nest the
/// listing under `data`, older ones return it at the top level; both
/// shapes are accepted.
pub(crate) async fn mount_enabled(api: &VaultApi, listing_path: &str, mount: &str) -> Result<bool> {
    let listing = api.get_json(listing_path).await?;
    let key = format!("{}/", mount);

    if data_object(&listing).contains_key(&key) {
        return Ok(true);
    }
    Ok(listing.as_object().map(|top| top.contains_key(&key)).unwrap_or(false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_data_object_extraction() {
        let value = json!({"data": {"tenant_id": "5689-1234"}, "lease_id": ""});
        let data = data_object(&value);
        assert_eq!(data.get("tenant_id").unwrap(), "5689-1234");
    }

    #[test]
    fn test_data_object_missing_is_empty() {
        assert!(data_object(&json!({"lease_id": ""})).is_empty());
        assert!(data_object(&json!(null)).is_empty());
    }
}
