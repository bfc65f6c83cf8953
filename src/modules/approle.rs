//! AppRole secret-id listing.
//!
//! Read-only: lists the secret-id accessors of a role and passes them
//! through in the report. A role with no secret ids answers 404, which is
//! an empty list rather than a failure.

use serde_json::Value;

use crate::client::VaultApi;
use crate::errors::Result;
use crate::modules::data_object;
use crate::reconcile::Report;

/// List secret-id accessors for `name` under the given mount.
pub async fn list_secret_ids(api: &VaultApi, mount_point: &str, name: &str) -> Result<Report> {
    let path = format!("auth/{}/role/{}/secret-id", mount_point.trim_end_matches('/'), name);

    let keys = match api.list_optional(&path).await? {
        Some(response) => data_object(&response)
            .get("keys")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default(),
        None => Vec::new(),
    };

    tracing::debug!(role = name, count = keys.len(), "listed approle secret ids");
    Ok(Report::ok(false).with_value("secrets", Value::Array(keys)))
}
