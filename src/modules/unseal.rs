//! Unseal key submission.
//!
//! A one-shot imperative action, not a declarative reconciliation: every
//! invocation submits the key shard and reports `changed=true`. Vault
//! accepts this call without a token, and the seal status from the
//! response is passed through for the caller.

use serde_json::json;

use crate::client::VaultApi;
use crate::config::SecretString;
use crate::errors::{Result, VaultsmithError};
use crate::reconcile::Report;

/// Fields of the seal status passed through in the report.
const STATUS_FIELDS: &[&str] = &["sealed", "t", "n", "progress"];

/// Submit one unseal key shard.
pub async fn run(api: &VaultApi, key: &SecretString) -> Result<Report> {
    if key.is_empty() {
        return Err(VaultsmithError::config("unseal key must not be empty"));
    }

    let status = api.put_json("sys/unseal", &json!({ "key": key.expose_secret() })).await?;

    let mut report = Report::ok(true);
    for field in STATUS_FIELDS {
        if let Some(value) = status.get(*field) {
            report.extra.insert((*field).to_string(), value.clone());
        }
    }

    if let Some(sealed) = status.get("sealed").and_then(serde_json::Value::as_bool) {
        tracing::info!(sealed, "unseal key accepted");
    }

    Ok(report)
}
