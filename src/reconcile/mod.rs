//! Check-then-apply reconciliation.
//!
//! The one recurring pattern of this tool: given a desired configuration
//! and a handle to a remote target, decide whether the target already
//! satisfies the configuration and, if not, issue a single write to bring
//! it there. Invocations are stateless; idempotence comes entirely from
//! the comparison.
//!
//! The comparison is deliberately asymmetric. Only keys present in the
//! desired state are compared; extra keys in the current state are
//! ignored. Desired is a "wanted subset", not a full replacement, so a
//! superset-compatible current state counts as already satisfied. Do not
//! replace this with full equality.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::errors::{Result, VaultsmithError};

/// Desired or current configuration: a flat map of field name to value.
pub type State = Map<String, Value>;

/// Result record for one invocation, consumed by the calling host.
///
/// Serializes as `{changed, failed, msg?, rc?}` plus any pass-through
/// fields an operation attaches (seal status, listed accessors).
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Report {
    /// Whether a change occurred (or would occur, in check mode)
    pub changed: bool,

    /// Whether the invocation failed
    pub failed: bool,

    /// Human-readable failure description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,

    /// Exit code reported to the invoking host
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rc: Option<i32>,

    /// Operation-specific pass-through fields
    #[serde(flatten)]
    pub extra: State,
}

impl Report {
    /// Successful invocation with the given changed flag.
    pub fn ok(changed: bool) -> Self {
        Self { changed, failed: false, msg: None, rc: Some(0), extra: State::new() }
    }

    /// Failed invocation with a descriptive message and non-zero exit code.
    pub fn failure(msg: impl Into<String>) -> Self {
        Self { changed: false, failed: true, msg: Some(msg.into()), rc: Some(1), extra: State::new() }
    }

    /// Attach a pass-through field.
    pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Collapse a module run into the report envelope.
    ///
    /// Every error surfaces as a structured failure; nothing is swallowed
    /// or downgraded to a warning.
    pub fn from_run(result: Result<Report>) -> Self {
        match result {
            Ok(report) => report,
            Err(err) => {
                warn!(error = %err, "module run failed");
                Self { rc: Some(err.rc()), ..Self::failure(err.to_string()) }
            }
        }
    }
}

/// True iff every key of `desired` is present in `current` with an equal
/// value. Extra keys in `current` never affect the result.
pub fn satisfied_by(desired: &State, current: &State) -> bool {
    desired.iter().all(|(key, value)| current.get(key) == Some(value))
}

/// A remote resource that can be reconciled toward a desired state.
///
/// Implementations are thin: one read call, one write call, and an
/// optional precondition on the remote subsystem. The reconciler owns the
/// comparison and the decision to write.
#[async_trait]
pub trait ConfigTarget {
    /// Short label for logs.
    fn kind(&self) -> &'static str;

    /// Keys sent on write but never echoed back by the server (secrets).
    /// Excluded from the comparison so runs converge.
    fn write_only_keys(&self) -> &'static [&'static str] {
        &[]
    }

    /// Verify the remote subsystem is ready to accept this configuration.
    ///
    /// Return [`VaultsmithError::Precondition`] for the terminal
    /// "not enabled" case; any other error propagates as a remote failure.
    async fn check_precondition(&self) -> Result<()> {
        Ok(())
    }

    /// Fetch the current configuration. Absent configuration is an empty map.
    async fn fetch_current(&self) -> Result<State>;

    /// Write the desired configuration.
    async fn apply(&self, desired: &State) -> Result<()>;
}

/// Reconcile `target` toward `desired`.
///
/// Precondition failures produce a failed report without touching the
/// target further. In check mode the report still says whether a change
/// would occur, but no write happens.
pub async fn reconcile<T>(target: &T, desired: &State, check_mode: bool) -> Result<Report>
where
    T: ConfigTarget + Sync,
{
    if let Err(err) = target.check_precondition().await {
        return match err {
            VaultsmithError::Precondition { message } => {
                warn!(target_kind = target.kind(), %message, "precondition not met");
                Ok(Report::failure(message))
            }
            other => Err(other),
        };
    }

    let current = target.fetch_current().await?;

    let mut comparable = desired.clone();
    for key in target.write_only_keys() {
        comparable.remove(*key);
    }
    let changed = !satisfied_by(&comparable, &current);

    if changed && !check_mode {
        target.apply(desired).await?;
        info!(target_kind = target.kind(), "configuration updated");
    } else if changed {
        info!(target_kind = target.kind(), "change required, skipped in check mode");
    } else {
        debug!(target_kind = target.kind(), "already in desired state");
    }

    Ok(Report::ok(changed))
}
