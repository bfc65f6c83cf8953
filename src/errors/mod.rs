//! Error types for vaultsmith operations.

mod types;

pub use types::{Result, VaultsmithError};
