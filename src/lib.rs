//! # Vaultsmith
//!
//! Idempotent configuration reconcilers for HashiCorp Vault. Each
//! subcommand performs a single state-reconciliation pass against a
//! Vault server: read the current configuration, compare it to the
//! desired configuration, and apply the desired configuration if (and
//! only if) it is not already satisfied.
//!
//! ## Architecture
//!
//! ```text
//! CLI (clap) → VaultSettings (flag → env → default)
//!            → login (vaultrs) → VaultApi (reqwest)
//!            → reconcile(ConfigTarget) → Report {changed, failed, msg?, rc?}
//! ```
//!
//! The comparison policy is a "wanted subset": a current state that
//! carries extra fields still satisfies the desired state as long as
//! every desired key is present with an equal value. See
//! [`reconcile::satisfied_by`].
//!
//! Every invocation is stateless. Running the same desired state twice
//! yields `changed=true` then `changed=false`.

pub mod cli;
pub mod client;
pub mod config;
pub mod errors;
pub mod modules;
pub mod reconcile;

// Re-export commonly used types
pub use config::{SecretString, VaultSettings};
pub use errors::{Result, VaultsmithError};
pub use reconcile::{reconcile, ConfigTarget, Report};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
