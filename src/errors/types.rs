//! # Error Types
//!
//! Error taxonomy for Vault reconciliation runs, using `thiserror`.
//!
//! Three families matter to callers: precondition failures (the target
//! subsystem is not mounted or enabled, terminal for the invocation),
//! remote call failures (network, auth, or a non-2xx Vault response), and
//! malformed local input (settings or a desired-state file). None of them
//! are retried; every error terminates the single invocation and surfaces
//! in the result report.

/// Custom result type for vaultsmith operations
pub type Result<T> = std::result::Result<T, VaultsmithError>;

/// Main error type for vaultsmith
#[derive(thiserror::Error, Debug)]
pub enum VaultsmithError {
    /// Configuration errors (settings, flags, desired-state files)
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A precondition on the remote server does not hold.
    ///
    /// Displays as the bare message so the result report carries exactly
    /// the text the caller matches on (e.g. "secret engine is not enabled").
    #[error("{message}")]
    Precondition { message: String },

    /// Authentication against Vault failed
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    /// The HTTP request could not be sent or completed
    #[error("Request to Vault failed: {context}")]
    Connection {
        #[source]
        source: reqwest::Error,
        context: String,
    },

    /// Vault answered with a non-success status
    #[error("Vault returned status {status} for {path}: {body}")]
    Api { status: u16, path: String, body: String },

    /// I/O errors with additional context
    #[error("I/O error: {context}")]
    Io {
        #[source]
        source: std::io::Error,
        context: String,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {context}")]
    Serialization {
        #[source]
        source: serde_json::Error,
        context: String,
    },
}

impl VaultsmithError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into() }
    }

    /// Create a precondition failure
    pub fn precondition<S: Into<String>>(message: S) -> Self {
        Self::Precondition { message: message.into() }
    }

    /// Create an authentication error
    pub fn auth<S: Into<String>>(message: S) -> Self {
        Self::Auth { message: message.into() }
    }

    /// Create an API error from a Vault response
    pub fn api<P: Into<String>, B: Into<String>>(status: u16, path: P, body: B) -> Self {
        Self::Api { status, path: path.into(), body: body.into() }
    }

    /// Create a connection error with request context
    pub fn connection<S: Into<String>>(source: reqwest::Error, context: S) -> Self {
        Self::Connection { source, context: context.into() }
    }

    /// Create an I/O error with context
    pub fn io<S: Into<String>>(source: std::io::Error, context: S) -> Self {
        Self::Io { source, context: context.into() }
    }

    /// Exit code reported to the invoking host when this error fails a run
    pub fn rc(&self) -> i32 {
        1
    }
}

// Error conversions for common external error types
impl From<std::io::Error> for VaultsmithError {
    fn from(error: std::io::Error) -> Self {
        Self::Io { source: error, context: "I/O operation failed".to_string() }
    }
}

impl From<serde_json::Error> for VaultsmithError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization { source: error, context: "JSON serialization failed".to_string() }
    }
}

impl From<reqwest::Error> for VaultsmithError {
    fn from(error: reqwest::Error) -> Self {
        Self::Connection { source: error, context: "HTTP request failed".to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let error = VaultsmithError::config("missing mount point");
        assert!(matches!(error, VaultsmithError::Config { .. }));
        assert_eq!(error.to_string(), "Configuration error: missing mount point");
    }

    #[test]
    fn test_precondition_displays_bare_message() {
        let error = VaultsmithError::precondition("secret engine is not enabled");
        assert_eq!(error.to_string(), "secret engine is not enabled");
    }

    #[test]
    fn test_api_error_display() {
        let error = VaultsmithError::api(403, "azure/config", "permission denied");
        let rendered = error.to_string();
        assert!(rendered.contains("403"));
        assert!(rendered.contains("azure/config"));
        assert!(rendered.contains("permission denied"));
    }

    #[test]
    fn test_error_conversions() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: VaultsmithError = io_error.into();
        assert!(matches!(error, VaultsmithError::Io { .. }));

        let json_error = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let error: VaultsmithError = json_error.into();
        assert!(matches!(error, VaultsmithError::Serialization { .. }));
    }

    #[test]
    fn test_exit_code_mapping() {
        assert_eq!(VaultsmithError::precondition("x").rc(), 1);
        assert_eq!(VaultsmithError::auth("x").rc(), 1);
        assert_eq!(VaultsmithError::config("x").rc(), 1);
    }
}
