//! HTTP client for the Vault API.
//!
//! Wraps `reqwest` with the base-URL joining, authentication headers, and
//! TLS trust configuration every reconciler needs, plus JSON helpers that
//! distinguish 404 from other failures. Vault's list endpoints use the
//! non-standard `LIST` method, which is built here as well.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde_json::Value;
use tracing::{debug, trace};

use crate::config::{SecretString, VaultSettings};
use crate::errors::{Result, VaultsmithError};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Authenticated HTTP client for the Vault `/v1/` API.
#[derive(Debug)]
pub struct VaultApi {
    client: Client,
    address: String,
    token: SecretString,
    namespace: Option<String>,
}

impl VaultApi {
    /// Create a client from connection settings and a resolved token.
    ///
    /// The token may be empty for endpoints that accept unauthenticated
    /// calls (`sys/unseal`).
    pub fn new(settings: &VaultSettings, token: SecretString) -> Result<Self> {
        let mut builder = Client::builder().timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        if !settings.verify {
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(ca_cert) = &settings.ca_cert {
            builder = builder.add_root_certificate(read_certificate(ca_cert)?);
        } else if let Some(ca_path) = &settings.ca_path {
            // ca_cert takes precedence over ca_path when both are set.
            for cert in read_certificate_dir(ca_path)? {
                builder = builder.add_root_certificate(cert);
            }
        }

        if let (Some(cert), Some(key)) = (&settings.client_cert, &settings.client_key) {
            builder = builder.identity(read_identity(cert, key)?);
        }

        let client = builder
            .build()
            .map_err(|e| VaultsmithError::connection(e, "failed to build HTTP client"))?;

        Ok(Self {
            client,
            address: settings.address.trim_end_matches('/').to_string(),
            token,
            namespace: settings.namespace.clone(),
        })
    }

    /// Base address this client talks to.
    pub fn address(&self) -> &str {
        &self.address
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/v1/{}", self.address, path);
        debug!(%method, %url, "vault api request");

        let mut request = self.client.request(method, &url);
        if !self.token.is_empty() {
            request = request.header("X-Vault-Token", self.token.expose_secret());
        }
        if let Some(namespace) = &self.namespace {
            request = request.header("X-Vault-Namespace", namespace);
        }
        request
    }

    /// Send a GET request and deserialize the JSON response.
    pub async fn get_json(&self, path: &str) -> Result<Value> {
        let response = self.send(self.request(Method::GET, path), "GET", path).await?;
        handle_response(response, path).await
    }

    /// Send a GET request, treating 404 as "no resource" rather than an error.
    pub async fn get_optional(&self, path: &str) -> Result<Option<Value>> {
        let response = self.send(self.request(Method::GET, path), "GET", path).await?;
        handle_optional_response(response, path).await
    }

    /// Send a POST request with a JSON body.
    ///
    /// Vault's config-write endpoints answer 204 with an empty body; the
    /// returned value is `Null` in that case.
    pub async fn post_json(&self, path: &str, body: &Value) -> Result<Value> {
        trace!(%path, "write payload prepared");
        let request = self.request(Method::POST, path).json(body);
        let response = self.send(request, "POST", path).await?;
        handle_response(response, path).await
    }

    /// Send a PUT request with a JSON body.
    pub async fn put_json(&self, path: &str, body: &Value) -> Result<Value> {
        let request = self.request(Method::PUT, path).json(body);
        let response = self.send(request, "PUT", path).await?;
        handle_response(response, path).await
    }

    /// Send a LIST request, treating 404 as an empty listing.
    pub async fn list_optional(&self, path: &str) -> Result<Option<Value>> {
        let method = Method::from_bytes(b"LIST")
            .map_err(|_| VaultsmithError::config("invalid LIST method"))?;
        let response = self.send(self.request(method, path), "LIST", path).await?;
        handle_optional_response(response, path).await
    }

    async fn send(&self, request: RequestBuilder, method: &str, path: &str) -> Result<Response> {
        request
            .send()
            .await
            .map_err(|e| VaultsmithError::connection(e, format!("{} {}", method, path)))
    }
}

async fn handle_response(response: Response, path: &str) -> Result<Value> {
    let status = response.status();
    debug!(%status, %path, "vault api response");

    if !status.is_success() {
        let body = response.text().await.unwrap_or_else(|_| "<unable to read body>".to_string());
        return Err(VaultsmithError::api(status.as_u16(), path, body));
    }

    let body = response
        .text()
        .await
        .map_err(|e| VaultsmithError::connection(e, format!("reading response from {}", path)))?;

    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&body).map_err(VaultsmithError::from)
}

async fn handle_optional_response(response: Response, path: &str) -> Result<Option<Value>> {
    if response.status() == reqwest::StatusCode::NOT_FOUND {
        debug!(%path, "vault api returned 404");
        return Ok(None);
    }
    handle_response(response, path).await.map(Some)
}

fn read_certificate(path: &str) -> Result<reqwest::Certificate> {
    let pem = std::fs::read(path)
        .map_err(|e| VaultsmithError::io(e, format!("failed to read CA certificate {}", path)))?;
    reqwest::Certificate::from_pem(&pem)
        .map_err(|e| VaultsmithError::connection(e, format!("invalid CA certificate {}", path)))
}

fn read_certificate_dir(path: &str) -> Result<Vec<reqwest::Certificate>> {
    let entries = std::fs::read_dir(path)
        .map_err(|e| VaultsmithError::io(e, format!("failed to read CA directory {}", path)))?;

    let mut certs = Vec::new();
    for entry in entries {
        let entry =
            entry.map_err(|e| VaultsmithError::io(e, format!("failed to read CA directory {}", path)))?;
        let file = entry.path();
        let is_pem = file
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| matches!(ext, "pem" | "crt" | "cer"))
            .unwrap_or(false);
        if is_pem {
            certs.push(read_certificate(&file.to_string_lossy())?);
        }
    }
    Ok(certs)
}

fn read_identity(cert_path: &str, key_path: &str) -> Result<reqwest::Identity> {
    let mut pem = std::fs::read(cert_path).map_err(|e| {
        VaultsmithError::io(e, format!("failed to read client certificate {}", cert_path))
    })?;
    let key = std::fs::read(key_path)
        .map_err(|e| VaultsmithError::io(e, format!("failed to read client key {}", key_path)))?;
    pem.extend_from_slice(&key);

    reqwest::Identity::from_pem(&pem).map_err(|e| {
        VaultsmithError::connection(e, format!("invalid client identity {}", cert_path))
    })
}
