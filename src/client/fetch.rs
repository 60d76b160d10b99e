//! Main Canopy store client.
//!
//! Provides the primary [`CanopyClient`] for reading and writing the store's
//! JSON tree.

use crate::client::config::ClientConfig;
use crate::client::credentials::{CredentialManager, HttpTokenIssuer};
use crate::client::native_network::NativeNetwork;
use crate::client::utils;
use crate::error::{CanopyError, Result};
use crate::traits::{CanopyNetwork, TokenIssuer};
use crate::types::{CanopyRequest, CanopyResponse, ServiceAccountKey};
use serde_json::Value;
use std::sync::Arc;
use url::Url;

/// The main store client.
///
/// Cheap to clone; clones share the transport pool and credential state.
#[derive(Clone)]
pub struct CanopyClient {
    network: Arc<dyn CanopyNetwork>,
    credentials: Arc<CredentialManager>,
    config: Arc<ClientConfig>,
    base_url: Url,
}

impl std::fmt::Debug for CanopyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanopyClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl CanopyClient {
    /// Unauthenticated client with default configuration.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_config(base_url, ClientConfig::default())
    }

    pub fn with_config(base_url: &str, config: ClientConfig) -> Result<Self> {
        let http = build_http_client(&config)?;
        Self::assemble(
            base_url,
            Arc::new(NativeNetwork::new(http)),
            CredentialManager::unauthenticated(),
            config,
        )
    }

    /// Client authenticated with a static secret, sent as an `auth` query
    /// parameter on every request.
    pub fn with_secret(base_url: &str, secret: impl Into<String>) -> Result<Self> {
        let config = ClientConfig::default();
        let http = build_http_client(&config)?;
        Self::assemble(
            base_url,
            Arc::new(NativeNetwork::new(http)),
            CredentialManager::from_secret(secret),
            config,
        )
    }

    /// Client authenticated with a JSON service-account key; bearer tokens
    /// are obtained and refreshed through the standard HTTP issuer.
    pub fn with_service_account(base_url: &str, key_json: &str) -> Result<Self> {
        Self::with_service_account_config(base_url, key_json, ClientConfig::default())
    }

    pub fn with_service_account_config(
        base_url: &str,
        key_json: &str,
        config: ClientConfig,
    ) -> Result<Self> {
        let key = ServiceAccountKey::from_json(key_json)?;
        let http = build_http_client(&config)?;
        let issuer: Arc<dyn TokenIssuer> = Arc::new(HttpTokenIssuer::new(http.clone()));
        Self::assemble(
            base_url,
            Arc::new(NativeNetwork::new(http)),
            CredentialManager::from_key(key, issuer),
            config,
        )
    }

    /// Assemble a client from explicit parts.
    ///
    /// The seam for substituting a transport or issuer double in tests, and
    /// for callers bringing their own [`CanopyNetwork`] implementation.
    pub fn with_network(
        base_url: &str,
        network: Arc<dyn CanopyNetwork>,
        credentials: CredentialManager,
        config: ClientConfig,
    ) -> Result<Self> {
        Self::assemble(base_url, network, credentials, config)
    }

    fn assemble(
        base_url: &str,
        network: Arc<dyn CanopyNetwork>,
        credentials: CredentialManager,
        config: ClientConfig,
    ) -> Result<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| CanopyError::Config(format!("invalid base URL '{}': {}", base_url, e)))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(CanopyError::Config(format!(
                "unsupported base URL scheme '{}'",
                base.scheme()
            )));
        }
        Ok(CanopyClient {
            network,
            credentials: Arc::new(credentials),
            config: Arc::new(config),
            base_url: base,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Read the value at `path`.
    pub async fn get(&self, path: &str) -> Result<CanopyResponse> {
        self.fetch(path, CanopyRequest::new()).await
    }

    pub async fn get_with(&self, path: &str, request: CanopyRequest) -> Result<CanopyResponse> {
        self.fetch(path, request.with_method("GET")).await
    }

    /// Write `value` at `path`, replacing whatever is there.
    pub async fn set(&self, path: &str, value: &Value) -> Result<CanopyResponse> {
        self.set_with(path, value, CanopyRequest::new()).await
    }

    pub async fn set_with(
        &self,
        path: &str,
        value: &Value,
        request: CanopyRequest,
    ) -> Result<CanopyResponse> {
        let body = serde_json::to_vec(value)?;
        self.fetch(path, request.with_method("PUT").with_body(body))
            .await
    }

    /// Append `value` under `path`; the store assigns the child key.
    pub async fn push(&self, path: &str, value: &Value) -> Result<CanopyResponse> {
        let body = serde_json::to_vec(value)?;
        self.fetch(path, CanopyRequest::new().with_method("POST").with_body(body))
            .await
    }

    /// Merge the fields of `value` into the object at `path`.
    pub async fn update(&self, path: &str, value: &Value) -> Result<CanopyResponse> {
        let body = serde_json::to_vec(value)?;
        self.fetch(
            path,
            CanopyRequest::new().with_method("PATCH").with_body(body),
        )
        .await
    }

    /// Remove the value at `path`.
    pub async fn delete(&self, path: &str) -> Result<CanopyResponse> {
        self.fetch(path, CanopyRequest::new().with_method("DELETE"))
            .await
    }

    /// Perform a single store operation: validate the path, attach
    /// credentials, and hand off to the transport.
    pub async fn fetch(&self, path: &str, request: CanopyRequest) -> Result<CanopyResponse> {
        let url = utils::join_url(&self.base_url, path)?;
        let request = self.credentials.apply(request).await?;

        if self.config.enable_logging {
            tracing::debug!(method = %request.method, %url, "store request");
        }
        let response = self.network.fetch(&url, request).await?;
        if self.config.enable_logging {
            tracing::debug!(status = response.status, %url, "store response");
        }
        Ok(response)
    }
}

fn build_http_client(config: &ClientConfig) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
        .connect_timeout(std::time::Duration::from_secs(config.connection_timeout_secs))
        .pool_max_idle_per_host(config.max_total_connections as usize);

    if !config.proxy_url.is_empty() {
        let proxy = reqwest::Proxy::all(&config.proxy_url)
            .map_err(|e| CanopyError::Config(format!("invalid proxy URL: {}", e)))?;
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| CanopyError::Config(format!("failed to build HTTP client: {}", e)))
}
