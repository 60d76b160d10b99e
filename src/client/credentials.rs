//! Credential lifecycle: token acquisition, caching, and refresh.
//!
//! A [`CredentialManager`] is owned by the client and decorates every
//! outbound request. Bearer mode keeps one [`Credential`] behind a mutex and
//! refreshes it in place when its validity window has passed; the expiry
//! check and the refresh happen under the same lock, so concurrent callers
//! in one expiry window trigger exactly one issuer call.

use crate::error::{CanopyError, Result};
use crate::protocol;
use crate::traits::TokenIssuer;
use crate::types::{CanopyRequest, Credential, IssuedToken, ServiceAccountKey};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

enum AuthMode {
    None,
    Secret(String),
    ServiceAccount {
        key: ServiceAccountKey,
        issuer: Arc<dyn TokenIssuer>,
    },
}

/// Owns the client's credential state and decorates outbound requests.
pub struct CredentialManager {
    mode: AuthMode,
    credential: Mutex<Option<Credential>>,
}

impl CredentialManager {
    /// Requests pass through undecorated.
    pub fn unauthenticated() -> Self {
        Self {
            mode: AuthMode::None,
            credential: Mutex::new(None),
        }
    }

    /// Static secret, merged into each request's query parameters as
    /// `auth=<secret>`. No expiry semantics.
    pub fn from_secret(secret: impl Into<String>) -> Self {
        Self {
            mode: AuthMode::Secret(secret.into()),
            credential: Mutex::new(None),
        }
    }

    /// Service-account key exchanged for bearer tokens through `issuer`.
    pub fn from_key(key: ServiceAccountKey, issuer: Arc<dyn TokenIssuer>) -> Self {
        Self {
            mode: AuthMode::ServiceAccount { key, issuer },
            credential: Mutex::new(None),
        }
    }

    /// Attach credentials to an outbound request.
    pub async fn apply(&self, request: CanopyRequest) -> Result<CanopyRequest> {
        match &self.mode {
            AuthMode::None => Ok(request),
            AuthMode::Secret(secret) => {
                Ok(request.with_param(protocol::query::AUTH, secret.clone()))
            }
            AuthMode::ServiceAccount { .. } => {
                let token = self.bearer_token().await?;
                Ok(request.with_header(
                    protocol::headers::AUTHORIZATION,
                    protocol::format_bearer(&token),
                ))
            }
        }
    }

    /// Current bearer token, fetching or refreshing through the issuer as
    /// needed. The cached credential is reused until
    /// `issued_at + expires_in` has passed.
    async fn bearer_token(&self) -> Result<String> {
        let (key, issuer) = match &self.mode {
            AuthMode::ServiceAccount { key, issuer } => (key, issuer),
            _ => {
                return Err(CanopyError::Credential(
                    "no service account configured".into(),
                ))
            }
        };

        let mut slot = self.credential.lock().await;
        if let Some(credential) = slot.as_ref() {
            if !credential.is_expired() {
                return Ok(credential.token.clone());
            }
            tracing::debug!("bearer token expired, refreshing");
        }

        let issued = issuer.issue(key).await?;
        let credential = Credential::from_issued(issued);
        let token = credential.token.clone();
        *slot = Some(credential);
        Ok(token)
    }
}

/// OAuth2 client-credentials exchange over HTTP.
///
/// POSTs a form-encoded grant to the key's `token_uri` and expects JSON
/// `{access_token, expires_in}` back. Anything else on the wire means a
/// custom [`TokenIssuer`] implementation.
pub struct HttpTokenIssuer {
    client: reqwest::Client,
}

impl HttpTokenIssuer {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpTokenIssuer {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}

#[async_trait]
impl TokenIssuer for HttpTokenIssuer {
    async fn issue(&self, key: &ServiceAccountKey) -> Result<IssuedToken> {
        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", key.client_id.as_str()),
            ("client_secret", key.client_secret.as_str()),
        ];

        let response = self
            .client
            .post(&key.token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| CanopyError::Credential(format!("token exchange failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(CanopyError::Credential(format!(
                "token endpoint returned {}",
                response.status().as_u16()
            )));
        }

        response
            .json::<IssuedToken>()
            .await
            .map_err(|e| CanopyError::Credential(format!("malformed token response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingIssuer {
        calls: AtomicUsize,
        expires_in: u64,
    }

    impl CountingIssuer {
        fn new(expires_in: u64) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                expires_in,
            })
        }

        fn count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TokenIssuer for CountingIssuer {
        async fn issue(&self, _key: &ServiceAccountKey) -> Result<IssuedToken> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(IssuedToken {
                access_token: format!("tok-{}", n),
                expires_in: self.expires_in,
            })
        }
    }

    fn key() -> ServiceAccountKey {
        ServiceAccountKey {
            client_id: "svc".into(),
            client_secret: "s3cret".into(),
            token_uri: "https://issuer.example.com/token".into(),
        }
    }

    fn auth_header(request: &CanopyRequest) -> Option<&str> {
        request
            .extra_headers
            .get(protocol::headers::AUTHORIZATION)
            .map(String::as_str)
    }

    #[tokio::test]
    async fn test_first_use_fetches_token() {
        let issuer = CountingIssuer::new(3600);
        let manager = CredentialManager::from_key(key(), issuer.clone());

        let decorated = manager.apply(CanopyRequest::new()).await.unwrap();
        assert_eq!(auth_header(&decorated), Some("Bearer tok-1"));
        assert_eq!(issuer.count(), 1);
    }

    #[tokio::test]
    async fn test_cached_token_reused_before_expiry() {
        let issuer = CountingIssuer::new(3600);
        let manager = CredentialManager::from_key(key(), issuer.clone());

        manager.apply(CanopyRequest::new()).await.unwrap();
        let second = manager.apply(CanopyRequest::new()).await.unwrap();

        assert_eq!(auth_header(&second), Some("Bearer tok-1"));
        assert_eq!(issuer.count(), 1);
    }

    #[tokio::test]
    async fn test_refresh_after_expiry() {
        // Zero-length validity window: every use lands at-or-after expiry.
        let issuer = CountingIssuer::new(0);
        let manager = CredentialManager::from_key(key(), issuer.clone());

        manager.apply(CanopyRequest::new()).await.unwrap();
        let second = manager.apply(CanopyRequest::new()).await.unwrap();

        assert_eq!(auth_header(&second), Some("Bearer tok-2"));
        assert_eq!(issuer.count(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_first_use_issues_once() {
        let issuer = CountingIssuer::new(3600);
        let manager = Arc::new(CredentialManager::from_key(key(), issuer.clone()));

        let (a, b, c, d) = tokio::join!(
            manager.apply(CanopyRequest::new()),
            manager.apply(CanopyRequest::new()),
            manager.apply(CanopyRequest::new()),
            manager.apply(CanopyRequest::new()),
        );

        for decorated in [a.unwrap(), b.unwrap(), c.unwrap(), d.unwrap()] {
            assert_eq!(auth_header(&decorated), Some("Bearer tok-1"));
        }
        assert_eq!(issuer.count(), 1);
    }

    #[tokio::test]
    async fn test_secret_mode_merges_query() {
        let manager = CredentialManager::from_secret("abc");

        let decorated = manager
            .apply(CanopyRequest::new().with_param("foo", "bar"))
            .await
            .unwrap();

        assert_eq!(decorated.query.get("auth").map(String::as_str), Some("abc"));
        assert_eq!(decorated.query.get("foo").map(String::as_str), Some("bar"));
        assert!(auth_header(&decorated).is_none());
    }

    #[tokio::test]
    async fn test_unauthenticated_passthrough() {
        let manager = CredentialManager::unauthenticated();
        let decorated = manager.apply(CanopyRequest::new()).await.unwrap();
        assert!(decorated.query.is_empty());
        assert!(decorated.extra_headers.is_empty());
    }
}
