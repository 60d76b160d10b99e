//! Credential material: service-account keys and issued bearer tokens.

use crate::error::{CanopyError, Result};
use serde::Deserialize;
use std::time::{Duration, Instant};

/// Service-account key exchanged for bearer tokens.
///
/// Parsed from the JSON key file handed out by the store's console.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_id: String,
    pub client_secret: String,
    /// Token endpoint the key is exchanged against.
    pub token_uri: String,
}

impl ServiceAccountKey {
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw)
            .map_err(|e| CanopyError::Config(format!("invalid service account key: {}", e)))
    }
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

/// Token material returned by a [`TokenIssuer`](crate::traits::TokenIssuer).
#[derive(Clone, Debug, Deserialize)]
pub struct IssuedToken {
    pub access_token: String,
    /// Validity window in seconds, counted from issuance.
    pub expires_in: u64,
}

/// A cached bearer token and its validity window.
#[derive(Clone, Debug)]
pub struct Credential {
    pub token: String,
    pub issued_at: Instant,
    pub expires_in: Duration,
}

impl Credential {
    pub fn new(token: impl Into<String>, expires_in: Duration) -> Self {
        Credential {
            token: token.into(),
            issued_at: Instant::now(),
            expires_in,
        }
    }

    pub fn from_issued(issued: IssuedToken) -> Self {
        Self::new(issued.access_token, Duration::from_secs(issued.expires_in))
    }

    /// Valid for reuse until `issued_at + expires_in` has passed.
    #[inline]
    pub fn is_expired(&self) -> bool {
        self.issued_at.elapsed() >= self.expires_in
    }
}
