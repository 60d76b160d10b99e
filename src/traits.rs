use crate::error::Result;
use crate::types::{CanopyRequest, CanopyResponse, IssuedToken, ServiceAccountKey};
use async_trait::async_trait;

/// Abstraction for network operations.
///
/// The client performs every store operation through this seam, so tests
/// substitute a scripted double instead of stubbing the client itself.
#[async_trait]
pub trait CanopyNetwork: Send + Sync + 'static {
    /// Perform a single HTTP request against the store.
    async fn fetch(&self, url: &str, req: CanopyRequest) -> Result<CanopyResponse>;
}

/// Abstraction for the credential-issuing collaborator.
///
/// Exchanges a service-account key for short-lived bearer-token material.
/// Invoked on first use and again whenever the cached token's validity
/// window has passed.
#[async_trait]
pub trait TokenIssuer: Send + Sync + 'static {
    async fn issue(&self, key: &ServiceAccountKey) -> Result<IssuedToken>;
}
