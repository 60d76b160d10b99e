//! canopy_rs: client for tree-structured JSON stores over HTTP.
//!
//! A Canopy store holds a single JSON tree addressed by relative paths.
//! This crate provides:
//!
//! - **client**: the [`CanopyClient`] with `get`/`set`/`push`/`update`/`delete`
//!   wrappers and ETag-based optimistic-concurrency transactions.
//! - **credentials**: bearer-token acquisition and refresh for service
//!   accounts, plus a static-secret query-parameter mode.
//! - **types**: request/response values and credential material.

pub mod client;
pub mod error;
pub mod protocol;
pub mod traits;
pub mod types;

// Top-level re-exports for common usage
pub use crate::error::{CanopyError, Result};
pub use crate::types::{CanopyRequest, CanopyResponse, Credential, IssuedToken, ServiceAccountKey};

pub use crate::client::{
    CanopyClient, ClientConfig, CredentialManager, HttpTokenIssuer, NativeNetwork,
    TransactionOptions,
};
pub use crate::traits::{CanopyNetwork, TokenIssuer};
