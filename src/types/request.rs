//! Request parameters for a single store operation.

use bytes::Bytes;
use std::collections::BTreeMap;

/// Request parameters for a single store operation.
///
/// Built with the `with_*` methods and handed to
/// [`CanopyClient::fetch`](crate::client::CanopyClient::fetch) or one of the
/// `*_with` wrappers.
#[derive(Clone, Debug)]
pub struct CanopyRequest {
    pub method: String,
    pub body: Bytes,
    pub query: BTreeMap<String, String>,
    pub extra_headers: BTreeMap<String, String>,
    /// Precondition for a conditional write: apply only if the store's
    /// current version token matches.
    pub if_match: Option<String>,
    /// Ask the store to report the resource version in the response.
    pub want_etag: bool,
    pub content_type: Option<String>,
}

impl Default for CanopyRequest {
    fn default() -> Self {
        Self {
            method: "GET".to_string(),
            body: Bytes::new(),
            query: BTreeMap::new(),
            extra_headers: BTreeMap::new(),
            if_match: None,
            want_etag: false,
            content_type: None,
        }
    }
}

impl CanopyRequest {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.insert(key.into(), value.into());
        self
    }

    pub fn with_if_match(mut self, etag: impl Into<String>) -> Self {
        self.if_match = Some(etag.into());
        self
    }

    /// Request the resource version alongside the value.
    pub fn with_etag(mut self) -> Self {
        self.want_etag = true;
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    #[inline]
    pub fn is_conditional(&self) -> bool {
        self.if_match.is_some()
    }
}
