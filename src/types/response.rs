//! HTTP response from a Canopy store.

use crate::error::{CanopyError, Result};
use crate::protocol;
use bytes::Bytes;
use serde_json::Value;
use std::collections::BTreeMap;

/// HTTP response from a Canopy store.
#[derive(Clone, Debug)]
pub struct CanopyResponse {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: Bytes,
}

impl CanopyResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        CanopyResponse {
            status,
            headers: BTreeMap::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Version token for the value at the requested path, if the store sent one.
    pub fn etag(&self) -> Option<&str> {
        self.header(protocol::headers::ETAG)
    }

    pub fn body_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    /// Decode the body as JSON.
    ///
    /// The bare literals `null`, `true` and `false` decode to the
    /// corresponding [`Value`] primitives; any other non-JSON content fails.
    pub fn json(&self) -> Result<Value> {
        serde_json::from_slice(&self.body).map_err(|e| CanopyError::BodyParse(e.to_string()))
    }

    /// Decode the body as JSON, mapping an empty body to [`Value::Null`].
    ///
    /// Reads of an absent path come back without a value; the transaction
    /// loop treats those as the null tree.
    pub fn json_or_null(&self) -> Result<Value> {
        if self.body.is_empty() {
            return Ok(Value::Null);
        }
        self.json()
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        protocol::is_success(self.status)
    }

    /// True when a conditional write was rejected because the value changed.
    #[inline]
    pub fn is_conflict(&self) -> bool {
        protocol::is_precondition_failed(self.status)
    }
}

impl Default for CanopyResponse {
    fn default() -> Self {
        CanopyResponse {
            status: 200,
            headers: BTreeMap::new(),
            body: Bytes::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== Constructor Tests ==========

    #[test]
    fn test_response_new() {
        let response = CanopyResponse::new(200, "test body");
        assert_eq!(response.status, 200);
        assert_eq!(response.body_str(), Some("test body"));
    }

    #[test]
    fn test_response_default() {
        let response: CanopyResponse = Default::default();
        assert_eq!(response.status, 200);
        assert!(response.headers.is_empty());
        assert!(response.body.is_empty());
    }

    // ========== Header Tests ==========

    #[test]
    fn test_with_header_basic() {
        let response = CanopyResponse::new(200, "test").with_header("ETag", "abc123");
        assert_eq!(response.header("ETag"), Some("abc123"));
    }

    #[test]
    fn test_header_case_insensitive() {
        let response = CanopyResponse::new(200, "test").with_header("etag", "abc123");
        assert_eq!(response.header("ETag"), Some("abc123"));
        assert_eq!(response.header("ETAG"), Some("abc123"));
    }

    #[test]
    fn test_header_not_found() {
        let response = CanopyResponse::new(200, "test");
        assert_eq!(response.header("nonexistent"), None);
    }

    #[test]
    fn test_etag_accessor() {
        let response = CanopyResponse::new(200, "{}").with_header("ETag", "v42");
        assert_eq!(response.etag(), Some("v42"));
        assert_eq!(CanopyResponse::new(200, "{}").etag(), None);
    }

    // ========== Body Decoding Tests ==========

    #[test]
    fn test_json_null_literal() {
        let response = CanopyResponse::new(200, "null");
        assert_eq!(response.json().unwrap(), Value::Null);
    }

    #[test]
    fn test_json_bool_literals() {
        assert_eq!(
            CanopyResponse::new(200, "true").json().unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            CanopyResponse::new(200, "false").json().unwrap(),
            Value::Bool(false)
        );
    }

    #[test]
    fn test_json_object() {
        let response = CanopyResponse::new(200, r#"{"name":"walrus"}"#);
        assert_eq!(response.json().unwrap()["name"], "walrus");
    }

    #[test]
    fn test_json_malformed() {
        let response = CanopyResponse::new(200, "not json");
        assert!(matches!(
            response.json(),
            Err(crate::error::CanopyError::BodyParse(_))
        ));
    }

    #[test]
    fn test_json_or_null_empty_body() {
        let response = CanopyResponse::new(200, "");
        assert_eq!(response.json_or_null().unwrap(), Value::Null);
    }

    #[test]
    fn test_json_or_null_still_strict() {
        let response = CanopyResponse::new(200, "garbage{");
        assert!(response.json_or_null().is_err());
    }

    #[test]
    fn test_body_str_invalid_utf8() {
        let response = CanopyResponse::new(200, vec![0x80, 0x81, 0x82]);
        assert_eq!(response.body_str(), None);
    }

    // ========== Status Code Tests ==========

    #[test]
    fn test_is_success_range() {
        assert!(CanopyResponse::new(200, "").is_success());
        assert!(CanopyResponse::new(201, "").is_success());
        assert!(CanopyResponse::new(299, "").is_success());
        assert!(!CanopyResponse::new(199, "").is_success());
        assert!(!CanopyResponse::new(300, "").is_success());
        assert!(!CanopyResponse::new(404, "").is_success());
    }

    #[test]
    fn test_is_conflict() {
        assert!(CanopyResponse::new(412, "").is_conflict());
        assert!(!CanopyResponse::new(409, "").is_conflict());
        assert!(!CanopyResponse::new(200, "").is_conflict());
    }
}
