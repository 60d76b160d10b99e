use crate::error::{CanopyError, Result};
use crate::protocol;
use crate::traits::CanopyNetwork;
use crate::types::{CanopyRequest, CanopyResponse};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::BTreeMap;

/// reqwest-backed transport.
pub struct NativeNetwork {
    client: Client,
}

impl NativeNetwork {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl CanopyNetwork for NativeNetwork {
    async fn fetch(&self, url: &str, request: CanopyRequest) -> Result<CanopyResponse> {
        let method = match request.method.to_uppercase().as_str() {
            "PUT" => reqwest::Method::PUT,
            "POST" => reqwest::Method::POST,
            "PATCH" => reqwest::Method::PATCH,
            "DELETE" => reqwest::Method::DELETE,
            _ => reqwest::Method::GET,
        };

        let mut req_builder = self.client.request(method, url);

        if !request.query.is_empty() {
            let pairs: Vec<(&str, &str)> = request
                .query
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect();
            req_builder = req_builder.query(&pairs);
        }

        for (k, v) in &request.extra_headers {
            req_builder = req_builder.header(k, v);
        }

        if request.want_etag {
            req_builder = req_builder.header(protocol::headers::REQUEST_ETAG, "true");
        }
        if let Some(etag) = &request.if_match {
            req_builder = req_builder.header(protocol::headers::IF_MATCH, etag);
        }

        if !request.body.is_empty() {
            let content_type = request
                .content_type
                .as_deref()
                .unwrap_or(protocol::media_types::JSON);
            req_builder = req_builder
                .header(reqwest::header::CONTENT_TYPE, content_type)
                .body(request.body.clone());
        }

        let response = req_builder
            .send()
            .await
            .map_err(|e| CanopyError::Http(e.to_string()))?;

        let status = response.status().as_u16();
        let mut headers = BTreeMap::new();
        for (k, v) in response.headers() {
            if let Ok(val) = v.to_str() {
                headers.insert(k.as_str().to_string(), val.to_string());
            }
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| CanopyError::Http(e.to_string()))?;

        Ok(CanopyResponse {
            status,
            headers,
            body,
        })
    }
}
