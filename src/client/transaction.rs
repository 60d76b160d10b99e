//! Optimistic-concurrency transactions over store ETags.
//!
//! A transaction reads the current value and its version token, applies the
//! caller's mutation, and writes the result back conditionally with
//! `If-Match`. When the store rejects the precondition (412), the rejection
//! itself carries the fresh value and token, so the loop re-applies the
//! mutation to that state and tries again without another read. The store's
//! precondition check is the correctness mechanism; the client holds no
//! lock and adds no delay between attempts.

use crate::client::fetch::CanopyClient;
use crate::error::{CanopyError, Result};
use crate::types::{CanopyRequest, CanopyResponse};
use serde_json::Value;

/// Options for a single transaction call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionOptions {
    /// Retry budget for precondition conflicts. `None` retries until the
    /// write lands.
    pub max_retries: Option<u32>,
}

impl TransactionOptions {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries: Some(max_retries),
        }
    }

    /// Retry conflicts without a cap.
    ///
    /// Under sustained contention this spins until the write lands; prefer
    /// a bounded budget unless the mutation must eventually win.
    pub fn unbounded() -> Self {
        Self { max_retries: None }
    }
}

impl CanopyClient {
    /// Atomically transform the value at `path` with `f`, using the retry
    /// budget from [`ClientConfig`](crate::client::ClientConfig).
    ///
    /// `f` receives the freshest known value (null for an absent path) and
    /// returns the value to store. It runs once per write attempt, so it
    /// must tolerate repeat invocation; side effects are the caller's
    /// responsibility.
    ///
    /// A returned `Ok` response with `is_success() == false` means the retry
    /// budget was exhausted by conflicts: its status is 412 and its body is
    /// the last value seen on the server, not the caller's intended update.
    pub async fn transaction<F>(&self, path: &str, f: F) -> Result<CanopyResponse>
    where
        F: FnMut(Value) -> Value,
    {
        let options = TransactionOptions {
            max_retries: self.config().default_transaction_retries,
        };
        self.transaction_with(path, options, f).await
    }

    /// [`transaction`](CanopyClient::transaction) with an explicit retry
    /// budget. `max_retries: Some(0)` makes exactly one write attempt and
    /// returns the first conflict unchanged.
    pub async fn transaction_with<F>(
        &self,
        path: &str,
        options: TransactionOptions,
        mut f: F,
    ) -> Result<CanopyResponse>
    where
        F: FnMut(Value) -> Value,
    {
        let read = self
            .get_with(path, CanopyRequest::new().with_etag())
            .await?;
        if !read.is_success() {
            return Err(CanopyError::Status(read));
        }

        // No ETag means the path does not exist yet; the first write then
        // carries no precondition.
        let mut etag = read.etag().map(str::to_string);
        let mut current = read.json_or_null()?;
        let mut attempts: u32 = 0;

        loop {
            let next = f(current);
            let body = serde_json::to_vec(&next)?;

            let mut write = CanopyRequest::new().with_method("PUT").with_body(body);
            if let Some(tag) = &etag {
                write = write.with_if_match(tag.clone());
            }

            let response = self.fetch(path, write).await?;
            if response.is_success() {
                return Ok(response);
            }
            if !response.is_conflict() {
                return Err(CanopyError::Status(response));
            }

            if options.max_retries.is_some_and(|max| attempts >= max) {
                if self.config().enable_logging {
                    tracing::warn!(path, attempts, "giving up after repeated write conflicts");
                }
                return Ok(response);
            }
            attempts += 1;

            // The conflict already carries the current remote state; no
            // second read.
            etag = match response.etag() {
                Some(tag) => Some(tag.to_string()),
                None => {
                    return Err(CanopyError::Protocol(
                        "conflict response carried no ETag".into(),
                    ))
                }
            };
            current = response.json_or_null()?;

            if self.config().enable_logging {
                tracing::debug!(path, attempt = attempts, "write conflicted, retrying");
            }
        }
    }
}
