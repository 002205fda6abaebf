//! HTTP client for the remote fantasy-sports API.
//!
//! # Responsibilities
//! - Resolve an `UpstreamCallSpec` against the configured base URL
//! - Issue exactly one attempt per call (no retry, no client-side timeout)
//! - Classify the outcome: transport failure, non-2xx, malformed JSON
//! - Record per-endpoint metrics

use std::time::Instant;

use serde_json::Value;
use url::Url;

use crate::observability::metrics;
use crate::upstream::call::UpstreamCallSpec;
use crate::upstream::error::{UpstreamError, UpstreamResult};

/// Longest upstream error body kept for logging.
const MAX_LOGGED_BODY: usize = 512;

/// Cheaply cloneable upstream client; clones share one connection pool.
#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: Url,
}

impl UpstreamClient {
    /// Create a client for `base_url` (e.g. `http://localhost:8080/api`).
    pub fn new(base_url: &str) -> UpstreamResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|_| UpstreamError::InvalidBaseUrl(base_url.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(UpstreamError::InvalidBaseUrl(base_url.to_string()));
        }

        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
        })
    }

    /// Perform one upstream call.
    ///
    /// Returns `Ok(None)` for a 2xx answer with an empty body (deletes).
    pub async fn execute(&self, call: &UpstreamCallSpec) -> UpstreamResult<Option<Value>> {
        let start = Instant::now();
        let endpoint = call.display_path();
        let result = self.send(call).await;

        let outcome = match &result {
            Ok(_) => "ok",
            Err(e) => e.outcome_label(),
        };
        metrics::record_upstream_call(call.endpoint_label(), outcome, start);

        tracing::debug!(
            method = %call.method(),
            upstream_path = %endpoint,
            outcome,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Upstream call finished"
        );

        result
    }

    async fn send(&self, call: &UpstreamCallSpec) -> UpstreamResult<Option<Value>> {
        let url = call.url(&self.base_url)?;

        let mut request = self.http.request(call.method().clone(), url);
        if let Some(body) = call.body() {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let mut body = String::from_utf8_lossy(&bytes).into_owned();
            if body.len() > MAX_LOGGED_BODY {
                let mut cut = MAX_LOGGED_BODY;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            return Err(UpstreamError::Status { status, body });
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| UpstreamError::Malformed(e.to_string()))
    }
}

impl std::fmt::Debug for UpstreamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamClient")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}
