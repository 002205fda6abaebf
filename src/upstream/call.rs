//! Upstream call descriptions.

use reqwest::Method;
use serde_json::Value;
use url::Url;

use crate::upstream::error::UpstreamError;

/// One request against the upstream API, fully resolved before it is sent.
///
/// Path segments are stored unencoded and percent-encoded when the URL is
/// built, so ids and search terms never need escaping by the caller. Dot
/// segments (`.`, `..` and their `%2e` spellings) cannot be encoded and are
/// refused when the URL is built.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamCallSpec {
    method: Method,
    segments: Vec<String>,
    query: Vec<(String, String)>,
    body: Option<Value>,
}

impl UpstreamCallSpec {
    pub fn new<I, S>(method: Method, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::GET, segments)
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn with_json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Path relative to the upstream base, e.g. `/teams/5/roster`.
    ///
    /// Used as the `endpoint` label in logs; segments are not encoded.
    pub fn display_path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    /// Low-cardinality form of the path for metrics: numeric segments
    /// collapse to `{id}`.
    pub fn endpoint_label(&self) -> String {
        let parts: Vec<&str> = self
            .segments
            .iter()
            .map(|s| {
                if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
                    "{id}"
                } else {
                    s.as_str()
                }
            })
            .collect();
        format!("/{}", parts.join("/"))
    }

    /// Resolve against `base`, appending segments and query pairs.
    pub fn url(&self, base: &Url) -> Result<Url, UpstreamError> {
        if let Some(segment) = self.segments.iter().find(|s| is_dot_segment(s)) {
            return Err(UpstreamError::DotSegment(segment.clone()));
        }

        let mut url = base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| UpstreamError::InvalidBaseUrl(base.to_string()))?;
            path.pop_if_empty();
            path.extend(&self.segments);
        }
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }
        Ok(url)
    }
}

/// Whether URL resolution would treat `segment` as `.` or `..` instead of
/// a literal path segment.
pub fn is_dot_segment(segment: &str) -> bool {
    let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
    decoded == "." || decoded == ".."
}
