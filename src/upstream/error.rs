//! Upstream failure taxonomy.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur while talking to the upstream API.
///
/// The `Display` text carries upstream detail and is meant for logs only;
/// browser-facing code maps every variant to a generic message.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Connection refused, reset, DNS failure and similar.
    #[error("upstream unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    /// The upstream answered with a non-2xx status.
    #[error("upstream returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// The body was not JSON, or not the shape the slot needs.
    #[error("malformed upstream payload: {0}")]
    Malformed(String),

    /// A path segment would be resolved as `.` or `..`.
    #[error("path segment '{0}' is not addressable")]
    DotSegment(String),

    /// The configured base URL cannot be used to build request URLs.
    #[error("invalid upstream base URL '{0}'")]
    InvalidBaseUrl(String),
}

impl UpstreamError {
    /// Metrics label for this failure class.
    pub fn outcome_label(&self) -> &'static str {
        match self {
            UpstreamError::Transport(_) => "transport",
            UpstreamError::Status { status, .. } if status.is_client_error() => "client_error",
            UpstreamError::Status { .. } => "server_error",
            UpstreamError::Malformed(_) => "malformed",
            UpstreamError::DotSegment(_) => "invalid_path",
            UpstreamError::InvalidBaseUrl(_) => "config",
        }
    }
}

/// Result type for upstream operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;
