//! Upstream API access.
//!
//! # Data Flow
//! ```text
//! aggregator / proxy
//!     → call.rs (UpstreamCallSpec: method, path segments, query, body)
//!     → client.rs (resolve against base URL, single attempt)
//!     → Ok(decoded JSON) | Err(UpstreamError)
//! ```
//!
//! # Design Decisions
//! - One attempt per call; retries and timeouts are left to the caller's user
//! - Errors keep full upstream detail for logging; callers decide what leaks

pub mod call;
pub mod client;
pub mod error;

pub use call::UpstreamCallSpec;
pub use client::UpstreamClient;
pub use error::{UpstreamError, UpstreamResult};
