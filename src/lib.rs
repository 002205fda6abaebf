//! Fantasy-sports web gateway.
//!
//! Sits between browsers and the fantasy-sports API: aggregates upstream
//! data into page view models, proxies roster mutations, and ships the
//! client-side action pipeline used by front ends.

pub mod aggregator;
pub mod client;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod proxy;
pub mod render;
pub mod upstream;

pub use config::schema::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
