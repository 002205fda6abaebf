//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace span)
//!     → pages.rs     GET  /, /teams, /team/{id}, /team/{id}/lineup,
//!                         /players, /player/{id}, /health
//!         → aggregator → render (HTML, or JSON on Accept)
//!     → mutations.rs POST/DELETE/PUT /api/teams/..., POST /teams/create
//!         → body.rs (JSON | form | empty) → proxy → ResultEnvelope
//! ```

pub mod body;
pub mod mutations;
pub mod pages;
pub mod request;
pub mod server;

pub use request::{request_id, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
