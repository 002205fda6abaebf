//! Body extractor for browser submissions.
//!
//! Forms post `application/x-www-form-urlencoded`, scripts post JSON, and
//! some clients send nothing at all. All three decode into the same struct;
//! a missing body yields `T::default()`.

use axum::{
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use serde::de::DeserializeOwned;

use crate::http::request::request_id;
use crate::proxy::ResultEnvelope;

/// Decoded request body, JSON or form-encoded.
#[derive(Debug, Clone, Default)]
pub struct SubmittedBody<T>(pub T);

impl<S, T> FromRequest<S> for SubmittedBody<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = ResultEnvelope;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let request_id = request_id(req.headers()).to_string();

        let decoded = if content_type.starts_with("application/json") {
            Json::<T>::from_request(req, state)
                .await
                .map(|Json(body)| body)
                .map_err(|e| e.body_text())
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            Form::<T>::from_request(req, state)
                .await
                .map(|Form(body)| body)
                .map_err(|e| e.body_text())
        } else {
            Ok(T::default())
        };

        decoded.map(SubmittedBody).map_err(|reason| {
            tracing::warn!(request_id = %request_id, reason = %reason, "Rejected request body");
            ResultEnvelope::failure("Invalid request body")
        })
    }
}
