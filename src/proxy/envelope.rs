//! The `{success, data|error}` reply shared by every mutation endpoint.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of a proxied mutation.
///
/// Build with [`ResultEnvelope::ok`] or [`ResultEnvelope::failure`]; those
/// keep `data` and `error` mutually exclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResultEnvelope {
    /// Upstream accepted the mutation. `data` is absent when the upstream
    /// answered with an empty body.
    pub fn ok(data: Option<Value>) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    pub fn status(&self) -> StatusCode {
        if self.success {
            StatusCode::OK
        } else {
            StatusCode::BAD_REQUEST
        }
    }
}

impl IntoResponse for ResultEnvelope {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ok_without_data_serialises_bare() {
        let value = serde_json::to_value(ResultEnvelope::ok(None)).unwrap();
        assert_eq!(value, json!({"success": true}));
    }

    #[test]
    fn test_failure_is_client_error() {
        let envelope = ResultEnvelope::failure("Failed to add player to team");
        assert_eq!(envelope.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({"success": false, "error": "Failed to add player to team"})
        );
    }

    #[test]
    fn test_deserialises_missing_fields() {
        let envelope: ResultEnvelope = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert_eq!(envelope, ResultEnvelope::ok(None));
    }
}
