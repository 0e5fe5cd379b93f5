//! RPC liveness method.
//!
//! Exposed for RPC-aware clients as a Connect unary procedure using the JSON
//! codec: `POST /{service}/Liveness` with an empty request message, answered
//! with `{"status":"serving"}`.

use axum::{
    body::Bytes,
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Default fully-qualified RPC service name.
pub const DEFAULT_RPC_SERVICE: &str = "ratelimit.v1.RatelimitService";

/// Status reported by the RPC liveness method.
pub const SERVING: &str = "serving";

const JSON_CONTENT_TYPE: &str = "application/json";

const ACCEPT_POST: HeaderName = HeaderName::from_static("accept-post");

/// Path of the liveness procedure for a service name.
pub fn liveness_procedure(service: &str) -> String {
    format!("/{}/Liveness", service)
}

#[derive(Debug, Serialize)]
pub struct LivenessResponse {
    pub status: &'static str,
}

/// Connect error body.
#[derive(Debug, Serialize)]
struct ConnectError {
    code: &'static str,
    message: String,
}

/// Connect unary handler for the liveness procedure.
pub async fn liveness(headers: HeaderMap, body: Bytes) -> Response {
    if !is_json(&headers) {
        return (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            [(ACCEPT_POST, HeaderValue::from_static(JSON_CONTENT_TYPE))],
        )
            .into_response();
    }

    if !body.is_empty() {
        match serde_json::from_slice::<serde_json::Value>(&body) {
            Ok(serde_json::Value::Object(_)) => {}
            Ok(_) => return invalid_argument("request message must be a JSON object".to_string()),
            Err(e) => return invalid_argument(format!("malformed request message: {}", e)),
        }
    }

    Json(LivenessResponse { status: SERVING }).into_response()
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|mime| mime.trim().eq_ignore_ascii_case(JSON_CONTENT_TYPE))
        .unwrap_or(false)
}

fn invalid_argument(message: String) -> Response {
    tracing::debug!(message = %message, "Rejected liveness request");
    (
        StatusCode::BAD_REQUEST,
        Json(ConnectError {
            code: "invalid_argument",
            message,
        }),
    )
        .into_response()
}
