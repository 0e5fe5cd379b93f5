//! Plain-HTTP liveness probe.
//!
//! Reports that the process is alive and dispatching. It never consults the
//! registry or any downstream service.

use axum::http::StatusCode;

/// Reserved path of the liveness probe.
pub const LIVENESS_PATH: &str = "/liveness";

/// `GET /liveness` → `200 OK`, body `OK`.
pub async fn liveness() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}
