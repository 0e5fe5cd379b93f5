//! Echo service: returns the request body unchanged.

use axum::{
    body::Bytes,
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
};

use crate::service::{Handler, Service};

/// Echoes request bodies back under a fixed pattern.
#[derive(Debug, Clone)]
pub struct Echo {
    pattern: String,
}

impl Echo {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }
}

impl Service for Echo {
    fn create_handler(&self) -> (String, Handler) {
        (self.pattern.clone(), Handler::from_handler(echo))
    }
}

async fn echo(headers: HeaderMap, body: Bytes) -> Response {
    let mut response = body.into_response();
    if let Some(content_type) = headers.get(header::CONTENT_TYPE) {
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, content_type.clone());
    }
    response
}
