//! Service capability and the type-erased request handler.
//!
//! A service is any functional module that can hand the host exactly one
//! `(pattern, handler)` pair. The host never looks inside the handler; it
//! only forwards matching requests to it.

use std::convert::Infallible;
use std::fmt;

use axum::body::Body;
use axum::handler::HandlerWithoutStateExt;
use axum::http::Request;
use axum::response::{IntoResponse, Response};
use tower::util::BoxCloneSyncService;
use tower::{Service as TowerService, ServiceExt};

/// A module that exposes one capability over HTTP.
pub trait Service: Send + Sync {
    /// Produce the URL pattern and the handler to register under it.
    fn create_handler(&self) -> (String, Handler);
}

/// Request handler registered under a pattern.
///
/// Cheap to clone; every dispatch clones the handler out of the current
/// route snapshot and drives the clone to completion.
#[derive(Clone)]
pub struct Handler {
    inner: BoxCloneSyncService<Request<Body>, Response, Infallible>,
}

impl Handler {
    /// Wrap a tower service.
    pub fn new<S>(service: S) -> Self
    where
        S: TowerService<Request<Body>, Error = Infallible> + Clone + Send + Sync + 'static,
        S::Response: IntoResponse,
        S::Future: Send + 'static,
    {
        Self {
            inner: BoxCloneSyncService::new(service.map_response(IntoResponse::into_response)),
        }
    }

    /// Wrap an axum handler (an async fn or closure taking extractors).
    pub fn from_handler<H, T>(handler: H) -> Self
    where
        H: axum::handler::Handler<T, ()> + Sync,
        T: 'static,
    {
        Self::new(handler.into_service())
    }

    /// Run the handler for one request.
    pub async fn call(&self, request: Request<Body>) -> Response {
        self.inner
            .clone()
            .oneshot(request)
            .await
            .unwrap_or_else(|never| match never {})
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn handler_from_async_fn() {
        async fn teapot() -> (StatusCode, &'static str) {
            (StatusCode::IM_A_TEAPOT, "short and stout")
        }

        let handler = Handler::from_handler(teapot);
        let response = handler.call(Request::new(Body::empty())).await;
        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);

        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"short and stout");
    }

    #[tokio::test]
    async fn handler_from_tower_service() {
        let svc = tower::service_fn(|req: Request<Body>| async move {
            Ok::<_, Infallible>(req.uri().path().to_string())
        });

        let handler = Handler::new(svc);
        let request = Request::builder().uri("/some/path").body(Body::empty()).unwrap();
        let response = handler.call(request).await;

        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"/some/path");
    }
}
