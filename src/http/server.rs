//! HTTP server setup and transport.
//!
//! # Responsibilities
//! - Create the Axum Router: liveness routes, registry dispatch, middleware
//! - Serve HTTP/1.1 and HTTP/2 (h2c via connection preface) on one listener
//! - Stop accepting on shutdown and drain in-flight connections
//!
//! Malformed framing is answered by hyper on the offending connection only;
//! it never reaches dispatch or the lifecycle controller.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use hyper::body::Incoming;
use hyper_util::{
    rt::{TokioExecutor, TokioIo},
    server::{conn::auto::Builder as AutoBuilder, graceful::GracefulShutdown},
};
use tokio::task::JoinSet;
use tower::ServiceExt;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::HostConfig;
use crate::health::{liveness, rpc, LIVENESS_PATH};
use crate::lifecycle::Shutdown;
use crate::net::Listener;
use crate::routing::{Lookup, Registry};

/// Pause after a failed accept before trying again.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// HTTP server for the service host.
pub struct HttpServer {
    router: Router,
    drain_timeout: Option<Duration>,
}

impl HttpServer {
    /// Create a server dispatching into `registry`.
    pub fn new(registry: Arc<Registry>, config: &HostConfig) -> Self {
        Self {
            router: Self::build_router(registry, config),
            drain_timeout: config.timeouts.drain(),
        }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Probe routes are matched before the registry fallback.
    #[allow(deprecated)]
    fn build_router(registry: Arc<Registry>, config: &HostConfig) -> Router {
        Router::new()
            .route(LIVENESS_PATH, get(liveness::liveness))
            .route(
                &rpc::liveness_procedure(&config.rpc.service),
                post(rpc::liveness),
            )
            .fallback(dispatch)
            .with_state(registry)
            .layer(TimeoutLayer::new(config.timeouts.request()))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The composed router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Accept connections until `shutdown` fires, then drain.
    ///
    /// Accept failures are logged and retried. Returns once every connection
    /// has closed, or once the drain deadline has passed and the remaining
    /// connections have been aborted.
    pub async fn run(self, listener: Listener, shutdown: Shutdown) {
        let local_addr = listener.local_addr();
        let max_connections = listener.max_connections();
        let graceful = GracefulShutdown::new();
        let builder = AutoBuilder::new(TokioExecutor::new());
        let mut connections = JoinSet::new();
        let mut next_id: u64 = 0;

        tracing::info!(address = %local_addr, max_connections, "HTTP server starting");

        loop {
            let accepted = tokio::select! {
                biased;
                _ = shutdown.wait() => break,
                Some(_) = connections.join_next(), if !connections.is_empty() => continue,
                accepted = listener.accept() => accepted,
            };

            let (stream, peer_addr, permit) = match accepted {
                Ok(conn) => conn,
                Err(e) => {
                    tracing::error!(error = %e, "Accept failed");
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                    continue;
                }
            };

            next_id += 1;
            let connection_id = next_id;
            let router = self.router.clone();
            let service = hyper::service::service_fn(move |request: Request<Incoming>| {
                router.clone().oneshot(request.map(Body::new))
            });

            let conn = builder.serve_connection_with_upgrades(TokioIo::new(stream), service);
            let conn = graceful.watch(conn.into_owned());

            connections.spawn(async move {
                let _permit = permit;
                if let Err(e) = conn.await {
                    tracing::debug!(
                        connection_id,
                        peer_addr = %peer_addr,
                        error = %e,
                        "Connection ended with error"
                    );
                }
            });
        }

        let in_use = max_connections - listener.available_permits();
        drop(listener);
        tracing::info!(
            address = %local_addr,
            active_connections = in_use,
            "Stopped accepting, draining connections"
        );

        match self.drain_timeout {
            Some(limit) => {
                if tokio::time::timeout(limit, graceful.shutdown()).await.is_err() {
                    tracing::warn!(
                        drain_secs = limit.as_secs(),
                        active_connections = connections.len(),
                        "Drain deadline passed, aborting remaining connections"
                    );
                }
            }
            None => graceful.shutdown().await,
        }
        connections.shutdown().await;

        tracing::info!(address = %local_addr, "HTTP server stopped");
    }
}

/// Forward a request to the handler registered for its path.
async fn dispatch(State(registry): State<Arc<Registry>>, request: Request) -> Response {
    let table = registry.snapshot();

    match table.lookup(request.uri().path()) {
        Lookup::Found(route) => {
            tracing::trace!(pattern = %route.pattern, "Dispatching request");
            let handler = route.handler.clone();
            handler.call(request).await
        }
        Lookup::Redirect(location) => {
            let location = match request.uri().query() {
                Some(query) => format!("{}?{}", location, query),
                None => location,
            };
            (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response()
        }
        Lookup::NotFound => (StatusCode::NOT_FOUND, "404 page not found").into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::Handler;
    use axum::body::Bytes;

    fn router_with(registrations: &[(&str, &'static str)]) -> Router {
        let registry = Arc::new(Registry::new());
        for (pattern, reply) in registrations {
            let reply = *reply;
            registry
                .register(pattern, Handler::from_handler(move || async move { reply }))
                .unwrap();
        }
        HttpServer::new(registry, &HostConfig::default()).router()
    }

    async fn send(router: Router, request: Request) -> (StatusCode, axum::http::HeaderMap, Bytes) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        (status, headers, body)
    }

    fn get(uri: &str) -> Request {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn liveness_with_empty_registry() {
        let (status, _, body) = send(router_with(&[]), get("/liveness")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(&body[..], b"OK");
    }

    #[tokio::test]
    async fn liveness_wins_over_root_subtree() {
        let router = router_with(&[("/", "catch-all")]);

        let (_, _, body) = send(router.clone(), get("/liveness")).await;
        assert_eq!(&body[..], b"OK");

        let (_, _, body) = send(router, get("/anything")).await;
        assert_eq!(&body[..], b"catch-all");
    }

    #[tokio::test]
    async fn patterns_do_not_cross_talk() {
        let router = router_with(&[("/a", "alpha"), ("/b", "beta"), ("/c/", "gamma")]);

        for (path, expected) in [("/a", "alpha"), ("/b", "beta"), ("/c/deep/path", "gamma")] {
            let (status, _, body) = send(router.clone(), get(path)).await;
            assert_eq!(status, StatusCode::OK, "{}", path);
            assert_eq!(&body[..], expected.as_bytes(), "{}", path);
        }
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let (status, _, body) = send(router_with(&[("/a", "alpha")]), get("/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(&body[..], b"404 page not found");
    }

    #[tokio::test]
    async fn redirect_to_subtree_keeps_query() {
        let (status, headers, _) = send(router_with(&[("/docs/", "docs")]), get("/docs?page=2")).await;
        assert_eq!(status, StatusCode::MOVED_PERMANENTLY);
        assert_eq!(headers.get(header::LOCATION).unwrap(), "/docs/?page=2");
    }

    #[tokio::test]
    async fn request_id_generated_and_propagated() {
        let (_, headers, _) = send(router_with(&[]), get("/liveness")).await;
        assert!(headers.contains_key("x-request-id"));

        let request = Request::get("/liveness")
            .header("x-request-id", "abc-123")
            .body(Body::empty())
            .unwrap();
        let (_, headers, _) = send(router_with(&[]), request).await;
        assert_eq!(headers.get("x-request-id").unwrap(), "abc-123");
    }

    #[tokio::test]
    async fn rpc_liveness_route_uses_configured_service() {
        let mut config = HostConfig::default();
        config.rpc.service = "agent.v1.AgentService".to_string();
        let router = HttpServer::new(Arc::new(Registry::new()), &config).router();

        let request = Request::post("/agent.v1.AgentService/Liveness")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let (status, _, body) = send(router, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(&body[..], br#"{"status":"serving"}"#);
    }
}
