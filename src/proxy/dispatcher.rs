//! Proxy request dispatch.
//!
//! # Responsibilities
//! - Take a snapshot of the live routing table per request
//! - Resolve the request host/path to an upstream
//! - Forward, and map forwarding failures to 502
//!
//! # Design Decisions
//! - The table snapshot is a single atomic load; no lock is held while
//!   the request is in flight
//! - An empty table answers 200 with an empty body
//! - No match on a non-empty table is a plain 404, not an error

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
};

use crate::observability::metrics;
use crate::proxy::forward::Forwarder;
use crate::routing::RouteSlot;

const NOT_FOUND_BODY: &str = "404 page not found";

/// Resolves inbound requests against the current routing table and relays
/// them upstream.
#[derive(Clone)]
pub struct ProxyDispatcher {
    routes: Arc<RouteSlot>,
    forwarder: Forwarder,
}

impl ProxyDispatcher {
    pub fn new(routes: Arc<RouteSlot>, forwarder: Forwarder) -> Self {
        Self { routes, forwarder }
    }

    /// Handle one proxied request.
    pub async fn handle(&self, request: Request<Body>) -> Response {
        let start_time = Instant::now();
        let method = request.method().to_string();
        let request_id = request
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string();

        let table = self.routes.load();
        if table.is_empty() {
            metrics::record_request(&method, 200, "none", start_time);
            return StatusCode::OK.into_response();
        }

        let host = request_host(&request);
        let upstream = match table.route_request(host.as_deref(), request.uri().path()) {
            Some(upstream) => upstream,
            None => {
                tracing::debug!(
                    request_id = %request_id,
                    path = %request.uri().path(),
                    generation = table.generation(),
                    "No route matched"
                );
                metrics::record_request(&method, 404, "none", start_time);
                return (StatusCode::NOT_FOUND, NOT_FOUND_BODY).into_response();
            }
        };
        drop(table);

        tracing::debug!(
            request_id = %request_id,
            method = %method,
            path = %request.uri().path(),
            route = %upstream.prefix(),
            upstream = %upstream.target(),
            "Proxying request"
        );

        let client_addr = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);

        match self.forwarder.forward(&upstream, request, client_addr).await {
            Ok(response) => {
                metrics::record_request(&method, response.status().as_u16(), upstream.prefix(), start_time);
                response
            }
            Err(e) => {
                tracing::warn!(
                    request_id = %request_id,
                    route = %upstream.prefix(),
                    upstream = %upstream.target(),
                    error = %e,
                    "Upstream error"
                );
                metrics::record_request(&method, 502, upstream.prefix(), start_time);
                StatusCode::BAD_GATEWAY.into_response()
            }
        }
    }
}

/// Host the client addressed: URI authority first, then the `Host` header.
fn request_host(request: &Request<Body>) -> Option<String> {
    request
        .uri()
        .host()
        .or_else(|| {
            request
                .headers()
                .get(header::HOST)
                .and_then(|v| v.to_str().ok())
        })
        .map(str::to_string)
}

/// Axum entry point for the proxy listener.
pub async fn proxy_handler(
    State(dispatcher): State<ProxyDispatcher>,
    request: Request<Body>,
) -> Response {
    dispatcher.handle(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimeoutConfig;
    use crate::routing::RouteEntry;

    fn dispatcher() -> (Arc<RouteSlot>, ProxyDispatcher) {
        let routes = Arc::new(RouteSlot::new());
        let dispatcher = ProxyDispatcher::new(Arc::clone(&routes), Forwarder::new(&TimeoutConfig::default()));
        (routes, dispatcher)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_empty_table_answers_ok() {
        let (_, dispatcher) = dispatcher();
        let response = dispatcher.handle(get("/anything")).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_unmatched_path_is_not_found() {
        let (routes, dispatcher) = dispatcher();
        routes
            .publish(RouteEntry::new("http://127.0.0.1:1", Some("/api"), None).unwrap())
            .unwrap();

        let response = dispatcher.handle(get("/other")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], NOT_FOUND_BODY.as_bytes());
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_bad_gateway() {
        let closed = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = closed.local_addr().unwrap();
        drop(closed);

        let (routes, dispatcher) = dispatcher();
        routes
            .publish(RouteEntry::new(format!("http://{addr}"), None, None).unwrap())
            .unwrap();

        let response = dispatcher.handle(get("/")).await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_request_host() {
        let request = Request::builder()
            .uri("/x")
            .header(header::HOST, "host.example:8080")
            .body(Body::empty())
            .unwrap();
        assert_eq!(request_host(&request).as_deref(), Some("host.example:8080"));

        let request = get("http://absolute.example/x");
        assert_eq!(request_host(&request).as_deref(), Some("absolute.example"));

        assert_eq!(request_host(&get("/x")), None);
    }
}
