//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the proxy and admin Axum routers
//! - Wire up middleware (tracing, request ID)
//! - Share one route slot between both listeners
//! - Serve both listeners until shutdown

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{http::HeaderName, Router};
use tokio::net::TcpListener;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::admin::setup_admin_router;
use crate::config::ProxyConfig;
use crate::lifecycle::{Listeners, Shutdown};
use crate::proxy::{proxy_handler, Forwarder, ProxyDispatcher};
use crate::routing::RouteSlot;

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// The proxy: one shared routing table served on two listeners.
pub struct HttpServer {
    config: ProxyConfig,
    routes: Arc<RouteSlot>,
}

impl HttpServer {
    /// Create a server with an empty routing table.
    pub fn new(config: ProxyConfig) -> Self {
        Self {
            config,
            routes: Arc::new(RouteSlot::new()),
        }
    }

    /// The slot both listeners read from and write to.
    pub fn routes(&self) -> Arc<RouteSlot> {
        Arc::clone(&self.routes)
    }

    /// Router for the public proxy listener.
    pub fn proxy_router(&self) -> Router {
        let dispatcher = ProxyDispatcher::new(self.routes(), Forwarder::new(&self.config.timeouts));
        let request_id = HeaderName::from_static(X_REQUEST_ID);

        Router::new()
            .fallback(proxy_handler)
            .with_state(dispatcher)
            .layer(PropagateRequestIdLayer::new(request_id.clone()))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
    }

    /// Router for the admin listener.
    pub fn admin_router(&self) -> Router {
        setup_admin_router(self.routes(), &self.config.admin)
    }

    /// Serve both listeners until `shutdown` fires.
    ///
    /// The listeners run independently: one failing is logged and does not
    /// stop the other. The first error, if any, is returned once both end.
    pub async fn run(self, listeners: Listeners, shutdown: &Shutdown) -> Result<(), std::io::Error> {
        let proxy = serve("proxy", listeners.proxy, self.proxy_router(), shutdown);
        let admin = serve("admin", listeners.admin, self.admin_router(), shutdown);

        let (proxy, admin) = tokio::join!(proxy, admin);
        proxy.and(admin)
    }
}

async fn serve(
    role: &'static str,
    listener: TcpListener,
    router: Router,
    shutdown: &Shutdown,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!(role, address = %addr, "HTTP server starting");

    let app = router.into_make_service_with_connect_info::<SocketAddr>();
    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.signalled())
        .await;

    match &result {
        Ok(()) => tracing::info!(role, "HTTP server stopped"),
        Err(e) => tracing::error!(role, error = %e, "HTTP server failed"),
    }
    result
}
