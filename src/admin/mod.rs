//! Control-plane subsystem: the admin API.
//!
//! Every path on the admin listener is served by the same handler:
//! `GET` lists routes, `POST` adds or replaces one, anything else is 405.

pub mod handlers;

use std::sync::Arc;

use axum::{routing::any, Router};
use tower_http::trace::TraceLayer;

use crate::config::AdminConfig;
use crate::routing::RouteSlot;
use self::handlers::admin_handler;

pub use self::handlers::{AdminController, AdminError, AdminMethod, AdminState};

pub fn setup_admin_router(routes: Arc<RouteSlot>, config: &AdminConfig) -> Router {
    let state = AdminState {
        controller: AdminController::new(routes),
        max_body_bytes: config.max_body_bytes,
    };

    Router::new()
        .route("/", any(admin_handler))
        .route("/{*path}", any(admin_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
