//! Admin request handling.
//!
//! # Responsibilities
//! - Map the request method onto list / update / reject
//! - Turn a JSON payload into a published route
//! - Report rejected payloads as 406 with the reason in the body
//!
//! # Design Decisions
//! - The body is read with a fixed size limit before parsing
//! - A rejected payload never reaches the routing slot

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::observability::metrics;
use crate::routing::{RouteEntry, RouteError, RouteSlot, RouteSpec};

/// Methods the admin surface distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminMethod {
    Get,
    Post,
    Other,
}

impl From<&Method> for AdminMethod {
    fn from(method: &Method) -> Self {
        match *method {
            Method::GET => AdminMethod::Get,
            Method::POST => AdminMethod::Post,
            _ => AdminMethod::Other,
        }
    }
}

/// Errors reported to admin clients.
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    /// The payload was rejected; the routing table is unchanged.
    #[error(transparent)]
    Rejected(#[from] RouteError),

    /// The request body could not be read (too large, or the client went away).
    #[error("unreadable body: {0}")]
    Body(String),

    #[error("Method Not Allowed")]
    MethodNotAllowed,
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        match self {
            AdminError::MethodNotAllowed => {
                (StatusCode::METHOD_NOT_ALLOWED, self.to_string()).into_response()
            }
            AdminError::Rejected(_) | AdminError::Body(_) => (
                StatusCode::NOT_ACCEPTABLE,
                format!("Not Acceptable: {self}"),
            )
                .into_response(),
        }
    }
}

/// Read and write access to the routing table.
#[derive(Debug, Clone)]
pub struct AdminController {
    routes: Arc<RouteSlot>,
}

impl AdminController {
    pub fn new(routes: Arc<RouteSlot>) -> Self {
        Self { routes }
    }

    /// Current routes keyed by normalized prefix.
    pub fn get(&self) -> BTreeMap<String, Arc<RouteEntry>> {
        self.routes.load().snapshot().clone()
    }

    /// Validate a JSON route payload and publish it.
    ///
    /// Returns the entry as stored. A rejected payload leaves the table
    /// untouched.
    pub fn post(&self, payload: &[u8]) -> Result<Arc<RouteEntry>, AdminError> {
        let outcome = RouteSpec::from_json(payload)
            .and_then(RouteEntry::try_from)
            .and_then(|entry| self.routes.publish(entry));

        match outcome {
            Ok((entry, generation)) => {
                tracing::info!(
                    path = %entry.path(),
                    address = %entry.address(),
                    generation,
                    "Route published"
                );
                metrics::record_route_update("published");
                metrics::record_route_count(self.routes.load().len());
                Ok(entry)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Route update rejected");
                metrics::record_route_update("rejected");
                Err(e.into())
            }
        }
    }
}

/// State shared by the admin handlers.
#[derive(Clone)]
pub struct AdminState {
    pub controller: AdminController,
    pub max_body_bytes: usize,
}

/// Single entry point for the admin listener; dispatches on method.
pub async fn admin_handler(State(state): State<AdminState>, request: Request<Body>) -> Response {
    match AdminMethod::from(request.method()) {
        AdminMethod::Get => Json(state.controller.get()).into_response(),
        AdminMethod::Post => {
            let payload = match axum::body::to_bytes(request.into_body(), state.max_body_bytes).await {
                Ok(bytes) => bytes,
                Err(e) => return AdminError::Body(e.to_string()).into_response(),
            };
            match state.controller.post(&payload) {
                Ok(entry) => (StatusCode::CREATED, Json(entry)).into_response(),
                Err(e) => e.into_response(),
            }
        }
        AdminMethod::Other => AdminError::MethodNotAllowed.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> AdminController {
        AdminController::new(Arc::new(RouteSlot::new()))
    }

    #[test]
    fn test_method_mapping() {
        assert_eq!(AdminMethod::from(&Method::GET), AdminMethod::Get);
        assert_eq!(AdminMethod::from(&Method::POST), AdminMethod::Post);
        assert_eq!(AdminMethod::from(&Method::PUT), AdminMethod::Other);
        assert_eq!(AdminMethod::from(&Method::HEAD), AdminMethod::Other);
        assert_eq!(AdminMethod::from(&Method::DELETE), AdminMethod::Other);
    }

    #[test]
    fn test_post_then_get() {
        let admin = controller();
        let stored = admin
            .post(br#"{"address": "http://a.internal", "path": "/api"}"#)
            .unwrap();
        assert_eq!(stored.path(), "/api/");

        let routes = admin.get();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes["/api/"].address(), "http://a.internal");
    }

    #[test]
    fn test_https_upstream_accepted() {
        let admin = controller();
        let stored = admin
            .post(br#"{"address": "https://api.example.com", "path": "/api"}"#)
            .unwrap();
        assert_eq!(stored.address(), "https://api.example.com");
        assert_eq!(admin.get().len(), 1);
    }

    #[test]
    fn test_second_post_replaces_first() {
        let admin = controller();
        admin.post(br#"{"address": "http://a.internal"}"#).unwrap();
        admin.post(br#"{"address": "http://b.internal", "path": "/"}"#).unwrap();

        let routes = admin.get();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes["/"].address(), "http://b.internal");
    }

    #[test]
    fn test_rejected_posts_leave_table_unchanged() {
        let admin = controller();
        admin.post(br#"{"address": "http://a.internal"}"#).unwrap();

        for payload in [
            &br#"{"path": "/api"}"#[..],
            br#"{"address": "", "path": "/api"}"#,
            br#"{"address": "not a url", "path": "/api"}"#,
            b"{broken",
        ] {
            assert!(matches!(admin.post(payload), Err(AdminError::Rejected(_))));
        }

        let routes = admin.get();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes["/"].address(), "http://a.internal");
    }

    #[test]
    fn test_error_responses() {
        let response = AdminError::Rejected(RouteError::MissingAddress).into_response();
        assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);

        let response = AdminError::MethodNotAllowed.into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
