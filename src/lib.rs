//! Dynamically reconfigurable HTTP reverse proxy.
//!
//! A public listener forwards each request to the upstream registered for
//! the most specific matching path prefix; an admin listener adds or
//! replaces those routes at runtime.

pub mod admin;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod proxy;
pub mod routing;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{RouteEntry, RouteSlot, RoutingTable};
