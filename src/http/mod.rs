//! HTTP listener subsystem.
//!
//! # Data Flow
//! ```text
//! Proxy listener
//!     → request ID + trace layers
//!     → proxy::dispatcher (snapshot table, forward)
//!
//! Admin listener
//!     → trace layer
//!     → admin::handlers (GET lists, POST publishes)
//!
//! Both share one routing::RouteSlot.
//! ```

pub mod server;

pub use server::{HttpServer, X_REQUEST_ID};
