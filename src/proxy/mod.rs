//! Data-plane subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request (proxy listener)
//!     → dispatcher.rs (snapshot table, resolve upstream)
//!     → forward.rs (rewrite target, relay, stream response back)
//!     → Response to client (upstream verbatim, 404, or 502)
//! ```

pub mod dispatcher;
pub mod forward;

pub use dispatcher::{proxy_handler, ProxyDispatcher};
pub use forward::{ForwardError, Forwarder};
