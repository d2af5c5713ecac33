//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Admin update (RouteEntry)
//!     → slot.rs (serialize writers, take current table)
//!     → table.rs (copy entries, insert, recompile dispatch list)
//!     → slot.rs (atomic swap of Arc<RoutingTable>)
//!
//! Incoming Request (host, path)
//!     → slot.rs (atomic load of current table)
//!     → table.rs (longest matching prefix)
//!     → matcher.rs (evaluate host/path conditions)
//!     → Return: matched Upstream or NoMatch
//! ```
//!
//! # Design Decisions
//! - Tables are immutable; updates publish a whole new table
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same table and request always pick the same route
//! - Most specific prefix wins

pub mod matcher;
pub mod route;
pub mod slot;
pub mod table;

pub use route::{RouteEntry, RouteError, RouteSpec};
pub use slot::RouteSlot;
pub use table::{RoutingTable, Upstream};
