//! The single shared reference to the live routing table.

use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;

use crate::routing::route::{RouteEntry, RouteError};
use crate::routing::table::RoutingTable;

/// Guarded slot holding the current [`RoutingTable`].
///
/// Readers take a snapshot with a single atomic load and never wait on
/// writers. Writers are serialized by a mutex that covers only the
/// rebuild-and-swap, so concurrent updates cannot overwrite each other.
/// No lock is held while a request is being forwarded.
#[derive(Debug, Default)]
pub struct RouteSlot {
    current: ArcSwap<RoutingTable>,
    writer: Mutex<()>,
}

impl RouteSlot {
    /// A slot holding an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current table.
    pub fn load(&self) -> Arc<RoutingTable> {
        self.current.load_full()
    }

    /// Publish `entry` on top of the current table.
    ///
    /// On success the new table is visible to every load that starts after
    /// this returns. On failure the current table is left as it was.
    pub fn publish(&self, entry: RouteEntry) -> Result<(Arc<RouteEntry>, u64), RouteError> {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);

        let stored = Arc::new(entry);
        let next = self.current.load().with_shared_entry(Arc::clone(&stored))?;
        let generation = next.generation();
        self.current.store(Arc::new(next));

        Ok((stored, generation))
    }
}
