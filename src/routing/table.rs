//! Routing table and its compiled dispatch list.
//!
//! # Responsibilities
//! - Store routes keyed by normalized path prefix
//! - Compile every route into a ready-to-forward [`Upstream`]
//! - Resolve a request host/path to the most specific upstream
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Every update builds a new table and recompiles the whole dispatch
//!   list; a table is never patched in place
//! - O(n) prefix scan, longest prefix first (route counts are small)
//! - Host-qualified prefixes are tried before plain path prefixes

use std::collections::BTreeMap;
use std::sync::Arc;

use url::Url;

use crate::routing::matcher::RoutePattern;
use crate::routing::route::{RouteEntry, RouteError};

/// A route compiled for dispatch: its pattern plus the parsed target.
#[derive(Debug)]
pub struct Upstream {
    pattern: RoutePattern,
    target: Url,
    entry: Arc<RouteEntry>,
}

impl Upstream {
    fn compile(entry: Arc<RouteEntry>) -> Result<Self, RouteError> {
        let target = parse_upstream(entry.address())?;
        Ok(Self {
            pattern: RoutePattern::parse(entry.path()),
            target,
            entry,
        })
    }

    /// Parsed upstream base URL.
    pub fn target(&self) -> &Url {
        &self.target
    }

    /// The registered prefix, used as a label in logs and metrics.
    pub fn prefix(&self) -> &str {
        self.entry.path()
    }
}

/// Parse and check an upstream base address.
fn parse_upstream(address: &str) -> Result<Url, RouteError> {
    let invalid = |reason: String| RouteError::InvalidUpstreamAddress {
        address: address.to_string(),
        reason,
    };

    let url = Url::parse(address).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {:?}", url.scheme())));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }
    Ok(url)
}

/// Snapshot of all active routes plus the dispatch list derived from them.
#[derive(Debug, Default)]
pub struct RoutingTable {
    entries: BTreeMap<String, Arc<RouteEntry>>,
    /// Host-qualified upstreams, most specific first.
    host_routes: Vec<Arc<Upstream>>,
    /// Plain path upstreams, most specific first.
    path_routes: Vec<Arc<Upstream>>,
    generation: u64,
}

impl RoutingTable {
    /// An empty table (generation 0).
    pub fn new() -> Self {
        Self::default()
    }

    fn build(entries: BTreeMap<String, Arc<RouteEntry>>, generation: u64) -> Result<Self, RouteError> {
        let mut host_routes = Vec::new();
        let mut path_routes = Vec::new();
        for entry in entries.values() {
            let upstream = Arc::new(Upstream::compile(Arc::clone(entry))?);
            if upstream.pattern.is_host_qualified() {
                host_routes.push(upstream);
            } else {
                path_routes.push(upstream);
            }
        }
        host_routes.sort_by(|a, b| b.pattern.specificity().cmp(&a.pattern.specificity()));
        path_routes.sort_by(|a, b| b.pattern.specificity().cmp(&a.pattern.specificity()));

        Ok(Self {
            entries,
            host_routes,
            path_routes,
            generation,
        })
    }

    /// Return a new table equal to this one with `entry` inserted under its
    /// prefix, replacing any previous entry there. `self` is left untouched.
    pub fn with_updated_entry(&self, entry: RouteEntry) -> Result<Self, RouteError> {
        self.with_shared_entry(Arc::new(entry))
    }

    pub(crate) fn with_shared_entry(&self, entry: Arc<RouteEntry>) -> Result<Self, RouteError> {
        let mut entries = self.entries.clone();
        entries.insert(entry.path().to_string(), entry);
        Self::build(entries, self.generation + 1)
    }

    /// All routes keyed by normalized prefix.
    pub fn snapshot(&self) -> &BTreeMap<String, Arc<RouteEntry>> {
        &self.entries
    }

    /// The route stored under `prefix`, if any.
    pub fn get(&self, prefix: &str) -> Option<&Arc<RouteEntry>> {
        self.entries.get(prefix)
    }

    /// Resolve a bare path: the longest registered path prefix wins, `/`
    /// catches everything else when present.
    pub fn dispatch_for(&self, path: &str) -> Option<Arc<Upstream>> {
        self.path_routes
            .iter()
            .find(|u| u.pattern.matches(None, path))
            .cloned()
    }

    /// Resolve a request: host-qualified prefixes first, then plain paths.
    pub fn route_request(&self, host: Option<&str>, path: &str) -> Option<Arc<Upstream>> {
        if host.is_some() {
            if let Some(upstream) = self.host_routes.iter().find(|u| u.pattern.matches(host, path)) {
                return Some(Arc::clone(upstream));
            }
        }
        self.dispatch_for(path)
    }

    /// Number of routes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no route has been published yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Monotonic version; 0 for the initial empty table.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
