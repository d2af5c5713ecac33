//! Route entries and the admin payload they are built from.
//!
//! # Responsibilities
//! - Deserialize the admin payload (`address`, `path`, `metadata`)
//! - Normalize path prefixes (always end with `/`)
//! - Reject entries without an upstream address
//!
//! # Design Decisions
//! - Entries are immutable once built; a newer entry for the same prefix
//!   supersedes the old one, it never edits it
//! - Metadata is kept as raw JSON and echoed back verbatim; an explicit
//!   `null` is kept too, only an absent field is omitted

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::value::RawValue;

/// Errors produced while turning an admin payload into a published route.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    /// The payload carried no (or an empty) upstream address.
    #[error("address must be set")]
    MissingAddress,

    /// The upstream address could not be used as a forwarding target.
    #[error("invalid upstream address {address:?}: {reason}")]
    InvalidUpstreamAddress { address: String, reason: String },

    /// The payload was not a JSON route object.
    #[error("{0}")]
    MalformedPayload(#[from] serde_json::Error),
}

/// Raw route payload as posted to the admin listener.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RouteSpec {
    pub address: Option<String>,
    pub path: Option<String>,
    #[serde(deserialize_with = "present_raw")]
    pub metadata: Option<Box<RawValue>>,
}

/// `Some` whenever the field is present, including a literal `null`.
fn present_raw<'de, D>(deserializer: D) -> Result<Option<Box<RawValue>>, D::Error>
where
    D: Deserializer<'de>,
{
    Box::<RawValue>::deserialize(deserializer).map(Some)
}

impl RouteSpec {
    /// Parse a JSON payload.
    pub fn from_json(payload: &[u8]) -> Result<Self, RouteError> {
        Ok(serde_json::from_slice(payload)?)
    }
}

/// A single path-prefix to upstream association.
#[derive(Debug, Clone, Serialize)]
pub struct RouteEntry {
    address: String,
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<Box<RawValue>>,
}

impl RouteEntry {
    /// Build an entry for `address` under the (normalized) `path` prefix.
    pub fn new(
        address: impl Into<String>,
        path: Option<&str>,
        metadata: Option<Box<RawValue>>,
    ) -> Result<Self, RouteError> {
        let address = address.into();
        if address.is_empty() {
            return Err(RouteError::MissingAddress);
        }
        Ok(Self {
            address,
            path: normalize_prefix(path.unwrap_or_default()),
            metadata,
        })
    }

    /// Upstream base address, exactly as posted.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Normalized path prefix; the lookup key of the entry.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Opaque metadata, if any was posted.
    pub fn metadata(&self) -> Option<&RawValue> {
        self.metadata.as_deref()
    }
}

impl TryFrom<RouteSpec> for RouteEntry {
    type Error = RouteError;

    fn try_from(spec: RouteSpec) -> Result<Self, Self::Error> {
        let address = spec.address.unwrap_or_default();
        RouteEntry::new(address, spec.path.as_deref(), spec.metadata)
    }
}

/// Ensure a prefix ends with `/`. An empty prefix becomes `/`.
pub fn normalize_prefix(path: &str) -> String {
    if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{path}/")
    }
}
