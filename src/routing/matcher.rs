//! Route pattern matching.
//!
//! # Responsibilities
//! - Split a normalized prefix into an optional host and a path prefix
//! - Match host (exact, case-insensitive) and path prefix (case-sensitive)
//! - Combine conditions with AND semantics
//!
//! # Design Decisions
//! - Host matching is case-insensitive (RFC 9110)
//! - Path matching is case-sensitive
//! - No regex, a pattern is a plain string prefix

/// A compiled route pattern.
///
/// `"/api/"` matches any path starting with `/api/`; `"host.example/api/"`
/// additionally requires the request host to be `host.example`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    host: Option<String>,
    path_prefix: String,
}

impl RoutePattern {
    /// Compile a normalized prefix.
    pub fn parse(prefix: &str) -> Self {
        if prefix.starts_with('/') {
            return Self {
                host: None,
                path_prefix: prefix.to_string(),
            };
        }
        match prefix.find('/') {
            Some(idx) => Self {
                host: Some(prefix[..idx].to_lowercase()),
                path_prefix: prefix[idx..].to_string(),
            },
            None => Self {
                host: Some(prefix.to_lowercase()),
                path_prefix: "/".to_string(),
            },
        }
    }

    /// Whether the pattern is qualified by a host.
    pub fn is_host_qualified(&self) -> bool {
        self.host.is_some()
    }

    /// Returns true if the request host and path satisfy the pattern.
    pub fn matches(&self, host: Option<&str>, path: &str) -> bool {
        if let Some(expected) = &self.host {
            let host_ok = host
                .map(|h| strip_port(h).eq_ignore_ascii_case(expected))
                .unwrap_or(false);
            if !host_ok {
                return false;
            }
        }
        path.starts_with(&self.path_prefix)
    }

    /// Length used to rank competing matches; longer is more specific.
    pub fn specificity(&self) -> usize {
        self.host.as_ref().map_or(0, String::len) + self.path_prefix.len()
    }
}

/// Drop a trailing `:port` from a host, leaving bracketed IPv6 intact.
fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        return match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        };
    }
    match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_pattern() {
        let pattern = RoutePattern::parse("/api/");
        assert!(!pattern.is_host_qualified());
        assert!(pattern.matches(None, "/api/v1"));
        assert!(pattern.matches(Some("anything"), "/api/"));
        assert!(!pattern.matches(None, "/api"));
        assert!(!pattern.matches(None, "/images"));
    }

    #[test]
    fn test_host_pattern() {
        let pattern = RoutePattern::parse("host.example/");
        assert!(pattern.is_host_qualified());
        assert!(pattern.matches(Some("host.example"), "/"));
        assert!(pattern.matches(Some("HOST.example:8080"), "/deep/path"));
        assert!(!pattern.matches(Some("other.example"), "/"));
        assert!(!pattern.matches(None, "/"));
    }

    #[test]
    fn test_host_pattern_with_path() {
        let pattern = RoutePattern::parse("host.example/api/");
        assert!(pattern.matches(Some("host.example"), "/api/users"));
        assert!(!pattern.matches(Some("host.example"), "/other"));
    }

    #[test]
    fn test_specificity_orders_longer_prefixes_first() {
        assert!(RoutePattern::parse("/api/").specificity() > RoutePattern::parse("/").specificity());
        assert!(
            RoutePattern::parse("a.example/api/").specificity()
                > RoutePattern::parse("a.example/").specificity()
        );
    }

    #[test]
    fn test_strip_port() {
        assert_eq!(strip_port("example.com:80"), "example.com");
        assert_eq!(strip_port("example.com"), "example.com");
        assert_eq!(strip_port("[::1]:8080"), "[::1]");
    }
}
