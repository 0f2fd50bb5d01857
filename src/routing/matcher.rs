//! Domain matching logic.
//!
//! # Responsibilities
//! - Match host (exact match, case-insensitive, optional port)
//! - Match path prefix on segment boundaries
//! - Hand back the unmatched remainder of the path untouched
//!
//! # Design Decisions
//! - Host matching is ASCII case-insensitive, on storage and lookup alike
//! - Path prefix comparison is ASCII case-insensitive; the remainder keeps
//!   its original casing and encoding
//! - Prefixes match decoded or percent-encoded request paths
//! - `/en` matches `/en` and `/en/...`, never `/english`
//! - No regex to guarantee O(n) matching

use crate::routing::domain::split_host_port;

/// Matches the request host, and the port when one is configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostMatcher {
    expected_host: String,
    port: Option<u16>,
}

impl HostMatcher {
    /// Create a new host matcher.
    /// The host is ASCII-lowercased; non-ASCII hosts are expected in punycode.
    pub fn new(host: impl Into<String>, port: Option<u16>) -> Self {
        Self {
            expected_host: host.into().to_ascii_lowercase(),
            port,
        }
    }

    pub fn host(&self) -> &str {
        &self.expected_host
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Returns true if the request authority (`host[:port]`) matches.
    /// Without a configured port, the request port is ignored.
    pub fn matches(&self, authority: &str) -> bool {
        let Some((host, port)) = split_host_port(authority) else {
            return false;
        };
        if !host.eq_ignore_ascii_case(&self.expected_host) {
            return false;
        }
        match self.port {
            Some(expected) => port == Some(expected),
            None => true,
        }
    }
}

/// Matches a segment-aligned path prefix.
///
/// Request paths arrive percent-encoded while configured prefixes are
/// usually written decoded, so both spellings of the prefix are accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPrefixMatcher {
    /// Decoded prefix without leading/trailing slashes. Empty matches every path.
    prefix: String,
    /// `prefix` with each segment percent-encoded.
    encoded: String,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher. An already encoded prefix is decoded first.
    pub fn new(prefix: impl AsRef<str>) -> Self {
        let trimmed = prefix.as_ref().trim_matches('/');
        let prefix = match urlencoding::decode(trimmed) {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => trimmed.to_string(),
        };
        let encoded = prefix
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");

        Self { prefix, encoded }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The prefix as it appears in a percent-encoded request path.
    pub fn encoded_prefix(&self) -> &str {
        &self.encoded
    }

    pub fn is_empty(&self) -> bool {
        self.prefix.is_empty()
    }

    /// Strip the prefix from `path`.
    ///
    /// Returns what follows the prefix and its separating slash, or `None`
    /// when the prefix does not match on a segment boundary. One leading
    /// slash on `path` is optional. `path` may be decoded or percent-encoded;
    /// the remainder is returned exactly as it appears in `path`.
    pub fn strip<'p>(&self, path: &'p str) -> Option<&'p str> {
        let path = path.strip_prefix('/').unwrap_or(path);
        if self.prefix.is_empty() {
            return Some(path);
        }

        strip_segment_prefix(&self.prefix, path)
            .or_else(|| strip_segment_prefix(&self.encoded, path))
    }
}

fn strip_segment_prefix<'p>(prefix: &str, path: &'p str) -> Option<&'p str> {
    let head = path.get(..prefix.len())?;
    if !head.eq_ignore_ascii_case(prefix) {
        return None;
    }

    let rest = &path[prefix.len()..];
    if rest.is_empty() {
        Some(rest)
    } else {
        rest.strip_prefix('/')
    }
}
