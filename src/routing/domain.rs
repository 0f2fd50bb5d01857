//! Configured domains and domain-name parsing.
//!
//! A domain name encodes a host, an optional port and an optional path
//! prefix: `localhost/en`, `example.com:8080`, `https://example.com/fr/`.
//! Wildcard domains (`*1046`) carry a culture for a subtree and never match
//! a host.

use thiserror::Error;

use crate::routing::matcher::{HostMatcher, PathPrefixMatcher};

/// Errors raised while parsing a domain name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainNameError {
    #[error("domain name is empty")]
    Empty,
    #[error("domain name '{0}' has no host")]
    MissingHost(String),
    #[error("invalid port in domain name '{0}'")]
    InvalidPort(String),
}

/// Host, port and path prefix parsed from a domain name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainName {
    host: HostMatcher,
    prefix: PathPrefixMatcher,
}

impl DomainName {
    /// Parse a non-wildcard domain name.
    pub fn parse(name: &str) -> Result<Self, DomainNameError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainNameError::Empty);
        }

        let without_scheme = strip_scheme(trimmed);
        let (authority, path) = match without_scheme.find('/') {
            Some(idx) => (&without_scheme[..idx], &without_scheme[idx..]),
            None => (without_scheme, ""),
        };

        let (host, port) = split_host_port(authority)
            .ok_or_else(|| DomainNameError::InvalidPort(name.to_string()))?;
        if host.is_empty() {
            return Err(DomainNameError::MissingHost(name.to_string()));
        }

        Ok(Self {
            host: HostMatcher::new(host, port),
            prefix: PathPrefixMatcher::new(path),
        })
    }

    pub fn host(&self) -> &str {
        self.host.host()
    }

    pub fn port(&self) -> Option<u16> {
        self.host.port()
    }

    /// Path prefix without leading or trailing slashes; empty for host-only domains.
    pub fn path_prefix(&self) -> &str {
        self.prefix.prefix()
    }

    pub(crate) fn host_matcher(&self) -> &HostMatcher {
        &self.host
    }

    pub(crate) fn prefix_matcher(&self) -> &PathPrefixMatcher {
        &self.prefix
    }
}

fn strip_scheme(name: &str) -> &str {
    for scheme in ["http://", "https://"] {
        let matches = name
            .get(..scheme.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(scheme));
        if matches {
            return &name[scheme.len()..];
        }
    }
    name
}

/// Split `host[:port]`, accepting bracketed IPv6 hosts. `None` on a malformed port.
pub(crate) fn split_host_port(authority: &str) -> Option<(&str, Option<u16>)> {
    let (host, port) = if let Some(rest) = authority.strip_prefix('[') {
        match rest.find(']') {
            Some(end) => {
                let host = &authority[..end + 2];
                let tail = &rest[end + 1..];
                match tail.strip_prefix(':') {
                    Some(port) => (host, Some(port)),
                    None if tail.is_empty() => (host, None),
                    None => return None,
                }
            }
            None => return None,
        }
    } else {
        match authority.rsplit_once(':') {
            Some((host, port)) => (host, Some(port)),
            None => (authority, None),
        }
    };

    match port {
        Some(port) => port.parse::<u16>().ok().map(|p| (host, Some(p))),
        None => Some((host, None)),
    }
}

/// A configured host(+path) → content root mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    id: i32,
    name: String,
    root_content_id: i32,
    culture: String,
    sort_order: i32,
    /// `None` for wildcard domains.
    parsed: Option<DomainName>,
}

impl Domain {
    /// Create a domain. Names starting with `*` are wildcard domains.
    pub fn new(
        id: i32,
        name: impl Into<String>,
        root_content_id: i32,
        culture: impl Into<String>,
    ) -> Result<Self, DomainNameError> {
        let name = name.into();
        let parsed = if name.trim_start().starts_with('*') {
            None
        } else {
            Some(DomainName::parse(&name)?)
        };
        Ok(Self {
            id,
            name,
            root_content_id,
            culture: culture.into(),
            sort_order: 0,
            parsed,
        })
    }

    /// Mark the domain as wildcard: culture only, no host matching.
    pub fn into_wildcard(mut self) -> Self {
        self.parsed = None;
        self
    }

    pub fn with_sort_order(mut self, sort_order: i32) -> Self {
        self.sort_order = sort_order;
        self
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root_content_id(&self) -> i32 {
        self.root_content_id
    }

    pub fn culture(&self) -> &str {
        &self.culture
    }

    pub fn sort_order(&self) -> i32 {
        self.sort_order
    }

    pub fn is_wildcard(&self) -> bool {
        self.parsed.is_none()
    }

    /// Parsed host/port/prefix; `None` for wildcard domains.
    pub fn domain_name(&self) -> Option<&DomainName> {
        self.parsed.as_ref()
    }
}
