//! Domain lookup.
//!
//! # Responsibilities
//! - Store the configured domains of one configuration generation
//! - Find the best-matching domain for a request host and path
//! - Return the matched domain or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(1) host lookup via HashMap
//! - O(n) prefix scan within a host (acceptable for typical domain counts)
//! - Candidates pre-sorted by specificity, so first match wins:
//!   longer prefix, then port-specific, then ascending sort order, then id

use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;

use crate::routing::domain::{split_host_port, Domain, DomainNameError};

/// Supplies the configured domains.
pub trait DomainSource {
    fn domains(&self) -> Result<Vec<Domain>, DomainNameError>;
}

impl DomainSource for Vec<Domain> {
    fn domains(&self) -> Result<Vec<Domain>, DomainNameError> {
        Ok(self.clone())
    }
}

/// A matched domain and the part of the path it did not consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainMatch<'t, 'p> {
    pub domain: &'t Domain,
    /// Path after the matched prefix and its separating slash.
    pub remainder: &'p str,
}

/// Sorted, immutable set of domains.
#[derive(Debug, Default)]
pub struct DomainTable {
    generation: u64,
    /// ASCII-lowercased host → candidates, most specific first.
    by_host: HashMap<String, Vec<Arc<Domain>>>,
    wildcards: Vec<Arc<Domain>>,
    len: usize,
}

impl DomainTable {
    /// Build a table from a list of domains.
    pub fn new(domains: Vec<Domain>, generation: u64) -> Self {
        let mut by_host: HashMap<String, Vec<Arc<Domain>>> = HashMap::new();
        let mut wildcards = Vec::new();
        let len = domains.len();

        for domain in domains {
            let domain = Arc::new(domain);
            match domain.domain_name() {
                Some(name) => by_host.entry(name.host().to_string()).or_default().push(domain),
                None => wildcards.push(domain),
            }
        }

        for candidates in by_host.values_mut() {
            candidates.sort_by_key(|d| {
                let name = d.domain_name();
                (
                    Reverse(name.map_or(0, |n| n.path_prefix().len())),
                    name.and_then(|n| n.port()).is_none(),
                    d.sort_order(),
                    d.id(),
                )
            });
        }
        wildcards.sort_by_key(|d| (d.sort_order(), d.id()));

        Self {
            generation,
            by_host,
            wildcards,
            len,
        }
    }

    /// Build a table from a domain source.
    pub fn from_source<S: DomainSource + ?Sized>(
        source: &S,
        generation: u64,
    ) -> Result<Self, DomainNameError> {
        Ok(Self::new(source.domains()?, generation))
    }

    /// Configuration generation this table was built from.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Best domain for `host` (`name[:port]`) and `path`, with the unmatched remainder.
    pub fn find_match<'t, 'p>(&'t self, host: &str, path: &'p str) -> Option<DomainMatch<'t, 'p>> {
        let (hostname, _) = split_host_port(host)?;
        let candidates = self.by_host.get(&hostname.to_ascii_lowercase())?;

        candidates.iter().find_map(|domain| {
            let name = domain.domain_name()?;
            if !name.host_matcher().matches(host) {
                return None;
            }
            name.prefix_matcher()
                .strip(path)
                .map(|remainder| DomainMatch {
                    domain: domain.as_ref(),
                    remainder,
                })
        })
    }

    /// Best domain for `host` and `path`, or `None`.
    pub fn find_best_match(&self, host: &str, path: &str) -> Option<&Domain> {
        self.find_match(host, path).map(|m| m.domain)
    }

    /// All domains (wildcards included) rooted at `root_content_id`.
    pub fn domains_for_root(&self, root_content_id: i32) -> Vec<&Domain> {
        let mut domains: Vec<&Domain> = self
            .by_host
            .values()
            .flatten()
            .chain(self.wildcards.iter())
            .filter(|d| d.root_content_id() == root_content_id)
            .map(|d| d.as_ref())
            .collect();
        domains.sort_by_key(|d| (d.sort_order(), d.id()));
        domains
    }

    /// Wildcard (culture-only) domain assigned to `root_content_id`.
    pub fn wildcard_for_root(&self, root_content_id: i32) -> Option<&Domain> {
        self.wildcards
            .iter()
            .find(|d| d.root_content_id() == root_content_id)
            .map(|d| d.as_ref())
    }
}
