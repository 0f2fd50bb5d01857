//! Request path → content route resolution.
//!
//! # Responsibilities
//! - Read scheme and host from the current request context
//! - Rewrite the matched domain prefix into the domain's root content id
//! - Pass the path through unchanged when nothing matches
//! - Swap in a new domain table atomically on configuration reload
//!
//! # Design Decisions
//! - The request context is an explicit argument, not ambient state
//! - No request context means "host unresolved", never a panic
//! - The unmatched remainder is copied byte-for-byte (no decoding/encoding)
//! - In-flight resolutions keep the table they loaded; reload never blocks them

use arc_swap::ArcSwap;
use serde::Serialize;
use std::sync::Arc;

use crate::observability::metrics;
use crate::routing::table::DomainTable;

/// Scheme, host and path of the in-flight request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub scheme: String,
    /// Authority as sent by the client, e.g. `localhost:8080`.
    pub host: String,
    pub path: String,
}

impl RequestContext {
    pub fn new(scheme: impl Into<String>, host: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
            path: path.into(),
        }
    }
}

/// Access to the current request, or `None` outside a request.
pub trait CurrentRequestAccessor {
    fn current_request(&self) -> Option<&RequestContext>;
}

impl CurrentRequestAccessor for RequestContext {
    fn current_request(&self) -> Option<&RequestContext> {
        Some(self)
    }
}

impl CurrentRequestAccessor for Option<RequestContext> {
    fn current_request(&self) -> Option<&RequestContext> {
        self.as_ref()
    }
}

/// Accessor for code running outside any request.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRequest;

impl CurrentRequestAccessor for NoRequest {
    fn current_request(&self) -> Option<&RequestContext> {
        None
    }
}

/// A resolved, culture-qualified content route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentRoute {
    /// `{root_content_id}/{remainder}`.
    pub route: String,
    pub root_content_id: i32,
    pub culture: String,
    pub domain_id: i32,
}

/// Resolves request paths against the current domain table.
#[derive(Debug)]
pub struct RequestRouteResolver {
    table: ArcSwap<DomainTable>,
}

impl RequestRouteResolver {
    pub fn new(table: DomainTable) -> Self {
        metrics::record_domain_table(table.len());
        Self {
            table: ArcSwap::from_pointee(table),
        }
    }

    /// The table currently used for resolution.
    pub fn table(&self) -> Arc<DomainTable> {
        self.table.load_full()
    }

    /// Replace the domain table. Resolutions already running finish on the old one.
    pub fn reload(&self, table: DomainTable) {
        let domains = table.len();
        let generation = table.generation();
        let previous = self.table.swap(Arc::new(table));
        metrics::record_domain_table(domains);
        tracing::info!(
            previous_generation = previous.generation(),
            generation,
            domains,
            "Domain table reloaded"
        );
    }

    /// Resolve `path` for the current request; `None` when no domain matches.
    pub fn resolve<A>(&self, request: &A, path: &str) -> Option<ContentRoute>
    where
        A: CurrentRequestAccessor + ?Sized,
    {
        let Some(current) = request.current_request() else {
            metrics::record_route_resolution("no_request");
            tracing::debug!(path = %path, "No current request, host unresolved");
            return None;
        };

        let table = self.table.load();
        let Some(found) = table.find_match(&current.host, path) else {
            metrics::record_route_resolution("unmatched");
            tracing::debug!(
                scheme = %current.scheme,
                host = %current.host,
                path = %path,
                "No domain matched"
            );
            return None;
        };

        let domain = found.domain;
        let route = format!("{}/{}", domain.root_content_id(), found.remainder);
        metrics::record_route_resolution("matched");
        tracing::debug!(
            scheme = %current.scheme,
            host = %current.host,
            path = %path,
            domain = %domain.name(),
            route = %route,
            "Resolved content route"
        );

        Some(ContentRoute {
            route,
            root_content_id: domain.root_content_id(),
            culture: domain.culture().to_string(),
            domain_id: domain.id(),
        })
    }

    /// Content route for `path`, or `path` itself when no domain applies.
    ///
    /// `None` and empty paths yield an empty string.
    pub fn get_content_route<A>(&self, request: &A, path: Option<&str>) -> String
    where
        A: CurrentRequestAccessor + ?Sized,
    {
        let path = match path {
            Some(path) if !path.is_empty() => path,
            _ => return String::new(),
        };

        match self.resolve(request, path) {
            Some(resolved) => resolved.route,
            None => path.to_string(),
        }
    }
}
