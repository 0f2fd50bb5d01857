//! Cache key for memoized property values.

use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Which computed value of a property a key refers to.
///
/// A property exposes an internal converted value and an externally
/// exposed (API) value; both may be cached side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueFacet {
    Object,
    Api,
}

impl ValueFacet {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueFacet::Object => "object",
            ValueFacet::Api => "api",
        }
    }
}

/// Composite key shared by the element-scoped and snapshot-scoped stores.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    alias: Arc<str>,
    element: Uuid,
    expanded: bool,
    facet: ValueFacet,
}

impl CacheKey {
    pub fn new(alias: Arc<str>, element: Uuid, expanded: bool, facet: ValueFacet) -> Self {
        Self {
            alias,
            element,
            expanded,
            facet,
        }
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn element(&self) -> Uuid {
        self.element
    }

    pub fn expanded(&self) -> bool {
        self.expanded
    }

    pub fn facet(&self) -> ValueFacet {
        self.facet
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.facet.as_str(),
            self.element,
            self.alias,
            if self.expanded { "expanded" } else { "flat" }
        )
    }
}
