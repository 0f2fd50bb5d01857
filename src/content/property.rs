//! Property descriptors and per-element property values.

use serde_json::Value;
use std::sync::Arc;

use crate::cache::{CacheLevel, CachedValue, PropertyValueMemoizer, SnapshotCaches};
use crate::content::element::ContentElement;

/// Per-property-type metadata, shared by every element of the type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    alias: Arc<str>,
    cache_level: CacheLevel,
    external_cache_level: CacheLevel,
    external_cache_level_for_expansion: CacheLevel,
}

impl PropertyDescriptor {
    /// Create a descriptor whose external levels default to `cache_level`.
    pub fn new(alias: impl Into<Arc<str>>, cache_level: CacheLevel) -> Self {
        Self {
            alias: alias.into(),
            cache_level,
            external_cache_level: cache_level,
            external_cache_level_for_expansion: cache_level,
        }
    }

    /// Override the levels used for externally exposed values.
    pub fn with_external_levels(mut self, external: CacheLevel, for_expansion: CacheLevel) -> Self {
        self.external_cache_level = external;
        self.external_cache_level_for_expansion = for_expansion;
        self
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub(crate) fn alias_arc(&self) -> Arc<str> {
        self.alias.clone()
    }

    pub fn cache_level(&self) -> CacheLevel {
        self.cache_level
    }

    /// Level for the external value, depending on whether expansion is requested.
    pub fn external_cache_level(&self, expanded: bool) -> CacheLevel {
        if expanded {
            self.external_cache_level_for_expansion
        } else {
            self.external_cache_level
        }
    }
}

/// A property of one materialized element.
///
/// Created fresh each time an element is materialized; the cache entries it
/// writes belong to the snapshot and may outlive it.
#[derive(Debug, Clone)]
pub struct PropertyValue {
    descriptor: Arc<PropertyDescriptor>,
    element: Arc<ContentElement>,
    memoizer: PropertyValueMemoizer,
}

impl PropertyValue {
    pub fn new(descriptor: Arc<PropertyDescriptor>, element: Arc<ContentElement>) -> Self {
        Self {
            descriptor,
            element,
            memoizer: PropertyValueMemoizer::new(),
        }
    }

    pub fn alias(&self) -> &str {
        self.descriptor.alias()
    }

    pub fn descriptor(&self) -> &PropertyDescriptor {
        &self.descriptor
    }

    pub fn element(&self) -> &ContentElement {
        &self.element
    }

    /// Converted value, memoized per the descriptor's cache level.
    pub fn value<C, F, E>(&self, caches: &C, expanded: bool, compute: F) -> Result<CachedValue, E>
    where
        C: SnapshotCaches + ?Sized,
        F: FnOnce() -> Result<Value, E>,
    {
        self.memoizer
            .get_value(caches, &self.descriptor, &self.element, expanded, compute)
    }

    /// Externally exposed value, memoized per the descriptor's external levels.
    pub fn api_value<C, F, E>(&self, caches: &C, expanded: bool, compute: F) -> Result<CachedValue, E>
    where
        C: SnapshotCaches + ?Sized,
        F: FnOnce() -> Result<Value, E>,
    {
        self.memoizer
            .get_external_value(caches, &self.descriptor, &self.element, expanded, compute)
    }
}
