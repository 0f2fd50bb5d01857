//! Property value memoization.
//!
//! # Responsibilities
//! - Translate a property's [`CacheLevel`] into a store (or no store)
//! - Build the [`CacheKey`] for a property/element/expansion combination
//! - Invoke the computation at most once per key within the chosen scope
//!
//! # Design Decisions
//! - The caches come from an explicit [`SnapshotCaches`] context passed by
//!   the caller, never from process-wide state
//! - Exception-transparent: the computation's error type is returned as is
//! - The expansion flag only affects key equality

use serde_json::Value;
use std::sync::Arc;

use crate::cache::key::{CacheKey, ValueFacet};
use crate::cache::level::CacheLevel;
use crate::cache::store::{CachedValue, Scope, ScopeStore};
use crate::content::{ContentElement, PropertyDescriptor};
use crate::observability::metrics;

/// Access to the stores of the currently active read.
pub trait SnapshotCaches {
    /// Store shared by the elements materialized in this read.
    fn element_cache(&self) -> &ScopeStore;

    /// Store living for the whole read.
    fn snapshot_cache(&self) -> &ScopeStore;

    /// Resolve a scope to its store.
    fn store(&self, scope: Scope) -> &ScopeStore {
        match scope {
            Scope::Element => self.element_cache(),
            Scope::Snapshot => self.snapshot_cache(),
        }
    }
}

/// Single decision point between cache levels and caching behavior.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertyValueMemoizer;

impl PropertyValueMemoizer {
    pub fn new() -> Self {
        Self
    }

    /// Get the converted value of a property, honoring its cache level.
    pub fn get_value<C, F, E>(
        &self,
        caches: &C,
        descriptor: &PropertyDescriptor,
        element: &ContentElement,
        expanded: bool,
        compute: F,
    ) -> Result<CachedValue, E>
    where
        C: SnapshotCaches + ?Sized,
        F: FnOnce() -> Result<Value, E>,
    {
        let key = CacheKey::new(descriptor.alias_arc(), element.key, expanded, ValueFacet::Object);
        self.memoize(caches, descriptor.cache_level(), &key, compute)
    }

    /// Get the externally exposed value of a property.
    ///
    /// Uses the descriptor's external level, or its expansion level when
    /// `expanded` is set.
    pub fn get_external_value<C, F, E>(
        &self,
        caches: &C,
        descriptor: &PropertyDescriptor,
        element: &ContentElement,
        expanded: bool,
        compute: F,
    ) -> Result<CachedValue, E>
    where
        C: SnapshotCaches + ?Sized,
        F: FnOnce() -> Result<Value, E>,
    {
        let key = CacheKey::new(descriptor.alias_arc(), element.key, expanded, ValueFacet::Api);
        self.memoize(caches, descriptor.external_cache_level(expanded), &key, compute)
    }

    fn memoize<C, F, E>(
        &self,
        caches: &C,
        level: CacheLevel,
        key: &CacheKey,
        compute: F,
    ) -> Result<CachedValue, E>
    where
        C: SnapshotCaches + ?Sized,
        F: FnOnce() -> Result<Value, E>,
    {
        match level.scope() {
            None => {
                metrics::record_computation(level);
                compute().map(Arc::new)
            }
            Some(scope) => caches.store(scope).get_or_compute(key, || {
                metrics::record_computation(level);
                compute()
            }),
        }
    }
}
