//! Scoped key-value stores with exactly-once computation.
//!
//! # Responsibilities
//! - Hold memoized property values for one scope (element or snapshot)
//! - Compute each key at most once, even under concurrent first access
//! - Leave failed computations uncached so the next access retries
//!
//! # Design Decisions
//! - One single-assignment cell per key in a sharded map (no global lock)
//! - The shard guard is released before the factory runs, so unrelated
//!   keys never wait on each other
//! - No eviction: the store lives exactly as long as its owner
//! - A factory must not read its own key from the same store (the cell
//!   blocks on itself)

use dashmap::DashMap;
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::cache::key::CacheKey;
use crate::observability::metrics;

/// A memoized value. Shared, so repeated reads hand out the same allocation.
pub type CachedValue = Arc<Value>;

/// Lifetime a store is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Lives as long as the materialized content of one snapshot.
    Element,
    /// Lives as long as one read transaction / request.
    Snapshot,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Element => "element",
            Scope::Snapshot => "snapshot",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dictionary-like store bound to one [`Scope`].
pub struct ScopeStore {
    scope: Scope,
    cells: DashMap<CacheKey, Arc<OnceCell<CachedValue>>>,
}

impl ScopeStore {
    /// Create an empty store for the given scope.
    pub fn new(scope: Scope) -> Self {
        Self {
            scope,
            cells: DashMap::new(),
        }
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Return the cached value for `key`, computing it with `factory` on first access.
    ///
    /// Concurrent callers for the same key block until the first one finishes
    /// and then observe its value. An `Err` from the factory is returned
    /// unchanged and nothing is stored.
    pub fn get_or_compute<F, E>(&self, key: &CacheKey, factory: F) -> Result<CachedValue, E>
    where
        F: FnOnce() -> Result<Value, E>,
    {
        let cell = self.cell(key);

        if let Some(value) = cell.get() {
            metrics::record_cache_lookup(self.scope, "hit");
            return Ok(value.clone());
        }

        let mut computed = false;
        let result = cell.get_or_try_init(|| {
            computed = true;
            factory().map(Arc::new)
        });

        match result {
            Ok(value) => {
                // Lost the race to another thread: still a hit from our side.
                let outcome = if computed { "miss" } else { "hit" };
                metrics::record_cache_lookup(self.scope, outcome);
                if computed {
                    tracing::trace!(scope = %self.scope, key = %key, "Computed cache entry");
                }
                Ok(value.clone())
            }
            Err(e) => {
                metrics::record_cache_lookup(self.scope, "error");
                tracing::debug!(scope = %self.scope, key = %key, "Computation failed, entry left empty");
                Err(e)
            }
        }
    }

    /// Return the stored value without computing anything.
    pub fn get(&self, key: &CacheKey) -> Option<CachedValue> {
        self.cells
            .get(key)
            .and_then(|cell| cell.value().get().cloned())
    }

    /// Whether a computed value is stored for `key`.
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.get(key).is_some()
    }

    /// Number of computed entries.
    pub fn len(&self) -> usize {
        self.cells
            .iter()
            .filter(|entry| entry.value().get().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn cell(&self, key: &CacheKey) -> Arc<OnceCell<CachedValue>> {
        if let Some(cell) = self.cells.get(key) {
            return cell.value().clone();
        }
        self.cells.entry(key.clone()).or_default().value().clone()
    }
}

impl fmt::Debug for ScopeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeStore")
            .field("scope", &self.scope)
            .field("entries", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::key::ValueFacet;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;
    use std::thread;
    use uuid::Uuid;

    fn key(alias: &str) -> CacheKey {
        CacheKey::new(Arc::from(alias), Uuid::new_v4(), false, ValueFacet::Object)
    }

    #[test]
    fn test_computes_once() {
        let store = ScopeStore::new(Scope::Snapshot);
        let key = key("title");
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let value = store
                .get_or_compute::<_, ()>(&key, || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(json!("hello"))
                })
                .unwrap();
            assert_eq!(*value, json!("hello"));
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_failure_is_not_cached() {
        let store = ScopeStore::new(Scope::Element);
        let key = key("price");

        let err = store.get_or_compute(&key, || Err::<Value, _>("boom"));
        assert_eq!(err.unwrap_err(), "boom");
        assert!(!store.contains(&key));
        assert!(store.is_empty());

        let value = store.get_or_compute::<_, &str>(&key, || Ok(json!(42))).unwrap();
        assert_eq!(*value, json!(42));
        assert!(store.contains(&key));
    }

    #[test]
    fn test_failure_does_not_poison_other_keys() {
        let store = ScopeStore::new(Scope::Snapshot);
        let bad = key("bad");
        let good = key("good");

        assert!(store.get_or_compute(&bad, || Err::<Value, _>(())).is_err());
        let value = store.get_or_compute::<_, ()>(&good, || Ok(json!(true))).unwrap();
        assert_eq!(*value, json!(true));
    }

    #[test]
    fn test_panicking_factory_leaves_entry_retryable() {
        let store = ScopeStore::new(Scope::Snapshot);
        let key = key("fragile");

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _ = store.get_or_compute::<_, ()>(&key, || panic!("converter blew up"));
        }));
        assert!(outcome.is_err());
        assert!(!store.contains(&key));

        let value = store.get_or_compute::<_, ()>(&key, || Ok(json!("ok"))).unwrap();
        assert_eq!(*value, json!("ok"));
    }

    #[test]
    fn test_concurrent_first_access_computes_once() {
        let store = Arc::new(ScopeStore::new(Scope::Snapshot));
        let key = key("expensive");
        let calls = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                let key = key.clone();
                let calls = calls.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    store
                        .get_or_compute::<_, ()>(&key, || {
                            let n = calls.fetch_add(1, Ordering::SeqCst);
                            thread::sleep(std::time::Duration::from_millis(20));
                            Ok(json!(n))
                        })
                        .unwrap()
                })
            })
            .collect();

        let values: Vec<CachedValue> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(values.iter().all(|v| Arc::ptr_eq(v, &values[0])));
    }
}
