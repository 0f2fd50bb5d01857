//! Read snapshots and the caches they own.
//!
//! # Responsibilities
//! - Own the element-scoped and snapshot-scoped stores of one read
//! - Hand out snapshots with unique ids for concurrent requests
//!
//! # Design Decisions
//! - Every snapshot gets fresh stores; nothing cached in one snapshot is
//!   visible from another
//! - Dropping the snapshot ends both scopes

use std::sync::atomic::{AtomicU64, Ordering};

use crate::cache::{Scope, ScopeStore, SnapshotCaches};
use crate::observability::metrics;

/// One coherent, time-bounded read of the content graph.
#[derive(Debug)]
pub struct Snapshot {
    id: u64,
    element_cache: ScopeStore,
    snapshot_cache: ScopeStore,
}

impl Snapshot {
    /// Create a snapshot with empty stores.
    pub fn new(id: u64) -> Self {
        Self {
            id,
            element_cache: ScopeStore::new(Scope::Element),
            snapshot_cache: ScopeStore::new(Scope::Snapshot),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

impl SnapshotCaches for Snapshot {
    fn element_cache(&self) -> &ScopeStore {
        &self.element_cache
    }

    fn snapshot_cache(&self) -> &ScopeStore {
        &self.snapshot_cache
    }
}

impl Drop for Snapshot {
    fn drop(&mut self) {
        tracing::trace!(
            snapshot_id = self.id,
            element_entries = self.element_cache.len(),
            snapshot_entries = self.snapshot_cache.len(),
            "Snapshot released"
        );
    }
}

/// Opens snapshots for incoming reads.
#[derive(Debug, Default)]
pub struct SnapshotService {
    next_id: AtomicU64,
}

impl SnapshotService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new snapshot for one read transaction.
    pub fn open(&self) -> Snapshot {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        metrics::record_snapshot_opened();
        tracing::trace!(snapshot_id = id, "Snapshot opened");
        Snapshot::new(id)
    }
}
