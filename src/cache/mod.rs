//! Tiered property value cache.
//!
//! # Data Flow
//! ```text
//! PropertyValue read (descriptor, element, expanded)
//!     → memoizer.rs (CacheLevel → scope via dispatch table)
//!         None      → compute every time
//!         Element   → element-scoped store
//!         Elements  → element-scoped store
//!         Snapshot  → snapshot-scoped store
//!     → store.rs (per-key single-assignment cell)
//!     → Return: shared value
//! ```
//!
//! # Design Decisions
//! - Stores belong to a snapshot and die with it (no eviction policy)
//! - Keys carry alias, element key, expansion flag and value facet
//! - Exactly-once computation per key without a global lock

pub mod key;
pub mod level;
pub mod memoizer;
pub mod store;

pub use key::{CacheKey, ValueFacet};
pub use level::CacheLevel;
pub use memoizer::{PropertyValueMemoizer, SnapshotCaches};
pub use store::{CachedValue, Scope, ScopeStore};
