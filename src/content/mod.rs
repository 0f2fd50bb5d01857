//! Content model consumed by the cache.
//!
//! Elements and property descriptors are produced by the content graph;
//! snapshots scope the caches their property values are memoized in.

pub mod element;
pub mod property;
pub mod snapshot;

pub use element::ContentElement;
pub use property::{PropertyDescriptor, PropertyValue};
pub use snapshot::{Snapshot, SnapshotService};
