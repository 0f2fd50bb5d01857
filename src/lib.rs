//! Content delivery core: scope-aware property value caching and
//! domain-based request route resolution.

pub mod cache;
pub mod config;
pub mod content;
pub mod http;
pub mod observability;
pub mod routing;

pub use cache::{CacheLevel, PropertyValueMemoizer, SnapshotCaches};
pub use config::DeliveryConfig;
pub use content::{ContentElement, PropertyDescriptor, PropertyValue, Snapshot, SnapshotService};
pub use http::DeliveryServer;
pub use routing::{DomainTable, RequestContext, RequestRouteResolver};
