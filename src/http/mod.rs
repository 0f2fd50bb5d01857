//! HTTP adapter.
//!
//! # Data Flow
//! ```text
//! Client Request
//!     → request.rs (request ID, scheme/host/path extraction)
//!     → server.rs middleware (RequestRouteResolver::resolve)
//!     → ResolvedRoute request extension
//!     → content handler (JSON route description)
//! ```

pub mod request;
pub mod server;

pub use server::{DeliveryServer, ResolvedRoute};
