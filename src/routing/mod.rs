//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (scheme, host, path)
//!     → resolver.rs (load current DomainTable)
//!     → table.rs (host lookup, most specific candidate first)
//!     → matcher.rs (host/port + segment-aligned prefix)
//!     → Return: "{root_content_id}/{remainder}" or the path unchanged
//!
//! Table Compilation (at startup and on reload):
//!     DomainConfig[]
//!     → domain.rs (parse host, port, prefix; detect wildcards)
//!     → Group by host, sort by specificity
//!     → Freeze as immutable DomainTable
//!     → Atomic swap into the resolver
//! ```
//!
//! # Design Decisions
//! - Tables compiled once per configuration generation, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always matches same domain

pub mod domain;
pub mod matcher;
pub mod resolver;
pub mod table;

pub use domain::{Domain, DomainName, DomainNameError};
pub use resolver::{
    ContentRoute, CurrentRequestAccessor, NoRequest, RequestContext, RequestRouteResolver,
};
pub use table::{DomainMatch, DomainSource, DomainTable};
