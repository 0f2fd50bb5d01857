//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → DeliveryConfig (validated, immutable)
//!     → DomainTable compiled from [[domains]]
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → new DomainTable atomically swapped into the resolver
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Invalid reloads are logged and discarded; the current table stays

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{DeliveryConfig, DomainConfig, ListenerConfig, ObservabilityConfig, TimeoutConfig};
pub use validation::ValidationError;
