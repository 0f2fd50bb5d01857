//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate domain names, cultures and identifiers
//! - Detect ambiguous domains (same host, port and prefix with equal sort order)
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: DeliveryConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::DeliveryConfig;
use crate::routing::{DomainName, DomainNameError};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid bind address '{0}'")]
    InvalidBindAddress(String),
    #[error("invalid metrics address '{0}'")]
    InvalidMetricsAddress(String),
    #[error("request timeout must be greater than zero")]
    ZeroRequestTimeout,
    #[error("domain id {0} is used more than once")]
    DuplicateDomainId(i32),
    #[error("domain {id}: {source}")]
    InvalidDomainName { id: i32, source: DomainNameError },
    #[error("domain {0} has no culture")]
    MissingCulture(i32),
    #[error("domains {first} and {second} have the same host, prefix and sort order")]
    AmbiguousDomain { first: i32, second: i32 },
}

/// Check a parsed configuration.
pub fn validate_config(config: &DeliveryConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    let mut seen_ids = HashSet::new();
    let mut seen_targets: HashMap<(String, Option<u16>, String, i32), i32> = HashMap::new();

    for domain in &config.domains {
        if !seen_ids.insert(domain.id) {
            errors.push(ValidationError::DuplicateDomainId(domain.id));
        }

        let is_wildcard = domain.wildcard || domain.name.trim_start().starts_with('*');
        if is_wildcard {
            if domain.culture.trim().is_empty() {
                errors.push(ValidationError::MissingCulture(domain.id));
            }
            continue;
        }

        let name = match DomainName::parse(&domain.name) {
            Ok(name) => name,
            Err(source) => {
                errors.push(ValidationError::InvalidDomainName {
                    id: domain.id,
                    source,
                });
                continue;
            }
        };

        if domain.culture.trim().is_empty() {
            errors.push(ValidationError::MissingCulture(domain.id));
        }

        let target = (
            name.host().to_string(),
            name.port(),
            name.path_prefix().to_ascii_lowercase(),
            domain.sort_order,
        );
        match seen_targets.entry(target) {
            Entry::Occupied(first) => errors.push(ValidationError::AmbiguousDomain {
                first: *first.get(),
                second: domain.id,
            }),
            Entry::Vacant(slot) => {
                slot.insert(domain.id);
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
