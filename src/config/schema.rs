//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the delivery service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::routing::{Domain, DomainNameError, DomainSource};

/// Root configuration for the delivery service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DeliveryConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Domain definitions mapping hosts and path prefixes to content roots.
    pub domains: Vec<DomainConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// A configured domain.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DomainConfig {
    /// Unique domain identifier.
    pub id: i32,

    /// Host with optional scheme, port and path prefix (e.g., "example.com/en"),
    /// or `*{root}` for a wildcard domain.
    pub name: String,

    /// Content node the domain's routes are rooted at.
    pub root_content_id: i32,

    /// Culture code (e.g., "en-US").
    #[serde(default)]
    pub culture: String,

    /// Culture-only domain; never matched against request hosts.
    #[serde(default)]
    pub wildcard: bool,

    /// Tie-break among equally specific domains (lower wins).
    #[serde(default)]
    pub sort_order: i32,
}

impl DomainConfig {
    /// Compile into a routing domain.
    pub fn to_domain(&self) -> Result<Domain, DomainNameError> {
        let domain = Domain::new(self.id, self.name.clone(), self.root_content_id, self.culture.clone())?
            .with_sort_order(self.sort_order);
        Ok(if self.wildcard {
            domain.into_wildcard()
        } else {
            domain
        })
    }
}

impl DomainSource for DeliveryConfig {
    fn domains(&self) -> Result<Vec<Domain>, DomainNameError> {
        self.domains.iter().map(DomainConfig::to_domain).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: DeliveryConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.timeouts.request_secs, 30);
        assert!(config.domains.is_empty());
    }

    #[test]
    fn test_domains_table() {
        let config: DeliveryConfig = toml::from_str(
            r#"
            [[domains]]
            id = 1
            name = "localhost/en"
            root_content_id = 1000
            culture = "en-US"

            [[domains]]
            id = 2
            name = "localhost"
            root_content_id = 1046
            culture = "da-DK"
            wildcard = true
            sort_order = 3
            "#,
        )
        .unwrap();

        let domains = config.domains().unwrap();
        assert_eq!(domains.len(), 2);
        assert_eq!(domains[0].domain_name().unwrap().path_prefix(), "en");
        assert!(domains[1].is_wildcard());
        assert_eq!(domains[1].sort_order(), 3);
    }
}
