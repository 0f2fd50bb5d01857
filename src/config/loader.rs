//! Configuration loading from disk.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::DeliveryConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<DeliveryConfig, ConfigError> {
    let config: DeliveryConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<DeliveryConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("delivery-config-{}.toml", uuid::Uuid::new_v4()));
        fs::write(
            &path,
            r#"
            [listener]
            bind_address = "127.0.0.1:3000"

            [[domains]]
            id = 1
            name = "localhost/en"
            root_content_id = 1000
            culture = "en-US"
            "#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:3000");
        assert_eq!(config.domains.len(), 1);

        std::fs::remove_file(&path).unwrap_or_default();
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_validation_errors_are_reported() {
        let err = parse_config(
            r#"
            [[domains]]
            id = 1
            name = "localhost:abc"
            root_content_id = 1000
            culture = "en-US"
            "#,
        )
        .unwrap_err();

        assert!(matches!(err, ConfigError::Validation(ref errors) if errors.len() == 1));
        assert!(err.to_string().starts_with("Validation failed: domain 1:"));
    }

    #[test]
    fn test_parse_error() {
        let err = parse_config("domains = 5").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
