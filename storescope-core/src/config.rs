//! Service configuration

use crate::{ConfigError, ScopeError, ScopeResult};
use serde::{Deserialize, Serialize};

/// Per-instance settings for a scope resolution service.
///
/// Every service carries its own config, so several independent
/// hierarchies can live in one process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    /// Name of the hierarchy, attached to every log event of the service.
    pub label: String,
    /// Allow single store mode when only one storefront store exists.
    pub single_store_mode: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            label: "default".to_string(),
            single_store_mode: false,
        }
    }
}

impl ServiceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_single_store_mode(mut self, enabled: bool) -> Self {
        self.single_store_mode = enabled;
        self
    }

    /// Parse a YAML document and validate it.
    pub fn from_yaml_str(content: &str) -> ScopeResult<Self> {
        let config: ServiceConfig = serde_yaml::from_str(content).map_err(|e| {
            ScopeError::Config(ConfigError::Parse {
                reason: e.to_string(),
            })
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validates:
    /// - label is non-empty
    /// - label contains no whitespace
    pub fn validate(&self) -> ScopeResult<()> {
        if self.label.is_empty() {
            return Err(ScopeError::Config(ConfigError::InvalidValue {
                field: "label".to_string(),
                value: self.label.clone(),
                reason: "label must not be empty".to_string(),
            }));
        }

        if self.label.chars().any(char::is_whitespace) {
            return Err(ScopeError::Config(ConfigError::InvalidValue {
                field: "label".to_string(),
                value: self.label.clone(),
                reason: "label must not contain whitespace".to_string(),
            }));
        }

        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ServiceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.label, "default");
        assert!(!config.single_store_mode);
    }

    #[test]
    fn test_from_yaml_str() {
        let config =
            ServiceConfig::from_yaml_str("label: eu-shop\nsingle_store_mode: true\n").unwrap();
        assert_eq!(
            config,
            ServiceConfig::new()
                .with_label("eu-shop")
                .with_single_store_mode(true)
        );
    }

    #[test]
    fn test_from_yaml_str_fills_defaults() {
        let config = ServiceConfig::from_yaml_str("single_store_mode: true\n").unwrap();
        assert_eq!(config.label, "default");
    }

    #[test]
    fn test_from_yaml_str_rejects_unknown_fields() {
        let err = ServiceConfig::from_yaml_str("lable: typo\n").unwrap_err();
        assert!(matches!(err, ScopeError::Config(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_validate_rejects_empty_label() {
        let err = ServiceConfig::new().with_label("").validate().unwrap_err();
        assert!(matches!(
            err,
            ScopeError::Config(ConfigError::InvalidValue { ref field, .. }) if field == "label"
        ));
    }
}
