//! Model configuration
//!
//! Policy choices that are not per-country data: where the platform
//! commission is counted and which factor version comparisons load.

use crate::factors::LATEST_VERSION;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Module that carries the platform commission
///
/// Commission is counted exactly once, in the chosen module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommissionPlacement {
    /// M6 marketing & acquisition
    #[default]
    Marketing,
    /// M7 payment fees
    Payment,
}

/// Calculator configuration
///
/// # Example
/// ```
/// use crossborder_cost_core_rs::calculator::{CommissionPlacement, ModelConfig};
///
/// let config = ModelConfig::from_json_str(r#"{"commission_placement": "payment"}"#).unwrap();
/// assert_eq!(config.commission_placement, CommissionPlacement::Payment);
/// assert_eq!(config.factor_version, "latest");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub commission_placement: CommissionPlacement,

    /// Factor version requested from a `CostFactorSource`
    pub factor_version: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            commission_placement: CommissionPlacement::Marketing,
            factor_version: LATEST_VERSION.to_string(),
        }
    }
}

impl ModelConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: ModelConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.factor_version.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "factor_version must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ModelConfig::default();
        assert_eq!(config.commission_placement, CommissionPlacement::Marketing);
        assert_eq!(config.factor_version, LATEST_VERSION);
    }

    #[test]
    fn test_empty_json_yields_defaults() {
        let config = ModelConfig::from_json_str("{}").unwrap();
        assert_eq!(config, ModelConfig::default());
    }

    #[test]
    fn test_empty_version_rejected() {
        let err = ModelConfig::from_json_str(r#"{"factor_version": " "}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = ModelConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
