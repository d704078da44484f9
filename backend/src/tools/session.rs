//! Owned, deserializable tool session
//!
//! The JSON request shape shared by the CLI and the Python bindings:
//!
//! ```json
//! {
//!   "scope": { "weight_kg": 0.5, "unit_cogs": 5.0, ... },
//!   "factor": { "country": "US", "fields": { ... }, ... },
//!   "factors": [ /* extra records for compare_countries */ ],
//!   "overrides": { "vat_rate": 0.2 },
//!   "params": { "logistics_mode": "air" },
//!   "config": { "commission_placement": "marketing" },
//!   "thresholds": { "target_margin": 0.2 }
//! }
//! ```

use super::ToolContext;
use crate::advisor::AdvisorThresholds;
use crate::calculator::{ConfigError, ModelConfig};
use crate::factors::InMemoryFactorSource;
use crate::models::{CostFactorRecord, InvalidParameterError, ProjectScope, UserOverrides};
use crate::scenario::{RawScenarioParameters, ScenarioParameters};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSession {
    pub scope: ProjectScope,

    /// Record for the scope's own country
    pub factor: CostFactorRecord,

    /// Records available to comparisons (the session record is always included)
    #[serde(default)]
    pub factors: Vec<CostFactorRecord>,

    #[serde(default)]
    pub overrides: Option<UserOverrides>,

    #[serde(default)]
    pub params: RawScenarioParameters,

    #[serde(default)]
    pub config: ModelConfig,

    #[serde(default)]
    pub thresholds: AdvisorThresholds,
}

impl ToolSession {
    /// Parse and validate a session document
    ///
    /// # Errors
    ///
    /// `ConfigError::Parse` for malformed JSON, `ConfigError::Invalid` when
    /// the model configuration or advisor thresholds fail validation.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let session: ToolSession = serde_json::from_str(json)?;
        session.validate()?;
        Ok(session)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.config.validate()?;
        self.thresholds.validate()
    }

    /// Factor source over the session record plus `factors`
    pub fn source(&self) -> InMemoryFactorSource {
        let mut source = InMemoryFactorSource::new();
        for record in &self.factors {
            source.insert(record.clone());
        }
        source.insert(self.factor.clone());
        source
    }

    pub fn scenario_parameters(&self) -> Result<ScenarioParameters, InvalidParameterError> {
        ScenarioParameters::try_from(self.params.clone())
    }

    /// Borrow the session as a tool context over `source`
    pub fn context<'a>(
        &'a self,
        source: &'a InMemoryFactorSource,
    ) -> Result<ToolContext<'a>, InvalidParameterError> {
        let mut ctx = ToolContext::new(&self.scope, &self.factor, source)
            .with_params(self.scenario_parameters()?)
            .with_config(self.config.clone())
            .with_thresholds(self.thresholds.clone());
        if let Some(overrides) = &self.overrides {
            ctx = ctx.with_overrides(overrides.clone());
        }
        Ok(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factors::{CostFactorSource, LATEST_VERSION};

    const SESSION: &str = r#"{
        "scope": {
            "weight_kg": 1.0, "unit_cogs": 10.0, "selling_price": 40.0,
            "monthly_volume": 100.0, "target_country": "US",
            "industry": "pet_food", "sales_channel": "shopify"
        },
        "factor": {
            "country": "US", "country_name": "United States",
            "industry": "pet_food", "version": "2024.1", "fields": {}
        },
        "factors": [{
            "country": "DE", "country_name": "Germany",
            "industry": "pet_food", "version": "2024.1", "fields": {}
        }],
        "params": {"logistics_mode": "air"}
    }"#;

    #[test]
    fn test_session_parses_with_defaults() {
        let session = ToolSession::from_json_str(SESSION).unwrap();
        assert!(session.overrides.is_none());
        assert_eq!(session.config, ModelConfig::default());

        let source = session.source();
        assert_eq!(source.len(), 2);
        assert!(source.get_cost_factor("de", "pet_food", LATEST_VERSION).is_some());
    }

    #[test]
    fn test_session_rejects_blank_factor_version() {
        let json = SESSION.replacen(
            r#""params""#,
            r#""config": {"factor_version": ""}, "params""#,
            1,
        );
        let err = ToolSession::from_json_str(&json).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ref msg) if msg.contains("factor_version")));
    }

    #[test]
    fn test_session_rejects_negative_threshold() {
        let json = SESSION.replacen(
            r#""params""#,
            r#""thresholds": {"slow_payback": -1.0}, "params""#,
            1,
        );
        let err = ToolSession::from_json_str(&json).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ref msg) if msg.contains("slow_payback")));
    }

    #[test]
    fn test_session_rejects_unknown_mode() {
        let mut session = ToolSession::from_json_str(SESSION).unwrap();
        session.params.logistics_mode = Some("rail".to_string());
        let source = session.source();
        assert!(session.context(&source).is_err());
    }
}
