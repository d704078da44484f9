//! Advisor thresholds

use crate::calculator::ConfigError;
use serde::{Deserialize, Serialize};

/// Trigger levels for the advice rules
///
/// Rates and shares are fractions (0.25 = 25 %).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorThresholds {
    /// Gross margin below this is "thin"
    pub target_margin: f64,

    /// M5 share of unit cost above this is "logistics heavy"
    pub logistics_share: f64,

    /// Head-haul share of unit cost above this flags air freight
    pub air_head_haul_share: f64,

    pub high_tariff_rate: f64,

    /// Healthy LTV:CAC
    pub target_ltv_cac: f64,

    pub payment_gateway_rate: f64,

    pub commission_rate: f64,

    /// Months
    pub slow_payback: f64,

    /// Mean provenance confidence below this flags weak data
    pub min_confidence: f64,
}

impl Default for AdvisorThresholds {
    fn default() -> Self {
        Self {
            target_margin: 0.15,
            logistics_share: 0.25,
            air_head_haul_share: 0.10,
            high_tariff_rate: 0.25,
            target_ltv_cac: 3.0,
            payment_gateway_rate: 0.03,
            commission_rate: 0.15,
            slow_payback: 24.0,
            min_confidence: 0.85,
        }
    }
}

impl AdvisorThresholds {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let thresholds: AdvisorThresholds = serde_json::from_str(json)?;
        thresholds.validate()?;
        Ok(thresholds)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let values = [
            ("target_margin", self.target_margin),
            ("logistics_share", self.logistics_share),
            ("air_head_haul_share", self.air_head_haul_share),
            ("high_tariff_rate", self.high_tariff_rate),
            ("target_ltv_cac", self.target_ltv_cac),
            ("payment_gateway_rate", self.payment_gateway_rate),
            ("commission_rate", self.commission_rate),
            ("slow_payback", self.slow_payback),
            ("min_confidence", self.min_confidence),
        ];
        for (name, value) in values {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}
