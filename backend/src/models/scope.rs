//! Project scope: the product and market being costed
//!
//! All money values are f64 USD. Weight is kilograms.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sales channel the product is listed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalesChannel {
    AmazonFba,
    AmazonFbm,
    Shopify,
    Ebay,
    Walmart,
    TiktokShop,
}

/// Product + market definition
///
/// # Example
/// ```
/// use crossborder_cost_core_rs::{ProjectScope, SalesChannel};
///
/// let scope = ProjectScope::new("US", "pet_food", SalesChannel::AmazonFba)
///     .with_product(0.5, 5.00, 15.99)
///     .with_monthly_volume(500.0);
/// assert!(scope.validate().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectScope {
    /// Product weight (kg)
    pub weight_kg: f64,

    /// Unit cost of goods (USD)
    pub unit_cogs: f64,

    /// Target selling price (USD)
    pub selling_price: f64,

    /// Monthly sales volume (units)
    pub monthly_volume: f64,

    /// Target country (ISO code)
    pub target_country: String,

    /// Industry key
    pub industry: String,

    pub sales_channel: SalesChannel,
}

/// Non-fatal scope problems surfaced to UI layers
///
/// The calculator accepts every numeric input; these only flag inputs that
/// will produce degenerate results.
#[derive(Debug, Clone, Error, PartialEq, Serialize)]
pub enum ScopeWarning {
    #[error("{field} is negative ({value})")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} is not a finite number")]
    NonFinite { field: &'static str },

    #[error("selling_price is zero; margin and ROI will report 0")]
    ZeroPrice,

    #[error("monthly_volume is zero; payback period is unreachable")]
    ZeroVolume,
}

impl ProjectScope {
    pub fn new(
        target_country: impl Into<String>,
        industry: impl Into<String>,
        sales_channel: SalesChannel,
    ) -> Self {
        Self {
            weight_kg: 0.0,
            unit_cogs: 0.0,
            selling_price: 0.0,
            monthly_volume: 0.0,
            target_country: target_country.into(),
            industry: industry.into(),
            sales_channel,
        }
    }

    /// Builder: product weight, COGS and selling price
    pub fn with_product(mut self, weight_kg: f64, unit_cogs: f64, selling_price: f64) -> Self {
        self.weight_kg = weight_kg;
        self.unit_cogs = unit_cogs;
        self.selling_price = selling_price;
        self
    }

    pub fn with_monthly_volume(mut self, monthly_volume: f64) -> Self {
        self.monthly_volume = monthly_volume;
        self
    }

    /// Same scope targeting another country
    pub fn for_country(&self, country: &str) -> Self {
        Self {
            target_country: country.to_string(),
            ..self.clone()
        }
    }

    /// Collect warnings for inputs outside their documented domain
    pub fn validate(&self) -> Vec<ScopeWarning> {
        let mut warnings = Vec::new();

        let numeric = [
            ("weight_kg", self.weight_kg),
            ("unit_cogs", self.unit_cogs),
            ("selling_price", self.selling_price),
            ("monthly_volume", self.monthly_volume),
        ];
        for (field, value) in numeric {
            if !value.is_finite() {
                warnings.push(ScopeWarning::NonFinite { field });
            } else if value < 0.0 {
                warnings.push(ScopeWarning::Negative { field, value });
            }
        }

        if self.selling_price == 0.0 {
            warnings.push(ScopeWarning::ZeroPrice);
        }
        if self.monthly_volume == 0.0 {
            warnings.push(ScopeWarning::ZeroVolume);
        }

        warnings
    }
}
