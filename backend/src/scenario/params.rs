//! Scenario dials
//!
//! Seven dials re-drive the calculator. `None` on an optional dial means
//! "inherit" (from the scope, the record or the channel default), so
//! `ScenarioParameters::default()` reproduces a plain calculation.

use crate::factors::FactorField;
use crate::models::{
    FulfillmentMode, InvalidParameterError, LogisticsMode, PaymentGateway, ProjectScope,
    UserOverrides,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Suggested caller-side coalescing window for slider-driven re-simulation
pub const RECOMMENDED_DEBOUNCE: Duration = Duration::from_millis(300);

const NON_NEGATIVE: &[&str] = &["finite number >= 0"];
const UNIT_INTERVAL: &[&str] = &["finite number in [0, 1]"];

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioParameters {
    /// USD; None inherits the scope price
    pub selling_price: Option<f64>,

    /// Units per month; None inherits the scope volume
    pub monthly_volume: Option<f64>,

    /// USD; None inherits the record
    pub customer_acquisition_cost: Option<f64>,

    pub logistics_mode: LogisticsMode,

    /// None uses the sales channel's usual mode
    pub fulfillment_mode: Option<FulfillmentMode>,

    /// Fraction of units returned; None inherits the record
    pub return_rate: Option<f64>,

    pub payment_gateway: PaymentGateway,
}

impl ScenarioParameters {
    pub fn with_selling_price(mut self, price: f64) -> Self {
        self.selling_price = Some(price);
        self
    }

    pub fn with_monthly_volume(mut self, volume: f64) -> Self {
        self.monthly_volume = Some(volume);
        self
    }

    pub fn with_customer_acquisition_cost(mut self, cac: f64) -> Self {
        self.customer_acquisition_cost = Some(cac);
        self
    }

    pub fn with_logistics_mode(mut self, mode: LogisticsMode) -> Self {
        self.logistics_mode = mode;
        self
    }

    pub fn with_fulfillment_mode(mut self, mode: FulfillmentMode) -> Self {
        self.fulfillment_mode = Some(mode);
        self
    }

    pub fn with_return_rate(mut self, rate: f64) -> Self {
        self.return_rate = Some(rate);
        self
    }

    pub fn with_payment_gateway(mut self, gateway: PaymentGateway) -> Self {
        self.payment_gateway = gateway;
        self
    }

    /// Clamp numeric dials into their domains
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameterError` naming the first non-finite dial.
    pub fn normalized(&self) -> Result<Self, InvalidParameterError> {
        Ok(Self {
            selling_price: non_negative("selling_price", self.selling_price)?,
            monthly_volume: non_negative("monthly_volume", self.monthly_volume)?,
            customer_acquisition_cost: non_negative(
                "customer_acquisition_cost",
                self.customer_acquisition_cost,
            )?,
            return_rate: match self.return_rate {
                Some(v) => Some(finite("return_rate", v, UNIT_INTERVAL)?.clamp(0.0, 1.0)),
                None => None,
            },
            ..*self
        })
    }

    /// `base` with the price and volume dials applied
    pub fn apply_to_scope(&self, base: &ProjectScope) -> ProjectScope {
        let mut scope = base.clone();
        if let Some(price) = self.selling_price {
            scope.selling_price = price;
        }
        if let Some(volume) = self.monthly_volume {
            scope.monthly_volume = volume;
        }
        scope
    }

    /// Numeric dials that act on factor fields, as overrides
    pub fn dial_overrides(&self) -> UserOverrides {
        let mut overrides = UserOverrides::new();
        if let Some(cac) = self.customer_acquisition_cost {
            overrides = overrides.with(FactorField::CustomerAcquisitionCost, cac);
        }
        if let Some(rate) = self.return_rate {
            overrides = overrides.with(FactorField::ReturnRate, rate);
        }
        overrides
    }
}

fn finite(
    field: &'static str,
    value: f64,
    allowed: &[&'static str],
) -> Result<f64, InvalidParameterError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(InvalidParameterError {
            field,
            value: value.to_string(),
            allowed: allowed.to_vec(),
        })
    }
}

fn non_negative(
    field: &'static str,
    value: Option<f64>,
) -> Result<Option<f64>, InvalidParameterError> {
    match value {
        Some(v) => Ok(Some(finite(field, v, NON_NEGATIVE)?.max(0.0))),
        None => Ok(None),
    }
}

// ============================================================================
// Loosely-typed form (UI / chat / FFI input)
// ============================================================================

/// Scenario dials as received from an untyped caller
///
/// Mode dials are free strings here so an unknown value surfaces as an
/// `InvalidParameterError` with the allowed list rather than a serde error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawScenarioParameters {
    pub selling_price: Option<f64>,
    pub monthly_volume: Option<f64>,
    pub customer_acquisition_cost: Option<f64>,
    pub logistics_mode: Option<String>,
    pub fulfillment_mode: Option<String>,
    pub return_rate: Option<f64>,
    pub payment_gateway: Option<String>,
}

impl TryFrom<RawScenarioParameters> for ScenarioParameters {
    type Error = InvalidParameterError;

    fn try_from(raw: RawScenarioParameters) -> Result<Self, Self::Error> {
        Ok(Self {
            selling_price: raw.selling_price,
            monthly_volume: raw.monthly_volume,
            customer_acquisition_cost: raw.customer_acquisition_cost,
            logistics_mode: match raw.logistics_mode.as_deref() {
                Some(s) => s.parse()?,
                None => LogisticsMode::default(),
            },
            fulfillment_mode: raw
                .fulfillment_mode
                .as_deref()
                .map(str::parse::<FulfillmentMode>)
                .transpose()?,
            return_rate: raw.return_rate,
            payment_gateway: match raw.payment_gateway.as_deref() {
                Some(s) => s.parse()?,
                None => PaymentGateway::default(),
            },
        })
    }
}
