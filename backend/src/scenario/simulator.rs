//! Scenario simulation
//!
//! Applies the dials on top of a base scope and record, then runs the
//! calculator. Numeric dials land on the scope (price, volume) or become
//! overrides (CAC, return rate); mode dials become `CostDrivers`.

use super::params::ScenarioParameters;
use crate::calculator::{calculate_with, ModelConfig};
use crate::models::{
    CostDrivers, CostFactorRecord, CostResult, FulfillmentMode, InvalidParameterError,
    ProjectScope, UserOverrides,
};

/// Re-run the model under scenario dials
///
/// # Example
/// ```
/// use crossborder_cost_core_rs::scenario::{simulate, ScenarioParameters};
/// use crossborder_cost_core_rs::{calculate, CostFactorRecord, ProjectScope, SalesChannel};
///
/// let scope = ProjectScope::new("US", "pet_food", SalesChannel::Shopify)
///     .with_product(1.0, 10.0, 30.0);
/// let factor = CostFactorRecord::new("US", "United States", "pet_food", "v1");
///
/// let simulated = simulate(&scope, &factor, &ScenarioParameters::default()).unwrap();
/// assert_eq!(simulated, calculate(&scope, &factor, None));
/// ```
pub fn simulate(
    base_scope: &ProjectScope,
    factor: &CostFactorRecord,
    params: &ScenarioParameters,
) -> Result<CostResult, InvalidParameterError> {
    simulate_with(base_scope, factor, None, params, &ModelConfig::default())
}

/// Simulate with session overrides layered beneath the dials
pub fn simulate_with_overrides(
    base_scope: &ProjectScope,
    factor: &CostFactorRecord,
    overrides: &UserOverrides,
    params: &ScenarioParameters,
) -> Result<CostResult, InvalidParameterError> {
    simulate_with(base_scope, factor, Some(overrides), params, &ModelConfig::default())
}

/// Full form: session overrides and model configuration
pub fn simulate_with(
    base_scope: &ProjectScope,
    factor: &CostFactorRecord,
    overrides: Option<&UserOverrides>,
    params: &ScenarioParameters,
    config: &ModelConfig,
) -> Result<CostResult, InvalidParameterError> {
    let params = params.normalized()?;
    tracing::debug!(?params, country = %base_scope.target_country, "simulating scenario");

    let scope = params.apply_to_scope(base_scope);

    // Dials win over session overrides for the fields they touch
    let dials = params.dial_overrides();
    let merged = match overrides {
        Some(session) => session.merged_with(&dials),
        None => dials,
    };

    let drivers = CostDrivers {
        logistics: params.logistics_mode,
        fulfillment: params
            .fulfillment_mode
            .unwrap_or_else(|| FulfillmentMode::for_channel(scope.sales_channel)),
        payment_gateway: params.payment_gateway,
    };

    Ok(calculate_with(&scope, factor, Some(&merged), &drivers, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factors::FactorField;
    use crate::models::{LogisticsMode, SalesChannel, SourceKind, ValueOrigin};

    fn scope() -> ProjectScope {
        ProjectScope::new("US", "pet_food", SalesChannel::AmazonFba)
            .with_product(0.5, 5.0, 20.0)
            .with_monthly_volume(100.0)
    }

    fn record() -> CostFactorRecord {
        CostFactorRecord::new("US", "United States", "pet_food", "v1")
            .with_field(FactorField::SeaFreightPerKg, 2.0, SourceKind::CarrierTariff, "forwarder")
            .with_field(FactorField::AirFreightPerKg, 8.0, SourceKind::CarrierTariff, "forwarder")
            .with_field(FactorField::CustomerAcquisitionCost, 12.0, SourceKind::MarketSurvey, "survey")
            .with_field(FactorField::ReturnRate, 0.05, SourceKind::IndustryReport, "report")
    }

    #[test]
    fn test_price_and_volume_dials_replace_scope_values() {
        let params = ScenarioParameters::default()
            .with_selling_price(25.0)
            .with_monthly_volume(400.0);
        let result = simulate(&scope(), &record(), &params).unwrap();
        assert_eq!(result.unit_economics.revenue, 25.0);
        assert_eq!(result.unit_economics.monthly_revenue, 10_000.0);
    }

    #[test]
    fn test_cac_dial_beats_session_override() {
        let session = UserOverrides::new().with(FactorField::CustomerAcquisitionCost, 30.0);
        let params = ScenarioParameters::default().with_customer_acquisition_cost(6.0);
        let result = simulate_with_overrides(&scope(), &record(), &session, &params).unwrap();

        assert_eq!(result.factor(FactorField::CustomerAcquisitionCost), Some(6.0));
        assert_eq!(
            result.provenance[&FactorField::CustomerAcquisitionCost].origin,
            ValueOrigin::Override
        );
    }

    #[test]
    fn test_session_override_applies_without_dial() {
        let session = UserOverrides::new().with(FactorField::CustomerAcquisitionCost, 30.0);
        let result =
            simulate_with_overrides(&scope(), &record(), &session, &ScenarioParameters::default())
                .unwrap();
        assert_eq!(result.factor(FactorField::CustomerAcquisitionCost), Some(30.0));
    }

    #[test]
    fn test_air_dial_switches_freight() {
        let params = ScenarioParameters::default().with_logistics_mode(LogisticsMode::Air);
        let result = simulate(&scope(), &record(), &params).unwrap();
        assert_eq!(result.opex.m4.amount("head_haul"), 4.0);
        assert_eq!(result.drivers.logistics, LogisticsMode::Air);
    }

    #[test]
    fn test_nan_dial_is_rejected() {
        let params = ScenarioParameters::default().with_selling_price(f64::NAN);
        let err = simulate(&scope(), &record(), &params).unwrap_err();
        assert_eq!(err.field, "selling_price");
    }
}
