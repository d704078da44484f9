// Advisor evaluation context
//
// Flattens a CostResult (plus the record it came from) into the handful of
// numbers the advice rules test against.

use crate::factors::FactorField;
use crate::models::{CostFactorRecord, CostModule, CostResult, Horizon, LogisticsMode};

/// Values the rules read
///
/// **Economics**: selling_price, unit_cost, gross_margin, breakeven_price,
/// fixed_unit_cost, variable_cost_rate
///
/// **Cost structure** (fractions of unit cost): logistics_share, head_haul_share
///
/// **Rates in effect**: tariff_rate, payment_gateway_rate, commission_rate
///
/// **Acquisition**: cac, ltv_cac
///
/// **Market**: payback_months, capex_total, mean_confidence
#[derive(Debug, Clone)]
pub struct AdvisorContext {
    pub country: String,
    pub country_name: String,

    pub selling_price: f64,
    pub unit_cost: f64,
    pub gross_margin: f64,
    pub breakeven_price: Horizon,
    pub fixed_unit_cost: f64,
    pub variable_cost_rate: f64,

    pub logistics_share: f64,
    pub logistics_mode: LogisticsMode,
    pub head_haul: f64,
    pub head_haul_share: f64,
    /// Head haul if shipped by sea at the record's rate (None when unknown)
    pub sea_head_haul: Option<f64>,

    pub tariff_rate: f64,
    pub payment_gateway_rate: f64,
    pub commission_rate: f64,

    pub cac: f64,
    pub ltv_cac: f64,

    pub payback_months: Horizon,
    pub capex_total: f64,
    pub mean_confidence: f64,
}

impl AdvisorContext {
    pub fn new(result: &CostResult, factor: &CostFactorRecord) -> Self {
        // Resolved value first (carries overrides), record second
        let rate = |field: FactorField| {
            result
                .factor(field)
                .or_else(|| factor.value(field))
                .unwrap_or_else(|| field.default_value())
        };

        let unit_cost = result.opex.total;
        let head_haul = result.opex.m4.amount("head_haul");
        let head_haul_share = if unit_cost > 0.0 {
            head_haul / unit_cost
        } else {
            0.0
        };

        let sea_head_haul = match result.drivers.logistics {
            LogisticsMode::Sea => Some(head_haul),
            LogisticsMode::Air => {
                let air = rate(FactorField::AirFreightPerKg);
                let sea = factor.value(FactorField::SeaFreightPerKg);
                match sea {
                    Some(sea) if air > 0.0 => Some(head_haul / air * sea),
                    _ => None,
                }
            }
        };

        let payment_gateway_rate = match result.drivers.payment_gateway.preset() {
            Some((preset_rate, _)) => preset_rate,
            None => rate(FactorField::PaymentGatewayRate),
        };

        Self {
            country: result.country.clone(),
            country_name: factor.country_name.clone(),
            selling_price: result.unit_economics.revenue,
            unit_cost,
            gross_margin: result.unit_economics.gross_margin,
            breakeven_price: result.kpis.breakeven_price,
            fixed_unit_cost: result.unit_economics.fixed_unit_cost,
            variable_cost_rate: result.unit_economics.variable_cost_rate,
            logistics_share: result.opex_share(CostModule::M5),
            logistics_mode: result.drivers.logistics,
            head_haul,
            head_haul_share,
            sea_head_haul,
            tariff_rate: rate(FactorField::EffectiveTariffRate),
            payment_gateway_rate,
            commission_rate: rate(FactorField::PlatformCommissionRate),
            cac: rate(FactorField::CustomerAcquisitionCost),
            ltv_cac: result.kpis.ltv_cac_ratio,
            payback_months: result.kpis.payback_period_months,
            capex_total: result.capex.total,
            mean_confidence: result.provenance_summary().mean_confidence,
        }
    }
}
