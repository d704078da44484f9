//! Cost Model Calculator
//!
//! Pure function from (scope, factor record, overrides) to a fully itemized
//! `CostResult`.
//!
//! # Pipeline
//!
//! ```text
//! 1. Resolve factors (override → record → default), remembering provenance
//! 2. CAPEX: M1-M3 itemized one-time costs
//! 3. OPEX: M4 landed cost chain, M5 delivery, M6 acquisition, M7 payment, M8 ops
//! 4. Unit economics (revenue, cost, gross profit, margin)
//! 5. KPIs (ROI, payback, breakeven price/volume, LTV:CAC)
//! 6. Rank OPEX modules by share of unit cost
//! ```
//!
//! # Totality
//!
//! The calculator never fails and never panics. Zero price, zero volume or
//! a record with no fields all produce a complete result with zero or
//! `Horizon::Unreachable` values.

pub mod config;

mod capex;
mod kpis;
mod opex;
mod resolver;

pub use config::{CommissionPlacement, ConfigError, ModelConfig};
pub use opex::{landed_cost, LandedCost};

use crate::models::{
    CostDrivers, CostFactorRecord, CostResult, CostShare, OpexBreakdown, ProjectScope,
    UserOverrides,
};
use resolver::FactorResolver;

/// Calculate with default drivers and configuration
///
/// Drivers default to sea freight, the channel's usual fulfillment mode and
/// the record's payment rates.
///
/// # Example
/// ```
/// use crossborder_cost_core_rs::{calculate, CostFactorRecord, FactorField, ProjectScope, SalesChannel, SourceKind};
///
/// let scope = ProjectScope::new("US", "pet_food", SalesChannel::AmazonFba)
///     .with_product(0.5, 5.0, 15.99)
///     .with_monthly_volume(500.0);
/// let factor = CostFactorRecord::new("US", "United States", "pet_food", "2024.1")
///     .with_field(FactorField::SeaFreightPerKg, 2.0, SourceKind::CarrierTariff, "forwarder");
///
/// let result = calculate(&scope, &factor, None);
/// assert_eq!(result.opex.m4.amount("head_haul"), 1.0);
/// assert_eq!(result.opex.total, result.unit_economics.cost);
/// ```
pub fn calculate(
    scope: &ProjectScope,
    factor: &CostFactorRecord,
    overrides: Option<&UserOverrides>,
) -> CostResult {
    calculate_with(
        scope,
        factor,
        overrides,
        &CostDrivers::for_scope(scope),
        &ModelConfig::default(),
    )
}

/// Calculate with explicit drivers and configuration
pub fn calculate_with(
    scope: &ProjectScope,
    factor: &CostFactorRecord,
    overrides: Option<&UserOverrides>,
    drivers: &CostDrivers,
    config: &ModelConfig,
) -> CostResult {
    if let Some(overrides) = overrides {
        let unknown = overrides.unknown_keys();
        if !unknown.is_empty() {
            tracing::warn!(keys = ?unknown, "ignoring unknown override keys");
        }
    }

    let mut resolver = FactorResolver::new(factor, overrides);

    let capex = capex::compute_capex(&mut resolver);
    let (opex, terms) = opex::compute_opex(scope, &mut resolver, drivers, config);
    let unit_economics = kpis::unit_economics(scope, &opex, &terms);
    let kpis = kpis::kpis(scope, &capex, &unit_economics, &terms);
    let cost_breakdown = rank_cost_shares(&opex);

    tracing::debug!(
        country = %scope.target_country,
        industry = %scope.industry,
        capex_total = capex.total,
        opex_total = opex.total,
        gross_margin = unit_economics.gross_margin,
        "cost model calculated"
    );

    CostResult {
        country: factor.country.clone(),
        industry: factor.industry.clone(),
        factor_version: factor.version.clone(),
        capex,
        opex,
        unit_economics,
        kpis,
        cost_breakdown,
        drivers: *drivers,
        provenance: resolver.into_provenance(),
    }
}

/// OPEX modules ordered by amount, largest first (stable on ties)
fn rank_cost_shares(opex: &OpexBreakdown) -> Vec<CostShare> {
    let modules = [&opex.m4, &opex.m5, &opex.m6, &opex.m7, &opex.m8];

    let mut shares: Vec<CostShare> = modules
        .iter()
        .map(|m| CostShare {
            module: m.module,
            name: m.name.clone(),
            amount: m.total,
            percentage: if opex.total > 0.0 {
                m.total / opex.total * 100.0
            } else {
                0.0
            },
        })
        .collect();

    shares.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    debug_assert!(shares.iter().all(|s| !s.module.is_capex()));
    shares
}
