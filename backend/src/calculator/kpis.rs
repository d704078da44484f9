//! Unit economics and KPIs
//!
//! Every division has an explicit guard: ratios fall back to 0 and
//! "time/volume to recover" KPIs become `Horizon::Unreachable`.

use super::opex::OpexTerms;
use crate::models::{CapexBreakdown, Horizon, Kpis, OpexBreakdown, ProjectScope, UnitEconomics};

pub(crate) fn unit_economics(
    scope: &ProjectScope,
    opex: &OpexBreakdown,
    terms: &OpexTerms,
) -> UnitEconomics {
    let revenue = scope.selling_price;
    let cost = opex.total;
    let gross_profit = revenue - cost;
    let gross_margin = if revenue == 0.0 {
        0.0
    } else {
        gross_profit / revenue
    };

    UnitEconomics {
        revenue,
        cost,
        gross_profit,
        gross_margin,
        monthly_revenue: revenue * scope.monthly_volume,
        monthly_gross_profit: gross_profit * scope.monthly_volume,
        fixed_unit_cost: terms.price_independent,
        variable_cost_rate: terms.price_rate,
    }
}

pub(crate) fn kpis(
    scope: &ProjectScope,
    capex: &CapexBreakdown,
    economics: &UnitEconomics,
    terms: &OpexTerms,
) -> Kpis {
    let gross_profit = economics.gross_profit;

    let roi = if economics.cost == 0.0 {
        0.0
    } else {
        gross_profit / economics.cost
    };

    // Monthly profit must be positive to ever recover CAPEX
    let payback_period_months =
        Horizon::from_ratio(capex.total, gross_profit * scope.monthly_volume);

    // price = fixed + price × rate  ⇒  price = fixed / (1 - rate)
    let breakeven_price = Horizon::from_ratio(terms.price_independent, 1.0 - terms.price_rate);

    let breakeven_volume = Horizon::from_ratio(capex.total, gross_profit);

    let ltv = (gross_profit + terms.cac_amortized) * terms.orders_per_customer;
    let ltv_cac_ratio = if terms.customer_acquisition_cost > 0.0 {
        ltv / terms.customer_acquisition_cost
    } else {
        0.0
    };

    Kpis {
        roi,
        payback_period_months,
        breakeven_price,
        breakeven_volume,
        ltv,
        ltv_cac_ratio,
    }
}
