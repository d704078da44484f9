//! Cost calculation output
//!
//! A `CostResult` is a plain value: itemized CAPEX (M1-M3), per-unit OPEX
//! (M4-M8), unit economics, KPIs, a ranked module breakdown and the
//! provenance of every factor the calculation read.
//!
//! # Critical Invariants
//!
//! 1. `ModuleBreakdown::total` is the sum of its line items
//! 2. `capex.total` = M1 + M2 + M3, `opex.total` = M4 + ... + M8
//! 3. "Never happens" KPIs are `Horizon::Unreachable`, never a magic number

use crate::factors::FactorField;
use crate::models::modes::CostDrivers;
use crate::models::module::CostModule;
use crate::models::provenance::Tier;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

// ============================================================================
// Horizon (finite-or-unreachable KPI)
// ============================================================================

/// A KPI that may never be reached
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Horizon {
    Finite(f64),
    Unreachable,
}

impl Horizon {
    /// `numerator / denominator`, Unreachable when the denominator is not
    /// strictly positive or the quotient is not finite
    pub fn from_ratio(numerator: f64, denominator: f64) -> Self {
        if denominator.is_nan() || denominator <= 0.0 {
            return Horizon::Unreachable;
        }
        let value = numerator / denominator;
        if value.is_finite() {
            Horizon::Finite(value)
        } else {
            Horizon::Unreachable
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Horizon::Finite(v) => Some(v),
            Horizon::Unreachable => None,
        }
    }

    pub fn is_reachable(self) -> bool {
        matches!(self, Horizon::Finite(_))
    }

    /// Ascending order with Unreachable after every finite value
    pub fn cmp_ascending(self, other: Horizon) -> Ordering {
        match (self, other) {
            (Horizon::Finite(a), Horizon::Finite(b)) => a.total_cmp(&b),
            (Horizon::Finite(_), Horizon::Unreachable) => Ordering::Less,
            (Horizon::Unreachable, Horizon::Finite(_)) => Ordering::Greater,
            (Horizon::Unreachable, Horizon::Unreachable) => Ordering::Equal,
        }
    }
}

// ============================================================================
// Provenance of resolved factors
// ============================================================================

/// Where a resolved factor value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueOrigin {
    Record,
    Override,
    Default,
}

/// A factor value as the calculator actually used it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedFactor {
    pub value: f64,
    pub tier: Tier,
    pub source: String,
    pub collected_at: Option<DateTime<Utc>>,
    pub origin: ValueOrigin,
}

/// Aggregate provenance of one result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvenanceSummary {
    pub tier_counts: BTreeMap<Tier, usize>,
    /// Mean tier confidence over resolved factors (0.0-1.0)
    pub mean_confidence: f64,
    pub overridden: usize,
    pub defaulted: usize,
}

// ============================================================================
// Itemized breakdown
// ============================================================================

/// One itemized cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub key: String,
    pub label: String,
    /// USD (one-time for CAPEX, per unit for OPEX)
    pub amount: f64,
    /// Factor fields this amount was computed from
    pub inputs: Vec<FactorField>,
    /// Weakest tier among `inputs` (None when derived from scope only)
    pub tier: Option<Tier>,
}

/// All line items of one module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleBreakdown {
    pub module: CostModule,
    pub name: String,
    pub items: Vec<LineItem>,
    pub total: f64,
}

impl ModuleBreakdown {
    /// Build a module; the total is always the sum of the items
    pub fn from_items(module: CostModule, items: Vec<LineItem>) -> Self {
        let total = items.iter().map(|i| i.amount).sum();
        Self {
            module,
            name: module.display_name().to_string(),
            items,
            total,
        }
    }

    pub fn item(&self, key: &str) -> Option<&LineItem> {
        self.items.iter().find(|i| i.key == key)
    }

    /// Amount of an item, 0 if absent
    pub fn amount(&self, key: &str) -> f64 {
        self.item(key).map(|i| i.amount).unwrap_or(0.0)
    }
}

/// One-time costs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapexBreakdown {
    pub m1: ModuleBreakdown,
    pub m2: ModuleBreakdown,
    pub m3: ModuleBreakdown,
    pub total: f64,
}

impl CapexBreakdown {
    pub fn new(m1: ModuleBreakdown, m2: ModuleBreakdown, m3: ModuleBreakdown) -> Self {
        let total = m1.total + m2.total + m3.total;
        Self { m1, m2, m3, total }
    }
}

/// Per-unit recurring costs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpexBreakdown {
    pub m4: ModuleBreakdown,
    pub m5: ModuleBreakdown,
    pub m6: ModuleBreakdown,
    pub m7: ModuleBreakdown,
    pub m8: ModuleBreakdown,
    pub total: f64,
}

impl OpexBreakdown {
    pub fn new(
        m4: ModuleBreakdown,
        m5: ModuleBreakdown,
        m6: ModuleBreakdown,
        m7: ModuleBreakdown,
        m8: ModuleBreakdown,
    ) -> Self {
        let total = m4.total + m5.total + m6.total + m7.total + m8.total;
        Self {
            m4,
            m5,
            m6,
            m7,
            m8,
            total,
        }
    }
}

// ============================================================================
// Economics and KPIs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitEconomics {
    pub revenue: f64,
    pub cost: f64,
    pub gross_profit: f64,
    /// gross_profit / revenue, 0 when revenue is 0
    pub gross_margin: f64,
    pub monthly_revenue: f64,
    pub monthly_gross_profit: f64,
    /// Part of unit cost that does not move with price (USD)
    pub fixed_unit_cost: f64,
    /// Sum of price-proportional rates; cost = fixed_unit_cost + price × rate
    pub variable_cost_rate: f64,
}

impl UnitEconomics {
    /// Price at which gross margin equals `target`
    ///
    /// Unreachable when price-proportional rates plus the target reach 100 %.
    pub fn price_for_margin(&self, target: f64) -> Horizon {
        Horizon::from_ratio(self.fixed_unit_cost, 1.0 - self.variable_cost_rate - target)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    /// gross_profit / cost, 0 when cost is 0
    pub roi: f64,
    pub payback_period_months: Horizon,
    pub breakeven_price: Horizon,
    pub breakeven_volume: Horizon,
    /// Gross profit before acquisition cost over a customer's lifetime
    pub ltv: f64,
    /// LTV / CAC, 0 when CAC is 0
    pub ltv_cac_ratio: f64,
}

/// A module's share of total unit cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostShare {
    pub module: CostModule,
    pub name: String,
    pub amount: f64,
    /// Percentage of opex total (0-100)
    pub percentage: f64,
}

// ============================================================================
// CostResult
// ============================================================================

/// Fully itemized result of one calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostResult {
    pub country: String,
    pub industry: String,
    pub factor_version: String,
    pub capex: CapexBreakdown,
    pub opex: OpexBreakdown,
    pub unit_economics: UnitEconomics,
    pub kpis: Kpis,
    /// OPEX modules ranked by share of unit cost, largest first
    pub cost_breakdown: Vec<CostShare>,
    pub drivers: CostDrivers,
    pub provenance: BTreeMap<FactorField, ResolvedFactor>,
}

impl CostResult {
    pub fn module(&self, module: CostModule) -> &ModuleBreakdown {
        match module {
            CostModule::M1 => &self.capex.m1,
            CostModule::M2 => &self.capex.m2,
            CostModule::M3 => &self.capex.m3,
            CostModule::M4 => &self.opex.m4,
            CostModule::M5 => &self.opex.m5,
            CostModule::M6 => &self.opex.m6,
            CostModule::M7 => &self.opex.m7,
            CostModule::M8 => &self.opex.m8,
        }
    }

    /// Fraction (0-1) of unit cost taken by an OPEX module
    pub fn opex_share(&self, module: CostModule) -> f64 {
        if module.is_capex() || self.opex.total <= 0.0 {
            return 0.0;
        }
        self.module(module).total / self.opex.total
    }

    /// Resolved value of a factor
    pub fn factor(&self, field: FactorField) -> Option<f64> {
        self.provenance.get(&field).map(|r| r.value)
    }

    pub fn provenance_summary(&self) -> ProvenanceSummary {
        let mut tier_counts = BTreeMap::new();
        let mut overridden = 0;
        let mut defaulted = 0;
        let mut confidence = 0.0;

        for resolved in self.provenance.values() {
            *tier_counts.entry(resolved.tier).or_insert(0) += 1;
            confidence += resolved.tier.confidence();
            match resolved.origin {
                ValueOrigin::Override => overridden += 1,
                ValueOrigin::Default => defaulted += 1,
                ValueOrigin::Record => {}
            }
        }

        let mean_confidence = if self.provenance.is_empty() {
            0.0
        } else {
            confidence / self.provenance.len() as f64
        };

        ProvenanceSummary {
            tier_counts,
            mean_confidence,
            overridden,
            defaulted,
        }
    }
}
