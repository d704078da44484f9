//! Multi-country comparison
//!
//! Runs the calculator once per requested country and ranks the rows.
//!
//! # Critical Invariants
//!
//! 1. A row depends only on its own country's record (rows are independent)
//! 2. Parallel evaluation returns exactly what sequential evaluation would
//! 3. A missing record becomes an error row; it never aborts the batch
//! 4. Ranking is a stable sort; error rows follow every ranked row

use crate::calculator::{calculate_with, ModelConfig};
use crate::factors::CostFactorSource;
use crate::models::{
    CostDrivers, CostResult, Horizon, InvalidParameterError, Kpis, ProjectScope,
    ProvenanceSummary, UnitEconomics,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CompareError {
    #[error("Country list is empty")]
    EmptyCountryList,
}

// ============================================================================
// Ranking metric
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    GrossMargin,
    Roi,
    GrossProfit,
    LtvCac,
    UnitCost,
    Capex,
    PaybackPeriod,
    BreakevenPrice,
}

impl Metric {
    pub const ALL: [Metric; 8] = [
        Metric::GrossMargin,
        Metric::Roi,
        Metric::GrossProfit,
        Metric::LtvCac,
        Metric::UnitCost,
        Metric::Capex,
        Metric::PaybackPeriod,
        Metric::BreakevenPrice,
    ];

    /// Accepted selector strings ("all" plus every metric)
    pub const ALLOWED: [&'static str; 9] = [
        "all",
        "gross_margin",
        "roi",
        "gross_profit",
        "ltv_cac",
        "unit_cost",
        "capex",
        "payback_period",
        "breakeven_price",
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Metric::GrossMargin => "gross_margin",
            Metric::Roi => "roi",
            Metric::GrossProfit => "gross_profit",
            Metric::LtvCac => "ltv_cac",
            Metric::UnitCost => "unit_cost",
            Metric::Capex => "capex",
            Metric::PaybackPeriod => "payback_period",
            Metric::BreakevenPrice => "breakeven_price",
        }
    }

    /// Higher is better for profitability metrics, lower for cost metrics
    pub fn higher_is_better(self) -> bool {
        matches!(
            self,
            Metric::GrossMargin | Metric::Roi | Metric::GrossProfit | Metric::LtvCac
        )
    }

    fn value(self, summary: &RowSummary) -> Horizon {
        match self {
            Metric::GrossMargin => Horizon::Finite(summary.unit_economics.gross_margin),
            Metric::Roi => Horizon::Finite(summary.kpis.roi),
            Metric::GrossProfit => Horizon::Finite(summary.unit_economics.gross_profit),
            Metric::LtvCac => Horizon::Finite(summary.kpis.ltv_cac_ratio),
            Metric::UnitCost => Horizon::Finite(summary.opex_total),
            Metric::Capex => Horizon::Finite(summary.capex_total),
            Metric::PaybackPeriod => summary.kpis.payback_period_months,
            Metric::BreakevenPrice => summary.kpis.breakeven_price,
        }
    }

    /// Best-first ordering; Unreachable always sorts last
    fn compare_values(self, a: Horizon, b: Horizon) -> Ordering {
        match (a, b) {
            (Horizon::Finite(x), Horizon::Finite(y)) if self.higher_is_better() => {
                y.total_cmp(&x)
            }
            _ => a.cmp_ascending(b),
        }
    }
}

impl FromStr for Metric {
    type Err = InvalidParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Metric::ALL
            .into_iter()
            .find(|m| m.as_str() == key)
            .ok_or_else(|| InvalidParameterError {
                field: "metric",
                value: s.to_string(),
                allowed: Metric::ALLOWED.to_vec(),
            })
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rank by one metric, or return every row in request order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MetricSelector {
    #[default]
    All,
    Metric(Metric),
}

impl FromStr for MetricSelector {
    type Err = InvalidParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(MetricSelector::All)
        } else {
            s.parse().map(MetricSelector::Metric)
        }
    }
}

impl TryFrom<String> for MetricSelector {
    type Error = InvalidParameterError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<MetricSelector> for String {
    fn from(selector: MetricSelector) -> Self {
        match selector {
            MetricSelector::All => "all".to_string(),
            MetricSelector::Metric(m) => m.as_str().to_string(),
        }
    }
}

impl From<Metric> for MetricSelector {
    fn from(metric: Metric) -> Self {
        MetricSelector::Metric(metric)
    }
}

// ============================================================================
// Rows
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    Ok,
    Error,
}

/// Numbers of a successfully computed row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowSummary {
    pub kpis: Kpis,
    pub unit_economics: UnitEconomics,
    pub capex_total: f64,
    pub opex_total: f64,
    pub provenance: ProvenanceSummary,
}

impl From<&CostResult> for RowSummary {
    fn from(result: &CostResult) -> Self {
        Self {
            kpis: result.kpis.clone(),
            unit_economics: result.unit_economics.clone(),
            capex_total: result.capex.total,
            opex_total: result.opex.total,
            provenance: result.provenance_summary(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub country: String,
    pub country_name: Option<String>,
    pub status: RowStatus,
    /// 1-based position under the requested metric (None for `All` and errors)
    pub rank: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<RowSummary>,
}

impl ComparisonRow {
    pub fn is_ok(&self) -> bool {
        self.status == RowStatus::Ok
    }

    fn computed(country: &str, country_name: String, result: &CostResult) -> Self {
        Self {
            country: country.to_string(),
            country_name: Some(country_name),
            status: RowStatus::Ok,
            rank: None,
            reason: None,
            summary: Some(RowSummary::from(result)),
        }
    }

    fn not_found(country: &str, industry: &str, version: &str) -> Self {
        Self {
            country: country.to_string(),
            country_name: None,
            status: RowStatus::Error,
            rank: None,
            reason: Some(format!(
                "No cost factor record for {} / {} (version {})",
                country, industry, version
            )),
            summary: None,
        }
    }
}

// ============================================================================
// Comparison
// ============================================================================

/// Compare the same scope across countries
///
/// Each country's record is looked up for the scope's industry at
/// `config.factor_version`.
///
/// # Errors
///
/// `CompareError::EmptyCountryList` when `countries` is empty. Missing
/// records are reported per row.
pub fn compare<S>(
    countries: &[S],
    scope: &ProjectScope,
    selector: MetricSelector,
    source: &dyn CostFactorSource,
    config: &ModelConfig,
) -> Result<Vec<ComparisonRow>, CompareError>
where
    S: AsRef<str> + Sync,
{
    if countries.is_empty() {
        return Err(CompareError::EmptyCountryList);
    }

    // Indexed parallel iterators keep input order on collect
    let rows: Vec<ComparisonRow> = countries
        .par_iter()
        .map(|country| compare_one(country.as_ref(), scope, source, config))
        .collect();

    let rows = match selector {
        MetricSelector::All => rows,
        MetricSelector::Metric(metric) => rank_rows(rows, metric),
    };

    tracing::debug!(
        countries = countries.len(),
        failed = rows.iter().filter(|r| !r.is_ok()).count(),
        metric = %String::from(selector),
        "countries compared"
    );

    Ok(rows)
}

fn compare_one(
    country: &str,
    scope: &ProjectScope,
    source: &dyn CostFactorSource,
    config: &ModelConfig,
) -> ComparisonRow {
    let version = config.factor_version.as_str();

    match source.get_cost_factor(country, &scope.industry, version) {
        Some(record) => {
            let row_scope = scope.for_country(country);
            let drivers = CostDrivers::for_scope(&row_scope);
            let result = calculate_with(&row_scope, &record, None, &drivers, config);
            ComparisonRow::computed(country, record.country_name, &result)
        }
        None => {
            tracing::warn!(
                country,
                industry = %scope.industry,
                version,
                "cost factor record not found"
            );
            ComparisonRow::not_found(country, &scope.industry, version)
        }
    }
}

fn rank_rows(rows: Vec<ComparisonRow>, metric: Metric) -> Vec<ComparisonRow> {
    let (mut ranked, errors): (Vec<_>, Vec<_>) =
        rows.into_iter().partition(|r| r.summary.is_some());

    ranked.sort_by(|a, b| match (&a.summary, &b.summary) {
        (Some(x), Some(y)) => metric.compare_values(metric.value(x), metric.value(y)),
        _ => Ordering::Equal,
    });

    for (i, row) in ranked.iter_mut().enumerate() {
        row.rank = Some(i + 1);
    }

    ranked.extend(errors);
    ranked
}
