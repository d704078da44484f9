//! Optimization Advisor
//!
//! Turns one `CostResult` into ranked, human-readable suggestions.
//!
//! # Evaluation
//!
//! ```text
//! 1. Flatten result + factor record into an AdvisorContext
//! 2. Walk the rule table in order; keep rules whose category passes the focus
//! 3. Collect findings from rules whose check fires
//! 4. Stable sort by severity (critical first)
//! ```
//!
//! Ties keep rule-table order, so output is deterministic for a given input.

pub mod context;
pub mod rules;
pub mod thresholds;

pub use context::AdvisorContext;
pub use thresholds::AdvisorThresholds;

use crate::models::{CostFactorRecord, CostResult, InvalidParameterError};
use rules::RULES;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionCategory {
    Pricing,
    Logistics,
    MarketSelection,
    CostReduction,
}

impl SuggestionCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            SuggestionCategory::Pricing => "pricing",
            SuggestionCategory::Logistics => "logistics",
            SuggestionCategory::MarketSelection => "market_selection",
            SuggestionCategory::CostReduction => "cost_reduction",
        }
    }
}

impl fmt::Display for SuggestionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered most to least urgent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

/// Category filter for `advise`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Focus {
    #[default]
    All,
    Pricing,
    Logistics,
    MarketSelection,
    CostReduction,
}

impl Focus {
    pub const ALLOWED: [&'static str; 5] = [
        "all",
        "pricing",
        "logistics",
        "market_selection",
        "cost_reduction",
    ];

    pub fn includes(self, category: SuggestionCategory) -> bool {
        match self {
            Focus::All => true,
            Focus::Pricing => category == SuggestionCategory::Pricing,
            Focus::Logistics => category == SuggestionCategory::Logistics,
            Focus::MarketSelection => category == SuggestionCategory::MarketSelection,
            Focus::CostReduction => category == SuggestionCategory::CostReduction,
        }
    }
}

impl FromStr for Focus {
    type Err = InvalidParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Focus::All),
            "pricing" => Ok(Focus::Pricing),
            "logistics" => Ok(Focus::Logistics),
            "market_selection" => Ok(Focus::MarketSelection),
            "cost_reduction" => Ok(Focus::CostReduction),
            _ => Err(InvalidParameterError {
                field: "focus",
                value: s.to_string(),
                allowed: Self::ALLOWED.to_vec(),
            }),
        }
    }
}

/// One piece of advice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub rule_id: String,
    pub category: SuggestionCategory,
    pub severity: Severity,
    /// The condition that fired, with numbers
    pub condition: String,
    pub rationale: String,
    pub metric_value: Option<f64>,
    pub threshold: f64,
}

/// Advise with default thresholds
pub fn advise(result: &CostResult, factor: &CostFactorRecord, focus: Focus) -> Vec<Suggestion> {
    advise_with(result, factor, focus, &AdvisorThresholds::default())
}

pub fn advise_with(
    result: &CostResult,
    factor: &CostFactorRecord,
    focus: Focus,
    thresholds: &AdvisorThresholds,
) -> Vec<Suggestion> {
    let ctx = AdvisorContext::new(result, factor);

    let mut suggestions: Vec<Suggestion> = RULES
        .iter()
        .filter(|rule| focus.includes(rule.category))
        .filter_map(|rule| {
            (rule.check)(&ctx, thresholds).map(|finding| Suggestion {
                rule_id: rule.id.to_string(),
                category: rule.category,
                severity: rule.severity,
                condition: finding.condition,
                rationale: finding.rationale,
                metric_value: finding.metric_value,
                threshold: finding.threshold,
            })
        })
        .collect();

    suggestions.sort_by_key(|s| s.severity);

    tracing::debug!(
        country = %result.country,
        focus = ?focus,
        count = suggestions.len(),
        "suggestions generated"
    );

    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_parsing() {
        assert_eq!("Market_Selection".parse::<Focus>().unwrap(), Focus::MarketSelection);
        let err = "shipping".parse::<Focus>().unwrap_err();
        assert_eq!(err.field, "focus");
        assert_eq!(err.allowed.len(), 5);
    }

    #[test]
    fn test_focus_filter() {
        assert!(Focus::All.includes(SuggestionCategory::Logistics));
        assert!(Focus::Pricing.includes(SuggestionCategory::Pricing));
        assert!(!Focus::Pricing.includes(SuggestionCategory::CostReduction));
    }

    #[test]
    fn test_severity_order() {
        assert!(Severity::Critical < Severity::High);
        assert!(Severity::Medium < Severity::Low);
    }
}
