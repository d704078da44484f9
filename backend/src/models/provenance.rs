//! Data provenance for cost factors
//!
//! Every sourced number carries its confidence tier, a source label and the
//! time it was collected, so report generators can footnote a figure without
//! re-deriving where it came from.
//!
//! # Tiers
//!
//! - **Tier 1**: official / government source (confidence 100%)
//! - **Tier 2**: authoritative secondary source (confidence 90%)
//! - **Tier 3**: estimate (confidence 80%)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Provenance confidence band
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    #[serde(rename = "tier_1")]
    Tier1,
    #[serde(rename = "tier_2")]
    Tier2,
    #[serde(rename = "tier_3")]
    Tier3,
}

impl Tier {
    /// Confidence attached to values of this tier (0.0-1.0)
    pub fn confidence(self) -> f64 {
        match self {
            Tier::Tier1 => 1.0,
            Tier::Tier2 => 0.9,
            Tier::Tier3 => 0.8,
        }
    }

    /// Short label used in report footnotes ("Tier 1" etc.)
    pub fn label(self) -> &'static str {
        match self {
            Tier::Tier1 => "Tier 1",
            Tier::Tier2 => "Tier 2",
            Tier::Tier3 => "Tier 3",
        }
    }
}

/// Structured classification of where a factor value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Statute, official gazette, government portal
    Government,
    /// Customs tariff schedule
    CustomsAuthority,
    /// Tax authority publication (VAT/GST rates)
    TaxAuthority,
    /// Published marketplace fee schedule
    PlatformFeeSchedule,
    /// Published carrier or forwarder tariff
    CarrierTariff,
    /// Industry association or analyst report
    IndustryReport,
    /// Survey or sampled market quotes
    MarketSurvey,
    /// Internal estimate or modelled value
    Estimate,
}

/// Ordered tier inference table
///
/// First matching row wins. Every `SourceKind` appears exactly once, so
/// inference is total.
const TIER_TABLE: &[(SourceKind, Tier)] = &[
    (SourceKind::Government, Tier::Tier1),
    (SourceKind::CustomsAuthority, Tier::Tier1),
    (SourceKind::TaxAuthority, Tier::Tier1),
    (SourceKind::PlatformFeeSchedule, Tier::Tier2),
    (SourceKind::CarrierTariff, Tier::Tier2),
    (SourceKind::IndustryReport, Tier::Tier2),
    (SourceKind::MarketSurvey, Tier::Tier3),
    (SourceKind::Estimate, Tier::Tier3),
];

impl SourceKind {
    /// Infer the provenance tier for this kind of source
    pub fn tier(self) -> Tier {
        TIER_TABLE
            .iter()
            .find(|(kind, _)| *kind == self)
            .map(|(_, tier)| *tier)
            .unwrap_or(Tier::Tier3)
    }
}

/// A value annotated with its provenance
///
/// # Example
/// ```
/// use crossborder_cost_core_rs::{SourceKind, Sourced, Tier};
///
/// let duty = Sourced::from_kind(0.55, SourceKind::CustomsAuthority, "USITC HTS 2309.10");
/// assert_eq!(duty.tier, Tier::Tier1);
/// assert_eq!(duty.value, 0.55);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sourced<T> {
    pub value: T,
    pub tier: Tier,
    /// Human-readable data source label
    pub source: String,
    /// When the value was collected (None = unknown)
    #[serde(default)]
    pub collected_at: Option<DateTime<Utc>>,
}

impl<T> Sourced<T> {
    pub fn new(value: T, tier: Tier, source: impl Into<String>) -> Self {
        Self {
            value,
            tier,
            source: source.into(),
            collected_at: None,
        }
    }

    /// Build a sourced value, inferring the tier from the kind of source
    pub fn from_kind(value: T, kind: SourceKind, source: impl Into<String>) -> Self {
        Self::new(value, kind.tier(), source)
    }

    pub fn collected_at(mut self, at: DateTime<Utc>) -> Self {
        self.collected_at = Some(at);
        self
    }

    /// Replace the value, keeping provenance
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Sourced<U> {
        Sourced {
            value: f(self.value),
            tier: self.tier,
            source: self.source,
            collected_at: self.collected_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_confidence() {
        assert_eq!(Tier::Tier1.confidence(), 1.0);
        assert_eq!(Tier::Tier2.confidence(), 0.9);
        assert_eq!(Tier::Tier3.confidence(), 0.8);
    }

    #[test]
    fn test_tier_table_covers_every_kind() {
        let kinds = [
            SourceKind::Government,
            SourceKind::CustomsAuthority,
            SourceKind::TaxAuthority,
            SourceKind::PlatformFeeSchedule,
            SourceKind::CarrierTariff,
            SourceKind::IndustryReport,
            SourceKind::MarketSurvey,
            SourceKind::Estimate,
        ];
        for kind in kinds {
            assert!(
                TIER_TABLE.iter().any(|(k, _)| *k == kind),
                "{:?} missing from tier table",
                kind
            );
        }
        assert_eq!(TIER_TABLE.len(), kinds.len());
    }

    #[test]
    fn test_tier_inference() {
        assert_eq!(SourceKind::TaxAuthority.tier(), Tier::Tier1);
        assert_eq!(SourceKind::PlatformFeeSchedule.tier(), Tier::Tier2);
        assert_eq!(SourceKind::Estimate.tier(), Tier::Tier3);
    }

    #[test]
    fn test_tier_serializes_snake_case() {
        let json = serde_json::to_string(&Tier::Tier2).unwrap();
        assert_eq!(json, "\"tier_2\"");
    }
}
