//! Cost factor record
//!
//! Per country × industry × version parameters supplied by an external
//! repository. The engine only reads records; it never mutates one.

use crate::factors::FactorField;
use crate::models::provenance::{SourceKind, Sourced, Tier};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Immutable record of cost factors for one country/industry/version
///
/// # Example
/// ```
/// use crossborder_cost_core_rs::{CostFactorRecord, FactorField, SourceKind};
///
/// let record = CostFactorRecord::new("US", "United States", "pet_food", "2024.1")
///     .with_field(FactorField::EffectiveTariffRate, 0.55, SourceKind::CustomsAuthority, "USITC")
///     .with_field(FactorField::SeaFreightPerKg, 2.0, SourceKind::CarrierTariff, "Freightos");
///
/// assert_eq!(record.value(FactorField::EffectiveTariffRate), Some(0.55));
/// assert_eq!(record.value(FactorField::VatRate), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostFactorRecord {
    /// ISO country code (e.g., "US")
    pub country: String,

    /// Human-readable country name
    pub country_name: String,

    /// Industry key (e.g., "pet_food")
    pub industry: String,

    /// Data version label
    pub version: String,

    /// Sourced factor values; absent fields resolve to their catalog default
    ///
    /// Unknown field names are dropped with a warning when deserializing.
    #[serde(default, deserialize_with = "known_fields")]
    pub fields: BTreeMap<FactorField, Sourced<f64>>,
}

impl CostFactorRecord {
    pub fn new(
        country: impl Into<String>,
        country_name: impl Into<String>,
        industry: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            country: country.into(),
            country_name: country_name.into(),
            industry: industry.into(),
            version: version.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder: add a field with a tier inferred from its source kind
    pub fn with_field(
        mut self,
        field: FactorField,
        value: f64,
        kind: SourceKind,
        source: impl Into<String>,
    ) -> Self {
        self.fields.insert(field, Sourced::from_kind(value, kind, source));
        self
    }

    /// Builder: add an already-sourced field
    pub fn with_sourced(mut self, field: FactorField, sourced: Sourced<f64>) -> Self {
        self.fields.insert(field, sourced);
        self
    }

    pub fn get(&self, field: FactorField) -> Option<&Sourced<f64>> {
        self.fields.get(&field)
    }

    /// Raw recorded value, if present
    pub fn value(&self, field: FactorField) -> Option<f64> {
        self.fields.get(&field).map(|s| s.value)
    }

    /// Number of recorded fields per tier
    pub fn tier_counts(&self) -> BTreeMap<Tier, usize> {
        let mut counts = BTreeMap::new();
        for sourced in self.fields.values() {
            *counts.entry(sourced.tier).or_insert(0) += 1;
        }
        counts
    }
}

fn known_fields<'de, D>(deserializer: D) -> Result<BTreeMap<FactorField, Sourced<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, Sourced<f64>>::deserialize(deserializer)?;
    let mut fields = BTreeMap::new();
    let mut unknown = Vec::new();

    for (name, sourced) in raw {
        match FactorField::from_name(&name) {
            Some(field) => {
                fields.insert(field, sourced);
            }
            None => unknown.push(name),
        }
    }

    if !unknown.is_empty() {
        tracing::warn!(keys = ?unknown, "ignoring unknown factor fields");
    }
    Ok(fields)
}
