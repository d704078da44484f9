//! Factor resolution
//!
//! Precedence per field: user override → record → catalog default.
//! Every field read is remembered with its provenance so the result can
//! footnote it.

use crate::factors::FactorField;
use crate::models::{CostFactorRecord, ResolvedFactor, Tier, UserOverrides, ValueOrigin};
use std::collections::BTreeMap;

pub(crate) const OVERRIDE_SOURCE: &str = "user_override";
pub(crate) const DEFAULT_SOURCE: &str = "default";

pub(crate) struct FactorResolver<'a> {
    record: &'a CostFactorRecord,
    overrides: Option<&'a UserOverrides>,
    resolved: BTreeMap<FactorField, ResolvedFactor>,
}

impl<'a> FactorResolver<'a> {
    pub fn new(record: &'a CostFactorRecord, overrides: Option<&'a UserOverrides>) -> Self {
        Self {
            record,
            overrides,
            resolved: BTreeMap::new(),
        }
    }

    /// Resolve a field's value
    pub fn get(&mut self, field: FactorField) -> f64 {
        if let Some(resolved) = self.resolved.get(&field) {
            return resolved.value;
        }
        let resolved = self.resolve(field);
        let value = resolved.value;
        self.resolved.insert(field, resolved);
        value
    }

    /// Tier of an already-resolved field
    pub fn tier(&self, field: FactorField) -> Option<Tier> {
        self.resolved.get(&field).map(|r| r.tier)
    }

    /// Weakest tier among fields (None for an empty list)
    pub fn weakest_tier(&self, fields: &[FactorField]) -> Option<Tier> {
        fields.iter().filter_map(|f| self.tier(*f)).max()
    }

    pub fn into_provenance(self) -> BTreeMap<FactorField, ResolvedFactor> {
        self.resolved
    }

    fn resolve(&self, field: FactorField) -> ResolvedFactor {
        let kind = field.kind();

        if let Some(value) = self.overrides.and_then(|o| o.get(field)) {
            if let Some(value) = kind.clamp(value) {
                return ResolvedFactor {
                    value,
                    tier: Tier::Tier3,
                    source: OVERRIDE_SOURCE.to_string(),
                    collected_at: None,
                    origin: ValueOrigin::Override,
                };
            }
        }

        if let Some(sourced) = self.record.get(field) {
            if let Some(value) = kind.clamp(sourced.value) {
                return ResolvedFactor {
                    value,
                    tier: sourced.tier,
                    source: sourced.source.clone(),
                    collected_at: sourced.collected_at,
                    origin: ValueOrigin::Record,
                };
            }
        }

        ResolvedFactor {
            value: field.default_value(),
            tier: Tier::Tier3,
            source: DEFAULT_SOURCE.to_string(),
            collected_at: None,
            origin: ValueOrigin::Default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceKind;

    fn record() -> CostFactorRecord {
        CostFactorRecord::new("US", "United States", "pet_food", "v1")
            .with_field(FactorField::VatRate, 0.0, SourceKind::TaxAuthority, "IRS")
            .with_field(FactorField::MarketingRate, 1.4, SourceKind::Estimate, "model")
    }

    #[test]
    fn test_precedence_override_record_default() {
        let record = record();
        let overrides = UserOverrides::new().with(FactorField::VatRate, 0.1);
        let mut resolver = FactorResolver::new(&record, Some(&overrides));

        assert_eq!(resolver.get(FactorField::VatRate), 0.1);
        assert_eq!(resolver.get(FactorField::GaRate), 0.0);
        assert_eq!(resolver.get(FactorField::OrdersPerCustomer), 1.0);

        let provenance = resolver.into_provenance();
        assert_eq!(provenance[&FactorField::VatRate].origin, ValueOrigin::Override);
        assert_eq!(provenance[&FactorField::GaRate].origin, ValueOrigin::Default);
        assert_eq!(provenance[&FactorField::GaRate].tier, Tier::Tier3);
    }

    #[test]
    fn test_out_of_range_record_value_is_clamped() {
        let record = record();
        let mut resolver = FactorResolver::new(&record, None);
        assert_eq!(resolver.get(FactorField::MarketingRate), 1.0);
    }

    #[test]
    fn test_record_tier_is_kept() {
        let record = record();
        let mut resolver = FactorResolver::new(&record, None);
        resolver.get(FactorField::VatRate);
        resolver.get(FactorField::MarketingRate);
        assert_eq!(resolver.tier(FactorField::VatRate), Some(Tier::Tier1));
        assert_eq!(
            resolver.weakest_tier(&[FactorField::VatRate, FactorField::MarketingRate]),
            Some(Tier::Tier3)
        );
    }
}
