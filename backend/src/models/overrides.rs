//! User overrides
//!
//! Sparse field-name → value map built by an editing session. An override
//! replaces the record/default value for that one field only. Unknown keys
//! are kept (so round-tripping a session is lossless) but ignored at
//! resolution time.

use crate::factors::FactorField;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserOverrides {
    values: BTreeMap<String, f64>,
}

impl UserOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set an override by field
    pub fn with(mut self, field: FactorField, value: f64) -> Self {
        self.values.insert(field.name().to_string(), value);
        self
    }

    /// Builder: set an override by raw key (may be unknown)
    pub fn with_key(mut self, key: impl Into<String>, value: f64) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    /// Override for a known field
    ///
    /// Non-finite values are treated as absent.
    pub fn get(&self, field: FactorField) -> Option<f64> {
        self.values
            .get(field.name())
            .copied()
            .filter(|v| v.is_finite())
    }

    /// Keys that do not name a known factor field
    pub fn unknown_keys(&self) -> Vec<&str> {
        self.values
            .keys()
            .filter(|k| FactorField::from_name(k).is_none())
            .map(String::as_str)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Layer `other` on top of `self`; `other` wins on conflicts
    pub fn merged_with(&self, other: &UserOverrides) -> UserOverrides {
        let mut values = self.values.clone();
        values.extend(other.values.iter().map(|(k, v)| (k.clone(), *v)));
        UserOverrides { values }
    }
}

impl FromIterator<(FactorField, f64)> for UserOverrides {
    fn from_iter<I: IntoIterator<Item = (FactorField, f64)>>(iter: I) -> Self {
        UserOverrides {
            values: iter
                .into_iter()
                .map(|(f, v)| (f.name().to_string(), v))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_keys_are_reported_not_resolved() {
        let overrides = UserOverrides::new()
            .with(FactorField::VatRate, 0.2)
            .with_key("flux_capacitor_fee", 88.0);

        assert_eq!(overrides.get(FactorField::VatRate), Some(0.2));
        assert_eq!(overrides.unknown_keys(), vec!["flux_capacitor_fee"]);
    }

    #[test]
    fn test_non_finite_override_is_absent() {
        let overrides = UserOverrides::new().with(FactorField::GaRate, f64::NAN);
        assert_eq!(overrides.get(FactorField::GaRate), None);
    }

    #[test]
    fn test_merge_prefers_other() {
        let base = UserOverrides::new()
            .with(FactorField::VatRate, 0.2)
            .with(FactorField::GaRate, 0.05);
        let top = UserOverrides::new().with(FactorField::VatRate, 0.1);
        let merged = base.merged_with(&top);

        assert_eq!(merged.get(FactorField::VatRate), Some(0.1));
        assert_eq!(merged.get(FactorField::GaRate), Some(0.05));
    }

    #[test]
    fn test_deserializes_from_plain_object() {
        let overrides: UserOverrides =
            serde_json::from_str(r#"{"vat_rate": 0.07, "unknown": 1.0}"#).unwrap();
        assert_eq!(overrides.get(FactorField::VatRate), Some(0.07));
        assert_eq!(overrides.len(), 2);
    }
}
