//! Upstream factor lookup contract
//!
//! The engine never decides which record to load; callers hand it a
//! `CostFactorSource`. A missing record is reported as `None` and handled by
//! the caller (the comparator turns it into a per-row error).

use crate::models::CostFactorRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Version label meaning "newest available"
pub const LATEST_VERSION: &str = "latest";

/// Resolves a cost factor record for country × industry × version
///
/// Sources are shared across comparator worker threads.
pub trait CostFactorSource: Send + Sync {
    fn get_cost_factor(
        &self,
        country: &str,
        industry: &str,
        version: &str,
    ) -> Option<CostFactorRecord>;
}

/// In-memory factor source
///
/// Keyed by (country, industry); each key holds every loaded version.
/// `"latest"` resolves to the lexicographically greatest version label.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<CostFactorRecord>", into = "Vec<CostFactorRecord>")]
pub struct InMemoryFactorSource {
    records: HashMap<(String, String), Vec<CostFactorRecord>>,
}

impl InMemoryFactorSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: CostFactorRecord) {
        let key = (record.country.to_ascii_uppercase(), record.industry.clone());
        let versions = self.records.entry(key).or_default();
        versions.retain(|r| r.version != record.version);
        versions.push(record);
        versions.sort_by(|a, b| a.version.cmp(&b.version));
    }

    pub fn with_record(mut self, record: CostFactorRecord) -> Self {
        self.insert(record);
        self
    }

    pub fn len(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl CostFactorSource for InMemoryFactorSource {
    fn get_cost_factor(
        &self,
        country: &str,
        industry: &str,
        version: &str,
    ) -> Option<CostFactorRecord> {
        let versions = self
            .records
            .get(&(country.to_ascii_uppercase(), industry.to_string()))?;

        if version == LATEST_VERSION {
            versions.last().cloned()
        } else {
            versions.iter().find(|r| r.version == version).cloned()
        }
    }
}

impl From<Vec<CostFactorRecord>> for InMemoryFactorSource {
    fn from(records: Vec<CostFactorRecord>) -> Self {
        let mut source = Self::new();
        for record in records {
            source.insert(record);
        }
        source
    }
}

impl From<InMemoryFactorSource> for Vec<CostFactorRecord> {
    fn from(source: InMemoryFactorSource) -> Self {
        let mut records: Vec<CostFactorRecord> = source.records.into_values().flatten().collect();
        records.sort_by(|a, b| {
            (&a.country, &a.industry, &a.version).cmp(&(&b.country, &b.industry, &b.version))
        });
        records
    }
}
