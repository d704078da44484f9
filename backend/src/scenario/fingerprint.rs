//! Scenario fingerprint
//!
//! SHA-256 over the canonical JSON of (scope, factor record, dials). Two
//! inputs with equal fingerprints produce equal results, so callers can key
//! their own memoization on it. Dials are hashed after normalization, so
//! dials that clamp to the same values share a fingerprint.

use super::params::ScenarioParameters;
use crate::models::{CostFactorRecord, InvalidParameterError, ProjectScope};
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FingerprintError {
    #[error(transparent)]
    InvalidParameter(#[from] InvalidParameterError),

    #[error("failed to serialize scenario: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct FingerprintInput<'a> {
    scope: &'a ProjectScope,
    factor: &'a CostFactorRecord,
    params: &'a ScenarioParameters,
}

/// Hex SHA-256 digest of the full scenario input
///
/// # Errors
///
/// Fails on a non-finite dial, the same input `simulate` rejects.
pub fn scenario_fingerprint(
    scope: &ProjectScope,
    factor: &CostFactorRecord,
    params: &ScenarioParameters,
) -> Result<String, FingerprintError> {
    let params = params.normalized()?;
    let value = serde_json::to_value(FingerprintInput {
        scope,
        factor,
        params: &params,
    })?;

    let json = serde_json::to_string(&canonicalize(value))?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

/// Recursively sort object keys
fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> =
                map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
            Value::Object(sorted.into_iter().collect())
        }
        Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
        other => other,
    }
}
