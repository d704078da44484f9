//! Scenarios: what-if simulation and cross-country comparison
//!
//! - `params`: the seven scenario dials and their loosely-typed input form
//! - `simulator`: re-drives the calculator under the dials
//! - `fingerprint`: content hash of a scenario input for caller-side caching
//! - `comparator`: one calculation per country, ranked by a metric

pub mod comparator;
pub mod fingerprint;
pub mod params;
pub mod simulator;

// Re-exports
pub use comparator::{
    compare, CompareError, ComparisonRow, Metric, MetricSelector, RowStatus, RowSummary,
};
pub use fingerprint::{scenario_fingerprint, FingerprintError};
pub use params::{RawScenarioParameters, ScenarioParameters, RECOMMENDED_DEBOUNCE};
pub use simulator::{simulate, simulate_with, simulate_with_overrides};
