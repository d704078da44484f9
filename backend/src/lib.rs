//! Cross-Border Cost Engine - Rust Core
//!
//! Standardized eight-module cost model for cross-border e-commerce, with
//! unit economics, KPIs, what-if simulation and multi-country comparison.
//!
//! # Architecture
//!
//! - **models**: Domain types (scope, factor record, provenance, result)
//! - **factors**: Factor field catalog, schema docs, upstream source contract
//! - **calculator**: scope × record × overrides → itemized `CostResult`
//! - **scenario**: Simulator dials, scenario fingerprint, country comparator
//! - **advisor**: Rule table turning a result into ranked suggestions
//! - **tools**: JSON adapters for chat-assistant tool calls
//!
//! # Critical Invariants
//!
//! 1. All money values are f64 USD; rates are fractions in [0, 1]
//! 2. The calculator is pure and total: no I/O, no panics, no NaN for finite input
//! 3. "Never" KPIs are `Horizon::Unreachable`, not sentinel numbers
//! 4. FFI boundary is JSON strings only

// Module declarations
pub mod advisor;
pub mod calculator;
pub mod factors;
pub mod models;
pub mod scenario;
pub mod tools;

// Re-exports for convenience
pub use advisor::{advise, advise_with, AdvisorThresholds, Focus, Severity, Suggestion};
pub use calculator::{calculate, calculate_with, CommissionPlacement, ModelConfig};
pub use factors::{
    get_factor_schema, CostFactorSource, FactorField, InMemoryFactorSource, LATEST_VERSION,
};
pub use models::{
    CostDrivers, CostFactorRecord, CostModule, CostResult, FulfillmentMode, Horizon,
    InvalidParameterError, LogisticsMode, PaymentGateway, ProjectScope, SalesChannel,
    SourceKind, Sourced, Tier, UserOverrides,
};
pub use scenario::{
    compare, scenario_fingerprint, simulate, simulate_with_overrides, CompareError,
    ComparisonRow, FingerprintError, Metric, MetricSelector, ScenarioParameters,
};
pub use tools::{ToolContext, ToolError, ToolSession};

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn crossborder_cost_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(ffi::calculate_costs, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::simulate_scenario, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::get_cost_breakdown, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::compare_countries, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::get_optimization_suggestions, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::get_factor_schema, m)?)?;
    Ok(())
}
