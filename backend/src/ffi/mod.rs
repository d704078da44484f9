//! Python bindings
//!
//! Every function takes and returns JSON strings. The first argument is
//! always a `ToolSession` document (scope, record, optional overrides,
//! dials and configuration).
//!
//! # Example (from Python)
//!
//! ```python
//! from crossborder_cost._core import calculate_costs, get_optimization_suggestions
//!
//! result = json.loads(calculate_costs(session_json))
//! advice = json.loads(get_optimization_suggestions(session_json, '{"focus": "pricing"}'))
//! ```

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use serde::Serialize;
use serde_json::Value;

use crate::factors;
use crate::scenario::{simulate_with, RawScenarioParameters, ScenarioParameters};
use crate::tools::{self, ToolSession};

fn value_error(e: impl std::fmt::Display) -> PyErr {
    PyErr::new::<PyValueError, _>(e.to_string())
}

fn parse_session(session_json: &str) -> PyResult<ToolSession> {
    ToolSession::from_json_str(session_json)
        .map_err(|e| value_error(format!("Invalid session JSON: {}", e)))
}

fn parse_args(args_json: Option<&str>) -> PyResult<Value> {
    match args_json {
        Some(json) => serde_json::from_str(json)
            .map_err(|e| value_error(format!("Invalid arguments JSON: {}", e))),
        None => Ok(Value::Null),
    }
}

fn to_json<T: Serialize>(value: &T) -> PyResult<String> {
    serde_json::to_string(value).map_err(value_error)
}

fn run_tool(session_json: &str, name: &str, args_json: Option<&str>) -> PyResult<String> {
    let session = parse_session(session_json)?;
    let source = session.source();
    let ctx = session.context(&source).map_err(value_error)?;
    let args = parse_args(args_json)?;
    let output = tools::call_tool(&ctx, name, &args).map_err(value_error)?;
    to_json(&output)
}

/// Full cost result for the session's scope, record, overrides and dials
#[pyfunction]
pub fn calculate_costs(session_json: &str) -> PyResult<String> {
    let session = parse_session(session_json)?;
    let params = session.scenario_parameters().map_err(value_error)?;
    let result = simulate_with(
        &session.scope,
        &session.factor,
        session.overrides.as_ref(),
        &params,
        &session.config,
    )
    .map_err(value_error)?;
    to_json(&result)
}

/// Cost result under the given dials (replacing the session's own dials)
#[pyfunction]
pub fn simulate_scenario(session_json: &str, params_json: &str) -> PyResult<String> {
    let session = parse_session(session_json)?;
    let raw: RawScenarioParameters = serde_json::from_str(params_json)
        .map_err(|e| value_error(format!("Invalid scenario parameters: {}", e)))?;
    let params = ScenarioParameters::try_from(raw).map_err(value_error)?;
    let result = simulate_with(
        &session.scope,
        &session.factor,
        session.overrides.as_ref(),
        &params,
        &session.config,
    )
    .map_err(value_error)?;
    to_json(&result)
}

#[pyfunction]
#[pyo3(signature = (session_json, args_json=None))]
pub fn get_cost_breakdown(session_json: &str, args_json: Option<&str>) -> PyResult<String> {
    run_tool(session_json, "get_cost_breakdown", args_json)
}

#[pyfunction]
pub fn compare_countries(session_json: &str, args_json: &str) -> PyResult<String> {
    run_tool(session_json, "compare_countries", Some(args_json))
}

#[pyfunction]
#[pyo3(signature = (session_json, args_json=None))]
pub fn get_optimization_suggestions(
    session_json: &str,
    args_json: Option<&str>,
) -> PyResult<String> {
    run_tool(session_json, "get_optimization_suggestions", args_json)
}

/// Factor catalog documentation as a JSON string
#[pyfunction]
pub fn get_factor_schema() -> PyResult<String> {
    factors::get_factor_schema().map_err(value_error)
}
