//! Chat-tool adapters
//!
//! The three operations a conversational assistant may call. Arguments and
//! results are plain JSON values; every call re-runs the model from the
//! session context, so there is no hidden state between calls.
//!
//! `compare_countries` applies the price and volume dials to the compared
//! scope. Overrides and the remaining dials describe the session's own
//! country, so comparison rows use each country's record as published.
//!
//! | Tool | Arguments |
//! |---|---|
//! | `get_cost_breakdown` | `{"module": "all" \| "m1".."m8"}` |
//! | `compare_countries` | `{"countries": [..], "metric": "<metric>" \| "all"}` |
//! | `get_optimization_suggestions` | `{"focus": "<category>" \| "all"}` |

pub mod session;

pub use session::ToolSession;

use crate::advisor::{advise_with, AdvisorThresholds, Focus};
use crate::calculator::ModelConfig;
use crate::factors::CostFactorSource;
use crate::models::{
    CostFactorRecord, CostModule, CostResult, InvalidParameterError, ProjectScope, UserOverrides,
};
use crate::scenario::{compare, simulate_with, CompareError, MetricSelector, ScenarioParameters};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

pub const TOOL_NAMES: [&str; 3] = [
    "get_cost_breakdown",
    "compare_countries",
    "get_optimization_suggestions",
];

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(serde_json::Error),

    #[error(transparent)]
    InvalidParameter(#[from] InvalidParameterError),

    #[error(transparent)]
    Compare(#[from] CompareError),

    #[error("Unknown tool '{0}'")]
    UnknownTool(String),

    #[error("Failed to serialize tool output: {0}")]
    Output(serde_json::Error),
}

/// Session state the tools compute from
pub struct ToolContext<'a> {
    pub scope: &'a ProjectScope,
    pub factor: &'a CostFactorRecord,
    pub source: &'a dyn CostFactorSource,
    pub overrides: Option<UserOverrides>,
    pub params: ScenarioParameters,
    pub config: ModelConfig,
    pub thresholds: AdvisorThresholds,
}

impl<'a> ToolContext<'a> {
    pub fn new(
        scope: &'a ProjectScope,
        factor: &'a CostFactorRecord,
        source: &'a dyn CostFactorSource,
    ) -> Self {
        Self {
            scope,
            factor,
            source,
            overrides: None,
            params: ScenarioParameters::default(),
            config: ModelConfig::default(),
            thresholds: AdvisorThresholds::default(),
        }
    }

    pub fn with_overrides(mut self, overrides: UserOverrides) -> Self {
        self.overrides = Some(overrides);
        self
    }

    pub fn with_params(mut self, params: ScenarioParameters) -> Self {
        self.params = params;
        self
    }

    pub fn with_config(mut self, config: ModelConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_thresholds(mut self, thresholds: AdvisorThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Session scope with the price and volume dials applied
    fn compared_scope(&self) -> Result<ProjectScope, ToolError> {
        Ok(self.params.normalized()?.apply_to_scope(self.scope))
    }

    /// The session's current result
    fn result(&self) -> Result<CostResult, ToolError> {
        Ok(simulate_with(
            self.scope,
            self.factor,
            self.overrides.as_ref(),
            &self.params,
            &self.config,
        )?)
    }
}

// ============================================================================
// Arguments
// ============================================================================

fn all() -> String {
    "all".to_string()
}

#[derive(Debug, Deserialize)]
struct BreakdownArgs {
    #[serde(default = "all")]
    module: String,
}

#[derive(Debug, Deserialize)]
struct CompareArgs {
    countries: Vec<String>,
    #[serde(default = "all")]
    metric: String,
}

#[derive(Debug, Deserialize)]
struct SuggestionArgs {
    #[serde(default = "all")]
    focus: String,
}

fn parse_args<T: DeserializeOwned>(args: &Value) -> Result<T, ToolError> {
    // Assistants sometimes send no arguments at all
    let args = if args.is_null() { json!({}) } else { args.clone() };
    serde_json::from_value(args).map_err(ToolError::InvalidArguments)
}

fn to_output<T: Serialize>(value: &T) -> Result<Value, ToolError> {
    serde_json::to_value(value).map_err(ToolError::Output)
}

fn parse_module(selector: &str) -> Result<Option<CostModule>, InvalidParameterError> {
    if selector.trim().eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    CostModule::from_code(selector)
        .map(Some)
        .ok_or_else(|| InvalidParameterError {
            field: "module",
            value: selector.to_string(),
            allowed: vec!["all", "m1", "m2", "m3", "m4", "m5", "m6", "m7", "m8"],
        })
}

// ============================================================================
// Tools
// ============================================================================

/// Itemized breakdown of one module or all of them
pub fn get_cost_breakdown(ctx: &ToolContext<'_>, args: &Value) -> Result<Value, ToolError> {
    let args: BreakdownArgs = parse_args(args)?;
    let module = parse_module(&args.module)?;
    let result = ctx.result()?;

    match module {
        Some(module) => Ok(json!({
            "country": result.country,
            "module": to_output(result.module(module))?,
            "is_capex": module.is_capex(),
            "share_of_unit_cost": result.opex_share(module),
        })),
        None => {
            let modules: Vec<Value> = CostModule::ALL
                .iter()
                .map(|m| to_output(result.module(*m)))
                .collect::<Result<_, _>>()?;
            Ok(json!({
                "country": result.country,
                "industry": result.industry,
                "factor_version": result.factor_version,
                "modules": modules,
                "capex_total": result.capex.total,
                "opex_total": result.opex.total,
                "unit_economics": to_output(&result.unit_economics)?,
                "kpis": to_output(&result.kpis)?,
                "cost_breakdown": to_output(&result.cost_breakdown)?,
            }))
        }
    }
}

/// The session scope evaluated in each listed country
pub fn compare_countries(ctx: &ToolContext<'_>, args: &Value) -> Result<Value, ToolError> {
    let args: CompareArgs = parse_args(args)?;
    let selector: MetricSelector = args.metric.parse()?;

    let scope = ctx.compared_scope()?;

    let rows = compare(
        args.countries.as_slice(),
        &scope,
        selector,
        ctx.source,
        &ctx.config,
    )?;

    Ok(json!({
        "metric": String::from(selector),
        "rows": to_output(&rows)?,
    }))
}

/// Ranked advice for the session's current result
pub fn get_optimization_suggestions(
    ctx: &ToolContext<'_>,
    args: &Value,
) -> Result<Value, ToolError> {
    let args: SuggestionArgs = parse_args(args)?;
    let focus: Focus = args.focus.parse()?;
    let result = ctx.result()?;

    let suggestions = advise_with(&result, ctx.factor, focus, &ctx.thresholds);

    Ok(json!({
        "country": result.country,
        "focus": to_output(&focus)?,
        "suggestions": to_output(&suggestions)?,
    }))
}

/// Dispatch a tool call by name
pub fn call_tool(ctx: &ToolContext<'_>, name: &str, args: &Value) -> Result<Value, ToolError> {
    tracing::debug!(tool = name, "tool call");
    match name {
        "get_cost_breakdown" => get_cost_breakdown(ctx, args),
        "compare_countries" => compare_countries(ctx, args),
        "get_optimization_suggestions" => get_optimization_suggestions(ctx, args),
        other => Err(ToolError::UnknownTool(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_module_selector() {
        assert_eq!(parse_module("all").unwrap(), None);
        assert_eq!(parse_module("M5").unwrap(), Some(CostModule::M5));
        let err = parse_module("m9").unwrap_err();
        assert_eq!(err.field, "module");
    }

    #[test]
    fn test_null_args_use_defaults() {
        let args: SuggestionArgs = parse_args(&Value::Null).unwrap();
        assert_eq!(args.focus, "all");
    }

    #[test]
    fn test_wrong_shape_is_invalid_arguments() {
        let err = parse_args::<CompareArgs>(&json!({"countries": "US"})).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }
}
