//! Chat Tool Tests
//!
//! Critical invariants tested:
//! - Tool output is plain JSON built from the same calculation as `calculate`
//! - Invalid selectors name the field and the allowed values
//! - Unknown tools and malformed arguments are errors, not panics

mod common;

use common::*;
use crossborder_cost_core_rs::scenario::ScenarioParameters;
use crossborder_cost_core_rs::tools::{call_tool, TOOL_NAMES};
use crossborder_cost_core_rs::{
    FactorField, LogisticsMode, ToolContext, ToolError, ToolSession, UserOverrides,
};
use serde_json::json;

#[test]
fn test_breakdown_all_modules() {
    let (scope, record, source) = (us_scope(), us_record(), source());
    let ctx = ToolContext::new(&scope, &record, &source);

    let out = call_tool(&ctx, "get_cost_breakdown", &json!({"module": "all"})).unwrap();

    assert_eq!(out["country"], "US");
    assert_eq!(out["modules"].as_array().unwrap().len(), 8);
    assert_eq!(out["capex_total"], 5050.0);
    assert!(approx(out["opex_total"].as_f64().unwrap(), 26.17095, 1e-9));
    assert_eq!(out["kpis"]["payback_period_months"]["status"], "unreachable");
}

#[test]
fn test_breakdown_single_module() {
    let (scope, record, source) = (us_scope(), us_record(), source());
    let ctx = ToolContext::new(&scope, &record, &source);

    let out = call_tool(&ctx, "get_cost_breakdown", &json!({"module": "M4"})).unwrap();

    assert_eq!(out["is_capex"], false);
    assert!(approx(out["module"]["total"].as_f64().unwrap(), 9.30, 1e-9));
    let share = out["share_of_unit_cost"].as_f64().unwrap();
    assert!(approx(share, 9.30 / 26.17095, 1e-9));
}

#[test]
fn test_breakdown_reflects_overrides_and_dials() {
    let (scope, record, source) = (us_scope(), us_record(), source());
    let ctx = ToolContext::new(&scope, &record, &source)
        .with_overrides(UserOverrides::new().with(FactorField::EffectiveTariffRate, 0.0))
        .with_params(ScenarioParameters::default().with_logistics_mode(LogisticsMode::Air));

    let out = call_tool(&ctx, "get_cost_breakdown", &json!({"module": "m4"})).unwrap();
    // COGS 5 + air 4 + no duty + no VAT
    assert!(approx(out["module"]["total"].as_f64().unwrap(), 9.0, 1e-12));
}

#[test]
fn test_breakdown_rejects_unknown_module() {
    let (scope, record, source) = (us_scope(), us_record(), source());
    let ctx = ToolContext::new(&scope, &record, &source);

    let err = call_tool(&ctx, "get_cost_breakdown", &json!({"module": "m9"})).unwrap_err();
    match err {
        ToolError::InvalidParameter(e) => {
            assert_eq!(e.field, "module");
            assert!(e.allowed.contains(&"m8"));
        }
        other => panic!("expected InvalidParameter, got {other:?}"),
    }
}

#[test]
fn test_compare_countries_ranks_rows() {
    let (scope, record, source) = (us_scope(), us_record(), source());
    let ctx = ToolContext::new(&scope, &record, &source);

    let out = call_tool(
        &ctx,
        "compare_countries",
        &json!({"countries": ["US", "GB", "DE", "FR"], "metric": "gross_margin"}),
    )
    .unwrap();

    assert_eq!(out["metric"], "gross_margin");
    let rows = out["rows"].as_array().unwrap();
    let order: Vec<&str> = rows.iter().map(|r| r["country"].as_str().unwrap()).collect();
    assert_eq!(order, vec!["DE", "GB", "US", "FR"]);
    assert_eq!(rows[0]["rank"], 1);
    assert_eq!(rows[3]["status"], "error");
    assert!(rows[3]["rank"].is_null());
}

#[test]
fn test_compare_countries_errors() {
    let (scope, record, source) = (us_scope(), us_record(), source());
    let ctx = ToolContext::new(&scope, &record, &source);

    let err = call_tool(
        &ctx,
        "compare_countries",
        &json!({"countries": ["US"], "metric": "happiness"}),
    )
    .unwrap_err();
    assert!(matches!(err, ToolError::InvalidParameter(ref e) if e.field == "metric"));

    let err = call_tool(&ctx, "compare_countries", &json!({"countries": []})).unwrap_err();
    assert!(matches!(err, ToolError::Compare(_)));

    let err = call_tool(&ctx, "compare_countries", &json!({})).unwrap_err();
    assert!(matches!(err, ToolError::InvalidArguments(_)));
}

#[test]
fn test_suggestions_with_focus() {
    let (scope, record, source) = (us_scope(), us_record(), source());
    let ctx = ToolContext::new(&scope, &record, &source);

    let out = call_tool(
        &ctx,
        "get_optimization_suggestions",
        &json!({"focus": "pricing"}),
    )
    .unwrap();

    assert_eq!(out["focus"], "pricing");
    let suggestions = out["suggestions"].as_array().unwrap();
    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0]["rule_id"], "negative_margin");
    assert_eq!(suggestions[0]["severity"], "critical");
}

#[test]
fn test_suggestions_default_focus() {
    let (scope, record, source) = (us_scope(), us_record(), source());
    let ctx = ToolContext::new(&scope, &record, &source);

    let out = call_tool(&ctx, "get_optimization_suggestions", &serde_json::Value::Null).unwrap();
    assert_eq!(out["focus"], "all");
    assert_eq!(out["suggestions"].as_array().unwrap().len(), 4);
}

#[test]
fn test_unknown_tool() {
    let (scope, record, source) = (us_scope(), us_record(), source());
    let ctx = ToolContext::new(&scope, &record, &source);

    assert!(!TOOL_NAMES.contains(&"book_freight"));
    let err = call_tool(&ctx, "book_freight", &json!({})).unwrap_err();
    assert!(matches!(err, ToolError::UnknownTool(ref name) if name == "book_freight"));
}

#[test]
fn test_session_round_trip_through_tools() {
    let session = json!({
        "scope": us_scope(),
        "factor": us_record(),
        "factors": [de_record()],
        "overrides": {"customer_acquisition_cost": 0.0},
    });
    let session = ToolSession::from_json_str(&session.to_string()).unwrap();
    let source = session.source();
    let ctx = session.context(&source).unwrap();

    let out = call_tool(&ctx, "compare_countries", &json!({"countries": ["DE", "US"]})).unwrap();
    let rows = out["rows"].as_array().unwrap();
    assert!(rows.iter().all(|r| r["status"] == "ok"));

    let out = call_tool(&ctx, "get_cost_breakdown", &json!({"module": "m6"})).unwrap();
    let items = out["module"]["items"].as_array().unwrap();
    let cac = items.iter().find(|i| i["key"] == "cac_amortized").unwrap();
    assert_eq!(cac["amount"], 0.0);
}

#[test]
fn test_compare_countries_follows_price_dial() {
    let (scope, record, source) = (us_scope(), us_record(), source());
    let ctx = ToolContext::new(&scope, &record, &source)
        .with_params(ScenarioParameters::default().with_selling_price(49.99));

    let breakdown = call_tool(&ctx, "get_cost_breakdown", &json!({"module": "all"})).unwrap();
    let compared = call_tool(&ctx, "compare_countries", &json!({"countries": ["US"]})).unwrap();

    let margin = &breakdown["unit_economics"]["gross_margin"];
    assert!(margin.as_f64().unwrap() > 0.0);
    assert_eq!(&compared["rows"][0]["summary"]["unit_economics"]["gross_margin"], margin);
}

#[test]
fn test_session_with_invalid_config_is_rejected() {
    let session = json!({
        "scope": us_scope(),
        "factor": us_record(),
        "config": {"factor_version": ""},
    });
    assert!(ToolSession::from_json_str(&session.to_string()).is_err());

    let session = json!({
        "scope": us_scope(),
        "factor": us_record(),
        "thresholds": {"slow_payback": -6.0},
    });
    assert!(ToolSession::from_json_str(&session.to_string()).is_err());
}
