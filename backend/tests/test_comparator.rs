//! Scenario Comparator Tests
//!
//! Critical invariants tested:
//! - Independence: a row equals a standalone calculation for that country
//! - Missing records become error rows, never abort the batch
//! - Ranking direction per metric; error rows last; stable ties

mod common;

use common::*;
use crossborder_cost_core_rs::calculator::ModelConfig;
use crossborder_cost_core_rs::scenario::{
    compare, CompareError, ComparisonRow, Metric, MetricSelector, RowStatus,
};
use crossborder_cost_core_rs::{calculate, InMemoryFactorSource};

fn countries(codes: &[&str]) -> Vec<String> {
    codes.iter().map(|c| c.to_string()).collect()
}

fn order(rows: &[ComparisonRow]) -> Vec<&str> {
    rows.iter().map(|r| r.country.as_str()).collect()
}

#[test]
fn test_empty_country_list_is_an_error() {
    let empty: Vec<String> = Vec::new();
    let err = compare(
        &empty,
        &us_scope(),
        MetricSelector::All,
        &source(),
        &ModelConfig::default(),
    )
    .unwrap_err();
    assert_eq!(err, CompareError::EmptyCountryList);
}

#[test]
fn test_all_keeps_request_order_without_ranks() {
    let rows = compare(
        &countries(&["GB", "US", "DE"]),
        &us_scope(),
        MetricSelector::All,
        &source(),
        &ModelConfig::default(),
    )
    .unwrap();

    assert_eq!(order(&rows), vec!["GB", "US", "DE"]);
    assert!(rows.iter().all(|r| r.rank.is_none()));
    assert_eq!(rows[0].country_name.as_deref(), Some("United Kingdom"));
}

#[test]
fn test_rows_match_standalone_calculation() {
    let rows = compare(
        &countries(&["US", "DE", "GB"]),
        &us_scope(),
        MetricSelector::All,
        &source(),
        &ModelConfig::default(),
    )
    .unwrap();

    let expected = [
        calculate(&us_scope(), &us_record(), None),
        calculate(&us_scope().for_country("DE"), &de_record(), None),
        calculate(&us_scope().for_country("GB"), &gb_record(), None),
    ];

    for (row, result) in rows.iter().zip(expected.iter()) {
        let summary = row.summary.as_ref().unwrap();
        assert_eq!(summary.kpis, result.kpis);
        assert_eq!(summary.unit_economics, result.unit_economics);
        assert_eq!(summary.opex_total, result.opex.total);
        assert_eq!(summary.capex_total, result.capex.total);
    }
}

#[test]
fn test_row_unaffected_by_other_countries() {
    let alone = compare(
        &countries(&["DE"]),
        &us_scope(),
        MetricSelector::All,
        &source(),
        &ModelConfig::default(),
    )
    .unwrap();
    let together = compare(
        &countries(&["US", "GB", "DE", "FR"]),
        &us_scope(),
        MetricSelector::All,
        &source(),
        &ModelConfig::default(),
    )
    .unwrap();

    assert_eq!(alone[0], together[2]);
}

#[test]
fn test_parallel_result_is_deterministic() {
    let list = countries(&["US", "DE", "GB", "US", "DE", "GB", "US", "DE", "GB", "FR"]);
    let first = compare(
        &list,
        &us_scope(),
        MetricSelector::Metric(Metric::Roi),
        &source(),
        &ModelConfig::default(),
    )
    .unwrap();

    for _ in 0..10 {
        let again = compare(
            &list,
            &us_scope(),
            MetricSelector::Metric(Metric::Roi),
            &source(),
            &ModelConfig::default(),
        )
        .unwrap();
        assert_eq!(first, again);
    }
}

#[test]
fn test_rank_by_gross_margin_descending() {
    let rows = compare(
        &countries(&["US", "GB", "DE"]),
        &us_scope(),
        MetricSelector::Metric(Metric::GrossMargin),
        &source(),
        &ModelConfig::default(),
    )
    .unwrap();

    // DE 19 % VAT < GB 20 % VAT < US 55 % tariff
    assert_eq!(order(&rows), vec!["DE", "GB", "US"]);
    let ranks: Vec<Option<usize>> = rows.iter().map(|r| r.rank).collect();
    assert_eq!(ranks, vec![Some(1), Some(2), Some(3)]);
}

#[test]
fn test_rank_by_unit_cost_ascending() {
    let rows = compare(
        &countries(&["US", "GB", "DE"]),
        &us_scope(),
        MetricSelector::Metric(Metric::UnitCost),
        &source(),
        &ModelConfig::default(),
    )
    .unwrap();
    assert_eq!(order(&rows), vec!["DE", "GB", "US"]);
}

#[test]
fn test_missing_record_becomes_trailing_error_row() {
    let rows = compare(
        &countries(&["FR", "US", "DE"]),
        &us_scope(),
        MetricSelector::Metric(Metric::GrossMargin),
        &source(),
        &ModelConfig::default(),
    )
    .unwrap();

    assert_eq!(order(&rows), vec!["DE", "US", "FR"]);
    let fr = &rows[2];
    assert_eq!(fr.status, RowStatus::Error);
    assert!(fr.rank.is_none());
    assert!(fr.summary.is_none());
    assert!(fr.reason.as_deref().unwrap().contains("FR"));
}

#[test]
fn test_unreachable_payback_sorts_last() {
    let profitable = us_scope().with_product(0.5, 5.0, 49.99);
    let rows = compare(
        &countries(&["US", "DE"]),
        &profitable,
        MetricSelector::Metric(Metric::PaybackPeriod),
        &source(),
        &ModelConfig::default(),
    )
    .unwrap();

    let payback: Vec<bool> = rows
        .iter()
        .map(|r| r.summary.as_ref().unwrap().kpis.payback_period_months.is_reachable())
        .collect();
    // Reachable rows first
    assert!(payback.windows(2).all(|w| w[0] || !w[1]));
}

#[test]
fn test_ties_keep_request_order() {
    // Same record under two codes gives identical metrics
    let twin = record_with_rates("AT", "Austria", 0.0, 0.19);
    let source = InMemoryFactorSource::new()
        .with_record(de_record())
        .with_record(twin);

    let rows = compare(
        &countries(&["AT", "DE"]),
        &us_scope(),
        MetricSelector::Metric(Metric::GrossMargin),
        &source,
        &ModelConfig::default(),
    )
    .unwrap();
    assert_eq!(order(&rows), vec!["AT", "DE"]);

    let rows = compare(
        &countries(&["DE", "AT"]),
        &us_scope(),
        MetricSelector::Metric(Metric::GrossMargin),
        &source,
        &ModelConfig::default(),
    )
    .unwrap();
    assert_eq!(order(&rows), vec!["DE", "AT"]);
}

#[test]
fn test_requested_version_is_used() {
    let mut older = record_with_rates("US", "United States", 0.0, 0.0);
    older.version = "2023.4".to_string();
    let source = source().with_record(older);
    let config = ModelConfig {
        factor_version: "2023.4".to_string(),
        ..ModelConfig::default()
    };

    let rows = compare(
        &countries(&["US", "DE"]),
        &us_scope(),
        MetricSelector::All,
        &source,
        &config,
    )
    .unwrap();

    assert!(rows[0].is_ok());
    assert_eq!(rows[1].status, RowStatus::Error);
}
