//! Shared fixtures for integration tests
//!
//! The US pet-food record reproduces the reference scenario:
//! COGS $5.00, 0.5 kg, $15.99 on Amazon FBA, 500 units/month, 55 % tariff.

#![allow(dead_code)]

use crossborder_cost_core_rs::{
    CostFactorRecord, FactorField, InMemoryFactorSource, ProjectScope, SalesChannel, SourceKind,
};

pub const EPS: f64 = 1e-9;

/// Create the reference US scope
pub fn us_scope() -> ProjectScope {
    ProjectScope::new("US", "pet_food", SalesChannel::AmazonFba)
        .with_product(0.5, 5.00, 15.99)
        .with_monthly_volume(500.0)
}

/// Helper to create a record with every field the reference scenario uses
pub fn record_with_rates(
    country: &str,
    name: &str,
    tariff: f64,
    vat: f64,
) -> CostFactorRecord {
    use FactorField::*;
    use SourceKind::*;

    CostFactorRecord::new(country, name, "pet_food", "2024.1")
        // CAPEX
        .with_field(CompanyRegistrationFee, 500.0, Government, "Secretary of State")
        .with_field(TrademarkRegistrationFee, 350.0, Government, "Trademark office")
        .with_field(ProductCertificationFee, 3000.0, Government, "Food safety regulator")
        .with_field(WarehouseDeposit, 1200.0, MarketSurvey, "3PL quotes")
        // M4
        .with_field(EffectiveTariffRate, tariff, CustomsAuthority, "Tariff schedule")
        .with_field(VatRate, vat, TaxAuthority, "Tax authority")
        // M5
        .with_field(SeaFreightPerKg, 2.00, CarrierTariff, "Forwarder tariff")
        .with_field(AirFreightPerKg, 8.00, CarrierTariff, "Forwarder tariff")
        .with_field(FbaFulfillmentFee, 4.44, PlatformFeeSchedule, "Amazon FBA fees")
        .with_field(ReturnRate, 0.05, IndustryReport, "Category report")
        .with_field(ReturnCostRate, 0.5, IndustryReport, "Category report")
        // M6
        .with_field(CustomerAcquisitionCost, 15.0, MarketSurvey, "Ad benchmarks")
        .with_field(OrdersPerCustomer, 3.0, IndustryReport, "Category report")
        .with_field(PlatformCommissionRate, 0.15, PlatformFeeSchedule, "Amazon referral fees")
        .with_field(MarketingRate, 0.20, Estimate, "Launch plan")
        // M7
        .with_field(PaymentGatewayRate, 0.03, PlatformFeeSchedule, "Gateway pricing")
        .with_field(FixedPaymentFee, 0.30, PlatformFeeSchedule, "Gateway pricing")
        // M8
        .with_field(CustomerServicePerUnit, 0.505, Estimate, "Outsourced CS quote")
        .with_field(GaRate, 0.025, Estimate, "Budget")
}

/// Create the reference US record (55 % tariff, no import VAT)
pub fn us_record() -> CostFactorRecord {
    record_with_rates("US", "United States", 0.55, 0.0)
}

pub fn de_record() -> CostFactorRecord {
    record_with_rates("DE", "Germany", 0.0, 0.19)
}

pub fn gb_record() -> CostFactorRecord {
    record_with_rates("GB", "United Kingdom", 0.0, 0.20)
}

/// Source holding US, DE and GB
pub fn source() -> InMemoryFactorSource {
    InMemoryFactorSource::new()
        .with_record(us_record())
        .with_record(de_record())
        .with_record(gb_record())
}

pub fn approx(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}
