//! Factor Schema Documentation
//!
//! Self-documenting catalog of every known factor field. Generated from the
//! `FactorField` metadata so the report renderer and chat assistant always
//! see the same defaults and units the calculator uses.

use super::fields::{FactorField, FieldKind};
use crate::models::CostModule;
use serde::{Deserialize, Serialize};

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Documentation for a single factor field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FactorElement {
    /// Wire name (e.g., "effective_tariff_rate")
    pub name: String,

    /// Human-readable display name
    pub display_name: String,

    /// Module the field feeds
    pub module: CostModule,

    pub kind: FieldKind,

    /// What the field represents
    pub description: String,

    /// Where the field enters the cost formulas
    pub formula: String,

    /// Value used when a record lacks the field
    pub default_value: f64,

    /// Unit of measurement
    pub unit: String,
}

/// Complete factor schema documentation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactorSchemaDoc {
    pub version: String,
    pub fields: Vec<FactorElement>,
}

// ============================================================================
// IMPLEMENTATIONS
// ============================================================================

fn describe(field: FactorField) -> (&'static str, &'static str) {
    use FactorField::*;
    match field {
        CompanyRegistrationFee => (
            "Local entity or marketplace seller registration.",
            "M1 itemized one-time cost",
        ),
        TaxRegistrationFee => (
            "VAT/GST/EIN registration and fiscal representative setup.",
            "M1 itemized one-time cost",
        ),
        TrademarkRegistrationFee => (
            "Trademark filing in the target market.",
            "M1 itemized one-time cost",
        ),
        LegalConsultingFee => (
            "Legal review of product claims and terms.",
            "M1 itemized one-time cost",
        ),
        ProductCertificationFee => (
            "Mandatory product certification (FDA, CE, UKCA ...).",
            "M2 itemized one-time cost",
        ),
        ProductTestingFee => (
            "Laboratory testing required for certification.",
            "M2 itemized one-time cost",
        ),
        LabelingComplianceFee => (
            "Label translation and regulatory artwork.",
            "M2 itemized one-time cost",
        ),
        WarehouseDeposit => (
            "Deposit or minimum commitment with a warehouse.",
            "M3 itemized one-time cost",
        ),
        LogisticsSetupFee => (
            "Freight forwarder onboarding and customs bond.",
            "M3 itemized one-time cost",
        ),
        SystemsIntegrationFee => (
            "ERP / marketplace / WMS integration.",
            "M3 itemized one-time cost",
        ),
        EffectiveTariffRate => (
            "Effective import duty rate including additional tariffs.",
            "import_duty = CIF × effective_tariff_rate",
        ),
        VatRate => (
            "Import VAT / GST rate.",
            "VAT = (CIF + import_duty) × vat_rate",
        ),
        SeaFreightPerKg => (
            "Head-haul sea freight cost per kilogram.",
            "head_haul = weight_kg × sea_freight_per_kg (logistics mode sea)",
        ),
        AirFreightPerKg => (
            "Head-haul air freight cost per kilogram.",
            "head_haul = weight_kg × air_freight_per_kg (logistics mode air)",
        ),
        FbaFulfillmentFee => (
            "Marketplace fulfillment fee per unit.",
            "last_mile (fulfillment mode fba)",
        ),
        ThirdPartyFulfillmentFee => (
            "3PL pick, pack and delivery per unit.",
            "last_mile (fulfillment mode third_party)",
        ),
        DirectDeliveryFee => (
            "Cross-border parcel delivery per unit.",
            "last_mile (fulfillment mode direct)",
        ),
        ReturnRate => (
            "Share of units returned.",
            "return_handling = return_rate × return_cost_rate × CIF",
        ),
        ReturnCostRate => (
            "Cost of handling a return as a share of landed goods cost.",
            "return_handling = return_rate × return_cost_rate × CIF",
        ),
        CustomerAcquisitionCost => (
            "Marketing spend to acquire one customer.",
            "cac_amortized = customer_acquisition_cost / orders_per_customer",
        ),
        OrdersPerCustomer => (
            "Expected orders over a customer's lifetime.",
            "cac_amortized, LTV",
        ),
        PlatformCommissionRate => (
            "Marketplace referral commission.",
            "selling_price × platform_commission_rate (M6 by default)",
        ),
        MarketingRate => (
            "Ongoing advertising spend as a share of price.",
            "selling_price × marketing_rate",
        ),
        PaymentGatewayRate => (
            "Percentage fee of the payment processor.",
            "selling_price × payment_gateway_rate",
        ),
        FixedPaymentFee => (
            "Fixed per-transaction payment fee.",
            "added to M7 per unit",
        ),
        CustomerServicePerUnit => (
            "Customer support cost per unit sold.",
            "added to M8 per unit",
        ),
        GaRate => (
            "General & administrative overhead as a share of price.",
            "selling_price × ga_rate",
        ),
    }
}

/// Documentation for every known factor field, in catalog order
pub fn factor_schema_docs() -> Vec<FactorElement> {
    FactorField::ALL
        .into_iter()
        .map(|field| {
            let (description, formula) = describe(field);
            FactorElement {
                name: field.name().to_string(),
                display_name: field.display_name().to_string(),
                module: field.module(),
                kind: field.kind(),
                description: description.to_string(),
                formula: formula.to_string(),
                default_value: field.default_value(),
                unit: field.unit().to_string(),
            }
        })
        .collect()
}

/// Factor schema as pretty-printed JSON
pub fn get_factor_schema() -> Result<String, serde_json::Error> {
    let schema = FactorSchemaDoc {
        version: "1.0".to_string(),
        fields: factor_schema_docs(),
    };

    serde_json::to_string_pretty(&schema)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_field_is_documented() {
        let docs = factor_schema_docs();
        assert_eq!(docs.len(), FactorField::ALL.len());
        for doc in &docs {
            assert!(!doc.description.is_empty(), "{} lacks description", doc.name);
            assert!(!doc.formula.is_empty(), "{} lacks formula", doc.name);
        }
    }

    #[test]
    fn test_schema_json_is_parseable() {
        let json = get_factor_schema().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["version"], "1.0");
        assert_eq!(parsed["fields"][0]["name"], "company_registration_fee");
        assert_eq!(parsed["fields"][0]["module"], "m1");
    }

    #[test]
    fn test_rate_fields_report_fraction_unit() {
        let docs = factor_schema_docs();
        let vat = docs.iter().find(|d| d.name == "vat_rate").unwrap();
        assert_eq!(vat.kind, FieldKind::Rate);
        assert_eq!(vat.unit, "fraction (0-1)");
    }
}
