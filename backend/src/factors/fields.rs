//! Known cost factor fields
//!
//! The closed set of field names a `CostFactorRecord` may carry, with the
//! module each feeds, its kind and its documented default. A field missing
//! from a record resolves to its default at Tier 3.

use crate::models::CostModule;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Value domain of a factor field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Fraction in [0, 1]
    Rate,
    /// Non-negative USD amount
    Amount,
    /// Non-negative count, at least 1
    Count,
}

impl FieldKind {
    /// Clamp a raw value into this kind's domain
    ///
    /// Returns None for NaN so the caller can fall back to the default.
    pub fn clamp(self, value: f64) -> Option<f64> {
        if value.is_nan() {
            return None;
        }
        Some(match self {
            FieldKind::Rate => value.clamp(0.0, 1.0),
            FieldKind::Amount => value.max(0.0),
            FieldKind::Count => value.max(1.0),
        })
    }
}

/// Named cost factor field
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorField {
    // M1 market entry
    CompanyRegistrationFee,
    TaxRegistrationFee,
    TrademarkRegistrationFee,
    LegalConsultingFee,
    // M2 technical compliance
    ProductCertificationFee,
    ProductTestingFee,
    LabelingComplianceFee,
    // M3 supply-chain setup
    WarehouseDeposit,
    LogisticsSetupFee,
    SystemsIntegrationFee,
    // M4 goods & tax
    EffectiveTariffRate,
    VatRate,
    // M5 logistics & delivery
    SeaFreightPerKg,
    AirFreightPerKg,
    FbaFulfillmentFee,
    ThirdPartyFulfillmentFee,
    DirectDeliveryFee,
    ReturnRate,
    ReturnCostRate,
    // M6 marketing & acquisition
    CustomerAcquisitionCost,
    OrdersPerCustomer,
    PlatformCommissionRate,
    MarketingRate,
    // M7 payment
    PaymentGatewayRate,
    FixedPaymentFee,
    // M8 operations
    CustomerServicePerUnit,
    GaRate,
}

impl FactorField {
    pub const ALL: [FactorField; 27] = [
        FactorField::CompanyRegistrationFee,
        FactorField::TaxRegistrationFee,
        FactorField::TrademarkRegistrationFee,
        FactorField::LegalConsultingFee,
        FactorField::ProductCertificationFee,
        FactorField::ProductTestingFee,
        FactorField::LabelingComplianceFee,
        FactorField::WarehouseDeposit,
        FactorField::LogisticsSetupFee,
        FactorField::SystemsIntegrationFee,
        FactorField::EffectiveTariffRate,
        FactorField::VatRate,
        FactorField::SeaFreightPerKg,
        FactorField::AirFreightPerKg,
        FactorField::FbaFulfillmentFee,
        FactorField::ThirdPartyFulfillmentFee,
        FactorField::DirectDeliveryFee,
        FactorField::ReturnRate,
        FactorField::ReturnCostRate,
        FactorField::CustomerAcquisitionCost,
        FactorField::OrdersPerCustomer,
        FactorField::PlatformCommissionRate,
        FactorField::MarketingRate,
        FactorField::PaymentGatewayRate,
        FactorField::FixedPaymentFee,
        FactorField::CustomerServicePerUnit,
        FactorField::GaRate,
    ];

    /// Wire name (matches the serde representation)
    pub fn name(self) -> &'static str {
        match self {
            FactorField::CompanyRegistrationFee => "company_registration_fee",
            FactorField::TaxRegistrationFee => "tax_registration_fee",
            FactorField::TrademarkRegistrationFee => "trademark_registration_fee",
            FactorField::LegalConsultingFee => "legal_consulting_fee",
            FactorField::ProductCertificationFee => "product_certification_fee",
            FactorField::ProductTestingFee => "product_testing_fee",
            FactorField::LabelingComplianceFee => "labeling_compliance_fee",
            FactorField::WarehouseDeposit => "warehouse_deposit",
            FactorField::LogisticsSetupFee => "logistics_setup_fee",
            FactorField::SystemsIntegrationFee => "systems_integration_fee",
            FactorField::EffectiveTariffRate => "effective_tariff_rate",
            FactorField::VatRate => "vat_rate",
            FactorField::SeaFreightPerKg => "sea_freight_per_kg",
            FactorField::AirFreightPerKg => "air_freight_per_kg",
            FactorField::FbaFulfillmentFee => "fba_fulfillment_fee",
            FactorField::ThirdPartyFulfillmentFee => "third_party_fulfillment_fee",
            FactorField::DirectDeliveryFee => "direct_delivery_fee",
            FactorField::ReturnRate => "return_rate",
            FactorField::ReturnCostRate => "return_cost_rate",
            FactorField::CustomerAcquisitionCost => "customer_acquisition_cost",
            FactorField::OrdersPerCustomer => "orders_per_customer",
            FactorField::PlatformCommissionRate => "platform_commission_rate",
            FactorField::MarketingRate => "marketing_rate",
            FactorField::PaymentGatewayRate => "payment_gateway_rate",
            FactorField::FixedPaymentFee => "fixed_payment_fee",
            FactorField::CustomerServicePerUnit => "customer_service_per_unit",
            FactorField::GaRate => "ga_rate",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            FactorField::CompanyRegistrationFee => "Company Registration Fee",
            FactorField::TaxRegistrationFee => "Tax Registration Fee",
            FactorField::TrademarkRegistrationFee => "Trademark Registration Fee",
            FactorField::LegalConsultingFee => "Legal Consulting Fee",
            FactorField::ProductCertificationFee => "Product Certification Fee",
            FactorField::ProductTestingFee => "Product Testing Fee",
            FactorField::LabelingComplianceFee => "Labeling Compliance Fee",
            FactorField::WarehouseDeposit => "Warehouse Deposit",
            FactorField::LogisticsSetupFee => "Logistics Setup Fee",
            FactorField::SystemsIntegrationFee => "Systems Integration Fee",
            FactorField::EffectiveTariffRate => "Effective Tariff Rate",
            FactorField::VatRate => "VAT Rate",
            FactorField::SeaFreightPerKg => "Sea Freight per kg",
            FactorField::AirFreightPerKg => "Air Freight per kg",
            FactorField::FbaFulfillmentFee => "FBA Fulfillment Fee",
            FactorField::ThirdPartyFulfillmentFee => "3PL Fulfillment Fee",
            FactorField::DirectDeliveryFee => "Direct Delivery Fee",
            FactorField::ReturnRate => "Return Rate",
            FactorField::ReturnCostRate => "Return Cost Rate",
            FactorField::CustomerAcquisitionCost => "Customer Acquisition Cost",
            FactorField::OrdersPerCustomer => "Orders per Customer",
            FactorField::PlatformCommissionRate => "Platform Commission Rate",
            FactorField::MarketingRate => "Marketing Rate",
            FactorField::PaymentGatewayRate => "Payment Gateway Rate",
            FactorField::FixedPaymentFee => "Fixed Payment Fee",
            FactorField::CustomerServicePerUnit => "Customer Service per Unit",
            FactorField::GaRate => "G&A Rate",
        }
    }

    /// Module this field feeds
    pub fn module(self) -> CostModule {
        use FactorField::*;
        match self {
            CompanyRegistrationFee | TaxRegistrationFee | TrademarkRegistrationFee
            | LegalConsultingFee => CostModule::M1,
            ProductCertificationFee | ProductTestingFee | LabelingComplianceFee => CostModule::M2,
            WarehouseDeposit | LogisticsSetupFee | SystemsIntegrationFee => CostModule::M3,
            // Head-haul freight enters the CIF value, so it feeds M4
            EffectiveTariffRate | VatRate | SeaFreightPerKg | AirFreightPerKg => CostModule::M4,
            FbaFulfillmentFee | ThirdPartyFulfillmentFee | DirectDeliveryFee | ReturnRate
            | ReturnCostRate => CostModule::M5,
            CustomerAcquisitionCost | OrdersPerCustomer | PlatformCommissionRate
            | MarketingRate => CostModule::M6,
            PaymentGatewayRate | FixedPaymentFee => CostModule::M7,
            CustomerServicePerUnit | GaRate => CostModule::M8,
        }
    }

    pub fn kind(self) -> FieldKind {
        use FactorField::*;
        match self {
            EffectiveTariffRate | VatRate | ReturnRate | ReturnCostRate
            | PlatformCommissionRate | MarketingRate | PaymentGatewayRate | GaRate => {
                FieldKind::Rate
            }
            OrdersPerCustomer => FieldKind::Count,
            _ => FieldKind::Amount,
        }
    }

    /// Documented default used when a record lacks the field
    pub fn default_value(self) -> f64 {
        match self {
            FactorField::OrdersPerCustomer => 1.0,
            _ => 0.0,
        }
    }

    pub fn unit(self) -> &'static str {
        match self.kind() {
            FieldKind::Rate => "fraction (0-1)",
            FieldKind::Count => "orders",
            FieldKind::Amount => match self {
                FactorField::SeaFreightPerKg | FactorField::AirFreightPerKg => "USD per kg",
                _ if self.module().is_capex() => "USD (one-time)",
                _ => "USD per unit",
            },
        }
    }

    /// Parse a wire name; unknown names yield None
    pub fn from_name(name: &str) -> Option<Self> {
        FactorField::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Fields itemized in a CAPEX module, in display order
    pub fn capex_fields(module: CostModule) -> &'static [FactorField] {
        match module {
            CostModule::M1 => &[
                FactorField::CompanyRegistrationFee,
                FactorField::TaxRegistrationFee,
                FactorField::TrademarkRegistrationFee,
                FactorField::LegalConsultingFee,
            ],
            CostModule::M2 => &[
                FactorField::ProductCertificationFee,
                FactorField::ProductTestingFee,
                FactorField::LabelingComplianceFee,
            ],
            CostModule::M3 => &[
                FactorField::WarehouseDeposit,
                FactorField::LogisticsSetupFee,
                FactorField::SystemsIntegrationFee,
            ],
            _ => &[],
        }
    }
}

impl fmt::Display for FactorField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for an unrecognized field name
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Unknown factor field: {0}")]
pub struct UnknownFieldError(pub String);

impl FromStr for FactorField {
    type Err = UnknownFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FactorField::from_name(s).ok_or_else(|| UnknownFieldError(s.to_string()))
    }
}
