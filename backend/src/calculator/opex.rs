//! OPEX (M4-M8): per-unit recurring costs
//!
//! # Landed cost chain (M4)
//!
//! ```text
//! CIF        = COGS + head_haul
//! duty       = CIF × effective_tariff_rate
//! VAT base   = CIF + duty
//! VAT        = VAT base × vat_rate
//! ```
//!
//! The order is fixed: duty is part of the VAT base.
//!
//! Every OPEX term is either price-independent or a rate on the selling
//! price, so unit cost is `fixed + price × rate_sum`. The breakeven price
//! follows directly from that split.

use super::config::{CommissionPlacement, ModelConfig};
use super::resolver::FactorResolver;
use crate::factors::FactorField;
use crate::models::{
    CostDrivers, CostModule, FulfillmentMode, LineItem, LogisticsMode, ModuleBreakdown,
    OpexBreakdown, PaymentGateway, ProjectScope,
};
use serde::{Deserialize, Serialize};

/// Intermediate values of the CIF → duty → VAT chain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandedCost {
    pub cif_value: f64,
    pub import_duty: f64,
    pub vat_base: f64,
    pub vat: f64,
}

impl LandedCost {
    /// Goods + freight + duty + VAT
    pub fn total(&self) -> f64 {
        self.cif_value + self.import_duty + self.vat
    }
}

/// Compute the landed cost chain for one unit
///
/// # Example
/// ```
/// use crossborder_cost_core_rs::calculator::landed_cost;
///
/// let landed = landed_cost(5.0, 1.0, 0.10, 0.20);
/// assert_eq!(landed.cif_value, 6.0);
/// assert!((landed.import_duty - 0.6).abs() < 1e-12);
/// assert!((landed.vat - 1.32).abs() < 1e-12); // (6.0 + 0.6) × 0.20
/// ```
pub fn landed_cost(cogs: f64, head_haul: f64, tariff_rate: f64, vat_rate: f64) -> LandedCost {
    let cif_value = cogs + head_haul;
    let import_duty = cif_value * tariff_rate;
    let vat_base = cif_value + import_duty;
    let vat = vat_base * vat_rate;
    LandedCost {
        cif_value,
        import_duty,
        vat_base,
        vat,
    }
}

/// Split of unit cost into price-independent and price-proportional parts
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct OpexTerms {
    /// USD per unit not depending on selling price
    pub price_independent: f64,
    /// Sum of rates applied to selling price
    pub price_rate: f64,
    pub customer_acquisition_cost: f64,
    pub cac_amortized: f64,
    pub orders_per_customer: f64,
}

fn item(
    resolver: &FactorResolver<'_>,
    key: &str,
    label: &str,
    amount: f64,
    inputs: &[FactorField],
) -> LineItem {
    LineItem {
        key: key.to_string(),
        label: label.to_string(),
        amount,
        inputs: inputs.to_vec(),
        tier: resolver.weakest_tier(inputs),
    }
}

fn freight_field(mode: LogisticsMode) -> FactorField {
    match mode {
        LogisticsMode::Sea => FactorField::SeaFreightPerKg,
        LogisticsMode::Air => FactorField::AirFreightPerKg,
    }
}

fn last_mile_field(mode: FulfillmentMode) -> FactorField {
    match mode {
        FulfillmentMode::Fba => FactorField::FbaFulfillmentFee,
        FulfillmentMode::ThirdParty => FactorField::ThirdPartyFulfillmentFee,
        FulfillmentMode::Direct => FactorField::DirectDeliveryFee,
    }
}

pub(crate) fn compute_opex(
    scope: &ProjectScope,
    resolver: &mut FactorResolver<'_>,
    drivers: &CostDrivers,
    config: &ModelConfig,
) -> (OpexBreakdown, OpexTerms) {
    let price = scope.selling_price;

    // M4 goods & tax
    let freight = freight_field(drivers.logistics);
    let head_haul = scope.weight_kg * resolver.get(freight);
    let tariff_rate = resolver.get(FactorField::EffectiveTariffRate);
    let vat_rate = resolver.get(FactorField::VatRate);
    let landed = landed_cost(scope.unit_cogs, head_haul, tariff_rate, vat_rate);

    let m4 = ModuleBreakdown::from_items(
        CostModule::M4,
        vec![
            item(resolver, "goods_cost", "Cost of Goods", scope.unit_cogs, &[]),
            item(resolver, "head_haul", "Head-Haul Freight", head_haul, &[freight]),
            item(
                resolver,
                "import_duty",
                "Import Duty",
                landed.import_duty,
                &[FactorField::EffectiveTariffRate, freight],
            ),
            item(
                resolver,
                "vat",
                "Import VAT",
                landed.vat,
                &[FactorField::VatRate, FactorField::EffectiveTariffRate, freight],
            ),
        ],
    );

    // M5 logistics & delivery
    let fulfillment_field = last_mile_field(drivers.fulfillment);
    let last_mile = resolver.get(fulfillment_field);
    let return_rate = resolver.get(FactorField::ReturnRate);
    let return_cost_rate = resolver.get(FactorField::ReturnCostRate);
    let return_handling = return_rate * return_cost_rate * landed.cif_value;

    let m5 = ModuleBreakdown::from_items(
        CostModule::M5,
        vec![
            item(resolver, "last_mile", "Last-Mile Fulfillment", last_mile, &[fulfillment_field]),
            item(
                resolver,
                "return_handling",
                "Return Handling",
                return_handling,
                &[FactorField::ReturnRate, FactorField::ReturnCostRate],
            ),
        ],
    );

    // M6 marketing & acquisition
    let cac = resolver.get(FactorField::CustomerAcquisitionCost);
    let orders = resolver.get(FactorField::OrdersPerCustomer);
    let cac_amortized = cac / orders;
    let commission_rate = resolver.get(FactorField::PlatformCommissionRate);
    let commission = price * commission_rate;
    let marketing_rate = resolver.get(FactorField::MarketingRate);

    let commission_item = item(
        resolver,
        "platform_commission",
        "Platform Commission",
        commission,
        &[FactorField::PlatformCommissionRate],
    );

    let mut m6_items = vec![
        item(
            resolver,
            "cac_amortized",
            "Customer Acquisition (amortized)",
            cac_amortized,
            &[FactorField::CustomerAcquisitionCost, FactorField::OrdersPerCustomer],
        ),
        item(
            resolver,
            "marketing_spend",
            "Marketing Spend",
            price * marketing_rate,
            &[FactorField::MarketingRate],
        ),
    ];

    // M7 payment
    let (gateway_rate, fixed_fee, rate_inputs, fee_inputs): (f64, f64, &[FactorField], &[FactorField]) =
        match drivers.payment_gateway.preset() {
            Some((rate, fee)) => (rate, fee, &[], &[]),
            None => (
                resolver.get(FactorField::PaymentGatewayRate),
                resolver.get(FactorField::FixedPaymentFee),
                &[FactorField::PaymentGatewayRate],
                &[FactorField::FixedPaymentFee],
            ),
        };
    let gateway_label = match drivers.payment_gateway {
        PaymentGateway::Recorded => "Payment Gateway Fee".to_string(),
        preset => format!("Payment Gateway Fee ({})", preset),
    };

    let mut m7_items = vec![
        item(
            resolver,
            "gateway_fee",
            &gateway_label,
            price * gateway_rate,
            rate_inputs,
        ),
        item(
            resolver,
            "fixed_payment_fee",
            "Fixed Payment Fee",
            fixed_fee,
            fee_inputs,
        ),
    ];

    match config.commission_placement {
        CommissionPlacement::Marketing => m6_items.insert(1, commission_item),
        CommissionPlacement::Payment => m7_items.push(commission_item),
    }

    let m6 = ModuleBreakdown::from_items(CostModule::M6, m6_items);
    let m7 = ModuleBreakdown::from_items(CostModule::M7, m7_items);

    // M8 operations
    let customer_service = resolver.get(FactorField::CustomerServicePerUnit);
    let ga_rate = resolver.get(FactorField::GaRate);

    let m8 = ModuleBreakdown::from_items(
        CostModule::M8,
        vec![
            item(
                resolver,
                "customer_service",
                "Customer Service",
                customer_service,
                &[FactorField::CustomerServicePerUnit],
            ),
            item(
                resolver,
                "general_admin",
                "General & Administrative",
                price * ga_rate,
                &[FactorField::GaRate],
            ),
        ],
    );

    let terms = OpexTerms {
        price_independent: m4.total + m5.total + cac_amortized + fixed_fee + customer_service,
        price_rate: commission_rate + marketing_rate + gateway_rate + ga_rate,
        customer_acquisition_cost: cac,
        cac_amortized,
        orders_per_customer: orders,
    };

    (OpexBreakdown::new(m4, m5, m6, m7, m8), terms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CostFactorRecord, SalesChannel, SourceKind};

    fn scope() -> ProjectScope {
        ProjectScope::new("US", "pet_food", SalesChannel::AmazonFba)
            .with_product(0.5, 5.0, 20.0)
            .with_monthly_volume(100.0)
    }

    fn record() -> CostFactorRecord {
        CostFactorRecord::new("US", "United States", "pet_food", "v1")
            .with_field(FactorField::SeaFreightPerKg, 2.0, SourceKind::CarrierTariff, "forwarder")
            .with_field(FactorField::AirFreightPerKg, 8.0, SourceKind::CarrierTariff, "forwarder")
            .with_field(FactorField::PlatformCommissionRate, 0.15, SourceKind::PlatformFeeSchedule, "Amazon")
            .with_field(FactorField::PaymentGatewayRate, 0.03, SourceKind::PlatformFeeSchedule, "Stripe")
    }

    #[test]
    fn test_landed_cost_chain_order() {
        let landed = landed_cost(10.0, 2.0, 0.25, 0.10);
        assert_eq!(landed.cif_value, 12.0);
        assert_eq!(landed.import_duty, 3.0);
        assert_eq!(landed.vat_base, 15.0);
        assert_eq!(landed.vat, 1.5);
        assert_eq!(landed.total(), 16.5);
    }

    #[test]
    fn test_air_mode_reads_air_freight() {
        let record = record();
        let drivers = CostDrivers {
            logistics: LogisticsMode::Air,
            ..CostDrivers::for_scope(&scope())
        };
        let mut resolver = FactorResolver::new(&record, None);
        let (opex, _) = compute_opex(&scope(), &mut resolver, &drivers, &ModelConfig::default());
        assert_eq!(opex.m4.amount("head_haul"), 4.0);
    }

    #[test]
    fn test_commission_counted_once_in_configured_module() {
        let record = record();
        let drivers = CostDrivers::for_scope(&scope());

        let mut resolver = FactorResolver::new(&record, None);
        let (in_m6, _) = compute_opex(&scope(), &mut resolver, &drivers, &ModelConfig::default());
        assert!((in_m6.m6.amount("platform_commission") - 3.0).abs() < 1e-12);
        assert!(in_m6.m7.item("platform_commission").is_none());

        let config = ModelConfig {
            commission_placement: CommissionPlacement::Payment,
            ..ModelConfig::default()
        };
        let mut resolver = FactorResolver::new(&record, None);
        let (in_m7, _) = compute_opex(&scope(), &mut resolver, &drivers, &config);
        assert!((in_m7.m7.amount("platform_commission") - 3.0).abs() < 1e-12);
        assert!(in_m7.m6.item("platform_commission").is_none());

        assert!((in_m6.total - in_m7.total).abs() < 1e-12);
    }

    #[test]
    fn test_gateway_preset_replaces_recorded_rates() {
        let record = record();
        let drivers = CostDrivers {
            payment_gateway: PaymentGateway::Stripe,
            ..CostDrivers::for_scope(&scope())
        };
        let mut resolver = FactorResolver::new(&record, None);
        let (opex, _) = compute_opex(&scope(), &mut resolver, &drivers, &ModelConfig::default());

        assert!((opex.m7.amount("gateway_fee") - 0.58).abs() < 1e-12);
        assert_eq!(opex.m7.amount("fixed_payment_fee"), 0.30);
        assert!(opex.m7.item("gateway_fee").unwrap().inputs.is_empty());
    }

    #[test]
    fn test_terms_reconstruct_unit_cost() {
        let record = record();
        let drivers = CostDrivers::for_scope(&scope());
        let mut resolver = FactorResolver::new(&record, None);
        let (opex, terms) = compute_opex(&scope(), &mut resolver, &drivers, &ModelConfig::default());

        let rebuilt = terms.price_independent + terms.price_rate * scope().selling_price;
        assert!((rebuilt - opex.total).abs() < 1e-9);
    }
}
