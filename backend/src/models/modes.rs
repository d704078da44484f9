//! Behavioral modes that select formula branches
//!
//! Logistics, fulfillment and payment gateway choices do not change raw
//! factor values; they pick which factor (or preset) a formula reads.

use crate::models::scope::{ProjectScope, SalesChannel};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A scenario parameter value outside its enumerated or numeric domain
#[derive(Debug, Clone, Error, PartialEq)]
#[error("Invalid value '{value}' for {field}; allowed: {}", .allowed.join(", "))]
pub struct InvalidParameterError {
    pub field: &'static str,
    pub value: String,
    pub allowed: Vec<&'static str>,
}

/// Head-haul freight mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogisticsMode {
    #[default]
    Sea,
    Air,
}

impl LogisticsMode {
    pub const ALLOWED: [&'static str; 2] = ["sea", "air"];

    pub fn as_str(self) -> &'static str {
        match self {
            LogisticsMode::Sea => "sea",
            LogisticsMode::Air => "air",
        }
    }
}

impl FromStr for LogisticsMode {
    type Err = InvalidParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sea" => Ok(LogisticsMode::Sea),
            "air" => Ok(LogisticsMode::Air),
            _ => Err(InvalidParameterError {
                field: "logistics_mode",
                value: s.to_string(),
                allowed: Self::ALLOWED.to_vec(),
            }),
        }
    }
}

/// Last-mile fulfillment mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FulfillmentMode {
    /// Marketplace fulfillment (e.g. Fulfillment by Amazon)
    Fba,
    /// Third-party logistics warehouse
    ThirdParty,
    /// Shipped direct from origin to the buyer
    Direct,
}

impl FulfillmentMode {
    pub const ALLOWED: [&'static str; 3] = ["fba", "third_party", "direct"];

    pub fn as_str(self) -> &'static str {
        match self {
            FulfillmentMode::Fba => "fba",
            FulfillmentMode::ThirdParty => "third_party",
            FulfillmentMode::Direct => "direct",
        }
    }

    /// Mode a channel uses unless told otherwise
    pub fn for_channel(channel: SalesChannel) -> Self {
        match channel {
            SalesChannel::AmazonFba => FulfillmentMode::Fba,
            SalesChannel::AmazonFbm
            | SalesChannel::Shopify
            | SalesChannel::Walmart
            | SalesChannel::TiktokShop => FulfillmentMode::ThirdParty,
            SalesChannel::Ebay => FulfillmentMode::Direct,
        }
    }
}

impl FromStr for FulfillmentMode {
    type Err = InvalidParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fba" => Ok(FulfillmentMode::Fba),
            "third_party" | "3pl" => Ok(FulfillmentMode::ThirdParty),
            "direct" => Ok(FulfillmentMode::Direct),
            _ => Err(InvalidParameterError {
                field: "fulfillment_mode",
                value: s.to_string(),
                allowed: Self::ALLOWED.to_vec(),
            }),
        }
    }
}

/// Payment gateway selection
///
/// `Recorded` reads `payment_gateway_rate` / `fixed_payment_fee` from the
/// factor record; every other variant is a named preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentGateway {
    #[default]
    Recorded,
    Stripe,
    Paypal,
    Adyen,
    Airwallex,
}

impl PaymentGateway {
    pub const ALLOWED: [&'static str; 5] = ["recorded", "stripe", "paypal", "adyen", "airwallex"];

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentGateway::Recorded => "recorded",
            PaymentGateway::Stripe => "stripe",
            PaymentGateway::Paypal => "paypal",
            PaymentGateway::Adyen => "adyen",
            PaymentGateway::Airwallex => "airwallex",
        }
    }

    /// (percentage rate, fixed fee USD) for presets; None for `Recorded`
    pub fn preset(self) -> Option<(f64, f64)> {
        match self {
            PaymentGateway::Recorded => None,
            PaymentGateway::Stripe => Some((0.029, 0.30)),
            PaymentGateway::Paypal => Some((0.0349, 0.49)),
            PaymentGateway::Adyen => Some((0.026, 0.13)),
            PaymentGateway::Airwallex => Some((0.018, 0.0)),
        }
    }
}

impl FromStr for PaymentGateway {
    type Err = InvalidParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recorded" => Ok(PaymentGateway::Recorded),
            "stripe" => Ok(PaymentGateway::Stripe),
            "paypal" => Ok(PaymentGateway::Paypal),
            "adyen" => Ok(PaymentGateway::Adyen),
            "airwallex" => Ok(PaymentGateway::Airwallex),
            _ => Err(InvalidParameterError {
                field: "payment_gateway",
                value: s.to_string(),
                allowed: Self::ALLOWED.to_vec(),
            }),
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(LogisticsMode, FulfillmentMode, PaymentGateway);

/// Modes in effect for one calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostDrivers {
    pub logistics: LogisticsMode,
    pub fulfillment: FulfillmentMode,
    pub payment_gateway: PaymentGateway,
}

impl CostDrivers {
    /// Modes used when no scenario parameters are given
    pub fn for_scope(scope: &ProjectScope) -> Self {
        Self {
            logistics: LogisticsMode::default(),
            fulfillment: FulfillmentMode::for_channel(scope.sales_channel),
            payment_gateway: PaymentGateway::default(),
        }
    }
}
