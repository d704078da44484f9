//! The eight standardized cost modules
//!
//! M1-M3 are one-time CAPEX, M4-M8 are per-unit OPEX.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Cost module identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostModule {
    /// Market entry (registrations, legal)
    M1,
    /// Technical compliance (certification, testing, labeling)
    M2,
    /// Supply-chain setup (warehouse deposit, integration)
    M3,
    /// Goods & tax (COGS, head haul, duty, VAT)
    M4,
    /// Logistics & delivery (last mile, returns)
    M5,
    /// Marketing & acquisition
    M6,
    /// Payment fees
    M7,
    /// Operations & management
    M8,
}

impl CostModule {
    pub const ALL: [CostModule; 8] = [
        CostModule::M1,
        CostModule::M2,
        CostModule::M3,
        CostModule::M4,
        CostModule::M5,
        CostModule::M6,
        CostModule::M7,
        CostModule::M8,
    ];

    pub const CAPEX: [CostModule; 3] = [CostModule::M1, CostModule::M2, CostModule::M3];

    pub const OPEX: [CostModule; 5] = [
        CostModule::M4,
        CostModule::M5,
        CostModule::M6,
        CostModule::M7,
        CostModule::M8,
    ];

    pub fn code(self) -> &'static str {
        match self {
            CostModule::M1 => "m1",
            CostModule::M2 => "m2",
            CostModule::M3 => "m3",
            CostModule::M4 => "m4",
            CostModule::M5 => "m5",
            CostModule::M6 => "m6",
            CostModule::M7 => "m7",
            CostModule::M8 => "m8",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            CostModule::M1 => "Market Entry",
            CostModule::M2 => "Technical Compliance",
            CostModule::M3 => "Supply Chain Setup",
            CostModule::M4 => "Goods & Tax",
            CostModule::M5 => "Logistics & Delivery",
            CostModule::M6 => "Marketing & Acquisition",
            CostModule::M7 => "Payment Fees",
            CostModule::M8 => "Operations & Management",
        }
    }

    pub fn is_capex(self) -> bool {
        matches!(self, CostModule::M1 | CostModule::M2 | CostModule::M3)
    }

    /// Parse a module code ("m1".."m8", case-insensitive)
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim().to_ascii_lowercase();
        CostModule::ALL.into_iter().find(|m| m.code() == code)
    }
}

impl fmt::Display for CostModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code().to_ascii_uppercase(), self.display_name())
    }
}
