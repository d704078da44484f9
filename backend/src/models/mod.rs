//! Domain models for the cost engine

pub mod factor;
pub mod modes;
pub mod module;
pub mod overrides;
pub mod provenance;
pub mod result;
pub mod scope;

// Re-exports
pub use factor::CostFactorRecord;
pub use modes::{CostDrivers, FulfillmentMode, InvalidParameterError, LogisticsMode, PaymentGateway};
pub use module::CostModule;
pub use overrides::UserOverrides;
pub use provenance::{SourceKind, Sourced, Tier};
pub use result::{
    CapexBreakdown, CostResult, CostShare, Horizon, Kpis, LineItem, ModuleBreakdown,
    OpexBreakdown, ProvenanceSummary, ResolvedFactor, UnitEconomics, ValueOrigin,
};
pub use scope::{ProjectScope, SalesChannel, ScopeWarning};
