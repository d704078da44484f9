//! Cost Factor Catalog and Sources
//!
//! This module provides:
//! - The closed set of factor fields (`fields`)
//! - Self-documenting schema for those fields (`schema_docs`)
//! - The upstream lookup contract (`source`)

pub mod fields;
pub mod schema_docs;
pub mod source;

// Re-exports
pub use fields::{FactorField, FieldKind, UnknownFieldError};
pub use schema_docs::{factor_schema_docs, get_factor_schema, FactorElement, FactorSchemaDoc};
pub use source::{CostFactorSource, InMemoryFactorSource, LATEST_VERSION};
