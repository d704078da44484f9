//! CAPEX (M1-M3): one-time market entry, compliance and setup costs
//!
//! Each module is the sum of its itemized fields; every field is
//! individually overridable through the resolver.

use super::resolver::FactorResolver;
use crate::factors::FactorField;
use crate::models::{CapexBreakdown, CostModule, LineItem, ModuleBreakdown};

fn module(resolver: &mut FactorResolver<'_>, module: CostModule) -> ModuleBreakdown {
    let items = FactorField::capex_fields(module)
        .iter()
        .map(|&field| {
            let amount = resolver.get(field);
            LineItem {
                key: field.name().to_string(),
                label: field.display_name().to_string(),
                amount,
                inputs: vec![field],
                tier: resolver.tier(field),
            }
        })
        .collect();

    ModuleBreakdown::from_items(module, items)
}

pub(crate) fn compute_capex(resolver: &mut FactorResolver<'_>) -> CapexBreakdown {
    CapexBreakdown::new(
        module(resolver, CostModule::M1),
        module(resolver, CostModule::M2),
        module(resolver, CostModule::M3),
    )
}
