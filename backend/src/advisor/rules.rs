//! Advice rule table
//!
//! Rules are evaluated in table order. Each check returns a `Finding` when
//! its condition holds; the advisor attaches the rule's id, category and
//! severity.

use super::context::AdvisorContext;
use super::thresholds::AdvisorThresholds;
use super::{Severity, SuggestionCategory};
use crate::models::{Horizon, LogisticsMode};

/// What a firing rule reports
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    pub condition: String,
    pub rationale: String,
    /// None when the metric has no finite value (an unreachable horizon)
    pub metric_value: Option<f64>,
    pub threshold: f64,
}

pub struct Rule {
    pub id: &'static str,
    pub category: SuggestionCategory,
    pub severity: Severity,
    pub check: fn(&AdvisorContext, &AdvisorThresholds) -> Option<Finding>,
}

pub const RULES: &[Rule] = &[
    Rule {
        id: "negative_margin",
        category: SuggestionCategory::Pricing,
        severity: Severity::Critical,
        check: negative_margin,
    },
    Rule {
        id: "thin_margin",
        category: SuggestionCategory::Pricing,
        severity: Severity::High,
        check: thin_margin,
    },
    Rule {
        id: "logistics_share_high",
        category: SuggestionCategory::Logistics,
        severity: Severity::High,
        check: logistics_share_high,
    },
    Rule {
        id: "air_freight_in_use",
        category: SuggestionCategory::Logistics,
        severity: Severity::Medium,
        check: air_freight_in_use,
    },
    Rule {
        id: "high_tariff",
        category: SuggestionCategory::CostReduction,
        severity: Severity::High,
        check: high_tariff,
    },
    Rule {
        id: "ltv_cac_below_target",
        category: SuggestionCategory::CostReduction,
        severity: Severity::High,
        check: ltv_cac_below_target,
    },
    Rule {
        id: "payment_fees_high",
        category: SuggestionCategory::CostReduction,
        severity: Severity::Medium,
        check: payment_fees_high,
    },
    Rule {
        id: "commission_heavy",
        category: SuggestionCategory::Pricing,
        severity: Severity::Medium,
        check: commission_heavy,
    },
    Rule {
        id: "payback_unreachable",
        category: SuggestionCategory::MarketSelection,
        severity: Severity::Critical,
        check: payback_unreachable,
    },
    Rule {
        id: "payback_slow",
        category: SuggestionCategory::MarketSelection,
        severity: Severity::Medium,
        check: payback_slow,
    },
    Rule {
        id: "low_data_confidence",
        category: SuggestionCategory::MarketSelection,
        severity: Severity::Low,
        check: low_data_confidence,
    },
];

fn pct(v: f64) -> String {
    format!("{:.1}%", v * 100.0)
}

fn usd(h: Horizon) -> String {
    match h {
        Horizon::Finite(v) => format!("${:.2}", v),
        Horizon::Unreachable => "unreachable".to_string(),
    }
}

// ============================================================================
// Pricing
// ============================================================================

fn negative_margin(ctx: &AdvisorContext, _: &AdvisorThresholds) -> Option<Finding> {
    if ctx.gross_margin >= 0.0 {
        return None;
    }
    Some(Finding {
        condition: format!("gross margin {} < 0", pct(ctx.gross_margin)),
        rationale: format!(
            "Each unit sold at ${:.2} costs ${:.2} to deliver. The breakeven price is {}; \
             raise the price or cut the largest cost module before launching.",
            ctx.selling_price,
            ctx.unit_cost,
            usd(ctx.breakeven_price)
        ),
        metric_value: Some(ctx.gross_margin),
        threshold: 0.0,
    })
}

fn thin_margin(ctx: &AdvisorContext, t: &AdvisorThresholds) -> Option<Finding> {
    if ctx.gross_margin < 0.0 || ctx.gross_margin >= t.target_margin {
        return None;
    }
    let target_price = Horizon::from_ratio(
        ctx.fixed_unit_cost,
        1.0 - ctx.variable_cost_rate - t.target_margin,
    );
    let reach = match target_price {
        Horizon::Finite(_) => format!("needs a price of about {}", usd(target_price)),
        Horizon::Unreachable => "is out of reach by raising the price alone".to_string(),
    };
    Some(Finding {
        condition: format!("gross margin {} < {}", pct(ctx.gross_margin), pct(t.target_margin)),
        rationale: format!(
            "Margin of {} leaves little room for price competition or returns. \
             Reaching {} {}.",
            pct(ctx.gross_margin),
            pct(t.target_margin),
            reach
        ),
        metric_value: Some(ctx.gross_margin),
        threshold: t.target_margin,
    })
}

fn commission_heavy(ctx: &AdvisorContext, t: &AdvisorThresholds) -> Option<Finding> {
    if ctx.commission_rate <= t.commission_rate {
        return None;
    }
    Some(Finding {
        condition: format!(
            "platform commission {} > {}",
            pct(ctx.commission_rate),
            pct(t.commission_rate)
        ),
        rationale: format!(
            "The platform keeps ${:.2} of every ${:.2} sale. Consider a lower-fee channel \
             or a direct storefront for repeat buyers.",
            ctx.selling_price * ctx.commission_rate,
            ctx.selling_price
        ),
        metric_value: Some(ctx.commission_rate),
        threshold: t.commission_rate,
    })
}

// ============================================================================
// Logistics
// ============================================================================

fn logistics_share_high(ctx: &AdvisorContext, t: &AdvisorThresholds) -> Option<Finding> {
    if ctx.logistics_share <= t.logistics_share {
        return None;
    }
    Some(Finding {
        condition: format!(
            "logistics share {} > {}",
            pct(ctx.logistics_share),
            pct(t.logistics_share)
        ),
        rationale: format!(
            "Delivery and returns take {} of the ${:.2} unit cost. Compare fulfillment \
             modes or negotiate last-mile rates.",
            pct(ctx.logistics_share),
            ctx.unit_cost
        ),
        metric_value: Some(ctx.logistics_share),
        threshold: t.logistics_share,
    })
}

fn air_freight_in_use(ctx: &AdvisorContext, t: &AdvisorThresholds) -> Option<Finding> {
    if ctx.logistics_mode != LogisticsMode::Air || ctx.head_haul_share <= t.air_head_haul_share {
        return None;
    }
    let saving = match ctx.sea_head_haul {
        Some(sea) => format!(
            " Sea freight would cost about ${:.2} per unit instead of ${:.2}.",
            sea, ctx.head_haul
        ),
        None => String::new(),
    };
    Some(Finding {
        condition: format!(
            "air head haul share {} > {}",
            pct(ctx.head_haul_share),
            pct(t.air_head_haul_share)
        ),
        rationale: format!(
            "Air freight makes up {} of unit cost.{}",
            pct(ctx.head_haul_share),
            saving
        ),
        metric_value: Some(ctx.head_haul_share),
        threshold: t.air_head_haul_share,
    })
}

// ============================================================================
// Cost reduction
// ============================================================================

fn high_tariff(ctx: &AdvisorContext, t: &AdvisorThresholds) -> Option<Finding> {
    if ctx.tariff_rate <= t.high_tariff_rate {
        return None;
    }
    Some(Finding {
        condition: format!(
            "effective tariff {} > {}",
            pct(ctx.tariff_rate),
            pct(t.high_tariff_rate)
        ),
        rationale: format!(
            "Imports into {} carry a {} effective tariff. Review HS classification, \
             origin rules or a bonded-warehouse route.",
            ctx.country_name,
            pct(ctx.tariff_rate)
        ),
        metric_value: Some(ctx.tariff_rate),
        threshold: t.high_tariff_rate,
    })
}

fn ltv_cac_below_target(ctx: &AdvisorContext, t: &AdvisorThresholds) -> Option<Finding> {
    if ctx.cac <= 0.0 || ctx.ltv_cac >= t.target_ltv_cac {
        return None;
    }
    Some(Finding {
        condition: format!("LTV:CAC {:.2} < {:.2}", ctx.ltv_cac, t.target_ltv_cac),
        rationale: format!(
            "A ${:.2} acquisition cost is recovered only {:.2}x over a customer's lifetime. \
             Improve retention or lower acquisition spend.",
            ctx.cac, ctx.ltv_cac
        ),
        metric_value: Some(ctx.ltv_cac),
        threshold: t.target_ltv_cac,
    })
}

fn payment_fees_high(ctx: &AdvisorContext, t: &AdvisorThresholds) -> Option<Finding> {
    if ctx.payment_gateway_rate <= t.payment_gateway_rate {
        return None;
    }
    Some(Finding {
        condition: format!(
            "payment gateway rate {} > {}",
            pct(ctx.payment_gateway_rate),
            pct(t.payment_gateway_rate)
        ),
        rationale: format!(
            "Gateway fees of {} are above typical cross-border rates. Compare gateway \
             presets in the simulator.",
            pct(ctx.payment_gateway_rate)
        ),
        metric_value: Some(ctx.payment_gateway_rate),
        threshold: t.payment_gateway_rate,
    })
}

// ============================================================================
// Market selection
// ============================================================================

fn payback_unreachable(ctx: &AdvisorContext, _: &AdvisorThresholds) -> Option<Finding> {
    if ctx.payback_months.is_reachable() {
        return None;
    }
    Some(Finding {
        condition: "payback period unreachable".to_string(),
        rationale: format!(
            "Monthly gross profit is not positive, so the ${:.2} entry investment in {} \
             is never recovered. Fix unit economics or pick another market.",
            ctx.capex_total, ctx.country_name
        ),
        metric_value: None,
        threshold: 0.0,
    })
}

fn payback_slow(ctx: &AdvisorContext, t: &AdvisorThresholds) -> Option<Finding> {
    let months = ctx.payback_months.value()?;
    if months <= t.slow_payback {
        return None;
    }
    Some(Finding {
        condition: format!("payback {:.1} months > {:.0}", months, t.slow_payback),
        rationale: format!(
            "Recovering ${:.2} of entry costs takes {:.1} months. Raise volume or \
             phase the market entry spend.",
            ctx.capex_total, months
        ),
        metric_value: Some(months),
        threshold: t.slow_payback,
    })
}

fn low_data_confidence(ctx: &AdvisorContext, t: &AdvisorThresholds) -> Option<Finding> {
    if ctx.mean_confidence >= t.min_confidence {
        return None;
    }
    Some(Finding {
        condition: format!(
            "mean data confidence {:.2} < {:.2}",
            ctx.mean_confidence, t.min_confidence
        ),
        rationale: format!(
            "Many factors for {} are estimates or defaults. Verify them before \
             committing capital.",
            ctx.country_name
        ),
        metric_value: Some(ctx.mean_confidence),
        threshold: t.min_confidence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_ids_are_unique() {
        let mut ids: Vec<&str> = RULES.iter().map(|r| r.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), RULES.len());
    }
}
