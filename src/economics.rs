//! Unit-economics calculator: per-stage acquisition costs and ROI.

use crate::core::{StageValue, StageVolumes, UnitEconomics};

/// Derive cost-per-stage metrics and ROI from solved volumes and spend.
///
/// For each stage with a positive volume, `cost = total_spend / volume`.
/// A zero or not-computable volume (or spend) makes the cost for that
/// stage not-computable; it is never reported as 0 or infinity. ROI is
/// `revenue / total_spend` when spend is positive.
pub fn compute_unit_economics(
    volumes: &StageVolumes,
    total_spend: StageValue,
    revenue: f64,
) -> UnitEconomics {
    UnitEconomics {
        cost_per_visitor: cost_per_stage(total_spend, volumes.web_visitors),
        cpl: cost_per_stage(total_spend, volumes.leads),
        cpql: cost_per_stage(total_spend, volumes.mqls),
        cpsql: cost_per_stage(total_spend, volumes.sqos),
        cp_opp: cost_per_stage(total_spend, volumes.opportunities),
        cac: cost_per_stage(total_spend, volumes.closed_won),
        roi: roi(revenue, total_spend),
    }
}

fn cost_per_stage(total_spend: StageValue, volume: StageValue) -> StageValue {
    match (total_spend.value(), volume.value()) {
        (Some(spend), Some(v)) if v > 0.0 => StageValue::from_f64(spend / v),
        _ => StageValue::NotComputable,
    }
}

fn roi(revenue: f64, total_spend: StageValue) -> StageValue {
    match total_spend.value() {
        Some(spend) if spend > 0.0 => StageValue::from_f64(revenue / spend),
        _ => StageValue::NotComputable,
    }
}
