//! Optimization suggestion generator.
//!
//! Compares each conversion stage against its industry benchmark and, for
//! every underperforming stage, proposes improving to the benchmark
//! average (never the ceiling) with a projected volume impact and an
//! estimated spend reduction. Suggestions come back in funnel order; any
//! re-ranking by impact magnitude is the caller's business.

use im::Vector;

use crate::benchmarks::IndustryBenchmarks;
use crate::core::{
    CalculatorState, ConversionStage, FunnelResult, StageValue, Suggestion, SuggestionKind,
};
use crate::solver::solve_reverse;

/// Generate one suggestion per stage performing below its benchmark
/// average. Returns an empty vector when every stage is at or above
/// benchmark; the caller owns what to display in that case.
pub fn generate_suggestions(
    state: &CalculatorState,
    benchmarks: &IndustryBenchmarks,
    result: &FunnelResult,
    cac_benchmark_avg: f64,
    cost_per_visitor: f64,
) -> Vector<Suggestion> {
    let mut suggestions = Vector::new();

    for stage in ConversionStage::all() {
        let current = state.rates.get(stage);
        let target = benchmarks.rates.get(stage).avg;
        if current >= target {
            continue;
        }

        suggestions.push_back(Suggestion {
            kind: SuggestionKind::ConversionRateImprovement,
            stage,
            current,
            target,
            impact: describe_impact(stage, current, target, result, cac_benchmark_avg),
            savings_estimate: estimate_savings(state, result, stage, target, cost_per_visitor),
        });
    }

    suggestions
}

/// Projected stage-volume increase if the rate improved to target, holding
/// the stage's input volume fixed.
fn describe_impact(
    stage: ConversionStage,
    current: f64,
    target: f64,
    result: &FunnelResult,
    cac_benchmark_avg: f64,
) -> String {
    let mut text = match result.annual.input_of(stage).value() {
        Some(input) => {
            let extra = input * (target - current);
            format!(
                "Raising {} conversion from {:.1}% to {:.1}% adds ~{:.0} {} per year",
                stage.display_name(),
                current * 100.0,
                target * 100.0,
                extra,
                stage.output_name(),
            )
        }
        None => format!(
            "Raising {} conversion from {:.1}% to {:.1}% would make this stage reachable",
            stage.display_name(),
            current * 100.0,
            target * 100.0,
        ),
    };

    if let Some(cac) = result.economics.cac.value() {
        if cac > cac_benchmark_avg && cac_benchmark_avg > 0.0 {
            text.push_str(&format!(
                ", moving CAC (${cac:.0}) toward the ${cac_benchmark_avg:.0} benchmark"
            ));
        }
    }

    text
}

/// Spend reduction needed to hit the same closed-won volume if this stage
/// alone improved to target: re-solve in reverse against the original
/// closed-won revenue with the single rate swapped and diff the spend.
fn estimate_savings(
    state: &CalculatorState,
    result: &FunnelResult,
    stage: ConversionStage,
    target: f64,
    cost_per_visitor: f64,
) -> StageValue {
    let closed_won = match result.annual.closed_won.value() {
        Some(v) if v > 0.0 => v,
        _ => return StageValue::NotComputable,
    };
    let revenue = closed_won * state.avg_deal_size;

    let baseline = solve_reverse(revenue, &state.rates, state.avg_deal_size, cost_per_visitor);
    let improved_rates = state.rates.with_rate(stage, target);
    let improved = solve_reverse(revenue, &improved_rates, state.avg_deal_size, cost_per_visitor);

    match (baseline.total_spend.value(), improved.total_spend.value()) {
        (Some(before), Some(after)) => StageValue::from_f64(before - after),
        _ => StageValue::NotComputable,
    }
}
