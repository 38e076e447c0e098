//! Scenario evaluation pipeline.
//!
//! One scenario = solve + classify + suggest + gap-analyze against a
//! shared read-only benchmark repository. The engine is pure, so batch
//! runs parallelize with rayon and zero coordination.

use im::Vector;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::benchmarks::{
    classify_against_benchmark, Benchmark, BenchmarkRepository, Classification, MetricDirection,
};
use crate::core::{CalculatorState, ConversionStage, FunnelResult, StageValue, Suggestion};
use crate::errors::Result;
use crate::gap::compute_gap;
use crate::solver::solve_funnel;
use crate::suggestions::generate_suggestions;

/// One conversion stage's standing against its benchmark
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageAssessment {
    pub stage: ConversionStage,
    pub actual: f64,
    pub benchmark: Benchmark,
    pub classification: Classification,
}

/// CAC standing against the scale-specific benchmark
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacAssessment {
    pub actual: StageValue,
    pub benchmark: Benchmark,
    /// Absent when CAC itself is not computable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<Classification>,
}

/// Full output for one scenario
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioReport {
    pub state: CalculatorState,
    /// Canonical benchmark row the industry label resolved to
    pub resolved_industry: String,
    pub cost_per_visitor: f64,
    pub result: FunnelResult,
    pub stage_assessments: Vec<StageAssessment>,
    pub cac: CacAssessment,
    pub suggestions: Vector<Suggestion>,
}

/// Run the full pipeline for a single scenario.
///
/// The cost-per-visitor assumption is the explicit override when given,
/// otherwise the resolved industry's benchmark average.
pub fn evaluate_scenario(
    state: &CalculatorState,
    repository: &BenchmarkRepository,
    override_cpv: Option<f64>,
) -> Result<ScenarioReport> {
    let industry = repository.resolve(&state.industry);
    let cost_per_visitor = override_cpv.unwrap_or(industry.cost_per_visitor.avg);

    let mut result = solve_funnel(state, cost_per_visitor)?;
    result.gap = compute_gap(&result, state);

    let stage_assessments = ConversionStage::all()
        .into_iter()
        .map(|stage| {
            let actual = state.rates.get(stage);
            let benchmark = industry.rates.get(stage);
            StageAssessment {
                stage,
                actual,
                benchmark,
                classification: classify_against_benchmark(
                    actual,
                    &benchmark,
                    MetricDirection::HigherIsBetter,
                ),
            }
        })
        .collect();

    let cac_benchmark = industry.cac.get(state.scale);
    let cac = CacAssessment {
        actual: result.economics.cac,
        benchmark: cac_benchmark,
        classification: result.economics.cac.value().map(|actual| {
            classify_against_benchmark(actual, &cac_benchmark, MetricDirection::LowerIsBetter)
        }),
    };

    let suggestions = generate_suggestions(
        state,
        industry,
        &result,
        cac_benchmark.avg,
        cost_per_visitor,
    );

    Ok(ScenarioReport {
        state: state.clone(),
        resolved_industry: industry.name.clone(),
        cost_per_visitor,
        result,
        stage_assessments,
        cac,
        suggestions,
    })
}

/// Evaluate independent scenarios in parallel. Each scenario succeeds or
/// fails on its own; one bad input does not sink the batch.
pub fn evaluate_scenarios(
    states: &[CalculatorState],
    repository: &BenchmarkRepository,
    override_cpv: Option<f64>,
) -> Vec<Result<ScenarioReport>> {
    states
        .par_iter()
        .map(|state| evaluate_scenario(state, repository, override_cpv))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CalculationDirection, ConversionRates};

    #[test]
    fn pipeline_produces_a_complete_report() {
        let repo = BenchmarkRepository::builtin();
        let state = CalculatorState::default();
        let report = evaluate_scenario(&state, &repo, None).unwrap();

        assert_eq!(report.resolved_industry, "Average/General SaaS");
        assert_eq!(report.cost_per_visitor, 0.73);
        assert_eq!(report.stage_assessments.len(), 5);
        assert!(report.cac.classification.is_some());
        // Default rates sit exactly on the benchmark averages
        assert!(report.suggestions.is_empty());
    }

    #[test]
    fn cpv_override_beats_the_industry_assumption() {
        let repo = BenchmarkRepository::builtin();
        let state = CalculatorState::default();
        let report = evaluate_scenario(&state, &repo, Some(1.5)).unwrap();
        assert_eq!(report.cost_per_visitor, 1.5);
    }

    #[test]
    fn batch_keeps_per_scenario_failures_isolated() {
        let repo = BenchmarkRepository::builtin();
        let good = CalculatorState::default();
        let bad = CalculatorState {
            avg_deal_size: -1.0,
            ..CalculatorState::default()
        };
        let results = evaluate_scenarios(&[good, bad], &repo, None);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }

    #[test]
    fn forward_scenario_carries_its_gap() {
        let repo = BenchmarkRepository::builtin();
        let state = CalculatorState {
            direction: CalculationDirection::Forward,
            budget: Some(73_000.0),
            revenue_goal: Some(1_000_000.0),
            rates: ConversionRates::default(),
            ..CalculatorState::default()
        };
        let report = evaluate_scenario(&state, &repo, Some(0.73)).unwrap();
        assert!(report.result.gap.is_some());
    }
}
