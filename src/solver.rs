//! Bidirectional funnel solver.
//!
//! Forward mode multiplies a visitor volume (budget ÷ cost-per-visitor)
//! down the five conversion rates; reverse mode back-substitutes from a
//! revenue goal up the funnel to the required spend. Both paths carry
//! exact fractional volumes internally; any rounding happens in the
//! output writers.

use crate::core::{
    CalculationDirection, CalculatorState, ConversionRates, FunnelResult, StageValue, StageVolumes,
};
use crate::economics::compute_unit_economics;
use crate::errors::{validate_positive, validate_rate, FunnelError, Result};

/// Solve the funnel in the state's direction.
///
/// `cost_per_visitor` is the injected budget-to-traffic assumption; the
/// caller resolves it from an override, config, or the selected industry's
/// benchmark. Validation runs before any arithmetic, so a returned
/// `FunnelResult` is always complete (unreachable fields are marked
/// not-computable, never NaN or infinite).
pub fn solve_funnel(state: &CalculatorState, cost_per_visitor: f64) -> Result<FunnelResult> {
    validate_inputs(state, cost_per_visitor)?;

    match state.direction {
        CalculationDirection::Forward => {
            let budget = state
                .budget
                .ok_or_else(|| FunnelError::missing_input("budget", "forward"))?;
            Ok(solve_forward(
                budget,
                &state.rates,
                state.avg_deal_size,
                cost_per_visitor,
            ))
        }
        CalculationDirection::Reverse => {
            let goal = state
                .revenue_goal
                .ok_or_else(|| FunnelError::missing_input("revenue_goal", "reverse"))?;
            Ok(solve_reverse(
                goal,
                &state.rates,
                state.avg_deal_size,
                cost_per_visitor,
            ))
        }
    }
}

fn validate_inputs(state: &CalculatorState, cost_per_visitor: f64) -> Result<()> {
    validate_positive("avg_deal_size", state.avg_deal_size)?;
    validate_positive("cost_per_visitor", cost_per_visitor)?;
    if let Some(budget) = state.budget {
        validate_positive("budget", budget)?;
    }
    if let Some(goal) = state.revenue_goal {
        validate_positive("revenue_goal", goal)?;
    }
    validate_rate("visitor_to_lead", state.rates.visitor_to_lead)?;
    validate_rate("lead_to_mql", state.rates.lead_to_mql)?;
    validate_rate("mql_to_sql", state.rates.mql_to_sql)?;
    validate_rate("sql_to_opportunity", state.rates.sql_to_opportunity)?;
    validate_rate("opportunity_to_close", state.rates.opportunity_to_close)?;
    Ok(())
}

/// Budget → visitors → leads → … → closed won → revenue.
///
/// A zero rate simply zeroes everything downstream; no marker is needed
/// because multiplication by zero is well defined.
pub fn solve_forward(
    budget: f64,
    rates: &ConversionRates,
    avg_deal_size: f64,
    cost_per_visitor: f64,
) -> FunnelResult {
    let web_visitors = StageValue::from_f64(budget / cost_per_visitor);
    let leads = web_visitors.scale(rates.visitor_to_lead);
    let mqls = leads.scale(rates.lead_to_mql);
    let sqos = mqls.scale(rates.mql_to_sql);
    let opportunities = sqos.scale(rates.sql_to_opportunity);
    let closed_won = opportunities.scale(rates.opportunity_to_close);

    let annual = StageVolumes {
        web_visitors,
        leads,
        mqls,
        sqos,
        opportunities,
        closed_won,
    };

    let revenue = closed_won.value().unwrap_or(0.0) * avg_deal_size;
    let total_spend = StageValue::from_f64(budget);

    assemble(
        CalculationDirection::Forward,
        annual,
        total_spend,
        revenue,
    )
}

/// Revenue goal → closed won → … → visitors → required spend.
///
/// Back-substitution divides by each rate in turn. A zero rate is a
/// broken conversion: nothing can ever flow through it, so both volumes
/// at its endpoints, every stage upstream, and the required spend are
/// marked not-computable. Stages strictly downstream of the zeroed
/// conversion's output stay valid because they never depend on it.
/// Revenue echoes the goal so the reverse path is exact.
pub fn solve_reverse(
    revenue_goal: f64,
    rates: &ConversionRates,
    avg_deal_size: f64,
    cost_per_visitor: f64,
) -> FunnelResult {
    let mut closed_won = StageValue::from_f64(revenue_goal / avg_deal_size);
    let mut opportunities = back_convert(&mut closed_won, rates.opportunity_to_close);
    let mut sqos = back_convert(&mut opportunities, rates.sql_to_opportunity);
    let mut mqls = back_convert(&mut sqos, rates.mql_to_sql);
    let mut leads = back_convert(&mut mqls, rates.lead_to_mql);
    let web_visitors = back_convert(&mut leads, rates.visitor_to_lead);

    let annual = StageVolumes {
        web_visitors,
        leads,
        mqls,
        sqos,
        opportunities,
        closed_won,
    };

    let total_spend = web_visitors.scale(cost_per_visitor);

    assemble(
        CalculationDirection::Reverse,
        annual,
        total_spend,
        revenue_goal,
    )
}

/// One reverse step: the input volume needed to yield `output` at `rate`.
/// A zero rate retroactively marks the already-computed output, since a
/// broken conversion can never have produced it.
fn back_convert(output: &mut StageValue, rate: f64) -> StageValue {
    if rate <= 0.0 {
        *output = StageValue::NotComputable;
    }
    output.div_by(rate)
}

fn assemble(
    direction: CalculationDirection,
    annual: StageVolumes,
    total_spend: StageValue,
    revenue: f64,
) -> FunnelResult {
    let economics = compute_unit_economics(&annual, total_spend, revenue);
    FunnelResult {
        direction,
        monthly: annual.monthly(),
        annual,
        roi: economics.roi,
        economics,
        total_spend,
        revenue,
        gap: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CalculatorState;

    fn default_rates() -> ConversionRates {
        ConversionRates::default()
    }

    #[test]
    fn reverse_solve_matches_worked_example() {
        // revenue goal 1M at 20k ACV with the default rate set
        let result = solve_reverse(1_000_000.0, &default_rates(), 20_000.0, 0.73);

        assert_eq!(result.annual.closed_won, StageValue::Computed(50.0));
        assert_eq!(result.annual.opportunities, StageValue::Computed(250.0));
        let sqos = result.annual.sqos.value().unwrap();
        assert!((sqos - 416.666).abs() < 0.01);
        let mqls = result.annual.mqls.value().unwrap();
        assert!((mqls - 1666.666).abs() < 0.01);
        let leads = result.annual.leads.value().unwrap();
        assert!((leads - 6666.666).abs() < 0.01);
        let visitors = result.annual.web_visitors.value().unwrap();
        assert!((visitors - 222_222.22).abs() < 0.1);

        let spend = result.total_spend.value().unwrap();
        assert!((spend - 162_222.22).abs() < 0.1);
        let roi = result.roi.value().unwrap();
        assert!((roi - 6.164).abs() < 0.01);
        assert_eq!(result.revenue, 1_000_000.0);
    }

    #[test]
    fn forward_solve_multiplies_down_the_funnel() {
        let result = solve_forward(73_000.0, &default_rates(), 20_000.0, 0.73);

        assert_eq!(result.annual.web_visitors, StageValue::Computed(100_000.0));
        assert_eq!(result.annual.leads, StageValue::Computed(3_000.0));
        assert_eq!(result.annual.mqls, StageValue::Computed(750.0));
        assert_eq!(result.annual.sqos, StageValue::Computed(375.0));
        assert_eq!(result.annual.opportunities, StageValue::Computed(225.0));
        assert_eq!(result.annual.closed_won, StageValue::Computed(45.0));
        assert_eq!(result.revenue, 900_000.0);
        assert_eq!(result.total_spend, StageValue::Computed(73_000.0));
    }

    #[test]
    fn monthly_is_annual_over_twelve() {
        let result = solve_forward(73_000.0, &default_rates(), 20_000.0, 0.73);
        assert_eq!(
            result.monthly.leads.value().unwrap(),
            result.annual.leads.value().unwrap() / 12.0
        );
        assert_eq!(result.monthly.closed_won, StageValue::Computed(45.0 / 12.0));
    }

    #[test]
    fn reverse_zero_top_rate_marks_both_endpoints_and_spend() {
        let rates = ConversionRates {
            visitor_to_lead: 0.0,
            ..default_rates()
        };
        let result = solve_reverse(1_000_000.0, &rates, 20_000.0, 0.73);

        // Stages strictly below the broken conversion stay valid
        assert_eq!(result.annual.closed_won, StageValue::Computed(50.0));
        assert!(result.annual.opportunities.is_computable());
        assert!(result.annual.sqos.is_computable());
        assert!(result.annual.mqls.is_computable());
        // A zero visitor→lead rate can never produce a lead, so the lead
        // volume is unreachable along with visitors and spend
        assert_eq!(result.annual.leads, StageValue::NotComputable);
        assert_eq!(result.annual.web_visitors, StageValue::NotComputable);
        assert_eq!(result.total_spend, StageValue::NotComputable);
    }

    #[test]
    fn reverse_zero_mid_rate_marks_its_output_and_everything_above() {
        let rates = ConversionRates {
            mql_to_sql: 0.0,
            ..default_rates()
        };
        let result = solve_reverse(1_000_000.0, &rates, 20_000.0, 0.73);

        assert!(result.annual.closed_won.is_computable());
        assert!(result.annual.opportunities.is_computable());
        assert_eq!(result.annual.sqos, StageValue::NotComputable);
        assert_eq!(result.annual.mqls, StageValue::NotComputable);
        assert_eq!(result.annual.leads, StageValue::NotComputable);
        assert_eq!(result.annual.web_visitors, StageValue::NotComputable);
        assert_eq!(result.total_spend, StageValue::NotComputable);
    }

    #[test]
    fn reverse_zero_bottom_rate_leaves_no_volume_reachable() {
        let rates = ConversionRates {
            opportunity_to_close: 0.0,
            ..default_rates()
        };
        let result = solve_reverse(1_000_000.0, &rates, 20_000.0, 0.73);

        for volume in result.annual.as_array() {
            assert_eq!(volume, StageValue::NotComputable);
        }
        assert_eq!(result.total_spend, StageValue::NotComputable);
        // The goal is still echoed back even though it is unreachable
        assert_eq!(result.revenue, 1_000_000.0);
    }

    #[test]
    fn forward_zero_rate_yields_zero_volumes_not_markers() {
        let rates = ConversionRates {
            mql_to_sql: 0.0,
            ..default_rates()
        };
        let result = solve_forward(73_000.0, &rates, 20_000.0, 0.73);
        assert_eq!(result.annual.sqos, StageValue::Computed(0.0));
        assert_eq!(result.annual.closed_won, StageValue::Computed(0.0));
        assert_eq!(result.revenue, 0.0);
    }

    #[test]
    fn solve_funnel_rejects_bad_inputs_before_running() {
        let mut state = CalculatorState::default();
        state.avg_deal_size = -1.0;
        assert!(solve_funnel(&state, 0.73).is_err());

        let mut state = CalculatorState::default();
        state.rates.lead_to_mql = 1.2;
        assert!(solve_funnel(&state, 0.73).is_err());

        let state = CalculatorState::default();
        assert!(solve_funnel(&state, 0.0).is_err());
    }

    #[test]
    fn solve_funnel_requires_the_authoritative_input() {
        let mut state = CalculatorState::default();
        state.revenue_goal = None;
        let err = solve_funnel(&state, 0.73).unwrap_err();
        assert!(matches!(err, FunnelError::MissingInput { .. }));

        state.direction = CalculationDirection::Forward;
        let err = solve_funnel(&state, 0.73).unwrap_err();
        assert!(matches!(
            err,
            FunnelError::MissingInput {
                field: "budget",
                ..
            }
        ));
    }
}
