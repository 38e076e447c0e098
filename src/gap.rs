//! Gap analyzer: solved funnel vs the user's secondary target.

use crate::core::{CalculationDirection, CalculatorState, FunnelResult, Gap};

/// Compare the solved funnel against a secondary target, if one exists.
///
/// Forward solves compare derived revenue against a stated revenue goal;
/// reverse solves compare required spend against a stated budget ceiling.
/// `None` means no comparison was requested — omission, not a zero gap.
pub fn compute_gap(result: &FunnelResult, state: &CalculatorState) -> Option<Gap> {
    match state.direction {
        CalculationDirection::Forward => {
            let goal = state.revenue_goal?;
            if goal <= 0.0 {
                return None;
            }
            let gap = goal - result.revenue;
            Some(Gap::RevenueShortfall {
                gap,
                percentage_off: gap / goal * 100.0,
            })
        }
        CalculationDirection::Reverse => {
            let ceiling = state.budget?;
            if ceiling <= 0.0 {
                return None;
            }
            // An unreachable spend cannot be compared against a ceiling
            let solved = result.total_spend.value()?;
            let gap = solved - ceiling;
            Some(Gap::BudgetOverrun {
                gap,
                percentage_off: gap / ceiling * 100.0,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CalculatorState, ConversionRates};
    use crate::solver::solve_funnel;

    #[test]
    fn forward_with_goal_reports_revenue_shortfall() {
        let state = CalculatorState {
            direction: CalculationDirection::Forward,
            budget: Some(73_000.0),
            revenue_goal: Some(1_000_000.0),
            ..CalculatorState::default()
        };
        let result = solve_funnel(&state, 0.73).unwrap();
        // Budget of 73k yields 900k revenue with default rates
        match compute_gap(&result, &state) {
            Some(Gap::RevenueShortfall {
                gap,
                percentage_off,
            }) => {
                assert!((gap - 100_000.0).abs() < 1.0);
                assert!((percentage_off - 10.0).abs() < 0.01);
            }
            other => panic!("expected revenue shortfall, got {other:?}"),
        }
    }

    #[test]
    fn reverse_with_ceiling_reports_budget_overrun() {
        let state = CalculatorState {
            budget: Some(100_000.0),
            ..CalculatorState::default()
        };
        let result = solve_funnel(&state, 0.73).unwrap();
        match compute_gap(&result, &state) {
            Some(Gap::BudgetOverrun {
                gap,
                percentage_off,
            }) => {
                // Required spend ≈162,222 against a 100k ceiling
                assert!((gap - 62_222.22).abs() < 0.5);
                assert!(percentage_off > 62.0 && percentage_off < 63.0);
            }
            other => panic!("expected budget overrun, got {other:?}"),
        }
    }

    #[test]
    fn no_secondary_target_means_no_gap_at_all() {
        let state = CalculatorState::default();
        let result = solve_funnel(&state, 0.73).unwrap();
        assert_eq!(compute_gap(&result, &state), None);
    }

    #[test]
    fn unreachable_spend_omits_the_gap() {
        let state = CalculatorState {
            budget: Some(100_000.0),
            rates: ConversionRates {
                visitor_to_lead: 0.0,
                ..ConversionRates::default()
            },
            ..CalculatorState::default()
        };
        let result = solve_funnel(&state, 0.73).unwrap();
        assert_eq!(compute_gap(&result, &state), None);
    }
}
