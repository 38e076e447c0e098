//! Shareable scenario links.
//!
//! A `CalculatorState` (plus an optional cost-per-visitor override) can be
//! round-tripped through URL query parameters so a scenario can be pasted
//! into a browser or chat. Parsing is deliberately forgiving: absent,
//! duplicate, or non-numeric parameters silently fall back to defaults —
//! a bad link renders the default calculator, never an error.

use crate::core::{CalculationDirection, CalculatorState, CompanyScale};

/// A decoded share link: the state plus the optional cpc override, which
/// lives outside `CalculatorState` because it is an injected assumption
/// rather than user state.
#[derive(Clone, Debug, PartialEq)]
pub struct ShareParams {
    pub state: CalculatorState,
    pub cost_per_visitor: Option<f64>,
}

/// Encode a state (and optional cpc override) as a query string.
pub fn encode_share_query(state: &CalculatorState, cost_per_visitor: Option<f64>) -> String {
    let mut parts: Vec<String> = Vec::new();

    match state.direction {
        CalculationDirection::Forward => parts.push("dir=forward".to_string()),
        CalculationDirection::Reverse => parts.push("dir=reverse".to_string()),
    }
    if let Some(budget) = state.budget {
        parts.push(format!("budget={budget}"));
    }
    if let Some(goal) = state.revenue_goal {
        parts.push(format!("goal={goal}"));
    }
    parts.push(format!("acv={}", state.avg_deal_size));
    if let Some(cpc) = cost_per_visitor {
        parts.push(format!("cpc={cpc}"));
    }
    parts.push(format!("v2l={}", state.rates.visitor_to_lead));
    parts.push(format!("l2m={}", state.rates.lead_to_mql));
    parts.push(format!("m2s={}", state.rates.mql_to_sql));
    parts.push(format!("s2o={}", state.rates.sql_to_opportunity));
    parts.push(format!("o2c={}", state.rates.opportunity_to_close));
    parts.push(format!("industry={}", escape_spaces(&state.industry)));
    parts.push(format!("scale={}", scale_key(state.scale)));

    parts.join("&")
}

/// Decode a query string over a base state. Every recognized, well-formed
/// parameter overrides the base; everything else is ignored.
pub fn decode_share_query(query: &str, base: &CalculatorState) -> ShareParams {
    let mut state = base.clone();
    let mut cost_per_visitor = None;

    for pair in query.trim_start_matches('?').split('&') {
        let Some((key, raw)) = pair.split_once('=') else {
            continue;
        };
        let value = unescape_spaces(raw);
        match key {
            "dir" => match value.as_str() {
                "forward" => state.direction = CalculationDirection::Forward,
                "reverse" => state.direction = CalculationDirection::Reverse,
                _ => {}
            },
            "budget" => {
                if let Some(v) = parse_positive(&value) {
                    state.budget = Some(v);
                }
            }
            "goal" => {
                if let Some(v) = parse_positive(&value) {
                    state.revenue_goal = Some(v);
                }
            }
            "acv" => {
                if let Some(v) = parse_positive(&value) {
                    state.avg_deal_size = v;
                }
            }
            "cpc" => cost_per_visitor = parse_positive(&value),
            "v2l" => apply_rate(&value, &mut state, |r, s| s.rates.visitor_to_lead = r),
            "l2m" => apply_rate(&value, &mut state, |r, s| s.rates.lead_to_mql = r),
            "m2s" => apply_rate(&value, &mut state, |r, s| s.rates.mql_to_sql = r),
            "s2o" => apply_rate(&value, &mut state, |r, s| s.rates.sql_to_opportunity = r),
            "o2c" => apply_rate(&value, &mut state, |r, s| s.rates.opportunity_to_close = r),
            "industry" => {
                if !value.is_empty() {
                    state.industry = value;
                }
            }
            "scale" => {
                if let Some(scale) = parse_scale(&value) {
                    state.scale = scale;
                }
            }
            _ => {}
        }
    }

    ShareParams {
        state,
        cost_per_visitor,
    }
}

fn apply_rate(value: &str, state: &mut CalculatorState, set: impl FnOnce(f64, &mut CalculatorState)) {
    if let Ok(rate) = value.parse::<f64>() {
        if rate.is_finite() && (0.0..=1.0).contains(&rate) {
            set(rate, state);
            state.rates_overridden = true;
        }
    }
}

fn parse_positive(value: &str) -> Option<f64> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

fn parse_scale(value: &str) -> Option<CompanyScale> {
    match value.to_lowercase().as_str() {
        "consumer" => Some(CompanyScale::Consumer),
        "smb" => Some(CompanyScale::Smb),
        "middlemarket" | "middle_market" | "middle-market" => Some(CompanyScale::MiddleMarket),
        "enterprise" => Some(CompanyScale::Enterprise),
        _ => None,
    }
}

fn scale_key(scale: CompanyScale) -> &'static str {
    match scale {
        CompanyScale::Consumer => "consumer",
        CompanyScale::Smb => "smb",
        CompanyScale::MiddleMarket => "middleMarket",
        CompanyScale::Enterprise => "enterprise",
    }
}

// Spaces are the only character industry labels need escaped; full
// percent-encoding is the embedding page's job.
fn escape_spaces(value: &str) -> String {
    value.replace(' ', "%20")
}

fn unescape_spaces(value: &str) -> String {
    value.replace("%20", " ").replace('+', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ConversionRates;
    use pretty_assertions::assert_eq;

    #[test]
    fn round_trips_a_full_state() {
        let state = CalculatorState {
            industry: "B2B SaaS".to_string(),
            scale: CompanyScale::Enterprise,
            direction: CalculationDirection::Forward,
            budget: Some(250_000.0),
            revenue_goal: Some(2_000_000.0),
            avg_deal_size: 55_000.0,
            rates: ConversionRates {
                visitor_to_lead: 0.02,
                ..ConversionRates::default()
            },
            rates_overridden: true,
            ..CalculatorState::default()
        };

        let query = encode_share_query(&state, Some(1.1));
        let decoded = decode_share_query(&query, &CalculatorState::default());

        assert_eq!(decoded.state.industry, "B2B SaaS");
        assert_eq!(decoded.state.scale, CompanyScale::Enterprise);
        assert_eq!(decoded.state.direction, CalculationDirection::Forward);
        assert_eq!(decoded.state.budget, Some(250_000.0));
        assert_eq!(decoded.state.revenue_goal, Some(2_000_000.0));
        assert_eq!(decoded.state.avg_deal_size, 55_000.0);
        assert_eq!(decoded.state.rates, state.rates);
        assert_eq!(decoded.cost_per_visitor, Some(1.1));
    }

    #[test]
    fn non_numeric_parameters_fall_back_silently() {
        let base = CalculatorState::default();
        let decoded = decode_share_query("budget=lots&acv=abc&v2l=nope", &base);
        assert_eq!(decoded.state, base);
    }

    #[test]
    fn out_of_range_rates_are_ignored() {
        let base = CalculatorState::default();
        let decoded = decode_share_query("v2l=1.7&o2c=-0.2", &base);
        assert_eq!(decoded.state.rates, base.rates);
        assert!(!decoded.state.rates_overridden);
    }

    #[test]
    fn unknown_keys_and_leading_question_mark_are_tolerated() {
        let base = CalculatorState::default();
        let decoded = decode_share_query("?utm_source=newsletter&goal=500000", &base);
        assert_eq!(decoded.state.revenue_goal, Some(500_000.0));
    }

    #[test]
    fn empty_query_is_the_base_state() {
        let base = CalculatorState::default();
        let decoded = decode_share_query("", &base);
        assert_eq!(decoded.state, base);
        assert_eq!(decoded.cost_per_visitor, None);
    }
}
