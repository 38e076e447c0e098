use anyhow::{bail, Context};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::args::{FormatArg, ScenarioArgs};
use crate::batch::{evaluate_scenario, evaluate_scenarios, ScenarioReport};
use crate::benchmarks::BenchmarkRepository;
use crate::config::{load_config, FunnelmapConfig};
use crate::core::{CalculationDirection, CalculatorState};
use crate::io::create_writer;
use crate::share::{decode_share_query, encode_share_query};

/// Turn CLI flags (optionally seeded from config defaults and a share
/// link) into a calculator state and a cost-per-visitor override.
/// Precedence, lowest to highest: built-in defaults, config file, share
/// link, explicit flags.
pub fn build_scenario(
    args: &ScenarioArgs,
    config: &FunnelmapConfig,
) -> (CalculatorState, Option<f64>) {
    let mut state = CalculatorState::default();
    config.apply_to_state(&mut state);
    let mut cpc = config.defaults.cost_per_visitor;

    if let Some(link) = &args.from_link {
        let decoded = decode_share_query(link, &state);
        state = decoded.state;
        if decoded.cost_per_visitor.is_some() {
            cpc = decoded.cost_per_visitor;
        }
    }

    if let Some(budget) = args.budget {
        state.budget = Some(budget);
    }
    if let Some(goal) = args.goal {
        state.revenue_goal = Some(goal);
    }
    if let Some(acv) = args.acv {
        state.avg_deal_size = acv;
    }
    if let Some(industry) = &args.industry {
        state.industry = industry.clone();
    }
    if let Some(scale) = args.scale {
        state.scale = scale.into();
    }
    if let Some(rate) = args.v2l {
        state.rates.visitor_to_lead = rate;
        state.rates_overridden = true;
    }
    if let Some(rate) = args.l2m {
        state.rates.lead_to_mql = rate;
        state.rates_overridden = true;
    }
    if let Some(rate) = args.m2s {
        state.rates.mql_to_sql = rate;
        state.rates_overridden = true;
    }
    if let Some(rate) = args.s2o {
        state.rates.sql_to_opportunity = rate;
        state.rates_overridden = true;
    }
    if let Some(rate) = args.o2c {
        state.rates.opportunity_to_close = rate;
        state.rates_overridden = true;
    }
    if let Some(cpc_flag) = args.cpc {
        cpc = Some(cpc_flag);
    }

    state.direction = match args.direction {
        Some(direction) => direction.into(),
        // Only a budget supplied means the user is asking "what do I get
        // for this spend"; everything else defaults to goal-seeking
        None if state.budget.is_some() && args.goal.is_none() => CalculationDirection::Forward,
        None => CalculationDirection::Reverse,
    };

    // The built-in revenue goal only seeds goal-seeking; a forward solve
    // compares against a goal only when the user actually stated one
    if state.direction == CalculationDirection::Forward
        && args.goal.is_none()
        && args.from_link.is_none()
    {
        state.revenue_goal = None;
    }

    (state, cpc)
}

fn build_repository(config: &FunnelmapConfig) -> BenchmarkRepository {
    let mut repository = BenchmarkRepository::builtin();
    config.merge_into_repository(&mut repository);
    repository
}

fn write_to(output: &Option<PathBuf>, format: FormatArg, report: &ScenarioReport) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            let file = fs::File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            create_writer(file, format.into()).write_report(report)
        }
        None => create_writer(std::io::stdout(), format.into()).write_report(report),
    }
}

pub fn handle_solve_command(
    scenario: ScenarioArgs,
    format: FormatArg,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let config = load_config();
    let repository = build_repository(&config);
    let (state, cpc) = build_scenario(&scenario, &config);

    let report = evaluate_scenario(&state, &repository, cpc)?;
    write_to(&output, format, &report)
}

pub fn handle_share_command(
    decode: Option<String>,
    scenario: ScenarioArgs,
) -> anyhow::Result<()> {
    let config = load_config();
    match decode {
        Some(query) => {
            let decoded = decode_share_query(&query, &CalculatorState::default());
            let json = serde_json::to_string_pretty(&decoded.state)?;
            println!("{json}");
            if let Some(cpc) = decoded.cost_per_visitor {
                println!("// cost per visitor override: {cpc}");
            }
        }
        None => {
            let (state, cpc) = build_scenario(&scenario, &config);
            println!("{}", encode_share_query(&state, cpc));
        }
    }
    Ok(())
}

pub fn handle_batch_command(
    input: PathBuf,
    cpc: Option<f64>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let config = load_config();
    let repository = build_repository(&config);

    let contents = fs::read_to_string(&input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let states: Vec<CalculatorState> = serde_json::from_str(&contents)
        .with_context(|| format!("{} is not a JSON array of scenarios", input.display()))?;
    if states.is_empty() {
        bail!("no scenarios in {}", input.display());
    }

    let outcomes = evaluate_scenarios(&states, &repository, cpc);
    let mut reports = Vec::with_capacity(outcomes.len());
    let mut failures = 0usize;
    for (i, outcome) in outcomes.into_iter().enumerate() {
        match outcome {
            Ok(report) => reports.push(report),
            Err(e) => {
                failures += 1;
                log::error!("scenario {i}: {e}");
            }
        }
    }
    if reports.is_empty() {
        bail!("all {failures} scenarios failed validation");
    }

    let json = serde_json::to_string_pretty(&reports)?;
    match &output {
        Some(path) => write_json(path, &json)?,
        None => println!("{json}"),
    }

    if failures > 0 {
        log::warn!("{failures} scenario(s) skipped; see errors above");
    }
    Ok(())
}

fn write_json(path: &Path, json: &str) -> anyhow::Result<()> {
    let mut file =
        fs::File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    file.write_all(json.as_bytes())?;
    writeln!(file)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CompanyScale;

    #[test]
    fn flags_override_config_and_link() {
        let config = FunnelmapConfig::default();
        let args = ScenarioArgs {
            from_link: Some("goal=500000&industry=Fintech&cpc=2.0".to_string()),
            goal: Some(750_000.0),
            cpc: Some(1.2),
            ..ScenarioArgs::default()
        };
        let (state, cpc) = build_scenario(&args, &config);
        assert_eq!(state.revenue_goal, Some(750_000.0));
        assert_eq!(state.industry, "Fintech");
        assert_eq!(cpc, Some(1.2));
    }

    #[test]
    fn budget_only_infers_forward_direction() {
        let config = FunnelmapConfig::default();
        let args = ScenarioArgs {
            budget: Some(50_000.0),
            ..ScenarioArgs::default()
        };
        let (state, _) = build_scenario(&args, &config);
        assert_eq!(state.direction, CalculationDirection::Forward);
        // No stated goal means no gap comparison downstream
        assert_eq!(state.revenue_goal, None);
    }

    #[test]
    fn default_scenario_stays_reverse() {
        let config = FunnelmapConfig::default();
        let (state, cpc) = build_scenario(&ScenarioArgs::default(), &config);
        assert_eq!(state.direction, CalculationDirection::Reverse);
        assert_eq!(state.revenue_goal, Some(1_000_000.0));
        assert_eq!(state.scale, CompanyScale::Smb);
        assert_eq!(cpc, None);
    }

    #[test]
    fn rate_flags_mark_rates_overridden() {
        let config = FunnelmapConfig::default();
        let args = ScenarioArgs {
            m2s: Some(0.4),
            ..ScenarioArgs::default()
        };
        let (state, _) = build_scenario(&args, &config);
        assert_eq!(state.rates.mql_to_sql, 0.4);
        assert!(state.rates_overridden);
    }
}
