//! Configuration for funnelmap.
//!
//! An optional `funnelmap.toml` in the working directory can override the
//! session defaults (industry, scale, deal size, rates, cost-per-visitor)
//! and add or replace industry benchmark rows. Absence of the file is not
//! an error; invalid values are warned about and dropped rather than
//! failing the run.

mod loader;

pub use loader::{load_config, parse_and_validate_config, try_load_config_from_path};

use serde::{Deserialize, Serialize};

use crate::benchmarks::{BenchmarkRepository, IndustryBenchmarks};
use crate::core::{CalculatorState, CompanyScale, ConversionRates};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FunnelmapConfig {
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Extra benchmark rows, merged into the built-in repository by name
    #[serde(default)]
    pub industries: Vec<IndustryBenchmarks>,
}

/// Session default overrides; every field optional
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DefaultsConfig {
    #[serde(default)]
    pub industry: Option<String>,

    #[serde(default)]
    pub scale: Option<CompanyScale>,

    #[serde(default)]
    pub avg_deal_size: Option<f64>,

    /// Overrides the industry's cost-per-visitor assumption
    #[serde(default)]
    pub cost_per_visitor: Option<f64>,

    #[serde(default)]
    pub rates: Option<ConversionRates>,
}

impl FunnelmapConfig {
    /// Apply configured defaults onto a calculator state.
    pub fn apply_to_state(&self, state: &mut CalculatorState) {
        if let Some(industry) = &self.defaults.industry {
            state.industry = industry.clone();
        }
        if let Some(scale) = self.defaults.scale {
            state.scale = scale;
        }
        if let Some(size) = self.defaults.avg_deal_size {
            state.avg_deal_size = size;
        }
        if let Some(rates) = self.defaults.rates {
            state.rates = rates;
            state.rates_overridden = true;
        }
    }

    /// Merge configured industry rows into a repository.
    pub fn merge_into_repository(&self, repository: &mut BenchmarkRepository) {
        for row in &self.industries {
            repository.upsert(row.clone());
        }
    }
}

/// Drop out-of-range values with a warning, keeping the rest of the
/// config usable.
pub(crate) fn sanitize(config: &mut FunnelmapConfig) {
    if let Some(size) = config.defaults.avg_deal_size {
        if !size.is_finite() || size <= 0.0 {
            log::warn!("ignoring configured avg_deal_size {size}: must be positive");
            config.defaults.avg_deal_size = None;
        }
    }
    if let Some(cpv) = config.defaults.cost_per_visitor {
        if !cpv.is_finite() || cpv <= 0.0 {
            log::warn!("ignoring configured cost_per_visitor {cpv}: must be positive");
            config.defaults.cost_per_visitor = None;
        }
    }
    if let Some(rates) = config.defaults.rates {
        let all = [
            rates.visitor_to_lead,
            rates.lead_to_mql,
            rates.mql_to_sql,
            rates.sql_to_opportunity,
            rates.opportunity_to_close,
        ];
        if all.iter().any(|r| !r.is_finite() || !(0.0..=1.0).contains(r)) {
            log::warn!("ignoring configured rates: each must be a probability in [0, 1]");
            config.defaults.rates = None;
        }
    }
}
