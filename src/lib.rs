// Export modules for library usage
pub mod batch;
pub mod benchmarks;
pub mod cli;
pub mod config;
pub mod core;
pub mod economics;
pub mod errors;
pub mod gap;
pub mod io;
pub mod share;
pub mod solver;
pub mod suggestions;

// Re-export commonly used types
pub use crate::core::{
    CalculationDirection, CalculatorState, CompanyScale, ConversionRates, ConversionStage,
    FunnelResult, Gap, StageValue, StageVolumes, Suggestion, SuggestionKind, UnitEconomics,
    DEFAULT_INDUSTRY,
};

pub use crate::benchmarks::{
    classify_against_benchmark, Benchmark, BenchmarkLabel, BenchmarkRepository, CacBenchmarks,
    Classification, IndustryBenchmarks, MetricDirection, RateBenchmarks,
};

pub use crate::batch::{
    evaluate_scenario, evaluate_scenarios, CacAssessment, ScenarioReport, StageAssessment,
};

pub use crate::economics::compute_unit_economics;
pub use crate::errors::{FunnelError, Result};
pub use crate::gap::compute_gap;
pub use crate::io::output::{create_writer, OutputFormat, OutputWriter};
pub use crate::share::{decode_share_query, encode_share_query, ShareParams};
pub use crate::solver::{solve_forward, solve_funnel, solve_reverse};
pub use crate::suggestions::generate_suggestions;
