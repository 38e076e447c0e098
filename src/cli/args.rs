use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::core::{CalculationDirection, CompanyScale};
use crate::io::OutputFormat;

#[derive(Parser)]
#[command(
    name = "funnelmap",
    about = "Marketing funnel financial model and benchmark analyzer",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Solve the funnel for one scenario and report benchmarks and
    /// suggestions
    Solve {
        #[command(flatten)]
        scenario: ScenarioArgs,

        /// Output format
        #[arg(long, value_enum, default_value = "terminal")]
        format: FormatArg,

        /// Write the report to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Encode a scenario as a shareable query string, or decode one
    Share {
        /// Decode this query string instead of encoding the flags
        #[arg(long)]
        decode: Option<String>,

        #[command(flatten)]
        scenario: ScenarioArgs,
    },

    /// Evaluate a JSON array of scenarios in parallel
    Batch {
        /// Path to a JSON file holding an array of calculator states
        input: PathBuf,

        /// Cost-per-visitor override applied to every scenario
        #[arg(long)]
        cpc: Option<f64>,

        /// Write the reports to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Scenario flags shared by `solve` and `share`
#[derive(Args, Clone, Debug, Default)]
pub struct ScenarioArgs {
    /// Annual advertising budget (authoritative in forward mode)
    #[arg(long)]
    pub budget: Option<f64>,

    /// Annual revenue goal (authoritative in reverse mode)
    #[arg(long)]
    pub goal: Option<f64>,

    /// Average deal size / annual contract value
    #[arg(long)]
    pub acv: Option<f64>,

    /// Industry label, resolved against the benchmark table
    #[arg(long)]
    pub industry: Option<String>,

    /// Customer scale segment
    #[arg(long, value_enum)]
    pub scale: Option<ScaleArg>,

    /// Calculation direction; inferred from --budget/--goal when omitted
    #[arg(long, value_enum)]
    pub direction: Option<DirectionArg>,

    /// Cost-per-visitor override (defaults to the industry benchmark)
    #[arg(long)]
    pub cpc: Option<f64>,

    /// Visitor → lead conversion rate
    #[arg(long)]
    pub v2l: Option<f64>,

    /// Lead → MQL conversion rate
    #[arg(long)]
    pub l2m: Option<f64>,

    /// MQL → SQL conversion rate
    #[arg(long)]
    pub m2s: Option<f64>,

    /// SQL → opportunity conversion rate
    #[arg(long)]
    pub s2o: Option<f64>,

    /// Opportunity → closed-won conversion rate
    #[arg(long)]
    pub o2c: Option<f64>,

    /// Start from a previously shared query string
    #[arg(long = "from-link")]
    pub from_link: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DirectionArg {
    Forward,
    Reverse,
}

impl From<DirectionArg> for CalculationDirection {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Forward => CalculationDirection::Forward,
            DirectionArg::Reverse => CalculationDirection::Reverse,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScaleArg {
    Consumer,
    Smb,
    MiddleMarket,
    Enterprise,
}

impl From<ScaleArg> for CompanyScale {
    fn from(arg: ScaleArg) -> Self {
        match arg {
            ScaleArg::Consumer => CompanyScale::Consumer,
            ScaleArg::Smb => CompanyScale::Smb,
            ScaleArg::MiddleMarket => CompanyScale::MiddleMarket,
            ScaleArg::Enterprise => CompanyScale::Enterprise,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatArg {
    Json,
    Markdown,
    Terminal,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Markdown => OutputFormat::Markdown,
            FormatArg::Terminal => OutputFormat::Terminal,
        }
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
