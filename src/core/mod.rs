pub mod types;

use serde::{Deserialize, Serialize};

pub use types::{CalculationDirection, CompanyScale, ConversionStage, StageValue};

/// Default industry key used when nothing else matches
pub const DEFAULT_INDUSTRY: &str = "Average/General SaaS";

/// The five stage-to-stage conversion probabilities, each in [0, 1].
///
/// A rate of exactly 0 is a legal input (it models a broken stage) and is
/// handled by the solver's zero-rate policy; validation only rejects
/// negative, > 1, or non-finite rates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConversionRates {
    pub visitor_to_lead: f64,
    pub lead_to_mql: f64,
    pub mql_to_sql: f64,
    pub sql_to_opportunity: f64,
    pub opportunity_to_close: f64,
}

impl ConversionRates {
    pub fn get(&self, stage: ConversionStage) -> f64 {
        match stage {
            ConversionStage::VisitorToLead => self.visitor_to_lead,
            ConversionStage::LeadToMql => self.lead_to_mql,
            ConversionStage::MqlToSql => self.mql_to_sql,
            ConversionStage::SqlToOpportunity => self.sql_to_opportunity,
            ConversionStage::OpportunityToClose => self.opportunity_to_close,
        }
    }

    /// Copy with a single stage's rate replaced; used by the suggestion
    /// generator's one-rate-at-a-time what-if solve.
    pub fn with_rate(&self, stage: ConversionStage, rate: f64) -> Self {
        let mut rates = *self;
        match stage {
            ConversionStage::VisitorToLead => rates.visitor_to_lead = rate,
            ConversionStage::LeadToMql => rates.lead_to_mql = rate,
            ConversionStage::MqlToSql => rates.mql_to_sql = rate,
            ConversionStage::SqlToOpportunity => rates.sql_to_opportunity = rate,
            ConversionStage::OpportunityToClose => rates.opportunity_to_close = rate,
        }
        rates
    }
}

impl Default for ConversionRates {
    fn default() -> Self {
        Self {
            visitor_to_lead: 0.03,
            lead_to_mql: 0.25,
            mql_to_sql: 0.5,
            sql_to_opportunity: 0.6,
            opportunity_to_close: 0.2,
        }
    }
}

/// Transient calculation input; created per session, mutated field-by-field
/// by the caller, never persisted. The engine only reads it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalculatorState {
    pub industry: String,
    pub scale: CompanyScale,
    /// Descriptive only; does not alter the math
    pub channel_mix: String,
    pub direction: CalculationDirection,
    pub budget: Option<f64>,
    pub revenue_goal: Option<f64>,
    pub avg_deal_size: f64,
    pub rates: ConversionRates,
    /// Whether rates are industry defaults or user-overridden
    pub rates_overridden: bool,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self {
            industry: DEFAULT_INDUSTRY.to_string(),
            scale: CompanyScale::Smb,
            channel_mix: "Blended".to_string(),
            direction: CalculationDirection::Reverse,
            budget: None,
            revenue_goal: Some(1_000_000.0),
            avg_deal_size: 20_000.0,
            rates: ConversionRates::default(),
            rates_overridden: false,
        }
    }
}

/// Annual volumes at each of the six funnel stages, top first
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageVolumes {
    pub web_visitors: StageValue,
    pub leads: StageValue,
    pub mqls: StageValue,
    pub sqos: StageValue,
    pub opportunities: StageValue,
    pub closed_won: StageValue,
}

impl StageVolumes {
    /// Volumes in funnel order, top first
    pub fn as_array(&self) -> [StageValue; 6] {
        [
            self.web_visitors,
            self.leads,
            self.mqls,
            self.sqos,
            self.opportunities,
            self.closed_won,
        ]
    }

    /// Volume entering the given conversion stage
    pub fn input_of(&self, stage: ConversionStage) -> StageValue {
        match stage {
            ConversionStage::VisitorToLead => self.web_visitors,
            ConversionStage::LeadToMql => self.leads,
            ConversionStage::MqlToSql => self.mqls,
            ConversionStage::SqlToOpportunity => self.sqos,
            ConversionStage::OpportunityToClose => self.opportunities,
        }
    }

    /// Volume produced by the given conversion stage
    pub fn output_of(&self, stage: ConversionStage) -> StageValue {
        match stage {
            ConversionStage::VisitorToLead => self.leads,
            ConversionStage::LeadToMql => self.mqls,
            ConversionStage::MqlToSql => self.sqos,
            ConversionStage::SqlToOpportunity => self.opportunities,
            ConversionStage::OpportunityToClose => self.closed_won,
        }
    }

    /// Monthly view: every annual volume divided by 12, computed once here
    /// so writers never re-derive it.
    pub fn monthly(&self) -> StageVolumes {
        StageVolumes {
            web_visitors: self.web_visitors.map(|v| v / 12.0),
            leads: self.leads.map(|v| v / 12.0),
            mqls: self.mqls.map(|v| v / 12.0),
            sqos: self.sqos.map(|v| v / 12.0),
            opportunities: self.opportunities.map(|v| v / 12.0),
            closed_won: self.closed_won.map(|v| v / 12.0),
        }
    }
}

/// Per-stage acquisition costs plus ROI, derived from volumes and spend
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitEconomics {
    pub cost_per_visitor: StageValue,
    pub cpl: StageValue,
    pub cpql: StageValue,
    pub cpsql: StageValue,
    pub cp_opp: StageValue,
    pub cac: StageValue,
    pub roi: StageValue,
}

/// Shortfall or surplus against a secondary target the user supplied
/// alongside the authoritative input. Absent entirely when no comparison
/// was requested.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase", tag = "kind")]
pub enum Gap {
    /// Forward solve vs a stated revenue goal
    RevenueShortfall { gap: f64, percentage_off: f64 },
    /// Reverse solve vs a stated budget ceiling
    BudgetOverrun { gap: f64, percentage_off: f64 },
}

/// The solved funnel: volumes, costs, spend, revenue, ROI, optional gap
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelResult {
    pub direction: CalculationDirection,
    pub annual: StageVolumes,
    pub monthly: StageVolumes,
    pub economics: UnitEconomics,
    pub total_spend: StageValue,
    pub revenue: f64,
    pub roi: StageValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap: Option<Gap>,
}

/// What a suggestion proposes changing. Conversion-rate improvements are
/// the only kind today; the discriminant keeps serialized suggestions
/// self-describing for consumers when more kinds arrive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SuggestionKind {
    ConversionRateImprovement,
}

/// One per-stage improvement proposal, emitted in funnel order
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub stage: ConversionStage,
    /// Actual conversion rate for the stage
    pub current: f64,
    /// Benchmark average, never the benchmark ceiling
    pub target: f64,
    /// Human-readable projection of the stage volume increase
    pub impact: String,
    /// Spend reduction to reach the same closed-won volume if this stage
    /// alone improved to target
    pub savings_estimate: StageValue,
}
