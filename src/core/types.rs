//! Common type definitions used across the engine

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Which end of the funnel is the independent variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalculationDirection {
    /// Budget is authoritative; revenue is derived
    Forward,
    /// Revenue goal is authoritative; required budget is derived
    Reverse,
}

/// Customer scale segment, used to select CAC benchmarks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CompanyScale {
    Consumer,
    Smb,
    MiddleMarket,
    Enterprise,
}

impl CompanyScale {
    pub fn display_name(&self) -> &str {
        match self {
            CompanyScale::Consumer => "Consumer",
            CompanyScale::Smb => "SMB",
            CompanyScale::MiddleMarket => "Middle Market",
            CompanyScale::Enterprise => "Enterprise",
        }
    }
}

/// The five conversion steps of the funnel, in funnel order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConversionStage {
    VisitorToLead,
    LeadToMql,
    MqlToSql,
    SqlToOpportunity,
    OpportunityToClose,
}

impl ConversionStage {
    /// All stages, top of funnel first
    pub fn all() -> [ConversionStage; 5] {
        [
            ConversionStage::VisitorToLead,
            ConversionStage::LeadToMql,
            ConversionStage::MqlToSql,
            ConversionStage::SqlToOpportunity,
            ConversionStage::OpportunityToClose,
        ]
    }

    pub fn display_name(&self) -> &str {
        match self {
            ConversionStage::VisitorToLead => "Visitor → Lead",
            ConversionStage::LeadToMql => "Lead → MQL",
            ConversionStage::MqlToSql => "MQL → SQL",
            ConversionStage::SqlToOpportunity => "SQL → Opportunity",
            ConversionStage::OpportunityToClose => "Opportunity → Closed Won",
        }
    }

    /// Name of the volume this stage produces
    pub fn output_name(&self) -> &str {
        match self {
            ConversionStage::VisitorToLead => "leads",
            ConversionStage::LeadToMql => "MQLs",
            ConversionStage::MqlToSql => "SQLs",
            ConversionStage::SqlToOpportunity => "opportunities",
            ConversionStage::OpportunityToClose => "closed-won deals",
        }
    }
}

/// A funnel quantity that is either a finite number or explicitly not
/// computable (a reverse solve hit a zero conversion rate, or a cost was
/// requested for an empty stage). Never holds NaN or infinity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StageValue {
    Computed(f64),
    NotComputable,
}

impl StageValue {
    /// Construct from a raw float, mapping non-finite values to the
    /// not-computable marker so NaN/Infinity never escape the engine.
    pub fn from_f64(value: f64) -> Self {
        if value.is_finite() {
            StageValue::Computed(value)
        } else {
            StageValue::NotComputable
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            StageValue::Computed(v) => Some(*v),
            StageValue::NotComputable => None,
        }
    }

    pub fn is_computable(&self) -> bool {
        matches!(self, StageValue::Computed(_))
    }

    /// Multiply by a rate; not-computable propagates.
    pub fn scale(&self, factor: f64) -> StageValue {
        match self {
            StageValue::Computed(v) => StageValue::from_f64(v * factor),
            StageValue::NotComputable => StageValue::NotComputable,
        }
    }

    /// Divide by a rate. A zero divisor yields the not-computable marker
    /// rather than infinity; this is the reverse-solver's zero-rate guard.
    pub fn div_by(&self, divisor: f64) -> StageValue {
        match self {
            StageValue::Computed(v) if divisor > 0.0 => StageValue::from_f64(v / divisor),
            _ => StageValue::NotComputable,
        }
    }

    pub fn map(&self, f: impl FnOnce(f64) -> f64) -> StageValue {
        match self {
            StageValue::Computed(v) => StageValue::from_f64(f(*v)),
            StageValue::NotComputable => StageValue::NotComputable,
        }
    }
}

impl From<f64> for StageValue {
    fn from(value: f64) -> Self {
        StageValue::from_f64(value)
    }
}

impl fmt::Display for StageValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageValue::Computed(v) => write!(f, "{v:.2}"),
            StageValue::NotComputable => write!(f, "n/a"),
        }
    }
}

// Computed(x) serializes as x, NotComputable as null, so JSON consumers
// see an ordinary nullable number.
impl Serialize for StageValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StageValue::Computed(v) => serializer.serialize_f64(*v),
            StageValue::NotComputable => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for StageValue {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<f64>::deserialize(deserializer)?;
        Ok(match raw {
            Some(v) => StageValue::from_f64(v),
            None => StageValue::NotComputable,
        })
    }
}
