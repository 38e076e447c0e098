//! Industry benchmark repository.
//!
//! Read-only reference data: per-industry conversion-rate ranges, a
//! cost-per-visitor assumption, and CAC ranges by company scale. The
//! built-in table ships with the crate; config files may add or override
//! rows. Engine functions always take the repository by reference so
//! parallel scenario runs share one immutable table.

pub mod classifier;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::core::{CompanyScale, ConversionStage, DEFAULT_INDUSTRY};

pub use classifier::{classify_against_benchmark, BenchmarkLabel, Classification, MetricDirection};

/// Reference range for one metric: observed floor, average, and ceiling
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Benchmark {
    pub min: f64,
    pub avg: f64,
    pub max: f64,
}

impl Benchmark {
    pub fn new(min: f64, avg: f64, max: f64) -> Self {
        Self { min, avg, max }
    }
}

/// Benchmark ranges for the five conversion stages
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateBenchmarks {
    pub visitor_to_lead: Benchmark,
    pub lead_to_mql: Benchmark,
    pub mql_to_sql: Benchmark,
    pub sql_to_opportunity: Benchmark,
    pub opportunity_to_close: Benchmark,
}

impl RateBenchmarks {
    pub fn get(&self, stage: ConversionStage) -> Benchmark {
        match stage {
            ConversionStage::VisitorToLead => self.visitor_to_lead,
            ConversionStage::LeadToMql => self.lead_to_mql,
            ConversionStage::MqlToSql => self.mql_to_sql,
            ConversionStage::SqlToOpportunity => self.sql_to_opportunity,
            ConversionStage::OpportunityToClose => self.opportunity_to_close,
        }
    }
}

/// CAC ranges keyed by company scale
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacBenchmarks {
    pub consumer: Benchmark,
    pub smb: Benchmark,
    pub middle_market: Benchmark,
    pub enterprise: Benchmark,
}

impl CacBenchmarks {
    pub fn get(&self, scale: CompanyScale) -> Benchmark {
        match scale {
            CompanyScale::Consumer => self.consumer,
            CompanyScale::Smb => self.smb,
            CompanyScale::MiddleMarket => self.middle_market,
            CompanyScale::Enterprise => self.enterprise,
        }
    }
}

/// One industry's full benchmark row
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndustryBenchmarks {
    pub name: String,
    pub rates: RateBenchmarks,
    pub cost_per_visitor: Benchmark,
    pub cac: CacBenchmarks,
}

/// The full lookup table plus the alias map used for name resolution
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BenchmarkRepository {
    industries: Vec<IndustryBenchmarks>,
    /// lowercase alias → canonical industry name
    aliases: Vec<(String, String)>,
}

impl BenchmarkRepository {
    pub fn new(industries: Vec<IndustryBenchmarks>, aliases: Vec<(String, String)>) -> Self {
        Self {
            industries,
            aliases,
        }
    }

    /// The built-in reference table
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    pub fn industries(&self) -> &[IndustryBenchmarks] {
        &self.industries
    }

    /// Add or replace an industry row (config overrides)
    pub fn upsert(&mut self, row: IndustryBenchmarks) {
        match self
            .industries
            .iter_mut()
            .find(|existing| existing.name.eq_ignore_ascii_case(&row.name))
        {
            Some(existing) => *existing = row,
            None => self.industries.push(row),
        }
    }

    /// Resolve a free-text industry label to a benchmark row.
    ///
    /// Total function: exact match, then alias table, then
    /// case-insensitive substring, then the default industry. Never fails;
    /// fallbacks are logged at debug level.
    pub fn resolve(&self, label: &str) -> &IndustryBenchmarks {
        let needle = label.trim().to_lowercase();

        if let Some(row) = self
            .industries
            .iter()
            .find(|row| row.name.to_lowercase() == needle)
        {
            return row;
        }

        if let Some((_, canonical)) = self.aliases.iter().find(|(alias, _)| *alias == needle) {
            if let Some(row) = self
                .industries
                .iter()
                .find(|row| row.name.eq_ignore_ascii_case(canonical))
            {
                log::debug!("industry '{label}' resolved via alias to '{}'", row.name);
                return row;
            }
        }

        if !needle.is_empty() {
            if let Some(row) = self.industries.iter().find(|row| {
                let name = row.name.to_lowercase();
                name.contains(&needle) || needle.contains(&name)
            }) {
                log::debug!("industry '{label}' resolved via substring to '{}'", row.name);
                return row;
            }
        }

        log::debug!("industry '{label}' not found, using '{DEFAULT_INDUSTRY}'");
        self.default_industry()
    }

    /// The guaranteed fallback row. Total even for a repository built
    /// from an empty table: the built-in default row backs the last
    /// resort so resolution never panics.
    pub fn default_industry(&self) -> &IndustryBenchmarks {
        self.industries
            .iter()
            .find(|row| row.name == DEFAULT_INDUSTRY)
            .or_else(|| self.industries.first())
            .unwrap_or(&*DEFAULT_ROW)
    }
}

impl Default for BenchmarkRepository {
    fn default() -> Self {
        Self::builtin()
    }
}

/// The general-SaaS row, kept out of the table so `default_industry` can
/// fall back to it even when a repository was built without it.
static DEFAULT_ROW: Lazy<IndustryBenchmarks> = Lazy::new(|| IndustryBenchmarks {
    name: DEFAULT_INDUSTRY.to_string(),
    rates: RateBenchmarks {
        visitor_to_lead: Benchmark::new(0.01, 0.03, 0.07),
        lead_to_mql: Benchmark::new(0.15, 0.25, 0.40),
        mql_to_sql: Benchmark::new(0.30, 0.50, 0.70),
        sql_to_opportunity: Benchmark::new(0.40, 0.60, 0.80),
        opportunity_to_close: Benchmark::new(0.10, 0.20, 0.35),
    },
    cost_per_visitor: Benchmark::new(0.40, 0.73, 1.50),
    cac: CacBenchmarks {
        consumer: Benchmark::new(100.0, 300.0, 800.0),
        smb: Benchmark::new(500.0, 1_500.0, 4_000.0),
        middle_market: Benchmark::new(2_000.0, 6_000.0, 15_000.0),
        enterprise: Benchmark::new(8_000.0, 25_000.0, 80_000.0),
    },
});

static BUILTIN: Lazy<BenchmarkRepository> = Lazy::new(|| {
    let industries = vec![
        DEFAULT_ROW.clone(),
        IndustryBenchmarks {
            name: "B2B SaaS".to_string(),
            rates: RateBenchmarks {
                visitor_to_lead: Benchmark::new(0.01, 0.025, 0.05),
                lead_to_mql: Benchmark::new(0.20, 0.30, 0.45),
                mql_to_sql: Benchmark::new(0.35, 0.55, 0.75),
                sql_to_opportunity: Benchmark::new(0.45, 0.62, 0.80),
                opportunity_to_close: Benchmark::new(0.12, 0.22, 0.38),
            },
            cost_per_visitor: Benchmark::new(0.60, 1.10, 2.50),
            cac: CacBenchmarks {
                consumer: Benchmark::new(150.0, 400.0, 1_000.0),
                smb: Benchmark::new(800.0, 2_000.0, 5_000.0),
                middle_market: Benchmark::new(3_000.0, 8_000.0, 20_000.0),
                enterprise: Benchmark::new(10_000.0, 30_000.0, 100_000.0),
            },
        },
        IndustryBenchmarks {
            name: "E-commerce".to_string(),
            rates: RateBenchmarks {
                visitor_to_lead: Benchmark::new(0.02, 0.05, 0.10),
                lead_to_mql: Benchmark::new(0.25, 0.40, 0.60),
                mql_to_sql: Benchmark::new(0.40, 0.60, 0.80),
                sql_to_opportunity: Benchmark::new(0.50, 0.70, 0.90),
                opportunity_to_close: Benchmark::new(0.20, 0.35, 0.55),
            },
            cost_per_visitor: Benchmark::new(0.20, 0.45, 1.00),
            cac: CacBenchmarks {
                consumer: Benchmark::new(20.0, 80.0, 250.0),
                smb: Benchmark::new(100.0, 350.0, 900.0),
                middle_market: Benchmark::new(500.0, 1_500.0, 4_000.0),
                enterprise: Benchmark::new(2_000.0, 6_000.0, 15_000.0),
            },
        },
        IndustryBenchmarks {
            name: "Fintech".to_string(),
            rates: RateBenchmarks {
                visitor_to_lead: Benchmark::new(0.008, 0.02, 0.045),
                lead_to_mql: Benchmark::new(0.15, 0.28, 0.42),
                mql_to_sql: Benchmark::new(0.30, 0.48, 0.68),
                sql_to_opportunity: Benchmark::new(0.40, 0.58, 0.78),
                opportunity_to_close: Benchmark::new(0.10, 0.18, 0.32),
            },
            cost_per_visitor: Benchmark::new(0.80, 1.40, 3.00),
            cac: CacBenchmarks {
                consumer: Benchmark::new(200.0, 500.0, 1_200.0),
                smb: Benchmark::new(1_000.0, 2_500.0, 6_000.0),
                middle_market: Benchmark::new(4_000.0, 10_000.0, 25_000.0),
                enterprise: Benchmark::new(15_000.0, 40_000.0, 120_000.0),
            },
        },
        IndustryBenchmarks {
            name: "Cybersecurity".to_string(),
            rates: RateBenchmarks {
                visitor_to_lead: Benchmark::new(0.008, 0.018, 0.04),
                lead_to_mql: Benchmark::new(0.18, 0.28, 0.42),
                mql_to_sql: Benchmark::new(0.32, 0.52, 0.72),
                sql_to_opportunity: Benchmark::new(0.42, 0.60, 0.78),
                opportunity_to_close: Benchmark::new(0.10, 0.19, 0.33),
            },
            cost_per_visitor: Benchmark::new(1.00, 1.80, 3.50),
            cac: CacBenchmarks {
                consumer: Benchmark::new(250.0, 600.0, 1_500.0),
                smb: Benchmark::new(1_500.0, 3_500.0, 8_000.0),
                middle_market: Benchmark::new(5_000.0, 12_000.0, 30_000.0),
                enterprise: Benchmark::new(20_000.0, 50_000.0, 150_000.0),
            },
        },
    ];

    let aliases = [
        ("saas", DEFAULT_INDUSTRY),
        ("software", DEFAULT_INDUSTRY),
        ("general", DEFAULT_INDUSTRY),
        ("average", DEFAULT_INDUSTRY),
        ("b2b", "B2B SaaS"),
        ("ecommerce", "E-commerce"),
        ("ecom", "E-commerce"),
        ("online retail", "E-commerce"),
        ("retail", "E-commerce"),
        ("financial services", "Fintech"),
        ("banking", "Fintech"),
        ("security", "Cybersecurity"),
        ("infosec", "Cybersecurity"),
    ]
    .into_iter()
    .map(|(alias, canonical)| (alias.to_string(), canonical.to_string()))
    .collect();

    BenchmarkRepository::new(industries, aliases)
});
