use std::fmt;
use std::str::FromStr;

use serde::Serialize;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize)]
pub enum RiskTier {
    Low,
    #[default]
    Medium,
    High,
}

impl RiskTier {
    pub const ALL: [RiskTier; 3] = [RiskTier::Low, RiskTier::Medium, RiskTier::High];

    pub fn label(self) -> &'static str {
        match self {
            RiskTier::Low => "Low",
            RiskTier::Medium => "Medium",
            RiskTier::High => "High",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RiskTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(RiskTier::Low),
            "medium" => Ok(RiskTier::Medium),
            "high" => Ok(RiskTier::High),
            other => Err(format!("unknown risk tier '{other}' (expected low, medium or high)")),
        }
    }
}

/// Normalized wizard output: every numeric field already coerced to a number.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRequest {
    pub goal: String,
    pub target: f64,
    pub duration_years: f64,
    pub monthly_income: f64,
    pub monthly_expenses: f64,
    pub risk: RiskTier,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearPoint {
    pub year: u32,
    pub conservative: f64,
    pub moderate: f64,
    pub aggressive: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitItem {
    #[serde(rename = "name")]
    pub label: &'static str,
    #[serde(rename = "value")]
    pub percentage: u32,
}

/// Scenario totals and the whole-year series for one savings figure.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub conservative: f64,
    pub moderate: f64,
    pub aggressive: f64,
    pub series: Vec<YearPoint>,
}

// Field names on the wire match what the chart front end reads.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    #[serde(rename = "savings")]
    pub monthly_savings: f64,
    pub conservative: f64,
    pub moderate: f64,
    pub aggressive: f64,
    pub investment_split: Vec<SplitItem>,
    #[serde(rename = "projection")]
    pub series: Vec<YearPoint>,
    pub target: f64,
    pub duration_years: f64,
    /// Unix timestamp in milliseconds.
    pub computed_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistoricalReturns {
    pub y3: f64,
    pub y5: f64,
    pub y10: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub risk: RiskTier,
    pub historical: HistoricalReturns,
    pub expense_ratio: f64,
    pub lock_in: &'static str,
    pub tax_benefit: Option<&'static str>,
    pub min_sip: u32,
    pub rating: u8,
    pub affiliate_url: &'static str,
    pub blurb: &'static str,
}
