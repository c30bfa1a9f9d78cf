use super::types::{PlanRequest, Projection, ProjectionResult, RiskTier, SplitItem, YearPoint};

pub const CONSERVATIVE_ANNUAL_RATE: f64 = 0.06;
pub const MODERATE_ANNUAL_RATE: f64 = 0.10;
pub const AGGRESSIVE_ANNUAL_RATE: f64 = 0.14;

/// Longest horizon the engine projects. Longer durations are clamped to it;
/// the HTTP API rejects them outright.
pub const MAX_DURATION_YEARS: f64 = 100.0;

const MONTHS_PER_YEAR: f64 = 12.0;

pub fn monthly_savings(income: f64, expenses: f64) -> f64 {
    (income - expenses).max(0.0)
}

/// Ordinary-annuity future value of a fixed monthly contribution.
///
/// A non-positive monthly rate falls back to the linear sum so a zero rate
/// never divides by zero.
pub fn future_value(monthly_contribution: f64, annual_rate: f64, months: u32) -> f64 {
    let monthly_rate = annual_rate / MONTHS_PER_YEAR;
    if monthly_rate > 0.0 {
        monthly_contribution * ((1.0 + monthly_rate).powf(months as f64) - 1.0) / monthly_rate
    } else {
        monthly_contribution * months as f64
    }
}

/// Totals use the duration rounded to the nearest month while the series only
/// samples whole years, so for fractional durations the last series point and
/// the totals differ.
///
/// Negative or NaN durations count as zero and anything past
/// [`MAX_DURATION_YEARS`] is clamped to it.
pub fn project(savings: f64, duration_years: f64) -> Projection {
    let duration_years = duration_years.max(0.0).min(MAX_DURATION_YEARS);
    let total_months = whole_count((duration_years * MONTHS_PER_YEAR).round());
    let whole_years = whole_count(duration_years.floor());

    let series = (0..=whole_years)
        .map(|year| year_point(savings, year))
        .collect();

    Projection {
        conservative: scenario_value(savings, CONSERVATIVE_ANNUAL_RATE, total_months),
        moderate: scenario_value(savings, MODERATE_ANNUAL_RATE, total_months),
        aggressive: scenario_value(savings, AGGRESSIVE_ANNUAL_RATE, total_months),
        series,
    }
}

pub fn investment_split(risk: RiskTier) -> Vec<SplitItem> {
    let (fixed_income, mutual_funds, equities) = match risk {
        RiskTier::Low => (60, 40, 0),
        RiskTier::Medium => (30, 50, 20),
        RiskTier::High => (10, 60, 30),
    };
    vec![
        SplitItem {
            label: "FD/PPF",
            percentage: fixed_income,
        },
        SplitItem {
            label: "SIP/Mutual Funds",
            percentage: mutual_funds,
        },
        SplitItem {
            label: "Stocks/NPS",
            percentage: equities,
        },
    ]
}

pub fn compute_projection(request: &PlanRequest, computed_at: i64) -> ProjectionResult {
    let savings = monthly_savings(request.monthly_income, request.monthly_expenses);
    let projection = project(savings, request.duration_years);

    ProjectionResult {
        monthly_savings: savings,
        conservative: projection.conservative,
        moderate: projection.moderate,
        aggressive: projection.aggressive,
        investment_split: investment_split(request.risk),
        series: projection.series,
        target: request.target,
        duration_years: request.duration_years,
        computed_at,
    }
}

fn year_point(savings: f64, year: u32) -> YearPoint {
    let months = year * 12;
    YearPoint {
        year,
        conservative: scenario_value(savings, CONSERVATIVE_ANNUAL_RATE, months),
        moderate: scenario_value(savings, MODERATE_ANNUAL_RATE, months),
        aggressive: scenario_value(savings, AGGRESSIVE_ANNUAL_RATE, months),
    }
}

fn scenario_value(savings: f64, annual_rate: f64, months: u32) -> f64 {
    future_value(savings, annual_rate, months).round()
}

/// Converts an already-rounded, non-negative count; anything outside `u32`
/// (or NaN) maps to zero instead of saturating.
fn whole_count(value: f64) -> u32 {
    if value.is_finite() && (0.0..=f64::from(u32::MAX)).contains(&value) {
        value as u32
    } else {
        0
    }
}
