mod catalog;
mod engine;
mod input;
mod types;
mod wizard;

pub use catalog::{catalog, pick_plans};
pub use engine::{
    AGGRESSIVE_ANNUAL_RATE, CONSERVATIVE_ANNUAL_RATE, MAX_DURATION_YEARS, MODERATE_ANNUAL_RATE,
    compute_projection, future_value, investment_split, monthly_savings, project,
};
pub use input::{sanitize_digits, to_number};
pub use types::{
    CatalogItem, HistoricalReturns, PlanRequest, Projection, ProjectionResult, RiskTier,
    SplitItem, YearPoint,
};
pub use wizard::{GOAL_PRESETS, TOTAL_STEPS, WizardError, WizardInput, WizardSession, WizardStep};
