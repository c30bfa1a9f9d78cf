use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info};

use super::engine::compute_projection;
use super::input::{sanitize_digits, to_number};
use super::types::{PlanRequest, ProjectionResult, RiskTier};

pub const TOTAL_STEPS: usize = 6;

pub const GOAL_PRESETS: [&str; 5] = [
    "Buy a House",
    "Buy a Car",
    "Wedding",
    "Education",
    "Emergency Fund",
];

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum WizardStep {
    Goal,
    Target,
    Duration,
    Income,
    Expenses,
    Risk,
}

impl WizardStep {
    pub const ALL: [WizardStep; TOTAL_STEPS] = [
        WizardStep::Goal,
        WizardStep::Target,
        WizardStep::Duration,
        WizardStep::Income,
        WizardStep::Expenses,
        WizardStep::Risk,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            WizardStep::Target | WizardStep::Duration | WizardStep::Income | WizardStep::Expenses
        )
    }

    pub fn prompt(self) -> &'static str {
        match self {
            WizardStep::Goal => "What is your goal?",
            WizardStep::Target => "How much do you want to reach?",
            WizardStep::Duration => "In how many years?",
            WizardStep::Income => "What's your monthly income?",
            WizardStep::Expenses => "Monthly expenses?",
            WizardStep::Risk => "Risk appetite? (low / medium / high)",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("{0:?} step is incomplete: a value is required before continuing")]
    IncompleteStep(WizardStep),
    #[error("plan can only be generated from the final step (currently on step {current} of {total})")]
    NotAtFinalStep { current: usize, total: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WizardInput {
    pub goal: String,
    pub target: String,
    pub duration_years: String,
    pub monthly_income: String,
    pub monthly_expenses: String,
    pub risk: RiskTier,
}

impl WizardInput {
    fn field(&self, step: WizardStep) -> Option<&str> {
        match step {
            WizardStep::Goal => Some(self.goal.as_str()),
            WizardStep::Target => Some(self.target.as_str()),
            WizardStep::Duration => Some(self.duration_years.as_str()),
            WizardStep::Income => Some(self.monthly_income.as_str()),
            WizardStep::Expenses => Some(self.monthly_expenses.as_str()),
            WizardStep::Risk => None,
        }
    }

    fn field_mut(&mut self, step: WizardStep) -> Option<&mut String> {
        match step {
            WizardStep::Goal => Some(&mut self.goal),
            WizardStep::Target => Some(&mut self.target),
            WizardStep::Duration => Some(&mut self.duration_years),
            WizardStep::Income => Some(&mut self.monthly_income),
            WizardStep::Expenses => Some(&mut self.monthly_expenses),
            WizardStep::Risk => None,
        }
    }

    pub fn to_request(&self) -> PlanRequest {
        PlanRequest {
            goal: self.goal.clone(),
            target: to_number(&self.target),
            duration_years: to_number(&self.duration_years),
            monthly_income: to_number(&self.monthly_income),
            monthly_expenses: to_number(&self.monthly_expenses),
            risk: self.risk,
        }
    }
}

/// One interactive planning session: the form state plus the result that
/// replaces it once submitted.
#[derive(Debug, Clone, Default)]
pub struct WizardSession {
    current_step: usize,
    input: WizardInput,
    result: Option<ProjectionResult>,
}

impl WizardSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn step(&self) -> WizardStep {
        WizardStep::ALL[self.current_step]
    }

    /// Fraction of the wizard reached, counting the current step.
    pub fn progress(&self) -> f64 {
        (self.current_step + 1) as f64 / TOTAL_STEPS as f64
    }

    pub fn input(&self) -> &WizardInput {
        &self.input
    }

    pub fn result(&self) -> Option<&ProjectionResult> {
        self.result.as_ref()
    }

    pub fn is_step_complete(&self, step: WizardStep) -> bool {
        self.input.field(step).is_none_or(|value| !value.is_empty())
    }

    pub fn set_field(&mut self, step: WizardStep, raw: &str) {
        if self.result.is_some() {
            return;
        }
        match step {
            WizardStep::Risk => {
                if let Ok(risk) = raw.parse::<RiskTier>() {
                    self.set_risk(risk);
                }
            }
            WizardStep::Goal => self.input.goal = raw.to_string(),
            numeric => {
                if let Some(slot) = self.input.field_mut(numeric) {
                    *slot = sanitize_digits(raw);
                }
            }
        }
        debug!(step = ?step, "wizard field updated");
    }

    /// Unknown labels are stored as free text, same as typing them.
    pub fn set_goal_preset(&mut self, label: &str) {
        self.set_field(WizardStep::Goal, label);
    }

    pub fn set_risk(&mut self, risk: RiskTier) {
        if self.result.is_none() {
            self.input.risk = risk;
        }
    }

    /// Moves one step forward without checking the current field.
    pub fn advance(&mut self) {
        if self.result.is_none() && self.current_step < TOTAL_STEPS - 1 {
            self.current_step += 1;
            debug!(step = self.current_step, "wizard advanced");
        }
    }

    /// Like [`advance`](Self::advance) but refuses to leave a step whose
    /// field is still empty.
    pub fn try_advance(&mut self) -> Result<(), WizardError> {
        let step = self.step();
        if !self.is_step_complete(step) {
            return Err(WizardError::IncompleteStep(step));
        }
        self.advance();
        Ok(())
    }

    pub fn back(&mut self) {
        if self.result.is_none() && self.current_step > 0 {
            self.current_step -= 1;
            debug!(step = self.current_step, "wizard went back");
        }
    }

    /// Bank statement upload hook. Statements are not parsed yet; the bytes
    /// are accepted and dropped.
    pub fn upload_statement(&self, data: &[u8]) {
        debug!(bytes = data.len(), "ignoring uploaded bank statement");
    }

    pub fn submit(&mut self) -> Result<&ProjectionResult, WizardError> {
        self.submit_at(Utc::now().timestamp_millis())
    }

    pub fn submit_at(&mut self, computed_at: i64) -> Result<&ProjectionResult, WizardError> {
        if self.current_step != TOTAL_STEPS - 1 {
            return Err(WizardError::NotAtFinalStep {
                current: self.current_step + 1,
                total: TOTAL_STEPS,
            });
        }

        let request = self.input.to_request();
        let result = compute_projection(&request, computed_at);
        info!(
            goal = %request.goal,
            risk = %request.risk,
            savings = result.monthly_savings,
            duration_years = request.duration_years,
            "plan generated"
        );
        Ok(&*self.result.insert(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_at_final_step() -> WizardSession {
        let mut session = WizardSession::new();
        session.set_goal_preset("Buy a House");
        session.advance();
        session.set_field(WizardStep::Target, "500000");
        session.advance();
        session.set_field(WizardStep::Duration, "10");
        session.advance();
        session.set_field(WizardStep::Income, "80000");
        session.advance();
        session.set_field(WizardStep::Expenses, "50000");
        session.advance();
        session.set_field(WizardStep::Risk, "Medium");
        session
    }

    #[test]
    fn new_session_starts_at_goal_with_medium_risk() {
        let session = WizardSession::new();
        assert_eq!(session.current_step(), 0);
        assert_eq!(session.step(), WizardStep::Goal);
        assert_eq!(session.input().risk, RiskTier::Medium);
        assert!(session.result().is_none());
    }

    #[test]
    fn back_is_clamped_at_first_step() {
        let mut session = WizardSession::new();
        session.back();
        assert_eq!(session.current_step(), 0);
    }

    #[test]
    fn advance_is_clamped_at_last_step() {
        let mut session = WizardSession::new();
        for _ in 0..20 {
            session.advance();
        }
        assert_eq!(session.current_step(), TOTAL_STEPS - 1);
        assert_eq!(session.step(), WizardStep::Risk);
    }

    #[test]
    fn advance_does_not_validate() {
        let mut session = WizardSession::new();
        session.advance();
        assert_eq!(session.step(), WizardStep::Target);
    }

    #[test]
    fn try_advance_rejects_empty_field() {
        let mut session = WizardSession::new();
        assert_eq!(
            session.try_advance(),
            Err(WizardError::IncompleteStep(WizardStep::Goal))
        );
        assert_eq!(session.current_step(), 0);

        session.set_field(WizardStep::Goal, "Wedding");
        assert_eq!(session.try_advance(), Ok(()));
        assert_eq!(session.step(), WizardStep::Target);

        session.set_field(WizardStep::Target, "abc");
        assert_eq!(
            session.try_advance(),
            Err(WizardError::IncompleteStep(WizardStep::Target))
        );
    }

    #[test]
    fn numeric_fields_are_sanitized_on_entry() {
        let mut session = WizardSession::new();
        session.set_field(WizardStep::Target, "1,2a3b4");
        assert_eq!(session.input().target, "1234");
        session.set_field(WizardStep::Target, "1234");
        assert_eq!(session.input().target, "1234");
        session.set_field(WizardStep::Income, "12a3");
        assert_eq!(session.input().monthly_income, "123");
    }

    #[test]
    fn goal_is_stored_verbatim() {
        let mut session = WizardSession::new();
        session.set_field(WizardStep::Goal, "  Trip to Leh, 2027 ");
        assert_eq!(session.input().goal, "  Trip to Leh, 2027 ");
        session.set_goal_preset(GOAL_PRESETS[4]);
        assert_eq!(session.input().goal, "Emergency Fund");
    }

    #[test]
    fn unknown_risk_text_keeps_previous_tier() {
        let mut session = WizardSession::new();
        session.set_field(WizardStep::Risk, "HIGH");
        assert_eq!(session.input().risk, RiskTier::High);
        session.set_field(WizardStep::Risk, "yolo");
        assert_eq!(session.input().risk, RiskTier::High);
    }

    #[test]
    fn risk_step_is_always_complete() {
        let session = WizardSession::new();
        assert!(session.is_step_complete(WizardStep::Risk));
        assert!(!session.is_step_complete(WizardStep::Expenses));
    }

    #[test]
    fn submit_requires_final_step() {
        let mut session = WizardSession::new();
        let err = session.submit_at(0).expect_err("must reject early submit");
        assert_eq!(
            err,
            WizardError::NotAtFinalStep {
                current: 1,
                total: TOTAL_STEPS
            }
        );
        assert!(session.result().is_none());
    }

    #[test]
    fn submit_runs_engine_on_normalized_input() {
        let mut session = session_at_final_step();
        let result = session.submit_at(1_000).expect("final step submit");

        assert_eq!(result.monthly_savings, 30_000.0);
        assert_eq!(result.conservative, 4_916_380.0);
        assert_eq!(result.moderate, 6_145_349.0);
        assert_eq!(result.aggressive, 7_772_067.0);
        assert_eq!(result.series.len(), 11);
        assert_eq!(result.target, 500_000.0);
        assert_eq!(result.investment_split[2].label, "Stocks/NPS");
        assert_eq!(result.investment_split[2].percentage, 20);
    }

    #[test]
    fn empty_numeric_fields_submit_as_zero() {
        let mut session = WizardSession::new();
        for _ in 0..TOTAL_STEPS {
            session.advance();
        }
        let result = session.submit_at(0).expect("submit");
        assert_eq!(result.monthly_savings, 0.0);
        assert_eq!(result.target, 0.0);
        assert_eq!(result.series.len(), 1);
        assert_eq!(result.conservative, 0.0);
    }

    #[test]
    fn result_supersedes_input_view() {
        let mut session = session_at_final_step();
        session.submit_at(1).expect("submit");

        session.back();
        session.set_field(WizardStep::Income, "1");
        session.set_risk(RiskTier::Low);
        assert_eq!(session.step(), WizardStep::Risk);
        assert_eq!(session.input().monthly_income, "80000");
        assert_eq!(session.input().risk, RiskTier::Medium);
    }

    #[test]
    fn resubmit_replaces_previous_result() {
        let mut session = session_at_final_step();
        session.submit_at(1).expect("first submit");
        let second = session.submit_at(2).expect("second submit");
        assert_eq!(second.computed_at, 2);
        assert_eq!(session.result().map(|r| r.computed_at), Some(2));
    }

    #[test]
    fn upload_statement_leaves_state_untouched() {
        let session = session_at_final_step();
        let before = session.input().clone();
        session.upload_statement(b"date,amount\n2024-01-01,-500\n");
        assert_eq!(session.input(), &before);
    }

    #[test]
    fn step_index_matches_position() {
        for (idx, step) in WizardStep::ALL.iter().enumerate() {
            assert_eq!(step.index(), idx);
        }
        assert_eq!(WizardStep::ALL.len(), TOTAL_STEPS);
    }
}
