use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::api::run_http_server;
use crate::config::Settings;
use crate::core::{
    GOAL_PRESETS, MAX_DURATION_YEARS, ProjectionResult, RiskTier, TOTAL_STEPS, WizardSession,
    WizardStep, to_number,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliRiskTier {
    Low,
    Medium,
    High,
}

impl From<CliRiskTier> for RiskTier {
    fn from(value: CliRiskTier) -> Self {
        match value {
            CliRiskTier::Low => RiskTier::Low,
            CliRiskTier::Medium => RiskTier::Medium,
            CliRiskTier::High => RiskTier::High,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "finler",
    version,
    about = "Goal-based savings planner (three-scenario projections + allocation split)"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the plan HTTP API
    Serve {
        /// Overrides the PORT environment variable
        #[arg(long)]
        port: Option<u16>,
    },
    /// Compute a plan from flags
    Plan(PlanArgs),
    /// Answer the planning questions interactively
    Wizard,
}

#[derive(Args, Debug, Clone)]
struct PlanArgs {
    #[arg(long, help = "Goal label, e.g. \"Buy a House\"")]
    goal: String,
    #[arg(long, help = "Target amount; non-digits are ignored")]
    target: String,
    #[arg(long, help = "Duration in whole years")]
    duration: String,
    #[arg(long, help = "Monthly income")]
    income: String,
    #[arg(long, help = "Monthly expenses")]
    expenses: String,
    #[arg(long, value_enum, default_value_t = CliRiskTier::Medium)]
    risk: CliRiskTier,
    #[arg(long, help = "Print the result as JSON")]
    json: bool,
}

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Serve { port } => {
            let mut settings = Settings::from_env().context("invalid configuration")?;
            if let Some(port) = port {
                settings.port = port;
            }
            run_http_server(settings)
                .await
                .context("HTTP server stopped with an error")
        }
        Command::Plan(args) => {
            let stdout = io::stdout();
            run_plan(&args, &mut stdout.lock())
        }
        Command::Wizard => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            run_wizard(stdin.lock(), &mut stdout.lock()).map(|_| ())
        }
    }
}

fn run_plan<W: Write>(args: &PlanArgs, out: &mut W) -> Result<()> {
    let mut session = WizardSession::new();
    let answers = [
        (WizardStep::Goal, args.goal.as_str()),
        (WizardStep::Target, args.target.as_str()),
        (WizardStep::Duration, args.duration.as_str()),
        (WizardStep::Income, args.income.as_str()),
        (WizardStep::Expenses, args.expenses.as_str()),
    ];
    for (step, raw) in answers {
        session.set_field(step, raw);
        if step == WizardStep::Duration && duration_over_cap(&session) {
            bail!("--duration must be at most {MAX_DURATION_YEARS} years");
        }
        session
            .try_advance()
            .with_context(|| format!("--{} needs a value", flag_name(step)))?;
    }
    session.set_risk(args.risk.into());

    let goal = session.input().goal.clone();
    let result = session.submit()?;
    if args.json {
        let json = serde_json::to_string_pretty(result).context("failed to encode plan")?;
        writeln!(out, "{json}")?;
    } else {
        write_summary(out, &goal, result)?;
    }
    Ok(())
}

fn flag_name(step: WizardStep) -> &'static str {
    match step {
        WizardStep::Goal => "goal",
        WizardStep::Target => "target",
        WizardStep::Duration => "duration",
        WizardStep::Income => "income",
        WizardStep::Expenses => "expenses",
        WizardStep::Risk => "risk",
    }
}

/// Drives a session from line-oriented input. Typing `back` returns to the
/// previous question.
fn run_wizard<R: BufRead, W: Write>(mut input: R, out: &mut W) -> Result<ProjectionResult> {
    let mut session = WizardSession::new();
    writeln!(out, "Hi! I'm Finler, your planner. Let's plan your goal.")?;

    loop {
        let step = session.step();
        writeln!(out)?;
        writeln!(
            out,
            "Step {} of {TOTAL_STEPS} ({:.0}%): {}",
            session.current_step() + 1,
            session.progress() * 100.0,
            step.prompt()
        )?;
        if step.is_numeric() {
            writeln!(out, "  (digits only, anything else is ignored)")?;
        }
        if step == WizardStep::Goal {
            for (idx, preset) in GOAL_PRESETS.iter().enumerate() {
                writeln!(out, "  {}) {preset}", idx + 1)?;
            }
        }
        if step == WizardStep::Expenses {
            writeln!(out, "  (bank statement upload is not available here)")?;
        }
        write!(out, "> ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            bail!("input ended before the plan was generated");
        }
        let answer = line.trim_end_matches(['\r', '\n']);

        if answer.trim().eq_ignore_ascii_case("back") {
            session.back();
            continue;
        }

        match step {
            WizardStep::Goal => match preset_choice(answer) {
                Some(preset) => session.set_goal_preset(preset),
                None => session.set_field(step, answer.trim()),
            },
            WizardStep::Risk => {
                if !answer.trim().is_empty() {
                    match answer.parse::<RiskTier>() {
                        Ok(risk) => session.set_risk(risk),
                        Err(msg) => {
                            writeln!(out, "{msg}")?;
                            continue;
                        }
                    }
                }
                let goal = session.input().goal.clone();
                let result = session.submit()?.clone();
                writeln!(out)?;
                write_summary(out, &goal, &result)?;
                return Ok(result);
            }
            _ => session.set_field(step, answer),
        }

        if step == WizardStep::Duration && duration_over_cap(&session) {
            writeln!(out, "Duration must be at most {MAX_DURATION_YEARS} years.")?;
            continue;
        }

        if let Err(err) = session.try_advance() {
            writeln!(out, "{err}")?;
        }
    }
}

fn duration_over_cap(session: &WizardSession) -> bool {
    to_number(&session.input().duration_years) > MAX_DURATION_YEARS
}

fn preset_choice(answer: &str) -> Option<&'static str> {
    let idx = answer.trim().parse::<usize>().ok()?;
    GOAL_PRESETS.get(idx.checked_sub(1)?).copied()
}

fn write_summary<W: Write>(out: &mut W, goal: &str, result: &ProjectionResult) -> io::Result<()> {
    writeln!(out, "Plan for: {goal}")?;
    writeln!(
        out,
        "Target {:.0} in {} years, monthly savings {:.0}",
        result.target, result.duration_years, result.monthly_savings
    )?;
    writeln!(out)?;
    writeln!(out, "Projection (3 scenarios)")?;
    writeln!(
        out,
        "  conservative (6%): {:.0}\n  moderate (10%):    {:.0}\n  aggressive (14%):  {:.0}",
        result.conservative, result.moderate, result.aggressive
    )?;
    writeln!(out)?;
    writeln!(
        out,
        "{:>4} {:>14} {:>14} {:>14}",
        "year", "conservative", "moderate", "aggressive"
    )?;
    for point in &result.series {
        writeln!(
            out,
            "{:>4} {:>14.0} {:>14.0} {:>14.0}",
            point.year, point.conservative, point.moderate, point.aggressive
        )?;
    }
    writeln!(out)?;
    writeln!(out, "Investment split")?;
    for item in &result.investment_split {
        writeln!(out, "  {:<18} {:>3}%", item.label, item.percentage)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn plan_args() -> PlanArgs {
        PlanArgs {
            goal: "Buy a House".to_string(),
            target: "5,00,000".to_string(),
            duration: "10".to_string(),
            income: "80000".to_string(),
            expenses: "50000".to_string(),
            risk: CliRiskTier::Medium,
            json: false,
        }
    }

    #[test]
    fn cli_parses_plan_flags() {
        let cli = Cli::try_parse_from([
            "finler",
            "plan",
            "--goal",
            "Wedding",
            "--target",
            "1000000",
            "--duration",
            "4",
            "--income",
            "60000",
            "--expenses",
            "40000",
            "--risk",
            "high",
            "--json",
        ])
        .expect("flags should parse");
        let Command::Plan(args) = cli.command else {
            panic!("expected plan command");
        };
        assert_eq!(args.goal, "Wedding");
        assert_eq!(args.risk, CliRiskTier::High);
        assert!(args.json);
    }

    #[test]
    fn cli_parses_serve_port() {
        let cli = Cli::try_parse_from(["finler", "serve", "--port", "9001"]).expect("parse");
        assert!(matches!(cli.command, Command::Serve { port: Some(9001) }));
    }

    #[test]
    fn run_plan_prints_summary() {
        let mut out = Vec::new();
        run_plan(&plan_args(), &mut out).expect("plan should run");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("Plan for: Buy a House"));
        assert!(text.contains("monthly savings 30000"));
        assert!(text.contains("6145349"));
        assert!(text.contains("Stocks/NPS"));
    }

    #[test]
    fn run_plan_json_uses_wire_keys() {
        let mut args = plan_args();
        args.json = true;
        let mut out = Vec::new();
        run_plan(&args, &mut out).expect("plan should run");
        let value: serde_json::Value = serde_json::from_slice(&out).expect("valid json");
        assert_eq!(value["savings"], 30_000.0);
        assert_eq!(value["target"], 500_000.0);
        assert_eq!(value["projection"].as_array().map(Vec::len), Some(11));
        assert_eq!(value["investmentSplit"][1]["name"], "SIP/Mutual Funds");
    }

    #[test]
    fn run_plan_rejects_empty_numeric_flag() {
        let mut args = plan_args();
        args.income = "n/a".to_string();
        let err = run_plan(&args, &mut Vec::new()).expect_err("must reject empty income");
        assert!(err.to_string().contains("--income"));
    }

    #[test]
    fn wizard_walks_all_steps() {
        let answers = "1\n500000\n10\n80000\n50000\nmedium\n";
        let mut out = Vec::new();
        let result = run_wizard(Cursor::new(answers), &mut out).expect("wizard completes");
        assert_eq!(result.monthly_savings, 30_000.0);
        assert_eq!(result.series.len(), 11);
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("Plan for: Buy a House"));
        assert!(text.contains("Step 6 of 6 (100%)"));
    }

    #[test]
    fn wizard_reprompts_on_empty_answer_and_supports_back() {
        let answers = "Emergency Fund\n\n2oo\nback\n300000\n2\n40000\n45000\n\n";
        let mut out = Vec::new();
        let result = run_wizard(Cursor::new(answers), &mut out).expect("wizard completes");
        let text = String::from_utf8(out).expect("utf8");

        assert!(text.contains("Target step is incomplete"));
        assert_eq!(result.target, 300_000.0);
        assert_eq!(result.duration_years, 2.0);
        assert_eq!(result.monthly_savings, 0.0);
        assert_eq!(result.investment_split[0].percentage, 30);
    }

    #[test]
    fn run_plan_rejects_duration_past_max() {
        let mut args = plan_args();
        args.duration = "1000000000000".to_string();
        let err = run_plan(&args, &mut Vec::new()).expect_err("must reject huge duration");
        assert_eq!(err.to_string(), "--duration must be at most 100 years");
    }

    #[test]
    fn wizard_reasks_duration_past_max() {
        let answers = "Retirement\n900000\n10000\n30\n60000\n40000\nlow\n";
        let mut out = Vec::new();
        let result = run_wizard(Cursor::new(answers), &mut out).expect("wizard completes");
        let text = String::from_utf8(out).expect("utf8");

        assert!(text.contains("Duration must be at most 100 years."));
        assert_eq!(result.duration_years, 30.0);
        assert_eq!(result.series.len(), 31);
    }

    #[test]
    fn wizard_reports_truncated_input() {
        let err = run_wizard(Cursor::new("Wedding\n"), &mut Vec::new())
            .expect_err("must fail on early EOF");
        assert!(err.to_string().contains("input ended"));
    }

    #[test]
    fn preset_choice_maps_menu_numbers() {
        assert_eq!(preset_choice("2"), Some("Buy a Car"));
        assert_eq!(preset_choice("0"), None);
        assert_eq!(preset_choice("6"), None);
        assert_eq!(preset_choice("Trip"), None);
    }
}
