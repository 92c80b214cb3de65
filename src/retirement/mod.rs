//! Retirement calculator: accumulation until retirement age, then drawdown
//!
//! One state machine steps a single balance through both phases. Drawdown
//! income is either a target in today's money or a percentage of the
//! balance, offset by an optional pension or social security supplement.
//! The run stops early when the fund is depleted.

mod engine;
mod state;

pub use engine::{DrawdownRule, RetirementEngine, RetirementRun, RetirementTerms, SupplementSchedule};
pub use state::{RetirementPhase, RetirementSnapshot, RetirementState};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{non_negative, SimulationError, SimulationResult};
use crate::ledger::{check_horizon, current_month_start, month_start, Ledger, Milestones, RunTotals};
use crate::rates::{monthly_effective_rate, monthly_inflation_factor, Compounding};

/// How drawdown income is sized
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WithdrawalPolicy {
    /// Monthly income goal in today's money
    TargetIncome { monthly_income_today: f64 },
    /// Yearly percentage of the balance, taken monthly
    WithdrawalRate { annual_pct: f64 },
}

/// Pension or social security income that reduces what the fund must pay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IncomeSupplement {
    pub start_age: u32,
    pub monthly_amount_today: f64,
}

/// Retirement calculator inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetirementInput {
    pub current_age: u32,
    pub retirement_age: u32,
    pub end_age: u32,
    pub start_balance: f64,
    pub monthly_contribution: f64,
    pub contribution_increase_pct: f64,
    pub employer_match_monthly: f64,
    pub pre_retirement_apr_pct: f64,
    pub post_retirement_apr_pct: f64,
    pub compounding: Compounding,
    pub inflation_pct: f64,
    pub withdrawal: WithdrawalPolicy,
    pub income_supplement: Option<IncomeSupplement>,
    pub start_date: NaiveDate,
}

impl Default for RetirementInput {
    fn default() -> Self {
        Self {
            current_age: 35,
            retirement_age: 67,
            end_age: 95,
            start_balance: 80_000.0,
            monthly_contribution: 800.0,
            contribution_increase_pct: 2.0,
            employer_match_monthly: 0.0,
            pre_retirement_apr_pct: 7.0,
            post_retirement_apr_pct: 5.0,
            compounding: Compounding::Monthly,
            inflation_pct: 0.0,
            withdrawal: WithdrawalPolicy::TargetIncome { monthly_income_today: 4_000.0 },
            income_supplement: None,
            start_date: current_month_start(),
        }
    }
}

impl RetirementInput {
    pub fn validate(&self) -> SimulationResult<RetirementTerms> {
        let (current, retire, end) = (self.current_age, self.retirement_age, self.end_age);
        if !(current < retire && retire < end) {
            return Err(SimulationError::AgeOrder { current, retire, end });
        }
        let start_date = month_start(self.start_date);
        let horizon_error = || SimulationError::HorizonOutOfRange { start: start_date, months: u32::MAX };
        let accumulation_months = (retire - current).checked_mul(12).ok_or_else(horizon_error)?;
        let drawdown_months = (end - retire).checked_mul(12).ok_or_else(horizon_error)?;
        let total = accumulation_months.checked_add(drawdown_months).ok_or_else(horizon_error)?;
        check_horizon(start_date, total)?;

        let rule = match self.withdrawal {
            WithdrawalPolicy::TargetIncome { monthly_income_today } => DrawdownRule::TargetIncome {
                monthly_today: non_negative("withdrawal.monthly_income_today", monthly_income_today)?,
            },
            WithdrawalPolicy::WithdrawalRate { annual_pct } => DrawdownRule::BalanceFraction {
                monthly_rate: non_negative("withdrawal.annual_pct", annual_pct)? / 100.0 / 12.0,
            },
        };

        let supplement = match self.income_supplement {
            Some(s) => Some(SupplementSchedule {
                start_index: s.start_age.saturating_sub(current).saturating_mul(12),
                monthly_today: non_negative("income_supplement.monthly_amount_today", s.monthly_amount_today)?,
            }),
            None => None,
        };

        Ok(RetirementTerms {
            start_balance: non_negative("start_balance", self.start_balance)?,
            monthly_contribution: non_negative("monthly_contribution", self.monthly_contribution)?,
            contribution_increase_pct: non_negative("contribution_increase_pct", self.contribution_increase_pct)?,
            employer_match: non_negative("employer_match_monthly", self.employer_match_monthly)?,
            pre_retirement_rate: monthly_effective_rate(
                non_negative("pre_retirement_apr_pct", self.pre_retirement_apr_pct)?,
                self.compounding,
            ),
            post_retirement_rate: monthly_effective_rate(
                non_negative("post_retirement_apr_pct", self.post_retirement_apr_pct)?,
                self.compounding,
            ),
            inflation_factor: monthly_inflation_factor(non_negative("inflation_pct", self.inflation_pct)?),
            accumulation_months,
            drawdown_months,
            rule,
            supplement,
            start_date,
        })
    }
}

/// Retirement calculator output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetirementResult {
    pub accumulation_months: u32,
    pub drawdown_months: u32,
    pub at_retirement: RetirementSnapshot,
    pub ledger: Ledger,
    pub totals: RunTotals,
    pub milestones: Milestones,
}

impl RetirementResult {
    /// True when the fund lasts until the end age
    pub fn sustainable(&self) -> bool {
        self.milestones.depletion.is_none()
    }
}

/// Run the retirement projection
pub fn simulate(input: &RetirementInput) -> SimulationResult<RetirementResult> {
    let terms = input.validate()?;
    let (accumulation_months, drawdown_months) = (terms.accumulation_months, terms.drawdown_months);
    let run = RetirementEngine::new(terms).run();

    Ok(RetirementResult {
        accumulation_months,
        drawdown_months,
        at_retirement: run.at_retirement,
        ledger: run.ledger,
        totals: run.totals,
        milestones: run.milestones,
    })
}
