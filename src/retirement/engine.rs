//! Retirement accumulation and drawdown stepping

use chrono::NaiveDate;
use log::debug;

use super::state::{RetirementPhase, RetirementSnapshot, RetirementState};
use crate::growth::stepped_contribution;
use crate::ledger::{
    BalanceKind, Ledger, LedgerEntry, LedgerPhase, Milestone, Milestones, RunTotals,
    BALANCE_EPSILON,
};

/// How the monthly drawdown amount is set, in resolved monthly units
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawdownRule {
    /// Income target in today's money, inflated each month
    TargetIncome { monthly_today: f64 },
    /// Monthly fraction of the current balance
    BalanceFraction { monthly_rate: f64 },
}

/// Income supplement resolved to the month index where it begins
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SupplementSchedule {
    pub start_index: u32,
    pub monthly_today: f64,
}

/// Validated retirement parameters in per-month units
#[derive(Debug, Clone, PartialEq)]
pub struct RetirementTerms {
    pub start_balance: f64,
    pub monthly_contribution: f64,
    pub contribution_increase_pct: f64,
    pub employer_match: f64,
    pub pre_retirement_rate: f64,
    pub post_retirement_rate: f64,
    pub inflation_factor: f64,
    pub accumulation_months: u32,
    pub drawdown_months: u32,
    pub rule: DrawdownRule,
    pub supplement: Option<SupplementSchedule>,
    pub start_date: NaiveDate,
}

impl RetirementTerms {
    pub fn total_months(&self) -> u32 {
        self.accumulation_months + self.drawdown_months
    }
}

/// Output of one retirement run
#[derive(Debug, Clone, PartialEq)]
pub struct RetirementRun {
    pub at_retirement: RetirementSnapshot,
    pub ledger: Ledger,
    pub totals: RunTotals,
    pub milestones: Milestones,
}

pub struct RetirementEngine {
    terms: RetirementTerms,
}

impl RetirementEngine {
    pub fn new(terms: RetirementTerms) -> Self {
        Self { terms }
    }

    pub fn run(&self) -> RetirementRun {
        let t = &self.terms;
        let total_months = t.total_months();
        let mut ledger = Ledger::with_capacity(BalanceKind::Asset, total_months as usize);
        let mut state = RetirementState::new(t.start_balance, t.start_date);
        let mut at_retirement: Option<RetirementSnapshot> = None;
        let mut depletion: Option<Milestone> = None;

        debug!(
            "retirement start: balance={:.2} accumulation={} drawdown={}",
            t.start_balance, t.accumulation_months, t.drawdown_months
        );

        while state.period < total_months {
            if state.phase == RetirementPhase::Accumulation
                && state.month_index() == t.accumulation_months
            {
                let snapshot = state.retire();
                debug!(
                    "retired after period {} with balance {:.2}",
                    snapshot.period, snapshot.balance
                );
                at_retirement = Some(snapshot);
            }

            let index = state.month_index();
            state.advance_month();
            let entry = match state.phase {
                RetirementPhase::Accumulation => self.accumulate(index, &mut state),
                RetirementPhase::Drawdown => self.draw_down(index, &mut state),
            };
            let depleted =
                state.phase == RetirementPhase::Drawdown && entry.ending_balance <= 0.0;
            if depleted {
                let milestone = Milestone::from_entry(&entry);
                debug!("fund depleted in period {} ({})", milestone.period, milestone.date);
                depletion = Some(milestone);
            }
            ledger.push(entry);
            if depleted {
                break;
            }
        }

        let at_retirement = at_retirement.unwrap_or_else(|| state.snapshot());
        let totals = ledger.totals();
        debug!(
            "retirement done: periods={} final={:.2} withdrawals={:.2}",
            totals.periods, totals.final_balance, totals.total_withdrawals
        );

        RetirementRun {
            at_retirement,
            ledger,
            totals,
            milestones: Milestones {
                payoff: None,
                pmi_cancellation: None,
                depletion,
            },
        }
    }

    /// Start-of-month deposit, then growth at the pre-retirement rate
    fn accumulate(&self, index: u32, state: &mut RetirementState) -> LedgerEntry {
        let t = &self.terms;
        let mut entry = LedgerEntry::new(state.period, state.date, LedgerPhase::Accumulation);
        entry.beginning_balance = state.balance;

        let contribution =
            stepped_contribution(t.monthly_contribution, t.contribution_increase_pct, index)
                + t.employer_match;
        let interest = (state.balance + contribution) * t.pre_retirement_rate;
        state.balance += contribution + interest;
        state.total_contributions += contribution;
        state.total_earnings += interest;

        entry.contribution = contribution;
        entry.employer_match = t.employer_match;
        entry.interest = interest;
        entry.ending_balance = state.balance;
        entry.real_balance = state.balance / self.deflator(index + 1);
        entry.total_cash_flow = contribution;
        entry
    }

    /// Start-of-month withdrawal, then growth on the remainder
    fn draw_down(&self, index: u32, state: &mut RetirementState) -> LedgerEntry {
        let t = &self.terms;
        let mut entry = LedgerEntry::new(state.period, state.date, LedgerPhase::Drawdown);
        let beginning = state.balance;
        entry.beginning_balance = beginning;

        let inflation = self.deflator(index);
        let supplement = match t.supplement {
            Some(s) if index >= s.start_index => s.monthly_today * inflation,
            _ => 0.0,
        };
        let desired = match t.rule {
            DrawdownRule::TargetIncome { monthly_today } => monthly_today * inflation - supplement,
            DrawdownRule::BalanceFraction { monthly_rate } => beginning * monthly_rate - supplement,
        }
        .max(0.0);

        let mut withdrawal = desired.min(beginning);
        let interest = (beginning - withdrawal) * t.post_retirement_rate;
        let mut ending = beginning - withdrawal + interest;

        // Dust left after the last withdrawal is paid out with it
        if ending <= BALANCE_EPSILON {
            withdrawal += ending;
            ending = 0.0;
        }
        state.balance = ending;
        state.total_earnings += interest;

        entry.interest = interest;
        entry.withdrawal = withdrawal;
        entry.income_supplement = supplement;
        entry.ending_balance = ending;
        entry.real_balance = ending / self.deflator(index + 1);
        entry.total_cash_flow = -withdrawal;
        entry
    }

    /// Cumulative inflation after `months` months
    fn deflator(&self, months: u32) -> f64 {
        if self.terms.inflation_factor == 1.0 {
            1.0
        } else {
            self.terms.inflation_factor.powi(months as i32)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn terms() -> RetirementTerms {
        RetirementTerms {
            start_balance: 10_000.0,
            monthly_contribution: 100.0,
            contribution_increase_pct: 0.0,
            employer_match: 0.0,
            pre_retirement_rate: 0.005,
            post_retirement_rate: 0.003,
            inflation_factor: 1.0,
            accumulation_months: 24,
            drawdown_months: 36,
            rule: DrawdownRule::TargetIncome { monthly_today: 100.0 },
            supplement: None,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        }
    }

    #[test]
    fn test_phases_split_at_boundary() {
        let run = RetirementEngine::new(terms()).run();
        let entries = run.ledger.entries();
        assert_eq!(entries.len(), 60);
        assert_eq!(entries[23].phase, LedgerPhase::Accumulation);
        assert_eq!(entries[24].phase, LedgerPhase::Drawdown);
        assert_eq!(run.at_retirement.period, 24);
        assert_eq!(run.at_retirement.balance, entries[23].ending_balance);
        assert!(run.milestones.depletion.is_none());
    }

    #[test]
    fn test_withdrawal_before_growth() {
        let run = RetirementEngine::new(terms()).run();
        let first_draw = &run.ledger.entries()[24];
        assert_eq!(first_draw.withdrawal, 100.0);
        assert_abs_diff_eq!(
            first_draw.interest,
            (first_draw.beginning_balance - 100.0) * 0.003,
            epsilon = 1e-9
        );
        assert_eq!(first_draw.total_cash_flow, -100.0);
    }

    #[test]
    fn test_depletion_sweeps_dust() {
        let mut t = terms();
        t.rule = DrawdownRule::TargetIncome { monthly_today: 5_000.0 };
        let run = RetirementEngine::new(t).run();
        let depletion = run.milestones.depletion.expect("fund depletes");
        let last = run.ledger.last().unwrap();

        assert_eq!(last.period, depletion.period);
        assert_eq!(last.ending_balance, 0.0);
        assert_eq!(run.ledger.first_inconsistency(1e-9), None);
    }
}
