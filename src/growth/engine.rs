//! Monthly compound growth stepping

use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::ledger::{period_date, BalanceKind, Ledger, LedgerEntry, LedgerPhase, RunTotals};

/// How often the recurring contribution is deposited
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionFrequency {
    #[default]
    Monthly,
    /// Once per 12-period block, in its first period
    Annual,
}

impl ContributionFrequency {
    pub fn contributes_in(&self, index: u32) -> bool {
        match self {
            ContributionFrequency::Monthly => true,
            ContributionFrequency::Annual => index % 12 == 0,
        }
    }
}

/// Contribution for 0-based month `index` after yearly step-ups
pub fn stepped_contribution(base: f64, increase_pct: f64, index: u32) -> f64 {
    if base == 0.0 || increase_pct == 0.0 {
        return base;
    }
    base * (1.0 + increase_pct / 100.0).powi((index / 12) as i32)
}

/// Validated growth parameters in per-month units
#[derive(Debug, Clone, PartialEq)]
pub struct GrowthTerms {
    pub principal: f64,
    pub contribution: f64,
    pub frequency: ContributionFrequency,
    pub contribution_increase_pct: f64,
    /// Monthly effective growth rate
    pub monthly_rate: f64,
    /// Monthly inflation factor (1.0 when inflation is off)
    pub inflation_factor: f64,
    pub months: u32,
    pub start_date: NaiveDate,
}

/// Running balance between periods
#[derive(Debug, Clone)]
struct GrowthState {
    period: u32,
    date: NaiveDate,
    balance: f64,
    deflator: f64,
}

impl GrowthState {
    fn advance_month(&mut self, start: NaiveDate, inflation_factor: f64) {
        self.period += 1;
        self.date = period_date(start, self.period);
        self.deflator *= inflation_factor;
    }
}

/// Output of one growth run
#[derive(Debug, Clone, PartialEq)]
pub struct GrowthRun {
    pub ledger: Ledger,
    pub totals: RunTotals,
}

pub struct GrowthEngine {
    terms: GrowthTerms,
}

impl GrowthEngine {
    pub fn new(terms: GrowthTerms) -> Self {
        Self { terms }
    }

    pub fn run(&self) -> GrowthRun {
        let t = &self.terms;
        let mut ledger = Ledger::with_capacity(BalanceKind::Asset, t.months as usize);
        let mut state = GrowthState {
            period: 0,
            date: t.start_date,
            balance: t.principal,
            deflator: 1.0,
        };

        debug!(
            "growth start: principal={:.2} contribution={:.2} rate={:.6} months={}",
            t.principal, t.contribution, t.monthly_rate, t.months
        );

        while state.period < t.months {
            let index = state.period;
            state.advance_month(t.start_date, t.inflation_factor);

            let mut entry = LedgerEntry::new(state.period, state.date, LedgerPhase::Accumulation);
            entry.beginning_balance = state.balance;

            let contribution = if t.frequency.contributes_in(index) {
                stepped_contribution(t.contribution, t.contribution_increase_pct, index)
            } else {
                0.0
            };
            let interest = (state.balance + contribution) * t.monthly_rate;
            state.balance += contribution + interest;

            entry.contribution = contribution;
            entry.interest = interest;
            entry.ending_balance = state.balance;
            entry.real_balance = state.balance / state.deflator;
            entry.total_cash_flow = contribution;
            ledger.push(entry);
        }

        let totals = ledger.totals();
        debug!(
            "growth done: final={:.2} contributions={:.2} interest={:.2}",
            totals.final_balance, totals.total_contributions, totals.total_interest
        );
        GrowthRun { ledger, totals }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn terms() -> GrowthTerms {
        GrowthTerms {
            principal: 1_000.0,
            contribution: 100.0,
            frequency: ContributionFrequency::Monthly,
            contribution_increase_pct: 0.0,
            monthly_rate: 0.01,
            inflation_factor: 1.0,
            months: 24,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        }
    }

    #[test]
    fn test_contribution_lands_before_interest() {
        let run = GrowthEngine::new(terms()).run();
        let first = &run.ledger.entries()[0];
        assert_abs_diff_eq!(first.interest, 11.0, epsilon = 1e-12);
        assert_abs_diff_eq!(first.ending_balance, 1_111.0, epsilon = 1e-12);
    }

    #[test]
    fn test_stepped_contribution() {
        assert_eq!(stepped_contribution(100.0, 10.0, 0), 100.0);
        assert_eq!(stepped_contribution(100.0, 10.0, 11), 100.0);
        assert_abs_diff_eq!(stepped_contribution(100.0, 10.0, 12), 110.0, epsilon = 1e-9);
        assert_abs_diff_eq!(stepped_contribution(100.0, 10.0, 30), 121.0, epsilon = 1e-9);
        assert_eq!(stepped_contribution(0.0, 10.0, 30), 0.0);
    }

    #[test]
    fn test_zero_months_is_empty() {
        let mut t = terms();
        t.months = 0;
        let run = GrowthEngine::new(t).run();
        assert!(run.ledger.is_empty());
        assert_eq!(run.totals, RunTotals::default());
    }

    #[test]
    fn test_deflator_compounds_per_period() {
        let mut t = terms();
        t.inflation_factor = 1.002;
        let run = GrowthEngine::new(t).run();
        for e in run.ledger.entries() {
            let expected = e.ending_balance / 1.002f64.powi(e.period as i32);
            assert_abs_diff_eq!(e.real_balance, expected, epsilon = 1e-6);
        }
    }
}
