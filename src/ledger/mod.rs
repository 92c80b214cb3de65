//! Ledger output shared by all engines
//!
//! A ledger is the ordered, append-only sequence of monthly entries produced
//! by one run. Totals are a pure fold over the entries and can be recomputed
//! at any time.

mod calendar;
mod entry;
mod yearly;

pub use calendar::{check_horizon, current_month_start, month_start, months_between, period_date};
pub use entry::{BalanceKind, LedgerEntry, LedgerPhase};
pub use yearly::YearlyBucket;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Balances at or below this are treated as fully paid off or depleted
pub const BALANCE_EPSILON: f64 = 0.01;

/// Ordered monthly entries for one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    pub kind: BalanceKind,
    entries: Vec<LedgerEntry>,
}

impl Ledger {
    pub fn new(kind: BalanceKind) -> Self {
        Self { kind, entries: Vec::new() }
    }

    pub fn with_capacity(kind: BalanceKind, capacity: usize) -> Self {
        Self { kind, entries: Vec::with_capacity(capacity) }
    }

    /// Append the next period's entry
    pub(crate) fn push(&mut self, entry: LedgerEntry) {
        debug_assert_eq!(entry.period as usize, self.entries.len() + 1);
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&LedgerEntry> {
        self.entries.last()
    }

    /// Fold the entries into run totals
    pub fn totals(&self) -> RunTotals {
        let mut totals = RunTotals::default();
        for e in &self.entries {
            totals.total_interest += e.interest;
            totals.total_principal += e.principal + e.extra_principal;
            totals.total_extra_principal += e.extra_principal;
            totals.total_contributions += e.contribution;
            totals.total_employer_match += e.employer_match;
            totals.total_withdrawals += e.withdrawal;
            totals.total_income_supplement += e.income_supplement;
            totals.total_fees += e.fees;
            totals.total_escrow += e.escrow;
            totals.total_mortgage_insurance += e.mortgage_insurance;
            totals.total_cash_flow += e.total_cash_flow;
        }
        totals.periods = self.entries.len() as u32;
        totals.final_balance = self.entries.last().map(|e| e.ending_balance).unwrap_or(0.0);
        totals.final_real_balance = self.entries.last().map(|e| e.real_balance).unwrap_or(0.0);
        totals
    }

    /// First period whose ending balance is zero
    pub fn first_zero_balance(&self) -> Option<Milestone> {
        self.entries
            .iter()
            .find(|e| e.ending_balance <= 0.0)
            .map(Milestone::from_entry)
    }

    /// First period that fails the balance identity or chaining, if any
    pub fn first_inconsistency(&self, tolerance: f64) -> Option<u32> {
        let mut previous_ending: Option<f64> = None;
        for e in &self.entries {
            if let Some(prev) = previous_ending {
                if (prev - e.beginning_balance).abs() > tolerance {
                    return Some(e.period);
                }
            }
            if e.ending_balance < 0.0
                || (e.rolled_forward(self.kind) - e.ending_balance).abs() > tolerance
            {
                return Some(e.period);
            }
            previous_ending = Some(e.ending_balance);
        }
        None
    }

    /// Aggregate monthly entries into calendar-year buckets
    pub fn yearly(&self) -> Vec<YearlyBucket> {
        yearly::aggregate(&self.entries)
    }
}

/// Cumulative sums over a ledger
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunTotals {
    pub periods: u32,
    pub total_interest: f64,
    /// Scheduled plus extra principal
    pub total_principal: f64,
    pub total_extra_principal: f64,
    pub total_contributions: f64,
    pub total_employer_match: f64,
    pub total_withdrawals: f64,
    pub total_income_supplement: f64,
    pub total_fees: f64,
    pub total_escrow: f64,
    pub total_mortgage_insurance: f64,
    pub total_cash_flow: f64,
    pub final_balance: f64,
    pub final_real_balance: f64,
}

/// A single-period marker derived from the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub period: u32,
    pub date: NaiveDate,
}

impl Milestone {
    pub fn from_entry(entry: &LedgerEntry) -> Self {
        Self { period: entry.period, date: entry.date }
    }
}

/// Milestones reached during a run; `None` means not reached within the horizon
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestones {
    pub payoff: Option<Milestone>,
    pub pmi_cancellation: Option<Milestone>,
    pub depletion: Option<Milestone>,
}
