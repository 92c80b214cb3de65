//! Running state of a retirement projection

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ledger::{period_date, LedgerPhase};

/// Phase of the retirement state machine
///
/// Starts in `Accumulation` and moves to `Drawdown` exactly once, when the
/// period index reaches the retirement boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetirementPhase {
    Accumulation,
    Drawdown,
}

impl RetirementPhase {
    pub fn ledger_phase(&self) -> LedgerPhase {
        match self {
            RetirementPhase::Accumulation => LedgerPhase::Accumulation,
            RetirementPhase::Drawdown => LedgerPhase::Drawdown,
        }
    }
}

/// Balance and cumulative flows at the retirement boundary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetirementSnapshot {
    /// Last accumulation period
    pub period: u32,
    pub balance: f64,
    pub total_contributions: f64,
    pub total_earnings: f64,
}

/// State carried between periods
#[derive(Debug, Clone)]
pub struct RetirementState {
    /// Current period (1-indexed once stepping starts)
    pub period: u32,

    /// Calendar month of the current period
    pub date: NaiveDate,

    pub phase: RetirementPhase,

    /// Balance at the start of the current period
    pub balance: f64,

    /// Contributions to date, employer match included
    pub total_contributions: f64,

    /// Growth credited to date
    pub total_earnings: f64,

    start_date: NaiveDate,
}

impl RetirementState {
    pub fn new(start_balance: f64, start_date: NaiveDate) -> Self {
        Self {
            period: 0,
            date: start_date,
            phase: RetirementPhase::Accumulation,
            balance: start_balance,
            total_contributions: 0.0,
            total_earnings: 0.0,
            start_date,
        }
    }

    /// 0-based month index of the next period to be stepped
    pub fn month_index(&self) -> u32 {
        self.period
    }

    pub fn advance_month(&mut self) {
        self.period += 1;
        self.date = period_date(self.start_date, self.period);
    }

    pub fn snapshot(&self) -> RetirementSnapshot {
        RetirementSnapshot {
            period: self.period,
            balance: self.balance,
            total_contributions: self.total_contributions,
            total_earnings: self.total_earnings,
        }
    }

    /// Switch to drawdown, returning the snapshot taken at the boundary
    pub fn retire(&mut self) -> RetirementSnapshot {
        debug_assert_eq!(self.phase, RetirementPhase::Accumulation);
        self.phase = RetirementPhase::Drawdown;
        self.snapshot()
    }
}
