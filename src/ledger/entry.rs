//! A single period of simulation output

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which way flows move the balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceKind {
    /// Debt: payments reduce the balance, interest is a cost
    Liability,
    /// Savings: contributions and interest grow the balance
    Asset,
}

/// Phase of the run a period belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerPhase {
    Repayment,
    Accumulation,
    Drawdown,
}

/// One row of the ledger for one month
///
/// Fields that do not apply to a calculator stay at zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    // Timing
    pub period: u32,
    pub date: NaiveDate,
    pub phase: LedgerPhase,

    pub beginning_balance: f64,

    // Inflows
    /// Total deposited, including any employer match
    pub contribution: f64,
    pub employer_match: f64,
    pub principal: f64,
    pub extra_principal: f64,

    // Growth on assets, cost on liabilities
    pub interest: f64,

    // Costs that never touch the balance
    pub fees: f64,
    pub escrow: f64,
    pub mortgage_insurance: f64,

    // Drawdown
    pub withdrawal: f64,
    pub income_supplement: f64,

    pub ending_balance: f64,
    pub real_balance: f64,

    /// Cash paid in by the owner this period (negative when cash is paid out)
    pub total_cash_flow: f64,
}

impl LedgerEntry {
    /// Create an entry with every flow at zero
    pub fn new(period: u32, date: NaiveDate, phase: LedgerPhase) -> Self {
        Self {
            period,
            date,
            phase,
            beginning_balance: 0.0,
            contribution: 0.0,
            employer_match: 0.0,
            principal: 0.0,
            extra_principal: 0.0,
            interest: 0.0,
            fees: 0.0,
            escrow: 0.0,
            mortgage_insurance: 0.0,
            withdrawal: 0.0,
            income_supplement: 0.0,
            ending_balance: 0.0,
            real_balance: 0.0,
            total_cash_flow: 0.0,
        }
    }

    /// Ending balance implied by the beginning balance and this period's flows
    pub fn rolled_forward(&self, kind: BalanceKind) -> f64 {
        match kind {
            BalanceKind::Liability => {
                self.beginning_balance - self.principal - self.extra_principal
            }
            BalanceKind::Asset => {
                self.beginning_balance + self.contribution + self.interest - self.withdrawal
            }
        }
    }

    /// Money added to the balance this period
    pub fn inflows(&self, kind: BalanceKind) -> f64 {
        match kind {
            BalanceKind::Liability => 0.0,
            BalanceKind::Asset => self.contribution + self.interest,
        }
    }
}
