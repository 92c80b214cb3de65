//! Resolved terms for one amortization run

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{non_negative, SimulationResult};
use crate::ledger::months_between;

/// When a one-time extra payment is made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtraTiming {
    /// 1-based period index; 0 disables the payment
    Period(u32),
    /// Calendar month, counted from the start month
    Month(NaiveDate),
}

/// A single lump-sum principal payment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OneTimeExtra {
    pub amount: f64,
    pub timing: ExtraTiming,
}

impl OneTimeExtra {
    /// Resolve to a period index relative to `start`.
    ///
    /// Months before the start month and zero amounts disable the payment.
    pub fn resolve(&self, start: NaiveDate) -> SimulationResult<Option<ScheduledExtra>> {
        let amount = non_negative("one_time_extra.amount", self.amount)?;
        if amount == 0.0 {
            return Ok(None);
        }
        let period = match self.timing {
            ExtraTiming::Period(0) => None,
            ExtraTiming::Period(p) => Some(p),
            ExtraTiming::Month(date) => {
                let idx = months_between(start, date) + 1;
                u32::try_from(idx).ok().filter(|p| *p >= 1)
            }
        };
        Ok(period.map(|period| ScheduledExtra { period, amount }))
    }
}

/// A one-time extra payment pinned to a period
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledExtra {
    pub period: u32,
    pub amount: f64,
}

/// Mortgage insurance charged while the balance is above a cutoff
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PmiOverlay {
    pub monthly_premium: f64,
    /// Balance at or below which insurance is no longer charged
    pub cutoff_balance: f64,
}

/// Validated inputs for a single amortization run
#[derive(Debug, Clone, PartialEq)]
pub struct AmortizationTerms {
    pub principal: f64,
    pub apr_pct: f64,
    pub term_months: u32,
    pub start_date: NaiveDate,
    pub extra_monthly: f64,
    pub one_time_extra: Option<ScheduledExtra>,
    /// Recurring lender fees
    pub fees_monthly: f64,
    /// Property tax, homeowner insurance and HOA
    pub escrow_monthly: f64,
    pub pmi: Option<PmiOverlay>,
}

impl AmortizationTerms {
    pub fn new(principal: f64, apr_pct: f64, term_months: u32, start_date: NaiveDate) -> Self {
        Self {
            principal,
            apr_pct,
            term_months,
            start_date,
            extra_monthly: 0.0,
            one_time_extra: None,
            fees_monthly: 0.0,
            escrow_monthly: 0.0,
            pmi: None,
        }
    }

    /// Same terms with every extra payment removed
    pub fn without_extras(&self) -> Self {
        Self {
            extra_monthly: 0.0,
            one_time_extra: None,
            ..self.clone()
        }
    }

    /// Total extra principal scheduled for a period, before capping
    pub fn extra_for(&self, period: u32) -> f64 {
        let one_time = match self.one_time_extra {
            Some(extra) if extra.period == period => extra.amount,
            _ => 0.0,
        };
        self.extra_monthly + one_time
    }

    /// Iteration cap: the term plus 600 months
    pub fn horizon(&self) -> u32 {
        self.term_months.saturating_add(600)
    }
}
