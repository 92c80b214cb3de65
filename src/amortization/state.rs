//! Running state of an amortization schedule

use chrono::NaiveDate;

use super::terms::AmortizationTerms;
use crate::ledger::{period_date, Milestone};

/// Loan state between periods
#[derive(Debug, Clone)]
pub struct AmortizationState {
    /// Current period (1-indexed once stepping starts)
    pub period: u32,

    /// Calendar month of the current period
    pub date: NaiveDate,

    /// Outstanding balance at the start of the current period
    pub balance: f64,

    /// First period whose payment brought the balance to the PMI cutoff
    pub pmi_cancellation: Option<Milestone>,

    start_date: NaiveDate,
}

impl AmortizationState {
    pub fn from_terms(terms: &AmortizationTerms) -> Self {
        Self {
            period: 0,
            date: terms.start_date,
            balance: terms.principal,
            pmi_cancellation: None,
            start_date: terms.start_date,
        }
    }

    /// Advance to the next period
    pub fn advance_month(&mut self) {
        self.period += 1;
        self.date = period_date(self.start_date, self.period);
    }

    pub fn is_paid_off(&self) -> bool {
        self.balance <= 0.0
    }
}
