//! Monthly amortization stepping shared by the mortgage and loan calculators

use log::{debug, warn};

use super::state::AmortizationState;
use super::terms::AmortizationTerms;
use crate::ledger::{
    BalanceKind, Ledger, LedgerEntry, LedgerPhase, Milestone, Milestones, RunTotals,
    BALANCE_EPSILON,
};
use crate::rates::{level_payment, monthly_loan_rate};

/// Output of one amortization run
#[derive(Debug, Clone, PartialEq)]
pub struct AmortizationRun {
    /// Level principal and interest payment
    pub payment: f64,
    pub ledger: Ledger,
    pub totals: RunTotals,
    pub milestones: Milestones,
}

impl AmortizationRun {
    /// True when the balance reached zero within the horizon
    pub fn paid_off(&self) -> bool {
        self.milestones.payoff.is_some()
    }
}

/// Amortization engine for a single set of terms
pub struct AmortizationEngine {
    terms: AmortizationTerms,
    payment: f64,
    monthly_rate: f64,
}

impl AmortizationEngine {
    pub fn new(terms: AmortizationTerms) -> Self {
        let payment = level_payment(terms.principal, terms.apr_pct, terms.term_months);
        let monthly_rate = monthly_loan_rate(terms.apr_pct);
        Self { terms, payment, monthly_rate }
    }

    /// Step until the balance is zero or the horizon is reached
    pub fn run(&self) -> AmortizationRun {
        let horizon = self.terms.horizon();
        let mut ledger = Ledger::with_capacity(BalanceKind::Liability, self.terms.term_months as usize);
        let mut state = AmortizationState::from_terms(&self.terms);

        debug!(
            "amortization start: principal={:.2} apr={}% term={} payment={:.2}",
            self.terms.principal, self.terms.apr_pct, self.terms.term_months, self.payment
        );

        while !state.is_paid_off() && state.period < horizon {
            state.advance_month();
            let entry = self.calculate_month(&mut state);
            ledger.push(entry);
        }

        if !state.is_paid_off() {
            warn!(
                "balance {:.2} not paid off within {} periods",
                state.balance, horizon
            );
        }

        let milestones = Milestones {
            payoff: ledger.first_zero_balance(),
            pmi_cancellation: state.pmi_cancellation,
            depletion: None,
        };
        let totals = ledger.totals();

        debug!(
            "amortization done: periods={} interest={:.2}",
            totals.periods, totals.total_interest
        );

        AmortizationRun {
            payment: self.payment,
            ledger,
            totals,
            milestones,
        }
    }

    /// Build the entry for the current period and move the balance
    fn calculate_month(&self, state: &mut AmortizationState) -> LedgerEntry {
        let mut entry = LedgerEntry::new(state.period, state.date, LedgerPhase::Repayment);
        let beginning = state.balance;
        entry.beginning_balance = beginning;

        let interest = beginning * self.monthly_rate;
        let mut scheduled = (self.payment - interest).max(0.0);
        let mut extra = self.terms.extra_for(state.period);

        // Extra is reduced first; scheduled principal only when it alone overpays
        if scheduled >= beginning {
            scheduled = beginning;
            extra = 0.0;
        } else {
            extra = extra.min(beginning - scheduled);
        }

        let mut ending = beginning - scheduled - extra;
        if ending < BALANCE_EPSILON {
            scheduled += ending;
            ending = 0.0;
        }

        let mortgage_insurance = match self.terms.pmi {
            Some(pmi) if beginning > pmi.cutoff_balance => {
                if state.pmi_cancellation.is_none() && ending <= pmi.cutoff_balance {
                    debug!("PMI cutoff reached in period {}", state.period);
                    state.pmi_cancellation = Some(Milestone::from_entry(&entry));
                }
                pmi.monthly_premium
            }
            _ => 0.0,
        };

        entry.interest = interest;
        entry.principal = scheduled;
        entry.extra_principal = extra;
        entry.fees = self.terms.fees_monthly;
        entry.escrow = self.terms.escrow_monthly;
        entry.mortgage_insurance = mortgage_insurance;
        entry.ending_balance = ending;
        entry.real_balance = ending;
        entry.total_cash_flow =
            scheduled + extra + interest + entry.fees + entry.escrow + mortgage_insurance;

        state.balance = ending;
        entry
    }
}
