//! Generic loan payoff calculator with savings against a no-extra baseline

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::engine::AmortizationEngine;
use super::terms::{AmortizationTerms, OneTimeExtra};
use crate::error::{non_negative, term_months, SimulationResult};
use crate::ledger::{check_horizon, current_month_start, month_start, Ledger, Milestone, Milestones, RunTotals};

/// Loan calculator inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanInput {
    pub amount: f64,
    pub apr_pct: f64,
    pub term_years: f64,
    pub extra_monthly: f64,
    pub one_time_extra: Option<OneTimeExtra>,
    pub monthly_fees: f64,
    pub start_date: NaiveDate,
}

impl Default for LoanInput {
    fn default() -> Self {
        Self {
            amount: 20_000.0,
            apr_pct: 9.99,
            term_years: 5.0,
            extra_monthly: 0.0,
            one_time_extra: None,
            monthly_fees: 0.0,
            start_date: current_month_start(),
        }
    }
}

/// What the extra payments buy compared with the scheduled baseline
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LoanSavings {
    pub interest_saved: f64,
    pub periods_saved: u32,
}

/// Loan calculator output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanResult {
    pub loan_amount: f64,
    /// Level principal and interest payment
    pub payment: f64,
    /// Payment plus recurring fees
    pub monthly_total: f64,
    pub ledger: Ledger,
    pub totals: RunTotals,
    pub milestones: Milestones,
    pub baseline_totals: RunTotals,
    pub baseline_payoff: Option<Milestone>,
    pub savings: LoanSavings,
}

impl LoanInput {
    pub fn validate(&self) -> SimulationResult<AmortizationTerms> {
        let amount = non_negative("amount", self.amount)?;
        let apr_pct = non_negative("apr_pct", self.apr_pct)?;
        let months = term_months("term_years", self.term_years)?;
        let extra_monthly = non_negative("extra_monthly", self.extra_monthly)?;
        let fees = non_negative("monthly_fees", self.monthly_fees)?;

        let start_date = month_start(self.start_date);
        let mut terms = AmortizationTerms::new(amount, apr_pct, months, start_date);
        check_horizon(start_date, terms.horizon())?;
        terms.extra_monthly = extra_monthly;
        terms.one_time_extra = match &self.one_time_extra {
            Some(extra) => extra.resolve(start_date)?,
            None => None,
        };
        terms.fees_monthly = fees;
        Ok(terms)
    }
}

/// Run the loan schedule and an independent baseline without extras
pub fn simulate(input: &LoanInput) -> SimulationResult<LoanResult> {
    let terms = input.validate()?;
    let baseline_terms = terms.without_extras();
    let loan_amount = terms.principal;
    let fees = terms.fees_monthly;

    let (run, baseline) = rayon::join(
        || AmortizationEngine::new(terms).run(),
        || AmortizationEngine::new(baseline_terms).run(),
    );

    let savings = LoanSavings {
        interest_saved: (baseline.totals.total_interest - run.totals.total_interest).max(0.0),
        periods_saved: baseline.totals.periods.saturating_sub(run.totals.periods),
    };

    Ok(LoanResult {
        loan_amount,
        payment: run.payment,
        monthly_total: run.payment + fees,
        ledger: run.ledger,
        totals: run.totals,
        milestones: run.milestones,
        baseline_totals: baseline.totals,
        baseline_payoff: baseline.milestones.payoff,
        savings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::ExtraTiming;
    use approx::assert_abs_diff_eq;

    fn reference_input() -> LoanInput {
        LoanInput {
            amount: 20_000.0,
            apr_pct: 9.99,
            term_years: 5.0,
            extra_monthly: 0.0,
            one_time_extra: None,
            monthly_fees: 0.0,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        }
    }

    #[test]
    fn test_no_extras_means_no_savings() {
        let result = simulate(&reference_input()).unwrap();
        assert_abs_diff_eq!(result.payment, 424.84, epsilon = 0.01);
        assert_eq!(result.ledger.len(), 60);
        assert_eq!(result.savings, LoanSavings::default());
        assert_eq!(result.totals, result.baseline_totals);
    }

    #[test]
    fn test_extra_payments_save_interest_and_time() {
        let mut input = reference_input();
        input.extra_monthly = 100.0;
        input.one_time_extra = Some(OneTimeExtra { amount: 2_000.0, timing: ExtraTiming::Period(6) });
        let result = simulate(&input).unwrap();

        assert!(result.savings.interest_saved > 0.0);
        assert!(result.savings.periods_saved > 0);
        assert_eq!(
            result.savings.periods_saved,
            result.baseline_totals.periods - result.totals.periods
        );
        assert_abs_diff_eq!(
            result.savings.interest_saved,
            result.baseline_totals.total_interest - result.totals.total_interest,
            epsilon = 1e-9
        );
        assert_eq!(result.baseline_payoff.map(|m| m.period), Some(60));
        assert_abs_diff_eq!(result.ledger.entries()[5].extra_principal, 2_100.0, epsilon = 1e-9);
        assert_eq!(result.ledger.first_inconsistency(1e-6), None);
    }

    #[test]
    fn test_one_time_extra_by_calendar_month() {
        let mut input = reference_input();
        input.one_time_extra = Some(OneTimeExtra {
            amount: 1_000.0,
            timing: ExtraTiming::Month(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()),
        });
        let result = simulate(&input).unwrap();
        let entries = result.ledger.entries();
        assert_eq!(entries[2].extra_principal, 1_000.0);
        assert_eq!(entries[1].extra_principal, 0.0);
        assert_eq!(result.totals.total_extra_principal, 1_000.0);
    }

    #[test]
    fn test_fees_flow_into_cash_but_not_balance() {
        let mut input = reference_input();
        input.monthly_fees = 10.0;
        let result = simulate(&input).unwrap();
        assert_abs_diff_eq!(result.monthly_total, result.payment + 10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(result.totals.total_fees, 600.0, epsilon = 1e-9);
        assert_eq!(result.ledger.len(), 60);
    }

    #[test]
    fn test_zero_rate_loan() {
        let mut input = reference_input();
        input.apr_pct = 0.0;
        input.amount = 6_000.0;
        input.term_years = 1.0;
        let result = simulate(&input).unwrap();
        assert_eq!(result.payment, 500.0);
        assert_eq!(result.totals.total_interest, 0.0);
        assert_eq!(result.milestones.payoff.map(|m| m.period), Some(12));
    }

    #[test]
    fn test_zero_amount_gives_empty_ledger() {
        let mut input = reference_input();
        input.amount = 0.0;
        let result = simulate(&input).unwrap();
        assert!(result.ledger.is_empty());
        assert!(result.milestones.payoff.is_none());
    }
}
