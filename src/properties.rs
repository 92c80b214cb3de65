//! Ledger invariants checked over randomized valid inputs

use chrono::NaiveDate;
use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

use crate::amortization::{loan, mortgage, DownPayment, HousingCost, LoanInput, MortgageInput};
use crate::growth::{self, CompoundInput, ContributionFrequency};
use crate::ledger::Ledger;
use crate::rates::Compounding;
use crate::retirement::{self, IncomeSupplement, RetirementInput, WithdrawalPolicy};

const TOL: f64 = 1e-6;

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
}

/// Chaining, balance identity, non-negativity and the inflow bound
fn check_ledger(ledger: &Ledger) -> Result<(), String> {
    if let Some(period) = ledger.first_inconsistency(TOL) {
        return Err(format!("ledger inconsistent at period {period}"));
    }
    for e in ledger.entries() {
        if e.ending_balance < 0.0 {
            return Err(format!("negative balance at period {}", e.period));
        }
        if e.ending_balance > e.beginning_balance + e.inflows(ledger.kind) + TOL {
            return Err(format!("balance grew beyond inflows at period {}", e.period));
        }
    }
    Ok(())
}

fn compounding(index: u8) -> Compounding {
    match index % 4 {
        0 => Compounding::Monthly,
        1 => Compounding::Quarterly,
        2 => Compounding::Annual,
        _ => Compounding::Daily,
    }
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(32))]

    #[test]
    fn prop_mortgage_ledger_is_consistent(
        price in 50_000u32..2_000_000,
        down_pct in 0u32..101,
        apr_bp in 0u32..1500,
        term_years in 1u32..41,
        pmi_bp in 0u32..150,
        extra in 0u32..3_000,
    ) {
        let input = MortgageInput {
            price: price as f64,
            down_payment: DownPayment::Percent(down_pct as f64),
            apr_pct: apr_bp as f64 / 100.0,
            term_years: term_years as f64,
            property_tax: HousingCost::PercentOfPrice(1.0),
            home_insurance: HousingCost::Annual(1_200.0),
            hoa: HousingCost::Monthly(0.0),
            pmi_rate_pct: pmi_bp as f64 / 100.0,
            extra_monthly: extra as f64,
            one_time_extra: None,
            start_date: start(),
        };
        let result = mortgage::simulate(&input).unwrap();
        prop_assert_eq!(check_ledger(&result.ledger), Ok(()));
        prop_assert!(result.ledger.len() as u32 <= term_years * 12);
        prop_assert_eq!(&result.totals, &result.ledger.totals());
        if !result.ledger.is_empty() {
            prop_assert!(result.milestones.payoff.is_some());
        }
    }

    #[test]
    fn prop_loan_extras_never_cost_more(
        amount in 1_000u32..200_000,
        apr_bp in 0u32..3000,
        term_years in 1u32..16,
        extra in 0u32..2_000,
    ) {
        let input = LoanInput {
            amount: amount as f64,
            apr_pct: apr_bp as f64 / 100.0,
            term_years: term_years as f64,
            extra_monthly: extra as f64,
            one_time_extra: None,
            monthly_fees: 0.0,
            start_date: start(),
        };
        let result = loan::simulate(&input).unwrap();
        prop_assert_eq!(check_ledger(&result.ledger), Ok(()));
        prop_assert!(result.totals.periods <= result.baseline_totals.periods);
        prop_assert!(result.savings.interest_saved >= 0.0);
        prop_assert_eq!(result, loan::simulate(&input).unwrap());
    }

    #[test]
    fn prop_compound_identity_holds(
        principal in 0u32..500_000,
        contribution in 0u32..5_000,
        annual in 0u8..2,
        apr_bp in 0u32..1500,
        comp in 0u8..4,
        years in 1u32..41,
        increase_bp in 0u32..1000,
        inflation_bp in 0u32..800,
    ) {
        let input = CompoundInput {
            principal: principal as f64,
            contribution: contribution as f64,
            contribution_frequency: if annual == 1 { ContributionFrequency::Annual } else { ContributionFrequency::Monthly },
            contribution_increase_pct: increase_bp as f64 / 100.0,
            apr_pct: apr_bp as f64 / 100.0,
            compounding: compounding(comp),
            years: years as f64,
            inflation_pct: inflation_bp as f64 / 100.0,
            start_date: start(),
        };
        let result = growth::simulate(&input).unwrap();
        let t = &result.totals;
        prop_assert_eq!(check_ledger(&result.ledger), Ok(()));
        prop_assert_eq!(t.periods, years * 12);
        let expected = principal as f64 + t.total_contributions + t.total_interest;
        prop_assert!((t.final_balance - expected).abs() <= 1e-9 * expected.max(1.0));
        prop_assert!(t.final_real_balance <= t.final_balance + TOL);
        prop_assert_eq!(&result, &growth::simulate(&input).unwrap());
    }

    #[test]
    fn prop_retirement_ledger_is_consistent(
        current_age in 20u32..60,
        working_years in 1u32..30,
        retired_years in 1u32..35,
        start_balance in 0u32..1_000_000,
        contribution in 0u32..3_000,
        pre_bp in 0u32..1200,
        post_bp in 0u32..900,
        inflation_bp in 0u32..500,
        target in 0u32..15_000,
        rate_mode in 0u8..2,
        supplement in 0u32..3_000,
    ) {
        let retirement_age = current_age + working_years;
        let withdrawal = if rate_mode == 1 {
            WithdrawalPolicy::WithdrawalRate { annual_pct: target as f64 / 1_000.0 }
        } else {
            WithdrawalPolicy::TargetIncome { monthly_income_today: target as f64 }
        };
        let input = RetirementInput {
            current_age,
            retirement_age,
            end_age: retirement_age + retired_years,
            start_balance: start_balance as f64,
            monthly_contribution: contribution as f64,
            contribution_increase_pct: 1.0,
            employer_match_monthly: 0.0,
            pre_retirement_apr_pct: pre_bp as f64 / 100.0,
            post_retirement_apr_pct: post_bp as f64 / 100.0,
            compounding: Compounding::Monthly,
            inflation_pct: inflation_bp as f64 / 100.0,
            withdrawal,
            income_supplement: Some(IncomeSupplement {
                start_age: retirement_age,
                monthly_amount_today: supplement as f64,
            }),
            start_date: start(),
        };
        let result = retirement::simulate(&input).unwrap();
        prop_assert_eq!(check_ledger(&result.ledger), Ok(()));
        prop_assert_eq!(result.at_retirement.period, working_years * 12);

        let expected_len = match result.milestones.depletion {
            Some(m) => m.period,
            None => (working_years + retired_years) * 12,
        };
        prop_assert_eq!(result.ledger.len() as u32, expected_len);
        prop_assert!(result.ledger.entries().iter().all(|e| e.withdrawal >= 0.0));
        prop_assert_eq!(&result, &retirement::simulate(&input).unwrap());
    }
}
