//! Compound interest growth calculator
//!
//! Start-of-period contributions with optional yearly step-ups, growth at a
//! monthly effective rate derived from any compounding frequency, and a real
//! (inflation-adjusted) balance series alongside the nominal one.

mod engine;

pub use engine::{stepped_contribution, ContributionFrequency, GrowthEngine, GrowthRun, GrowthTerms};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{non_negative, term_months, SimulationResult};
use crate::ledger::{check_horizon, current_month_start, month_start, Ledger, Milestones, RunTotals};
use crate::rates::{monthly_effective_rate, monthly_inflation_factor, Compounding};

/// Compound growth calculator inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompoundInput {
    pub principal: f64,
    /// Amount deposited per contribution
    pub contribution: f64,
    pub contribution_frequency: ContributionFrequency,
    /// Yearly step-up applied to the contribution, percent
    pub contribution_increase_pct: f64,
    pub apr_pct: f64,
    pub compounding: Compounding,
    pub years: f64,
    pub inflation_pct: f64,
    pub start_date: NaiveDate,
}

impl Default for CompoundInput {
    fn default() -> Self {
        Self {
            principal: 10_000.0,
            contribution: 500.0,
            contribution_frequency: ContributionFrequency::Monthly,
            contribution_increase_pct: 0.0,
            apr_pct: 7.0,
            compounding: Compounding::Monthly,
            years: 20.0,
            inflation_pct: 0.0,
            start_date: current_month_start(),
        }
    }
}

impl CompoundInput {
    pub fn validate(&self) -> SimulationResult<GrowthTerms> {
        let principal = non_negative("principal", self.principal)?;
        let contribution = non_negative("contribution", self.contribution)?;
        let increase = non_negative("contribution_increase_pct", self.contribution_increase_pct)?;
        let apr_pct = non_negative("apr_pct", self.apr_pct)?;
        let inflation = non_negative("inflation_pct", self.inflation_pct)?;
        let months = term_months("years", self.years)?;
        let start_date = month_start(self.start_date);
        check_horizon(start_date, months)?;

        Ok(GrowthTerms {
            principal,
            contribution,
            frequency: self.contribution_frequency,
            contribution_increase_pct: increase,
            monthly_rate: monthly_effective_rate(apr_pct, self.compounding),
            inflation_factor: monthly_inflation_factor(inflation),
            months,
            start_date,
        })
    }
}

/// Compound growth calculator output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundResult {
    /// Monthly effective rate the balance grew at
    pub monthly_rate: f64,
    pub ledger: Ledger,
    pub totals: RunTotals,
    pub milestones: Milestones,
}

impl CompoundResult {
    pub fn final_balance(&self) -> f64 {
        self.totals.final_balance
    }
}

/// Run the compound growth projection
pub fn simulate(input: &CompoundInput) -> SimulationResult<CompoundResult> {
    let terms = input.validate()?;
    let monthly_rate = terms.monthly_rate;
    let run = GrowthEngine::new(terms).run();

    Ok(CompoundResult {
        monthly_rate,
        ledger: run.ledger,
        totals: run.totals,
        milestones: Milestones::default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimulationError;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn reference_input() -> CompoundInput {
        CompoundInput {
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            ..CompoundInput::default()
        }
    }

    #[test]
    fn test_reference_growth_identity() {
        let result = simulate(&reference_input()).unwrap();
        let t = &result.totals;

        assert_eq!(t.periods, 240);
        assert_abs_diff_eq!(t.total_contributions, 500.0 * 240.0, epsilon = 1e-6);
        assert_relative_eq!(
            t.final_balance,
            10_000.0 + t.total_contributions + t.total_interest,
            max_relative = 1e-12
        );
        assert_eq!(t.final_real_balance, t.final_balance);
        assert_eq!(result.ledger.first_inconsistency(1e-6), None);
    }

    #[test]
    fn test_matches_annuity_due_closed_form() {
        let result = simulate(&reference_input()).unwrap();
        let f: f64 = 0.07 / 12.0;
        let growth = (1.0 + f).powi(240);
        let expected = 10_000.0 * growth + 500.0 * (growth - 1.0) / f * (1.0 + f);
        assert_relative_eq!(result.final_balance(), expected, max_relative = 1e-9);
    }

    #[test]
    fn test_annual_cadence_contributes_once_a_year() {
        let mut input = reference_input();
        input.contribution_frequency = ContributionFrequency::Annual;
        input.contribution = 6_000.0;
        input.years = 3.0;
        let result = simulate(&input).unwrap();

        let contributing: Vec<u32> = result
            .ledger
            .entries()
            .iter()
            .filter(|e| e.contribution > 0.0)
            .map(|e| e.period)
            .collect();
        assert_eq!(contributing, vec![1, 13, 25]);
        assert_abs_diff_eq!(result.totals.total_contributions, 18_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_contribution_step_up() {
        let mut input = reference_input();
        input.contribution_increase_pct = 3.0;
        input.years = 2.0;
        let result = simulate(&input).unwrap();
        let entries = result.ledger.entries();

        assert_eq!(entries[11].contribution, 500.0);
        assert_abs_diff_eq!(entries[12].contribution, 515.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.totals.total_contributions, 500.0 * 12.0 + 515.0 * 12.0, epsilon = 1e-6);
    }

    #[test]
    fn test_inflation_only_affects_real_balance() {
        let nominal = simulate(&reference_input()).unwrap();
        let mut input = reference_input();
        input.inflation_pct = 3.0;
        let inflated = simulate(&input).unwrap();

        assert_eq!(nominal.totals.final_balance, inflated.totals.final_balance);
        assert_relative_eq!(
            inflated.totals.final_real_balance,
            inflated.totals.final_balance / 1.03f64.powi(20),
            max_relative = 1e-9
        );
    }

    #[test]
    fn test_compounding_frequency_changes_rate() {
        let mut input = reference_input();
        input.compounding = Compounding::Annual;
        let annual = simulate(&input).unwrap();
        input.compounding = Compounding::Daily;
        let daily = simulate(&input).unwrap();
        assert!(daily.final_balance() > annual.final_balance());
        assert_relative_eq!((1.0 + annual.monthly_rate).powi(12), 1.07, max_relative = 1e-12);
    }

    #[test]
    fn test_zero_rate_is_sum_of_deposits() {
        let mut input = reference_input();
        input.apr_pct = 0.0;
        let result = simulate(&input).unwrap();
        assert_eq!(result.totals.total_interest, 0.0);
        assert_abs_diff_eq!(result.final_balance(), 10_000.0 + 500.0 * 240.0, epsilon = 1e-6);
    }

    #[test]
    fn test_rejects_negative_contribution() {
        let mut input = reference_input();
        input.contribution = -50.0;
        assert!(matches!(
            simulate(&input),
            Err(SimulationError::NegativeValue { field: "contribution", .. })
        ));
    }
}
