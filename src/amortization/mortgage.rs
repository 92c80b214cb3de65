//! Home mortgage calculator: amortization plus escrow and PMI

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::engine::AmortizationEngine;
use super::terms::{AmortizationTerms, OneTimeExtra, PmiOverlay};
use crate::error::{non_negative, term_months, SimulationResult};
use crate::ledger::{check_horizon, current_month_start, month_start, Ledger, Milestones, RunTotals};
use crate::rates::PaymentSensitivity;

/// Loan-to-value ratio at which mortgage insurance stops
pub const PMI_LTV_CUTOFF: f64 = 0.80;

/// Down payment as a share of price or a fixed amount
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DownPayment {
    Percent(f64),
    Amount(f64),
}

impl DownPayment {
    pub fn amount(&self, price: f64) -> SimulationResult<f64> {
        match *self {
            DownPayment::Percent(pct) => Ok(price * non_negative("down_payment.percent", pct)? / 100.0),
            DownPayment::Amount(amount) => non_negative("down_payment.amount", amount),
        }
    }
}

/// A recurring housing cost stated monthly, yearly, or as a yearly share of price
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HousingCost {
    Monthly(f64),
    Annual(f64),
    PercentOfPrice(f64),
}

impl HousingCost {
    pub fn monthly(&self, field: &'static str, price: f64) -> SimulationResult<f64> {
        match *self {
            HousingCost::Monthly(amount) => non_negative(field, amount),
            HousingCost::Annual(amount) => Ok(non_negative(field, amount)? / 12.0),
            HousingCost::PercentOfPrice(pct) => Ok(price * non_negative(field, pct)? / 100.0 / 12.0),
        }
    }
}

/// Mortgage calculator inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MortgageInput {
    pub price: f64,
    pub down_payment: DownPayment,
    pub apr_pct: f64,
    pub term_years: f64,
    pub property_tax: HousingCost,
    pub home_insurance: HousingCost,
    pub hoa: HousingCost,
    /// Annual PMI premium as a percent of the loan amount
    pub pmi_rate_pct: f64,
    pub extra_monthly: f64,
    pub one_time_extra: Option<OneTimeExtra>,
    pub start_date: NaiveDate,
}

impl Default for MortgageInput {
    fn default() -> Self {
        Self {
            price: 450_000.0,
            down_payment: DownPayment::Percent(20.0),
            apr_pct: 6.25,
            term_years: 30.0,
            property_tax: HousingCost::PercentOfPrice(1.2),
            home_insurance: HousingCost::Annual(1_600.0),
            hoa: HousingCost::Monthly(0.0),
            pmi_rate_pct: 0.0,
            extra_monthly: 0.0,
            one_time_extra: None,
            start_date: current_month_start(),
        }
    }
}

/// Components of the first month's payment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MortgagePayment {
    pub principal_and_interest: f64,
    pub property_tax: f64,
    pub home_insurance: f64,
    pub hoa: f64,
    pub mortgage_insurance: f64,
    pub total: f64,
}

/// Mortgage calculator output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortgageResult {
    pub loan_amount: f64,
    pub down_payment: f64,
    pub payment: MortgagePayment,
    pub sensitivity: PaymentSensitivity,
    pub ledger: Ledger,
    pub totals: RunTotals,
    pub milestones: Milestones,
}

/// Validated mortgage inputs
struct ResolvedMortgage {
    terms: AmortizationTerms,
    down_payment: f64,
    property_tax: f64,
    home_insurance: f64,
    hoa: f64,
}

impl MortgageInput {
    /// Validate and resolve into amortization terms plus the escrow breakdown
    fn resolve(&self) -> SimulationResult<ResolvedMortgage> {
        let price = non_negative("price", self.price)?;
        let down = self.down_payment.amount(price)?;
        let apr_pct = non_negative("apr_pct", self.apr_pct)?;
        let months = term_months("term_years", self.term_years)?;
        let tax = self.property_tax.monthly("property_tax", price)?;
        let insurance = self.home_insurance.monthly("home_insurance", price)?;
        let hoa = self.hoa.monthly("hoa", price)?;
        let pmi_rate = non_negative("pmi_rate_pct", self.pmi_rate_pct)?;
        let extra_monthly = non_negative("extra_monthly", self.extra_monthly)?;

        let start_date = month_start(self.start_date);
        let loan = (price - down).max(0.0);

        let mut terms = AmortizationTerms::new(loan, apr_pct, months, start_date);
        check_horizon(start_date, terms.horizon())?;
        terms.extra_monthly = extra_monthly;
        terms.one_time_extra = match &self.one_time_extra {
            Some(extra) => extra.resolve(start_date)?,
            None => None,
        };
        terms.escrow_monthly = tax + insurance + hoa;
        if pmi_rate > 0.0 {
            terms.pmi = Some(PmiOverlay {
                monthly_premium: pmi_rate / 100.0 * loan / 12.0,
                cutoff_balance: PMI_LTV_CUTOFF * price,
            });
        }
        Ok(ResolvedMortgage {
            terms,
            down_payment: down,
            property_tax: tax,
            home_insurance: insurance,
            hoa,
        })
    }
}

/// Run the mortgage schedule
pub fn simulate(input: &MortgageInput) -> SimulationResult<MortgageResult> {
    let ResolvedMortgage { terms, down_payment, property_tax, home_insurance, hoa } =
        input.resolve()?;
    let loan_amount = terms.principal;
    let sensitivity = PaymentSensitivity::new(loan_amount, terms.apr_pct, terms.term_months);

    let run = AmortizationEngine::new(terms).run();

    let first_pmi = run
        .ledger
        .entries()
        .first()
        .map(|e| e.mortgage_insurance)
        .unwrap_or(0.0);
    let payment = MortgagePayment {
        principal_and_interest: run.payment,
        property_tax,
        home_insurance,
        hoa,
        mortgage_insurance: first_pmi,
        total: run.payment + property_tax + home_insurance + hoa + first_pmi,
    };

    Ok(MortgageResult {
        loan_amount,
        down_payment,
        payment,
        sensitivity,
        ledger: run.ledger,
        totals: run.totals,
        milestones: run.milestones,
    })
}
