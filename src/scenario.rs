//! Scenario files and the batch runner
//!
//! A scenario is one calculator input tagged by `calculator`. A scenario file
//! holds either a single scenario object or an array of them; omitted fields
//! take the calculator defaults.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::amortization::{loan, mortgage, LoanInput, LoanResult, MortgageInput, MortgageResult};
use crate::error::{ScenarioError, SimulationResult};
use crate::growth::{self, CompoundInput, CompoundResult};
use crate::ledger::{Ledger, Milestone, Milestones, RunTotals};
use crate::retirement::{self, RetirementInput, RetirementResult};

/// The four calculators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Calculator {
    Mortgage,
    Loan,
    Compound,
    Retirement,
}

impl Calculator {
    pub fn name(&self) -> &'static str {
        match self {
            Calculator::Mortgage => "mortgage",
            Calculator::Loan => "loan",
            Calculator::Compound => "compound",
            Calculator::Retirement => "retirement",
        }
    }
}

/// One calculator input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "calculator", rename_all = "snake_case")]
pub enum Scenario {
    Mortgage(MortgageInput),
    Loan(LoanInput),
    Compound(CompoundInput),
    Retirement(RetirementInput),
}

impl Scenario {
    /// Scenario carrying the calculator's default inputs
    pub fn template(calculator: Calculator) -> Self {
        match calculator {
            Calculator::Mortgage => Scenario::Mortgage(MortgageInput::default()),
            Calculator::Loan => Scenario::Loan(LoanInput::default()),
            Calculator::Compound => Scenario::Compound(CompoundInput::default()),
            Calculator::Retirement => Scenario::Retirement(RetirementInput::default()),
        }
    }

    pub fn calculator(&self) -> Calculator {
        match self {
            Scenario::Mortgage(_) => Calculator::Mortgage,
            Scenario::Loan(_) => Calculator::Loan,
            Scenario::Compound(_) => Calculator::Compound,
            Scenario::Retirement(_) => Calculator::Retirement,
        }
    }

    pub fn run(&self) -> SimulationResult<ScenarioOutcome> {
        debug!("running {} scenario", self.calculator().name());
        Ok(match self {
            Scenario::Mortgage(input) => ScenarioOutcome::Mortgage(mortgage::simulate(input)?),
            Scenario::Loan(input) => ScenarioOutcome::Loan(loan::simulate(input)?),
            Scenario::Compound(input) => ScenarioOutcome::Compound(growth::simulate(input)?),
            Scenario::Retirement(input) => ScenarioOutcome::Retirement(retirement::simulate(input)?),
        })
    }
}

/// Result of running one scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "calculator", rename_all = "snake_case")]
pub enum ScenarioOutcome {
    Mortgage(MortgageResult),
    Loan(LoanResult),
    Compound(CompoundResult),
    Retirement(RetirementResult),
}

impl ScenarioOutcome {
    pub fn calculator(&self) -> Calculator {
        match self {
            ScenarioOutcome::Mortgage(_) => Calculator::Mortgage,
            ScenarioOutcome::Loan(_) => Calculator::Loan,
            ScenarioOutcome::Compound(_) => Calculator::Compound,
            ScenarioOutcome::Retirement(_) => Calculator::Retirement,
        }
    }

    pub fn ledger(&self) -> &Ledger {
        match self {
            ScenarioOutcome::Mortgage(r) => &r.ledger,
            ScenarioOutcome::Loan(r) => &r.ledger,
            ScenarioOutcome::Compound(r) => &r.ledger,
            ScenarioOutcome::Retirement(r) => &r.ledger,
        }
    }

    pub fn totals(&self) -> &RunTotals {
        match self {
            ScenarioOutcome::Mortgage(r) => &r.totals,
            ScenarioOutcome::Loan(r) => &r.totals,
            ScenarioOutcome::Compound(r) => &r.totals,
            ScenarioOutcome::Retirement(r) => &r.totals,
        }
    }

    pub fn milestones(&self) -> &Milestones {
        match self {
            ScenarioOutcome::Mortgage(r) => &r.milestones,
            ScenarioOutcome::Loan(r) => &r.milestones,
            ScenarioOutcome::Compound(r) => &r.milestones,
            ScenarioOutcome::Retirement(r) => &r.milestones,
        }
    }

    /// The milestone that ends the run early, if any
    pub fn terminal_milestone(&self) -> Option<Milestone> {
        let m = self.milestones();
        m.payoff.or(m.depletion)
    }

    /// One-line summary for tables and CSV output
    pub fn summary(&self) -> ScenarioSummary {
        let totals = self.totals();
        let terminal = self.terminal_milestone();
        ScenarioSummary {
            calculator: self.calculator(),
            periods: totals.periods,
            total_interest: totals.total_interest,
            total_contributions: totals.total_contributions,
            total_withdrawals: totals.total_withdrawals,
            total_cash_flow: totals.total_cash_flow,
            final_balance: totals.final_balance,
            final_real_balance: totals.final_real_balance,
            terminal_period: terminal.map(|m| m.period),
            terminal_date: terminal.map(|m| m.date),
        }
    }
}

/// Flat summary of one outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub calculator: Calculator,
    pub periods: u32,
    pub total_interest: f64,
    pub total_contributions: f64,
    pub total_withdrawals: f64,
    pub total_cash_flow: f64,
    pub final_balance: f64,
    pub final_real_balance: f64,
    /// Payoff or depletion period
    pub terminal_period: Option<u32>,
    pub terminal_date: Option<chrono::NaiveDate>,
}

/// Parse a scenario document: one object or an array of objects
pub fn parse_scenarios(json: &str) -> Result<Vec<Scenario>, ScenarioError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    scenarios_from_value(value)
}

fn scenarios_from_value(value: serde_json::Value) -> Result<Vec<Scenario>, ScenarioError> {
    if value.is_array() {
        Ok(serde_json::from_value(value)?)
    } else {
        Ok(vec![serde_json::from_value(value)?])
    }
}

/// Batch of scenarios loaded once and run in parallel
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::from_json_path("scenarios.json")?;
/// for outcome in runner.run_batch() {
///     println!("{:?}", outcome?.summary());
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    scenarios: Vec<Scenario>,
}

impl ScenarioRunner {
    pub fn new(scenarios: Vec<Scenario>) -> Self {
        Self { scenarios }
    }

    /// Load scenarios from a JSON file
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let file = File::open(path.as_ref())?;
        let runner = Self::from_reader(BufReader::new(file))?;
        info!("loaded {} scenarios from {}", runner.len(), path.as_ref().display());
        Ok(runner)
    }

    /// Load scenarios from any reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ScenarioError> {
        let value: serde_json::Value = serde_json::from_reader(reader)?;
        Ok(Self::new(scenarios_from_value(value)?))
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// Run every loaded scenario in parallel, results in input order
    pub fn run_batch(&self) -> Vec<SimulationResult<ScenarioOutcome>> {
        debug!("running batch of {} scenarios", self.scenarios.len());
        self.scenarios.par_iter().map(Scenario::run).collect()
    }
}
