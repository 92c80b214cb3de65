//! Future Worth - Monthly projection engines for personal finance calculators
//!
//! This library provides:
//! - Mortgage amortization with escrow, PMI and extra payments
//! - Generic loan payoff with savings against a no-extra baseline
//! - Compound interest growth with contribution step-ups and inflation
//! - Retirement accumulation and drawdown with depletion detection
//! - Scenario files, a parallel batch runner and CSV export
//!
//! Every engine takes a validated input and returns a ledger of monthly
//! entries, totals folded from that ledger, and milestones.

pub mod error;
pub mod rates;
pub mod ledger;
pub mod amortization;
pub mod growth;
pub mod retirement;
pub mod scenario;
pub mod export;

#[cfg(test)]
mod properties;

// Re-export commonly used types
pub use error::{ScenarioError, SimulationError, SimulationResult};
pub use rates::{level_payment, monthly_effective_rate, Compounding};
pub use ledger::{Ledger, LedgerEntry, Milestone, Milestones, RunTotals, YearlyBucket};
pub use amortization::{LoanInput, LoanResult, MortgageInput, MortgageResult};
pub use growth::{CompoundInput, CompoundResult};
pub use retirement::{RetirementInput, RetirementResult};
pub use scenario::{Calculator, Scenario, ScenarioOutcome, ScenarioRunner};
