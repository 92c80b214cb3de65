//! Loan amortization: shared stepping engine plus the mortgage and loan calculators

mod engine;
mod state;
mod terms;
pub mod loan;
pub mod mortgage;

pub use engine::{AmortizationEngine, AmortizationRun};
pub use state::AmortizationState;
pub use terms::{AmortizationTerms, ExtraTiming, OneTimeExtra, PmiOverlay, ScheduledExtra};
pub use loan::{LoanInput, LoanResult, LoanSavings};
pub use mortgage::{DownPayment, HousingCost, MortgageInput, MortgagePayment, MortgageResult, PMI_LTV_CUTOFF};
