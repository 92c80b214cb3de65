//! Rate primitives shared by every engine
//!
//! All engines step in fixed monthly periods. Annual nominal rates are
//! converted here so that every calculator sees identical per-period rates.

mod conversion;
mod payment;

pub use conversion::{monthly_effective_rate, monthly_inflation_factor, Compounding};
pub use payment::{level_payment, monthly_loan_rate, PaymentSensitivity};
