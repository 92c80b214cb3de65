//! Level payment (principal and interest) formula

use serde::{Deserialize, Serialize};

/// Monthly loan rate as a fraction: APR percent / 100 / 12
pub fn monthly_loan_rate(apr_pct: f64) -> f64 {
    apr_pct / 100.0 / 12.0
}

/// Level monthly payment that fully amortizes `principal` over `term_months`.
///
/// Zero APR falls back to straight-line repayment. A zero term returns 0.
/// When `(1 + r)^n` overflows the payment is the interest-only limit.
pub fn level_payment(principal: f64, apr_pct: f64, term_months: u32) -> f64 {
    if term_months == 0 {
        return 0.0;
    }
    let r = monthly_loan_rate(apr_pct);
    if r == 0.0 {
        return principal / term_months as f64;
    }
    let a = match i32::try_from(term_months) {
        Ok(n) => (1.0 + r).powi(n),
        Err(_) => f64::INFINITY,
    };
    if a.is_infinite() {
        return principal * r;
    }
    principal * (r * a) / (a - 1.0)
}

/// Level payment at APR - 1, APR and APR + 1 percentage points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaymentSensitivity {
    pub rate_down_one: f64,
    pub base: f64,
    pub rate_up_one: f64,
}

impl PaymentSensitivity {
    /// The lower rate is floored at zero
    pub fn new(principal: f64, apr_pct: f64, term_months: u32) -> Self {
        Self {
            rate_down_one: level_payment(principal, (apr_pct - 1.0).max(0.0), term_months),
            base: level_payment(principal, apr_pct, term_months),
            rate_up_one: level_payment(principal, apr_pct + 1.0, term_months),
        }
    }
}
