//! Error types for simulation inputs and the scenario layer

use chrono::NaiveDate;
use thiserror::Error;

/// Result alias used by every engine entry point
pub type SimulationResult<T> = Result<T, SimulationError>;

/// Input rejected before a simulation starts
///
/// Engines never fail mid-run: once an input passes validation the run is
/// total and returns a (possibly partial) ledger.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// A monetary amount or rate is NaN or infinite
    #[error("{field} must be a finite number, got {value}")]
    NonFinite {
        field: &'static str,
        value: f64,
    },

    /// A monetary amount or rate is below zero
    #[error("{field} must not be negative, got {value}")]
    NegativeValue {
        field: &'static str,
        value: f64,
    },

    /// A term does not resolve to at least one month
    #[error("{field} must resolve to at least one month, got {value}")]
    NonPositiveTerm {
        field: &'static str,
        value: f64,
    },

    /// Retirement ages are not strictly increasing
    #[error("ages must satisfy current < retirement < end, got {current} / {retire} / {end}")]
    AgeOrder {
        current: u32,
        retire: u32,
        end: u32,
    },

    /// The projection horizon runs past the representable calendar
    #[error("start date {start} cannot be advanced by {months} months")]
    HorizonOutOfRange {
        start: NaiveDate,
        months: u32,
    },
}

/// Errors raised while loading scenarios or exporting results
#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid scenario JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Simulation(#[from] SimulationError),
}

/// Reject NaN, infinities and negative values for a named input
pub(crate) fn non_negative(field: &'static str, value: f64) -> SimulationResult<f64> {
    if !value.is_finite() {
        return Err(SimulationError::NonFinite { field, value });
    }
    if value < 0.0 {
        return Err(SimulationError::NegativeValue { field, value });
    }
    Ok(value)
}

/// Resolve a term in years to a whole number of months (at least one)
pub(crate) fn term_months(field: &'static str, years: f64) -> SimulationResult<u32> {
    non_negative(field, years)?;
    let months = (years * 12.0).round();
    if months < 1.0 || months > u32::MAX as f64 {
        return Err(SimulationError::NonPositiveTerm { field, value: years });
    }
    Ok(months as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_negative_accepts_zero() {
        assert_eq!(non_negative("rate", 0.0), Ok(0.0));
    }

    #[test]
    fn test_non_negative_rejects_negative_and_nan() {
        assert!(matches!(
            non_negative("rate", -0.5),
            Err(SimulationError::NegativeValue { field: "rate", .. })
        ));
        assert!(matches!(
            non_negative("rate", f64::NAN),
            Err(SimulationError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_term_months_rounds_years() {
        assert_eq!(term_months("term", 30.0), Ok(360));
        assert_eq!(term_months("term", 2.5), Ok(30));
        assert_eq!(term_months("term", 0.05), Ok(1));
    }

    #[test]
    fn test_term_months_rejects_zero() {
        assert!(matches!(
            term_months("term", 0.0),
            Err(SimulationError::NonPositiveTerm { .. })
        ));
        assert!(matches!(
            term_months("term", 0.01),
            Err(SimulationError::NonPositiveTerm { .. })
        ));
    }

    #[test]
    fn test_error_messages() {
        let err = SimulationError::AgeOrder { current: 40, retire: 35, end: 90 };
        assert_eq!(
            err.to_string(),
            "ages must satisfy current < retirement < end, got 40 / 35 / 90"
        );
    }
}
