//! Calendar helpers for month-stepped ledgers

use chrono::{Datelike, Months, NaiveDate};

use crate::error::{SimulationError, SimulationResult};

/// First day of the month containing `date`
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// First day of the current local month.
///
/// Only used to default a start date when a caller omits one; engines never
/// read the clock themselves.
pub fn current_month_start() -> NaiveDate {
    month_start(chrono::Local::now().date_naive())
}

/// Date of a 1-indexed period when period 1 falls in `start`'s month.
///
/// Callers validate the horizon with [`check_horizon`] first; an
/// out-of-range period saturates to the start month.
pub fn period_date(start: NaiveDate, period: u32) -> NaiveDate {
    let start = month_start(start);
    start
        .checked_add_months(Months::new(period.saturating_sub(1)))
        .unwrap_or(start)
}

/// Ensure `months` periods can be dated from `start`
pub fn check_horizon(start: NaiveDate, months: u32) -> SimulationResult<()> {
    month_start(start)
        .checked_add_months(Months::new(months))
        .map(|_| ())
        .ok_or(SimulationError::HorizonOutOfRange { start, months })
}

/// Signed number of whole months from `start`'s month to `target`'s month
pub fn months_between(start: NaiveDate, target: NaiveDate) -> i64 {
    (target.year() as i64 - start.year() as i64) * 12 + target.month() as i64
        - start.month() as i64
}
