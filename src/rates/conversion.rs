//! Annual nominal rate to monthly effective rate conversion

use serde::{Deserialize, Serialize};

/// How often a stated annual rate compounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compounding {
    #[default]
    Monthly,
    Quarterly,
    Annual,
    Daily,
}

impl Compounding {
    /// Compounding events per year
    pub fn periods_per_year(&self) -> u32 {
        match self {
            Compounding::Monthly => 12,
            Compounding::Quarterly => 4,
            Compounding::Annual => 1,
            Compounding::Daily => 365,
        }
    }
}

/// Convert an annual nominal rate (percent) into the equivalent monthly
/// effective rate `f`, so that `(1 + f)^12 == (1 + r/m)^m`.
///
/// A zero rate returns exactly `0.0`.
pub fn monthly_effective_rate(annual_pct: f64, compounding: Compounding) -> f64 {
    let r = annual_pct / 100.0;
    let m = compounding.periods_per_year() as f64;
    (1.0 + r / m).powf(m / 12.0) - 1.0
}

/// Monthly growth factor for an annual inflation rate (percent).
///
/// Returns exactly `1.0` when inflation is zero or negative.
pub fn monthly_inflation_factor(annual_pct: f64) -> f64 {
    if annual_pct > 0.0 {
        (1.0 + annual_pct / 100.0).powf(1.0 / 12.0)
    } else {
        1.0
    }
}
