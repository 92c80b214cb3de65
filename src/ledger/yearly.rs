//! Calendar-year aggregation of monthly entries

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use super::entry::LedgerEntry;

/// Flows summed over a calendar year, balances as end-of-year snapshots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyBucket {
    pub year: i32,
    pub first_period: u32,
    pub last_period: u32,
    pub beginning_balance: f64,
    pub contribution: f64,
    pub employer_match: f64,
    pub principal: f64,
    pub extra_principal: f64,
    pub interest: f64,
    pub fees: f64,
    pub escrow: f64,
    pub mortgage_insurance: f64,
    pub withdrawal: f64,
    pub income_supplement: f64,
    pub total_cash_flow: f64,
    pub ending_balance: f64,
    pub real_balance: f64,
}

impl YearlyBucket {
    fn open(entry: &LedgerEntry) -> Self {
        Self {
            year: entry.date.year(),
            first_period: entry.period,
            last_period: entry.period,
            beginning_balance: entry.beginning_balance,
            contribution: 0.0,
            employer_match: 0.0,
            principal: 0.0,
            extra_principal: 0.0,
            interest: 0.0,
            fees: 0.0,
            escrow: 0.0,
            mortgage_insurance: 0.0,
            withdrawal: 0.0,
            income_supplement: 0.0,
            total_cash_flow: 0.0,
            ending_balance: entry.ending_balance,
            real_balance: entry.real_balance,
        }
    }

    fn absorb(&mut self, entry: &LedgerEntry) {
        self.last_period = entry.period;
        self.contribution += entry.contribution;
        self.employer_match += entry.employer_match;
        self.principal += entry.principal;
        self.extra_principal += entry.extra_principal;
        self.interest += entry.interest;
        self.fees += entry.fees;
        self.escrow += entry.escrow;
        self.mortgage_insurance += entry.mortgage_insurance;
        self.withdrawal += entry.withdrawal;
        self.income_supplement += entry.income_supplement;
        self.total_cash_flow += entry.total_cash_flow;
        self.ending_balance = entry.ending_balance;
        self.real_balance = entry.real_balance;
    }
}

pub(super) fn aggregate(entries: &[LedgerEntry]) -> Vec<YearlyBucket> {
    let mut buckets: Vec<YearlyBucket> = Vec::new();
    for entry in entries {
        match buckets.last_mut() {
            Some(bucket) if bucket.year == entry.date.year() => bucket.absorb(entry),
            _ => {
                let mut bucket = YearlyBucket::open(entry);
                bucket.absorb(entry);
                buckets.push(bucket);
            }
        }
    }
    buckets
}
