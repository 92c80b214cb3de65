//! CSV export of ledgers, yearly buckets and batch summaries

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::Writer;
use serde::Serialize;

use crate::error::ScenarioError;
use crate::ledger::{Ledger, YearlyBucket};
use crate::scenario::ScenarioSummary;

fn write_rows<W: Write, T: Serialize>(rows: &[T], writer: W) -> Result<(), ScenarioError> {
    let mut csv = Writer::from_writer(writer);
    for row in rows {
        csv.serialize(row)?;
    }
    csv.flush()?;
    Ok(())
}

/// One CSV row per monthly entry, with a header
pub fn write_ledger<W: Write>(ledger: &Ledger, writer: W) -> Result<(), ScenarioError> {
    write_rows(ledger.entries(), writer)
}

/// One CSV row per calendar year
pub fn write_yearly<W: Write>(buckets: &[YearlyBucket], writer: W) -> Result<(), ScenarioError> {
    write_rows(buckets, writer)
}

/// One CSV row per scenario in a batch
pub fn write_summaries<W: Write>(summaries: &[ScenarioSummary], writer: W) -> Result<(), ScenarioError> {
    write_rows(summaries, writer)
}

/// Write a ledger to a CSV file, monthly or aggregated by year
pub fn ledger_to_path<P: AsRef<Path>>(ledger: &Ledger, yearly: bool, path: P) -> Result<(), ScenarioError> {
    let file = File::create(path)?;
    if yearly {
        write_yearly(&ledger.yearly(), file)
    } else {
        write_ledger(ledger, file)
    }
}
