//! Future Worth CLI
//!
//! Command-line interface for running calculator scenarios
//!
//! ```bash
//! future_worth template mortgage > mortgage.json
//! future_worth run mortgage.json --csv schedule.csv --yearly
//! RUST_LOG=debug future_worth batch scenarios.json --csv summary.csv
//! ```

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use future_worth::export;
use future_worth::ledger::Ledger;
use future_worth::scenario::{Calculator, Scenario, ScenarioOutcome, ScenarioRunner, ScenarioSummary};

/// Personal finance projections: mortgage, loan, compound growth, retirement
#[derive(Parser)]
#[command(name = "future_worth")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scenarios in a file and print their schedules
    Run {
        /// Scenario JSON file (one object or an array)
        scenario: PathBuf,

        /// Write the ledger of the first scenario to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Aggregate by calendar year instead of by month
        #[arg(long)]
        yearly: bool,

        /// Print full results as JSON instead of tables
        #[arg(long)]
        json: bool,
    },

    /// Run every scenario in a file in parallel and summarize
    Batch {
        scenarios: PathBuf,

        /// Write the summary table to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Print the default scenario for a calculator
    Template {
        #[arg(value_enum)]
        calculator: Calculator,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { scenario, csv, yearly, json } => run(&scenario, csv, yearly, json),
        Commands::Batch { scenarios, csv } => batch(&scenarios, csv),
        Commands::Template { calculator } => {
            let template = serde_json::to_string_pretty(&Scenario::template(calculator))?;
            println!("{template}");
            Ok(())
        }
    }
}

fn run(path: &Path, csv: Option<PathBuf>, yearly: bool, json: bool) -> Result<()> {
    let runner = ScenarioRunner::from_json_path(path)
        .with_context(|| format!("failed to load {}", path.display()))?;

    let mut outcomes = Vec::with_capacity(runner.len());
    for (i, scenario) in runner.scenarios().iter().enumerate() {
        let outcome = scenario
            .run()
            .with_context(|| format!("scenario {} ({}) is invalid", i + 1, scenario.calculator().name()))?;
        outcomes.push(outcome);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&outcomes)?);
    } else {
        for outcome in &outcomes {
            print_outcome(outcome, yearly);
        }
    }

    if let (Some(path), Some(first)) = (csv, outcomes.first()) {
        export::ledger_to_path(first.ledger(), yearly, &path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Ledger written to {}", path.display());
    }
    Ok(())
}

fn batch(path: &Path, csv: Option<PathBuf>) -> Result<()> {
    let runner = ScenarioRunner::from_json_path(path)
        .with_context(|| format!("failed to load {}", path.display()))?;

    let start = Instant::now();
    let results = runner.run_batch();
    println!("Ran {} scenarios in {:?}\n", results.len(), start.elapsed());

    let mut summaries = Vec::with_capacity(results.len());
    println!(
        "{:>4} {:<11} {:>7} {:>16} {:>16} {:>16} {:>10}",
        "#", "Calculator", "Periods", "Interest", "Cash Flow", "Final Balance", "Ends"
    );
    println!("{}", "-".repeat(86));
    for (i, result) in results.iter().enumerate() {
        match result {
            Ok(outcome) => {
                let s = outcome.summary();
                println!(
                    "{:>4} {:<11} {:>7} {:>16.2} {:>16.2} {:>16.2} {:>10}",
                    i + 1,
                    s.calculator.name(),
                    s.periods,
                    s.total_interest,
                    s.total_cash_flow,
                    s.final_balance,
                    s.terminal_date.map(|d| d.format("%Y-%m").to_string()).unwrap_or_else(|| "-".into()),
                );
                summaries.push(s);
            }
            Err(e) => println!("{:>4} error: {}", i + 1, e),
        }
    }

    if let Some(path) = csv {
        write_summaries(&summaries, &path)?;
        println!("\nSummary written to {}", path.display());
    }
    Ok(())
}

fn write_summaries(summaries: &[ScenarioSummary], path: &Path) -> Result<()> {
    let file = std::fs::File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    export::write_summaries(summaries, file)?;
    Ok(())
}

fn print_outcome(outcome: &ScenarioOutcome, yearly: bool) {
    println!("{} projection", outcome.calculator().name());
    println!("======================");

    match outcome {
        ScenarioOutcome::Mortgage(r) => {
            println!("  Loan amount:        ${:.2}", r.loan_amount);
            println!("  Down payment:       ${:.2}", r.down_payment);
            println!("  Principal+interest: ${:.2}", r.payment.principal_and_interest);
            println!("  Escrow:             ${:.2}", r.payment.property_tax + r.payment.home_insurance + r.payment.hoa);
            println!("  PMI:                ${:.2}", r.payment.mortgage_insurance);
            println!("  Monthly total:      ${:.2}", r.payment.total);
            println!(
                "  Payment at APR -1/+1: ${:.2} / ${:.2}",
                r.sensitivity.rate_down_one, r.sensitivity.rate_up_one
            );
            if let Some(m) = r.milestones.pmi_cancellation {
                println!("  PMI ends:           period {} ({})", m.period, m.date.format("%Y-%m"));
            }
        }
        ScenarioOutcome::Loan(r) => {
            println!("  Payment:            ${:.2}", r.payment);
            println!("  Monthly total:      ${:.2}", r.monthly_total);
            println!("  Interest saved:     ${:.2}", r.savings.interest_saved);
            println!("  Months saved:       {}", r.savings.periods_saved);
        }
        ScenarioOutcome::Compound(r) => {
            println!("  Monthly rate:       {:.6}%", r.monthly_rate * 100.0);
        }
        ScenarioOutcome::Retirement(r) => {
            let snap = &r.at_retirement;
            println!("  At retirement:      ${:.2} after {} months", snap.balance, snap.period);
            println!("  Contributed:        ${:.2}", snap.total_contributions);
            println!("  Earned:             ${:.2}", snap.total_earnings);
            match r.milestones.depletion {
                Some(m) => println!("  Depleted:           period {} ({})", m.period, m.date.format("%Y-%m")),
                None => println!("  Lasts to end age with ${:.2}", r.totals.final_balance),
            }
        }
    }

    let totals = outcome.totals();
    println!("  Periods:            {}", totals.periods);
    println!("  Total interest:     ${:.2}", totals.total_interest);
    println!("  Total cash flow:    ${:.2}", totals.total_cash_flow);
    if let Some(m) = outcome.milestones().payoff {
        println!("  Paid off:           period {} ({})", m.period, m.date.format("%Y-%m"));
    }
    println!();

    if yearly {
        print_yearly(outcome.ledger());
    } else {
        print_monthly(outcome.ledger());
    }
}

fn print_monthly(ledger: &Ledger) {
    println!(
        "{:>6} {:>8} {:>14} {:>12} {:>12} {:>12} {:>12} {:>14}",
        "Period", "Month", "Begin", "Inflow", "Interest", "Principal", "Withdrawn", "End"
    );
    println!("{}", "-".repeat(98));
    // First 24 months to console
    for e in ledger.entries().iter().take(24) {
        println!(
            "{:>6} {:>8} {:>14.2} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>14.2}",
            e.period,
            e.date.format("%Y-%m"),
            e.beginning_balance,
            e.contribution,
            e.interest,
            e.principal + e.extra_principal,
            e.withdrawal,
            e.ending_balance,
        );
    }
    if ledger.len() > 24 {
        println!("... {} more periods", ledger.len() - 24);
    }
    println!();
}

fn print_yearly(ledger: &Ledger) {
    println!(
        "{:>6} {:>14} {:>12} {:>12} {:>12} {:>12} {:>14} {:>14}",
        "Year", "Begin", "Inflow", "Interest", "Principal", "Withdrawn", "End", "Real End"
    );
    println!("{}", "-".repeat(104));
    for y in ledger.yearly() {
        println!(
            "{:>6} {:>14.2} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>14.2} {:>14.2}",
            y.year,
            y.beginning_balance,
            y.contribution,
            y.interest,
            y.principal + y.extra_principal,
            y.withdrawal,
            y.ending_balance,
            y.real_balance,
        );
    }
    println!();
}
