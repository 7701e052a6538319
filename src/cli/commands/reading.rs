//! Reading command implementation.
//!
//! Adds, removes and lists meter readings.

use chrono::NaiveDate;
use clap::{Args, Subcommand};

use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::error::{MeterError, Result};
use crate::model::{Reading, ATTRIBUTE_NAMES};

use super::open_store;

/// Arguments for the `reading` command.
#[derive(Debug, Args)]
pub struct ReadingArgs {
    /// Action to perform.
    #[command(subcommand)]
    pub action: ReadingAction,
}

/// Reading subcommands.
#[derive(Debug, Subcommand)]
pub enum ReadingAction {
    /// Add or overwrite the reading for a date.
    Add {
        /// Reading date (YYYY-MM-DD).
        #[arg(long)]
        date: NaiveDate,
        /// Electricity counter value.
        #[arg(long)]
        electricity: Option<f64>,
        /// Gas counter value.
        #[arg(long)]
        gas: Option<f64>,
        /// Water counter value.
        #[arg(long)]
        water: Option<f64>,
    },
    /// Remove a reading, or a date range of readings.
    Remove {
        /// Single date to remove.
        #[arg(long, conflicts_with_all = ["from", "to"])]
        date: Option<NaiveDate>,
        /// Start of the removal range.
        #[arg(long, requires = "to")]
        from: Option<NaiveDate>,
        /// End of the removal range.
        #[arg(long, requires = "from")]
        to: Option<NaiveDate>,
    },
    /// List stored readings.
    #[command(alias = "ls")]
    List {
        /// Only readings on or after this date.
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Only readings on or before this date.
        #[arg(long)]
        to: Option<NaiveDate>,
    },
}

/// Run the reading command.
pub fn run(cli: &Cli, config: &Config, args: &ReadingArgs) -> Result<()> {
    let store = open_store(cli, config)?;

    match &args.action {
        ReadingAction::Add {
            date,
            electricity,
            gas,
            water,
        } => {
            let reading = Reading::new(*date, [*electricity, *gas, *water]);
            store.add_reading(&reading)?;
            if cli.output == OutputFormat::Text {
                println!("Stored reading for {date}");
            }
            Ok(())
        }
        ReadingAction::Remove { date, from, to } => {
            let removed = match (date, from, to) {
                (Some(date), None, None) => store.remove_reading(*date)?,
                (None, Some(from), Some(to)) => store.remove_readings_between(*from, *to)?,
                _ => {
                    return Err(MeterError::InvalidArgument {
                        name: "date".to_string(),
                        reason: "pass either --date or both --from and --to".to_string(),
                    })
                }
            };
            if cli.output == OutputFormat::Text {
                println!("Removed {removed} reading(s)");
            }
            Ok(())
        }
        ReadingAction::List { from, to } => {
            let readings = match (from, to) {
                (Some(from), Some(to)) => store.readings_between(*from, *to)?,
                _ => {
                    let mut readings = store.all_readings()?;
                    if let Some(from) = from {
                        readings.retain(|r| r.date >= *from);
                    }
                    if let Some(to) = to {
                        readings.retain(|r| r.date <= *to);
                    }
                    readings
                }
            };
            output_readings(cli, &readings)
        }
    }
}

fn output_readings(cli: &Cli, readings: &[Reading]) -> Result<()> {
    match cli.output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(readings)?);
        }
        OutputFormat::Text => {
            if readings.is_empty() {
                println!("No readings stored");
                return Ok(());
            }

            print!("{:<12}", "date");
            for name in ATTRIBUTE_NAMES {
                print!(" {name:>12}");
            }
            println!();

            for reading in readings {
                print!("{:<12}", reading.date);
                for value in reading.attributes {
                    match value {
                        Some(v) => print!(" {v:>12.3}"),
                        None => print!(" {:>12}", "-"),
                    }
                }
                println!();
            }
        }
    }
    Ok(())
}
