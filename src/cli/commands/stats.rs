//! Stats command implementation.
//!
//! Displays consumption statistics over monthly, yearly or whole-range
//! frames.

use clap::Args;
use serde::Serialize;

use crate::analytics::{FrameStatistics, ReadingAnalyzer};
use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::error::Result;
use crate::model::ATTRIBUTE_NAMES;

use super::open_store;

/// Arguments for the `stats` command.
#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Analyze per calendar month, grouped by year.
    #[arg(long, conflicts_with = "yearly")]
    pub monthly: bool,

    /// Analyze per calendar year.
    #[arg(long, conflicts_with = "monthly")]
    pub yearly: bool,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum StatsOutput {
    Monthly(Vec<crate::analytics::AnalyzedYearMonths>),
    Yearly(Vec<crate::analytics::AnalyzedYear>),
    Complete(FrameStatistics),
}

/// Run the stats command.
pub fn run(cli: &Cli, config: &Config, args: &StatsArgs) -> Result<()> {
    let store = open_store(cli, config)?;
    let analyzer = ReadingAnalyzer::new(store.all_readings()?);

    let output = if args.monthly {
        StatsOutput::Monthly(analyzer.monthly())
    } else if args.yearly {
        StatsOutput::Yearly(analyzer.yearly())
    } else {
        StatsOutput::Complete(analyzer.completely())
    };

    match cli.output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => match &output {
            StatsOutput::Monthly(years) => {
                if years.is_empty() {
                    println!("Not enough readings for monthly statistics");
                }
                for year in years {
                    println!("{}", year.year);
                    println!("{}", "=".repeat(4));
                    for month in &year.months {
                        println!();
                        println!("{}-{:02}", year.year, month.month);
                        print_frame(&month.stats);
                    }
                    println!();
                }
            }
            StatsOutput::Yearly(years) => {
                for year in years {
                    println!("{}", year.year);
                    print_frame(&year.stats);
                    println!();
                }
            }
            StatsOutput::Complete(stats) => print_frame(stats),
        },
    }
    Ok(())
}

/// Print one frame of statistics as indented text.
fn print_frame(stats: &FrameStatistics) {
    if stats.readings_count == 0 {
        println!("  (fewer than 2 readings, no statistics)");
        return;
    }

    println!("  readings: {}", stats.readings_count);
    if let (Some(lower), Some(upper)) = (stats.days_stats.minimum, stats.days_stats.maximum) {
        println!("  frame:    {lower} .. {upper}");
    }
    println!(
        "  spacing:  {} days total, {} mean{}",
        format_value(stats.days_stats.absolute),
        format_value(stats.days_stats.mean),
        stats
            .days_stats
            .deviation
            .map_or(String::new(), |d| format!(", {d:.2} deviation")),
    );

    for (name, attr) in ATTRIBUTE_NAMES.iter().zip(&stats.attribute_stats) {
        let witnesses = match (&attr.minimum, &attr.maximum) {
            (Some(min), Some(max)) => format!(" (min @ {}, max @ {})", min.date, max.date),
            _ => String::new(),
        };
        println!(
            "  {name:<12} total {}, per day {}, deviation {}{witnesses}",
            format_value(attr.absolute),
            format_value(attr.mean),
            format_value(attr.deviation),
        );
    }
}

fn format_value(value: Option<f64>) -> String {
    value.map_or("-".to_string(), |v| format!("{v:.3}"))
}
