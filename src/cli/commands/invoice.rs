//! Invoice command implementation.
//!
//! Computes a cost-distribution invoice over a date range and optionally
//! renders the responsibility sections as a chart.

use chrono::{Local, NaiveDate};
use clap::Args;

use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::error::Result;
use crate::invoice::{build_invoice, chart, InvoiceOptions};

use super::open_store;

/// Arguments for the `invoice` command.
#[derive(Debug, Args)]
pub struct InvoiceArgs {
    /// Start of the invoiced range (YYYY-MM-DD).
    #[arg(long)]
    pub from: NaiveDate,

    /// End of the invoiced range (YYYY-MM-DD).
    #[arg(long)]
    pub to: NaiveDate,

    /// Total amount to distribute.
    #[arg(long)]
    pub amount: f64,

    /// Exclude a person from the distribution (repeatable).
    #[arg(long = "exclude", value_name = "NAME")]
    pub exclude: Vec<String>,

    /// Distribute the raw contribution mass without normalizing.
    #[arg(long)]
    pub no_normalize: bool,

    /// Render the responsibility sections as a bar chart.
    #[arg(long)]
    pub chart: bool,
}

/// Run the invoice command.
pub fn run(cli: &Cli, config: &Config, args: &InvoiceArgs) -> Result<()> {
    let store = open_store(cli, config)?;

    let normalize = if args.no_normalize {
        false
    } else {
        config.invoice.normalize
    };
    let options = InvoiceOptions::new(Local::now().date_naive())
        .with_excluded(args.exclude.clone())
        .with_normalize(normalize);

    let invoice = build_invoice(&store, args.from, args.to, args.amount, &options)?;

    match cli.output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&invoice)?);
        }
        OutputFormat::Text => {
            println!("Invoice {}  total {:.2}", invoice.range, invoice.total);
            println!();

            if invoice.lines.is_empty() {
                println!("No accountable persons in this range");
                return Ok(());
            }

            let name_width = invoice
                .lines
                .iter()
                .map(|l| l.person.name.len())
                .max()
                .unwrap_or(4);
            for line in &invoice.lines {
                println!("  {:<name_width$}  {:>10.2}", line.person.name, line.amount);
            }

            let sum: f64 = invoice.lines.iter().map(|l| l.amount).sum();
            println!("  {:<name_width$}  {:>10.2}", "", sum);

            if args.chart {
                if let Some(sections) = &invoice.sections {
                    println!();
                    print!("{}", chart::render(sections, config.chart.width));
                }
            }
        }
    }
    Ok(())
}
