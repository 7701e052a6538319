//! Person command implementation.
//!
//! Adds, removes and lists occupancy records.

use chrono::{Local, NaiveDate};
use clap::{Args, Subcommand};

use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::error::Result;
use crate::model::Person;

use super::open_store;

/// Arguments for the `person` command.
#[derive(Debug, Args)]
pub struct PersonArgs {
    /// Action to perform.
    #[command(subcommand)]
    pub action: PersonAction,
}

/// Person subcommands.
#[derive(Debug, Subcommand)]
pub enum PersonAction {
    /// Add or overwrite an occupancy record.
    Add {
        /// Person name.
        name: String,
        /// Move-in date (YYYY-MM-DD).
        #[arg(long)]
        move_in: Option<NaiveDate>,
        /// Move-out date; omit while the person still lives there.
        #[arg(long)]
        move_out: Option<NaiveDate>,
    },
    /// Remove an occupancy record.
    Remove {
        /// Person name.
        name: String,
    },
    /// List occupancy records.
    #[command(alias = "ls")]
    List,
}

/// Run the person command.
pub fn run(cli: &Cli, config: &Config, args: &PersonArgs) -> Result<()> {
    let store = open_store(cli, config)?;

    match &args.action {
        PersonAction::Add {
            name,
            move_in,
            move_out,
        } => {
            let person = Person::new(name.clone(), *move_in, *move_out);
            store.add_person(&person)?;
            if cli.output == OutputFormat::Text {
                println!("Stored person '{name}'");
            }
            Ok(())
        }
        PersonAction::Remove { name } => {
            let removed = store.remove_person(name)?;
            if cli.output == OutputFormat::Text {
                if removed == 0 {
                    println!("No person named '{name}'");
                } else {
                    println!("Removed person '{name}'");
                }
            }
            Ok(())
        }
        PersonAction::List => {
            let persons = store.all_persons()?;
            output_persons(cli, &persons)
        }
    }
}

fn output_persons(cli: &Cli, persons: &[Person]) -> Result<()> {
    match cli.output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(persons)?);
        }
        OutputFormat::Text => {
            if persons.is_empty() {
                println!("No persons stored");
                return Ok(());
            }

            let name_width = persons.iter().map(|p| p.name.len()).max().unwrap_or(4).max(4);
            println!(
                "{:<name_width$} {:<12} {:<12} {:>8}",
                "name", "move in", "move out", "months"
            );

            let today = Local::now().date_naive();
            for person in persons {
                let move_in = person.move_in.map_or("-".to_string(), |d| d.to_string());
                let move_out = person.move_out.map_or("open".to_string(), |d| d.to_string());
                let months = person
                    .occupancy(today)
                    .map_or("-".to_string(), |span| format!("{:.1}", span.months()));
                println!("{:<name_width$} {move_in:<12} {move_out:<12} {months:>8}", person.name);
            }
        }
    }
    Ok(())
}
