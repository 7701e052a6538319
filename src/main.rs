//! meterlog: utility meter tracking with fair cost distribution.
//!
//! This binary tracks meter readings and occupancy in a local SQLite
//! database, reports consumption statistics, and computes cost-distribution
//! invoices.

use std::process::ExitCode;

use meterlog::cli;

fn main() -> ExitCode {
    // Logging is initialized by cli::run based on --log-level.
    match cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");

            // Print cause chain in debug mode
            if std::env::var("RUST_BACKTRACE").is_ok() {
                if let Some(source) = std::error::Error::source(&e) {
                    eprintln!("Caused by: {source}");
                }
            }

            ExitCode::from(e.exit_code() as u8)
        }
    }
}
