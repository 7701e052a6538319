//! CLI command implementations.

pub mod invoice;
pub mod person;
pub mod reading;
pub mod stats;

pub use invoice::InvoiceArgs;
pub use person::PersonArgs;
pub use reading::ReadingArgs;
pub use stats::StatsArgs;

use crate::cli::Cli;
use crate::config::Config;
use crate::error::Result;
use crate::store::MeterStore;

/// Open the store selected by CLI override and configuration.
pub(crate) fn open_store(cli: &Cli, config: &Config) -> Result<MeterStore> {
    let path = config.database_path(cli.db.as_deref());
    MeterStore::open(path)
}
