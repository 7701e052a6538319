//! meterlog: utility meter tracking with fair cost distribution.
//!
//! This crate tracks dated meter readings and household occupancy in a
//! local SQLite database, computes per-attribute consumption statistics,
//! and distributes shared costs over the people who lived there.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use chrono::NaiveDate;
//! use meterlog::invoice::{build_invoice, InvoiceOptions};
//! use meterlog::store::MeterStore;
//!
//! fn main() -> meterlog::Result<()> {
//!     let store = MeterStore::open("meterlog.db")?;
//!
//!     let options = InvoiceOptions::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
//!     let invoice = build_invoice(
//!         &store,
//!         NaiveDate::from_ymd_opt(2023, 2, 1).unwrap(),
//!         NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
//!         100.0,
//!         &options,
//!     )?;
//!
//!     for line in &invoice.lines {
//!         println!("{}: {:.2}", line.person.name, line.amount);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - [`model`]: Reading and person records
//! - [`interval`]: Date interval algebra with overlap classification
//! - [`analytics`]: Consumption statistics over monthly/yearly/full frames
//! - [`invoice`]: Responsibility sections and cost distribution
//! - [`store`]: SQLite persistence and the repository boundary
//! - [`cli`]: Command-line interface
//! - [`config`]: Configuration management
//! - [`error`]: Error types and handling
//!
//! The computational core (`interval`, `analytics`, `invoice`) is pure and
//! single-threaded: it consumes loaded collections, never touches the
//! database, and holds no process-wide state, so disjoint computations may
//! run concurrently without synchronization.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod analytics;
pub mod cli;
pub mod config;
pub mod error;
pub mod interval;
pub mod invoice;
pub mod model;
pub mod store;

// Re-export commonly used types at the crate root
pub use error::{MeterError, Result};
pub use model::{Person, Reading, ATTRIBUTE_COUNT};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Prelude module for convenient imports.
pub mod prelude {

    pub use crate::analytics::{FrameStatistics, Measurement, ReadingAnalyzer};
    pub use crate::error::{MeterError, Result};
    pub use crate::interval::{DateSpan, Intersection};
    pub use crate::invoice::{build_invoice, Contribution, InvoiceOptions, SectionNode};
    pub use crate::model::{Person, Reading};
    pub use crate::store::{MeterStore, Repository};
}
