//! # docmerge
//!
//! A batch mail-merge tool: one populated DOCX per CSV record.
//!
//! ## Features
//!
//! - Run-scoped placeholder substitution that preserves formatting
//! - String-typed CSV loading (leading zeros survive)
//! - Filesystem-safe output filenames derived from record fields
//! - Per-record failure recovery with an aggregate result
//! - Structural template report printed before processing
//!
//! ## Quick Start
//!
//! ```no_run
//! use docmerge::{Config, Pipeline};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::builder()
//!     .csv_path("./orders.csv")
//!     .template_path("./letter.docx")
//!     .output_dir("./generated_documents")
//!     .build()?;
//!
//! let stats = Pipeline::new(config)?.run()?;
//! stats.print_summary();
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The library follows a staged pipeline:
//! 1. **Template**: loads the DOCX template and reports its structure
//! 2. **Source**: loads the whole CSV table into typed records
//! 3. **Merge**: per record, deep-copies the template, substitutes
//!    placeholders, and persists the result

#![warn(
    missing_docs,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::module_name_repetitions)]

mod config;
mod error;
mod filename;
mod pipeline;
mod record;
mod source;
mod substitute;
mod template;
mod writer;

pub use config::{Config, ConfigBuilder};
pub use error::{Error, Result};
pub use filename::generate_filename;
pub use pipeline::{DocumentOutcome, MergeStats, Pipeline};
pub use record::Record;
pub use substitute::{substitute, ReplacementMap};
pub use template::{Template, TemplateReport};
pub use writer::instantiate;

/// Runs the complete mail merge with the given configuration.
///
/// This is the main entry point for the library.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration is invalid
/// - The CSV table or the template cannot be read
/// - The output directory cannot be created
/// - The run summary cannot be written
///
/// Per-record failures are counted in the returned stats, not returned as
/// errors.
///
/// # Examples
///
/// ```no_run
/// use docmerge::{run, Config};
///
/// # fn main() -> anyhow::Result<()> {
/// let config = Config::builder()
///     .csv_path("./orders.csv")
///     .template_path("./letter.docx")
///     .build()?;
///
/// let stats = run(config)?;
/// println!("{} of {} documents created", stats.succeeded, stats.total_records);
/// # Ok(())
/// # }
/// ```
pub fn run(config: Config) -> Result<MergeStats> {
    Pipeline::new(config)?.run()
}
