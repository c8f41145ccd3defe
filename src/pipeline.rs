use crate::{
    config::Config,
    error::Result,
    filename::generate_filename,
    source::CsvSource,
    template::Template,
    writer::{instantiate, merge_record, Writer},
};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

/// Outcome of one record.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentOutcome {
    /// Source row number (1-based)
    pub row: usize,

    /// Output filename derived from the record
    pub filename: String,

    /// Whether the document was created
    pub succeeded: bool,
}

/// Aggregate result of a merge run.
///
/// Returned by [`Pipeline::run`] instead of being accumulated in ambient
/// counters; the caller decides what to do with it.
#[derive(Debug, Clone, Serialize)]
pub struct MergeStats {
    /// Total number of input records
    pub total_records: usize,

    /// Number of documents created
    pub succeeded: usize,

    /// Number of records that failed
    pub failed: usize,

    /// Total execution time
    pub duration: Duration,

    /// Output directory path
    pub output_directory: String,

    /// Per-record outcomes, in input order
    pub documents: Vec<DocumentOutcome>,

    /// Whether this was a dry run (no files written)
    pub dry_run: bool,
}

impl MergeStats {
    /// Prints a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n╔═══════════════════════════════════════════════════════╗");
        println!("║               Mail Merge Summary                      ║");
        println!("╠═══════════════════════════════════════════════════════╣");
        println!(
            "║ Total records:        {:>8}                        ║",
            self.total_records
        );
        println!(
            "║ Successfully created: {:>8}                        ║",
            self.succeeded
        );
        println!(
            "║ Failed:               {:>8}                        ║",
            self.failed
        );
        println!("║ Output directory:                                     ║");
        println!(
            "║   {}                                              ║",
            self.output_directory
        );
        println!(
            "║ Duration:             {:>8.2}s                       ║",
            self.duration.as_secs_f64()
        );
        if self.dry_run {
            println!("║                                                       ║");
            println!("║ ⚠ No files were written (dry run mode)               ║");
        }
        println!("╚═══════════════════════════════════════════════════════╝\n");
    }

    /// Returns true if every record was processed successfully.
    #[must_use]
    pub const fn is_complete_success(&self) -> bool {
        self.failed == 0
    }
}

/// Orchestrates one mail-merge run.
///
/// Both inputs are loaded fully before the merge loop starts, so an input
/// failure aborts the run before any output is produced. Inside the loop a
/// failing record is logged, counted, and skipped; it never aborts the
/// batch.
pub struct Pipeline {
    config: Config,
    writer: Writer,
}

impl Pipeline {
    /// Creates a new pipeline with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration validation fails.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let writer = Writer::new(&config);

        Ok(Self { config, writer })
    }

    /// Executes the complete merge and returns the aggregate result.
    ///
    /// # Process
    ///
    /// 1. **Template**: loads the DOCX template and prints its structure
    /// 2. **Records**: loads the whole CSV table
    /// 3. **Merge**: one document per record, failures counted and skipped
    ///
    /// # Errors
    ///
    /// Returns an error if either input fails to load, the output directory
    /// cannot be created, or the run summary cannot be written. Per-record
    /// failures do not produce an error.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use docmerge::{Config, Pipeline};
    ///
    /// # fn main() -> anyhow::Result<()> {
    /// let config = Config::builder()
    ///     .csv_path("./orders.csv")
    ///     .template_path("./letter.docx")
    ///     .build()?;
    ///
    /// let stats = Pipeline::new(config)?.run()?;
    /// stats.print_summary();
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self), fields(csv = %self.config.csv_path.display()))]
    pub fn run(self) -> Result<MergeStats> {
        let start_time = Instant::now();

        info!("Starting mail merge");

        // Stage 1: Template
        info!("Stage 1/3: Loading template...");
        let stage_start = Instant::now();
        let template = Template::open(&self.config.template_path)?;
        template.report().print();
        info!(
            "✓ Loaded template {} in {:.2}s",
            self.config.template_path.display(),
            stage_start.elapsed().as_secs_f64()
        );

        // Stage 2: Records
        info!("Stage 2/3: Loading records...");
        let stage_start = Instant::now();
        let records = CsvSource::new(&self.config.csv_path).load()?;
        info!(
            "✓ Loaded {} records in {:.2}s",
            records.len(),
            stage_start.elapsed().as_secs_f64()
        );

        if records.is_empty() {
            warn!("No records found in {}", self.config.csv_path.display());
        }

        // Stage 3: Merge
        if self.config.dry_run {
            warn!("Dry run mode enabled - skipping file writes");
        } else {
            info!("Stage 3/3: Generating documents...");
            self.writer.ensure_output_dir()?;
        }

        let stage_start = Instant::now();
        let mut documents = Vec::with_capacity(records.len());
        let mut succeeded = 0;
        let mut failed = 0;

        for (index, record) in records.iter().enumerate() {
            let row = index + 1;
            let filename = generate_filename(record, row, &self.config.extension);

            let outcome = if self.config.dry_run {
                merge_record(&template, record).map(|_| ())
            } else {
                instantiate(&template, record, &self.writer.target_path(&filename))
            };

            let ok = match outcome {
                Ok(()) => {
                    succeeded += 1;
                    println!("✓ Created: {filename}");
                    true
                }
                Err(e) => {
                    failed += 1;
                    warn!("Error processing row {row}: {e}");
                    println!("✗ Failed: {filename}");
                    false
                }
            };

            documents.push(DocumentOutcome {
                row,
                filename,
                succeeded: ok,
            });
        }

        info!(
            "✓ Processed {} records ({} created, {} failed) in {:.2}s",
            records.len(),
            succeeded,
            failed,
            stage_start.elapsed().as_secs_f64()
        );

        let stats = MergeStats {
            total_records: records.len(),
            succeeded,
            failed,
            duration: start_time.elapsed(),
            output_directory: self.config.output_dir.display().to_string(),
            documents,
            dry_run: self.config.dry_run,
        };

        if !self.config.dry_run {
            self.writer.write_summary(&stats)?;
        }

        info!(
            "✓ Mail merge completed in {:.2}s",
            stats.duration.as_secs_f64()
        );

        Ok(stats)
    }
}
