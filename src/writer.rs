use crate::{
    config::Config,
    error::{Error, Result},
    pipeline::MergeStats,
    record::Record,
    substitute::{substitute, ReplacementMap},
    template::Template,
};
use docx_rs::Docx;
use serde::Serialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

/// Summary of a completed merge run, persisted as `summary.json`.
#[derive(Debug, Serialize)]
pub(crate) struct WriteSummary {
    /// Total number of input records
    pub total_records: usize,

    /// Number of documents created
    pub succeeded: usize,

    /// Number of records that failed
    pub failed: usize,

    /// Execution duration in seconds
    pub duration_secs: f64,

    /// Input CSV path
    pub csv_file: String,

    /// Input template path
    pub template_file: String,

    /// Output directory path
    pub output_directory: String,

    /// Per-document outcomes
    pub documents: Vec<DocumentSummary>,

    /// Generation timestamp
    pub generated_at: String,
}

/// One row of the run summary.
#[derive(Debug, Serialize)]
pub(crate) struct DocumentSummary {
    /// Source row number (1-based)
    pub row: usize,

    /// Output filename derived from the record
    pub filename: String,

    /// "created" or "failed"
    pub status: String,
}

/// Merges one record into an independent copy of the template.
///
/// The copy is produced by [`Template::deep_copy`], so the template itself is
/// never touched and repeated calls never interfere with each other.
///
/// # Errors
///
/// Returns an error if the deep copy fails.
pub(crate) fn merge_record(template: &Template, record: &Record) -> Result<Docx> {
    let mut document = template.deep_copy()?;
    let replacements = ReplacementMap::for_record(record);
    substitute(&mut document, &replacements);
    Ok(document)
}

/// Creates one output document for one record: deep copy, substitute,
/// persist.
///
/// Overwrites any existing file at `output_path` without warning. On failure
/// a partial file may remain at the target path; the caller counts the
/// record as failed either way.
///
/// # Errors
///
/// Returns an error if the copy, the substitution source, or the write
/// fails.
pub fn instantiate(template: &Template, record: &Record, output_path: &Path) -> Result<()> {
    let document = merge_record(template, record)?;
    persist(document, output_path)
}

/// Packs a document to disk.
///
/// The file handle is scoped to this function and released on every exit
/// path, so a batch of thousands of records never accumulates open
/// descriptors.
fn persist(document: Docx, path: &Path) -> Result<()> {
    let file = fs::File::create(path).map_err(|e| Error::io(path, e))?;

    document
        .build()
        .pack(file)
        .map_err(|e| Error::document(path, e.to_string()))?;

    debug!("Wrote {}", path.display());
    Ok(())
}

/// Owns the output directory and the run summary artifact.
pub(crate) struct Writer {
    output_dir: PathBuf,
    csv_path: PathBuf,
    template_path: PathBuf,
}

impl Writer {
    /// Creates a new writer from configuration.
    pub(crate) fn new(config: &Config) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            csv_path: config.csv_path.clone(),
            template_path: config.template_path.clone(),
        }
    }

    /// Creates the output directory if it doesn't exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub(crate) fn ensure_output_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.output_dir).map_err(|e| Error::io(&self.output_dir, e))?;
        debug!("Output directory ready: {}", self.output_dir.display());
        Ok(())
    }

    /// Returns the target path for a generated filename.
    pub(crate) fn target_path(&self, filename: &str) -> PathBuf {
        self.output_dir.join(filename)
    }

    /// Writes `summary.json` with metadata about the completed run.
    ///
    /// # Errors
    ///
    /// Returns an error if the summary file cannot be written or serialized.
    pub(crate) fn write_summary(&self, stats: &MergeStats) -> Result<()> {
        let summary = WriteSummary {
            total_records: stats.total_records,
            succeeded: stats.succeeded,
            failed: stats.failed,
            duration_secs: stats.duration.as_secs_f64(),
            csv_file: self.csv_path.display().to_string(),
            template_file: self.template_path.display().to_string(),
            output_directory: self.output_dir.display().to_string(),
            documents: stats
                .documents
                .iter()
                .map(|d| DocumentSummary {
                    row: d.row,
                    filename: d.filename.clone(),
                    status: if d.succeeded { "created" } else { "failed" }.to_string(),
                })
                .collect(),
            generated_at: chrono::Local::now()
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
        };

        let summary_path = self.output_dir.join("summary.json");
        let file = fs::File::create(&summary_path).map_err(|e| Error::io(&summary_path, e))?;

        serde_json::to_writer_pretty(file, &summary).map_err(Error::from)?;

        info!("Wrote summary to {}", summary_path.display());
        Ok(())
    }
}
