use crate::error::{Error, Result};
use std::path::PathBuf;

const DEFAULT_CSV_PATH: &str = "csv.csv";
const DEFAULT_TEMPLATE_PATH: &str = "template.docx";
const DEFAULT_OUTPUT_DIR: &str = "generated_documents";
const DEFAULT_EXTENSION: &str = "docx";

/// Configuration for a mail-merge run.
///
/// Use [`Config::builder()`] to construct a new configuration.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Config {
    /// Path to the CSV file with one record per row
    pub csv_path: PathBuf,

    /// Path to the DOCX template containing placeholder tokens
    pub template_path: PathBuf,

    /// Output directory for generated documents
    pub output_dir: PathBuf,

    /// File extension for generated documents (without the leading dot)
    pub extension: String,

    /// Dry run mode (merge in memory, no file writes)
    pub dry_run: bool,
}

impl Config {
    /// Creates a new configuration builder.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use docmerge::Config;
    ///
    /// let config = Config::builder()
    ///     .csv_path("./orders.csv")
    ///     .template_path("./letter.docx")
    ///     .output_dir("./out")
    ///     .build()
    ///     .expect("valid configuration");
    /// ```
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// Both input files must exist before any processing begins; a run is
    /// never started against a missing table or template.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The CSV file doesn't exist or is not a file
    /// - The template file doesn't exist or is not a file
    /// - The output extension is empty or starts with a dot
    pub fn validate(&self) -> Result<()> {
        if !self.csv_path.exists() {
            return Err(Error::config(format!(
                "CSV file does not exist: {}",
                self.csv_path.display()
            )));
        }

        if !self.csv_path.is_file() {
            return Err(Error::config(format!(
                "CSV path is not a file: {}",
                self.csv_path.display()
            )));
        }

        if !self.template_path.exists() {
            return Err(Error::config(format!(
                "Template file does not exist: {}",
                self.template_path.display()
            )));
        }

        if !self.template_path.is_file() {
            return Err(Error::config(format!(
                "Template path is not a file: {}",
                self.template_path.display()
            )));
        }

        if self.extension.is_empty() {
            return Err(Error::config("extension must not be empty"));
        }

        if self.extension.starts_with('.') {
            return Err(Error::config(format!(
                "extension must not include the leading dot: '{}'",
                self.extension
            )));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
            template_path: PathBuf::from(DEFAULT_TEMPLATE_PATH),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            extension: DEFAULT_EXTENSION.to_string(),
            dry_run: false,
        }
    }
}

/// Builder for creating a [`Config`].
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    csv_path: Option<PathBuf>,
    template_path: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    extension: Option<String>,
    dry_run: bool,
}

impl ConfigBuilder {
    /// Sets the path to the CSV record file.
    #[must_use]
    pub fn csv_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.csv_path = Some(path.into());
        self
    }

    /// Sets the path to the DOCX template file.
    #[must_use]
    pub fn template_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.template_path = Some(path.into());
        self
    }

    /// Sets the output directory for generated documents.
    ///
    /// The directory is created on demand when the first document is written.
    #[must_use]
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Sets the extension for generated documents (without the leading dot).
    #[must_use]
    pub fn extension(mut self, ext: impl Into<String>) -> Self {
        self.extension = Some(ext.into());
        self
    }

    /// Enables dry run mode (merge in memory, no file writes).
    #[must_use]
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn build(self) -> Result<Config> {
        let config = Config {
            csv_path: self
                .csv_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CSV_PATH)),
            template_path: self
                .template_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMPLATE_PATH)),
            output_dir: self
                .output_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            extension: self
                .extension
                .unwrap_or_else(|| DEFAULT_EXTENSION.to_string()),
            dry_run: self.dry_run,
        };

        config.validate()?;
        Ok(config)
    }
}
