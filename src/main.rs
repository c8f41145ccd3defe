use anyhow::Context;
use clap::Parser;
use docmerge::{Config, Pipeline};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "docmerge",
    version,
    author,
    about = "Generate DOCX documents in bulk from a template and CSV records",
    long_about = "Generate DOCX documents in bulk from a template and CSV records.\n\n\
    This tool reads a CSV table and a DOCX template, replaces placeholder tokens \
    with each row's values while preserving formatting, and writes one document \
    per row into the output directory. Before processing it prints a structural \
    report of the template with the placeholders it discovered.\n\n\
    USAGE EXAMPLES:\n  \
      # Merge a table into a template\n  \
      docmerge --csv orders.csv --template letter.docx\n\n  \
      # Choose the output directory\n  \
      docmerge --csv orders.csv --template letter.docx --out ./letters\n\n  \
      # Validate the merge without writing files\n  \
      docmerge --csv orders.csv --template letter.docx --dry-run"
)]
struct Cli {
    /// CSV file with one record per row
    #[arg(short, long, value_name = "FILE")]
    csv: PathBuf,

    /// DOCX template containing placeholder tokens
    #[arg(short, long, value_name = "FILE")]
    template: PathBuf,

    /// Output directory for generated documents
    #[arg(short, long, default_value = "generated_documents", value_name = "PATH")]
    out: PathBuf,

    /// File extension for generated documents (without the leading dot)
    #[arg(long, default_value = "docx", value_name = "EXT")]
    ext: String,

    /// Dry run (don't write files)
    #[arg(long)]
    dry_run: bool,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose)?;

    let config = Config::builder()
        .csv_path(cli.csv)
        .template_path(cli.template)
        .output_dir(cli.out)
        .extension(cli.ext)
        .dry_run(cli.dry_run)
        .build()
        .context("Failed to build configuration")?;

    let stats = Pipeline::new(config)
        .context("Failed to create pipeline")?
        .run()
        .context("Mail merge failed")?;

    stats.print_summary();

    Ok(())
}

fn setup_tracing(verbosity: u8) -> anyhow::Result<()> {
    let filter = match verbosity {
        0 => EnvFilter::new("docmerge=info"),
        1 => EnvFilter::new("docmerge=debug"),
        _ => EnvFilter::new("docmerge=trace"),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_thread_ids(false))
        .init();

    Ok(())
}
