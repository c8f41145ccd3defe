use crate::error::{Error, Result};
use docx_rs::{
    read_docx, Docx, DocumentChild, Paragraph, ParagraphChild, RunChild, Table, TableCell,
    TableCellContent, TableChild, TableRowChild,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[^}]+\}").expect("valid placeholder regex"));

const PARAGRAPH_PREVIEW_CHARS: usize = 100;
const CELL_PREVIEW_CHARS: usize = 50;

/// A loaded DOCX template.
///
/// The parsed tree is kept read-only; every generated document starts from an
/// independent copy produced by [`Template::deep_copy`], so repeated merges
/// never interfere with each other or accumulate edits in the template.
pub struct Template {
    path: PathBuf,
    docx: Docx,
    bytes: Vec<u8>,
}

impl Template {
    /// Loads a template from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid DOCX
    /// archive.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let bytes = fs::read(&path).map_err(|e| Error::io(&path, e))?;
        let docx = read_docx(&bytes).map_err(|e| Error::template(&path, format!("{e:?}")))?;

        debug!("Loaded template {} ({} bytes)", path.display(), bytes.len());
        Ok(Self { path, docx, bytes })
    }

    /// Produces an independent copy of the template document.
    ///
    /// The copy is re-parsed from the retained source bytes, so it shares no
    /// mutable text storage with the loaded template or with any previous
    /// copy. Purely in-memory: no storage round trip, no temporary files.
    ///
    /// # Errors
    ///
    /// Returns an error if the retained bytes fail to parse. With bytes that
    /// parsed once at load time this only happens under memory corruption,
    /// but the error path is kept rather than panicking mid-batch.
    pub fn deep_copy(&self) -> Result<Docx> {
        read_docx(&self.bytes).map_err(|e| Error::template(&self.path, format!("{e:?}")))
    }

    /// Returns the path this template was loaded from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Analyzes the template structure.
    ///
    /// Collects non-empty paragraph texts, table dimensions with non-empty
    /// cell texts, and the set of bracketed placeholder tokens discovered in
    /// paragraph and cell text. Placeholder discovery concatenates the runs
    /// of each paragraph, so a token split across runs shows up here even
    /// though substitution will not replace it.
    #[must_use]
    pub fn report(&self) -> TemplateReport {
        let mut paragraphs = Vec::new();
        let mut tables = Vec::new();
        let mut placeholders = BTreeSet::new();

        for child in &self.docx.document.children {
            match child {
                DocumentChild::Paragraph(paragraph) => {
                    let text = paragraph_text(paragraph);
                    collect_placeholders(&text, &mut placeholders);
                    if !text.trim().is_empty() {
                        paragraphs.push(preview(&text, PARAGRAPH_PREVIEW_CHARS));
                    }
                }
                DocumentChild::Table(table) => {
                    tables.push(TableReport::new(table, &mut placeholders));
                }
                _ => {}
            }
        }

        TemplateReport {
            paragraphs,
            tables,
            placeholders: placeholders.into_iter().collect(),
        }
    }
}

/// Structural report of a template, printed before processing begins.
///
/// Purely informational; nothing downstream parses it.
#[derive(Debug, Clone)]
pub struct TemplateReport {
    /// Non-empty paragraph texts (truncated previews), in document order
    pub paragraphs: Vec<String>,

    /// One entry per top-level table, in document order
    pub tables: Vec<TableReport>,

    /// Sorted set of bracketed placeholder tokens discovered in the template
    pub placeholders: Vec<String>,
}

/// Dimensions and non-empty cell texts of one table.
#[derive(Debug, Clone)]
pub struct TableReport {
    /// Number of rows
    pub rows: usize,

    /// Number of columns (from the table grid)
    pub columns: usize,

    /// Non-empty cells as (row, column, preview), both indices 1-based
    pub cells: Vec<(usize, usize, String)>,
}

impl TableReport {
    fn new(table: &Table, placeholders: &mut BTreeSet<String>) -> Self {
        let mut rows = 0;
        let mut columns = 0;
        let mut cells = Vec::new();

        for (row_idx, row) in table.rows.iter().enumerate() {
            let TableChild::TableRow(row) = row;
            rows += 1;
            columns = columns.max(row.cells.len());

            for (col_idx, cell) in row.cells.iter().enumerate() {
                let TableRowChild::TableCell(cell) = cell;
                let text = cell_text(cell);
                collect_placeholders(&text, placeholders);
                if !text.trim().is_empty() {
                    cells.push((row_idx + 1, col_idx + 1, preview(&text, CELL_PREVIEW_CHARS)));
                }
            }
        }

        Self {
            rows,
            columns,
            cells,
        }
    }
}

impl TemplateReport {
    /// Prints the report to stdout in human-readable form.
    pub fn print(&self) {
        println!("=== Template Structure Analysis ===");

        println!("\nParagraphs:");
        for (i, text) in self.paragraphs.iter().enumerate() {
            println!("  {}. {}", i + 1, text);
        }

        println!("\nTables found: {}", self.tables.len());
        for (i, table) in self.tables.iter().enumerate() {
            println!("\n  Table {}:", i + 1);
            println!("    Rows: {}, Columns: {}", table.rows, table.columns);
            for (row, col, text) in &table.cells {
                println!("    Row {row}, Col {col}: {text}");
            }
        }

        println!("\n=== Placeholders Found ===");
        if self.placeholders.is_empty() {
            println!("No placeholders found with {{}} format");
        } else {
            println!("Found placeholders:");
            for placeholder in &self.placeholders {
                println!("  - {placeholder}");
            }
        }
        println!("{}", "=".repeat(50));
    }
}

/// Concatenates the text runs of a paragraph.
///
/// Only plain runs are visited; hyperlink-wrapped runs and revision marks are
/// not part of the text this crate operates on.
pub(crate) fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();

    for child in &paragraph.children {
        if let ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                if let RunChild::Text(t) = run_child {
                    text.push_str(&t.text);
                }
            }
        }
    }

    text
}

/// Concatenates the paragraph texts of a table cell, newline-separated.
pub(crate) fn cell_text(cell: &TableCell) -> String {
    let mut parts = Vec::new();

    for content in &cell.children {
        if let TableCellContent::Paragraph(paragraph) = content {
            parts.push(paragraph_text(paragraph));
        }
    }

    parts.join("\n")
}

fn collect_placeholders(text: &str, placeholders: &mut BTreeSet<String>) {
    for found in PLACEHOLDER_RE.find_iter(text) {
        placeholders.insert(found.as_str().to_string());
    }
}

/// Truncates to a character count without splitting a code point.
fn preview(text: &str, max_chars: usize) -> String {
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("...");
    out
}
