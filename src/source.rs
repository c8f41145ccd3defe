use crate::error::{Error, Result};
use crate::record::{
    Record, COLUMN_ORDER_CODE, COLUMN_RECIPIENT_ADDRESS, COLUMN_RECIPIENT_PHONE,
    COLUMN_RECIPIENT_NAME,
};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Loads records from a CSV file.
///
/// All values are kept as strings: the `csv` crate hands cells back verbatim,
/// which preserves phone numbers with leading zeros. Column names are matched
/// exactly against the four recognized labels; unrecognized columns are
/// ignored, and a recognized column that is absent reads as empty for every
/// record.
pub(crate) struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    /// Creates a source for the given CSV file.
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads the whole table into memory.
    ///
    /// The file is fully loaded before any merging begins, so a parse error
    /// aborts the run before the first output document is produced.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or any row fails to
    /// parse.
    pub(crate) fn load(&self) -> Result<Vec<Record>> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| Error::csv(&self.path, e))?;

        let headers = reader
            .headers()
            .map_err(|e| Error::csv(&self.path, e))?
            .clone();

        let columns = ColumnIndex::from_headers(&headers);
        columns.warn_missing(&self.path);

        let mut records = Vec::new();
        for (row, result) in reader.records().enumerate() {
            let cells = result.map_err(|e| Error::csv(&self.path, e))?;
            records.push(columns.record(&cells));
            debug!("Parsed row {}", row + 1);
        }

        Ok(records)
    }
}

/// Header positions of the four recognized columns.
struct ColumnIndex {
    recipient_address: Option<usize>,
    recipient_phone: Option<usize>,
    order_code: Option<usize>,
    recipient_name: Option<usize>,
}

impl ColumnIndex {
    fn from_headers(headers: &csv::StringRecord) -> Self {
        let position = |name: &str| headers.iter().position(|h| h == name);

        Self {
            recipient_address: position(COLUMN_RECIPIENT_ADDRESS),
            recipient_phone: position(COLUMN_RECIPIENT_PHONE),
            order_code: position(COLUMN_ORDER_CODE),
            recipient_name: position(COLUMN_RECIPIENT_NAME),
        }
    }

    fn warn_missing(&self, path: &Path) {
        for (label, index) in [
            (COLUMN_RECIPIENT_ADDRESS, self.recipient_address),
            (COLUMN_RECIPIENT_PHONE, self.recipient_phone),
            (COLUMN_ORDER_CODE, self.order_code),
            (COLUMN_RECIPIENT_NAME, self.recipient_name),
        ] {
            if index.is_none() {
                warn!(
                    "Column '{}' not found in {}; treating it as empty for every record",
                    label,
                    path.display()
                );
            }
        }
    }

    /// Builds a record from one row.
    ///
    /// A short row (the file is read in flexible mode) simply leaves the
    /// out-of-range fields absent.
    fn record(&self, cells: &csv::StringRecord) -> Record {
        let field = |index: Option<usize>| {
            index
                .and_then(|i| cells.get(i))
                .map(std::string::ToString::to_string)
        };

        Record {
            recipient_address: field(self.recipient_address),
            recipient_phone: field(self.recipient_phone),
            order_code: field(self.order_code),
            recipient_name: field(self.recipient_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn test_load_records() {
        let temp = assert_fs::TempDir::new().unwrap();
        let csv = temp.child("records.csv");
        csv.write_str(
            "کد سفارش,نام گیرنده,تلفن گیرنده,آدرس گیرنده\n\
             A-1,علی رضایی,09121234567,تهران\n\
             B-2,سارا احمدی,09351112233,شیراز\n",
        )
        .unwrap();

        let records = CsvSource::new(csv.path()).load().unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].order_code(), "A-1");
        assert_eq!(records[0].recipient_name(), "علی رضایی");
        assert_eq!(records[1].recipient_address(), "شیراز");
    }

    #[test]
    fn test_leading_zeros_preserved() {
        let temp = assert_fs::TempDir::new().unwrap();
        let csv = temp.child("records.csv");
        csv.write_str("تلفن گیرنده\n09121234567\n").unwrap();

        let records = CsvSource::new(csv.path()).load().unwrap();

        assert_eq!(records[0].recipient_phone(), "09121234567");
    }

    #[test]
    fn test_missing_column_reads_as_empty() {
        let temp = assert_fs::TempDir::new().unwrap();
        let csv = temp.child("records.csv");
        csv.write_str("کد سفارش\nA-1\n").unwrap();

        let records = CsvSource::new(csv.path()).load().unwrap();

        assert_eq!(records[0].order_code(), "A-1");
        assert_eq!(records[0].recipient_name(), "");
        assert!(records[0].recipient_name.is_none());
    }

    #[test]
    fn test_unrecognized_columns_ignored() {
        let temp = assert_fs::TempDir::new().unwrap();
        let csv = temp.child("records.csv");
        csv.write_str("extra,کد سفارش,other\nx,A-1,y\n").unwrap();

        let records = CsvSource::new(csv.path()).load().unwrap();

        assert_eq!(records[0].order_code(), "A-1");
    }

    #[test]
    fn test_short_row_leaves_fields_absent() {
        let temp = assert_fs::TempDir::new().unwrap();
        let csv = temp.child("records.csv");
        csv.write_str("کد سفارش,نام گیرنده\nA-1\n").unwrap();

        let records = CsvSource::new(csv.path()).load().unwrap();

        assert_eq!(records[0].order_code(), "A-1");
        assert!(records[0].recipient_name.is_none());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = CsvSource::new("/nonexistent/records.csv").load();
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_table() {
        let temp = assert_fs::TempDir::new().unwrap();
        let csv = temp.child("records.csv");
        csv.write_str("کد سفارش,نام گیرنده\n").unwrap();

        let records = CsvSource::new(csv.path()).load().unwrap();
        assert!(records.is_empty());
    }
}
