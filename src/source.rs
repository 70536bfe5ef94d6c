//! Spreadsheet-backed request source.
//!
//! Reads the source CSV sheet and turns its rows into [`DownloadRequest`]s.
//! Schema problems (missing file, missing required columns) are fatal setup
//! errors; data problems in individual rows (no usable URL, duplicate BR
//! numbers) are warnings -- the row is skipped or passed through, never the
//! reason the run aborts.

use crate::error::{Result, SourceError};
use crate::types::{DownloadRequest, RequestId};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Column holding the BR number (row identifier)
pub const COLUMN_ID: &str = "BRnum";
/// Column holding the primary PDF URL
pub const COLUMN_PRIMARY_URL: &str = "Pdf_URL";
/// Column holding the fallback URL; the sheet may omit it entirely
pub const COLUMN_ALTERNATIVE_URL: &str = "Report HTML address";

/// CSV-backed request source
pub struct CsvRequestSource {
    path: PathBuf,
}

impl CsvRequestSource {
    /// Create a source reading from the given sheet
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the sheet and produce the ordered request sequence.
    ///
    /// Row order in the sheet is preserved. Duplicate BR numbers are passed
    /// through (the report will show one row per occurrence) and logged as a
    /// warning; rows without any usable URL are skipped and counted.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::NotFound`] when the sheet does not exist,
    /// [`SourceError::MissingColumn`] when a required column is absent, and
    /// a CSV error when the file cannot be parsed.
    pub fn requests(&self) -> Result<Vec<DownloadRequest>> {
        if !self.path.is_file() {
            return Err(SourceError::NotFound {
                path: self.path.clone(),
            }
            .into());
        }

        let mut reader = csv::Reader::from_path(&self.path)?;
        let headers = reader.headers()?.clone();
        let columns = ColumnIndices::resolve(&headers)?;

        let mut requests = Vec::new();
        let mut seen: HashSet<RequestId> = HashSet::new();
        let mut duplicates = 0usize;
        let mut skipped_no_url = 0usize;

        for (row, record) in reader.records().enumerate() {
            let record = record?;
            let id = columns.field(&record, columns.id);
            if id.is_empty() {
                tracing::warn!(row = row + 1, "Skipping row with empty BR number");
                continue;
            }

            let request = DownloadRequest {
                id: RequestId::new(id),
                primary_url: columns.optional_field(&record, Some(columns.primary_url)),
                alternative_url: columns.optional_field(&record, columns.alternative_url),
            };

            if !request.has_url() {
                skipped_no_url += 1;
                tracing::warn!(id = %request.id, row = row + 1, "Skipping row without any URL");
                continue;
            }

            if !seen.insert(request.id.clone()) {
                duplicates += 1;
                tracing::warn!(id = %request.id, row = row + 1, "Duplicate BR number in sheet");
            }

            requests.push(request);
        }

        if skipped_no_url > 0 {
            tracing::warn!(count = skipped_no_url, "Rows skipped for missing URLs");
        }
        if duplicates > 0 {
            tracing::warn!(count = duplicates, "Duplicate BR numbers passed through");
        }
        tracing::info!(
            path = %self.path.display(),
            count = requests.len(),
            "Loaded download requests from source sheet"
        );

        Ok(requests)
    }

    /// Path of the underlying sheet
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Resolved positions of the columns we read
struct ColumnIndices {
    id: usize,
    primary_url: usize,
    alternative_url: Option<usize>,
}

impl ColumnIndices {
    fn resolve(headers: &csv::StringRecord) -> std::result::Result<Self, SourceError> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);

        let id = find(COLUMN_ID).ok_or_else(|| SourceError::MissingColumn {
            column: COLUMN_ID.to_string(),
        })?;
        let primary_url = find(COLUMN_PRIMARY_URL).ok_or_else(|| SourceError::MissingColumn {
            column: COLUMN_PRIMARY_URL.to_string(),
        })?;
        let alternative_url = find(COLUMN_ALTERNATIVE_URL);

        Ok(Self {
            id,
            primary_url,
            alternative_url,
        })
    }

    fn field<'r>(&self, record: &'r csv::StringRecord, index: usize) -> &'r str {
        record.get(index).unwrap_or("").trim()
    }

    /// Read an optional cell, mapping blank strings to None
    fn optional_field(&self, record: &csv::StringRecord, index: Option<usize>) -> Option<String> {
        let index = index?;
        let value = self.field(record, index);
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    }
}
