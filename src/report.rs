//! Status report generation.
//!
//! Renders one CSV report per run summarizing every processed request. Row
//! content is a pure function of the outcome sequence, so rendering the same
//! outcomes twice produces identical rows; only the timestamp in the
//! filename differs between invocations.

use crate::error::Result;
use crate::types::{DownloadOutcome, RunStats};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// Header row of the status report
pub const REPORT_COLUMNS: [&str; 7] = [
    "BRnum",
    "Status",
    "Downloaded",
    "Primary URL",
    "Alternative URL",
    "Error Message",
    "Timestamp",
];

/// CSV status report writer
pub struct StatusReport {
    report_dir: PathBuf,
}

impl StatusReport {
    /// Create a report sink writing into `report_dir`
    pub fn new(report_dir: impl Into<PathBuf>) -> Self {
        Self {
            report_dir: report_dir.into(),
        }
    }

    /// Filename for a report generated at `at`
    pub fn filename(at: DateTime<Utc>) -> String {
        format!("download_status_{}.csv", at.format("%Y%m%d_%H%M%S"))
    }

    /// Render `outcomes` to a timestamped CSV report and return its path.
    ///
    /// An empty outcome sequence produces a header-only report. Outcomes are
    /// written in the order given (completion order); consumers join back to
    /// the source sheet via the BRnum column, not by position.
    ///
    /// # Errors
    ///
    /// Returns an error when the report directory cannot be created or the
    /// file cannot be written.
    pub fn write(&self, outcomes: &[DownloadOutcome], at: DateTime<Utc>) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.report_dir)?;
        let path = self.report_dir.join(Self::filename(at));

        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(REPORT_COLUMNS)?;
        for outcome in outcomes {
            let timestamp = outcome.timestamp.format("%Y-%m-%d %H:%M:%S").to_string();
            writer.write_record([
                outcome.id.as_str(),
                outcome.status.as_str(),
                outcome.status.label(),
                outcome.primary_url.as_deref().unwrap_or(""),
                outcome.alternative_url.as_deref().unwrap_or(""),
                outcome.error_message.as_str(),
                timestamp.as_str(),
            ])?;
        }
        writer.flush()?;

        let stats = RunStats::from_outcomes(outcomes);
        tracing::info!(
            path = %path.display(),
            rows = stats.total,
            succeeded = stats.succeeded(),
            failed = stats.failed,
            "Status report generated"
        );

        Ok(path)
    }

    /// Directory reports are written into
    pub fn report_dir(&self) -> &Path {
        &self.report_dir
    }
}
