//! Configuration types for pdf-dl

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Run configuration: where to read requests from, where files and reports
/// go, and the two limits the orchestrator enforces.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Path to the source spreadsheet (CSV) listing report URLs
    pub source_path: PathBuf,

    /// Directory where downloaded PDFs are written (default: "./downloads")
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Directory where status reports are written (default: "./reports")
    #[serde(default = "default_report_dir")]
    pub report_dir: PathBuf,

    /// Concurrency cap: maximum fetches in flight at once (default: 10)
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// Success cap: stop dispatching new requests once this many downloads
    /// have succeeded (None = unbounded)
    #[serde(default)]
    pub limit: Option<usize>,

    /// Per-attempt request timeout in seconds (default: 30)
    ///
    /// Primary and alternative attempts each get the full timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Config {
    /// Create a configuration for the given source sheet with default limits
    pub fn new(source_path: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source_path.into(),
            output_dir: default_output_dir(),
            report_dir: default_report_dir(),
            max_concurrent: default_max_concurrent(),
            limit: None,
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Per-attempt timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate the configuration before any dispatch.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the source file does not exist,
    /// when `max_concurrent` is zero, or when the timeout is zero.
    pub fn validate(&self) -> Result<()> {
        if self.source_path.as_os_str().is_empty() {
            return Err(Error::config("source path is required", "source_path"));
        }
        if !self.source_path.is_file() {
            return Err(Error::config(
                format!("source file not found: {}", self.source_path.display()),
                "source_path",
            ));
        }
        if self.max_concurrent == 0 {
            return Err(Error::config(
                "max_concurrent must be at least 1",
                "max_concurrent",
            ));
        }
        if self.timeout_secs == 0 {
            return Err(Error::config(
                "timeout_secs must be at least 1",
                "timeout_secs",
            ));
        }
        Ok(())
    }

    /// Create the output and report directories if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when either directory cannot be created, which
    /// the caller should treat as a fatal setup failure.
    pub fn prepare_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.output_dir)?;
        std::fs::create_dir_all(&self.report_dir)?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(PathBuf::new())
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./downloads")
}

fn default_report_dir() -> PathBuf {
    PathBuf::from("./reports")
}

fn default_max_concurrent() -> usize {
    10
}

fn default_timeout_secs() -> u64 {
    30
}
