//! # pdf-dl
//!
//! Bulk PDF report downloader: reads report URLs from a spreadsheet, fetches
//! them concurrently under a configurable concurrency cap and success cap,
//! and emits a per-item status report.
//!
//! ## Design Philosophy
//!
//! pdf-dl is designed to be:
//! - **Failure-isolating** - One bad URL never aborts the rest of the batch;
//!   every request resolves to exactly one outcome
//! - **Bounded** - A sliding dispatch window caps in-flight fetches, and an
//!   optional success cap stops dispatch once enough downloads have landed
//! - **Library-first** - The CLI binary is a thin wrapper; the orchestrator,
//!   fetch unit, source, and report sink are embeddable
//! - **Event-driven** - Consumers subscribe to run progress, no polling
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdf_dl::{CsvRequestSource, HttpFetcher, Orchestrator, StatusReport};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let requests = CsvRequestSource::new("reports.csv").requests()?;
//!
//!     let fetcher = HttpFetcher::new("downloads", Duration::from_secs(30))?;
//!     let orchestrator = Orchestrator::new(Arc::new(fetcher), 10, Some(50));
//!     let outcomes = orchestrator.run(requests).await;
//!
//!     StatusReport::new("reports").write(&outcomes, chrono::Utc::now())?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Fetch unit: single-request resolution, validation, persistence
pub mod fetcher;
/// Bounded-concurrency download orchestration
pub mod orchestrator;
/// Status report generation
pub mod report;
/// Spreadsheet-backed request source
pub mod source;
/// Core types and events
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result, SourceError};
pub use fetcher::{Fetch, HttpFetcher};
pub use orchestrator::Orchestrator;
pub use report::StatusReport;
pub use source::CsvRequestSource;
pub use types::{DownloadOutcome, DownloadRequest, Event, RequestId, RunStats, Status};
