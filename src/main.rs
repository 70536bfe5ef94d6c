//! pdf-dl command-line entry point.
//!
//! Thin wrapper over the library: parses flags, validates the setup, runs
//! the orchestrator, and writes the status report. Setup errors exit
//! non-zero before any dispatch; a run that starts always ends with a
//! report, even when every item failed.

use clap::Parser;
use pdf_dl::{Config, CsvRequestSource, HttpFetcher, Orchestrator, Result, RunStats, StatusReport};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Download PDF reports listed in a spreadsheet
#[derive(Debug, Parser)]
#[command(name = "pdf-dl", version, about)]
struct Cli {
    /// Path to the source spreadsheet (CSV) with report URLs
    #[arg(long, value_name = "FILE")]
    source: PathBuf,

    /// Directory where downloaded PDFs are saved
    #[arg(long, value_name = "DIR", default_value = "./downloads")]
    output: PathBuf,

    /// Directory where status reports are saved
    #[arg(long, value_name = "DIR", default_value = "./reports")]
    report: PathBuf,

    /// Maximum number of concurrent downloads
    #[arg(long, value_name = "N", default_value_t = 10)]
    max_concurrent: usize,

    /// Stop dispatching new downloads after this many successes (unbounded if omitted)
    #[arg(long, value_name = "N")]
    limit: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    timeout: u64,
}

impl Cli {
    fn into_config(self) -> Config {
        Config {
            source_path: self.source,
            output_dir: self.output,
            report_dir: self.report,
            max_concurrent: self.max_concurrent,
            limit: self.limit,
            timeout_secs: self.timeout,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli.into_config()).await {
        tracing::error!(error = %e, "Run aborted");
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<()> {
    config.validate()?;
    config.prepare_directories()?;

    let requests = CsvRequestSource::new(&config.source_path).requests()?;
    if requests.is_empty() {
        tracing::warn!("No downloadable rows found in the source sheet");
    }

    let fetcher = HttpFetcher::new(&config.output_dir, config.timeout())?;
    let orchestrator = Orchestrator::new(Arc::new(fetcher), config.max_concurrent, config.limit);
    let outcomes = orchestrator.run(requests).await;

    let report_path = StatusReport::new(&config.report_dir).write(&outcomes, chrono::Utc::now())?;

    let stats = RunStats::from_outcomes(&outcomes);
    tracing::info!(
        total = stats.total,
        success = stats.success,
        success_alternative = stats.success_alternative,
        failed = stats.failed,
        success_rate = %format!("{:.1}%", stats.success_rate() * 100.0),
        report = %report_path.display(),
        "Download run finished"
    );

    Ok(())
}
