//! Fetch unit: resolves one request into one outcome.
//!
//! A fetch tries the primary URL, falls back to the alternative, validates
//! the response content type, and persists the body. Every failure mode
//! (transport error, timeout, non-2xx status, wrong content type, save I/O
//! error) is absorbed here and reported as a `Failed` outcome -- a fetch
//! never propagates an error to the orchestrator, so one bad URL cannot
//! abort a batch.

use crate::error::Result;
use crate::types::{DownloadOutcome, DownloadRequest, RequestId, Status};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::CONTENT_TYPE;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Content type a response must carry to be accepted as a PDF
const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Resolves exactly one [`DownloadRequest`] into exactly one [`DownloadOutcome`].
///
/// Implementations must not fail past their own boundary: the return type is
/// the outcome itself, so the orchestrator's fan-in logic needs no error
/// handling.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Resolve `request` to an outcome, writing at most one file as a side effect
    async fn fetch(&self, request: &DownloadRequest) -> DownloadOutcome;
}

/// HTTP-backed fetch unit.
///
/// The reqwest client (and its connection pool) is shared across all
/// concurrent fetches in a run. The configured timeout applies to each
/// attempt independently, so primary and alternative each get the full
/// budget.
pub struct HttpFetcher {
    client: reqwest::Client,
    output_dir: PathBuf,
}

impl HttpFetcher {
    /// Create a fetcher writing into `output_dir` with the given per-attempt timeout.
    ///
    /// # Errors
    ///
    /// Returns a network error if the HTTP client cannot be constructed.
    pub fn new(output_dir: impl Into<PathBuf>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            output_dir: output_dir.into(),
        })
    }

    /// Deterministic output path for a request: `{output_dir}/{id}.pdf`
    pub fn output_path(&self, id: &RequestId) -> PathBuf {
        self.output_dir.join(format!("{id}.pdf"))
    }

    /// Attempt a single GET against `url`, validating status and content type.
    ///
    /// Returns the body bytes on success, or a human-readable cause string on
    /// any failure. A 200 response with a non-PDF content type is a failure:
    /// a server returning an error page must not be saved as a PDF.
    async fn try_fetch(&self, url: &str) -> std::result::Result<Vec<u8>, String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| describe_request_error(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("{url}: HTTP {status}"));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();
        if !content_type.contains(PDF_CONTENT_TYPE) {
            return Err(format!(
                "{url}: non-PDF content type '{content_type}'"
            ));
        }

        response
            .bytes()
            .await
            .map(|bytes| bytes.to_vec())
            .map_err(|e| format!("{url}: failed to read body: {e}"))
    }

    /// Persist a successfully fetched document
    async fn save(&self, path: &Path, content: &[u8]) -> std::result::Result<(), String> {
        tokio::fs::write(path, content)
            .await
            .map_err(|e| format!("failed to save {}: {e}", path.display()))
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, request: &DownloadRequest) -> DownloadOutcome {
        let mut causes: Vec<String> = Vec::new();
        let mut resolved: Option<(Status, Vec<u8>)> = None;

        if let Some(url) = non_empty(&request.primary_url) {
            match self.try_fetch(url).await {
                Ok(content) => resolved = Some((Status::Success, content)),
                Err(cause) => {
                    tracing::debug!(id = %request.id, %cause, "Primary URL failed");
                    causes.push(cause);
                }
            }
        }

        if resolved.is_none()
            && let Some(url) = non_empty(&request.alternative_url)
        {
            match self.try_fetch(url).await {
                Ok(content) => resolved = Some((Status::SuccessAlternative, content)),
                Err(cause) => {
                    tracing::debug!(id = %request.id, %cause, "Alternative URL failed");
                    causes.push(cause);
                }
            }
        }

        let (status, error_message) = match resolved {
            Some((status, content)) => {
                let path = self.output_path(&request.id);
                match self.save(&path, &content).await {
                    Ok(()) => (status, String::new()),
                    Err(cause) => {
                        tracing::warn!(id = %request.id, %cause, "Failed to persist document");
                        causes.push(cause);
                        (Status::Failed, causes.join("; "))
                    }
                }
            }
            None => {
                if causes.is_empty() {
                    causes.push("no URL available".to_string());
                }
                (Status::Failed, causes.join("; "))
            }
        };

        DownloadOutcome::new(request, status, error_message, Utc::now())
    }
}

/// Borrow a URL only when it is present and non-blank
fn non_empty(url: &Option<String>) -> Option<&str> {
    url.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Map a reqwest error to a cause string, distinguishing timeouts and
/// connection failures the way operators expect to read them in the report.
fn describe_request_error(url: &str, error: &reqwest::Error) -> String {
    if error.is_timeout() {
        format!("{url}: request timed out")
    } else if error.is_connect() {
        format!("{url}: connection failed: {error}")
    } else {
        format!("{url}: request failed: {error}")
    }
}
