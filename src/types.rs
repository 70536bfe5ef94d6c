//! Core types for pdf-dl

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable identifier for one report row (the BR number in the source sheet).
///
/// Doubles as the join key between request and outcome and as the output
/// filename stem (`{id}.pdf`).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub String);

impl RequestId {
    /// Create a new RequestId
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RequestId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RequestId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One row of work: a report identifier plus one-or-two candidate URLs.
///
/// The source guarantees at least one of the URLs is present; rows with
/// neither are dropped (and counted) during parsing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadRequest {
    /// Stable row identifier, unique within a run
    pub id: RequestId,
    /// First-choice URL for the document
    pub primary_url: Option<String>,
    /// Fallback URL, tried only when the primary fails or is absent
    pub alternative_url: Option<String>,
}

impl DownloadRequest {
    /// True if the request carries at least one non-empty URL
    pub fn has_url(&self) -> bool {
        let non_empty = |u: &Option<String>| u.as_deref().is_some_and(|s| !s.trim().is_empty());
        non_empty(&self.primary_url) || non_empty(&self.alternative_url)
    }
}

/// How a single request resolved
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// The primary URL produced a valid PDF
    Success,
    /// The fallback URL produced a valid PDF
    SuccessAlternative,
    /// Both attempts failed, or no URL was available
    Failed,
}

impl Status {
    /// True for either success variant
    pub fn is_success(self) -> bool {
        matches!(self, Status::Success | Status::SuccessAlternative)
    }

    /// Machine-readable status name as written to reports
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Success => "success",
            Status::SuccessAlternative => "success_alternative",
            Status::Failed => "failed",
        }
    }

    /// Two-state display label for report consumers
    pub fn label(self) -> &'static str {
        if self.is_success() {
            "downloaded"
        } else {
            "not downloaded"
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The result of resolving one [`DownloadRequest`].
///
/// Created exactly once by the fetch unit and immutable thereafter. The
/// orchestrator owns the collection; the report sink consumes it. Outcome
/// order follows completion order, so consumers must match outcomes to
/// requests via `id`, not position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadOutcome {
    /// Identifier copied from the originating request
    pub id: RequestId,
    /// How the request resolved
    pub status: Status,
    /// Primary URL echoed for the report
    pub primary_url: Option<String>,
    /// Alternative URL echoed for the report
    pub alternative_url: Option<String>,
    /// Human-readable cause when `status` is `Failed`; empty otherwise
    pub error_message: String,
    /// When the outcome was created
    pub timestamp: DateTime<Utc>,
}

impl DownloadOutcome {
    /// Build an outcome for `request` with the given resolution.
    ///
    /// `error_message` is only retained for failed outcomes; success
    /// variants always carry an empty message.
    pub fn new(
        request: &DownloadRequest,
        status: Status,
        error_message: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let error_message = if status == Status::Failed {
            error_message.into()
        } else {
            String::new()
        };
        Self {
            id: request.id.clone(),
            status,
            primary_url: request.primary_url.clone(),
            alternative_url: request.alternative_url.clone(),
            error_message,
            timestamp,
        }
    }
}

/// Aggregated counts over one run's outcome sequence
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Total outcomes observed
    pub total: usize,
    /// Outcomes where the primary URL worked
    pub success: usize,
    /// Outcomes where the fallback URL worked
    pub success_alternative: usize,
    /// Outcomes where both attempts failed
    pub failed: usize,
}

impl RunStats {
    /// Tally outcomes into a stats summary
    pub fn from_outcomes(outcomes: &[DownloadOutcome]) -> Self {
        let mut stats = Self {
            total: outcomes.len(),
            ..Self::default()
        };
        for outcome in outcomes {
            match outcome.status {
                Status::Success => stats.success += 1,
                Status::SuccessAlternative => stats.success_alternative += 1,
                Status::Failed => stats.failed += 1,
            }
        }
        stats
    }

    /// Total successful outcomes (primary plus fallback)
    pub fn succeeded(&self) -> usize {
        self.success + self.success_alternative
    }

    /// Fraction of outcomes that succeeded, in `[0.0, 1.0]`; 0.0 for an empty run
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.succeeded() as f64 / self.total as f64
        }
    }
}

/// Progress events broadcast during a run.
///
/// Consumers subscribe via [`crate::Orchestrator::subscribe`]; events are
/// dropped silently when nobody is listening. A subscriber that stops
/// polling may lose the oldest events once the channel buffer fills
/// (`tokio::sync::broadcast` lagging semantics); the outcome sequence
/// returned by the run is always complete regardless.
#[derive(Clone, Debug)]
pub enum Event {
    /// A batch run has started
    Started {
        /// Number of requests queued for dispatch
        total: usize,
    },
    /// One request has resolved to an outcome
    ItemCompleted {
        /// Identifier of the resolved request
        id: RequestId,
        /// How it resolved
        status: Status,
    },
    /// The run has drained; no more events will follow
    Finished {
        /// Final counts for the run
        stats: RunStats,
    },
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn request(id: &str, primary: Option<&str>, alternative: Option<&str>) -> DownloadRequest {
        DownloadRequest {
            id: RequestId::new(id),
            primary_url: primary.map(String::from),
            alternative_url: alternative.map(String::from),
        }
    }

    #[test]
    fn status_success_variants_are_success() {
        assert!(Status::Success.is_success());
        assert!(Status::SuccessAlternative.is_success());
        assert!(!Status::Failed.is_success());
    }

    #[test]
    fn status_labels_are_two_state() {
        assert_eq!(Status::Success.label(), "downloaded");
        assert_eq!(Status::SuccessAlternative.label(), "downloaded");
        assert_eq!(Status::Failed.label(), "not downloaded");
    }

    #[test]
    fn status_as_str_matches_report_vocabulary() {
        assert_eq!(Status::Success.as_str(), "success");
        assert_eq!(Status::SuccessAlternative.as_str(), "success_alternative");
        assert_eq!(Status::Failed.as_str(), "failed");
    }

    #[test]
    fn request_has_url_ignores_blank_strings() {
        assert!(request("BR1", Some("http://a"), None).has_url());
        assert!(request("BR1", None, Some("http://b")).has_url());
        assert!(!request("BR1", None, None).has_url());
        assert!(!request("BR1", Some("   "), Some("")).has_url());
    }

    #[test]
    fn outcome_clears_error_message_on_success() {
        let req = request("BR42", Some("http://a"), None);
        let outcome = DownloadOutcome::new(&req, Status::Success, "stale cause", Utc::now());
        assert!(outcome.error_message.is_empty());

        let outcome = DownloadOutcome::new(&req, Status::Failed, "connection refused", Utc::now());
        assert_eq!(outcome.error_message, "connection refused");
    }

    #[test]
    fn outcome_echoes_request_urls() {
        let req = request("BR7", Some("http://a"), Some("http://b"));
        let outcome = DownloadOutcome::new(&req, Status::SuccessAlternative, "", Utc::now());
        assert_eq!(outcome.id, RequestId::new("BR7"));
        assert_eq!(outcome.primary_url.as_deref(), Some("http://a"));
        assert_eq!(outcome.alternative_url.as_deref(), Some("http://b"));
    }

    #[test]
    fn run_stats_tallies_by_status() {
        let requests = [
            request("BR1", Some("http://a"), None),
            request("BR2", Some("http://a"), Some("http://b")),
            request("BR3", Some("http://a"), None),
            request("BR4", Some("http://a"), None),
        ];
        let outcomes = vec![
            DownloadOutcome::new(&requests[0], Status::Success, "", Utc::now()),
            DownloadOutcome::new(&requests[1], Status::SuccessAlternative, "", Utc::now()),
            DownloadOutcome::new(&requests[2], Status::Failed, "timeout", Utc::now()),
            DownloadOutcome::new(&requests[3], Status::Success, "", Utc::now()),
        ];

        let stats = RunStats::from_outcomes(&outcomes);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.success, 2);
        assert_eq!(stats.success_alternative, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.succeeded(), 3);
        assert!((stats.success_rate() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn run_stats_empty_run_has_zero_rate() {
        let stats = RunStats::from_outcomes(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.success_rate(), 0.0);
    }
}
