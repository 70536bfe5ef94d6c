//! Bounded-concurrency download orchestration.
//!
//! Drives the full request sequence through a sliding window of in-flight
//! fetches, enforcing two limits at once: the concurrency cap (window size)
//! and the success cap (stop dispatching once enough downloads have
//! succeeded). Requests are dispatched in input order; outcomes are
//! collected in completion order.

use crate::fetcher::Fetch;
use crate::types::{DownloadOutcome, DownloadRequest, Event, RunStats};
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Buffer size for the progress event channel. A subscriber that falls more
/// than this many events behind starts losing the oldest ones (broadcast
/// `Lagged`), so the buffer is sized generously for large sheets.
const EVENT_CHANNEL_CAPACITY: usize = 1000;

/// Drives many fetches concurrently under a concurrency cap and a success cap.
///
/// The orchestrator performs no blocking work of its own: it suspends only
/// while waiting for at least one in-flight fetch to complete. All outcome
/// bookkeeping (success counting, event emission, aggregation) happens on
/// the single coordinating task, so no shared mutable state is needed
/// beyond the fetcher itself.
pub struct Orchestrator {
    fetcher: Arc<dyn Fetch>,
    max_concurrent: usize,
    limit: Option<usize>,
    event_tx: broadcast::Sender<Event>,
}

impl Orchestrator {
    /// Create an orchestrator over the given fetch unit.
    ///
    /// `max_concurrent` is clamped to at least 1. `limit` of `None` means
    /// every request is eventually dispatched; `Some(0)` means nothing is.
    pub fn new(fetcher: Arc<dyn Fetch>, max_concurrent: usize, limit: Option<usize>) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            fetcher,
            max_concurrent: max_concurrent.max(1),
            limit,
            event_tx,
        }
    }

    /// Subscribe to progress events for runs driven by this orchestrator
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Drive `requests` to completion and return the outcome sequence.
    ///
    /// Dispatch rules:
    /// - requests are consumed in input order, never reordered;
    /// - at most `max_concurrent` fetches are in flight at any instant;
    /// - a new fetch is launched only while the successes observed so far
    ///   plus the fetches still in flight stay below the success cap, so a
    ///   run of all-successful requests produces exactly `limit` outcomes
    ///   and at most `limit` files;
    /// - fetches already in flight always run to completion and their
    ///   outcomes are included, even after the cap is reached.
    ///
    /// An empty input yields an empty output. Fetch units cannot fail by
    /// construction, so the run itself is infallible.
    pub async fn run(&self, requests: Vec<DownloadRequest>) -> Vec<DownloadOutcome> {
        let total = requests.len();
        tracing::info!(
            total,
            max_concurrent = self.max_concurrent,
            limit = ?self.limit,
            "Starting download run"
        );
        self.event_tx.send(Event::Started { total }).ok();

        let mut pending = requests.into_iter();
        let mut in_flight = FuturesUnordered::new();
        let mut outcomes: Vec<DownloadOutcome> = Vec::new();
        let mut successes = 0usize;

        loop {
            // Refill the dispatch window. Stops early when the success cap
            // would already be met by successes plus fetches in flight.
            while in_flight.len() < self.max_concurrent
                && self.may_dispatch(successes, in_flight.len())
            {
                match pending.next() {
                    Some(request) => {
                        let fetcher = Arc::clone(&self.fetcher);
                        in_flight.push(async move { fetcher.fetch(&request).await });
                    }
                    None => break,
                }
            }

            let Some(outcome) = in_flight.next().await else {
                // Nothing in flight and nothing more to dispatch
                break;
            };

            if outcome.status.is_success() {
                successes += 1;
            }
            tracing::info!(id = %outcome.id, status = %outcome.status, "Request resolved");
            self.event_tx
                .send(Event::ItemCompleted {
                    id: outcome.id.clone(),
                    status: outcome.status,
                })
                .ok();
            outcomes.push(outcome);
        }

        let stats = RunStats::from_outcomes(&outcomes);
        tracing::info!(
            total = stats.total,
            succeeded = stats.succeeded(),
            failed = stats.failed,
            "Download run complete"
        );
        self.event_tx.send(Event::Finished { stats }).ok();

        outcomes
    }

    /// Whether a new fetch may be launched given the current success count
    /// and window occupancy. In-flight fetches reserve a success slot so the
    /// cap can never be overshot when everything succeeds.
    fn may_dispatch(&self, successes: usize, in_flight: usize) -> bool {
        match self.limit {
            Some(limit) => successes + in_flight < limit,
            None => true,
        }
    }
}
