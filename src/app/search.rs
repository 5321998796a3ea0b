//! Debounced catalog search.
//!
//! [`SearchDebouncer`] turns a stream of raw query edits into at most one
//! outbound catalog lookup per quiet period. It performs no IO itself: each
//! call returns a step describing what the runtime should do, and the runtime
//! reports timer expiry and lookup completion back with the ticket it was
//! given.
//!
//! # Ticket protocol
//!
//! ```text
//! observe("Du")   → Scheduled(#1)
//! observe("Dun")  → Scheduled(#2)        #1 superseded
//! elapsed(#1)     → None                 stale window, ignored
//! elapsed(#2)     → Some("Dun")          lookup #2 in flight, searching = true
//! complete(#2, ..)→ results replaced     searching = false
//! ```
//!
//! Any completion whose ticket is not the one currently in flight is dropped,
//! so a slow response can never overwrite results produced for a newer query.

use crate::domain::{CatalogResult, RemoteError};
use std::time::Duration;

/// Identifies one debounce window and the lookup it may turn into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SearchTicket(pub u64);

/// What the runtime should do after [`SearchDebouncer::observe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStep {
    /// No lookup: drop any pending window and in-flight lookup.
    Cleared,
    /// Start a window of `delay`; report expiry with `ticket`.
    Scheduled { ticket: SearchTicket, delay: Duration },
}

/// Outcome of feeding a lookup completion back into the debouncer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchCompletion {
    /// The completion belonged to a superseded lookup and was discarded.
    Stale,
    /// Results were replaced with the lookup's response.
    Applied,
    /// The lookup failed; results were emptied. The failure is best-effort
    /// information for the observability sink only.
    Failed(RemoteError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingWindow {
    ticket: SearchTicket,
    query: String,
}

/// Debounces query edits into catalog lookups with stale-result suppression.
#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    delay: Duration,
    min_query_len: usize,
    next_ticket: u64,
    pending: Option<PendingWindow>,
    in_flight: Option<SearchTicket>,
    searching: bool,
    results: Vec<CatalogResult>,
}

impl SearchDebouncer {
    #[must_use]
    pub const fn new(delay: Duration, min_query_len: usize) -> Self {
        Self {
            delay,
            min_query_len,
            next_ticket: 0,
            pending: None,
            in_flight: None,
            searching: false,
            results: Vec::new(),
        }
    }

    /// Observes a new raw query.
    ///
    /// Queries shorter than the minimum length (in characters), or any query
    /// while `searchable` is false (edit mode, or a book already selected),
    /// clear the results without a remote call. Otherwise a new window is
    /// scheduled and every older window or in-flight lookup is superseded.
    pub fn observe(&mut self, raw_query: &str, searchable: bool) -> SearchStep {
        self.pending = None;
        self.in_flight = None;
        self.searching = false;

        if !searchable || raw_query.chars().count() < self.min_query_len {
            tracing::trace!(query_len = raw_query.len(), searchable, "query below search threshold");
            self.results.clear();
            return SearchStep::Cleared;
        }

        self.next_ticket += 1;
        let ticket = SearchTicket(self.next_ticket);
        self.pending = Some(PendingWindow {
            ticket,
            query: raw_query.to_string(),
        });

        tracing::trace!(ticket = ticket.0, "search window scheduled");
        SearchStep::Scheduled {
            ticket,
            delay: self.delay,
        }
    }

    /// Reports that the window for `ticket` elapsed.
    ///
    /// Returns the query to send if the window is still current; the lookup
    /// is then in flight and `searching` is set.
    pub fn window_elapsed(&mut self, ticket: SearchTicket) -> Option<String> {
        match self.pending.take() {
            Some(window) if window.ticket == ticket => {
                self.in_flight = Some(ticket);
                self.searching = true;
                Some(window.query)
            }
            other => {
                tracing::trace!(ticket = ticket.0, "ignoring superseded search window");
                self.pending = other;
                None
            }
        }
    }

    /// Feeds a lookup completion back in. Only the in-flight ticket is applied.
    pub fn complete(
        &mut self,
        ticket: SearchTicket,
        outcome: Result<Vec<CatalogResult>, RemoteError>,
    ) -> SearchCompletion {
        if self.in_flight != Some(ticket) {
            tracing::debug!(ticket = ticket.0, "discarding stale search response");
            return SearchCompletion::Stale;
        }

        self.in_flight = None;
        self.searching = false;

        match outcome {
            Ok(results) => {
                tracing::debug!(ticket = ticket.0, result_count = results.len(), "search results applied");
                self.results = results;
                SearchCompletion::Applied
            }
            Err(error) => {
                self.results.clear();
                SearchCompletion::Failed(error)
            }
        }
    }

    /// Drops any pending window, any in-flight lookup, and the shown results.
    pub fn reset(&mut self) {
        self.pending = None;
        self.in_flight = None;
        self.searching = false;
        self.results.clear();
    }

    #[must_use]
    pub fn results(&self) -> &[CatalogResult] {
        &self.results
    }

    /// `true` while a lookup is in flight.
    #[must_use]
    pub const fn is_searching(&self) -> bool {
        self.searching
    }
}
