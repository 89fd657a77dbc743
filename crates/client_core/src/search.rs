//! Result ranking lifecycle: submit filters, drive the loading/empty/error
//! view states, hand ranked pairs to the result table, and re-sort on demand.

use std::sync::Arc;

use serde::Serialize;
use shared::domain::FilterSelection;
use shared::protocol::RankTargetPairsRequest;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use crate::results::{ResultTable, ScoreColumn};
use crate::transport::RankingBackend;

/// Wording shown when the ranking request fails; deliberately distinct from
/// the neutral empty-result notice.
pub const SEARCH_ERROR_NOTICE: &str =
    "An error occurred while fetching results. Please try again.";
pub const NO_RESULTS_NOTICE: &str = "No target pairs found.";

/// The notice area below the results: either a legitimate empty outcome or a
/// failed request. The two must never be conflated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultsNotice {
    Empty,
    Error { message: String },
}

impl ResultsNotice {
    pub fn message(&self) -> &str {
        match self {
            ResultsNotice::Empty => NO_RESULTS_NOTICE,
            ResultsNotice::Error { message } => message,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ResultsNotice::Error { .. })
    }
}

/// Snapshot of everything the host page binds for the search area.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchView {
    pub loading_visible: bool,
    pub results_visible: bool,
    pub notice: Option<ResultsNotice>,
    pub table: ResultTable,
}

#[derive(Debug, Clone)]
pub enum SearchEvent {
    Started { seq: u64 },
    ResultsRendered { seq: u64, count: usize },
    NoResults { seq: u64 },
    Failed { seq: u64, message: String },
    StaleResponseDiscarded { seq: u64 },
    Sorted { column: ScoreColumn },
}

struct SearchState {
    view: SearchView,
    /// Filters of the most recent submission; rows carry them into their
    /// explanation sessions.
    submitted_filters: Option<FilterSelection>,
    /// Sequence number of the most recently issued request. Responses carry
    /// the value from issue time and are discarded when it no longer matches.
    latest_seq: u64,
}

/// Owns the primary request lifecycle and the result table.
pub struct SearchController {
    backend: Arc<dyn RankingBackend>,
    state: Mutex<SearchState>,
    events: broadcast::Sender<SearchEvent>,
}

impl SearchController {
    pub fn new(backend: Arc<dyn RankingBackend>) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            backend,
            state: Mutex::new(SearchState {
                view: SearchView::default(),
                submitted_filters: None,
                latest_seq: 0,
            }),
            events,
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SearchEvent> {
        self.events.subscribe()
    }

    pub async fn view(&self) -> SearchView {
        self.state.lock().await.view.clone()
    }

    /// Filters of the last submitted search, if any.
    pub async fn submitted_filters(&self) -> Option<FilterSelection> {
        self.state.lock().await.submitted_filters.clone()
    }

    /// Submit a search. The view transitions to loading immediately; the
    /// terminal state (results, empty notice, or error notice) is applied
    /// when the response arrives, unless a newer submission has been issued
    /// in the meantime, in which case this response is discarded.
    ///
    /// All failures terminate here in the view; nothing propagates.
    pub async fn submit(&self, filters: FilterSelection) {
        let seq = {
            let mut state = self.state.lock().await;
            state.latest_seq += 1;
            state.view.loading_visible = true;
            state.view.results_visible = false;
            state.view.notice = None;
            state.view.table.clear();
            state.submitted_filters = Some(filters.clone());
            state.latest_seq
        };
        let _ = self.events.send(SearchEvent::Started { seq });
        info!(seq, "search: ranking request issued");

        let request = RankTargetPairsRequest::from(&filters);
        let outcome = self.backend.rank_target_pairs(&request).await;

        let mut state = self.state.lock().await;
        if seq != state.latest_seq {
            debug!(
                seq,
                latest = state.latest_seq,
                "search: discarding stale ranking response"
            );
            let _ = self.events.send(SearchEvent::StaleResponseDiscarded { seq });
            return;
        }

        // Loading must be gone on every settled path from here on.
        state.view.loading_visible = false;
        match outcome {
            Err(err) => {
                warn!(seq, error = %err, "search: ranking request failed");
                state.view.notice = Some(ResultsNotice::Error {
                    message: SEARCH_ERROR_NOTICE.to_string(),
                });
                let _ = self.events.send(SearchEvent::Failed {
                    seq,
                    message: err.to_string(),
                });
            }
            Ok(response) if response.target_pairs.is_empty() => {
                info!(seq, "search: ranking returned no pairs");
                state.view.notice = Some(ResultsNotice::Empty);
                let _ = self.events.send(SearchEvent::NoResults { seq });
            }
            Ok(response) => {
                let count = response.target_pairs.len();
                info!(seq, count, "search: rendering ranked pairs");
                state.view.table.render(response.target_pairs);
                state.view.results_visible = true;
                let _ = self.events.send(SearchEvent::ResultsRendered { seq, count });
            }
        }
    }

    /// Reorder the currently rendered rows by `column`, descending. Purely
    /// local; never re-issues the ranking request.
    pub async fn sort_by(&self, column: ScoreColumn) {
        let mut state = self.state.lock().await;
        state.view.table.sort_by(column);
        let _ = self.events.send(SearchEvent::Sorted { column });
    }
}

#[cfg(test)]
#[path = "tests/search_tests.rs"]
mod tests;
