//! Client-side interaction controller for the target-pair search frontend.
//!
//! Coordinates four concerns for a host page: dependent-dropdown state driven
//! by the static indication taxonomy, the asynchronous ranking-search
//! lifecycle, client-side re-sorting of rendered results, and the independent
//! explanation-modal lifecycle. No domain computation happens here; scoring
//! and explanation generation live behind the backend seams in `transport`.

use std::sync::Arc;

use shared::domain::FilterSelection;
use tokio::sync::{broadcast, Mutex};
use tracing::warn;

pub mod error;
pub mod explain;
pub mod markup;
pub mod results;
pub mod search;
pub mod selectors;
pub mod taxonomy;
pub mod transport;

pub use error::BackendError;
pub use explain::{ExplanationController, ExplanationEvent, ExplanationModal, ExplanationSession};
pub use results::{ResultRow, ResultTable, ScoreColumn, Severity};
pub use search::{ResultsNotice, SearchController, SearchEvent, SearchView};
pub use selectors::{DependentSelectors, SelectorOption, SelectorState};
pub use taxonomy::{normalize_token, Taxonomy};
pub use transport::{ExplanationBackend, HttpApiBackend, RankingBackend};

/// Everything a host page wires up: the taxonomy, both dependent selectors,
/// and the two asynchronous lifecycles.
pub struct ExplorerClient {
    taxonomy: Taxonomy,
    selectors: Mutex<DependentSelectors>,
    search: SearchController,
    explanation: ExplanationController,
}

impl ExplorerClient {
    pub fn new(
        taxonomy: Taxonomy,
        ranking: Arc<dyn RankingBackend>,
        explanation: Arc<dyn ExplanationBackend>,
    ) -> Self {
        Self {
            taxonomy,
            selectors: Mutex::new(DependentSelectors::new()),
            search: SearchController::new(ranking),
            explanation: ExplanationController::new(explanation),
        }
    }

    /// Builtin taxonomy, both contracts served over HTTP by one server.
    pub fn over_http(server_url: impl Into<String>) -> Self {
        let backend = Arc::new(HttpApiBackend::new(server_url));
        Self::new(Taxonomy::builtin(), backend.clone(), backend)
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// React to the indication dropdown changing: repopulate and
    /// enable/disable both dependent selectors. Synchronous apart from the
    /// state lock; never touches the network.
    pub async fn on_indication_changed(&self, indication: &str) {
        let mut selectors = self.selectors.lock().await;
        selectors.on_indication_changed(&self.taxonomy, indication);
    }

    pub async fn selectors(&self) -> DependentSelectors {
        self.selectors.lock().await.clone()
    }

    pub async fn submit_search(&self, filters: FilterSelection) {
        self.search.submit(filters).await;
    }

    pub async fn sort_results(&self, column: ScoreColumn) {
        self.search.sort_by(column).await;
    }

    pub async fn search_view(&self) -> SearchView {
        self.search.view().await
    }

    /// Row action trigger: fetch the explanation for the row at `index` in
    /// the currently rendered table, carrying the filters of the search that
    /// produced it. Returns false (and does nothing) when the index does not
    /// name a rendered row.
    pub async fn explain_row(&self, index: usize) -> bool {
        let session = {
            let view = self.search.view().await;
            let filters = self
                .search
                .submitted_filters()
                .await
                .unwrap_or_else(FilterSelection::default);
            view.table
                .row(index)
                .map(|row| row.explanation_session(&filters))
        };

        match session {
            Some(session) => {
                self.explanation.explain(session).await;
                true
            }
            None => {
                warn!(index, "explain: no rendered row at index");
                false
            }
        }
    }

    pub async fn explanation_modal(&self) -> ExplanationModal {
        self.explanation.modal().await
    }

    pub async fn close_explanation(&self) {
        self.explanation.close().await;
    }

    pub fn subscribe_search_events(&self) -> broadcast::Receiver<SearchEvent> {
        self.search.subscribe_events()
    }

    pub fn subscribe_explanation_events(&self) -> broadcast::Receiver<ExplanationEvent> {
        self.explanation.subscribe_events()
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
