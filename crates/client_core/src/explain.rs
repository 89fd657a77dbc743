//! Explanation modal lifecycle: open in a loading state immediately, fetch
//! the explanation for one pair, and render the formatted text (or a fixed
//! failure message) when the response lands.

use std::sync::Arc;

use serde::Serialize;
use shared::protocol::ExplainRequest;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use crate::markup::MarkupPipeline;
use crate::transport::ExplanationBackend;

pub const EXPLANATION_FAILURE_NOTICE: &str =
    "Failed to generate explanation. Please try again.";

/// Context for one explanation fetch: the pair plus whatever filter context
/// the producing search carried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExplanationSession {
    pub target1: String,
    pub target2: String,
    pub indication: String,
    pub patient_population: Option<String>,
    pub clinical_phenotype: Option<String>,
}

impl ExplanationSession {
    fn to_request(&self) -> ExplainRequest {
        ExplainRequest {
            target1: self.target1.clone(),
            target2: self.target2.clone(),
            indication: self.indication.clone(),
            patient_population: self.patient_population.clone(),
            clinical_phenotype: self.clinical_phenotype.clone(),
        }
    }
}

/// Snapshot of the modal the host page binds.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExplanationModal {
    pub open: bool,
    pub loading_visible: bool,
    pub content_visible: bool,
    pub content: String,
    pub session: Option<ExplanationSession>,
}

#[derive(Debug, Clone)]
pub enum ExplanationEvent {
    Opened { seq: u64 },
    Rendered { seq: u64 },
    Failed { seq: u64, message: String },
    StaleResponseDiscarded { seq: u64 },
}

struct ExplanationState {
    modal: ExplanationModal,
    latest_seq: u64,
}

/// Owns the secondary request lifecycle and the modal state. One active
/// session at a time; a newer invocation wins over any still-pending one.
pub struct ExplanationController {
    backend: Arc<dyn ExplanationBackend>,
    pipeline: MarkupPipeline,
    state: Mutex<ExplanationState>,
    events: broadcast::Sender<ExplanationEvent>,
}

impl ExplanationController {
    pub fn new(backend: Arc<dyn ExplanationBackend>) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            backend,
            pipeline: MarkupPipeline::standard(),
            state: Mutex::new(ExplanationState {
                modal: ExplanationModal::default(),
                latest_seq: 0,
            }),
            events,
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ExplanationEvent> {
        self.events.subscribe()
    }

    pub async fn modal(&self) -> ExplanationModal {
        self.state.lock().await.modal.clone()
    }

    /// Fetch and render the explanation for `session`. The modal shows its
    /// loading state before the request is issued; content is revealed and
    /// loading hidden once the response settles, whether it succeeded or
    /// failed. A response that lost the race to a newer invocation is
    /// discarded without touching the modal.
    pub async fn explain(&self, session: ExplanationSession) {
        let seq = {
            let mut state = self.state.lock().await;
            state.latest_seq += 1;
            state.modal.open = true;
            state.modal.loading_visible = true;
            state.modal.content_visible = false;
            state.modal.content.clear();
            state.modal.session = Some(session.clone());
            state.latest_seq
        };
        let _ = self.events.send(ExplanationEvent::Opened { seq });
        info!(
            seq,
            target1 = %session.target1,
            target2 = %session.target2,
            "explain: request issued"
        );

        let request = session.to_request();
        let outcome = self.backend.explain(&request).await;

        let mut state = self.state.lock().await;
        if seq != state.latest_seq {
            debug!(
                seq,
                latest = state.latest_seq,
                "explain: discarding stale explanation response"
            );
            let _ = self
                .events
                .send(ExplanationEvent::StaleResponseDiscarded { seq });
            return;
        }

        match outcome {
            Ok(response) => {
                state.modal.content = self.pipeline.apply(&response.explanation);
                let _ = self.events.send(ExplanationEvent::Rendered { seq });
            }
            Err(err) => {
                warn!(seq, error = %err, "explain: request failed");
                state.modal.content = EXPLANATION_FAILURE_NOTICE.to_string();
                let _ = self.events.send(ExplanationEvent::Failed {
                    seq,
                    message: err.to_string(),
                });
            }
        }

        // Symmetric cleanup: content revealed, loading hidden, on both paths.
        state.modal.loading_visible = false;
        state.modal.content_visible = true;
    }

    pub async fn close(&self) {
        let mut state = self.state.lock().await;
        state.modal = ExplanationModal::default();
    }
}

#[cfg(test)]
#[path = "tests/explain_tests.rs"]
mod tests;
