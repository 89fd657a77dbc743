use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use shared::domain::TargetPair;
use shared::protocol::{RankTargetPairsRequest, RankTargetPairsResponse};
use tokio::sync::{Mutex as TokioMutex, Notify};

use super::*;
use crate::transport::MissingRankingBackend;

fn pair(t1: &str, t2: &str, synergy: f64, toxicity: f64) -> TargetPair {
    TargetPair {
        target1: t1.to_string(),
        target2: t2.to_string(),
        synergy_score: synergy,
        toxicity_score: toxicity,
    }
}

/// Returns the same pairs on every call and counts how many requests it
/// served.
struct StaticRankingBackend {
    pairs: Vec<TargetPair>,
    calls: AtomicUsize,
}

impl StaticRankingBackend {
    fn new(pairs: Vec<TargetPair>) -> Self {
        Self {
            pairs,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl RankingBackend for StaticRankingBackend {
    async fn rank_target_pairs(
        &self,
        _request: &RankTargetPairsRequest,
    ) -> crate::error::Result<RankTargetPairsResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(RankTargetPairsResponse {
            target_pairs: self.pairs.clone(),
        })
    }
}

struct ScriptEntry {
    gate: Option<Arc<Notify>>,
    delay: Duration,
    pairs: Vec<TargetPair>,
}

impl ScriptEntry {
    fn immediate(pairs: Vec<TargetPair>) -> Self {
        Self {
            gate: None,
            delay: Duration::ZERO,
            pairs,
        }
    }

    fn delayed(delay: Duration, pairs: Vec<TargetPair>) -> Self {
        Self {
            gate: None,
            delay,
            pairs,
        }
    }

    fn gated(gate: Arc<Notify>, pairs: Vec<TargetPair>) -> Self {
        Self {
            gate: Some(gate),
            delay: Duration::ZERO,
            pairs,
        }
    }
}

/// Serves one scripted response per call, in call order.
struct ScriptedRankingBackend {
    script: TokioMutex<VecDeque<ScriptEntry>>,
}

impl ScriptedRankingBackend {
    fn new(entries: Vec<ScriptEntry>) -> Self {
        Self {
            script: TokioMutex::new(entries.into()),
        }
    }
}

#[async_trait]
impl RankingBackend for ScriptedRankingBackend {
    async fn rank_target_pairs(
        &self,
        _request: &RankTargetPairsRequest,
    ) -> crate::error::Result<RankTargetPairsResponse> {
        let entry = self
            .script
            .lock()
            .await
            .pop_front()
            .expect("unscripted ranking call");
        if let Some(gate) = entry.gate {
            gate.notified().await;
        }
        if entry.delay > Duration::ZERO {
            tokio::time::sleep(entry.delay).await;
        }
        Ok(RankTargetPairsResponse {
            target_pairs: entry.pairs,
        })
    }
}

fn filters() -> FilterSelection {
    FilterSelection::with_indication("breast_cancer")
}

#[tokio::test]
async fn successful_search_renders_rows_and_reveals_results() {
    let backend = Arc::new(StaticRankingBackend::new(vec![
        pair("EGFR", "MET", 0.82, 0.31),
        pair("KRAS", "TP53", 0.55, 0.72),
    ]));
    let controller = SearchController::new(backend);
    let mut events = controller.subscribe_events();

    controller.submit(filters()).await;

    let view = controller.view().await;
    assert!(!view.loading_visible);
    assert!(view.results_visible);
    assert!(view.notice.is_none());
    assert_eq!(view.table.len(), 2);
    assert_eq!(view.table.rows()[0].pair_label(), "EGFR + MET");
    assert_eq!(view.table.rows()[1].pair_label(), "KRAS + TP53");

    assert!(matches!(
        events.recv().await.expect("event"),
        SearchEvent::Started { seq: 1 }
    ));
    assert!(matches!(
        events.recv().await.expect("event"),
        SearchEvent::ResultsRendered { seq: 1, count: 2 }
    ));
}

#[tokio::test]
async fn empty_response_shows_neutral_notice() {
    let controller = SearchController::new(Arc::new(StaticRankingBackend::new(Vec::new())));

    controller.submit(filters()).await;

    let view = controller.view().await;
    assert!(!view.loading_visible);
    assert!(!view.results_visible);
    assert!(view.table.is_empty());
    let notice = view.notice.expect("notice");
    assert!(!notice.is_error());
    assert_eq!(notice.message(), NO_RESULTS_NOTICE);
    assert!(!notice.message().to_lowercase().contains("error"));
}

#[tokio::test]
async fn failed_request_shows_error_notice_and_hides_loading() {
    let controller = SearchController::new(Arc::new(MissingRankingBackend));
    let mut events = controller.subscribe_events();

    controller.submit(filters()).await;

    let view = controller.view().await;
    assert!(!view.loading_visible);
    assert!(!view.results_visible);
    assert!(view.table.is_empty());
    let notice = view.notice.expect("notice");
    assert!(notice.is_error());
    assert_eq!(notice.message(), SEARCH_ERROR_NOTICE);

    assert!(matches!(
        events.recv().await.expect("event"),
        SearchEvent::Started { .. }
    ));
    assert!(matches!(
        events.recv().await.expect("event"),
        SearchEvent::Failed { .. }
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn submission_enters_loading_state_and_clears_prior_rows() {
    let gate = Arc::new(Notify::new());
    let backend = Arc::new(ScriptedRankingBackend::new(vec![
        ScriptEntry::immediate(vec![pair("A", "B", 0.9, 0.1)]),
        ScriptEntry::gated(gate.clone(), vec![pair("C", "D", 0.5, 0.5)]),
    ]));
    let controller = Arc::new(SearchController::new(backend));

    controller.submit(filters()).await;
    assert_eq!(controller.view().await.table.len(), 1);

    // Second request stays in flight; inspect the view mid-flight.
    let in_flight = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.submit(filters()).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    let view = controller.view().await;
    assert!(view.loading_visible);
    assert!(!view.results_visible);
    assert!(view.notice.is_none());
    assert!(view.table.is_empty(), "prior rows must be cleared on submit");

    gate.notify_one();
    in_flight.await.expect("join");

    let view = controller.view().await;
    assert!(!view.loading_visible);
    assert!(view.results_visible);
    assert_eq!(view.table.rows()[0].pair_label(), "C + D");
}

#[tokio::test(flavor = "multi_thread")]
async fn last_issued_search_wins_when_responses_arrive_out_of_order() {
    let backend = Arc::new(ScriptedRankingBackend::new(vec![
        ScriptEntry::delayed(Duration::from_millis(200), vec![pair("OLD", "OLD", 0.1, 0.1)]),
        ScriptEntry::immediate(vec![pair("NEW", "NEW", 0.9, 0.9)]),
    ]));
    let controller = Arc::new(SearchController::new(backend));
    let mut events = controller.subscribe_events();

    let first = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.submit(filters()).await })
    };
    // Make sure the first request is issued before the second.
    tokio::time::sleep(Duration::from_millis(50)).await;
    let second = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.submit(filters()).await })
    };

    second.await.expect("join");
    first.await.expect("join");

    let view = controller.view().await;
    assert!(view.results_visible);
    assert!(!view.loading_visible);
    assert_eq!(view.table.len(), 1);
    assert_eq!(
        view.table.rows()[0].pair_label(),
        "NEW + NEW",
        "the last-issued search owns the displayed results"
    );

    let mut saw_stale_discard = false;
    while let Ok(event) = events.try_recv() {
        if matches!(event, SearchEvent::StaleResponseDiscarded { seq: 1 }) {
            saw_stale_discard = true;
        }
    }
    assert!(saw_stale_discard, "first response must be discarded as stale");
}

#[tokio::test]
async fn sort_reorders_descending_without_refetching() {
    let backend = Arc::new(StaticRankingBackend::new(vec![
        pair("A", "B", 0.3, 0.6),
        pair("C", "D", 0.9, 0.1),
        pair("E", "F", 0.6, 0.9),
    ]));
    let controller = SearchController::new(backend.clone());
    controller.submit(filters()).await;

    controller.sort_by(ScoreColumn::Synergy).await;
    let view = controller.view().await;
    let synergies: Vec<f64> = view.table.rows().iter().map(|r| r.synergy_score).collect();
    assert_eq!(synergies, vec![0.9, 0.6, 0.3]);

    controller.sort_by(ScoreColumn::Toxicity).await;
    let view = controller.view().await;
    let toxicities: Vec<f64> = view.table.rows().iter().map(|r| r.toxicity_score).collect();
    assert_eq!(toxicities, vec![0.9, 0.6, 0.1]);

    assert_eq!(
        backend.calls.load(Ordering::SeqCst),
        1,
        "sorting must not re-issue the ranking request"
    );
}

#[tokio::test]
async fn submitted_filters_are_remembered_for_row_context() {
    let controller = SearchController::new(Arc::new(StaticRankingBackend::new(Vec::new())));
    assert!(controller.submitted_filters().await.is_none());

    let submitted = FilterSelection {
        indication: Some("diabetes".to_string()),
        patient_population: Some("type_1".to_string()),
        clinical_phenotype: Some("blood_glucose_control".to_string()),
        targeting_strategy: Some("x".to_string()),
    };
    controller.submit(submitted.clone()).await;
    assert_eq!(controller.submitted_filters().await, Some(submitted));
}
