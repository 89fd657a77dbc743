//! Render/sort engine for the ranked result table.
//!
//! The table owns the current result list exclusively: it is replaced
//! wholesale on a new response and reordered in place on a header click;
//! individual rows are never edited.

use std::cmp::Ordering;

use serde::Serialize;
use shared::domain::{FilterSelection, TargetPair};

use crate::explain::ExplanationSession;

/// Severity bucket for a score cell, from the fixed threshold policy:
/// `>= 0.7` high, `>= 0.4` medium, otherwise low. Lower bounds inclusive,
/// same policy for both score columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn grade(score: f64) -> Self {
        if score >= 0.7 {
            Severity::High
        } else if score >= 0.4 {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    /// CSS class the host page attaches to the score cell.
    pub fn class_name(self) -> &'static str {
        match self {
            Severity::High => "score-high",
            Severity::Medium => "score-medium",
            Severity::Low => "score-low",
        }
    }
}

/// Sortable numeric columns. `from_key` accepts the header keys the host
/// page exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreColumn {
    Synergy,
    Toxicity,
}

impl ScoreColumn {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "synergy" => Some(ScoreColumn::Synergy),
            "toxicity" => Some(ScoreColumn::Toxicity),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    pub target1: String,
    pub target2: String,
    pub synergy_score: f64,
    pub toxicity_score: f64,
    pub synergy_severity: Severity,
    pub toxicity_severity: Severity,
}

impl ResultRow {
    fn from_pair(pair: TargetPair) -> Self {
        Self {
            synergy_severity: Severity::grade(pair.synergy_score),
            toxicity_severity: Severity::grade(pair.toxicity_score),
            target1: pair.target1,
            target2: pair.target2,
            synergy_score: pair.synergy_score,
            toxicity_score: pair.toxicity_score,
        }
    }

    pub fn score(&self, column: ScoreColumn) -> f64 {
        match column {
            ScoreColumn::Synergy => self.synergy_score,
            ScoreColumn::Toxicity => self.toxicity_score,
        }
    }

    /// Label of the pair cell, e.g. `EGFR + MET`.
    pub fn pair_label(&self) -> String {
        format!("{} + {}", self.target1, self.target2)
    }

    /// Build the explanation context this row's action trigger submits,
    /// combining the pair with the filters of the search that produced it.
    pub fn explanation_session(&self, filters: &FilterSelection) -> ExplanationSession {
        ExplanationSession {
            target1: self.target1.clone(),
            target2: self.target2.clone(),
            indication: filters.indication.clone().unwrap_or_default(),
            patient_population: filters.patient_population.clone(),
            clinical_phenotype: filters.clinical_phenotype.clone(),
        }
    }
}

/// The displayed row set for the current search session.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultTable {
    rows: Vec<ResultRow>,
}

impl ResultTable {
    /// Replace the displayed rows with a fresh response, in response order.
    pub fn render(&mut self, pairs: Vec<TargetPair>) {
        self.rows = pairs.into_iter().map(ResultRow::from_pair).collect();
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Reorder rows descending by `column`. Stable, so ties keep their
    /// relative response order. No re-fetch, no content changes.
    pub fn sort_by(&mut self, column: ScoreColumn) {
        self.rows.sort_by(|a, b| {
            b.score(column)
                .partial_cmp(&a.score(column))
                .unwrap_or(Ordering::Equal)
        });
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&ResultRow> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
