//! Static indication taxonomy: which patient populations and clinical
//! phenotypes are valid for each disease indication.
//!
//! The catalogue is declarative data, immutable once constructed, and
//! replaceable (e.g. from JSON) without touching any controller logic.

use serde::{Deserialize, Serialize};

/// Allowed populations and phenotypes for one indication, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicationProfile {
    pub populations: Vec<String>,
    pub phenotypes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyEntry {
    pub indication: String,
    #[serde(flatten)]
    pub profile: IndicationProfile,
}

/// Ordered, immutable indication catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Taxonomy {
    entries: Vec<TaxonomyEntry>,
}

impl Taxonomy {
    pub fn new(entries: Vec<TaxonomyEntry>) -> Self {
        Self { entries }
    }

    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// The catalogue the product ships with.
    pub fn builtin() -> Self {
        fn entry(indication: &str, populations: &[&str], phenotypes: &[&str]) -> TaxonomyEntry {
            TaxonomyEntry {
                indication: indication.to_string(),
                profile: IndicationProfile {
                    populations: populations.iter().map(|s| s.to_string()).collect(),
                    phenotypes: phenotypes.iter().map(|s| s.to_string()).collect(),
                },
            }
        }

        Self::new(vec![
            entry(
                "breast_cancer",
                &["ER+", "HER2+", "Triple Negative"],
                &[
                    "Tumor Regression",
                    "Metastasis Prevention",
                    "Survival Improvement",
                ],
            ),
            entry(
                "diabetes",
                &["Type 1", "Type 2", "Gestational"],
                &[
                    "Blood Glucose Control",
                    "Insulin Sensitivity",
                    "Beta Cell Preservation",
                ],
            ),
            entry(
                "atherosclerosis",
                &["High Risk", "Post-Event", "Primary Prevention"],
                &[
                    "Plaque Regression",
                    "Inflammation Reduction",
                    "Lipid Control",
                ],
            ),
            entry(
                "prostate_cancer",
                &["Localized", "Metastatic", "Castration Resistant"],
                &[
                    "PSA Reduction",
                    "Tumor Growth Inhibition",
                    "Survival Extension",
                ],
            ),
        ])
    }

    /// Look up an indication token. Absent indications (including the empty
    /// string) are a valid state, not an error.
    pub fn profile(&self, indication: &str) -> Option<&IndicationProfile> {
        self.entries
            .iter()
            .find(|entry| entry.indication == indication)
            .map(|entry| &entry.profile)
    }

    pub fn indications(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.indication.as_str())
    }
}

/// Normalize a display label to its submission token: lowercased, each run of
/// whitespace collapsed to a single `_`. Idempotent.
pub fn normalize_token(label: &str) -> String {
    let mut token = String::with_capacity(label.len());
    let mut in_whitespace = false;
    for ch in label.trim().chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                token.push('_');
                in_whitespace = true;
            }
        } else {
            for lower in ch.to_lowercase() {
                token.push(lower);
            }
            in_whitespace = false;
        }
    }
    token
}
