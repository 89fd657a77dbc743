use serde::{Deserialize, Serialize};

/// The full set of filters a user can pick before submitting a search.
///
/// Every field is optional at the type level; whether the backend requires an
/// indication is its own contract, not enforced here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indication: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_population: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinical_phenotype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targeting_strategy: Option<String>,
}

impl FilterSelection {
    pub fn with_indication(indication: impl Into<String>) -> Self {
        Self {
            indication: Some(indication.into()),
            ..Self::default()
        }
    }
}

/// A ranked candidate pair of gene/protein targets with its backend-computed
/// synergy and toxicity metrics, both observed in 0.0..=1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetPair {
    pub target1: String,
    pub target2: String,
    pub synergy_score: f64,
    pub toxicity_score: f64,
}
