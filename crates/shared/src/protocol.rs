use serde::{Deserialize, Serialize};

use crate::domain::{FilterSelection, TargetPair};

/// Body of `POST /api/rank_target_pairs`.
///
/// All fields are plain string tokens; an unset filter travels as the empty
/// string rather than being omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankTargetPairsRequest {
    pub indication: String,
    pub patient_population: String,
    pub clinical_phenotype: String,
    pub targeting_strategy: String,
}

impl From<FilterSelection> for RankTargetPairsRequest {
    fn from(filters: FilterSelection) -> Self {
        Self {
            indication: filters.indication.unwrap_or_default(),
            patient_population: filters.patient_population.unwrap_or_default(),
            clinical_phenotype: filters.clinical_phenotype.unwrap_or_default(),
            targeting_strategy: filters.targeting_strategy.unwrap_or_default(),
        }
    }
}

impl From<&FilterSelection> for RankTargetPairsRequest {
    fn from(filters: &FilterSelection) -> Self {
        filters.clone().into()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankTargetPairsResponse {
    pub target_pairs: Vec<TargetPair>,
}

/// Body of `POST /api/explain`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplainRequest {
    pub target1: String,
    pub target2: String,
    pub indication: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_population: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinical_phenotype: Option<String>,
}

/// Response of `POST /api/explain`; the explanation text carries the
/// lightweight markup dialect the client formats for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainResponse {
    pub explanation: String,
}
