use serde::{Deserialize, Serialize};

use medirec_knowledge::KnowledgeRecord;

/// Message returned for empty, blank or placeholder input.
pub const INVALID_INPUT_MESSAGE: &str = "Please provide valid symptoms.";

/// Predicted disease plus everything the knowledge base holds for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub disease: String,
    #[serde(flatten)]
    pub record: KnowledgeRecord,
}

/// Result of one request: either a validation message for the caller to
/// display, or a recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PredictionOutcome {
    Rejected { message: String },
    Recommended(Recommendation),
}

impl PredictionOutcome {
    pub fn rejected() -> Self {
        PredictionOutcome::Rejected {
            message: INVALID_INPUT_MESSAGE.to_string(),
        }
    }

    pub fn recommendation(&self) -> Option<&Recommendation> {
        match self {
            PredictionOutcome::Recommended(r) => Some(r),
            PredictionOutcome::Rejected { .. } => None,
        }
    }
}
