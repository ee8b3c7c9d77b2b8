//! Medirec prediction engine
//!
//! Turns a comma-separated symptom string into a disease prediction and the
//! matching recommendation (description, precautions, medications, diets,
//! workouts).
//!
//! ```text
//!  raw input ──► validate ──► FeatureEncoder ──► Classifier ──► DiseaseLabelIndex
//!                   │                                                   │
//!                   ▼                                                   ▼
//!            "Please provide                               RecommendationAggregator
//!             valid symptoms."                                          │
//!                                                                       ▼
//!                                                              Recommendation
//! ```
//!
//! Everything is loaded once by [`PredictionService::load`] and is read-only
//! afterwards; requests share the service without locking.

pub mod config;
pub mod outcome;
pub mod service;

use std::path::PathBuf;

use medirec_index::{ClassId, IndexError};
use medirec_knowledge::KnowledgeError;
use medirec_model::ModelError;

pub use config::{EngineConfig, DEFAULT_INPUT_SENTINEL};
pub use outcome::{PredictionOutcome, Recommendation, INVALID_INPUT_MESSAGE};
pub use service::{split_symptoms, PredictionService};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Knowledge(#[from] KnowledgeError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The classifier and the label index are out of sync.
    #[error("classifier emitted class {class_id}, which has no disease label")]
    UnknownClass { class_id: ClassId },
}
