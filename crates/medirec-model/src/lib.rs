//! Medirec classifier artifacts
//!
//! The classifier is an opaque, already-fitted model. This crate only knows
//! how to verify it, bind it to the feature space it was fitted against, and
//! run `predict`:
//!
//! - [`format`]: checksummed CBOR container (`MRXA`)
//! - [`artifact`]: [`ModelArtifact`] manifest carrying the index digests
//! - [`classifier`]: the [`Classifier`] trait and the linear model variants

pub mod artifact;
pub mod classifier;
pub mod format;

use std::path::PathBuf;

use medirec_index::ClassId;

pub use artifact::{uncovered_classes, ModelArtifact, ModelExport, ARTIFACT_SCHEMA_VERSION};
pub use classifier::{Classifier, LinearModel, LinearOneVsOne, LinearOneVsRest};
pub use format::{ArtifactHeader, FormatError};

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("artifact format: {0}")]
    Format(#[from] FormatError),

    #[error("malformed model: {0}")]
    Shape(String),

    #[error("feature vector has {actual} positions, model expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("model was fitted on {artifact} symptoms, index has {index}")]
    FeatureCountMismatch { artifact: usize, index: usize },

    #[error("{index} index digest mismatch: artifact {artifact}, loaded {loaded}")]
    DigestMismatch {
        index: &'static str,
        artifact: String,
        loaded: String,
    },

    #[error("model can emit classes with no disease label: {0:?}")]
    UncoveredClasses(Vec<ClassId>),

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid model export {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
