//! Medirec feature space
//!
//! The fixed vocabularies the classifier is bound to, and the encoder that
//! maps user-supplied symptom tokens onto it:
//!
//! - [`SymptomIndex`]: symptom token → feature position
//! - [`DiseaseLabelIndex`]: class id → disease display name
//! - [`FeatureEncoder`]: symptom tokens → [`FeatureVector`]
//!
//! Both indices are built once and never mutated; share them by reference.

pub mod catalog;
pub mod digest;
pub mod encoder;
pub mod label;
pub mod symptom;

use std::path::PathBuf;

pub use encoder::{EncodeReport, FeatureEncoder, FeatureVector};
pub use label::DiseaseLabelIndex;
pub use symptom::SymptomIndex;

/// Numeric class identifier emitted by a classifier.
pub type ClassId = u32;

#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("{0} has no entries")]
    Empty(&'static str),

    #[error("empty name for key {key}")]
    EmptyName { key: String },

    #[error("duplicate name: {0:?}")]
    DuplicateName(String),

    #[error("duplicate class id: {0}")]
    DuplicateClass(ClassId),

    #[error("position {position} assigned to both {first:?} and {second:?}")]
    DuplicatePosition {
        position: usize,
        first: String,
        second: String,
    },

    #[error("positions are not contiguous: {missing} is missing")]
    PositionGap { missing: usize },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid index JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
