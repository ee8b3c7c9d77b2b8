//! Classifier artifacts bound to the indices they were fitted against.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use medirec_index::{ClassId, DiseaseLabelIndex, SymptomIndex};

use crate::classifier::{Classifier, LinearModel};
use crate::format::{decode_container, encode_container, ArtifactHeader};
use crate::ModelError;

/// Schema version of [`ModelArtifact`] inside the verified container.
pub const ARTIFACT_SCHEMA_VERSION: u32 = 1;

/// A fitted model exported from the training environment, before packing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelExport {
    pub name: String,
    pub model: LinearModel,
}

impl ModelExport {
    pub fn from_json_file(path: &Path) -> Result<Self, ModelError> {
        let text = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ModelError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub name: String,
    pub created_at_unix_secs: u64,
    pub feature_count: usize,
    /// Digest of the [`SymptomIndex`] the model was fitted against.
    pub symptom_index_digest: String,
    /// Digest of the [`DiseaseLabelIndex`] the model was fitted against.
    pub label_index_digest: String,
    pub model: LinearModel,
}

impl ModelArtifact {
    /// Stamp an export with the digests of the given indices. Fails if the
    /// export does not fit them.
    pub fn pack(
        export: ModelExport,
        symptoms: &SymptomIndex,
        labels: &DiseaseLabelIndex,
    ) -> Result<Self, ModelError> {
        let created_at_unix_secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let artifact = Self {
            name: export.name,
            created_at_unix_secs,
            feature_count: export.model.feature_count(),
            symptom_index_digest: symptoms.digest(),
            label_index_digest: labels.digest(),
            model: export.model,
        };
        artifact.check_compatible(symptoms, labels)?;
        Ok(artifact)
    }

    /// Validate the model shape and its binding to the loaded indices.
    pub fn check_compatible(
        &self,
        symptoms: &SymptomIndex,
        labels: &DiseaseLabelIndex,
    ) -> Result<(), ModelError> {
        self.model.validate()?;

        if self.model.feature_count() != self.feature_count {
            return Err(ModelError::Shape(format!(
                "manifest declares {} features, weights have {}",
                self.feature_count,
                self.model.feature_count()
            )));
        }
        if self.feature_count != symptoms.len() {
            return Err(ModelError::FeatureCountMismatch {
                artifact: self.feature_count,
                index: symptoms.len(),
            });
        }

        let loaded = symptoms.digest();
        if self.symptom_index_digest != loaded {
            return Err(ModelError::DigestMismatch {
                index: "symptom",
                artifact: self.symptom_index_digest.clone(),
                loaded,
            });
        }
        let loaded = labels.digest();
        if self.label_index_digest != loaded {
            return Err(ModelError::DigestMismatch {
                index: "label",
                artifact: self.label_index_digest.clone(),
                loaded,
            });
        }

        let uncovered = uncovered_classes(self.model.classes(), labels);
        if !uncovered.is_empty() {
            return Err(ModelError::UncoveredClasses(uncovered));
        }

        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ModelError> {
        Ok(encode_container(
            self,
            ARTIFACT_SCHEMA_VERSION,
            self.model.format_flags(),
        )?)
    }

    pub fn from_bytes(data: &[u8]) -> Result<(Self, ArtifactHeader), ModelError> {
        Ok(decode_container(data, ARTIFACT_SCHEMA_VERSION)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        let data = self.to_bytes()?;
        std::fs::write(path, data).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read and verify checksums. Index compatibility is checked separately
    /// with [`ModelArtifact::check_compatible`].
    pub fn load(path: &Path) -> Result<(Self, ArtifactHeader), ModelError> {
        let data = std::fs::read(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let (artifact, header) = Self::from_bytes(&data)?;
        tracing::info!(
            path = %path.display(),
            name = %artifact.name,
            kind = artifact.model.kind_name(),
            classes = artifact.model.classes().len(),
            features = artifact.feature_count,
            checksum = %header.content_checksum_hex(),
            "loaded model artifact"
        );
        Ok((artifact, header))
    }
}

/// Classes with no entry in `labels`, in model order.
pub fn uncovered_classes(classes: &[ClassId], labels: &DiseaseLabelIndex) -> Vec<ClassId> {
    classes
        .iter()
        .copied()
        .filter(|id| !labels.contains(*id))
        .collect()
}
