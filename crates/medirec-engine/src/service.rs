//! The request pipeline: validate → encode → predict → label → aggregate.

use medirec_index::{DiseaseLabelIndex, FeatureEncoder, SymptomIndex};
use medirec_knowledge::{KnowledgeBase, RecommendationAggregator};
use medirec_model::{uncovered_classes, Classifier, ModelArtifact, ModelError};

use crate::config::{EngineConfig, DEFAULT_INPUT_SENTINEL};
use crate::outcome::{PredictionOutcome, Recommendation};
use crate::EngineError;

/// Split raw form input on commas and trim each piece.
///
/// Empty pieces are kept; they simply match no symptom.
pub fn split_symptoms(raw_input: &str) -> Vec<&str> {
    raw_input.split(',').map(str::trim).collect()
}

/// Loaded, immutable engine state. `Send + Sync`; share it behind an `Arc`.
#[derive(Debug)]
pub struct PredictionService {
    symptoms: SymptomIndex,
    labels: DiseaseLabelIndex,
    knowledge: KnowledgeBase,
    classifier: Box<dyn Classifier>,
    input_sentinel: String,
}

impl PredictionService {
    /// Load every startup artifact named by `config`. Any failure is fatal:
    /// the service is never built on partial knowledge or a skewed model.
    pub fn load(config: &EngineConfig) -> Result<Self, EngineError> {
        let (symptoms, labels) = config.load_indices()?;
        let knowledge = KnowledgeBase::load(&config.data_dir, &config.tables)?;

        let (artifact, _header) = ModelArtifact::load(&config.model_path)?;
        artifact.check_compatible(&symptoms, &labels)?;

        let service = Self::from_parts(symptoms, labels, knowledge, artifact.model)?
            .with_input_sentinel(config.input_sentinel.clone());

        tracing::info!(
            symptoms = service.symptoms.len(),
            labels = service.labels.len(),
            symptom_digest = %service.symptoms.digest(),
            label_digest = %service.labels.digest(),
            "prediction service ready"
        );
        Ok(service)
    }

    /// Assemble from already-loaded parts, checking that the classifier is
    /// well formed and fits the indices.
    pub fn from_parts(
        symptoms: SymptomIndex,
        labels: DiseaseLabelIndex,
        knowledge: KnowledgeBase,
        classifier: impl Classifier + 'static,
    ) -> Result<Self, EngineError> {
        classifier.validate()?;
        if classifier.feature_count() != symptoms.len() {
            return Err(ModelError::FeatureCountMismatch {
                artifact: classifier.feature_count(),
                index: symptoms.len(),
            }
            .into());
        }
        let uncovered = uncovered_classes(classifier.classes(), &labels);
        if !uncovered.is_empty() {
            return Err(ModelError::UncoveredClasses(uncovered).into());
        }

        Ok(Self {
            symptoms,
            labels,
            knowledge,
            classifier: Box::new(classifier),
            input_sentinel: DEFAULT_INPUT_SENTINEL.to_string(),
        })
    }

    pub fn with_input_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.input_sentinel = sentinel.into();
        self
    }

    pub fn symptoms(&self) -> &SymptomIndex {
        &self.symptoms
    }

    pub fn labels(&self) -> &DiseaseLabelIndex {
        &self.labels
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn encoder(&self) -> FeatureEncoder<'_> {
        FeatureEncoder::new(&self.symptoms)
    }

    pub fn aggregator(&self) -> RecommendationAggregator<'_> {
        self.knowledge.aggregator()
    }

    /// True when the raw input counts as "nothing entered". The sentinel is
    /// compared against the untrimmed input.
    pub fn is_blank_input(&self, raw_input: &str) -> bool {
        raw_input == self.input_sentinel || raw_input.trim().is_empty()
    }

    /// Blank or placeholder input is rejected with a message before the
    /// classifier runs. Unknown symptoms are ignored; input in which nothing
    /// is recognized is still classified (as the all-zero vector).
    ///
    /// The only errors are internal-consistency failures between the
    /// classifier and the label index.
    pub fn predict_and_recommend(&self, raw_input: &str) -> Result<PredictionOutcome, EngineError> {
        if self.is_blank_input(raw_input) {
            return Ok(PredictionOutcome::rejected());
        }

        let features = self.encoder().encode(split_symptoms(raw_input));
        let class_id = self.classifier.predict(&features)?;

        let disease = match self.labels.name(class_id) {
            Some(name) => name.to_string(),
            None => {
                tracing::error!(
                    class_id,
                    label_digest = %self.labels.digest(),
                    "classifier emitted a class with no disease label"
                );
                return Err(EngineError::UnknownClass { class_id });
            }
        };

        let record = self.aggregator().aggregate(&disease);
        Ok(PredictionOutcome::Recommended(Recommendation { disease, record }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_trims_every_piece() {
        assert_eq!(
            split_symptoms(" itching,skin_rash ,  , chills"),
            vec!["itching", "skin_rash", "", "chills"]
        );
    }

    #[test]
    fn split_without_commas_is_a_single_token() {
        assert_eq!(split_symptoms("joint_pain"), vec!["joint_pain"]);
    }
}
