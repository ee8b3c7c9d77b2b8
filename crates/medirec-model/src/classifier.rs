//! Linear multi-class classifiers.
//!
//! Both variants score a binary feature vector with dense weight rows, so a
//! score is the sum of the weights at the set positions plus an intercept.
//! Prediction is a pure function of the vector; every tie is broken towards
//! the class listed first.

use serde::{Deserialize, Serialize};

use medirec_index::{ClassId, FeatureVector};

use crate::ModelError;

/// A fitted multi-class model.
pub trait Classifier: Send + Sync + std::fmt::Debug {
    /// Width of the feature vectors this model accepts.
    fn feature_count(&self) -> usize;

    /// Every class id [`Classifier::predict`] can return.
    fn classes(&self) -> &[ClassId];

    fn predict(&self, features: &FeatureVector) -> Result<ClassId, ModelError>;

    /// Check the model's internal shape. Models built in code rather than
    /// decoded from an artifact have no other point where this runs.
    fn validate(&self) -> Result<(), ModelError> {
        Ok(())
    }
}

fn class_at(classes: &[ClassId], i: usize) -> Result<ClassId, ModelError> {
    classes.get(i).copied().ok_or_else(|| {
        ModelError::Shape(format!(
            "winning row {i} has no class; {} classes listed",
            classes.len()
        ))
    })
}

fn score(row: &[f64], intercept: f64, features: &FeatureVector) -> f64 {
    features
        .ones()
        .map(|pos| row.get(pos).copied().unwrap_or(0.0))
        .sum::<f64>()
        + intercept
}

fn check_width(expected: usize, features: &FeatureVector) -> Result<(), ModelError> {
    if features.len() != expected {
        return Err(ModelError::DimensionMismatch {
            expected,
            actual: features.len(),
        });
    }
    Ok(())
}

fn check_rows(
    weights: &[Vec<f64>],
    intercepts: &[f64],
    expected_rows: usize,
    feature_count: usize,
) -> Result<(), ModelError> {
    if weights.len() != expected_rows {
        return Err(ModelError::Shape(format!(
            "expected {expected_rows} weight rows, found {}",
            weights.len()
        )));
    }
    if intercepts.len() != expected_rows {
        return Err(ModelError::Shape(format!(
            "expected {expected_rows} intercepts, found {}",
            intercepts.len()
        )));
    }
    if let Some((i, row)) = weights
        .iter()
        .enumerate()
        .find(|(_, row)| row.len() != feature_count)
    {
        return Err(ModelError::Shape(format!(
            "weight row {i} has {} entries, expected {feature_count}",
            row.len()
        )));
    }
    if weights.iter().flatten().chain(intercepts).any(|w| !w.is_finite()) {
        return Err(ModelError::Shape("non-finite coefficient".to_string()));
    }
    Ok(())
}

fn check_classes(classes: &[ClassId]) -> Result<(), ModelError> {
    if classes.len() < 2 {
        return Err(ModelError::Shape(format!(
            "need at least two classes, found {}",
            classes.len()
        )));
    }
    let mut sorted = classes.to_vec();
    sorted.sort_unstable();
    if let Some(w) = sorted.windows(2).find(|w| w[0] == w[1]) {
        return Err(ModelError::Shape(format!("class {} listed twice", w[0])));
    }
    Ok(())
}

// ============================================================================
// One-vs-rest
// ============================================================================

/// One weight row per class; the highest score wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearOneVsRest {
    pub classes: Vec<ClassId>,
    pub weights: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

impl Classifier for LinearOneVsRest {
    fn feature_count(&self) -> usize {
        self.weights.first().map_or(0, Vec::len)
    }

    fn classes(&self) -> &[ClassId] {
        &self.classes
    }

    fn predict(&self, features: &FeatureVector) -> Result<ClassId, ModelError> {
        check_width(self.feature_count(), features)?;

        let mut best: Option<(usize, f64)> = None;
        for (i, (row, b)) in self.weights.iter().zip(&self.intercepts).enumerate() {
            let s = score(row, *b, features);
            if best.map_or(true, |(_, top)| s > top) {
                best = Some((i, s));
            }
        }

        match best {
            Some((i, _)) => class_at(&self.classes, i),
            None => Err(ModelError::Shape("model has no classes".to_string())),
        }
    }

    fn validate(&self) -> Result<(), ModelError> {
        check_classes(&self.classes)?;
        check_rows(
            &self.weights,
            &self.intercepts,
            self.classes.len(),
            self.feature_count(),
        )
    }
}

// ============================================================================
// One-vs-one
// ============================================================================

/// One binary decision per class pair `(i, j)`, `i < j`, in lexicographic
/// order: `(0,1), (0,2), …, (0,n-1), (1,2), …`. A positive decision is a vote
/// for `classes[i]`, otherwise for `classes[j]`. Most votes wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearOneVsOne {
    pub classes: Vec<ClassId>,
    pub weights: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

impl LinearOneVsOne {
    pub fn pair_count(class_count: usize) -> usize {
        class_count * class_count.saturating_sub(1) / 2
    }

    /// Votes per class, in `classes` order.
    pub fn votes(&self, features: &FeatureVector) -> Result<Vec<u32>, ModelError> {
        check_width(self.feature_count(), features)?;

        let n = self.classes.len();
        let mut votes = vec![0u32; n];
        let mut decisions = self.weights.iter().zip(&self.intercepts);
        for i in 0..n {
            for j in (i + 1)..n {
                let (row, b) = decisions
                    .next()
                    .ok_or_else(|| ModelError::Shape("too few pairwise decisions".to_string()))?;
                if score(row, *b, features) > 0.0 {
                    votes[i] += 1;
                } else {
                    votes[j] += 1;
                }
            }
        }
        Ok(votes)
    }
}

impl Classifier for LinearOneVsOne {
    fn feature_count(&self) -> usize {
        self.weights.first().map_or(0, Vec::len)
    }

    fn classes(&self) -> &[ClassId] {
        &self.classes
    }

    fn predict(&self, features: &FeatureVector) -> Result<ClassId, ModelError> {
        let votes = self.votes(features)?;

        let mut best: Option<(usize, u32)> = None;
        for (i, v) in votes.iter().enumerate() {
            if best.map_or(true, |(_, top)| *v > top) {
                best = Some((i, *v));
            }
        }

        match best {
            Some((i, _)) => class_at(&self.classes, i),
            None => Err(ModelError::Shape("model has no classes".to_string())),
        }
    }

    fn validate(&self) -> Result<(), ModelError> {
        check_classes(&self.classes)?;
        check_rows(
            &self.weights,
            &self.intercepts,
            Self::pair_count(self.classes.len()),
            self.feature_count(),
        )
    }
}

// ============================================================================
// Stored model
// ============================================================================

/// The model variants an artifact can carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LinearModel {
    OneVsRest(LinearOneVsRest),
    OneVsOne(LinearOneVsOne),
}

impl LinearModel {
    pub fn kind_name(&self) -> &'static str {
        match self {
            LinearModel::OneVsRest(_) => "one_vs_rest",
            LinearModel::OneVsOne(_) => "one_vs_one",
        }
    }

    pub(crate) fn format_flags(&self) -> u64 {
        match self {
            LinearModel::OneVsRest(_) => crate::format::flags::ONE_VS_REST,
            LinearModel::OneVsOne(_) => crate::format::flags::ONE_VS_ONE,
        }
    }
}

impl Classifier for LinearModel {
    fn feature_count(&self) -> usize {
        match self {
            LinearModel::OneVsRest(m) => m.feature_count(),
            LinearModel::OneVsOne(m) => m.feature_count(),
        }
    }

    fn classes(&self) -> &[ClassId] {
        match self {
            LinearModel::OneVsRest(m) => m.classes(),
            LinearModel::OneVsOne(m) => m.classes(),
        }
    }

    fn predict(&self, features: &FeatureVector) -> Result<ClassId, ModelError> {
        match self {
            LinearModel::OneVsRest(m) => m.predict(features),
            LinearModel::OneVsOne(m) => m.predict(features),
        }
    }

    fn validate(&self) -> Result<(), ModelError> {
        match self {
            LinearModel::OneVsRest(m) => m.validate(),
            LinearModel::OneVsOne(m) => m.validate(),
        }
    }
}
