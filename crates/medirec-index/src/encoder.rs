//! Symptom tokens → binary feature vector.

use serde::{Deserialize, Serialize};

use crate::SymptomIndex;

/// Fixed-length 0/1 vector; position `i` is the symptom at position `i` of the
/// [`SymptomIndex`] that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureVector {
    bits: Vec<u8>,
}

impl FeatureVector {
    pub fn zeros(len: usize) -> Self {
        Self { bits: vec![0; len] }
    }

    /// Build from explicit set positions. Out-of-range positions are ignored.
    pub fn from_positions(len: usize, positions: impl IntoIterator<Item = usize>) -> Self {
        let mut v = Self::zeros(len);
        for pos in positions {
            v.set(pos);
        }
        v
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    fn set(&mut self, position: usize) {
        if let Some(bit) = self.bits.get_mut(position) {
            *bit = 1;
        }
    }

    pub fn get(&self, position: usize) -> Option<u8> {
        self.bits.get(position).copied()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bits
    }

    /// Positions holding a 1, ascending.
    pub fn ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits
            .iter()
            .enumerate()
            .filter(|(_, bit)| **bit == 1)
            .map(|(pos, _)| pos)
    }

    pub fn count_ones(&self) -> usize {
        self.bits.iter().filter(|bit| **bit == 1).count()
    }

    pub fn is_all_zero(&self) -> bool {
        self.bits.iter().all(|bit| *bit == 0)
    }
}

/// Which input tokens the encoder matched. Diagnostics only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodeReport {
    pub recognized: Vec<String>,
    pub ignored: Vec<String>,
}

/// Encodes symptom sequences against a borrowed [`SymptomIndex`].
#[derive(Debug, Clone, Copy)]
pub struct FeatureEncoder<'a> {
    index: &'a SymptomIndex,
}

impl<'a> FeatureEncoder<'a> {
    pub fn new(index: &'a SymptomIndex) -> Self {
        Self { index }
    }

    /// Length of every vector this encoder produces.
    pub fn width(&self) -> usize {
        self.index.len()
    }

    /// Each token is trimmed, then matched exactly (case-sensitive). Unknown
    /// tokens leave their bit at 0; encoding never fails.
    pub fn encode<I, S>(&self, raw_symptoms: I) -> FeatureVector
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.encode_with_report(raw_symptoms).0
    }

    pub fn encode_with_report<I, S>(&self, raw_symptoms: I) -> (FeatureVector, EncodeReport)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut vector = FeatureVector::zeros(self.index.len());
        let mut report = EncodeReport::default();

        for raw in raw_symptoms {
            let token = raw.as_ref().trim();
            match self.index.position(token) {
                Some(pos) => {
                    vector.set(pos);
                    report.recognized.push(token.to_string());
                }
                None => {
                    tracing::debug!(token = %token, "ignoring unrecognized symptom");
                    report.ignored.push(token.to_string());
                }
            }
        }

        (vector, report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sets_exactly_the_named_positions() {
        let index = SymptomIndex::builtin();
        let v = FeatureEncoder::new(&index).encode(["itching", "skin_rash"]);
        assert_eq!(v.len(), 132);
        assert_eq!(v.ones().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn tokens_are_trimmed_but_not_normalized() {
        let index = SymptomIndex::builtin();
        let encoder = FeatureEncoder::new(&index);
        assert_eq!(encoder.encode(["  joint_pain\t"]).ones().collect::<Vec<_>>(), vec![6]);
        assert!(encoder.encode(["Joint_Pain"]).is_all_zero());
        assert!(encoder.encode(["joint pain"]).is_all_zero());
    }

    #[test]
    fn duplicates_set_a_position_once() {
        let index = SymptomIndex::builtin();
        let v = FeatureEncoder::new(&index).encode(["cough", "cough", " cough "]);
        assert_eq!(v.count_ones(), 1);
        assert_eq!(v.get(24), Some(1));
    }

    #[test]
    fn empty_and_unknown_input_is_all_zero() {
        let index = SymptomIndex::builtin();
        let encoder = FeatureEncoder::new(&index);
        let empty: [&str; 0] = [];
        assert!(encoder.encode(empty).is_all_zero());
        let v = encoder.encode(["nonexistent_symptom_xyz", ""]);
        assert!(v.is_all_zero());
        assert_eq!(v.len(), index.len());
    }

    #[test]
    fn report_separates_recognized_and_ignored() {
        let index = SymptomIndex::builtin();
        let (v, report) =
            FeatureEncoder::new(&index).encode_with_report(["itching", "purple_toes", " chills "]);
        assert_eq!(v.count_ones(), 2);
        assert_eq!(report.recognized, vec!["itching", "chills"]);
        assert_eq!(report.ignored, vec!["purple_toes"]);
    }

    #[test]
    fn from_positions_ignores_out_of_range() {
        let v = FeatureVector::from_positions(3, [0, 2, 9]);
        assert_eq!(v.as_slice(), &[1, 0, 1]);
    }
}
