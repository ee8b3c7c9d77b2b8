//! Engine configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use medirec_index::{DiseaseLabelIndex, SymptomIndex};
use medirec_knowledge::TableFiles;

use crate::EngineError;

/// Placeholder text of the unfilled symptom field in the intake form.
pub const DEFAULT_INPUT_SENTINEL: &str = "Symptoms";

/// Where the startup artifacts live and how raw input is screened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory holding the five knowledge tables
    pub data_dir: PathBuf,
    /// Classifier artifact (`.mrxa`)
    pub model_path: PathBuf,
    /// Table file names, relative to `data_dir`
    pub tables: TableFiles,
    /// JSON override for the built-in symptom index
    pub symptom_index_path: Option<PathBuf>,
    /// JSON override for the built-in disease label index
    pub label_index_path: Option<PathBuf>,
    /// Raw input equal to this string is treated as "nothing entered"
    pub input_sentinel: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./dataset"),
            model_path: PathBuf::from("./model/svc.mrxa"),
            tables: TableFiles::default(),
            symptom_index_path: None,
            label_index_path: None,
            input_sentinel: DEFAULT_INPUT_SENTINEL.to_string(),
        }
    }
}

impl EngineConfig {
    /// Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, EngineError> {
        let text = std::fs::read_to_string(path).map_err(|source| EngineError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| EngineError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The configured index overrides, or the built-in catalogue.
    pub fn load_indices(&self) -> Result<(SymptomIndex, DiseaseLabelIndex), EngineError> {
        let symptoms = match &self.symptom_index_path {
            Some(path) => SymptomIndex::from_json_file(path)?,
            None => SymptomIndex::builtin(),
        };
        let labels = match &self.label_index_path {
            Some(path) => DiseaseLabelIndex::from_json_file(path)?,
            None => DiseaseLabelIndex::builtin(),
        };
        Ok((symptoms, labels))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("medirec.json");
        std::fs::write(
            &path,
            r#"{"data_dir": "/srv/medirec/data", "tables": {"workouts": "workouts.csv"}}"#,
        )
        .unwrap();

        let config = EngineConfig::from_json_file(&path).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/medirec/data"));
        assert_eq!(config.model_path, EngineConfig::default().model_path);
        assert_eq!(config.tables.workouts, PathBuf::from("workouts.csv"));
        assert_eq!(config.tables.diets, PathBuf::from("diets.csv"));
        assert_eq!(config.input_sentinel, "Symptoms");
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("medirec.json");
        std::fs::write(&path, "{ data_dir: ").unwrap();

        let err = EngineConfig::from_json_file(&path).unwrap_err();
        assert!(matches!(err, EngineError::ConfigParse { .. }));
    }
}
