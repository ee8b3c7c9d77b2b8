//! Classifier class id → disease display name mapping.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use crate::catalog::BUILTIN_DISEASES;
use crate::digest::label_index_digest_v1;
use crate::{ClassId, IndexError};

/// Immutable 1:1 mapping between class ids and disease names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiseaseLabelIndex {
    labels: BTreeMap<ClassId, String>,
}

impl DiseaseLabelIndex {
    pub fn builtin() -> Self {
        Self {
            labels: BUILTIN_DISEASES
                .iter()
                .map(|(id, name)| (*id, name.to_string()))
                .collect(),
        }
    }

    /// Build from `(class id, name)` pairs. Ids and names must both be unique.
    pub fn from_entries<I, S>(entries: I) -> Result<Self, IndexError>
    where
        I: IntoIterator<Item = (ClassId, S)>,
        S: Into<String>,
    {
        let mut labels = BTreeMap::new();
        let mut seen_names = HashSet::new();
        for (id, name) in entries {
            let name = name.into();
            if name.is_empty() {
                return Err(IndexError::EmptyName { key: id.to_string() });
            }
            if !seen_names.insert(name.clone()) {
                return Err(IndexError::DuplicateName(name));
            }
            if labels.insert(id, name).is_some() {
                return Err(IndexError::DuplicateClass(id));
            }
        }
        if labels.is_empty() {
            return Err(IndexError::Empty("disease label index"));
        }
        Ok(Self { labels })
    }

    /// Load a JSON object of the form `{"15": "Fungal infection", "4": "Allergy", ...}`.
    pub fn from_json_file(path: &Path) -> Result<Self, IndexError> {
        let text = std::fs::read_to_string(path).map_err(|source| IndexError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let entries: BTreeMap<ClassId, String> =
            serde_json::from_str(&text).map_err(|source| IndexError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_entries(entries)
    }

    pub fn name(&self, class_id: ClassId) -> Option<&str> {
        self.labels.get(&class_id).map(String::as_str)
    }

    pub fn contains(&self, class_id: ClassId) -> bool {
        self.labels.contains_key(&class_id)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Entries in class-id order.
    pub fn iter(&self) -> impl Iterator<Item = (ClassId, &str)> {
        self.labels.iter().map(|(id, name)| (*id, name.as_str()))
    }

    pub fn digest(&self) -> String {
        label_index_digest_v1(self.iter())
    }
}
