//! Symptom name → feature position mapping.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::catalog::BUILTIN_SYMPTOMS;
use crate::digest::symptom_index_digest_v1;
use crate::IndexError;

/// Immutable mapping from canonical symptom token to feature-vector position.
///
/// Positions always form the dense range `0..len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymptomIndex {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl SymptomIndex {
    /// The catalogue the shipped classifier was fitted against.
    pub fn builtin() -> Self {
        let names: Vec<String> = BUILTIN_SYMPTOMS.iter().map(|s| s.to_string()).collect();
        let positions = names
            .iter()
            .enumerate()
            .map(|(pos, name)| (name.clone(), pos))
            .collect();
        Self { names, positions }
    }

    /// Build from names listed in position order.
    pub fn from_names<I, S>(names: I) -> Result<Self, IndexError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let mut positions = HashMap::with_capacity(names.len());
        for (pos, name) in names.iter().enumerate() {
            if name.is_empty() {
                return Err(IndexError::EmptyName { key: pos.to_string() });
            }
            if positions.insert(name.clone(), pos).is_some() {
                return Err(IndexError::DuplicateName(name.clone()));
            }
        }
        if names.is_empty() {
            return Err(IndexError::Empty("symptom index"));
        }
        Ok(Self { names, positions })
    }

    /// Build from explicit `name → position` entries.
    ///
    /// Positions must cover `0..n` exactly once.
    pub fn from_entries<I, S>(entries: I) -> Result<Self, IndexError>
    where
        I: IntoIterator<Item = (S, usize)>,
        S: Into<String>,
    {
        let mut by_position: BTreeMap<usize, String> = BTreeMap::new();
        for (name, pos) in entries {
            let name = name.into();
            if let Some(existing) = by_position.insert(pos, name.clone()) {
                return Err(IndexError::DuplicatePosition {
                    position: pos,
                    first: existing,
                    second: name,
                });
            }
        }
        for (expected, pos) in by_position.keys().enumerate() {
            if *pos != expected {
                return Err(IndexError::PositionGap { missing: expected });
            }
        }
        Self::from_names(by_position.into_values())
    }

    /// Load a JSON object of the form `{"itching": 0, "skin_rash": 1, ...}`.
    pub fn from_json_file(path: &Path) -> Result<Self, IndexError> {
        let text = std::fs::read_to_string(path).map_err(|source| IndexError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let entries: HashMap<String, usize> =
            serde_json::from_str(&text).map_err(|source| IndexError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_entries(entries)
    }

    /// Number of feature positions.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Exact, case-sensitive lookup.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    pub fn name_at(&self, position: usize) -> Option<&str> {
        self.names.get(position).map(String::as_str)
    }

    /// Names in position order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn digest(&self) -> String {
        symptom_index_digest_v1(self.names())
    }
}
