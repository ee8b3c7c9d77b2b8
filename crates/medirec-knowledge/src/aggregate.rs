//! Per-disease join across the five reference tables.

use serde::{Deserialize, Serialize};

use crate::{KnowledgeBase, TableKind};

/// Description used when the description table has no row for a disease.
pub const NO_DESCRIPTION: &str = "No description available";

/// Everything the knowledge base holds about one disease.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeRecord {
    pub description: String,
    /// At most four, nulls dropped, column order kept.
    pub precautions: Vec<String>,
    pub medications: Vec<String>,
    pub diets: Vec<String>,
    pub workouts: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct RecommendationAggregator<'a> {
    kb: &'a KnowledgeBase,
}

impl<'a> RecommendationAggregator<'a> {
    pub fn new(kb: &'a KnowledgeBase) -> Self {
        Self { kb }
    }

    /// Never fails: a disease missing from a table yields the placeholder
    /// description or an empty list for that table only.
    pub fn aggregate(&self, disease_name: &str) -> KnowledgeRecord {
        KnowledgeRecord {
            description: self.description(disease_name),
            precautions: self.precautions(disease_name),
            medications: self.all_values(TableKind::Medications, disease_name),
            diets: self.all_values(TableKind::Diets, disease_name),
            workouts: self.all_values(TableKind::Workouts, disease_name),
        }
    }

    /// First row in load order wins.
    fn description(&self, disease_name: &str) -> String {
        self.kb
            .table(TableKind::Description)
            .first_matching(disease_name)
            .and_then(|row| row.values.first().cloned().flatten())
            .unwrap_or_else(|| NO_DESCRIPTION.to_string())
    }

    /// First row in load order wins; later rows for the same disease are ignored.
    fn precautions(&self, disease_name: &str) -> Vec<String> {
        self.kb
            .table(TableKind::Precautions)
            .first_matching(disease_name)
            .map(|row| row.values.iter().flatten().cloned().collect())
            .unwrap_or_default()
    }

    // Null cells are dropped rather than surfaced as empty strings.
    fn all_values(&self, kind: TableKind, disease_name: &str) -> Vec<String> {
        self.kb
            .table(kind)
            .matching(disease_name)
            .filter_map(|row| row.values.first().cloned().flatten())
            .collect()
    }
}
