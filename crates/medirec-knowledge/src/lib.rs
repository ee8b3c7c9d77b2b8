//! Medirec knowledge base
//!
//! Five reference tables (description, precautions, medications, diets,
//! workouts), each keyed by disease name, loaded once and read-only after.
//! [`RecommendationAggregator`] joins them into a [`KnowledgeRecord`] for a
//! single disease; every table is consulted independently, so a gap in one
//! source never hides the others.

pub mod aggregate;
pub mod table;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use aggregate::{KnowledgeRecord, RecommendationAggregator, NO_DESCRIPTION};
pub use table::{Row, Table, TableKind};

/// File names of the five tables, relative to a data directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableFiles {
    pub description: PathBuf,
    pub precautions: PathBuf,
    pub medications: PathBuf,
    pub diets: PathBuf,
    pub workouts: PathBuf,
}

impl Default for TableFiles {
    fn default() -> Self {
        Self {
            description: PathBuf::from("description.csv"),
            precautions: PathBuf::from("precautions_df.csv"),
            medications: PathBuf::from("medications.csv"),
            diets: PathBuf::from("diets.csv"),
            workouts: PathBuf::from("workout_df.csv"),
        }
    }
}

impl TableFiles {
    pub fn get(&self, kind: TableKind) -> &Path {
        match kind {
            TableKind::Description => &self.description,
            TableKind::Precautions => &self.precautions,
            TableKind::Medications => &self.medications,
            TableKind::Diets => &self.diets,
            TableKind::Workouts => &self.workouts,
        }
    }
}

/// The immutable set of reference tables.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    description: Table,
    precautions: Table,
    medications: Table,
    diets: Table,
    workouts: Table,
}

impl KnowledgeBase {
    /// Load all five tables from `data_dir`. Any failure aborts the load;
    /// there is no partially-loaded knowledge base.
    pub fn load(data_dir: &Path, files: &TableFiles) -> Result<Self, KnowledgeError> {
        let load = |kind: TableKind| Table::load(kind, &data_dir.join(files.get(kind)));
        Ok(Self {
            description: load(TableKind::Description)?,
            precautions: load(TableKind::Precautions)?,
            medications: load(TableKind::Medications)?,
            diets: load(TableKind::Diets)?,
            workouts: load(TableKind::Workouts)?,
        })
    }

    /// Assemble from already-built tables. Each table must be of the matching kind.
    pub fn from_tables(
        description: Table,
        precautions: Table,
        medications: Table,
        diets: Table,
        workouts: Table,
    ) -> Result<Self, KnowledgeError> {
        let kb = Self {
            description,
            precautions,
            medications,
            diets,
            workouts,
        };
        for kind in TableKind::ALL {
            let actual = kb.table(kind).kind();
            if actual != kind {
                return Err(KnowledgeError::WrongTable {
                    expected: kind,
                    actual,
                });
            }
        }
        Ok(kb)
    }

    pub fn table(&self, kind: TableKind) -> &Table {
        match kind {
            TableKind::Description => &self.description,
            TableKind::Precautions => &self.precautions,
            TableKind::Medications => &self.medications,
            TableKind::Diets => &self.diets,
            TableKind::Workouts => &self.workouts,
        }
    }

    pub fn aggregator(&self) -> RecommendationAggregator<'_> {
        RecommendationAggregator::new(self)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum KnowledgeError {
    #[error("failed to read {table} table {path}: {source}")]
    Io {
        table: TableKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed {table} table{}: {source}", display_path(.path))]
    Csv {
        table: TableKind,
        path: Option<PathBuf>,
        #[source]
        source: csv::Error,
    },

    #[error("{table} table{} has no {column:?} column", display_path(.path))]
    MissingColumn {
        table: TableKind,
        column: &'static str,
        path: Option<PathBuf>,
    },

    #[error("expected a {expected} table, got {actual}")]
    WrongTable { expected: TableKind, actual: TableKind },
}

fn display_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" {}", p.display()))
        .unwrap_or_default()
}

impl KnowledgeError {
    pub(crate) fn with_path(self, at: &Path) -> Self {
        match self {
            KnowledgeError::Csv { table, source, .. } => KnowledgeError::Csv {
                table,
                path: Some(at.to_path_buf()),
                source,
            },
            KnowledgeError::MissingColumn { table, column, .. } => KnowledgeError::MissingColumn {
                table,
                column,
                path: Some(at.to_path_buf()),
            },
            other => other,
        }
    }
}
