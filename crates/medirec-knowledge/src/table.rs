//! Reference tables keyed by disease name.
//!
//! Each table has one key column and one or more value columns. Rows keep
//! their file order; "first matching row" always means first in load order.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use medirec_index::digest::fnv1a64_digest_bytes;

use crate::KnowledgeError;

/// The five knowledge sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    Description,
    Precautions,
    Medications,
    Diets,
    Workouts,
}

impl TableKind {
    pub const ALL: [TableKind; 5] = [
        TableKind::Description,
        TableKind::Precautions,
        TableKind::Medications,
        TableKind::Diets,
        TableKind::Workouts,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TableKind::Description => "description",
            TableKind::Precautions => "precautions",
            TableKind::Medications => "medications",
            TableKind::Diets => "diets",
            TableKind::Workouts => "workouts",
        }
    }

    /// Header of the disease-name column.
    pub fn key_column(self) -> &'static str {
        match self {
            TableKind::Workouts => "disease",
            _ => "Disease",
        }
    }

    /// Headers of the value columns, in output order.
    pub fn value_columns(self) -> &'static [&'static str] {
        match self {
            TableKind::Description => &["Description"],
            TableKind::Precautions => &["Precaution_1", "Precaution_2", "Precaution_3", "Precaution_4"],
            TableKind::Medications => &["Medication"],
            TableKind::Diets => &["Diet"],
            TableKind::Workouts => &["workout"],
        }
    }
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One table row. An empty cell is a null value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub disease: String,
    pub values: Vec<Option<String>>,
}

#[derive(Debug, Clone)]
pub struct Table {
    kind: TableKind,
    rows: Vec<Row>,
    by_disease: HashMap<String, Vec<usize>>,
    source_digest: String,
}

impl Table {
    /// Build from rows already in load order.
    pub fn from_rows(kind: TableKind, rows: Vec<Row>, source_digest: String) -> Self {
        let mut by_disease: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, row) in rows.iter().enumerate() {
            by_disease.entry(row.disease.clone()).or_default().push(i);
        }
        Self {
            kind,
            rows,
            by_disease,
            source_digest,
        }
    }

    pub fn load(kind: TableKind, path: &Path) -> Result<Self, KnowledgeError> {
        let bytes = std::fs::read(path).map_err(|source| KnowledgeError::Io {
            table: kind,
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_csv_bytes(kind, &bytes).map_err(|e| e.with_path(path))?;
        tracing::info!(
            table = %kind,
            path = %path.display(),
            rows = table.len(),
            diseases = table.disease_count(),
            digest = %table.source_digest,
            "loaded knowledge table"
        );
        Ok(table)
    }

    pub fn from_csv_bytes(kind: TableKind, bytes: &[u8]) -> Result<Self, KnowledgeError> {
        let rows = read_rows(kind, bytes)?;
        Ok(Self::from_rows(kind, rows, fnv1a64_digest_bytes(bytes)))
    }

    pub fn kind(&self) -> TableKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn disease_count(&self) -> usize {
        self.by_disease.len()
    }

    /// FNV-1a digest of the source bytes.
    pub fn source_digest(&self) -> &str {
        &self.source_digest
    }

    /// Rows whose disease column equals `disease` exactly, in load order.
    pub fn matching(&self, disease: &str) -> impl Iterator<Item = &Row> {
        self.by_disease
            .get(disease)
            .into_iter()
            .flatten()
            .map(|i| &self.rows[*i])
    }

    pub fn first_matching(&self, disease: &str) -> Option<&Row> {
        self.matching(disease).next()
    }
}

fn read_rows<R: Read>(kind: TableKind, input: R) -> Result<Vec<Row>, KnowledgeError> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(input);
    let headers = reader
        .headers()
        .map_err(|source| KnowledgeError::Csv {
            table: kind,
            path: None,
            source,
        })?
        .clone();

    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| KnowledgeError::MissingColumn {
                table: kind,
                column: name,
                path: None,
            })
    };
    let key_col = column(kind.key_column())?;
    let value_cols = kind
        .value_columns()
        .iter()
        .map(|name| column(name))
        .collect::<Result<Vec<_>, _>>()?;

    let mut rows = Vec::new();
    let mut keyless = 0usize;
    for record in reader.records() {
        let record = record.map_err(|source| KnowledgeError::Csv {
            table: kind,
            path: None,
            source,
        })?;
        let disease = record.get(key_col).unwrap_or_default();
        if disease.is_empty() {
            keyless += 1;
            continue;
        }
        let values = value_cols
            .iter()
            .map(|col| record.get(*col).filter(|v| !v.is_empty()).map(str::to_string))
            .collect();
        rows.push(Row {
            disease: disease.to_string(),
            values,
        });
    }

    if keyless > 0 {
        tracing::warn!(table = %kind, rows = keyless, "skipped rows without a disease name");
    }

    Ok(rows)
}
