//! Patient records and the shared, replaceable patient index.
//!
//! The index is owned by the data layer. The shell only reads it, and always
//! through a fresh [`PatientIndex::snapshot`] so a reload that lands between
//! two renders is picked up on the next one.

use crate::error::{ClaudentError, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

/// A single patient as exposed to the shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRecord {
    /// Stable identifier, unique within the index
    pub id: String,
    /// Given name(s)
    #[serde(alias = "nombres")]
    pub given_names: String,
    /// Family name(s)
    #[serde(alias = "apellidos")]
    pub family_names: String,
    /// National identity code (CURP), when known
    #[serde(default, alias = "curp", deserialize_with = "empty_as_none")]
    pub identity_code: Option<String>,
}

impl PatientRecord {
    pub fn new(
        id: impl Into<String>,
        given_names: impl Into<String>,
        family_names: impl Into<String>,
        identity_code: Option<&str>,
    ) -> Self {
        Self {
            id: id.into(),
            given_names: given_names.into(),
            family_names: family_names.into(),
            identity_code: identity_code
                .filter(|code| !code.is_empty())
                .map(str::to_string),
        }
    }

    /// "Given Family", as shown in lists
    pub fn display_name(&self) -> String {
        format!("{} {}", self.given_names, self.family_names)
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|code| !code.trim().is_empty()))
}

/// On-disk layouts accepted for an index file.
#[derive(Deserialize)]
#[serde(untagged)]
enum IndexFile {
    Bare(Vec<PatientRecord>),
    Wrapped { patients: Vec<PatientRecord> },
}

/// Check the index invariants: non-empty ids, no duplicates.
pub fn validate_records(records: &[PatientRecord]) -> Result<()> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if record.id.trim().is_empty() {
            return Err(ClaudentError::InvalidPatientRecord(format!(
                "patient '{}' has an empty identifier",
                record.display_name()
            )));
        }
        if !seen.insert(record.id.as_str()) {
            return Err(ClaudentError::DuplicatePatientId(record.id.clone()));
        }
    }
    Ok(())
}

/// Parse an index from JSON text. `origin` is only used in error messages.
pub fn parse_index(json: &str, origin: &str) -> Result<Vec<PatientRecord>> {
    let file: IndexFile = serde_json::from_str(json)
        .map_err(|e| ClaudentError::PatientIndexParse(origin.to_string(), e))?;
    let records = match file {
        IndexFile::Bare(records) => records,
        IndexFile::Wrapped { patients } => patients,
    };
    validate_records(&records)?;
    Ok(records)
}

/// Read and validate an index file.
pub fn load_index_file(path: &Path) -> Result<Vec<PatientRecord>> {
    let origin = path.display().to_string();
    let json = std::fs::read_to_string(path)
        .map_err(|e| ClaudentError::PatientIndexRead(origin.clone(), e))?;
    let records = parse_index(&json, &origin)?;
    tracing::info!(path = %origin, patients = records.len(), "patient index loaded");
    Ok(records)
}

/// Shared handle to the current patient list.
///
/// Cloning the handle shares the same underlying index. Readers take a
/// snapshot (`Arc` clone) and never hold the lock while matching.
#[derive(Clone, Default)]
pub struct PatientIndex {
    records: Arc<RwLock<Arc<Vec<PatientRecord>>>>,
}

impl PatientIndex {
    pub fn new(records: Vec<PatientRecord>) -> Result<Self> {
        validate_records(&records)?;
        Ok(Self {
            records: Arc::new(RwLock::new(Arc::new(records))),
        })
    }

    /// Current contents. Take a new snapshot per event; do not keep one
    /// across a query change.
    pub fn snapshot(&self) -> Arc<Vec<PatientRecord>> {
        Arc::clone(&self.records.read())
    }

    /// Swap in a new list. The previous list stays valid for anyone still
    /// holding a snapshot of it.
    pub fn replace(&self, records: Vec<PatientRecord>) -> Result<()> {
        validate_records(&records)?;
        *self.records.write() = Arc::new(records);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn find(&self, id: &str) -> Option<PatientRecord> {
        find_by_id(&self.snapshot(), id).cloned()
    }
}

/// Look a record up by identifier in a snapshot.
pub fn find_by_id<'a>(records: &'a [PatientRecord], id: &str) -> Option<&'a PatientRecord> {
    records.iter().find(|p| p.id == id)
}
