//! Status store: the durable completion sidecar.
//!
//! The sidecar is a JSON array of `[subject, year, series, paper_number,
//! completed]` rows. Every save fully rewrites the file; there is no
//! incremental persistence.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{PapersError, Result};
use crate::types::{PaperId, PaperRecord, Series};

/// One persisted completion entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    pub id: PaperId,
    pub completed: bool,
}

/// Wire row for one entry.
#[derive(Serialize, Deserialize)]
struct Row(String, String, Series, String, bool);

impl From<Row> for StatusEntry {
    fn from(row: Row) -> Self {
        Self {
            id: PaperId::new(row.0, row.1, row.2, row.3),
            completed: row.4,
        }
    }
}

/// Loads and saves completion flags keyed by record identity.
#[derive(Debug, Clone)]
pub struct StatusStore {
    path: PathBuf,
}

impl StatusStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Loads the persisted entries. A missing file is the first-run case and
    /// yields an empty set.
    pub fn load(&self) -> Result<Vec<StatusEntry>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                log::info!("no status file at {}, starting fresh", self.path.display());
                return Ok(Vec::new());
            }
            Err(error) => return Err(error.into()),
        };
        let rows: Vec<Row> = serde_json::from_slice(&bytes).map_err(|error| {
            PapersError::Serialization(format!(
                "failed to parse status file {}: {error}",
                self.path.display()
            ))
        })?;
        Ok(rows.into_iter().map(StatusEntry::from).collect())
    }

    /// Persists the completion flag of every record, fully overwriting any
    /// prior content. Write failures propagate to the caller.
    pub fn save(&self, records: &[PaperRecord]) -> Result<()> {
        let rows: Vec<Row> = records
            .iter()
            .map(|record| {
                Row(
                    record.id.subject.clone(),
                    record.id.year.clone(),
                    record.id.series,
                    record.id.paper_number.clone(),
                    record.completed,
                )
            })
            .collect();
        let serialized = serde_json::to_vec(&rows)
            .map_err(|error| PapersError::Serialization(error.to_string()))?;
        fs::write(&self.path, serialized).map_err(|source| PapersError::StatusWrite {
            path: self.path.clone(),
            source,
        })
    }
}

/// Applies persisted completion onto freshly indexed records.
///
/// For each record the first persisted entry with an equal identity wins;
/// records with no persisted entry default to not completed.
pub fn reconcile(records: &mut [PaperRecord], persisted: &[StatusEntry]) {
    for record in records {
        record.completed = persisted
            .iter()
            .find(|entry| entry.id == record.id)
            .is_some_and(|entry| entry.completed);
    }
}
