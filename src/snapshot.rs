//! Snapshot files.
//!
//! Snapshots travel as plain JSON, one snapshot per file. The record
//! array order is the list order, so files round-trip byte-for-byte
//! meaningful: saving and reloading never reorders anything.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::model::{RecordId, Snapshot};

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("failed to encode {path}: {source}")]
    Encode {
        path: String,
        source: serde_json::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

/// Load a snapshot from a JSON file.
pub fn load(path: &Path) -> Result<Snapshot, SnapshotError> {
    let text = fs::read_to_string(path).map_err(|source| SnapshotError::Read {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| SnapshotError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Save a snapshot as pretty-printed JSON.
pub fn save(path: &Path, snapshot: &Snapshot) -> Result<(), SnapshotError> {
    let mut text =
        serde_json::to_string_pretty(snapshot).map_err(|source| SnapshotError::Encode {
            path: path.display().to_string(),
            source,
        })?;
    text.push('\n');
    fs::write(path, text).map_err(|source| SnapshotError::Write {
        path: path.display().to_string(),
        source,
    })
}

/// Two positions claiming the same id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdViolation {
    pub id: RecordId,
    pub first: usize,
    pub second: usize,
}

/// Every repeated id in a snapshot, one violation per extra occurrence,
/// in list order.
pub fn find_duplicate_ids(snapshot: &Snapshot) -> Vec<IdViolation> {
    let mut first_seen: HashMap<&RecordId, usize> = HashMap::new();
    let mut violations = Vec::new();

    for (index, record) in snapshot.records.iter().enumerate() {
        match first_seen.get(&record.id) {
            None => {
                first_seen.insert(&record.id, index);
            }
            Some(&first) => violations.push(IdViolation {
                id: record.id.clone(),
                first,
                second: index,
            }),
        }
    }

    violations
}
