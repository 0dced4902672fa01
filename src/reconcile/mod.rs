//! Snapshot reconciliation.
//!
//! Compares two snapshots of a keyed list and produces everything a
//! consumer needs to catch up:
//! - an ordered edit script (removals, then moves, then insertions)
//! - field-level change payloads for records present on both sides
//!
//! Records match by id only. Content differences never cause structural
//! edits, and position differences never cause payloads. Output order is
//! fully deterministic for a given pair of inputs.

pub mod apply;
pub mod edit;
pub mod payload;
pub mod session;

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Record, RecordId, Snapshot};

use self::edit::EditScript;
use self::payload::ChangeDescriptor;

/// Which input a problem was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotSide {
    Old,
    New,
}

impl fmt::Display for SnapshotSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotSide::Old => write!(f, "old"),
            SnapshotSide::New => write!(f, "new"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("duplicate id {id} in {side} snapshot (positions {first} and {second})")]
    DuplicateId {
        side: SnapshotSide,
        id: RecordId,
        first: usize,
        second: usize,
    },
}

/// What to do when one snapshot contains the same id twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Fail the comparison.
    Reject,
    /// Keep the first occurrence, drop the rest, and note each drop in
    /// the diagnostics.
    FirstWins,
}

impl DuplicatePolicy {
    pub fn parse(value: &str) -> Option<DuplicatePolicy> {
        match value {
            "reject" => Some(DuplicatePolicy::Reject),
            "first-wins" => Some(DuplicatePolicy::FirstWins),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DuplicatePolicy::Reject => "reject",
            DuplicatePolicy::FirstWins => "first-wins",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileOptions {
    /// Emit move edits for records that changed position. When off, a
    /// displaced record is reissued as a removal plus an insertion.
    pub detect_moves: bool,
    pub duplicate_policy: DuplicatePolicy,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        ReconcileOptions {
            detect_moves: true,
            duplicate_policy: DuplicatePolicy::Reject,
        }
    }
}

/// The full outcome of comparing two snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    pub script: EditScript,
    pub changes: Vec<ChangeDescriptor>,
    /// Human-readable notes about salvaged input, e.g. dropped duplicates.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
}

impl Reconciliation {
    pub fn is_empty(&self) -> bool {
        self.script.is_empty() && self.changes.is_empty()
    }
}

/// Compare two snapshots.
///
/// Change payloads are listed in new-snapshot order. Under the first-wins
/// policy all indices refer to the deduplicated view of each list.
pub fn reconcile(
    old: &Snapshot,
    new: &Snapshot,
    options: &ReconcileOptions,
) -> Result<Reconciliation, ReconcileError> {
    let mut diagnostics = Vec::new();

    let old_records = effective_records(
        &old.records,
        SnapshotSide::Old,
        options.duplicate_policy,
        &mut diagnostics,
    )?;
    let new_records = effective_records(
        &new.records,
        SnapshotSide::New,
        options.duplicate_policy,
        &mut diagnostics,
    )?;

    let script = edit::plan_edits(&old_records, &new_records, options.detect_moves);
    let changes = changed_pairs(&old_records, &new_records);

    Ok(Reconciliation {
        script,
        changes,
        diagnostics,
    })
}

/// Validate or salvage one record list according to the duplicate policy.
fn effective_records<'a>(
    records: &'a [Record],
    side: SnapshotSide,
    policy: DuplicatePolicy,
    diagnostics: &mut Vec<String>,
) -> Result<Vec<&'a Record>, ReconcileError> {
    let mut first_seen: HashMap<&RecordId, usize> = HashMap::new();
    let mut kept: Vec<&Record> = Vec::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        match first_seen.get(&record.id) {
            None => {
                first_seen.insert(&record.id, index);
                kept.push(record);
            }
            Some(&first) => match policy {
                DuplicatePolicy::Reject => {
                    return Err(ReconcileError::DuplicateId {
                        side,
                        id: record.id.clone(),
                        first,
                        second: index,
                    });
                }
                DuplicatePolicy::FirstWins => {
                    diagnostics.push(format!(
                        "{side} snapshot: dropped duplicate id {} at position {index} (first occurrence at {first})",
                        record.id
                    ));
                }
            },
        }
    }

    Ok(kept)
}

/// Payloads for every identity-matched pair whose content differs, in
/// new-list order.
fn changed_pairs(old: &[&Record], new: &[&Record]) -> Vec<ChangeDescriptor> {
    let old_by_id: HashMap<&RecordId, &Record> =
        old.iter().map(|record| (&record.id, *record)).collect();

    new.iter()
        .filter_map(|record| {
            old_by_id
                .get(&record.id)
                .and_then(|previous| payload::diff_records(previous, record))
        })
        .collect()
}
