//! Stateful snapshot consumption.
//!
//! A `ListSession` owns the last accepted snapshot and turns each
//! incoming one into a `ListUpdate`. Updates are produced one at a time
//! through `&mut self`, so transitions cannot interleave. A failed
//! transition leaves the session state untouched.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::model::{Record, RecordId, Snapshot};

use super::edit::EditScript;
use super::payload::ChangeDescriptor;
use super::{reconcile, DuplicatePolicy, ReconcileError, ReconcileOptions};

/// Highlight handoff between two snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionChange {
    pub previous: Option<RecordId>,
    pub current: Option<RecordId>,
}

/// One processed transition: the structural and field changes, plus the
/// selection handoff when the highlighted id differs. A pure selection
/// change produces no edits and no payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListUpdate {
    pub script: EditScript,
    pub changes: Vec<ChangeDescriptor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<SelectionChange>,
}

/// Owns the consumer's view of the list across snapshot transitions.
/// Not internally synchronized: callers sharing one session across
/// threads put it behind a lock.
pub struct ListSession {
    current: Snapshot,
    options: ReconcileOptions,
}

impl ListSession {
    /// Start from an empty list: the first advance reports every record
    /// as an insertion.
    pub fn new(options: ReconcileOptions) -> ListSession {
        ListSession {
            current: Snapshot::empty(),
            options,
        }
    }

    /// Accept the next snapshot and report what changed since the last
    /// one. On error the previous snapshot stays current.
    ///
    /// Under the first-wins policy the stored snapshot is the effective
    /// one: later duplicate occurrences are dropped on acceptance, so the
    /// session's records always line up with the scripts it hands out.
    pub fn advance(&mut self, next: Snapshot) -> Result<ListUpdate, ReconcileError> {
        let outcome = reconcile(&self.current, &next, &self.options)?;

        let selection = if self.current.selected != next.selected {
            Some(SelectionChange {
                previous: self.current.selected.clone(),
                current: next.selected.clone(),
            })
        } else {
            None
        };

        let mut accepted = next;
        if self.options.duplicate_policy == DuplicatePolicy::FirstWins {
            accepted.records = dedup_first(accepted.records);
        }
        self.current = accepted;

        Ok(ListUpdate {
            script: outcome.script,
            changes: outcome.changes,
            diagnostics: outcome.diagnostics,
            selection,
        })
    }

    pub fn records(&self) -> &[Record] {
        &self.current.records
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.current
    }

    pub fn selected(&self) -> Option<&RecordId> {
        self.current.selected.as_ref()
    }

    /// Current position of a record, for consumers that scroll to it.
    pub fn position_of(&self, id: &RecordId) -> Option<usize> {
        self.current.position_of(id)
    }
}

fn dedup_first(records: Vec<Record>) -> Vec<Record> {
    let mut seen: HashSet<RecordId> = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(record.id.clone()))
        .collect()
}
