//! Applying reconciliation output back onto a record list.
//!
//! This is the reference consumer: a renderer that executes the script
//! and patches the payloads must end up with exactly the new snapshot.

use thiserror::Error;

use crate::model::{Record, RecordId};

use super::edit::{Edit, EditScript};
use super::payload::{ChangeDescriptor, FieldChange};
use super::Reconciliation;

#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("{op} edit index {index} out of range for list of {len}")]
    IndexOutOfRange {
        op: &'static str,
        index: usize,
        len: usize,
    },
    #[error("change payload references unknown id {id}")]
    UnknownId { id: RecordId },
}

/// Run an edit script over a record list. Each edit addresses the list as
/// the previous edit left it.
pub fn apply_script(records: &[Record], script: &EditScript) -> Result<Vec<Record>, ApplyError> {
    let mut list = records.to_vec();

    for edit in script.iter() {
        match edit {
            Edit::Remove { index, .. } => {
                if *index >= list.len() {
                    return Err(ApplyError::IndexOutOfRange {
                        op: "remove",
                        index: *index,
                        len: list.len(),
                    });
                }
                list.remove(*index);
            }
            Edit::Move { from, to, .. } => {
                if *from >= list.len() {
                    return Err(ApplyError::IndexOutOfRange {
                        op: "move",
                        index: *from,
                        len: list.len(),
                    });
                }
                let record = list.remove(*from);
                if *to > list.len() {
                    return Err(ApplyError::IndexOutOfRange {
                        op: "move",
                        index: *to,
                        len: list.len(),
                    });
                }
                list.insert(*to, record);
            }
            Edit::Insert { index, record } => {
                if *index > list.len() {
                    return Err(ApplyError::IndexOutOfRange {
                        op: "insert",
                        index: *index,
                        len: list.len(),
                    });
                }
                list.insert(*index, record.clone());
            }
        }
    }

    Ok(list)
}

/// Patch field changes onto their records, in place.
pub fn apply_changes(
    records: &mut [Record],
    changes: &[ChangeDescriptor],
) -> Result<(), ApplyError> {
    for descriptor in changes {
        // linear search is fine here, payload batches are small
        let Some(record) = records.iter_mut().find(|r| r.id == descriptor.id) else {
            return Err(ApplyError::UnknownId {
                id: descriptor.id.clone(),
            });
        };
        for change in &descriptor.fields {
            match change {
                FieldChange::Title(title) => record.title = title.clone(),
                FieldChange::PreviewRef(preview) => record.preview_ref = preview.clone(),
                FieldChange::Viewed(viewed) => record.viewed = *viewed,
            }
        }
    }
    Ok(())
}

/// The full consumer contract: structural edits first, then field patches.
pub fn apply(
    records: &[Record],
    reconciliation: &Reconciliation,
) -> Result<Vec<Record>, ApplyError> {
    let mut list = apply_script(records, &reconciliation.script)?;
    apply_changes(&mut list, &reconciliation.changes)?;
    Ok(list)
}
