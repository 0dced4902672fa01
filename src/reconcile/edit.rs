//! Structural edit planning.
//!
//! Given the old and new orderings of a keyed list, produces the edit
//! script that transforms one into the other:
//! - removals first, addressed back to front so indices stay valid
//! - then moves, keeping a maximal anchored subsequence in place
//! - then insertions, front to back at their final positions
//!
//! Every index is a splice position: an edit applies to the list exactly
//! as the previous edit left it.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::model::{Record, RecordId};

/// One structural edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Edit {
    /// Remove the record at `index`.
    Remove { index: usize, id: RecordId },
    /// Take the record out at `from` and reinsert it at `to`.
    Move {
        from: usize,
        to: usize,
        id: RecordId,
    },
    /// Insert `record` at `index`. Carries the full record so a consumer
    /// can bind the new item without consulting the source snapshot.
    Insert { index: usize, record: Record },
}

/// An ordered list of edits. Applying them in sequence to the old list
/// yields the new ordering.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EditScript {
    pub edits: Vec<Edit>,
}

impl EditScript {
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Edit> {
        self.edits.iter()
    }

    pub fn counts(&self) -> EditCounts {
        let mut counts = EditCounts::default();
        for edit in &self.edits {
            match edit {
                Edit::Remove { .. } => counts.removed += 1,
                Edit::Move { .. } => counts.moved += 1,
                Edit::Insert { .. } => counts.inserted += 1,
            }
        }
        counts
    }
}

/// Tally of edits by kind, for report summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EditCounts {
    pub removed: usize,
    pub moved: usize,
    pub inserted: usize,
}

/// Plan the structural edits between two duplicate-free orderings.
///
/// With `detect_moves` off, records that changed position are reissued as
/// a removal plus an insertion instead of a move edit.
pub(crate) fn plan_edits(old: &[&Record], new: &[&Record], detect_moves: bool) -> EditScript {
    let old_ids: HashSet<&RecordId> = old.iter().map(|r| &r.id).collect();
    let new_ids: HashSet<&RecordId> = new.iter().map(|r| &r.id).collect();

    // records present on both sides, in each side's order
    let retained_old: Vec<&RecordId> = old
        .iter()
        .map(|r| &r.id)
        .filter(|id| new_ids.contains(*id))
        .collect();
    let retained_new: Vec<&RecordId> = new
        .iter()
        .map(|r| &r.id)
        .filter(|id| old_ids.contains(*id))
        .collect();

    // anchors: a maximal subsequence already in the new relative order.
    // everything retained but not anchored has to be re-seated.
    let retained_position: HashMap<&RecordId, usize> = retained_old
        .iter()
        .enumerate()
        .map(|(index, id)| (*id, index))
        .collect();
    let positions: Vec<usize> = retained_new
        .iter()
        .map(|id| retained_position.get(*id).copied().unwrap_or(usize::MAX))
        .collect();
    let anchored = lis_mask(&positions);

    let displaced: HashSet<&RecordId> = retained_new
        .iter()
        .zip(&anchored)
        .filter(|(_, anchored)| !**anchored)
        .map(|(id, _)| *id)
        .collect();

    // removals, back to front
    let old_position: HashMap<&RecordId, usize> = old
        .iter()
        .enumerate()
        .map(|(index, r)| (&r.id, index))
        .collect();
    let mut removals: Vec<(usize, &RecordId)> = old
        .iter()
        .enumerate()
        .filter(|(_, r)| !new_ids.contains(&r.id))
        .map(|(index, r)| (index, &r.id))
        .collect();
    if !detect_moves {
        for id in &retained_new {
            if displaced.contains(*id) {
                if let Some(&index) = old_position.get(*id) {
                    removals.push((index, *id));
                }
            }
        }
    }
    removals.sort_by(|a, b| b.0.cmp(&a.0));

    let mut edits: Vec<Edit> = removals
        .into_iter()
        .map(|(index, id)| Edit::Remove {
            index,
            id: id.clone(),
        })
        .collect();

    if detect_moves {
        plan_moves(&retained_old, &retained_new, &anchored, &mut edits);
    }

    // insertions, front to back: brand-new records always, displaced ones
    // only when they were decomposed into remove + insert above
    for (index, record) in new.iter().enumerate() {
        let reissued = !detect_moves && displaced.contains(&record.id);
        if !old_ids.contains(&record.id) || reissued {
            edits.push(Edit::Insert {
                index,
                record: (*record).clone(),
            });
        }
    }

    EditScript { edits }
}

/// Emit moves that bring the retained records into the new order.
///
/// Walks the targets from the back: each displaced record is spliced out
/// of the working order and reinserted directly before its successor in
/// the new order (or at the end for the last target). Later targets are
/// already settled when an earlier one moves, so each record moves at
/// most once.
fn plan_moves(
    retained_old: &[&RecordId],
    retained_new: &[&RecordId],
    anchored: &[bool],
    edits: &mut Vec<Edit>,
) {
    let mut working: Vec<&RecordId> = retained_old.to_vec();

    for target in (0..retained_new.len()).rev() {
        if anchored[target] {
            continue;
        }
        let id = retained_new[target];
        let Some(from) = working.iter().position(|w| *w == id) else {
            continue;
        };
        working.remove(from);
        let to = retained_new
            .get(target + 1)
            .and_then(|successor| working.iter().position(|w| w == successor))
            .unwrap_or(working.len());
        working.insert(to, id);
        if from != to {
            edits.push(Edit::Move {
                from,
                to,
                id: id.clone(),
            });
        }
    }
}

/// Longest strictly increasing subsequence over distinct values, returned
/// as a keep-mask. Patience algorithm, O(n log n).
fn lis_mask(positions: &[usize]) -> Vec<bool> {
    // tails[k] = index of the smallest value ending an increasing run of
    // length k + 1; prev chains members back for reconstruction
    let mut tails: Vec<usize> = Vec::new();
    let mut prev: Vec<Option<usize>> = vec![None; positions.len()];

    for (index, &position) in positions.iter().enumerate() {
        let slot = tails.partition_point(|&t| positions[t] < position);
        if slot > 0 {
            prev[index] = Some(tails[slot - 1]);
        }
        if slot == tails.len() {
            tails.push(index);
        } else {
            tails[slot] = index;
        }
    }

    let mut mask = vec![false; positions.len()];
    let mut cursor = tails.last().copied();
    while let Some(index) = cursor {
        mask[index] = true;
        cursor = prev[index];
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> Record {
        Record {
            id: RecordId::from(id),
            title: format!("title {id}"),
            preview_ref: None,
            viewed: false,
        }
    }

    fn records(ids: &[&str]) -> Vec<Record> {
        ids.iter().map(|id| record(id)).collect()
    }

    fn plan(old: &[Record], new: &[Record], detect_moves: bool) -> EditScript {
        let old_refs: Vec<&Record> = old.iter().collect();
        let new_refs: Vec<&Record> = new.iter().collect();
        plan_edits(&old_refs, &new_refs, detect_moves)
    }

    fn remove(index: usize, id: &str) -> Edit {
        Edit::Remove {
            index,
            id: RecordId::from(id),
        }
    }

    fn mv(from: usize, to: usize, id: &str) -> Edit {
        Edit::Move {
            from,
            to,
            id: RecordId::from(id),
        }
    }

    fn insert(index: usize, id: &str) -> Edit {
        Edit::Insert {
            index,
            record: record(id),
        }
    }

    #[test]
    fn identical_orderings_need_no_edits() {
        let old = records(&["a", "b", "c"]);
        let script = plan(&old, &old.clone(), true);
        assert!(script.is_empty());
    }

    #[test]
    fn append_is_one_insert_at_the_tail() {
        let old = records(&["a", "b"]);
        let new = records(&["a", "b", "c"]);
        let script = plan(&old, &new, true);
        assert_eq!(script.edits, vec![insert(2, "c")]);
    }

    #[test]
    fn middle_removal_is_one_remove() {
        let old = records(&["a", "b", "c"]);
        let new = records(&["a", "c"]);
        let script = plan(&old, &new, true);
        assert_eq!(script.edits, vec![remove(1, "b")]);
    }

    #[test]
    fn removals_are_ordered_back_to_front() {
        let old = records(&["a", "b", "c", "d"]);
        let new = records(&["b"]);
        let script = plan(&old, &new, true);
        assert_eq!(
            script.edits,
            vec![remove(3, "d"), remove(2, "c"), remove(0, "a")]
        );
    }

    #[test]
    fn single_record_moved_to_front() {
        let old = records(&["a", "b", "c"]);
        let new = records(&["c", "a", "b"]);
        let script = plan(&old, &new, true);
        assert_eq!(script.edits, vec![mv(2, 0, "c")]);
    }

    #[test]
    fn single_record_moved_to_back() {
        let old = records(&["a", "b", "c"]);
        let new = records(&["b", "c", "a"]);
        let script = plan(&old, &new, true);
        assert_eq!(script.edits, vec![mv(0, 2, "a")]);
    }

    #[test]
    fn mixed_removal_move_and_insert() {
        let old = records(&["a", "b", "c", "d", "e"]);
        let new = records(&["e", "b", "f", "d", "a"]);
        let script = plan(&old, &new, true);
        assert_eq!(
            script.edits,
            vec![
                remove(2, "c"),
                mv(0, 3, "a"),
                mv(2, 0, "e"),
                insert(2, "f"),
            ]
        );
    }

    #[test]
    fn moves_decompose_into_remove_plus_insert_when_disabled() {
        let old = records(&["a", "b", "c", "d"]);
        let new = records(&["d", "a", "e", "b"]);
        let script = plan(&old, &new, false);
        assert_eq!(
            script.edits,
            vec![
                remove(3, "d"),
                remove(2, "c"),
                insert(0, "d"),
                insert(2, "e"),
            ]
        );
    }

    #[test]
    fn decomposed_insert_carries_the_new_content() {
        let old = records(&["a", "b"]);
        let mut new = records(&["b", "a"]);
        new[0].title = "fresh".to_string();

        let script = plan(&old, &new, false);
        let Some(Edit::Insert { record, .. }) = script
            .iter()
            .find(|edit| matches!(edit, Edit::Insert { .. }))
        else {
            panic!("expected an insert edit");
        };
        assert_eq!(record.title, "fresh");
    }

    #[test]
    fn full_reversal_keeps_one_anchor() {
        let old = records(&["a", "b", "c", "d"]);
        let new = records(&["d", "c", "b", "a"]);
        let script = plan(&old, &new, true);
        let counts = script.counts();
        assert_eq!(counts.moved, 3);
        assert_eq!(counts.removed, 0);
        assert_eq!(counts.inserted, 0);
    }

    #[test]
    fn empty_old_list_is_all_inserts_in_order() {
        let old = records(&[]);
        let new = records(&["a", "b", "c"]);
        let script = plan(&old, &new, true);
        assert_eq!(
            script.edits,
            vec![insert(0, "a"), insert(1, "b"), insert(2, "c")]
        );
    }

    #[test]
    fn empty_new_list_is_all_removes() {
        let old = records(&["a", "b"]);
        let new = records(&[]);
        let script = plan(&old, &new, true);
        assert_eq!(script.edits, vec![remove(1, "b"), remove(0, "a")]);
    }

    #[test]
    fn lis_mask_keeps_the_longest_run() {
        assert_eq!(lis_mask(&[3, 1, 2, 0]), vec![false, true, true, false]);
        assert_eq!(lis_mask(&[0, 1, 2]), vec![true, true, true]);
        assert_eq!(lis_mask(&[2, 1, 0]), vec![false, false, true]);
        assert_eq!(lis_mask(&[]), Vec::<bool>::new());
    }

    #[test]
    fn edit_json_uses_op_tags() {
        let script = EditScript {
            edits: vec![remove(2, "c"), mv(0, 3, "a"), insert(1, "f")],
        };
        let json = serde_json::to_value(&script).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!([
                { "op": "remove", "index": 2, "id": "c" },
                { "op": "move", "from": 0, "to": 3, "id": "a" },
                {
                    "op": "insert",
                    "index": 1,
                    "record": { "id": "f", "title": "title f", "viewed": false },
                },
            ])
        );
        let back: EditScript = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, script);
    }
}
