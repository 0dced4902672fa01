//! Field-level change payloads.
//!
//! When a record appears in both snapshots with different content, the
//! renderer should patch only the fields that differ instead of rebinding
//! the whole item. A `ChangeDescriptor` names exactly those fields.

use serde::{Deserialize, Serialize};

use crate::model::{PreviewRef, Record, RecordId};

/// One changed field, carrying the new value.
///
/// The variants mirror the record schema, so a payload can never reference
/// a field that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum FieldChange {
    Title(String),
    PreviewRef(Option<PreviewRef>),
    Viewed(bool),
}

impl FieldChange {
    pub fn field_name(&self) -> &'static str {
        match self {
            FieldChange::Title(_) => "title",
            FieldChange::PreviewRef(_) => "preview_ref",
            FieldChange::Viewed(_) => "viewed",
        }
    }
}

/// Minimal set of field differences between two records sharing an id.
///
/// `fields` is never empty: a pair with no differing field produces no
/// descriptor at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeDescriptor {
    pub id: RecordId,
    pub fields: Vec<FieldChange>,
}

/// Compare two records matched by identity. Returns None when they are
/// content-equal. Callers must pass records with the same id.
///
/// Fields are compared and emitted in a fixed order (title, preview_ref,
/// viewed) so the output is deterministic.
pub fn diff_records(old: &Record, new: &Record) -> Option<ChangeDescriptor> {
    let mut fields = Vec::new();

    if old.title != new.title {
        fields.push(FieldChange::Title(new.title.clone()));
    }
    if old.preview_ref != new.preview_ref {
        fields.push(FieldChange::PreviewRef(new.preview_ref.clone()));
    }
    if old.viewed != new.viewed {
        fields.push(FieldChange::Viewed(new.viewed));
    }

    if fields.is_empty() {
        None
    } else {
        Some(ChangeDescriptor {
            id: new.id.clone(),
            fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, title: &str, preview: Option<&str>, viewed: bool) -> Record {
        Record {
            id: RecordId::from(id),
            title: title.to_string(),
            preview_ref: preview.map(PreviewRef::new),
            viewed,
        }
    }

    #[test]
    fn equal_records_produce_no_descriptor() {
        let a = record("a", "title", Some("p-1"), true);
        assert!(diff_records(&a, &a.clone()).is_none());
    }

    #[test]
    fn single_field_difference() {
        let old = record("a", "x", None, false);
        let new = record("a", "y", None, false);

        let descriptor = diff_records(&old, &new).expect("descriptor");
        assert_eq!(descriptor.id, RecordId::from("a"));
        assert_eq!(descriptor.fields, vec![FieldChange::Title("y".to_string())]);
    }

    #[test]
    fn multiple_fields_in_canonical_order() {
        let old = record("a", "x", Some("p-1"), false);
        let new = record("a", "y", None, true);

        let descriptor = diff_records(&old, &new).expect("descriptor");
        assert_eq!(
            descriptor.fields,
            vec![
                FieldChange::Title("y".to_string()),
                FieldChange::PreviewRef(None),
                FieldChange::Viewed(true),
            ]
        );
    }

    #[test]
    fn preview_cleared_is_a_change() {
        let old = record("a", "t", Some("p-1"), false);
        let new = record("a", "t", None, false);

        let descriptor = diff_records(&old, &new).expect("descriptor");
        assert_eq!(descriptor.fields, vec![FieldChange::PreviewRef(None)]);
    }

    #[test]
    fn reversed_diff_touches_the_same_fields() {
        let old = record("a", "x", Some("p-1"), false);
        let new = record("a", "y", Some("p-1"), true);

        let forward = diff_records(&old, &new).expect("forward");
        let backward = diff_records(&new, &old).expect("backward");

        let forward_fields: Vec<&str> =
            forward.fields.iter().map(|f| f.field_name()).collect();
        let backward_fields: Vec<&str> =
            backward.fields.iter().map(|f| f.field_name()).collect();
        assert_eq!(forward_fields, backward_fields);

        // values are swapped, not repeated
        assert_eq!(forward.fields[0], FieldChange::Title("y".to_string()));
        assert_eq!(backward.fields[0], FieldChange::Title("x".to_string()));
    }

    #[test]
    fn descriptor_json_shape() {
        let old = record("a", "x", None, false);
        let new = record("a", "x", Some("p-9"), false);

        let descriptor = diff_records(&old, &new).expect("descriptor");
        let json = serde_json::to_value(&descriptor).expect("serialize");

        assert_eq!(
            json,
            serde_json::json!({
                "id": "a",
                "fields": [{ "field": "preview_ref", "value": "p-9" }],
            })
        );
    }
}
