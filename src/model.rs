use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identity token, unique within a snapshot.
/// Equality of ids defines "same item"; nothing else does.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        RecordId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        RecordId(id.to_string())
    }
}

/// Reference to an externally stored preview asset. The reconciler only
/// ever compares these, it never resolves them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreviewRef(String);

impl PreviewRef {
    pub fn new(reference: impl Into<String>) -> Self {
        PreviewRef(reference.into())
    }
}

impl fmt::Display for PreviewRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One identified item in a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_ref: Option<PreviewRef>,
    #[serde(default)]
    pub viewed: bool,
}

impl Record {
    /// Content equality: all of title, preview_ref and viewed are equal.
    /// The id is identity, not content, and is deliberately excluded.
    pub fn content_eq(&self, other: &Record) -> bool {
        self.title == other.title
            && self.preview_ref == other.preview_ref
            && self.viewed == other.viewed
    }
}

/// An ordered list of records captured at one point in time.
///
/// `captured_at` (unix seconds) and `selected` ride along for consumers;
/// neither participates in reconciliation. A snapshot is never mutated
/// after capture: transitions replace the whole value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<RecordId>,
    #[serde(default)]
    pub records: Vec<Record>,
}

impl Snapshot {
    /// The empty list. Also what an absent input collapses to: callers
    /// with no previous snapshot reconcile from here.
    pub fn empty() -> Self {
        Snapshot::default()
    }

    pub fn from_records(records: Vec<Record>) -> Self {
        Snapshot {
            captured_at: None,
            selected: None,
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Index of the record with the given id, if present.
    pub fn position_of(&self, id: &RecordId) -> Option<usize> {
        self.records.iter().position(|r| &r.id == id)
    }
}
