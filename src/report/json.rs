//! JSON output for reconciliation results.
//!
//! Serializes the full outcome for scripting and piping. The output of
//! `diff --json` feeds straight back into `patch`.

use crate::reconcile::Reconciliation;

pub fn render(result: &Reconciliation) -> String {
    serde_json::to_string_pretty(result).unwrap_or_else(|_| String::from("{}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Record, RecordId, Snapshot};
    use crate::reconcile::{reconcile, ReconcileOptions};

    #[test]
    fn rendered_json_parses_back_into_the_same_outcome() {
        let old = Snapshot::from_records(vec![Record {
            id: RecordId::from("a"),
            title: "a".to_string(),
            preview_ref: None,
            viewed: false,
        }]);
        let new = Snapshot::empty();

        let result = reconcile(&old, &new, &ReconcileOptions::default()).expect("ok");
        let text = render(&result);
        let back: Reconciliation = serde_json::from_str(&text).expect("parse");
        assert_eq!(back, result);
    }
}
