//! Terminal rendering for reconciliation results.
//!
//! Formats the outcome as a grouped report:
//! - header naming the two snapshots and their capture times
//! - edits grouped by kind, in script order
//! - field changes per record, one line each
//! - summary line with the edit and change totals

use crate::model::Record;
use crate::reconcile::edit::Edit;
use crate::reconcile::payload::{ChangeDescriptor, FieldChange};
use crate::reconcile::Reconciliation;
use crate::util::{display_title, format_timestamp};

use super::DiffContext;

pub fn render(result: &Reconciliation, context: &DiffContext) -> String {
    let mut output = String::new();

    output.push_str("\nComparing snapshots:\n");
    output.push_str(&format!(
        "  From: {}{}\n",
        context.from_label,
        captured_suffix(context.from_captured)
    ));
    output.push_str(&format!(
        "  To:   {}{}\n",
        context.to_label,
        captured_suffix(context.to_captured)
    ));
    output.push('\n');

    if result.is_empty() {
        output.push_str("No changes detected.\n");
        return output;
    }

    let removes: Vec<&Edit> = result
        .script
        .iter()
        .filter(|e| matches!(e, Edit::Remove { .. }))
        .collect();
    let moves: Vec<&Edit> = result
        .script
        .iter()
        .filter(|e| matches!(e, Edit::Move { .. }))
        .collect();
    let inserts: Vec<&Edit> = result
        .script
        .iter()
        .filter(|e| matches!(e, Edit::Insert { .. }))
        .collect();

    if !removes.is_empty() {
        output.push_str("Removed:\n");
        for edit in removes {
            if let Edit::Remove { index, id } = edit {
                output.push_str(&format!("  [-] {id} from position {index}\n"));
            }
        }
        output.push('\n');
    }

    if !moves.is_empty() {
        output.push_str("Moved:\n");
        for edit in moves {
            if let Edit::Move { from, to, id } = edit {
                output.push_str(&format!("  [>] {id} from {from} to {to}\n"));
            }
        }
        output.push('\n');
    }

    if !inserts.is_empty() {
        output.push_str("Inserted:\n");
        for edit in inserts {
            if let Edit::Insert { index, record } = edit {
                output.push_str(&format!(
                    "  [+] {} {} at position {index}\n",
                    record.id,
                    display_title(&record.title)
                ));
            }
        }
        output.push('\n');
    }

    if !result.changes.is_empty() {
        output.push_str("Changed:\n");
        for descriptor in &result.changes {
            output.push_str(&format!(
                "  [~] {}: {}\n",
                descriptor.id,
                describe_fields(descriptor)
            ));
        }
        output.push('\n');
    }

    let counts = result.script.counts();
    output.push_str(&format!(
        "Summary: {} removed, {} moved, {} inserted, {} changed\n",
        counts.removed,
        counts.moved,
        counts.inserted,
        result.changes.len()
    ));

    output
}

fn captured_suffix(captured_at: Option<i64>) -> String {
    match captured_at {
        Some(timestamp) => format!(" ({})", format_timestamp(timestamp)),
        None => String::new(),
    }
}

fn describe_fields(descriptor: &ChangeDescriptor) -> String {
    let parts: Vec<String> = descriptor.fields.iter().map(describe_field).collect();
    parts.join(", ")
}

fn describe_field(change: &FieldChange) -> String {
    match change {
        FieldChange::Title(title) => format!("title -> {}", display_title(title)),
        FieldChange::PreviewRef(Some(preview)) => format!("preview -> {preview}"),
        FieldChange::PreviewRef(None) => String::from("preview cleared"),
        FieldChange::Viewed(viewed) => format!("viewed -> {viewed}"),
    }
}

/// One line per record, for `patch` output.
pub fn render_records(records: &[Record]) -> String {
    let mut output = String::new();
    output.push_str(&format!("{} records\n", records.len()));
    output.push_str(&"-".repeat(40));
    output.push('\n');
    for (position, record) in records.iter().enumerate() {
        let viewed = if record.viewed { " viewed" } else { "" };
        output.push_str(&format!(
            "  {position:>4}  {}  {}{viewed}\n",
            record.id,
            display_title(&record.title)
        ));
    }
    output
}
