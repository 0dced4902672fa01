pub mod json;
pub mod table;

use crate::config::Config;
use crate::reconcile::Reconciliation;

/// Where the two snapshots came from, for report headers.
pub struct DiffContext {
    pub from_label: String,
    pub to_label: String,
    pub from_captured: Option<i64>,
    pub to_captured: Option<i64>,
}

pub fn print(result: &Reconciliation, context: &DiffContext, config: &Config) {
    if config.json_output {
        println!("{}", json::render(result));
    } else {
        print!("{}", table::render(result, context));
        print_diagnostics(result, config.verbose);
    }
}

fn print_diagnostics(result: &Reconciliation, verbose: bool) {
    if result.diagnostics.is_empty() {
        return;
    }

    println!();
    if verbose {
        println!("Diagnostics:");
        println!("{}", "-".repeat(40));
        for diagnostic in &result.diagnostics {
            println!("  {diagnostic}");
        }
    } else {
        for diagnostic in &result.diagnostics {
            println!("[diagnostic] {diagnostic}");
        }
    }
}
