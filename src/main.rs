use clap::Parser;
use riffle::cli::{CheckArgs, Cli, Command, DiffArgs, PatchArgs};
use riffle::config::Config;
use riffle::model::Snapshot;
use riffle::reconcile::{self, Reconciliation};
use riffle::report;
use riffle::snapshot;
use std::path::Path;

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Diff(args) => run_diff(args),
        Command::Check(args) => run_check(args),
        Command::Patch(args) => run_patch(args),
    }
}

fn run_diff(args: DiffArgs) {
    let config = match Config::from_diff_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let old = load_snapshot(&args.old);
    let new = load_snapshot(&args.new);

    let result = match reconcile::reconcile(&old, &new, &config.options) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error comparing snapshots: {e}");
            std::process::exit(1);
        }
    };

    let context = report::DiffContext {
        from_label: args.old.display().to_string(),
        to_label: args.new.display().to_string(),
        from_captured: old.captured_at,
        to_captured: new.captured_at,
    };

    report::print(&result, &context, &config);
}

fn run_check(args: CheckArgs) {
    let loaded = load_snapshot(&args.file);
    let violations = snapshot::find_duplicate_ids(&loaded);
    let valid = violations.is_empty();

    if args.json {
        let summary = serde_json::json!({
            "path": args.file.display().to_string(),
            "records": loaded.len(),
            "valid": valid,
            "violations": violations,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).unwrap_or_else(|_| String::from("{}"))
        );
    } else if valid {
        println!(
            "{}: {} records, all ids unique",
            args.file.display(),
            loaded.len()
        );
    } else {
        for violation in &violations {
            println!(
                "duplicate id {} at positions {} and {}",
                violation.id, violation.first, violation.second
            );
        }
    }

    if !valid {
        std::process::exit(1);
    }
}

fn run_patch(args: PatchArgs) {
    let old = load_snapshot(&args.old);
    let reconciliation = load_reconciliation(&args.reconciliation);

    let patched = match reconcile::apply::apply(&old.records, &reconciliation) {
        Ok(records) => records,
        Err(e) => {
            eprintln!("Error applying reconciliation: {e}");
            std::process::exit(1);
        }
    };

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&patched).unwrap_or_else(|_| String::from("[]"))
        );
    } else {
        print!("{}", report::table::render_records(&patched));
    }
}

fn load_snapshot(path: &Path) -> Snapshot {
    match snapshot::load(path) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

fn load_reconciliation(path: &Path) -> Reconciliation {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("failed to read {}: {e}", path.display());
            std::process::exit(1);
        }
    };
    match serde_json::from_str(&text) {
        Ok(reconciliation) => reconciliation,
        Err(e) => {
            eprintln!("failed to parse {}: {e}", path.display());
            std::process::exit(1);
        }
    }
}
