use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "riffle")]
#[command(about = "A reconciliation engine for keyed record lists")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compare two snapshot files and output the edits and field changes
    Diff(DiffArgs),

    /// Validate a snapshot file
    Check(CheckArgs),

    /// Apply a saved reconciliation to a snapshot
    Patch(PatchArgs),
}

#[derive(Parser)]
pub struct DiffArgs {
    /// Snapshot to compare from
    pub old: PathBuf,

    /// Snapshot to compare to
    pub new: PathBuf,

    /// Output as JSON instead of a report
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Emit remove and insert edits instead of moves
    #[arg(long, default_value_t = false)]
    pub no_moves: bool,

    /// Duplicate id handling: reject or first-wins
    #[arg(long)]
    pub duplicates: Option<String>,

    /// Read settings from a specific config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Show detailed output including diagnostics
    #[arg(long, short = 'v', default_value_t = false)]
    pub verbose: bool,
}

#[derive(Parser)]
pub struct CheckArgs {
    /// Snapshot file to validate
    pub file: PathBuf,

    /// Output as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Parser)]
pub struct PatchArgs {
    /// Snapshot to patch
    pub old: PathBuf,

    /// Reconciliation file, as written by `riffle diff --json`
    pub reconciliation: PathBuf,

    /// Output as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}
