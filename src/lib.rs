//! Riffle reconciles keyed record lists: given two snapshots of an
//! ordered list, it produces the minimal structural edits and the
//! field-level changes needed to bring a consumer from one to the other.

pub mod cli;
pub mod config;
pub mod model;
pub mod reconcile;
pub mod report;
pub mod snapshot;
pub mod util;
