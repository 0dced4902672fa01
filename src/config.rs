use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::cli::DiffArgs;
use crate::reconcile::{DuplicatePolicy, ReconcileOptions};

#[derive(Debug)]
pub struct Config {
    pub options: ReconcileOptions,
    pub json_output: bool,
    pub verbose: bool,
}

/// Optional settings file (~/.config/riffle/config.toml or platform
/// equivalent). Flags override anything set here.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    detect_moves: Option<bool>,
    duplicate_policy: Option<String>,
}

impl Config {
    pub fn from_diff_args(args: &DiffArgs) -> Result<Self, String> {
        let file = load_file_config(args.config.as_deref())?;

        let mut options = ReconcileOptions::default();
        if let Some(detect_moves) = file.detect_moves {
            options.detect_moves = detect_moves;
        }
        if let Some(policy) = &file.duplicate_policy {
            options.duplicate_policy = parse_policy(policy)?;
        }
        if args.no_moves {
            options.detect_moves = false;
        }
        if let Some(policy) = &args.duplicates {
            options.duplicate_policy = parse_policy(policy)?;
        }

        Ok(Config {
            options,
            json_output: args.json,
            verbose: args.verbose,
        })
    }
}

fn parse_policy(value: &str) -> Result<DuplicatePolicy, String> {
    DuplicatePolicy::parse(value).ok_or_else(|| {
        format!("invalid duplicate policy '{value}', expected 'reject' or 'first-wins'")
    })
}

fn load_file_config(explicit: Option<&Path>) -> Result<FileConfig, String> {
    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(format!("config file {} does not exist", path.display()));
            }
            path.to_path_buf()
        }
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(FileConfig::default()),
        },
    };

    let text = std::fs::read_to_string(&path)
        .map_err(|e| format!("failed to read config file {}: {e}", path.display()))?;
    toml::from_str(&text).map_err(|e| format!("invalid config file {}: {e}", path.display()))
}

fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "riffle")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diff_args() -> DiffArgs {
        DiffArgs {
            old: PathBuf::from("old.json"),
            new: PathBuf::from("new.json"),
            json: false,
            no_moves: false,
            duplicates: None,
            config: None,
            verbose: false,
        }
    }

    #[test]
    fn defaults_keep_moves_on_and_reject_duplicates() {
        let config = Config::from_diff_args(&diff_args()).expect("config");
        assert!(config.options.detect_moves);
        assert_eq!(config.options.duplicate_policy, DuplicatePolicy::Reject);
        assert!(!config.json_output);
        assert!(!config.verbose);
    }

    #[test]
    fn flags_override_the_config_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "detect_moves = true\nduplicate_policy = \"reject\"\n")
            .expect("write");

        let mut args = diff_args();
        args.config = Some(path);
        args.no_moves = true;
        args.duplicates = Some("first-wins".to_string());

        let config = Config::from_diff_args(&args).expect("config");
        assert!(!config.options.detect_moves);
        assert_eq!(config.options.duplicate_policy, DuplicatePolicy::FirstWins);
    }

    #[test]
    fn file_settings_apply_when_no_flags_are_given() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "detect_moves = false\nduplicate_policy = \"first-wins\"\n",
        )
        .expect("write");

        let mut args = diff_args();
        args.config = Some(path);

        let config = Config::from_diff_args(&args).expect("config");
        assert!(!config.options.detect_moves);
        assert_eq!(config.options.duplicate_policy, DuplicatePolicy::FirstWins);
    }

    #[test]
    fn bad_policy_string_is_an_error() {
        let mut args = diff_args();
        args.duplicates = Some("last-wins".to_string());

        let err = Config::from_diff_args(&args).expect_err("policy");
        assert!(err.contains("last-wins"));
    }

    #[test]
    fn missing_explicit_config_file_is_an_error() {
        let mut args = diff_args();
        args.config = Some(PathBuf::from("/nonexistent/riffle.toml"));

        let err = Config::from_diff_args(&args).expect_err("missing file");
        assert!(err.contains("does not exist"));
    }
}
