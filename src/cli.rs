use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::output::Verbosity;

/// Regex interpretation of the name pattern.
///
/// When absent, the pattern is a shell-style glob (case-sensitive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RegexMode {
    /// Regular expression, case-sensitive
    Casesensitive,
    /// Regular expression, case-insensitive
    Ignorecase,
}

/// File timestamp used for ordering and calendar bucketing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum AgeType {
    /// Last modification time
    #[default]
    Mtime,
    /// Metadata change time on Unix, creation time elsewhere
    Ctime,
    /// Last access time
    Atime,
    /// Creation time (not available on every filesystem)
    Birthtime,
}

#[derive(Parser, Debug)]
#[command(name = "retentions")]
#[command(
    author,
    version,
    about = "Apply backup-style retention policy to the children of a directory",
    long_about = "Partition the direct children of a directory that match a name pattern \
    into a keep set and a prune set, following calendar retention rules, then delete, \
    simulate, or list the prune set."
)]
#[allow(clippy::struct_excessive_bools)] // CLI flags are inherently boolean
pub struct Cli {
    /// Base directory whose direct children are candidates
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Name pattern selecting candidates (glob unless --regex-mode is given)
    #[arg(value_name = "PATTERN")]
    pub pattern: String,

    /// Keep the newest entry of each of the newest N minute slots
    #[arg(long, value_name = "N", hide = true)]
    pub minutes: Option<u32>,

    /// Keep the newest entry of each of the newest N hour slots
    #[arg(long, value_name = "N")]
    pub hours: Option<u32>,

    /// Keep the newest entry of each of the newest N calendar days
    #[arg(long, value_name = "N")]
    pub days: Option<u32>,

    /// Keep the newest entry of each of the newest N ISO weeks
    #[arg(long, value_name = "N")]
    pub weeks: Option<u32>,

    /// Keep the newest entry of each of the newest N 13-week blocks
    #[arg(long, value_name = "N")]
    pub week13: Option<u32>,

    /// Keep the newest entry of each of the newest N calendar months
    #[arg(long, value_name = "N")]
    pub months: Option<u32>,

    /// Keep the newest entry of each of the newest N calendar quarters
    #[arg(long, value_name = "N")]
    pub quarters: Option<u32>,

    /// Keep the newest entry of each of the newest N calendar years
    #[arg(long, value_name = "N")]
    pub years: Option<u32>,

    /// Keep the N newest entries regardless of calendar slots
    #[arg(long, value_name = "N")]
    pub last: Option<u32>,

    /// Demote kept entries older than this duration (suffixes: s, h, d, w, m, q, y)
    #[arg(long, value_name = "DURATION")]
    pub max_age: Option<String>,

    /// Demote the oldest kept entries beyond this count
    #[arg(long, value_name = "COUNT")]
    pub max_files: Option<u64>,

    /// Demote kept entries once their cumulative size exceeds this (suffixes: K, M, G, T, P, E)
    #[arg(long, value_name = "SIZE")]
    pub max_size: Option<String>,

    /// Interpret the patterns as regular expressions instead of globs
    #[arg(long, value_enum, value_name = "MODE")]
    pub regex_mode: Option<RegexMode>,

    /// Timestamp used for ordering and bucketing
    #[arg(long, value_enum, default_value = "mtime", value_name = "KIND")]
    pub age_type: AgeType,

    /// Never touch entries whose basename matches this pattern
    #[arg(long, value_name = "PATTERN")]
    pub protect: Option<String>,

    /// Treat direct child directories as entries; the optional value picks the
    /// folder time source: folder, youngest-file, oldest-file, or path=<p>
    #[arg(
        long,
        value_name = "SOURCE",
        num_args = 0..=1,
        default_missing_value = "folder"
    )]
    pub folder_mode: Option<String>,

    /// Companion rules TYPE:MATCH:COMPANIONS applied to pruned entries
    #[arg(long = "delete-companions", value_name = "RULE", num_args = 1..)]
    pub delete_companions: Vec<String>,

    /// Decide and report without deleting anything
    #[arg(long)]
    pub dry_run: bool,

    /// Print the prune set on stdout, optionally separated by SEP (default newline)
    #[arg(
        long,
        value_name = "SEP",
        num_args = 0..=1,
        default_missing_value = "\n"
    )]
    pub list_only: Option<String>,

    /// Log level: 0-3 or ERROR, WARN, INFO, DEBUG
    #[arg(long, value_name = "LEVEL", default_value = "WARN")]
    pub verbose: Verbosity,

    /// Skip lock-file acquisition (caller manages concurrency)
    #[arg(long)]
    pub no_lock_file: bool,

    /// Abort with an I/O error on the first failed deletion
    #[arg(long)]
    pub fail_on_delete_error: bool,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
