//! The validated rule set the pipeline consumes.
//!
//! `RuleSet::from_cli` performs every cross-check of the configuration
//! surface; once it returns, the pipeline can rely on the values without
//! re-validation.

mod age;
mod size;

pub use age::{MaxAge, parse_max_age};
pub use size::{MaxSize, parse_max_size};

use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::{AgeType, Cli};
use crate::companion::CompanionRule;
use crate::error::{Result, RetentionsError};
use crate::output::Verbosity;
use crate::pattern::NamePattern;
use crate::plan::bucket::Granularity;
use crate::scanner;

/// Where a folder entry's timestamp comes from in folder mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderTimeSource {
    /// The directory's own stat.
    Folder,
    /// The newest descendant file.
    YoungestFile,
    /// The oldest descendant file.
    OldestFile,
    /// A named file inside the folder.
    Path(PathBuf),
}

impl FolderTimeSource {
    fn parse(raw: &str) -> Result<Self> {
        match raw {
            "folder" => Ok(Self::Folder),
            "youngest-file" => Ok(Self::YoungestFile),
            "oldest-file" => Ok(Self::OldestFile),
            _ => raw.strip_prefix("path=").map_or_else(
                || {
                    Err(RetentionsError::Config(format!(
                        "invalid --folder-mode value '{raw}'. Valid values: folder, \
                         youngest-file, oldest-file, path=<p>"
                    )))
                },
                |p| {
                    if p.is_empty() {
                        Err(RetentionsError::Config(
                            "--folder-mode path= requires a non-empty relative path".to_string(),
                        ))
                    } else {
                        Ok(Self::Path(PathBuf::from(p)))
                    }
                },
            ),
        }
    }
}

/// The fully validated configuration of one run.
#[derive(Debug, Clone)]
pub struct RuleSet {
    base: PathBuf,
    pattern: NamePattern,
    granularities: Vec<(Granularity, u32)>,
    last: Option<u32>,
    protect: Option<NamePattern>,
    max_age: Option<MaxAge>,
    max_files: Option<u64>,
    max_size: Option<MaxSize>,
    age_type: AgeType,
    folder_mode: Option<FolderTimeSource>,
    companions: Vec<CompanionRule>,
    dry_run: bool,
    list_only: Option<String>,
    verbosity: Verbosity,
    no_lock_file: bool,
    fail_on_delete_error: bool,
}

impl RuleSet {
    /// Builds and cross-validates the rule set from parsed arguments.
    ///
    /// # Errors
    /// Returns a configuration error for a missing or non-directory base
    /// path, an invalid pattern, no retention rule at all, out-of-range
    /// filter values, a malformed companion or folder-mode value, an
    /// unsupported age type, or `--list-only` combined with verbosity
    /// INFO or above.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let base = dunce::canonicalize(&cli.path).map_err(|e| {
            RetentionsError::Config(format!(
                "base directory '{}': {e}",
                cli.path.display()
            ))
        })?;
        if !base.is_dir() {
            return Err(RetentionsError::Config(format!(
                "base path '{}' is not a directory",
                base.display()
            )));
        }

        let pattern = NamePattern::new(&cli.pattern, cli.regex_mode)?;
        let protect = cli
            .protect
            .as_deref()
            .map(|p| NamePattern::new(p, cli.regex_mode))
            .transpose()?;

        let granularities: Vec<(Granularity, u32)> = [
            (Granularity::Minutes, cli.minutes),
            (Granularity::Hours, cli.hours),
            (Granularity::Days, cli.days),
            (Granularity::Weeks, cli.weeks),
            (Granularity::Week13, cli.week13),
            (Granularity::Months, cli.months),
            (Granularity::Quarters, cli.quarters),
            (Granularity::Years, cli.years),
        ]
        .into_iter()
        .filter_map(|(g, n)| n.map(|n| (g, n)))
        .collect();

        if granularities.is_empty() && cli.last.is_none() {
            return Err(RetentionsError::Config(
                "no retention rule given: at least one of --minutes, --hours, --days, \
                 --weeks, --week13, --months, --quarters, --years or --last is required"
                    .to_string(),
            ));
        }

        let max_age = cli.max_age.as_deref().map(parse_max_age).transpose()?;
        let max_size = cli.max_size.as_deref().map(parse_max_size).transpose()?;
        if cli.max_files == Some(0) {
            return Err(RetentionsError::Config(
                "--max-files must be greater than zero".to_string(),
            ));
        }

        let folder_mode = cli
            .folder_mode
            .as_deref()
            .map(FolderTimeSource::parse)
            .transpose()?;

        let companions = cli
            .delete_companions
            .iter()
            .map(|raw| CompanionRule::parse(raw))
            .collect::<Result<Vec<_>>>()?;

        if cli.list_only.is_some() && cli.verbose >= Verbosity::Info {
            return Err(RetentionsError::Config(
                "--list-only cannot be combined with --verbose INFO or DEBUG \
                 (stdout is reserved for the path list)"
                    .to_string(),
            ));
        }

        probe_age_type(&base, cli.age_type)?;

        Ok(Self {
            base,
            pattern,
            granularities,
            last: cli.last,
            protect,
            max_age,
            max_files: cli.max_files,
            max_size,
            age_type: cli.age_type,
            folder_mode,
            companions,
            dry_run: cli.dry_run,
            list_only: cli.list_only.clone(),
            verbosity: cli.verbose,
            no_lock_file: cli.no_lock_file,
            fail_on_delete_error: cli.fail_on_delete_error,
        })
    }

    #[must_use]
    pub fn base(&self) -> &Path {
        &self.base
    }

    #[must_use]
    pub const fn pattern(&self) -> &NamePattern {
        &self.pattern
    }

    /// Configured granularities with counts, finest first.
    #[must_use]
    pub fn granularities(&self) -> &[(Granularity, u32)] {
        &self.granularities
    }

    #[must_use]
    pub const fn last(&self) -> Option<u32> {
        self.last
    }

    #[must_use]
    pub const fn protect(&self) -> Option<&NamePattern> {
        self.protect.as_ref()
    }

    #[must_use]
    pub const fn max_age(&self) -> Option<&MaxAge> {
        self.max_age.as_ref()
    }

    #[must_use]
    pub const fn max_files(&self) -> Option<u64> {
        self.max_files
    }

    #[must_use]
    pub const fn max_size(&self) -> Option<&MaxSize> {
        self.max_size.as_ref()
    }

    #[must_use]
    pub const fn age_type(&self) -> AgeType {
        self.age_type
    }

    #[must_use]
    pub const fn folder_mode(&self) -> Option<&FolderTimeSource> {
        self.folder_mode.as_ref()
    }

    #[must_use]
    pub fn companions(&self) -> &[CompanionRule] {
        &self.companions
    }

    #[must_use]
    pub const fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// The list-only separator, if list-only mode is active.
    #[must_use]
    pub fn list_only(&self) -> Option<&str> {
        self.list_only.as_deref()
    }

    #[must_use]
    pub const fn no_lock_file(&self) -> bool {
        self.no_lock_file
    }

    #[must_use]
    pub const fn fail_on_delete_error(&self) -> bool {
        self.fail_on_delete_error
    }

    /// The configured verbosity, raised to INFO under `--dry-run` so the
    /// simulated run always shows its decision log.
    #[must_use]
    pub fn effective_verbosity(&self) -> Verbosity {
        if self.dry_run {
            self.verbosity.max(Verbosity::Info)
        } else {
            self.verbosity
        }
    }
}

/// Verifies that the chosen age type is supported here by probing the
/// base directory once. Support is checked, meaningfulness is not: an
/// `atime` on a `noatime` mount passes.
fn probe_age_type(base: &Path, age_type: AgeType) -> Result<()> {
    let meta = fs::metadata(base)
        .map_err(|e| RetentionsError::io_with_context(e, base.to_path_buf(), "reading metadata"))?;
    scanner::timestamp(&meta, age_type).map_err(|e| {
        RetentionsError::Config(format!(
            "--age-type {}: not supported on this platform or filesystem ({e})",
            age_type_token(age_type)
        ))
    })?;
    Ok(())
}

const fn age_type_token(age_type: AgeType) -> &'static str {
    match age_type {
        AgeType::Mtime => "mtime",
        AgeType::Ctime => "ctime",
        AgeType::Atime => "atime",
        AgeType::Birthtime => "birthtime",
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
