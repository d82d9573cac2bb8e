//! The execution stage: delete, simulate, or list the prune set.
//!
//! This is the only module that mutates the filesystem (besides the
//! lock file), and it runs strictly after the partition has been
//! verified.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::companion::Companion;
use crate::config::RuleSet;
use crate::entry::{Decision, Entry, EntryKind};
use crate::error::{Result, RetentionsError};
use crate::output::Reporter;

/// Counters of one run, reported at INFO.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub protected: usize,
    pub retained: usize,
    pub pruned: usize,
    pub deleted: usize,
    pub failed: usize,
}

/// Executes the verified partition in the configured mode.
///
/// Pruned entries are processed newest-first, each followed by its
/// companions.
///
/// # Errors
/// Returns an I/O error on the first failed deletion when
/// `--fail-on-delete-error` is set, or when list-only output cannot be
/// written.
pub fn execute(
    entries: &[Entry],
    companions: &[Companion],
    rules: &RuleSet,
    reporter: &Reporter,
) -> Result<RunSummary> {
    let mut summary = RunSummary::default();
    for entry in entries {
        match &entry.decision {
            Decision::Protected => summary.protected += 1,
            Decision::Retained(_) => summary.retained += 1,
            Decision::Pruned(_) => summary.pruned += 1,
            Decision::Undecided => {}
        }
    }
    summary.pruned += companions.len();

    if let Some(separator) = rules.list_only() {
        list_prune_set(entries, companions, separator)?;
        return Ok(summary);
    }

    reporter.report_decisions(entries, companions);

    if rules.dry_run() {
        reporter.info(format!(
            "dry run: would delete {} of {} entries",
            summary.pruned,
            summary.pruned + summary.retained
        ));
        return Ok(summary);
    }

    for entry in entries.iter().filter(|e| e.decision.is_pruned()) {
        delete_path(&entry.path, entry.kind, rules, reporter, &mut summary)?;
        for companion in companions.iter().filter(|c| c.source == entry.path) {
            delete_path(&companion.path, EntryKind::File, rules, reporter, &mut summary)?;
        }
    }

    reporter.info(format!(
        "retained {}, deleted {} of {} pruned",
        summary.retained, summary.deleted, summary.pruned
    ));
    Ok(summary)
}

fn delete_path(
    path: &Path,
    kind: EntryKind,
    rules: &RuleSet,
    reporter: &Reporter,
    summary: &mut RunSummary,
) -> Result<()> {
    let outcome = match kind {
        EntryKind::File => fs::remove_file(path),
        EntryKind::Folder => fs::remove_dir_all(path),
    };
    match outcome {
        Ok(()) => {
            summary.deleted += 1;
            reporter.info(format!("deleted {}", path.display()));
            Ok(())
        }
        Err(e) if rules.fail_on_delete_error() => Err(RetentionsError::io_with_context(
            e,
            path.to_path_buf(),
            "deleting",
        )),
        Err(e) => {
            summary.failed += 1;
            reporter.warn(format!("failed to delete '{}': {e}", path.display()));
            Ok(())
        }
    }
}

/// Writes the prune set to stdout, paths joined by `separator`.
fn list_prune_set(entries: &[Entry], companions: &[Companion], separator: &str) -> Result<()> {
    let mut paths: Vec<String> = Vec::new();
    for entry in entries.iter().filter(|e| e.decision.is_pruned()) {
        paths.push(entry.path.display().to_string());
        for companion in companions.iter().filter(|c| c.source == entry.path) {
            paths.push(companion.path.display().to_string());
        }
    }
    if paths.is_empty() {
        return Ok(());
    }
    let stdout = io::stdout();
    let mut out = stdout.lock();
    out.write_all(paths.join(separator).as_bytes())
        .and_then(|()| out.write_all(b"\n"))
        .map_err(|e| RetentionsError::io_with_context(e, "<stdout>".into(), "writing list"))?;
    Ok(())
}

#[cfg(test)]
#[path = "exec_tests.rs"]
mod tests;
