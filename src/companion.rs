//! Companion files: siblings pulled into the prune set by a syntactic
//! naming rule applied to each pruned entry.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexSet;

use crate::entry::{Decision, Entry};
use crate::error::{Result, RetentionsError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanionKind {
    Prefix,
    Suffix,
}

/// One `TYPE:MATCH:COMPANIONS` rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanionRule {
    kind: CompanionKind,
    matcher: String,
    companions: Vec<String>,
}

impl CompanionRule {
    /// Parses a rule string of the shape `TYPE:MATCH:COMPANIONS`.
    ///
    /// TYPE is `prefix` or `suffix`, MATCH is a possibly empty literal,
    /// COMPANIONS is a non-empty comma-separated list of literal
    /// replacements.
    ///
    /// # Errors
    /// Returns a configuration error for a malformed rule.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut parts = raw.splitn(3, ':');
        let (Some(kind), Some(matcher), Some(companions)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(RetentionsError::Config(format!(
                "invalid companion rule '{raw}': expected TYPE:MATCH:COMPANIONS"
            )));
        };
        let kind = match kind {
            "prefix" => CompanionKind::Prefix,
            "suffix" => CompanionKind::Suffix,
            _ => {
                return Err(RetentionsError::Config(format!(
                    "invalid companion rule '{raw}': TYPE must be 'prefix' or 'suffix'"
                )));
            }
        };
        let companions: Vec<String> = companions
            .split(',')
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();
        if companions.is_empty() {
            return Err(RetentionsError::Config(format!(
                "invalid companion rule '{raw}': at least one companion literal is required"
            )));
        }
        Ok(Self {
            kind,
            matcher: matcher.to_string(),
            companions,
        })
    }

    /// Candidate sibling basenames for `name`, or empty if the rule
    /// does not match.
    #[must_use]
    pub fn candidates(&self, name: &str) -> Vec<String> {
        match self.kind {
            CompanionKind::Suffix => name.strip_suffix(self.matcher.as_str()).map(|stem| {
                self.companions
                    .iter()
                    .map(|c| format!("{stem}{c}"))
                    .collect()
            }),
            CompanionKind::Prefix => name.strip_prefix(self.matcher.as_str()).map(|rest| {
                self.companions
                    .iter()
                    .map(|c| format!("{c}{rest}"))
                    .collect()
            }),
        }
        .unwrap_or_default()
    }
}

/// A sibling path scheduled for deletion alongside a pruned entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Companion {
    pub path: PathBuf,
    /// The pruned entry that pulled this path in.
    pub source: PathBuf,
}

/// Expands the companion rules over the pruned entries.
///
/// Candidates that are missing, not regular files, or symlinks are
/// skipped; duplicates (including pruned entries themselves) are
/// dropped in first-seen order.
///
/// # Errors
/// Returns an integrity error if a candidate collides with a protected
/// or retained entry; nothing has been deleted at this point.
pub fn expand(entries: &[Entry], rules: &[CompanionRule]) -> Result<Vec<Companion>> {
    if rules.is_empty() {
        return Ok(Vec::new());
    }

    let decisions: HashMap<&Path, &Decision> = entries
        .iter()
        .map(|e| (e.path.as_path(), &e.decision))
        .collect();
    let mut seen: IndexSet<PathBuf> = entries
        .iter()
        .filter(|e| e.decision.is_pruned())
        .map(|e| e.path.clone())
        .collect();

    let mut companions = Vec::new();
    for entry in entries.iter().filter(|e| e.decision.is_pruned()) {
        let Some(parent) = entry.path.parent() else {
            continue;
        };
        for rule in rules {
            for candidate_name in rule.candidates(&entry.name) {
                let candidate = parent.join(&candidate_name);
                if seen.contains(&candidate) {
                    continue;
                }
                let Ok(meta) = fs::symlink_metadata(&candidate) else {
                    continue;
                };
                if meta.file_type().is_symlink() || !meta.is_file() {
                    continue;
                }
                match decisions.get(candidate.as_path()) {
                    Some(Decision::Protected) => {
                        return Err(RetentionsError::Integrity(format!(
                            "companion '{}' of pruned entry '{}' is protected",
                            candidate.display(),
                            entry.path.display()
                        )));
                    }
                    Some(Decision::Retained(_)) => {
                        return Err(RetentionsError::Integrity(format!(
                            "companion '{}' of pruned entry '{}' is retained",
                            candidate.display(),
                            entry.path.display()
                        )));
                    }
                    _ => {}
                }
                seen.insert(candidate.clone());
                companions.push(Companion {
                    path: candidate,
                    source: entry.path.clone(),
                });
            }
        }
    }
    Ok(companions)
}

#[cfg(test)]
#[path = "companion_tests.rs"]
mod tests;
