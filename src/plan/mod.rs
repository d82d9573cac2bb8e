//! The decision pipeline: a pure computation from (sorted entries,
//! rule set, pipeline start instant) to a justified keep/prune
//! partition. No stage in this module touches the filesystem.

pub mod bucket;
mod filters;
mod retain;

pub use filters::apply_filters;
pub use retain::{apply_protection, apply_retention};

use chrono::{DateTime, Local};

use crate::config::RuleSet;
use crate::entry::{Decision, Entry};
use crate::error::{Result, RetentionsError};

/// Runs protection, retention and the filters over a newest-first
/// entry list. Afterwards every entry carries a final decision.
pub fn decide(entries: &mut [Entry], rules: &RuleSet, now: DateTime<Local>) {
    apply_protection(entries, rules);
    apply_retention(entries, rules);
    apply_filters(entries, rules, now);
}

/// Verifies that the partition is total and disjoint: every discovered
/// entry holds exactly one final decision, and the keep and prune sets
/// cover the discovery set.
///
/// # Errors
/// Returns an integrity error if any entry is undecided or the
/// partition does not reconcile. Nothing has been deleted at this
/// point.
pub fn verify_partition(entries: &[Entry]) -> Result<()> {
    let mut protected = 0usize;
    let mut retained = 0usize;
    let mut pruned = 0usize;
    for entry in entries {
        match &entry.decision {
            Decision::Undecided => {
                return Err(RetentionsError::Integrity(format!(
                    "entry '{}' has no final decision",
                    entry.path.display()
                )));
            }
            Decision::Protected => protected += 1,
            Decision::Retained(_) => retained += 1,
            Decision::Pruned(_) => pruned += 1,
        }
    }
    if protected + retained + pruned != entries.len() {
        return Err(RetentionsError::Integrity(format!(
            "partition does not cover the discovery set: {protected} protected + \
             {retained} retained + {pruned} pruned != {} discovered",
            entries.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
