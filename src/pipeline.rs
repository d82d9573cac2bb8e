//! The run lifecycle, wired together from the stage modules:
//!
//! `ConfigValid → Locked → Discovered → Partitioned → Verified →
//! (Executed | Simulated | Listed) → Unlocked`.
//!
//! A fatal error at any stage unwinds through the lock guard, so the
//! lock is released on every exit path. Nothing is deleted before the
//! partition has been verified.

use chrono::Local;

use crate::companion;
use crate::config::RuleSet;
use crate::error::Result;
use crate::exec::{self, RunSummary};
use crate::lock::LockGuard;
use crate::output::Reporter;
use crate::plan;
use crate::scanner;

/// Runs the whole pipeline for a validated rule set.
///
/// # Errors
/// Propagates the first fatal stage error; the exit code mapping lives
/// on the error type.
pub fn run(rules: &RuleSet) -> Result<RunSummary> {
    let reporter = Reporter::new(rules.effective_verbosity());

    let _lock = if rules.no_lock_file() {
        None
    } else {
        Some(LockGuard::acquire(rules.base())?)
    };

    // The single wall-clock capture every later stage depends on.
    let now = Local::now();

    let mut entries = scanner::discover(rules, &reporter)?;
    plan::decide(&mut entries, rules, now);
    plan::verify_partition(&entries)?;
    let companions = companion::expand(&entries, rules.companions())?;
    exec::execute(&entries, &companions, rules, &reporter)
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
