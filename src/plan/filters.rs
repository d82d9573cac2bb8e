//! The demotion filters: `max-age`, `max-files`, `max-size`.
//!
//! Filters run in that fixed order, only ever move entries from the
//! keep set to the prune set, and never touch protected entries.

use chrono::{DateTime, Duration, Local};

use crate::config::RuleSet;
use crate::entry::{Entry, PruneReason};

/// Applies the configured filters to a newest-first entry list.
pub fn apply_filters(entries: &mut [Entry], rules: &RuleSet, now: DateTime<Local>) {
    apply_max_age(entries, rules, now);
    apply_max_files(entries, rules);
    apply_max_size(entries, rules);
}

fn apply_max_age(entries: &mut [Entry], rules: &RuleSet, now: DateTime<Local>) {
    let Some(max_age) = rules.max_age() else {
        return;
    };
    let Some(cutoff) = i64::try_from(max_age.seconds)
        .ok()
        .and_then(Duration::try_seconds)
        .and_then(|limit| now.checked_sub_signed(limit))
    else {
        // A cutoff before the representable epoch cannot demote anything.
        return;
    };
    for entry in entries.iter_mut() {
        if entry.decision.is_retained() && entry.age < cutoff {
            entry.demote(PruneReason::MaxAge {
                limit: max_age.raw.clone(),
            });
        }
    }
}

fn apply_max_files(entries: &mut [Entry], rules: &RuleSet) {
    let Some(limit) = rules.max_files() else {
        return;
    };
    let retained: Vec<usize> = entries
        .iter()
        .enumerate()
        .filter(|(_, e)| e.decision.is_retained())
        .map(|(i, _)| i)
        .collect();
    let Ok(keep) = usize::try_from(limit) else {
        return;
    };
    for &i in retained.iter().skip(keep) {
        entries[i].demote(PruneReason::MaxFiles { limit });
    }
}

fn apply_max_size(entries: &mut [Entry], rules: &RuleSet) {
    let Some(max_size) = rules.max_size() else {
        return;
    };
    let mut total: u64 = 0;
    let mut over = false;
    for entry in entries.iter_mut() {
        if !entry.decision.is_retained() {
            continue;
        }
        if !over {
            total = total.saturating_add(entry.size);
            over = total > max_size.bytes;
        }
        if over {
            entry.demote(PruneReason::MaxSize {
                limit: max_size.raw.clone(),
            });
        }
    }
}

#[cfg(test)]
#[path = "filters_tests.rs"]
mod tests;
