//! Protection pass, hierarchical calendar retention and `--last`.

use indexmap::IndexSet;

use crate::config::RuleSet;
use crate::entry::{Entry, PruneReason, RetainReason};
use crate::plan::bucket::{self, IntervalSet, Span};

/// Marks every entry matching the protect pattern; protected entries
/// leave the working set entirely.
pub fn apply_protection(entries: &mut [Entry], rules: &RuleSet) {
    let Some(protect) = rules.protect() else {
        return;
    };
    for entry in entries.iter_mut() {
        if protect.matches(&entry.name) {
            entry.protect(protect.as_str());
        }
    }
}

/// Runs the hierarchical calendar rule and `--last` over a newest-first
/// entry list, then prunes everything left undecided.
///
/// Granularities are processed finest to coarsest. Each granularity
/// claims the newest entry of each of its newest `N` eligible buckets;
/// a bucket is eligible only if its whole calendar span avoids the
/// ranges claimed by finer granularities. The claimed spans then extend
/// the forbidden range for every coarser granularity.
pub fn apply_retention(entries: &mut [Entry], rules: &RuleSet) {
    let mut forbidden = IntervalSet::new();

    for &(granularity, count) in rules.granularities() {
        if count == 0 {
            continue;
        }
        let mut claimed = IndexSet::new();
        let mut claimed_spans: Vec<Span> = Vec::new();

        for entry in entries.iter_mut() {
            if entry.decision.is_protected() {
                continue;
            }
            let civil = entry.age.naive_local();
            let span = bucket::bucket_span(granularity, civil);
            if forbidden.overlaps(span) {
                continue;
            }
            let key = bucket::bucket_key(granularity, civil);
            if !claimed.insert(key) {
                continue;
            }
            // First entry seen in an eligible bucket is its newest.
            entry.retain(RetainReason::Bucket { granularity, key });
            claimed_spans.push(span);
            if claimed.len() as u64 >= u64::from(count) {
                break;
            }
        }

        for span in claimed_spans {
            forbidden.insert(span);
        }
    }

    if let Some(count) = rules.last()
        && count > 0
    {
        for entry in entries
            .iter_mut()
            .filter(|e| !e.decision.is_protected())
            .take(count as usize)
        {
            entry.retain(RetainReason::Last { count });
        }
    }

    for entry in entries.iter_mut() {
        if entry.decision.is_undecided() {
            entry.prune(PruneReason::OutsideRetention);
        }
    }
}

#[cfg(test)]
#[path = "retain_tests.rs"]
mod tests;
