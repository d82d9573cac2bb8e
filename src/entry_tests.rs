use std::path::PathBuf;

use chrono::{Local, TimeZone};

use super::*;
use crate::plan::bucket::Granularity;

fn entry(name: &str) -> Entry {
    let age = Local.with_ymd_and_hms(2026, 1, 31, 12, 0, 0).unwrap();
    Entry::new(
        PathBuf::from(format!("/base/{name}")),
        name.to_string(),
        EntryKind::File,
        1024,
        age,
    )
}

fn day_reason(day: u32) -> RetainReason {
    let date = chrono::NaiveDate::from_ymd_opt(2026, 1, day).unwrap();
    RetainReason::Bucket {
        granularity: Granularity::Days,
        key: crate::plan::bucket::BucketKey::Day { date },
    }
}

#[test]
fn entries_start_undecided_with_empty_log() {
    let e = entry("a.tar");
    assert!(e.decision.is_undecided());
    assert!(e.log.is_empty());
}

#[test]
fn retain_sets_decision_and_logs() {
    let mut e = entry("a.tar");
    e.retain(day_reason(31));
    assert!(e.decision.is_retained());
    assert_eq!(e.log.len(), 1);
    assert_eq!(e.log[0].stage(), "retention");
}

#[test]
fn second_retain_reason_only_logs() {
    let mut e = entry("a.tar");
    e.retain(day_reason(31));
    e.retain(RetainReason::Last { count: 3 });
    assert_eq!(e.decision, Decision::Retained(day_reason(31)));
    assert_eq!(e.log.len(), 2);
}

#[test]
fn demote_preserves_prior_reason_in_log() {
    let mut e = entry("a.tar");
    e.retain(day_reason(31));
    e.demote(PruneReason::MaxFiles { limit: 2 });
    assert_eq!(
        e.decision,
        Decision::Pruned(PruneReason::MaxFiles { limit: 2 })
    );
    assert!(matches!(
        e.log.last(),
        Some(DecisionEvent::Demoted { prior, .. }) if *prior == day_reason(31)
    ));
}

#[test]
fn demote_ignores_non_retained_entries() {
    let mut e = entry("a.tar");
    e.prune(PruneReason::OutsideRetention);
    e.demote(PruneReason::MaxFiles { limit: 2 });
    assert_eq!(e.decision, Decision::Pruned(PruneReason::OutsideRetention));
}

#[test]
fn protect_is_logged_with_the_pattern() {
    let mut e = entry("a.keep");
    e.protect("*.keep");
    assert!(e.decision.is_protected());
    assert_eq!(
        e.log[0],
        DecisionEvent::Protected {
            pattern: "*.keep".to_string()
        }
    );
}

#[test]
fn reason_tokens_render() {
    assert_eq!(day_reason(31).to_string(), "days[2026-01-31]");
    assert_eq!(RetainReason::Last { count: 3 }.to_string(), "last[3]");
    assert_eq!(PruneReason::OutsideRetention.to_string(), "outside-retention");
    assert_eq!(
        PruneReason::MaxSize {
            limit: "50G".to_string()
        }
        .to_string(),
        "max-size(exceeded 50G)"
    );
    assert_eq!(
        PruneReason::MaxAge {
            limit: "5d".to_string()
        }
        .to_string(),
        "max-age(exceeded 5d)"
    );
}
