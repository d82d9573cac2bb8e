use std::path::PathBuf;

use chrono::{Local, TimeZone};
use clap::Parser;
use tempfile::TempDir;

use super::*;
use crate::cli::Cli;
use crate::entry::{EntryKind, PruneReason};

fn rules(args: &[&str]) -> RuleSet {
    let dir = TempDir::new().unwrap();
    let base = dir.path().to_str().unwrap().to_string();
    let mut argv = vec!["retentions", base.as_str(), "*"];
    argv.extend_from_slice(args);
    RuleSet::from_cli(&Cli::parse_from(argv)).unwrap()
}

fn entry_at(name: &str, day: u32) -> Entry {
    let age = Local.with_ymd_and_hms(2026, 1, day, 12, 0, 0).unwrap();
    Entry::new(
        PathBuf::from(format!("/base/{name}")),
        name.to_string(),
        EntryKind::File,
        0,
        age,
    )
}

#[test]
fn decide_leaves_every_entry_with_a_final_decision() {
    let mut entries = vec![
        entry_at("c", 20),
        entry_at("b", 21),
        entry_at("a", 22),
    ];
    entries.sort_by(|a, b| b.age.cmp(&a.age));
    let now = Local.with_ymd_and_hms(2026, 1, 31, 12, 0, 0).unwrap();

    decide(&mut entries, &rules(&["--days", "1"]), now);

    assert!(entries.iter().all(|e| !e.decision.is_undecided()));
    assert!(verify_partition(&entries).is_ok());
}

#[test]
fn verify_rejects_an_undecided_entry() {
    let entries = vec![entry_at("a", 20)];
    let err = verify_partition(&entries).unwrap_err();
    assert_eq!(err.exit_code(), 7);
    assert!(err.to_string().contains("integrity violation"));
}

#[test]
fn verify_accepts_a_total_partition() {
    let mut protected = entry_at("keep", 20);
    protected.protect("*.keep");
    let mut retained = entry_at("a", 21);
    retained.retain(crate::entry::RetainReason::Last { count: 1 });
    let mut pruned = entry_at("b", 22);
    pruned.prune(PruneReason::OutsideRetention);

    assert!(verify_partition(&[protected, retained, pruned]).is_ok());
}

#[test]
fn verify_accepts_the_empty_set() {
    assert!(verify_partition(&[]).is_ok());
}

#[test]
fn determinism_same_input_same_decisions() {
    let now = Local.with_ymd_and_hms(2026, 1, 31, 12, 0, 0).unwrap();
    let rules = rules(&["--days", "2", "--weeks", "1", "--last", "1"]);

    let build = || {
        let mut entries = vec![
            entry_at("a", 31),
            entry_at("b", 30),
            entry_at("c", 24),
            entry_at("d", 20),
        ];
        entries.sort_by(|x, y| y.age.cmp(&x.age));
        entries
    };

    let mut first = build();
    let mut second = build();
    decide(&mut first, &rules, now);
    decide(&mut second, &rules, now);

    let render = |entries: &[Entry]| {
        entries
            .iter()
            .map(|e| format!("{} {:?} {:?}", e.name, e.decision, e.log))
            .collect::<Vec<_>>()
    };
    assert_eq!(render(&first), render(&second));
}
