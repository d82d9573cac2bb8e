use std::fs;

use chrono::{Local, TimeZone};
use clap::Parser;
use filetime::FileTime;
use tempfile::TempDir;

use super::*;
use crate::cli::Cli;
use crate::output::Verbosity;

fn rules_for(dir: &TempDir, args: &[&str]) -> RuleSet {
    let base = dir.path().to_str().unwrap().to_string();
    let mut argv = vec!["retentions", base.as_str()];
    argv.extend_from_slice(args);
    RuleSet::from_cli(&Cli::parse_from(argv)).unwrap()
}

fn reporter() -> Reporter {
    Reporter::new(Verbosity::Error)
}

fn touch(dir: &TempDir, name: &str, y: i32, m: u32, d: u32, h: u32) {
    let path = dir.path().join(name);
    fs::write(&path, b"data").unwrap();
    let secs = Local
        .with_ymd_and_hms(y, m, d, h, 0, 0)
        .unwrap()
        .timestamp();
    filetime::set_file_mtime(&path, FileTime::from_unix_time(secs, 0)).unwrap();
}

#[test]
fn discovers_matching_files_newest_first() {
    let dir = TempDir::new().unwrap();
    touch(&dir, "old.tar", 2026, 1, 10, 12);
    touch(&dir, "new.tar", 2026, 1, 20, 12);
    touch(&dir, "mid.tar", 2026, 1, 15, 12);
    touch(&dir, "notes.txt", 2026, 1, 25, 12);

    let rules = rules_for(&dir, &["*.tar", "--days", "1"]);
    let entries = discover(&rules, &reporter()).unwrap();

    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["new.tar", "mid.tar", "old.tar"]);
    assert!(entries.iter().all(|e| e.kind == EntryKind::File));
    assert!(entries.iter().all(|e| e.size == 4));
    assert!(entries.iter().all(|e| e.path.is_absolute()));
}

#[test]
fn age_ties_break_by_path_order() {
    let dir = TempDir::new().unwrap();
    touch(&dir, "b.tar", 2026, 1, 10, 12);
    touch(&dir, "a.tar", 2026, 1, 10, 12);

    let rules = rules_for(&dir, &["*.tar", "--days", "1"]);
    let entries = discover(&rules, &reporter()).unwrap();

    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["a.tar", "b.tar"]);
}

#[test]
fn directories_are_ignored_in_file_mode() {
    let dir = TempDir::new().unwrap();
    touch(&dir, "a.tar", 2026, 1, 10, 12);
    fs::create_dir(dir.path().join("b.tar")).unwrap();

    let rules = rules_for(&dir, &["*.tar", "--days", "1"]);
    let entries = discover(&rules, &reporter()).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "a.tar");
}

#[cfg(unix)]
#[test]
fn symlinks_are_invisible() {
    let dir = TempDir::new().unwrap();
    touch(&dir, "real.tar", 2026, 1, 10, 12);
    std::os::unix::fs::symlink(dir.path().join("real.tar"), dir.path().join("link.tar")).unwrap();

    let rules = rules_for(&dir, &["*.tar", "--days", "1"]);
    let entries = discover(&rules, &reporter()).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "real.tar");
}

#[test]
fn the_lock_file_is_never_a_candidate() {
    let dir = TempDir::new().unwrap();
    touch(&dir, ".retentions.lock", 2026, 1, 10, 12);
    touch(&dir, "a.tar", 2026, 1, 10, 12);

    let rules = rules_for(&dir, &["*", "--days", "1"]);
    let entries = discover(&rules, &reporter()).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "a.tar");
}

#[test]
fn only_direct_children_are_considered() {
    let dir = TempDir::new().unwrap();
    touch(&dir, "top.tar", 2026, 1, 10, 12);
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub/nested.tar"), b"x").unwrap();

    let rules = rules_for(&dir, &["*.tar", "--days", "1"]);
    let entries = discover(&rules, &reporter()).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "top.tar");
}

#[test]
fn folder_mode_discovers_directories() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("snap-a")).unwrap();
    fs::create_dir(dir.path().join("snap-b")).unwrap();
    touch(&dir, "snap-c", 2026, 1, 10, 12); // a file, not a folder

    let rules = rules_for(&dir, &["snap-*", "--days", "1", "--folder-mode"]);
    let entries = discover(&rules, &reporter()).unwrap();

    let mut names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["snap-a", "snap-b"]);
    assert!(entries.iter().all(|e| e.kind == EntryKind::Folder));
    assert!(entries.iter().all(|e| e.size == 0));
}

#[test]
fn folder_mode_youngest_file_orders_by_newest_descendant() {
    let dir = TempDir::new().unwrap();
    for (folder, y, m, d) in [("snap-a", 2026, 1, 20), ("snap-b", 2026, 1, 10)] {
        let sub = dir.path().join(folder);
        fs::create_dir(&sub).unwrap();
        let file = sub.join("data.bin");
        fs::write(&file, b"x").unwrap();
        let secs = Local.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap().timestamp();
        filetime::set_file_mtime(&file, FileTime::from_unix_time(secs, 0)).unwrap();
    }

    let rules = rules_for(&dir, &["snap-*", "--days", "1", "--folder-mode", "youngest-file"]);
    let entries = discover(&rules, &reporter()).unwrap();
    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["snap-a", "snap-b"]);
}

#[test]
fn folder_mode_youngest_file_omits_empty_folders() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("snap-empty")).unwrap();
    let sub = dir.path().join("snap-full");
    fs::create_dir(&sub).unwrap();
    fs::write(sub.join("data.bin"), b"x").unwrap();

    let rules = rules_for(&dir, &["snap-*", "--days", "1", "--folder-mode", "youngest-file"]);
    let entries = discover(&rules, &reporter()).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "snap-full");
}

#[test]
fn timestamp_mtime_matches_metadata() {
    let dir = TempDir::new().unwrap();
    touch(&dir, "a.tar", 2026, 1, 10, 12);
    let meta = fs::metadata(dir.path().join("a.tar")).unwrap();
    let ts = timestamp(&meta, AgeType::Mtime).unwrap();
    assert_eq!(ts, meta.modified().unwrap());
}
