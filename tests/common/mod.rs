#![allow(deprecated)] // cargo_bin deprecation - still works fine

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use chrono::{Local, TimeZone};
use filetime::FileTime;

pub fn cmd() -> Command {
    Command::cargo_bin("retentions").expect("binary should exist")
}

/// Creates `name` under `dir` with its mtime pinned to the given local
/// civil time.
pub fn touch_at(dir: &Path, name: &str, y: i32, m: u32, d: u32, h: u32) {
    touch_sized(dir, name, y, m, d, h, 4);
}

/// Like [`touch_at`] with an explicit file size in bytes.
pub fn touch_sized(dir: &Path, name: &str, y: i32, m: u32, d: u32, h: u32, size: usize) {
    let path = dir.join(name);
    fs::write(&path, vec![b'x'; size]).unwrap();
    let secs = Local
        .with_ymd_and_hms(y, m, d, h, 0, 0)
        .unwrap()
        .timestamp();
    filetime::set_file_mtime(&path, FileTime::from_unix_time(secs, 0)).unwrap();
}

pub fn exists(dir: &Path, name: &str) -> bool {
    dir.join(name).exists()
}
