use predicates::prelude::*;
use tempfile::TempDir;

mod common;
use common::{cmd, touch_at};

// ============================================================================
// Help and version
// ============================================================================

#[test]
fn help_lists_the_option_surface() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--days"))
        .stdout(predicate::str::contains("--weeks"))
        .stdout(predicate::str::contains("--week13"))
        .stdout(predicate::str::contains("--last"))
        .stdout(predicate::str::contains("--max-age"))
        .stdout(predicate::str::contains("--delete-companions"))
        .stdout(predicate::str::contains("--folder-mode"));
}

#[test]
fn the_minutes_flag_is_hidden_from_help() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--minutes").not());
}

#[test]
fn version_prints_and_exits_zero() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("retentions"));
}

// ============================================================================
// Argument rejection (exit code 2)
// ============================================================================

#[test]
fn missing_positionals_exit_2() {
    cmd().assert().code(2);
}

#[test]
fn unknown_flag_suggests_a_correction() {
    let dir = TempDir::new().unwrap();
    cmd()
        .arg(dir.path())
        .arg("*")
        .args(["--dayz", "1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--days"));
}

#[test]
fn duplicate_flags_exit_2() {
    let dir = TempDir::new().unwrap();
    cmd()
        .arg(dir.path())
        .arg("*")
        .args(["--days", "1", "--days", "2"])
        .assert()
        .code(2);
}

#[test]
fn negative_retention_count_exits_2() {
    let dir = TempDir::new().unwrap();
    cmd()
        .arg(dir.path())
        .arg("*")
        .args(["--days", "-1"])
        .assert()
        .code(2);
}

#[test]
fn no_retention_rule_exits_2() {
    let dir = TempDir::new().unwrap();
    cmd()
        .arg(dir.path())
        .arg("*")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("retention rule"));
}

#[test]
fn nonexistent_base_directory_exits_2() {
    cmd()
        .arg("/no/such/directory")
        .arg("*")
        .args(["--days", "1"])
        .assert()
        .code(2);
}

#[test]
fn zero_max_files_exits_2() {
    let dir = TempDir::new().unwrap();
    cmd()
        .arg(dir.path())
        .arg("*")
        .args(["--days", "1", "--max-files", "0"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--max-files"));
}

#[test]
fn malformed_max_age_exits_2() {
    let dir = TempDir::new().unwrap();
    cmd()
        .arg(dir.path())
        .arg("*")
        .args(["--days", "1", "--max-age", "5x"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--max-age"));
}

#[test]
fn malformed_companion_rule_exits_2() {
    let dir = TempDir::new().unwrap();
    cmd()
        .arg(dir.path())
        .arg("*")
        .args(["--days", "1", "--delete-companions", "nonsense"])
        .assert()
        .code(2);
}

#[test]
fn list_only_with_info_verbosity_exits_2() {
    let dir = TempDir::new().unwrap();
    cmd()
        .arg(dir.path())
        .arg("*")
        .args(["--days", "1", "--list-only", "--verbose", "INFO"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--list-only"));
}

#[test]
fn invalid_verbose_level_exits_2() {
    let dir = TempDir::new().unwrap();
    cmd()
        .arg(dir.path())
        .arg("*")
        .args(["--days", "1", "--verbose", "chatty"])
        .assert()
        .code(2);
}

#[test]
fn invalid_folder_mode_source_exits_2() {
    let dir = TempDir::new().unwrap();
    cmd()
        .arg(dir.path())
        .arg("*")
        .args(["--days", "1", "--folder-mode", "newest"])
        .assert()
        .code(2);
}

// ============================================================================
// Error output shape
// ============================================================================

#[test]
fn configuration_errors_are_single_line_and_trace_free() {
    let dir = TempDir::new().unwrap();
    let output = cmd()
        .arg(dir.path())
        .arg("*")
        .args(["--days", "1", "--max-age", "0d"])
        .output()
        .unwrap();

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert_eq!(stderr.trim_end().lines().count(), 1);
    assert!(!stderr.contains("backtrace"));
}

#[test]
fn non_directory_base_exits_2() {
    let dir = TempDir::new().unwrap();
    touch_at(dir.path(), "plain.file", 2026, 1, 10, 12);
    cmd()
        .arg(dir.path().join("plain.file"))
        .arg("*")
        .args(["--days", "1"])
        .assert()
        .code(2);
}
