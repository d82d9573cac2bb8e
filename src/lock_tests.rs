use std::fs;

use tempfile::TempDir;

use super::*;
use crate::RetentionsError;

#[test]
fn acquire_creates_the_lock_file() {
    let dir = TempDir::new().unwrap();
    let guard = LockGuard::acquire(dir.path()).unwrap();

    let lock_path = dir.path().join(LOCK_FILE_NAME);
    assert!(lock_path.is_file());
    assert_eq!(guard.path(), lock_path);
}

#[test]
fn lock_contents_are_pid_and_timestamp() {
    let dir = TempDir::new().unwrap();
    let _guard = LockGuard::acquire(dir.path()).unwrap();

    let contents = fs::read_to_string(dir.path().join(LOCK_FILE_NAME)).unwrap();
    let mut parts = contents.trim_end().splitn(2, ' ');
    assert_eq!(
        parts.next().unwrap(),
        std::process::id().to_string()
    );
    // The second field is an ISO-8601 timestamp; presence is enough.
    assert!(parts.next().is_some_and(|ts| ts.contains('T')));
}

#[test]
fn second_acquisition_fails_with_the_concurrency_code() {
    let dir = TempDir::new().unwrap();
    let _guard = LockGuard::acquire(dir.path()).unwrap();

    let err = LockGuard::acquire(dir.path()).unwrap_err();
    assert!(matches!(err, RetentionsError::Locked { .. }));
    assert_eq!(err.exit_code(), 5);
}

#[test]
fn drop_releases_the_lock() {
    let dir = TempDir::new().unwrap();
    {
        let _guard = LockGuard::acquire(dir.path()).unwrap();
        assert!(dir.path().join(LOCK_FILE_NAME).exists());
    }
    assert!(!dir.path().join(LOCK_FILE_NAME).exists());

    // A fresh acquisition succeeds after release.
    let _guard = LockGuard::acquire(dir.path()).unwrap();
}

#[test]
fn stale_lock_from_a_crashed_run_blocks_until_removed() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(LOCK_FILE_NAME), "99999 2026-01-01T00:00:00Z\n").unwrap();

    assert!(LockGuard::acquire(dir.path()).is_err());

    fs::remove_file(dir.path().join(LOCK_FILE_NAME)).unwrap();
    assert!(LockGuard::acquire(dir.path()).is_ok());
}
