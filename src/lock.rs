//! The advisory run lock.
//!
//! A plain lock file co-located with the base directory, created with
//! exclusive-create semantics so presence alone is diagnostic and a
//! crashed run leaves evidence behind for inspection.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::{Result, RetentionsError};

pub const LOCK_FILE_NAME: &str = ".retentions.lock";

/// Scoped holder of the lock file; releases (unlinks) on drop, on all
/// exit paths.
#[derive(Debug)]
pub struct LockGuard {
    path: PathBuf,
}

impl LockGuard {
    /// Creates `<base>/.retentions.lock` or fails if it exists.
    ///
    /// The file contains `<pid> <iso-8601 start time>` for diagnostics;
    /// only its presence matters to the tool itself.
    ///
    /// # Errors
    /// Returns a concurrency error if the lock file already exists and
    /// an I/O error if it cannot be created or written.
    pub fn acquire(base: &Path) -> Result<Self> {
        let path = base.join(LOCK_FILE_NAME);
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(RetentionsError::Locked { path });
            }
            Err(e) => {
                return Err(RetentionsError::io_with_context(e, path, "creating lock file"));
            }
        };

        let line = format!("{} {}\n", std::process::id(), Local::now().to_rfc3339());
        if let Err(e) = file.write_all(line.as_bytes()) {
            // Do not leave a half-written lock behind on failure.
            drop(file);
            let _ = fs::remove_file(&path);
            return Err(RetentionsError::io_with_context(e, path, "writing lock file"));
        }

        Ok(Self { path })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
