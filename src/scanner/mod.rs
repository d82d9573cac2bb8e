//! Discovery: enumerate the direct children of the base directory and
//! turn the matching ones into entries.
//!
//! Symbolic links are invisible to the whole pipeline: they are neither
//! candidates nor companions, and never followed.

mod folder_age;

pub use folder_age::folder_timestamp;

use std::fs;
use std::io;
use std::time::SystemTime;

use chrono::{DateTime, Local};

use crate::cli::AgeType;
use crate::config::RuleSet;
use crate::entry::{Entry, EntryKind};
use crate::error::{Result, RetentionsError};
use crate::lock;
use crate::output::Reporter;

/// Extracts the configured timestamp from file metadata.
///
/// `ctime` is the metadata-change time on Unix and the creation time
/// elsewhere; which one a platform means is intentionally left to the
/// platform.
///
/// # Errors
/// Returns the underlying error when the platform or filesystem does
/// not record the requested timestamp.
pub fn timestamp(meta: &fs::Metadata, age_type: AgeType) -> io::Result<SystemTime> {
    match age_type {
        AgeType::Mtime => meta.modified(),
        AgeType::Atime => meta.accessed(),
        AgeType::Birthtime => meta.created(),
        AgeType::Ctime => ctime(meta),
    }
}

#[cfg(unix)]
fn ctime(meta: &fs::Metadata) -> io::Result<SystemTime> {
    use std::os::unix::fs::MetadataExt;
    use std::time::{Duration, UNIX_EPOCH};

    let secs = meta.ctime();
    let nanos = u32::try_from(meta.ctime_nsec()).unwrap_or(0);
    let ts = if secs >= 0 {
        UNIX_EPOCH + Duration::new(secs.unsigned_abs(), nanos)
    } else {
        UNIX_EPOCH - Duration::new(secs.unsigned_abs(), 0)
    };
    Ok(ts)
}

#[cfg(not(unix))]
fn ctime(meta: &fs::Metadata) -> io::Result<SystemTime> {
    meta.created()
}

/// Enumerates the direct children of the base directory, producing the
/// newest-first entry list the decision passes run over. Ties on age
/// are broken by byte-lexicographic path order.
///
/// # Errors
/// Returns an I/O error if the directory or an entry's metadata cannot
/// be read, and a configuration error for an invalid `path=` folder
/// time source.
pub fn discover(rules: &RuleSet, reporter: &Reporter) -> Result<Vec<Entry>> {
    let base = rules.base();
    let read = fs::read_dir(base)
        .map_err(|e| RetentionsError::io_with_context(e, base.to_path_buf(), "reading directory"))?;

    let mut entries = Vec::new();
    for dirent in read {
        let dirent = dirent.map_err(|e| {
            RetentionsError::io_with_context(e, base.to_path_buf(), "reading directory")
        })?;
        let file_name = dirent.file_name();
        let Some(name) = file_name.to_str() else {
            reporter.debug(format!("skipping non-UTF-8 name {file_name:?}"));
            continue;
        };
        if name == lock::LOCK_FILE_NAME {
            continue;
        }
        if !rules.pattern().matches(name) {
            continue;
        }

        let path = dirent.path();
        let meta = fs::symlink_metadata(&path)
            .map_err(|e| RetentionsError::io_with_context(e, path.clone(), "reading metadata"))?;
        if meta.file_type().is_symlink() {
            continue;
        }

        let entry = if let Some(source) = rules.folder_mode() {
            if !meta.is_dir() {
                continue;
            }
            match folder_timestamp(&path, &meta, source, rules.age_type())? {
                Some(ts) => Entry::new(
                    path,
                    name.to_string(),
                    EntryKind::Folder,
                    0,
                    DateTime::<Local>::from(ts),
                ),
                None => {
                    reporter.warn(format!(
                        "skipping folder '{}': no file to derive its age from",
                        path.display()
                    ));
                    continue;
                }
            }
        } else {
            if !meta.is_file() {
                continue;
            }
            let ts = timestamp(&meta, rules.age_type()).map_err(|e| {
                RetentionsError::io_with_context(e, path.clone(), "reading timestamp")
            })?;
            Entry::new(
                path,
                name.to_string(),
                EntryKind::File,
                meta.len(),
                DateTime::<Local>::from(ts),
            )
        };
        entries.push(entry);
    }

    entries.sort_by(|a, b| {
        b.age
            .cmp(&a.age)
            .then_with(|| a.path.as_os_str().cmp(b.path.as_os_str()))
    });
    Ok(entries)
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
