//! Folder-mode time derivation.
//!
//! The only recursive walk in the tool lives here: a pure reduction
//! from a directory subtree to a single timestamp. It follows no
//! symlinks and has no decision side effects.

use std::fs;
use std::path::Path;
use std::time::SystemTime;

use walkdir::WalkDir;

use crate::cli::AgeType;
use crate::config::FolderTimeSource;
use crate::error::{Result, RetentionsError};

#[derive(Clone, Copy)]
enum Extremum {
    Newest,
    Oldest,
}

/// Derives a folder entry's timestamp from the configured source.
///
/// Returns `Ok(None)` when a `youngest-file`/`oldest-file` folder has
/// no files at all; the caller warns and omits the entry.
///
/// # Errors
/// Returns an I/O error if the subtree cannot be walked, and a
/// configuration error when a `path=` source does not resolve to a
/// regular file strictly inside the folder.
pub fn folder_timestamp(
    folder: &Path,
    meta: &fs::Metadata,
    source: &FolderTimeSource,
    age_type: AgeType,
) -> Result<Option<SystemTime>> {
    match source {
        FolderTimeSource::Folder => super::timestamp(meta, age_type)
            .map(Some)
            .map_err(|e| {
                RetentionsError::io_with_context(e, folder.to_path_buf(), "reading timestamp")
            }),
        FolderTimeSource::YoungestFile => descend(folder, age_type, Extremum::Newest),
        FolderTimeSource::OldestFile => descend(folder, age_type, Extremum::Oldest),
        FolderTimeSource::Path(rel) => named_file(folder, rel, age_type).map(Some),
    }
}

fn descend(folder: &Path, age_type: AgeType, pick: Extremum) -> Result<Option<SystemTime>> {
    let mut result: Option<SystemTime> = None;
    for dirent in WalkDir::new(folder).follow_links(false).min_depth(1) {
        let dirent = dirent.map_err(|e| RetentionsError::Io {
            source: e.into(),
            path: Some(folder.to_path_buf()),
            operation: Some("walking folder"),
        })?;
        if dirent.path_is_symlink() || !dirent.file_type().is_file() {
            continue;
        }
        let meta = dirent.metadata().map_err(|e| RetentionsError::Io {
            source: e.into(),
            path: Some(dirent.path().to_path_buf()),
            operation: Some("reading metadata"),
        })?;
        let ts = super::timestamp(&meta, age_type).map_err(|e| {
            RetentionsError::io_with_context(e, dirent.path().to_path_buf(), "reading timestamp")
        })?;
        result = Some(match (result, pick) {
            (None, _) => ts,
            (Some(best), Extremum::Newest) => best.max(ts),
            (Some(best), Extremum::Oldest) => best.min(ts),
        });
    }
    Ok(result)
}

fn named_file(folder: &Path, rel: &Path, age_type: AgeType) -> Result<SystemTime> {
    let joined = folder.join(rel);
    let resolved = dunce::canonicalize(&joined).map_err(|e| {
        RetentionsError::Config(format!(
            "--folder-mode path=: '{}' in folder '{}': {e}",
            rel.display(),
            folder.display()
        ))
    })?;
    if !resolved.starts_with(folder) || resolved == *folder {
        return Err(RetentionsError::Config(format!(
            "--folder-mode path=: '{}' resolves outside folder '{}'",
            rel.display(),
            folder.display()
        )));
    }
    let meta = fs::metadata(&resolved).map_err(|e| {
        RetentionsError::Config(format!(
            "--folder-mode path=: '{}': {e}",
            resolved.display()
        ))
    })?;
    if !meta.is_file() {
        return Err(RetentionsError::Config(format!(
            "--folder-mode path=: '{}' is not a regular file",
            resolved.display()
        )));
    }
    super::timestamp(&meta, age_type)
        .map_err(|e| RetentionsError::io_with_context(e, resolved, "reading timestamp"))
}

#[cfg(test)]
#[path = "folder_age_tests.rs"]
mod tests;
