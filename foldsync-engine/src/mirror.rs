//! Tree diff & apply: propagate new and updated files from the source,
//! then prune replica entries that no longer exist in the source.
//!
//! Each phase walks a snapshot of the relevant tree, collected before any
//! mutation, so deletions made during the pass (including the pass's own
//! directory prunes) cannot abort it.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::{io_err, EngineError};
use crate::journal::Journal;
use crate::types::{PassOutcome, SyncEndpoint};

/// Create the replica root (and missing parents) if absent.
///
/// Runs once at startup, not on every pass.
pub fn ensure_replica_root(replica: &SyncEndpoint, journal: &Journal) -> Result<(), EngineError> {
    if replica.root().exists() {
        return Ok(());
    }
    fs::create_dir_all(replica.root()).map_err(|e| io_err(replica.root(), e))?;
    journal.log(&format!(
        "Created replica directory: {}",
        replica.root().display()
    ));
    Ok(())
}

/// Run one full mirroring pass: propagate, then prune.
///
/// Never returns an error: every filesystem failure is folded into
/// [`PassOutcome::Failed`] and journaled, so the next scheduled pass can
/// retry from a fresh snapshot.
pub fn run_pass(source: &SyncEndpoint, replica: &SyncEndpoint, journal: &Journal) -> PassOutcome {
    tracing::debug!(
        "pass: {} -> {}",
        source.root().display(),
        replica.root().display()
    );
    match mirror(source.root(), replica.root(), journal) {
        Ok(()) => {
            journal.log("Synchronization completed successfully.");
            PassOutcome::Completed
        }
        Err(err) => {
            let reason = err.to_string();
            journal.log(&format!("Error during synchronization: {reason}"));
            PassOutcome::Failed(reason)
        }
    }
}

fn mirror(source_root: &Path, replica_root: &Path, journal: &Journal) -> Result<(), EngineError> {
    // A vanished source root is an error, not an empty tree; otherwise a
    // transient unmount would prune the entire replica.
    if !source_root.is_dir() {
        return Err(io_err(
            source_root,
            std::io::Error::new(ErrorKind::NotFound, "source directory missing"),
        ));
    }

    propagate(source_root, replica_root, journal)?;
    prune_files(source_root, replica_root, journal)?;
    prune_dirs(source_root, replica_root, journal)?;
    Ok(())
}

/// Copy new and updated files from the source into the replica.
fn propagate(source_root: &Path, replica_root: &Path, journal: &Journal) -> Result<(), EngineError> {
    for file in collect_files(source_root)? {
        let rel = file.strip_prefix(source_root).unwrap_or(&file);
        let dest = replica_root.join(rel);

        if let Some(dir) = dest.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
                journal.log(&format!("Created directory: {}", dir.display()));
            }
        }

        if replica_is_stale(&file, &dest)? {
            fs::copy(&file, &dest).map_err(|e| io_err(&file, e))?;
            journal.log(&format!(
                "Copied file: {} to {}",
                file.display(),
                dest.display()
            ));
        } else {
            tracing::debug!("up to date: {}", dest.display());
        }
    }
    Ok(())
}

/// A replica file is stale if absent or strictly older (by mtime) than its
/// source counterpart.
///
/// Equal mtimes count as in sync. Deliberately no content comparison.
fn replica_is_stale(source: &Path, dest: &Path) -> Result<bool, EngineError> {
    let dest_meta = match fs::metadata(dest) {
        Ok(meta) => meta,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(true),
        Err(err) => return Err(io_err(dest, err)),
    };
    let source_meta = fs::metadata(source).map_err(|e| io_err(source, e))?;
    Ok(modified_time(source, &source_meta)? > modified_time(dest, &dest_meta)?)
}

fn modified_time(path: &Path, meta: &fs::Metadata) -> Result<SystemTime, EngineError> {
    meta.modified().map_err(|e| io_err(path, e))
}

/// Delete replica files with no file at the same relative path in the source.
fn prune_files(
    source_root: &Path,
    replica_root: &Path,
    journal: &Journal,
) -> Result<(), EngineError> {
    for file in collect_files(replica_root)? {
        let rel = file.strip_prefix(replica_root).unwrap_or(&file);
        if source_root.join(rel).is_file() {
            continue;
        }
        match fs::remove_file(&file) {
            Ok(()) => journal.log(&format!("Deleted file: {}", file.display())),
            // The snapshot can outlive a racing delete.
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => return Err(io_err(&file, err)),
        }
    }
    Ok(())
}

/// Recursively delete replica directories with no directory at the same
/// relative path in the source.
fn prune_dirs(
    source_root: &Path,
    replica_root: &Path,
    journal: &Journal,
) -> Result<(), EngineError> {
    for dir in collect_dirs(replica_root)? {
        let rel = dir.strip_prefix(replica_root).unwrap_or(&dir);
        if source_root.join(rel).is_dir() {
            continue;
        }
        // A parent earlier in the snapshot may have taken this subtree
        // with it already.
        if !dir.exists() {
            continue;
        }
        fs::remove_dir_all(&dir).map_err(|e| io_err(&dir, e))?;
        journal.log(&format!("Deleted directory: {}", dir.display()));
    }
    Ok(())
}

/// Snapshot every file below `root`, sorted for deterministic order.
fn collect_files(root: &Path) -> Result<Vec<PathBuf>, EngineError> {
    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    let mut cursor = 0;
    while cursor < pending.len() {
        let current = pending[cursor].clone();
        cursor += 1;
        let entries = match fs::read_dir(&current) {
            Ok(entries) => entries,
            // A subtree pruned mid-walk is not an error.
            Err(err) if err.kind() == ErrorKind::NotFound => continue,
            Err(err) => return Err(io_err(&current, err)),
        };
        for entry in entries {
            let entry = entry.map_err(|e| io_err(&current, e))?;
            let ty = entry.file_type().map_err(|e| io_err(entry.path(), e))?;
            if ty.is_dir() {
                pending.push(entry.path());
            } else {
                files.push(entry.path());
            }
        }
    }
    files.sort();
    Ok(files)
}

/// Snapshot every directory strictly below `root`, sorted.
fn collect_dirs(root: &Path) -> Result<Vec<PathBuf>, EngineError> {
    let mut dirs = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    let mut cursor = 0;
    while cursor < pending.len() {
        let current = pending[cursor].clone();
        cursor += 1;
        let entries = match fs::read_dir(&current) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => continue,
            Err(err) => return Err(io_err(&current, err)),
        };
        for entry in entries {
            let entry = entry.map_err(|e| io_err(&current, e))?;
            let ty = entry.file_type().map_err(|e| io_err(entry.path(), e))?;
            if ty.is_dir() {
                dirs.push(entry.path());
                pending.push(entry.path());
            }
        }
    }
    dirs.sort();
    Ok(dirs)
}
