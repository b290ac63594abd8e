//! File I/O primitives with consistent error handling.

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Read file contents with standardized error handling.
///
/// Wraps `fs::read_to_string` with consistent `Error::internal_io` formatting.
pub fn read_file(path: &Path, operation: &str) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| Error::internal_io(e.to_string(), Some(operation.to_string())))
}

/// Read raw file bytes. Used where the caller decides whether the content is text.
pub fn read_bytes(path: &Path, operation: &str) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| Error::internal_io(e.to_string(), Some(operation.to_string())))
}

/// Write content to file with standardized error handling.
///
/// Wraps `fs::write` with consistent `Error::internal_io` formatting.
pub fn write_file(path: &Path, content: &str, operation: &str) -> Result<()> {
    fs::write(path, content)
        .map_err(|e| Error::internal_io(e.to_string(), Some(operation.to_string())))
}

/// Create a directory and all missing ancestors.
pub fn ensure_dir(dir: &Path, operation: &str) -> Result<()> {
    if dir.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(dir)
        .map_err(|e| Error::internal_io(e.to_string(), Some(operation.to_string())))
}

/// Rename a file or directory. Fails instead of overwriting when `to` exists.
pub fn rename_no_clobber(from: &Path, to: &Path, operation: &str) -> Result<()> {
    if to.symlink_metadata().is_ok() {
        return Err(Error::rename_conflict(
            from.display().to_string(),
            to.display().to_string(),
        ));
    }
    fs::rename(from, to).map_err(|e| Error::internal_io(e.to_string(), Some(operation.to_string())))
}

pub fn remove_file(path: &Path, operation: &str) -> Result<()> {
    fs::remove_file(path)
        .map_err(|e| Error::internal_io(e.to_string(), Some(operation.to_string())))
}

/// Recursively delete a directory. Missing directories are not an error.
pub fn remove_dir_all(path: &Path, operation: &str) -> Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::internal_io(e.to_string(), Some(operation.to_string()))),
    }
}

/// Copy a directory tree. Symlinks are recreated on unix and copied as files elsewhere.
pub fn copy_dir_recursive(from: &Path, to: &Path) -> Result<()> {
    ensure_dir(to, &format!("create {}", to.display()))?;

    let entries = fs::read_dir(from).map_err(|e| {
        Error::internal_io(e.to_string(), Some(format!("list {}", from.display())))
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("list {}", from.display())))
        })?;
        let source = entry.path();
        let target = to.join(entry.file_name());
        let file_type = entry.file_type().map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("stat {}", source.display())))
        })?;

        if file_type.is_dir() {
            copy_dir_recursive(&source, &target)?;
        } else if file_type.is_symlink() {
            copy_symlink(&source, &target)?;
        } else {
            fs::copy(&source, &target).map_err(|e| {
                Error::internal_io(
                    e.to_string(),
                    Some(format!("copy {} → {}", source.display(), target.display())),
                )
            })?;
        }
    }

    Ok(())
}

#[cfg(unix)]
fn copy_symlink(source: &Path, target: &Path) -> Result<()> {
    let link = fs::read_link(source).map_err(|e| {
        Error::internal_io(e.to_string(), Some(format!("read link {}", source.display())))
    })?;
    std::os::unix::fs::symlink(&link, target).map_err(|e| {
        Error::internal_io(e.to_string(), Some(format!("link {}", target.display())))
    })
}

#[cfg(not(unix))]
fn copy_symlink(source: &Path, target: &Path) -> Result<()> {
    fs::copy(source, target).map(|_| ()).map_err(|e| {
        Error::internal_io(e.to_string(), Some(format!("copy {}", source.display())))
    })
}

/// Move a directory tree to `to`, creating `to`'s ancestors first.
///
/// Tries an atomic rename; when that fails (different filesystems) falls back
/// to copy + delete. `to` must not exist.
pub fn move_dir(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        ensure_dir(parent, &format!("create {}", parent.display()))?;
    }

    if fs::rename(from, to).is_ok() {
        return Ok(());
    }

    if let Err(err) = copy_dir_recursive(from, to) {
        let _ = fs::remove_dir_all(to);
        return Err(err);
    }
    remove_dir_all(from, &format!("remove {}", from.display()))
}
