//! In-place rename of a working tree.
//!
//! 1. Walk all directories, shallowest first, and rename those whose name
//!    contains the old name.
//! 2. Walk all files (now under their final directory names), rewrite their
//!    contents at the current location, then rename them.
//!
//! Nothing is ever overwritten: an occupied destination leaves the entry where
//! it is and is reported as a conflict.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::RenameSettings;
use crate::error::{Error, Result};
use crate::output::{self, EntryKind, RenameReport};
use crate::utils::io;

use super::filter::{to_slash, PathFilter};
use super::rewrite::{has_extension, RenameContext, TextRewriter};

/// What to do when an entry cannot be read, written or moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FaultPolicy {
    /// Record the failure in the report and keep walking.
    #[default]
    Continue,
    /// Stop at the first failure and return it.
    FailFast,
}

impl FaultPolicy {
    pub fn from_fail_fast(fail_fast: bool) -> Self {
        if fail_fast {
            FaultPolicy::FailFast
        } else {
            FaultPolicy::Continue
        }
    }
}

pub struct TreeRenamer {
    context: RenameContext,
    filter: PathFilter,
    rewriter: TextRewriter,
    deleted_extensions: Vec<String>,
    policy: FaultPolicy,
}

impl TreeRenamer {
    pub fn new(context: RenameContext, settings: &RenameSettings) -> Result<Self> {
        let rewriter = TextRewriter::new(context.clone(), settings)?;
        let filter = PathFilter::new(settings.skip_markers.clone(), context.protected_suffix());

        Ok(Self {
            context,
            filter,
            rewriter,
            deleted_extensions: settings.deleted_extensions.clone(),
            policy: FaultPolicy::default(),
        })
    }

    pub fn with_policy(mut self, policy: FaultPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Rename everything under `root` in place.
    pub fn run(&self, root: &Path) -> Result<RenameReport> {
        if !root.is_dir() {
            return Err(Error::internal_io(
                format!("Not a directory: {}", root.display()),
                Some("rename tree".to_string()),
            ));
        }

        let mut report = RenameReport::new();

        log_status!(
            "rename",
            "{} → {} in {}",
            self.context.old_name(),
            self.context.new_name(),
            root.display()
        );
        self.rename_directories(root, &mut report)?;
        self.process_files(root, &mut report)?;

        log_status!(
            "rename",
            "{} directories and {} files renamed, {} files rewritten",
            report.summary.directories_renamed,
            report.summary.files_renamed,
            report.summary.files_rewritten
        );

        Ok(report)
    }

    // ========================================================================
    // Directories
    // ========================================================================

    fn rename_directories(&self, root: &Path, report: &mut RenameReport) -> Result<()> {
        let mut directories = Vec::new();
        self.walk(root, root, EntryKind::Directory, &mut directories, report)?;
        directories.sort_by_key(|dir| dir.as_os_str().len());

        // (from, to) of every move so far, used to find where a recorded
        // directory currently lives.
        let mut moves: Vec<(PathBuf, PathBuf)> = Vec::new();

        for original in directories {
            let relative = relative_to(root, &original);
            if self.filter.should_skip(Path::new(&relative)) {
                report.record_filtered();
                continue;
            }

            let current = remap(&original, &moves);
            let Some(name) = current.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let new_name = self.context.substitute_path(name);
            if new_name == name {
                continue;
            }
            let Some(parent) = current.parent() else {
                continue;
            };

            let target = parent.join(&new_name);
            let from = relative_to(root, &current);
            let to = relative_to(root, &target);

            match io::rename_no_clobber(&current, &target, &format!("rename {} → {}", from, to)) {
                Ok(()) => {
                    moves.push((current, target));
                    report.record_renamed(EntryKind::Directory, from, to);
                }
                Err(err) if output::is_conflict(&err) => {
                    report.record_conflict(EntryKind::Directory, from, to);
                }
                Err(err) => self.fault(report, EntryKind::Directory, from, err)?,
            }
        }

        Ok(())
    }

    // ========================================================================
    // Files
    // ========================================================================

    fn process_files(&self, root: &Path, report: &mut RenameReport) -> Result<()> {
        let mut files = Vec::new();
        self.walk(root, root, EntryKind::File, &mut files, report)?;
        files.sort();

        for path in files {
            self.process_file(root, &path, report)?;
        }

        Ok(())
    }

    fn process_file(&self, root: &Path, path: &Path, report: &mut RenameReport) -> Result<()> {
        let relative = relative_to(root, path);
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            report.record_filtered();
            return Ok(());
        };

        // IDE settings tied to the old identity have no renamed form. They go
        // wherever they are, filtered directories included.
        if has_extension(name, &self.deleted_extensions) {
            return match io::remove_file(path, &format!("delete {}", relative)) {
                Ok(()) => {
                    report.record_deleted(relative);
                    Ok(())
                }
                Err(err) => self.fault(report, EntryKind::File, relative, err),
            };
        }

        if self.filter.should_skip(Path::new(&relative)) {
            report.record_filtered();
            return Ok(());
        }

        let is_symlink = fs::symlink_metadata(path)
            .map(|meta| meta.file_type().is_symlink())
            .unwrap_or(false);
        if !is_symlink {
            if let Err(err) = self.rewrite_contents(path, name, &relative, report) {
                return self.fault(report, EntryKind::File, relative, err);
            }
        }

        let new_name = self.context.substitute_path(name);
        if new_name == name {
            return Ok(());
        }
        let Some(parent) = path.parent() else {
            return Ok(());
        };

        let target = parent.join(&new_name);
        let to = relative_to(root, &target);

        if let Err(err) = io::ensure_dir(parent, &format!("create {}", relative_to(root, parent))) {
            return self.fault(report, EntryKind::File, relative, err);
        }

        match io::rename_no_clobber(path, &target, &format!("rename {} → {}", relative, to)) {
            Ok(()) => report.record_renamed(EntryKind::File, relative, to),
            Err(err) if output::is_conflict(&err) => {
                report.record_conflict(EntryKind::File, relative, to)
            }
            Err(err) => return self.fault(report, EntryKind::File, relative, err),
        }

        Ok(())
    }

    /// Rewrite a file in place. Non-UTF-8 files are left byte-identical.
    fn rewrite_contents(
        &self,
        path: &Path,
        name: &str,
        relative: &str,
        report: &mut RenameReport,
    ) -> Result<()> {
        let bytes = io::read_bytes(path, &format!("read {}", relative))?;
        let Ok(text) = String::from_utf8(bytes) else {
            report.record_binary();
            return Ok(());
        };

        let rewrite = self.rewriter.rewrite(name, &text);
        if rewrite.changed() && rewrite.content != text {
            io::write_file(path, &rewrite.content, &format!("write {}", relative))?;
            report.record_rewritten(relative.to_string(), rewrite.replacements);
        }

        Ok(())
    }

    // ========================================================================
    // Walk + fault handling
    // ========================================================================

    /// Collect every directory (or every non-directory entry) below `dir`.
    /// Symlinks are never followed.
    fn walk(
        &self,
        root: &Path,
        dir: &Path,
        kind: EntryKind,
        out: &mut Vec<PathBuf>,
        report: &mut RenameReport,
    ) -> Result<()> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                let err = Error::internal_io(e.to_string(), Some(format!("list {}", dir.display())));
                if dir == root {
                    return Err(err);
                }
                return self.fault(report, EntryKind::Directory, relative_to(root, dir), err);
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let err = Error::internal_io(e.to_string(), Some(format!("list {}", dir.display())));
                    self.fault(report, EntryKind::Directory, relative_to(root, dir), err)?;
                    continue;
                }
            };

            let path = entry.path();
            let file_type = match entry.file_type() {
                Ok(file_type) => file_type,
                Err(e) => {
                    let err = Error::internal_io(e.to_string(), Some(format!("stat {}", path.display())));
                    self.fault(report, EntryKind::File, relative_to(root, &path), err)?;
                    continue;
                }
            };

            if file_type.is_dir() {
                if kind == EntryKind::Directory {
                    out.push(path.clone());
                }
                self.walk(root, &path, kind, out, report)?;
            } else if kind == EntryKind::File {
                out.push(path);
            }
        }

        Ok(())
    }

    fn fault(
        &self,
        report: &mut RenameReport,
        kind: EntryKind,
        path: String,
        err: Error,
    ) -> Result<()> {
        match self.policy {
            FaultPolicy::FailFast => Err(err),
            FaultPolicy::Continue => {
                log_status!("rename", "Skipped {}: {}", path, err.summary());
                report.record_failure(kind, path, &err);
                Ok(())
            }
        }
    }
}

fn relative_to(root: &Path, path: &Path) -> String {
    to_slash(path.strip_prefix(root).unwrap_or(path))
}

/// Where `original` lives after the directory moves applied so far.
fn remap(original: &Path, moves: &[(PathBuf, PathBuf)]) -> PathBuf {
    let mut current = original.to_path_buf();
    for (from, to) in moves {
        if let Ok(rest) = current.strip_prefix(from) {
            current = if rest.as_os_str().is_empty() {
                to.clone()
            } else {
                to.join(rest)
            };
        }
    }
    current
}
