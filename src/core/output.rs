//! Public output types for claritygen command responses.
//!
//! These are returned by the library and serialized by the CLI.

use serde::Serialize;

use crate::error::{Error, ErrorCode};

// ============================================================================
// Rename report
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Directory,
    File,
}

/// What happened to one entry of the walk. Paths are relative to the working
/// root and use `/` separators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EntryOutcome {
    Renamed {
        kind: EntryKind,
        from: String,
        to: String,
    },
    Rewritten {
        path: String,
        replacements: usize,
    },
    Deleted {
        path: String,
    },
    /// Destination already existed; the entry was left where it was.
    Conflict {
        kind: EntryKind,
        from: String,
        to: String,
    },
    Failed {
        kind: EntryKind,
        path: String,
        code: String,
        error: String,
    },
}

/// Counters for a rename run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameSummary {
    pub directories_renamed: u32,
    pub files_rewritten: u32,
    pub replacements: usize,
    pub files_renamed: u32,
    pub files_deleted: u32,
    pub filtered: u32,
    pub binary_skipped: u32,
    pub conflicts: u32,
    pub failures: u32,
}

/// Per-entry results of one tree rename.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameReport {
    pub summary: RenameSummary,
    pub entries: Vec<EntryOutcome>,
}

impl RenameReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_renamed(&mut self, kind: EntryKind, from: String, to: String) {
        match kind {
            EntryKind::Directory => self.summary.directories_renamed += 1,
            EntryKind::File => self.summary.files_renamed += 1,
        }
        self.entries.push(EntryOutcome::Renamed { kind, from, to });
    }

    pub fn record_rewritten(&mut self, path: String, replacements: usize) {
        self.summary.files_rewritten += 1;
        self.summary.replacements += replacements;
        self.entries
            .push(EntryOutcome::Rewritten { path, replacements });
    }

    pub fn record_deleted(&mut self, path: String) {
        self.summary.files_deleted += 1;
        self.entries.push(EntryOutcome::Deleted { path });
    }

    pub fn record_conflict(&mut self, kind: EntryKind, from: String, to: String) {
        self.summary.conflicts += 1;
        self.entries.push(EntryOutcome::Conflict { kind, from, to });
    }

    pub fn record_failure(&mut self, kind: EntryKind, path: String, error: &Error) {
        self.summary.failures += 1;
        self.entries.push(EntryOutcome::Failed {
            kind,
            path,
            code: error.code.as_str().to_string(),
            error: error.summary(),
        });
    }

    pub fn record_filtered(&mut self) {
        self.summary.filtered += 1;
    }

    pub fn record_binary(&mut self) {
        self.summary.binary_skipped += 1;
    }

    pub fn has_failures(&self) -> bool {
        self.summary.failures > 0
    }

    pub fn conflicts(&self) -> impl Iterator<Item = &EntryOutcome> {
        self.entries
            .iter()
            .filter(|e| matches!(e, EntryOutcome::Conflict { .. }))
    }

    pub fn failures(&self) -> impl Iterator<Item = &EntryOutcome> {
        self.entries
            .iter()
            .filter(|e| matches!(e, EntryOutcome::Failed { .. }))
    }

    /// Exit code for a finished run: 0 clean, 1 when any entry failed.
    pub fn exit_code(&self) -> i32 {
        if self.has_failures() {
            1
        } else {
            0
        }
    }
}

// ============================================================================
// Generation
// ============================================================================

/// Success report of a generation run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateOutput {
    pub project_name: String,
    pub template_name: String,
    pub location: String,
    pub report: RenameReport,
}

pub(crate) fn is_conflict(error: &Error) -> bool {
    error.code == ErrorCode::RenameConflict
}
