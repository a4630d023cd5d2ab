//! Report tuples and summary counts exposed to collaborators.
//!
//! The core hands these out per entry; rendering them (CSV, tables, status
//! bars) is the collaborator's business.

use std::path::PathBuf;

use crate::playlist::{PlaylistEntry, Status};

/// Per-entry tuple handed to the report collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub ordinal: usize,
    pub original_path: String,
    pub status: Status,
    pub resolved_path: Option<PathBuf>,
    pub candidate_count: usize,
}

impl ReportRow {
    /// The row for one entry, or `None` while it has not been through the
    /// resolution engine yet.
    pub fn for_entry(entry: &PlaylistEntry) -> Option<Self> {
        let status = entry.resolution.status()?;
        Some(Self {
            ordinal: entry.ordinal,
            original_path: entry.original_path.clone(),
            status,
            resolved_path: entry.resolution.resolved_path().map(|p| p.to_path_buf()),
            candidate_count: entry.resolution.candidates().len(),
        })
    }
}

/// Outcome counters for one repair pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RepairSummary {
    pub total: usize,
    pub kept: usize,
    pub repaired: usize,
    pub ambiguous: usize,
    pub failed: usize,
    pub manual: usize,
}

impl RepairSummary {
    pub fn tally(entries: &[PlaylistEntry]) -> Self {
        let mut summary = Self::default();
        for entry in entries {
            summary.total += 1;
            match entry.resolution.status() {
                Some(Status::Kept) => summary.kept += 1,
                Some(Status::RepairedAuto) => summary.repaired += 1,
                Some(Status::Ambiguous) => summary.ambiguous += 1,
                Some(Status::Failed) => summary.failed += 1,
                Some(Status::ResolvedManual) => summary.manual += 1,
                None => {}
            }
        }
        summary
    }

    /// Entries still waiting on a human.
    pub fn unresolved(&self) -> usize {
        self.ambiguous + self.failed
    }
}
