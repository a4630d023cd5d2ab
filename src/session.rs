//! Session controller.
//!
//! Pure orchestration: build-or-reuse index, parse playlist, resolve all
//! entries, replay and record manual overrides, and write the fixed
//! playlist on explicit save. All resolution logic lives in `resolve`, all
//! I/O policy in the leaf modules; the GUI/CLI layer only ever talks to
//! this type.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::journal::{SelectionJournal, SelectionRecord};
use crate::library::{self, CancelFlag, LibraryIndex, ScanStats};
use crate::playlist::{self, Playlist, PlaylistEntry, Resolution};
use crate::report::{RepairSummary, ReportRow};
use crate::resolve::resolve_all;

pub struct Session {
    settings: Settings,
    cancel: CancelFlag,
    index: Option<LibraryIndex>,
    stats: Option<ScanStats>,
    playlist: Option<Playlist>,
    journal: Option<SelectionJournal>,
    warnings: Vec<String>,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            cancel: CancelFlag::new(),
            index: None,
            stats: None,
            playlist: None,
            journal: None,
            warnings: Vec::new(),
        }
    }

    /// Handle the GUI/CLI can use to abort an in-flight scan.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Build (or rebuild) the library index. On failure or cancellation the
    /// previously published index stays in place.
    pub fn build_index(&mut self, roots: &[PathBuf]) -> Result<ScanStats> {
        self.cancel.reset();
        info!(roots = roots.len(), "building library index");

        let outcome = library::build(
            roots,
            &self.settings.library,
            self.settings.scan.workers,
            &self.cancel,
        )?;
        for warning in &outcome.warnings {
            warn!("{warning}");
        }
        self.warnings.extend(outcome.warnings);

        info!(
            indexed = outcome.stats.indexed,
            files_seen = outcome.stats.files_seen,
            "library index ready"
        );
        self.stats = Some(outcome.stats);
        self.index = Some(outcome.index);
        Ok(outcome.stats)
    }

    /// Parse a playlist and open the selection journal associated with it.
    pub fn import_playlist(&mut self, path: &Path) -> Result<()> {
        let playlist = playlist::read(path)?;

        let out_dir = self.output_dir(&playlist);
        let journal_path = out_dir.join(playlist.journal_file_name());
        fs::create_dir_all(&out_dir).map_err(|source| Error::Journal {
            path: journal_path.clone(),
            source,
        })?;
        let (journal, warnings) = SelectionJournal::open(journal_path)?;
        for warning in &warnings {
            warn!("{warning}");
        }
        self.warnings.extend(warnings);

        info!(
            playlist = %path.display(),
            entries = playlist.entries.len(),
            "imported playlist"
        );
        self.playlist = Some(playlist);
        self.journal = Some(journal);
        Ok(())
    }

    /// Resolve every entry, then replay journal overrides.
    ///
    /// Re-running is idempotent: the engine is deterministic and the journal
    /// stays the authority for manual choices, so resolved entries never
    /// regress and a manual choice survives until its journal record is
    /// superseded. A journal choice whose file disappeared is skipped and
    /// the entry keeps its computed status.
    pub fn repair(&mut self) -> Result<RepairSummary> {
        let index = self.index.as_ref().ok_or(Error::NoIndex)?;
        let playlist = self.playlist.as_mut().ok_or(Error::NoPlaylist)?;
        let journal = self.journal.as_ref().ok_or(Error::NoPlaylist)?;

        resolve_all(&mut playlist.entries, index, self.settings.scan.workers);

        let overrides = journal.all_latest();
        let mut stale = Vec::new();
        for entry in &mut playlist.entries {
            let Some(record) = overrides.get(entry.identity.as_str()) else {
                continue;
            };
            if record.chosen_path.exists() {
                entry.resolution = Resolution::ResolvedManual {
                    path: record.chosen_path.clone(),
                };
            } else {
                stale.push(format!(
                    "journal choice for {} no longer exists: {}",
                    entry.identity,
                    record.chosen_path.display()
                ));
            }
        }
        for warning in &stale {
            warn!("{warning}");
        }
        self.warnings.extend(stale);

        let summary = RepairSummary::tally(&playlist.entries);
        info!(
            total = summary.total,
            kept = summary.kept,
            repaired = summary.repaired,
            ambiguous = summary.ambiguous,
            failed = summary.failed,
            manual = summary.manual,
            "repair pass complete"
        );
        Ok(summary)
    }

    /// Record a user choice: validate the path, append to the journal, flip
    /// the entry to ResolvedManual. Callable identically from a GUI, CLI or
    /// test harness.
    pub fn apply_selection(&mut self, identity: &str, chosen_path: &Path) -> Result<()> {
        let playlist = self.playlist.as_mut().ok_or(Error::NoPlaylist)?;
        let journal = self.journal.as_mut().ok_or(Error::NoPlaylist)?;

        let Some(entry) = playlist.entry_by_identity_mut(identity) else {
            return Err(Error::UnknownIdentity(identity.to_string()));
        };
        if !chosen_path.exists() {
            return Err(Error::ChosenPathMissing(chosen_path.to_path_buf()));
        }

        journal.append(SelectionRecord::now(
            identity.to_string(),
            chosen_path.to_path_buf(),
        ))?;
        entry.resolution = Resolution::ResolvedManual {
            path: chosen_path.to_path_buf(),
        };
        info!(identity, chosen = %chosen_path.display(), "recorded manual selection");
        Ok(())
    }

    /// Write the fixed playlist, the one explicitly triggered persistent
    /// write in a session. Returns the output path.
    pub fn save(&mut self) -> Result<PathBuf> {
        let playlist = self.playlist.as_ref().ok_or(Error::NoPlaylist)?;

        let out_dir = self.output_dir(playlist);
        let out_path = out_dir.join(playlist.output_file_name());
        fs::create_dir_all(&out_dir).map_err(|source| Error::Save {
            path: out_path.clone(),
            source,
        })?;
        playlist::save(playlist, &out_path)?;
        Ok(out_path)
    }

    fn output_dir(&self, playlist: &Playlist) -> PathBuf {
        match &self.settings.output.dir {
            Some(dir) => dir.clone(),
            None => playlist
                .source
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }

    // --- queries for collaborators ---

    pub fn entries(&self) -> &[PlaylistEntry] {
        self.playlist
            .as_ref()
            .map(|p| p.entries.as_slice())
            .unwrap_or(&[])
    }

    /// Entries still needing human action (Ambiguous or Failed).
    pub fn unresolved(&self) -> Vec<&PlaylistEntry> {
        self.entries()
            .iter()
            .filter(|e| matches!(e.resolution.status(), Some(s) if !s.is_resolved()))
            .collect()
    }

    /// Entries needing no further action (Kept, RepairedAuto, ResolvedManual).
    pub fn resolved(&self) -> Vec<&PlaylistEntry> {
        self.entries()
            .iter()
            .filter(|e| matches!(e.resolution.status(), Some(s) if s.is_resolved()))
            .collect()
    }

    /// Report tuples for every entry that has been through the engine.
    pub fn report_rows(&self) -> Vec<ReportRow> {
        self.entries()
            .iter()
            .filter_map(ReportRow::for_entry)
            .collect()
    }

    pub fn summary(&self) -> RepairSummary {
        RepairSummary::tally(self.entries())
    }

    /// Stats from the most recent successful scan.
    pub fn scan_stats(&self) -> Option<ScanStats> {
        self.stats
    }

    /// Accumulated non-fatal warnings (scan, journal, stale overrides).
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}
