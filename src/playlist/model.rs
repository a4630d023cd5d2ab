use std::path::{Path, PathBuf};

use crate::library::AudioFileRecord;

/// Entry classification after resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Kept,
    RepairedAuto,
    Ambiguous,
    Failed,
    ResolvedManual,
}

impl Status {
    /// Report label, matching the repair-report vocabulary.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Kept => "KEPT",
            Status::RepairedAuto => "REPAIRED",
            Status::Ambiguous => "AMBIGUOUS",
            Status::Failed => "FAILED",
            Status::ResolvedManual => "SELECTED",
        }
    }

    /// Whether this entry needs no further human action.
    pub fn is_resolved(&self) -> bool {
        matches!(
            self,
            Status::Kept | Status::RepairedAuto | Status::ResolvedManual
        )
    }
}

/// Resolution outcome as a closed tagged variant.
///
/// Payloads are only carried by the tags they are valid for: a resolved path
/// exists exactly when the entry is Kept/RepairedAuto/ResolvedManual, and
/// candidates exactly when it is Ambiguous.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Parsed but not yet run through the resolution engine.
    Unresolved,
    /// The original path still exists on disk.
    Kept { path: PathBuf },
    /// Exactly one indexed file matched the stem.
    RepairedAuto { path: PathBuf },
    /// Two or more indexed files matched; ranked best-first.
    Ambiguous { candidates: Vec<AudioFileRecord> },
    /// Nothing in the index matched.
    Failed,
    /// A user choice, replayed from or recorded in the selection journal.
    ResolvedManual { path: PathBuf },
}

impl Resolution {
    /// The entry's status, once the engine has run.
    pub fn status(&self) -> Option<Status> {
        match self {
            Resolution::Unresolved => None,
            Resolution::Kept { .. } => Some(Status::Kept),
            Resolution::RepairedAuto { .. } => Some(Status::RepairedAuto),
            Resolution::Ambiguous { .. } => Some(Status::Ambiguous),
            Resolution::Failed => Some(Status::Failed),
            Resolution::ResolvedManual { .. } => Some(Status::ResolvedManual),
        }
    }

    pub fn resolved_path(&self) -> Option<&Path> {
        match self {
            Resolution::Kept { path }
            | Resolution::RepairedAuto { path }
            | Resolution::ResolvedManual { path } => Some(path),
            _ => None,
        }
    }

    pub fn candidates(&self) -> &[AudioFileRecord] {
        match self {
            Resolution::Ambiguous { candidates } => candidates,
            _ => &[],
        }
    }
}

/// One resolvable playlist entry.
#[derive(Debug, Clone)]
pub struct PlaylistEntry {
    /// Position among resolvable entries; defines output order.
    pub ordinal: usize,
    /// Original text, preserved verbatim for unresolved passthrough.
    pub raw_line: String,
    /// Parsed path reference.
    pub original_path: String,
    /// Stable key for the selection journal. Unchanged source line plus
    /// unchanged position means unchanged identity across re-runs.
    pub identity: String,
    pub resolution: Resolution,
}

impl PlaylistEntry {
    pub fn new(ordinal: usize, raw_line: String) -> Self {
        let original_path = raw_line.trim().to_string();
        let identity = format!("{ordinal}:{original_path}");
        Self {
            ordinal,
            raw_line,
            original_path,
            identity,
            resolution: Resolution::Unresolved,
        }
    }
}

/// One source line: passthrough text (directives, blanks) or a resolvable
/// entry referenced by position in `Playlist::entries`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Passthrough(String),
    Entry(usize),
}

/// A parsed playlist plus everything needed to write its fixed derivative.
#[derive(Debug, Clone)]
pub struct Playlist {
    pub source: PathBuf,
    /// Whether the source carried a UTF-8 BOM (re-emitted on write).
    pub bom: bool,
    pub lines: Vec<Line>,
    pub entries: Vec<PlaylistEntry>,
}

impl Playlist {
    pub fn canonical_key(&self) -> String {
        canonical_key(&self.source)
    }

    /// Name of the fixed output artifact: `fixed_<key>_selected.<ext>`.
    pub fn output_file_name(&self) -> String {
        let ext = self
            .source
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("m3u");
        format!("fixed_{}_selected.{ext}", self.canonical_key())
    }

    /// Name of the selection journal associated with this playlist.
    pub fn journal_file_name(&self) -> String {
        format!("selections_{}.jsonl", self.canonical_key())
    }

    pub fn entry_by_identity_mut(&mut self, identity: &str) -> Option<&mut PlaylistEntry> {
        self.entries.iter_mut().find(|e| e.identity == identity)
    }
}

/// Stable key for a playlist file so a repaired artifact maps back to its
/// source: `15`, `fixed_15`, `fixed_15_selected` and `__tmp_fixed_15` all
/// share the key `15`, and with it the same report and journal.
pub fn canonical_key(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("playlist");

    let mut key = stem;
    for prefix in ["__tmp_fixed_", "draft_fixed_", "fixed_"] {
        if let Some(rest) = key.strip_prefix(prefix) {
            key = rest;
            break;
        }
    }
    if let Some(rest) = key.strip_suffix("_selected") {
        key = rest;
    }

    let key = key.trim();
    if key.is_empty() {
        stem.to_string()
    } else {
        key.to_string()
    }
}
