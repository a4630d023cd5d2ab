use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};

use super::model::{Line, Playlist, PlaylistEntry};

/// Read a playlist file into ordered entries.
///
/// An unreadable file or one that is not UTF-8 is fatal; individual lines
/// never are.
pub fn read(path: &Path) -> Result<Playlist> {
    let bytes = fs::read(path).map_err(|source| Error::Playlist {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8(bytes).map_err(|_| Error::PlaylistEncoding {
        path: path.to_path_buf(),
    })?;
    Ok(from_text(path, &text))
}

/// Parse playlist text. Total over lines: extended-M3U directives and blank
/// lines become positional passthrough, everything else a resolvable entry.
/// Ordinals count resolvable entries only.
pub fn from_text(source: &Path, text: &str) -> Playlist {
    let bom = text.starts_with('\u{feff}');
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut lines = Vec::new();
    let mut entries = Vec::new();
    for raw in text.lines() {
        if raw.trim().is_empty() || raw.trim_start().starts_with('#') {
            lines.push(Line::Passthrough(raw.to_string()));
            continue;
        }

        let ordinal = entries.len();
        entries.push(PlaylistEntry::new(ordinal, raw.to_string()));
        lines.push(Line::Entry(ordinal));
    }

    debug!(
        source = %source.display(),
        entries = entries.len(),
        "parsed playlist"
    );
    Playlist {
        source: source.to_path_buf(),
        bom,
        lines,
        entries,
    }
}
