use std::fs;
use std::io::{Error as IoError, ErrorKind};
use std::path::Path;

use tracing::info;

use crate::error::{Error, Result};

use super::model::{Line, Playlist};

/// Write the fixed playlist to `out_path`.
///
/// Resolved entries take their resolved path, everything else round-trips
/// verbatim, so the output is always a loadable playlist. The content goes
/// to a temporary sibling file first and is renamed into place: either the
/// output is fully written or no file is produced. The source playlist is
/// never overwritten.
pub fn save(playlist: &Playlist, out_path: &Path) -> Result<()> {
    let save_err = |source: IoError| Error::Save {
        path: out_path.to_path_buf(),
        source,
    };

    if out_path == playlist.source.as_path() {
        return Err(save_err(IoError::new(
            ErrorKind::InvalidInput,
            "output would overwrite the source playlist",
        )));
    }

    let mut content = String::new();
    if playlist.bom {
        content.push('\u{feff}');
    }
    for line in &playlist.lines {
        match line {
            Line::Passthrough(text) => content.push_str(text),
            Line::Entry(i) => {
                let entry = &playlist.entries[*i];
                match entry.resolution.resolved_path() {
                    Some(path) => content.push_str(&path.to_string_lossy()),
                    None => content.push_str(&entry.raw_line),
                }
            }
        }
        content.push('\n');
    }

    let file_name = out_path.file_name().and_then(|n| n.to_str()).ok_or_else(|| {
        save_err(IoError::new(
            ErrorKind::InvalidInput,
            "output path has no file name",
        ))
    })?;
    let tmp_path = out_path.with_file_name(format!(".{file_name}.tmp"));

    if let Err(source) = fs::write(&tmp_path, content.as_bytes()) {
        let _ = fs::remove_file(&tmp_path);
        return Err(save_err(source));
    }
    if let Err(source) = fs::rename(&tmp_path, out_path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(save_err(source));
    }

    info!(output = %out_path.display(), "wrote fixed playlist");
    Ok(())
}
