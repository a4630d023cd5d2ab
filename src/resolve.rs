//! The resolution engine.
//!
//! `resolve` classifies one path reference against the library index. It is
//! a pure function of the reference text, the index and the on-disk
//! existence of the original path, so identical inputs always produce
//! identical output and re-runs are deterministic.

use std::path::{Path, PathBuf};
use std::thread;

use crate::library::{AudioFileRecord, LibraryIndex};
use crate::normalize::normalize;
use crate::playlist::{PlaylistEntry, Resolution};

/// Classify a single path reference. First matching rule wins:
///
/// 1. the original path still exists on disk: Kept (the index is not
///    consulted, the check is a direct probe)
/// 2. no indexed file shares the normalized stem: Failed
/// 3. exactly one does: RepairedAuto, whether it kept the original format
///    (moved/renamed) or changed it (FLAC to ALAC/WAV style conversion)
/// 4. two or more do: Ambiguous. A stem collision is surfaced to the user
///    instead of guessed, with same-extension candidates ranked first.
pub fn resolve(original_path: &str, index: &LibraryIndex) -> Resolution {
    let reference = original_path.trim();
    if !reference.is_empty() && Path::new(reference).exists() {
        return Resolution::Kept {
            path: PathBuf::from(reference),
        };
    }

    let keys = normalize(reference);
    if keys.stem.is_empty() {
        return Resolution::Failed;
    }

    match index.lookup(&keys.stem) {
        [] => Resolution::Failed,
        [only] => Resolution::RepairedAuto {
            path: only.path.clone(),
        },
        _ => Resolution::Ambiguous {
            candidates: rank(index, &keys.stem, &keys.extension),
        },
    }
}

// Same-extension matches first, then the rest; both groups keep the index's
// (extension, path) order so candidate lists are reproducible.
fn rank(index: &LibraryIndex, stem: &str, extension: &str) -> Vec<AudioFileRecord> {
    let mut candidates: Vec<AudioFileRecord> = index
        .lookup_exact(stem, extension)
        .into_iter()
        .cloned()
        .collect();
    candidates.extend(
        index
            .lookup(stem)
            .iter()
            .filter(|r| r.extension != extension)
            .cloned(),
    );
    candidates
}

/// Resolve every entry in place.
///
/// Entries are independent, so large playlists are fanned out over scoped
/// threads sharing the read-only index. Output order is the entries' own
/// order, never completion order.
pub fn resolve_all(entries: &mut [PlaylistEntry], index: &LibraryIndex, workers: usize) {
    let workers = workers.max(1);
    if workers == 1 || entries.len() <= workers {
        for entry in entries.iter_mut() {
            entry.resolution = resolve(&entry.original_path, index);
        }
        return;
    }

    let chunk = entries.len().div_ceil(workers);
    thread::scope(|scope| {
        for part in entries.chunks_mut(chunk) {
            scope.spawn(move || {
                for entry in part {
                    entry.resolution = resolve(&entry.original_path, index);
                }
            });
        }
    });
}

#[cfg(test)]
mod tests;
