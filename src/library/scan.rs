use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, mpsc};
use std::thread;

use tracing::debug;
use walkdir::WalkDir;

use crate::config::LibrarySettings;
use crate::error::{Error, Result};

use super::model::{AudioFileRecord, LibraryIndex};

/// Shared flag for cooperative scan cancellation. Cloning hands out another
/// handle to the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub(crate) fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

/// Counters accumulated while scanning.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanStats {
    pub files_seen: usize,
    pub skipped_unsupported: usize,
    pub indexed: usize,
}

/// Result of a successful scan: the published index plus everything that
/// went sideways on the way there.
#[derive(Debug)]
pub struct ScanOutcome {
    pub index: LibraryIndex,
    pub warnings: Vec<String>,
    pub stats: ScanStats,
}

struct WalkOutput {
    records: Vec<AudioFileRecord>,
    warnings: Vec<String>,
    files_seen: usize,
    skipped_unsupported: usize,
}

/// Recursively enumerate `roots` and build a `LibraryIndex`.
///
/// Roots are distributed over a fixed-size pool of worker threads; partial
/// results merge only after every worker has finished, so a caller never
/// observes a half-built index. Unreadable folders become warnings, not
/// errors. A cancelled build returns `Error::ScanCancelled` without
/// publishing anything.
pub fn build(
    roots: &[PathBuf],
    settings: &LibrarySettings,
    workers: usize,
    cancel: &CancelFlag,
) -> Result<ScanOutcome> {
    let mut warnings = Vec::new();
    let mut usable: Vec<PathBuf> = Vec::new();
    for root in roots {
        match std::fs::canonicalize(root) {
            Ok(canonical) if canonical.is_dir() => usable.push(canonical),
            Ok(canonical) => warnings.push(format!(
                "library root is not a folder: {}",
                canonical.display()
            )),
            Err(err) => warnings.push(format!(
                "library root not readable: {}: {err}",
                root.display()
            )),
        }
    }
    if usable.is_empty() {
        return Err(Error::NoReadableRoots);
    }

    let pool_size = workers.max(1).min(usable.len());
    let queue = Mutex::new(usable);
    let (tx, rx) = mpsc::channel::<WalkOutput>();

    thread::scope(|scope| {
        for _ in 0..pool_size {
            let tx = tx.clone();
            let queue = &queue;
            scope.spawn(move || {
                loop {
                    let root = queue.lock().unwrap().pop();
                    let Some(root) = root else { break };
                    if tx.send(walk_root(&root, settings, cancel)).is_err() {
                        break;
                    }
                }
            });
        }
    });
    drop(tx);

    let mut records = Vec::new();
    let mut stats = ScanStats::default();
    for output in rx {
        records.extend(output.records);
        warnings.extend(output.warnings);
        stats.files_seen += output.files_seen;
        stats.skipped_unsupported += output.skipped_unsupported;
    }

    if cancel.is_cancelled() {
        return Err(Error::ScanCancelled);
    }

    let index = LibraryIndex::from_records(records);
    stats.indexed = index.len();
    Ok(ScanOutcome {
        index,
        warnings,
        stats,
    })
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn is_audio_file(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            extensions.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn walk_root(root: &Path, settings: &LibrarySettings, cancel: &CancelFlag) -> WalkOutput {
    let mut output = WalkOutput {
        records: Vec::new(),
        warnings: Vec::new(),
        files_seen: 0,
        skipped_unsupported: 0,
    };

    let extensions: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    let mut walker = WalkDir::new(root).follow_links(settings.follow_links);
    if let Some(depth) = settings.max_depth {
        walker = walker.max_depth(depth);
    }

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
    {
        if cancel.is_cancelled() {
            return output;
        }

        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                output.warnings.push(format!(
                    "skipped unreadable entry under {}: {err}",
                    root.display()
                ));
                continue;
            }
        };

        let path = entry.path();
        if !path.is_file() || (!settings.include_hidden && is_hidden(path)) {
            continue;
        }

        output.files_seen += 1;
        if !is_audio_file(path, &extensions) {
            output.skipped_unsupported += 1;
            continue;
        }

        let size_bytes = entry.metadata().map(|m| m.len()).unwrap_or(0);
        match AudioFileRecord::from_path(path, size_bytes) {
            Some(record) => output.records.push(record),
            None => output
                .warnings
                .push(format!("skipped non-UTF-8 file name: {}", path.display())),
        }
    }

    debug!(
        root = %root.display(),
        records = output.records.len(),
        "walked library root"
    );
    output
}
