use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::normalize::normalize;

/// One audio file discovered during a scan. Immutable after the index is
/// built; the keys are derived purely from the file's own path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFileRecord {
    pub path: PathBuf,
    pub stem: String,
    pub extension: String,
    pub size_bytes: u64,
}

impl AudioFileRecord {
    /// Build a record from an on-disk path and its size. Returns `None` when
    /// the file name is not valid UTF-8.
    pub fn from_path(path: &Path, size_bytes: u64) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        let keys = normalize(name);
        Some(Self {
            path: path.to_path_buf(),
            stem: keys.stem,
            extension: keys.extension,
            size_bytes,
        })
    }
}

/// Read-only lookup structure over a scanned music library.
///
/// Buckets are sorted by (extension, path) when the index is published, so
/// `lookup` results are reproducible across runs on the same file-system
/// state regardless of scan order.
#[derive(Debug, Default)]
pub struct LibraryIndex {
    by_stem: HashMap<String, Vec<AudioFileRecord>>,
    // (stem, extension) -> positions within the stem bucket
    by_stem_ext: HashMap<(String, String), Vec<usize>>,
    len: usize,
}

impl LibraryIndex {
    /// Build an index from raw records. Duplicate absolute paths (repeated
    /// roots, symlink cycles) collapse to a single record.
    pub fn from_records(mut records: Vec<AudioFileRecord>) -> Self {
        records.sort_by(|a, b| a.path.cmp(&b.path));
        records.dedup_by(|a, b| a.path == b.path);

        let mut by_stem: HashMap<String, Vec<AudioFileRecord>> = HashMap::new();
        for record in records {
            by_stem.entry(record.stem.clone()).or_default().push(record);
        }

        let mut by_stem_ext: HashMap<(String, String), Vec<usize>> = HashMap::new();
        let mut len = 0;
        for (stem, bucket) in by_stem.iter_mut() {
            bucket.sort_by(|a, b| (&a.extension, &a.path).cmp(&(&b.extension, &b.path)));
            len += bucket.len();
            for (pos, record) in bucket.iter().enumerate() {
                by_stem_ext
                    .entry((stem.clone(), record.extension.clone()))
                    .or_default()
                    .push(pos);
            }
        }

        Self {
            by_stem,
            by_stem_ext,
            len,
        }
    }

    /// All records sharing the normalized stem, in (extension, path) order.
    pub fn lookup(&self, stem: &str) -> &[AudioFileRecord] {
        self.by_stem.get(stem).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Records matching both stem and extension (exact-format lookup).
    pub fn lookup_exact(&self, stem: &str, extension: &str) -> Vec<&AudioFileRecord> {
        let Some(positions) = self
            .by_stem_ext
            .get(&(stem.to_string(), extension.to_string()))
        else {
            return Vec::new();
        };
        let bucket = self.lookup(stem);
        positions.iter().map(|&pos| &bucket[pos]).collect()
    }

    /// Number of indexed records.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
