//! Filename normalization.
//!
//! Playlist entries and indexed library files are compared through the keys
//! produced here: a case-folded stem and a lower-cased extension. The stem is
//! what survives relocation, renaming of parent folders, drive-letter changes
//! and format conversion, so it is the primary index key.

/// Comparison keys for one path or filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedName {
    /// Filename without its final extension, case-folded, whitespace-squeezed.
    pub stem: String,
    /// Lower-cased extension without the dot; empty when the name has none.
    pub extension: String,
}

/// Normalize a path reference into comparison keys.
///
/// Total: any input produces a result. Forward and backward slashes are both
/// treated as separators so Windows-style playlist lines compare against
/// Unix-style library paths, and a leading drive letter is ignored.
pub fn normalize(path_text: &str) -> NormalizedName {
    let name = path_text
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(path_text)
        .trim();

    // Bare "C:name" references (no separator after the drive prefix).
    let name = match name.as_bytes() {
        [drive, b':', ..] if drive.is_ascii_alphabetic() => &name[2..],
        _ => name,
    };

    let (stem, extension) = match name.rfind('.') {
        // A leading dot is a hidden file, not an extension separator.
        Some(idx) if idx > 0 => (&name[..idx], &name[idx + 1..]),
        _ => (name, ""),
    };

    NormalizedName {
        stem: fold_stem(stem),
        extension: extension.to_lowercase(),
    }
}

fn fold_stem(stem: &str) -> String {
    stem.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
