use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/dacapo/config.toml` or `~/.config/dacapo/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `DACAPO__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub scan: ScanSettings,
    pub output: OutputSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            library: LibrarySettings::default(),
            scan: ScanSettings::default(),
            output: OutputSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    /// Files with any other extension are left out of the index.
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec![
                "flac".into(),
                "alac".into(),
                "m4a".into(),
                "mp4".into(),
                "aac".into(),
                "mp3".into(),
                "ogg".into(),
                "opus".into(),
                "wav".into(),
                "aif".into(),
                "aiff".into(),
                "aifc".into(),
                "ape".into(),
                "wv".into(),
                "dsf".into(),
                "dff".into(),
            ],
            follow_links: true,
            include_hidden: true,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    /// Size of the worker pool used to walk library roots in parallel.
    pub workers: usize,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self { workers: 4 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Where fixed playlists and selection journals are written.
    /// Defaults to the source playlist's directory when unset.
    pub dir: Option<PathBuf>,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self { dir: None }
    }
}
