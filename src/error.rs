//! Crate error types.
//!
//! Only conditions that abort an operation live here. Recoverable problems
//! (unreadable subfolders, malformed playlist lines, stale journal entries)
//! are reported as warnings or entry-level statuses instead.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file or environment could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    /// Loaded configuration failed validation.
    #[error("invalid settings: {0}")]
    Settings(String),

    /// The playlist file could not be opened or read.
    #[error("playlist {}: {source}", path.display())]
    Playlist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The playlist file is not valid UTF-8.
    #[error("playlist {} is not valid UTF-8", path.display())]
    PlaylistEncoding { path: PathBuf },

    /// None of the supplied library roots could be read.
    #[error("no readable library roots were supplied")]
    NoReadableRoots,

    /// A library scan was cancelled before completion.
    #[error("library scan cancelled")]
    ScanCancelled,

    /// Writing the fixed playlist failed; no output file was produced.
    #[error("saving {}: {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The selection journal could not be read or appended to.
    #[error("journal {}: {source}", path.display())]
    Journal {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A manual selection referenced an entry identity that does not exist.
    #[error("no playlist entry with identity {0:?}")]
    UnknownIdentity(String),

    /// A manual selection pointed at a file that is not on disk.
    #[error("chosen path does not exist: {}", .0.display())]
    ChosenPathMissing(PathBuf),

    /// An operation that needs a library index ran before a scan.
    #[error("no library index has been built")]
    NoIndex,

    /// An operation that needs a playlist ran before an import.
    #[error("no playlist has been imported")]
    NoPlaylist,
}

pub type Result<T> = std::result::Result<T, Error>;
