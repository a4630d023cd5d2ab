//! dacapo repairs broken M3U playlists against a music library.
//!
//! Entries whose referenced audio file no longer exists at the recorded
//! path (moved, renamed, drive letter changed, format converted) are
//! re-linked to the matching file elsewhere in the library. Audio files are
//! never touched and the fixed playlist is always a new artifact next to
//! the source.
//!
//! The pieces, leaves first: [`normalize`] produces comparison keys,
//! [`library`] builds the searchable index, [`playlist`] parses and writes
//! M3U files, [`resolve`] classifies entries and ranks candidates,
//! [`journal`] persists manual choices across restarts, and [`session`]
//! sequences the whole repair and is the only surface a GUI or CLI needs.

/// Settings schema and loading.
pub mod config;

/// Crate error types.
pub mod error;

/// Durable journal of manual selections.
pub mod journal;

/// Library scanning and the stem index.
pub mod library;

/// Filename normalization (comparison keys).
pub mod normalize;

/// M3U parsing and writing.
pub mod playlist;

/// Report tuples for collaborators.
pub mod report;

/// The resolution engine.
pub mod resolve;

/// Session controller.
pub mod session;

pub use error::{Error, Result};
pub use session::Session;
