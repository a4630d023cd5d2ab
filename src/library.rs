//! Music library index.
//!
//! `library::scan` walks one or more root folders and publishes an immutable
//! `LibraryIndex` keyed by normalized filename stem. The index is rebuilt
//! wholesale on every scan and never patched in place, so readers can share
//! it freely once it exists.

mod model;
mod scan;

pub use model::*;
pub use scan::*;
