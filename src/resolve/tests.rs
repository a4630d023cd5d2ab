use super::*;
use crate::library::{AudioFileRecord, LibraryIndex};
use crate::playlist::{PlaylistEntry, Resolution, Status};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn index_of(paths: &[&str]) -> LibraryIndex {
    LibraryIndex::from_records(
        paths
            .iter()
            .map(|p| AudioFileRecord::from_path(Path::new(p), 0).unwrap())
            .collect(),
    )
}

#[test]
fn existing_original_path_is_kept_without_consulting_the_index() {
    let dir = tempdir().unwrap();
    let on_disk = dir.path().join("Song.mp3");
    fs::write(&on_disk, b"not real").unwrap();

    // A same-stem decoy that would win if the index were consulted.
    let index = index_of(&["/elsewhere/Song.mp3"]);

    let resolution = resolve(on_disk.to_str().unwrap(), &index);
    assert_eq!(
        resolution,
        Resolution::Kept {
            path: on_disk.clone()
        }
    );
    assert!(resolution.candidates().is_empty());
}

#[test]
fn no_stem_match_is_failed_with_no_candidates() {
    let index = index_of(&["/lib/Other.mp3"]);
    let resolution = resolve("/old/Song.mp3", &index);
    assert_eq!(resolution, Resolution::Failed);
    assert!(resolution.candidates().is_empty());
}

#[test]
fn single_same_extension_match_repairs_to_it() {
    let index = index_of(&["/lib/moved/Song.mp3"]);
    assert_eq!(
        resolve("/old/Song.mp3", &index),
        Resolution::RepairedAuto {
            path: PathBuf::from("/lib/moved/Song.mp3")
        }
    );
}

#[test]
fn single_different_extension_match_repairs_format_conversion() {
    let index = index_of(&["/lib/flac/Song.flac"]);
    assert_eq!(
        resolve(r"C:\old\Song.wav", &index),
        Resolution::RepairedAuto {
            path: PathBuf::from("/lib/flac/Song.flac")
        }
    );
}

#[test]
fn multiple_matches_are_ambiguous_with_same_extension_ranked_first() {
    let index = index_of(&["/a/Track.flac", "/b/Track.mp3"]);
    let resolution = resolve("/old/Track.flac", &index);

    assert_eq!(resolution.status(), Some(Status::Ambiguous));
    let paths: Vec<&str> = resolution
        .candidates()
        .iter()
        .map(|r| r.path.to_str().unwrap())
        .collect();
    assert_eq!(paths, vec!["/a/Track.flac", "/b/Track.mp3"]);

    // Same stem referenced as mp3 flips the ranking.
    let resolution = resolve("/old/Track.mp3", &index);
    let paths: Vec<&str> = resolution
        .candidates()
        .iter()
        .map(|r| r.path.to_str().unwrap())
        .collect();
    assert_eq!(paths, vec!["/b/Track.mp3", "/a/Track.flac"]);
}

#[test]
fn ambiguous_ties_within_a_group_break_by_path() {
    let index = index_of(&["/c/Track.mp3", "/a/Track.mp3", "/b/Track.flac"]);
    let resolution = resolve("/old/Track.mp3", &index);

    let paths: Vec<&str> = resolution
        .candidates()
        .iter()
        .map(|r| r.path.to_str().unwrap())
        .collect();
    assert_eq!(paths, vec!["/a/Track.mp3", "/c/Track.mp3", "/b/Track.flac"]);
}

#[test]
fn conversion_candidate_appears_once_a_copy_is_indexed() {
    // A WAV reference with no indexed copy resolves to the lone FLAC; once a
    // WAV copy lands in the library the stem has two matches and the WAV is
    // ranked first for the user to confirm.
    let before = index_of(&["/lib/flac/Song.flac"]);
    assert_eq!(
        resolve("/old/Song.wav", &before),
        Resolution::RepairedAuto {
            path: PathBuf::from("/lib/flac/Song.flac")
        }
    );

    let after = index_of(&["/lib/flac/Song.flac", "/lib/wav/Song.wav"]);
    let resolution = resolve("/old/Song.wav", &after);
    assert_eq!(resolution.status(), Some(Status::Ambiguous));
    assert_eq!(
        resolution.candidates()[0].path,
        PathBuf::from("/lib/wav/Song.wav")
    );
}

#[test]
fn blank_reference_fails_cleanly() {
    let index = index_of(&["/lib/Song.mp3"]);
    assert_eq!(resolve("   ", &index), Resolution::Failed);
}

#[test]
fn resolve_is_deterministic_for_identical_inputs() {
    let index = index_of(&["/a/Track.flac", "/b/Track.mp3"]);
    assert_eq!(
        resolve("/old/Track.flac", &index),
        resolve("/old/Track.flac", &index)
    );
}

#[test]
fn resolve_all_preserves_entry_order_across_workers() {
    let index = index_of(&["/lib/s0.mp3", "/lib/s2.mp3", "/lib/s4.mp3"]);

    let mut entries: Vec<PlaylistEntry> = (0..50)
        .map(|i| PlaylistEntry::new(i, format!("/old/s{i}.mp3")))
        .collect();
    resolve_all(&mut entries, &index, 4);

    for (i, entry) in entries.iter().enumerate() {
        assert_eq!(entry.ordinal, i);
        let expected = if matches!(i, 0 | 2 | 4) {
            Some(Status::RepairedAuto)
        } else {
            Some(Status::Failed)
        };
        assert_eq!(entry.resolution.status(), expected, "entry {i}");
    }
}
