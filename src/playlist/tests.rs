use super::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn parse(text: &str) -> Playlist {
    from_text(Path::new("/tmp/15.m3u"), text)
}

#[test]
fn directives_and_blanks_are_passthrough_not_entries() {
    let pl = parse("#EXTM3U\n#EXTINF:123,Artist - Song\n/music/a.mp3\n\n/music/b.mp3\n");

    assert_eq!(pl.entries.len(), 2);
    assert_eq!(pl.lines.len(), 5);
    assert_eq!(pl.lines[0], Line::Passthrough("#EXTM3U".to_string()));
    assert_eq!(pl.lines[2], Line::Entry(0));
    assert_eq!(pl.lines[3], Line::Passthrough(String::new()));
    assert_eq!(pl.lines[4], Line::Entry(1));
}

#[test]
fn ordinals_count_resolvable_entries_only() {
    let pl = parse("#EXTM3U\n/music/a.mp3\n# comment\n/music/b.mp3\n");
    assert_eq!(pl.entries[0].ordinal, 0);
    assert_eq!(pl.entries[0].original_path, "/music/a.mp3");
    assert_eq!(pl.entries[1].ordinal, 1);
    assert_eq!(pl.entries[1].original_path, "/music/b.mp3");
}

#[test]
fn identity_is_stable_across_reparses_of_unchanged_lines() {
    let text = "#EXTM3U\n/music/a.mp3\n/music/b.mp3\n";
    let first = parse(text);
    let second = parse(text);
    assert_eq!(first.entries[1].identity, second.entries[1].identity);

    let moved = parse("#EXTM3U\n/music/b.mp3\n/music/a.mp3\n");
    assert_ne!(first.entries[1].identity, moved.entries[1].identity);
}

#[test]
fn bom_is_tolerated_and_first_directive_still_recognized() {
    let pl = parse("\u{feff}#EXTM3U\n/music/a.mp3\n");
    assert!(pl.bom);
    assert_eq!(pl.entries.len(), 1);
    assert_eq!(pl.lines[0], Line::Passthrough("#EXTM3U".to_string()));
}

#[test]
fn read_missing_file_is_fatal_with_path_context() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("gone.m3u");
    let err = read(&missing).unwrap_err();
    assert!(matches!(err, crate::error::Error::Playlist { .. }));
    assert!(err.to_string().contains("gone.m3u"));
}

#[test]
fn read_non_utf8_file_is_fatal() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("latin1.m3u");
    fs::write(&path, b"/music/caf\xe9.mp3\n").unwrap();
    let err = read(&path).unwrap_err();
    assert!(matches!(err, crate::error::Error::PlaylistEncoding { .. }));
}

#[test]
fn canonical_key_strips_repair_prefixes_and_suffixes() {
    for name in [
        "15.m3u",
        "fixed_15.m3u",
        "fixed_15_selected.m3u",
        "__tmp_fixed_15.m3u",
        "draft_fixed_15.m3u",
    ] {
        assert_eq!(canonical_key(Path::new(name)), "15", "for {name}");
    }
    assert_eq!(canonical_key(Path::new("roadtrip.m3u8")), "roadtrip");
}

#[test]
fn output_name_embeds_key_and_selected_marker() {
    let pl = from_text(Path::new("/pl/roadtrip.m3u8"), "");
    assert_eq!(pl.output_file_name(), "fixed_roadtrip_selected.m3u8");
    assert_eq!(pl.journal_file_name(), "selections_roadtrip.jsonl");

    let pl = from_text(Path::new("/pl/fixed_15_selected.m3u"), "");
    assert_eq!(pl.output_file_name(), "fixed_15_selected.m3u");
}

#[test]
fn save_substitutes_resolved_paths_and_keeps_raw_lines_verbatim() {
    let dir = tempdir().unwrap();
    let mut pl = parse("#EXTM3U\n/old/a.mp3\n  /old/spaced.mp3  \n/old/c.mp3\n");
    pl.entries[0].resolution = Resolution::RepairedAuto {
        path: PathBuf::from("/new/a.mp3"),
    };
    pl.entries[2].resolution = Resolution::Failed;

    let out = dir.path().join("fixed_15_selected.m3u");
    save(&pl, &out).unwrap();

    let written = fs::read_to_string(&out).unwrap();
    assert_eq!(
        written,
        "#EXTM3U\n/new/a.mp3\n  /old/spaced.mp3  \n/old/c.mp3\n"
    );
}

#[test]
fn save_preserves_bom() {
    let dir = tempdir().unwrap();
    let pl = parse("\u{feff}#EXTM3U\n/old/a.mp3\n");
    let out = dir.path().join("out.m3u");
    save(&pl, &out).unwrap();
    assert!(fs::read_to_string(&out).unwrap().starts_with('\u{feff}'));
}

#[test]
fn save_refuses_to_overwrite_the_source() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("15.m3u");
    fs::write(&source, "/old/a.mp3\n").unwrap();

    let pl = read(&source).unwrap();
    let err = save(&pl, &source).unwrap_err();
    assert!(matches!(err, crate::error::Error::Save { .. }));
    assert_eq!(fs::read_to_string(&source).unwrap(), "/old/a.mp3\n");
}

#[test]
fn failed_save_leaves_no_output_file() {
    let pl = parse("/old/a.mp3\n");
    let out = PathBuf::from("/nonexistent-dir-for-sure/out.m3u");
    assert!(save(&pl, &out).is_err());
    assert!(!out.exists());
}

#[test]
fn save_leaves_no_temporary_sibling_behind() {
    let dir = tempdir().unwrap();
    let pl = parse("/old/a.mp3\n");
    let out = dir.path().join("out.m3u");
    save(&pl, &out).unwrap();

    let names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["out.m3u".to_string()]);
}
