//! Fixture tests for the parsing module.
//!
//! Fixtures (.md) live in `fixtures/`; each test states the element kinds it
//! expects for the fixture's lines.

use pretty_assertions::assert_eq;

use crate::parsing::{ElementKind, parse_lines, validate_document};

fn load_fixture(name: &str) -> String {
    let fixtures_dir = format!("{}/src/parsing/tests/fixtures", env!("CARGO_MANIFEST_DIR"));
    std::fs::read_to_string(format!("{fixtures_dir}/{name}.md")).unwrap()
}

fn kinds(text: &str) -> Vec<ElementKind> {
    parse_lines(text).map(|line| line.kind).collect()
}

#[test]
fn fixture_single_scene() {
    use ElementKind::*;

    let text = load_fixture("single_scene");
    assert_eq!(
        kinds(&text),
        vec![SceneHeader, CharacterList, SimpleDialogue, Action]
    );
}

#[test]
fn fixture_episode_with_flashback() {
    use ElementKind::*;

    let text = load_fixture("episode_with_flashback");
    assert_eq!(
        kinds(&text),
        vec![
            EpisodeHeader,
            Empty,
            SceneHeader,
            CharacterList,
            Action,
            DialogueWithEmotion,
            Other,
            Empty,
            FlashbackStart,
            SceneHeader,
            CharacterList,
            SimpleDialogue,
            FlashbackEnd,
            Empty,
            SceneHeader,
            Action,
        ]
    );
    assert!(validate_document(&text).is_empty());
}

#[test]
fn fixture_malformed_headers() {
    let text = load_fixture("malformed_headers");

    // Malformed headers are never scene headers...
    assert!(kinds(&text).iter().all(|kind| *kind != ElementKind::SceneHeader));

    // ...but every one of them is diagnosed.
    let lines: Vec<usize> = validate_document(&text).iter().map(|d| d.line).collect();
    assert_eq!(lines, vec![0, 0, 0, 1, 2, 3]);
}

#[test]
fn empty_document() {
    assert_eq!(parse_lines("").count(), 0);
}

#[test]
fn line_indices_follow_source_order() {
    let indices: Vec<usize> = parse_lines("a\r\nb\nc").map(|line| line.index).collect();
    assert_eq!(indices, vec![0, 1, 2]);
}
