use crate::estimate::{estimate_duration_minutes, line_word_count};
use crate::parsing::patterns::{
    CHARACTER_LIST, EMOTION_DIALOGUE, INLINE_TAG, SIMPLE_DIALOGUE, TAG_OPEN, extract_tags,
};
use crate::parsing::{ElementKind, LineClassifier, SceneHeader, parse_header};

use super::types::{SceneRecord, SpeakerLines};

/// A scene whose body is still being read.
#[derive(Debug)]
struct OpenScene {
    header: SceneHeader,
    line_index: usize,
    is_flashback: bool,
    characters: Vec<String>,
    tags: Vec<String>,
    word_count: usize,
    speakers: Vec<SpeakerLines>,
}

impl OpenScene {
    fn new(header: SceneHeader, line_index: usize, is_flashback: bool) -> Self {
        Self {
            header,
            line_index,
            is_flashback,
            characters: Vec::new(),
            tags: Vec::new(),
            word_count: 0,
            speakers: Vec::new(),
        }
    }

    fn add_body_line(&mut self, kind: ElementKind, line: &str) {
        self.tags.extend(extract_tags(line).map(str::to_string));
        self.word_count += line_word_count(line);

        if kind.is_dialogue()
            && let Some(name) = speaker(kind, line)
        {
            let words = line_word_count(line);
            match self.speakers.iter_mut().find(|s| s.name == name) {
                Some(existing) => {
                    existing.lines += 1;
                    existing.words += words;
                }
                None => self.speakers.push(SpeakerLines {
                    name,
                    lines: 1,
                    words,
                }),
            }
        }
    }

    fn close(self, end_line_index: usize) -> SceneRecord {
        SceneRecord {
            episode: self.header.episode,
            scene: self.header.scene,
            line_index: self.line_index,
            end_line_index,
            time_of_day: self.header.time,
            location_kind: self.header.location_kind,
            location: self.header.location,
            characters: self.characters,
            tags: self.tags,
            word_count: self.word_count,
            duration_minutes: estimate_duration_minutes(self.word_count),
            is_flashback: self.is_flashback,
            speakers: self.speakers,
        }
    }
}

/// Name of the speaker of a dialogue line. Colons inside inline tags do not
/// make a line dialogue.
fn speaker(kind: ElementKind, line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.starts_with(TAG_OPEN) {
        return None;
    }
    let prose = INLINE_TAG.replace_all(trimmed, "");
    let pattern = match kind {
        ElementKind::DialogueWithEmotion if EMOTION_DIALOGUE.is_match(&prose) => &EMOTION_DIALOGUE,
        _ => &SIMPLE_DIALOGUE,
    };
    pattern
        .captures(&prose)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

/// Accumulator for the single top-to-bottom pass over a document.
#[derive(Debug, Default)]
pub(super) struct SceneScan {
    in_flashback: bool,
    open: Option<OpenScene>,
    scenes: Vec<SceneRecord>,
    max_episode: u32,
    line_count: usize,
}

impl SceneScan {
    /// Consumes one line and returns the updated scan.
    pub(super) fn push(mut self, (index, line): (usize, &str)) -> Self {
        self.line_count = index + 1;

        match LineClassifier.classify(line) {
            ElementKind::FlashbackStart => self.in_flashback = true,
            ElementKind::FlashbackEnd => self.in_flashback = false,
            ElementKind::SceneHeader => match parse_header(line) {
                Some(header) => self.open_scene(header, index),
                None => self.push_body(ElementKind::Other, line),
            },
            ElementKind::CharacterList => {
                if let Some(scene) = self.open.as_mut() {
                    scene.characters = character_names(line);
                    scene.tags.extend(extract_tags(line).map(str::to_string));
                }
            }
            ElementKind::Empty => {}
            kind => self.push_body(kind, line),
        }

        self
    }

    /// Closes the last open scene and returns the scenes with the highest
    /// episode number seen.
    pub(super) fn finish(mut self) -> (Vec<SceneRecord>, u32) {
        if let Some(open) = self.open.take() {
            let end = self.line_count.saturating_sub(1).max(open.line_index);
            self.scenes.push(open.close(end));
        }
        (self.scenes, self.max_episode)
    }

    fn open_scene(&mut self, header: SceneHeader, index: usize) {
        if let Some(previous) = self.open.take() {
            self.scenes.push(previous.close(index - 1));
        }
        self.max_episode = self.max_episode.max(header.episode);
        self.open = Some(OpenScene::new(header, index, self.in_flashback));
    }

    fn push_body(&mut self, kind: ElementKind, line: &str) {
        if let Some(scene) = self.open.as_mut() {
            scene.add_body_line(kind, line);
        }
    }
}

fn character_names(line: &str) -> Vec<String> {
    CHARACTER_LIST
        .captures(line.trim())
        .and_then(|caps| caps.get(1))
        .map(|names| names.as_str().split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}
