use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::parsing::{LocationKind, SceneNumber};

/// How much one character speaks within a scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeakerLines {
    pub name: String,
    /// Number of dialogue lines.
    pub lines: usize,
    /// Words of dialogue text, excluding name and emotion.
    pub words: usize,
}

/// One scene: its header fields plus what the body contains.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneRecord {
    pub episode: u32,
    pub scene: u32,
    /// Zero-based line of the header.
    pub line_index: usize,
    /// Zero-based last line before the next header (or end of document).
    pub end_line_index: usize,
    pub time_of_day: String,
    pub location_kind: LocationKind,
    pub location: String,
    /// Names from the scene's character list line, in listed order.
    pub characters: Vec<String>,
    /// Inline tag labels in order of appearance; repeats are kept.
    pub tags: Vec<String>,
    pub word_count: usize,
    pub duration_minutes: f64,
    pub is_flashback: bool,
    /// Dialogue per speaker, in order of first line.
    pub speakers: Vec<SpeakerLines>,
}

impl SceneRecord {
    pub fn number(&self) -> SceneNumber {
        SceneNumber::new(self.episode, self.scene)
    }

    /// Whether `line` falls inside this scene.
    pub fn contains_line(&self, line: usize) -> bool {
        (self.line_index..=self.end_line_index).contains(&line)
    }
}

/// Scenes of one document snapshot. Immutable once built; re-indexing edited
/// text produces a new value.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentIndex {
    /// Sorted by `line_index`.
    pub scenes: Vec<SceneRecord>,
    /// Highest episode number seen, 0 if there are no scenes.
    pub episode_count: u32,
    pub fingerprint: String,
    pub built_at: DateTime<Utc>,
}

/// Structural equality: `built_at` is ignored so two indexes of the same text
/// compare equal.
impl PartialEq for DocumentIndex {
    fn eq(&self, other: &Self) -> bool {
        self.fingerprint == other.fingerprint
            && self.episode_count == other.episode_count
            && self.scenes == other.scenes
    }
}

impl DocumentIndex {
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// The scene whose span contains `line`.
    pub fn scene_at_line(&self, line: usize) -> Option<&SceneRecord> {
        let after = self.scenes.partition_point(|s| s.line_index <= line);
        after
            .checked_sub(1)
            .map(|i| &self.scenes[i])
            .filter(|scene| scene.contains_line(line))
    }

    pub fn scenes_in_episode(&self, episode: u32) -> impl Iterator<Item = &SceneRecord> {
        self.scenes.iter().filter(move |s| s.episode == episode)
    }

    pub fn find(&self, number: SceneNumber) -> Option<&SceneRecord> {
        self.scenes.iter().find(|s| s.number() == number)
    }

    /// Distinct episode numbers, ascending.
    pub fn episodes(&self) -> Vec<u32> {
        let mut episodes: Vec<u32> = self.scenes.iter().map(|s| s.episode).collect();
        episodes.sort_unstable();
        episodes.dedup();
        episodes
    }
}
