//! Scene numbering: where a new scene goes, and which headers shift to keep
//! numbers dense within an episode.
//!
//! Everything here computes data. Rewriting text is left to whoever owns the
//! buffer (see [`crate::editing::ScriptBuffer`]).

use std::collections::BTreeMap;
use std::ops::Range;

use serde::Serialize;
use thiserror::Error;

use crate::index::{DocumentIndex, SceneRecord};
use crate::parsing::{SceneNumber, with_scene_number};

/// Replace the zero-based line range `lines` (end exclusive) with
/// `replacement`. An empty range inserts before `lines.start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextEdit {
    pub lines: Range<usize>,
    /// Replacement text without a trailing newline.
    pub replacement: String,
}

impl TextEdit {
    pub fn replace_line(line: usize, replacement: impl Into<String>) -> Self {
        Self {
            lines: line..line + 1,
            replacement: replacement.into(),
        }
    }

    pub fn insert_before(line: usize, replacement: impl Into<String>) -> Self {
        Self {
            lines: line..line,
            replacement: replacement.into(),
        }
    }
}

/// Caret position after an edit, both zero-based; `column` counts chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CursorTarget {
    pub line: usize,
    pub column: usize,
}

/// The edits for inserting a new scene below the cursor line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsertionPlan {
    pub number: SceneNumber,
    /// To be applied in order: renumbered headers from the bottom up, then
    /// the new header stub.
    pub edits: Vec<TextEdit>,
    pub cursor: CursorTarget,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumberingError {
    #[error("scene {0} already has the largest possible number; renumber the episode first")]
    SceneNumberOverflow(SceneNumber),
}

/// The number right after `scene` in its episode.
fn following(scene: &SceneRecord) -> Result<SceneNumber, NumberingError> {
    scene
        .scene
        .checked_add(1)
        .map(|next| SceneNumber::new(scene.episode, next))
        .ok_or(NumberingError::SceneNumberOverflow(scene.number()))
}

fn neighbours(
    index: &DocumentIndex,
    cursor_line: usize,
) -> (Option<&SceneRecord>, Option<&SceneRecord>) {
    let split = index.scenes.partition_point(|s| s.line_index <= cursor_line);
    let prev = split.checked_sub(1).map(|i| &index.scenes[i]);
    (prev, index.scenes.get(split))
}

/// The number a scene inserted just after `cursor_line` should get.
///
/// Between two episodes the new scene joins the earlier episode; episode
/// numbers are never invented here. Saturates at `u32::MAX`, which
/// [`plan_scene_insertion`] refuses.
pub fn next_scene_number(index: &DocumentIndex, cursor_line: usize) -> SceneNumber {
    match neighbours(index, cursor_line) {
        (None, None) => SceneNumber::new(1, 1),
        (None, Some(next)) => SceneNumber::new(next.episode, 1),
        (Some(prev), _) => SceneNumber::new(prev.episode, prev.scene.saturating_add(1)),
    }
}

/// Whether inserting at `cursor_line` collides with a later scene of the
/// same episode, which then has to shift.
pub fn needs_renumbering(index: &DocumentIndex, cursor_line: usize) -> bool {
    let number = next_scene_number(index, cursor_line);
    let (_, next) = neighbours(index, cursor_line);
    next.is_some_and(|next| next.episode == number.episode)
}

/// Scenes that shift up by one when `new_number` is inserted after
/// `cursor_line`, in line order.
pub fn scenes_to_renumber(
    index: &DocumentIndex,
    cursor_line: usize,
    new_number: SceneNumber,
) -> Vec<&SceneRecord> {
    index
        .scenes
        .iter()
        .filter(|s| {
            s.episode == new_number.episode
                && s.line_index > cursor_line
                && s.scene >= new_number.scene
        })
        .collect()
}

/// Plans a new scene header on the line after `cursor_line`, bumping later
/// scenes of the same episode. Renumbering edits come highest line first so
/// applying them in order never disturbs a line still to be rewritten.
///
/// Fails when the new or a bumped scene number would not fit in `u32`.
pub fn plan_scene_insertion(
    index: &DocumentIndex,
    text: &str,
    cursor_line: usize,
) -> Result<InsertionPlan, NumberingError> {
    let lines: Vec<&str> = text.lines().collect();
    if let (Some(prev), _) = neighbours(index, cursor_line) {
        following(prev)?;
    }
    let number = next_scene_number(index, cursor_line);

    let mut edits = Vec::new();
    if needs_renumbering(index, cursor_line) {
        for scene in scenes_to_renumber(index, cursor_line, number).into_iter().rev() {
            let bumped = following(scene)?;
            if let Some(text) = lines
                .get(scene.line_index)
                .and_then(|line| with_scene_number(line, bumped))
            {
                edits.push(TextEdit::replace_line(scene.line_index, text));
            }
        }
    }

    let stub = format!("{number} ");
    let insert_at = if lines.is_empty() {
        0
    } else {
        (cursor_line + 1).min(lines.len())
    };
    edits.push(TextEdit::insert_before(insert_at, stub.clone()));

    log::debug!(
        "planned scene {number} at line {insert_at} with {} renumbered headers",
        edits.len() - 1
    );

    Ok(InsertionPlan {
        number,
        edits,
        cursor: CursorTarget {
            line: insert_at,
            column: stub.chars().count(),
        },
    })
}

/// Edits that make scene numbers dense (`1..N` in line order) within every
/// episode. Headers already carrying the right number produce no edit.
pub fn plan_resequence(index: &DocumentIndex, text: &str) -> Vec<TextEdit> {
    let lines: Vec<&str> = text.lines().collect();
    let mut counters: BTreeMap<u32, u32> = BTreeMap::new();

    let mut edits: Vec<TextEdit> = index
        .scenes
        .iter()
        .filter_map(|scene| {
            let counter = counters.entry(scene.episode).or_insert(0);
            *counter += 1;
            if scene.scene == *counter {
                return None;
            }
            let line = lines.get(scene.line_index)?;
            with_scene_number(line, SceneNumber::new(scene.episode, *counter))
                .map(|text| TextEdit::replace_line(scene.line_index, text))
        })
        .collect();

    edits.reverse();
    edits
}
