//! What an editor popup should offer for the text left of the cursor.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::index::DocumentIndex;
use crate::parsing::LocationKind;
use crate::parsing::patterns::{ACTION_MARKER, CHARACTER_LIST_MARKER, HEADING_MARKER, TAG_OPEN};

/// `1-2 ` followed by a partial time of day.
static TIME_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+-\d+\s+(\S*)$").expect("Invalid time field regex"));

/// `1-2 日 ` followed by a partial location kind.
static KIND_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+-\d+\s+\S+\s+(\S*)$").expect("Invalid kind field regex"));

/// `张三（` followed by a partial emotion.
static EMOTION_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^（：\s]+（([^（）：]*)$").expect("Invalid emotion regex"));

/// Names and vocabularies completions are drawn from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionSources {
    pub characters: Vec<String>,
    pub emotions: Vec<String>,
    pub times_of_day: Vec<String>,
}

impl CompletionSources {
    /// Adds every character listed or speaking in `index` that is not
    /// already known.
    pub fn with_index_characters(mut self, index: &DocumentIndex) -> Self {
        let names = index.scenes.iter().flat_map(|scene| {
            scene
                .characters
                .iter()
                .chain(scene.speakers.iter().map(|s| &s.name))
        });
        for name in names {
            if !self.characters.contains(name) {
                self.characters.push(name.clone());
            }
        }
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CompletionKind {
    /// A name for the character list line.
    Character,
    TimeOfDay,
    LocationKind,
    Emotion,
    /// A name starting a dialogue line.
    Speaker,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completion {
    pub kind: CompletionKind,
    /// Char range of the prefix the chosen candidate replaces.
    pub range: Range<usize>,
    pub candidates: Vec<String>,
}

/// Suggestions for `line_prefix`, the text between line start and cursor.
/// `None` when the position takes no completion or nothing matches.
pub fn suggest(line_prefix: &str, sources: &CompletionSources) -> Option<Completion> {
    let text = line_prefix.trim_start();
    let end = line_prefix.chars().count();

    let (kind, partial, candidates) = if let Some(rest) = character_list_rest(text) {
        let partial = last_token(rest);
        let listed: Vec<&str> = rest.split_whitespace().collect();
        let listed = if partial.is_empty() {
            &listed[..]
        } else {
            &listed[..listed.len() - 1]
        };
        let candidates: Vec<&str> = matching(&sources.characters, partial)
            .filter(|name| !listed.contains(name))
            .collect();
        (CompletionKind::Character, partial, candidates)
    } else if let Some(partial) = capture(&TIME_FIELD, text) {
        let candidates: Vec<&str> = matching(&sources.times_of_day, partial).collect();
        (CompletionKind::TimeOfDay, partial, candidates)
    } else if let Some(partial) = capture(&KIND_FIELD, text) {
        let candidates: Vec<&str> = LocationKind::ALL
            .iter()
            .map(|kind| kind.token())
            .filter(|token| token.starts_with(partial) && *token != partial)
            .collect();
        (CompletionKind::LocationKind, partial, candidates)
    } else if let Some(partial) = capture(&EMOTION_FIELD, text) {
        let candidates: Vec<&str> = matching(&sources.emotions, partial).collect();
        (CompletionKind::Emotion, partial, candidates)
    } else if starts_dialogue(text) {
        let candidates: Vec<&str> = matching(&sources.characters, text).collect();
        (CompletionKind::Speaker, text, candidates)
    } else {
        return None;
    };

    let candidates = dedup(candidates);
    if candidates.is_empty() {
        return None;
    }
    Some(Completion {
        kind,
        range: end - partial.chars().count()..end,
        candidates,
    })
}

/// Names after `人 `, when the line is a character list.
fn character_list_rest(text: &str) -> Option<&str> {
    let rest = text.strip_prefix(CHARACTER_LIST_MARKER)?;
    rest.starts_with(char::is_whitespace).then_some(rest)
}

fn last_token(text: &str) -> &str {
    if text.ends_with(char::is_whitespace) {
        return "";
    }
    text.split_whitespace().next_back().unwrap_or("")
}

fn capture<'a>(pattern: &Regex, text: &'a str) -> Option<&'a str> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// A lone word with no markup yet could become a speaker name.
fn starts_dialogue(text: &str) -> bool {
    !text.contains(char::is_whitespace)
        && !text.contains(['：', '（'])
        && !text.starts_with(|c: char| {
            c.is_ascii_digit() || c == ACTION_MARKER || c == HEADING_MARKER
        })
        && !text.starts_with(TAG_OPEN)
}

fn matching<'a>(pool: &'a [String], partial: &'a str) -> impl Iterator<Item = &'a str> {
    pool.iter()
        .map(String::as_str)
        .filter(move |candidate| candidate.starts_with(partial) && *candidate != partial)
}

fn dedup(candidates: Vec<&str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !out.iter().any(|c| c == candidate) {
            out.push(candidate.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::index_document;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn sources() -> CompletionSources {
        CompletionSources {
            characters: vec!["张三".into(), "张小花".into(), "李四".into()],
            emotions: vec!["笑".into(), "低声".into(), "冷笑".into()],
            times_of_day: vec!["日".into(), "夜".into(), "黄昏".into()],
        }
    }

    fn complete(prefix: &str) -> Option<(CompletionKind, Range<usize>, Vec<String>)> {
        suggest(prefix, &sources()).map(|c| (c.kind, c.range, c.candidates))
    }

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_character_list_skips_listed_names() {
        assert_eq!(
            complete("人 张三 "),
            Some((CompletionKind::Character, 5..5, names(&["张小花", "李四"])))
        );
        assert_eq!(
            complete("人 李四 张"),
            Some((CompletionKind::Character, 5..6, names(&["张三", "张小花"])))
        );
    }

    #[test]
    fn test_time_of_day() {
        assert_eq!(
            complete("1-2 "),
            Some((CompletionKind::TimeOfDay, 4..4, names(&["日", "夜", "黄昏"])))
        );
        assert_eq!(
            complete("12-3 黄"),
            Some((CompletionKind::TimeOfDay, 5..6, names(&["黄昏"])))
        );
    }

    #[test]
    fn test_location_kind() {
        assert_eq!(
            complete("1-2 日 "),
            Some((CompletionKind::LocationKind, 6..6, names(&["内", "外"])))
        );
        assert_eq!(complete("1-2 日 外"), None);
    }

    #[test]
    fn test_emotion() {
        assert_eq!(
            complete("张三（"),
            Some((CompletionKind::Emotion, 3..3, names(&["笑", "低声", "冷笑"])))
        );
        assert_eq!(
            complete("张三（冷"),
            Some((CompletionKind::Emotion, 3..4, names(&["冷笑"])))
        );
    }

    #[test]
    fn test_speaker_at_line_start() {
        assert_eq!(
            complete(""),
            Some((CompletionKind::Speaker, 0..0, names(&["张三", "张小花", "李四"])))
        );
        assert_eq!(
            complete("  李"),
            Some((CompletionKind::Speaker, 2..3, names(&["李四"])))
        );
    }

    #[rstest]
    #[case("张三：你好")]
    #[case("△ 开门")]
    #[case("# 第")]
    #[case("【标签：")]
    #[case("1-2 日 内 客")]
    #[case("王")]
    fn test_no_completion(#[case] prefix: &str) {
        assert_eq!(complete(prefix), None);
    }

    #[test]
    fn test_index_characters_are_merged() {
        let index = index_document("1-1 日 内 客厅\n人 王五 张三\n赵六：来了");
        let sources = CompletionSources::default().with_index_characters(&index);
        assert_eq!(sources.characters, names(&["王五", "张三", "赵六"]));
    }
}
