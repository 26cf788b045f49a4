//! Prose length and screen-time estimation.

use crate::parsing::patterns::{
    ACTION, CHARACTER_LIST_MARKER, EMOTION_DIALOGUE, HEADING_MARKER, SCENE_NUMBER_PREFIX,
    SEPARATOR, SIMPLE_DIALOGUE, TAG_OPEN, is_flashback_marker,
};

/// Words of dialogue and action that fill one minute of screen time.
pub const WORDS_PER_MINUTE: usize = 200;

/// Counts the "words" of prose in `text`, skipping structural lines and
/// counting only the spoken part of dialogue lines.
pub fn content_word_count(text: &str) -> usize {
    text.lines().map(line_word_count).sum()
}

/// Word count contributed by a single line. A line carrying an inline tag
/// marker anywhere is markup and counts nothing.
pub fn line_word_count(line: &str) -> usize {
    let trimmed = line.trim();
    if is_structural(trimmed) {
        return 0;
    }
    word_count(counted_text(trimmed))
}

fn is_structural(trimmed: &str) -> bool {
    trimmed.is_empty()
        || SCENE_NUMBER_PREFIX.is_match(trimmed)
        || is_character_list(trimmed)
        || is_flashback_marker(trimmed)
        || trimmed.contains(TAG_OPEN)
        || trimmed == SEPARATOR
        || trimmed.starts_with(HEADING_MARKER)
}

/// The part of a prose line that is spoken or acted. Dialogue wins over the
/// action marker, so `△ 张三：走` counts only the speech.
fn counted_text(prose: &str) -> &str {
    if let Some(m) = EMOTION_DIALOGUE.captures(prose).and_then(|caps| caps.get(3)) {
        return m.as_str();
    }
    if let Some(m) = SIMPLE_DIALOGUE.captures(prose).and_then(|caps| caps.get(2)) {
        return m.as_str();
    }
    if let Some(m) = ACTION.captures(prose).and_then(|caps| caps.get(1)) {
        return m.as_str();
    }
    prose
}

fn is_character_list(trimmed: &str) -> bool {
    let mut chars = trimmed.chars();
    chars.next() == Some(CHARACTER_LIST_MARKER) && chars.next().is_some_and(char::is_whitespace)
}

/// Every non-whitespace char is one word; CJK text has no word boundaries to
/// split on, so this is the count screenwriters expect.
pub fn word_count(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace()).count()
}

/// Estimated screen time in minutes, rounded up to the next half minute.
pub fn estimate_duration_minutes(word_count: usize) -> f64 {
    if word_count == 0 {
        return 0.0;
    }
    let minutes = word_count as f64 / WORDS_PER_MINUTE as f64;
    (minutes * 2.0).ceil() / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", 0)]
    #[case("1-1 日 内 客厅", 0)]
    #[case("1-2", 0)]
    #[case("人 张三 李四", 0)]
    #[case("人 欧阳长名字角色 另一个很长的名字", 0)]
    #[case("【闪回】", 0)]
    #[case("【闪回结束】", 0)]
    #[case("【标签：伏笔】", 0)]
    #[case("---", 0)]
    #[case("# 第1集", 0)]
    #[case("张三（笑）：你好世界", 4)]
    #[case("张三：你好", 2)]
    #[case("△ 李四站起来", 5)]
    #[case("  他 走 进 房 间  ", 5)]
    #[case("张三：你好【标签：伏笔】", 0)]
    #[case("△ 李四坐下【标签：伏笔】", 0)]
    #[case("他笑了【标签：伏笔】", 0)]
    #[case("△ 张三：走", 1)]
    #[case("△ 张三（笑）：走吧", 2)]
    fn test_line_word_count(#[case] line: &str, #[case] expected: usize) {
        assert_eq!(line_word_count(line), expected);
    }

    #[test]
    fn test_content_word_count_sums_lines() {
        let text = "1-1 日 内 客厅\n人 张三 李四\n张三：你好\n△ 李四站起来";
        assert_eq!(content_word_count(text), 7);
    }

    #[test]
    fn test_character_marker_without_space_is_prose() {
        assert_eq!(line_word_count("人山人海"), 4);
    }

    #[rstest]
    #[case(0, 0.0)]
    #[case(1, 0.5)]
    #[case(50, 0.5)]
    #[case(100, 0.5)]
    #[case(101, 1.0)]
    #[case(200, 1.0)]
    #[case(201, 1.5)]
    #[case(1000, 5.0)]
    fn test_estimate_duration_minutes(#[case] words: usize, #[case] expected: f64) {
        assert_eq!(estimate_duration_minutes(words), expected);
    }
}
