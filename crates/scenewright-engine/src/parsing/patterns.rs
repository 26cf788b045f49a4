//! Literal markers and compiled line patterns shared by the classifier,
//! the indexer and the word counter.

use std::sync::LazyLock;

use regex::Regex;

/// Interior location token in a scene header.
pub const INTERIOR_TOKEN: &str = "内";
/// Exterior location token in a scene header.
pub const EXTERIOR_TOKEN: &str = "外";

/// Opens a flashback span. Matched by exact equality after trimming.
pub const FLASHBACK_START: &str = "【闪回】";
/// Closes a flashback span. Matched by exact equality after trimming.
pub const FLASHBACK_END: &str = "【闪回结束】";

/// Prefix of a character list line (`人 张三 李四`).
pub const CHARACTER_LIST_MARKER: char = '人';
/// Prefix of an action line (`△ 李四站起来`).
pub const ACTION_MARKER: char = '△';
/// Opening literal of an inline tag (`【标签：回忆】`).
pub const TAG_OPEN: &str = "【标签：";
/// Closing literal of an inline tag.
pub const TAG_CLOSE: &str = "】";
/// A line consisting of exactly this text is a separator.
pub const SEPARATOR: &str = "---";
/// Prefix of a markdown heading line.
pub const HEADING_MARKER: char = '#';

/// Full-width colon separating a speaker from their line.
pub const DIALOGUE_COLON: char = '：';

/// Full scene header grammar: `<episode>-<scene> <time> <内|外> <location>`.
pub static SCENE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)-(\d+)\s+(\S+)\s+(内|外)\s+(.+)$").expect("Invalid scene header regex")
});

/// Just the episode-scene number pair at the start of a line.
pub static SCENE_NUMBER_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)-(\d+)").expect("Invalid scene number regex"));

/// `# 第1集`, `## 第十二集`.
pub static EPISODE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#+\s*第\s*([0-9一二三四五六七八九十百千零〇两]+)\s*集")
        .expect("Invalid episode header regex")
});

/// `人 张三 李四` – the names follow the marker, whitespace separated.
pub static CHARACTER_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^人\s+(.+)$").expect("Invalid character list regex"));

/// `△ 李四站起来` – capture is the action text.
pub static ACTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^△\s*(.*)$").expect("Invalid action regex"));

/// `张三（笑）：你好` – captures are name, emotion, text.
pub static EMOTION_DIALOGUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?)（(.+?)）：(.+)$").expect("Invalid emotion dialogue regex")
});

/// `张三：你好` – captures are name, text. Deliberately permissive, so it is
/// always tried after every more specific dialogue form.
pub static SIMPLE_DIALOGUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)：(.+)$").expect("Invalid dialogue regex"));

/// `【标签：X】` anywhere in a line; capture is the label.
pub static INLINE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"【标签：([^】]+)】").expect("Invalid tag regex"));

/// True for either flashback marker.
pub fn is_flashback_marker(trimmed: &str) -> bool {
    trimmed == FLASHBACK_START || trimmed == FLASHBACK_END
}

/// Labels of every inline tag in `line`, in order of appearance.
pub fn extract_tags(line: &str) -> impl Iterator<Item = &str> {
    INLINE_TAG
        .captures_iter(line)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|label| !label.is_empty())
}
