use serde::Serialize;

use super::patterns::{
    ACTION, CHARACTER_LIST, EMOTION_DIALOGUE, EPISODE_HEADER, FLASHBACK_END, FLASHBACK_START,
    SCENE_HEADER, SIMPLE_DIALOGUE,
};

/// The screenplay element a single line represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ElementKind {
    SceneHeader,
    CharacterList,
    DialogueWithEmotion,
    SimpleDialogue,
    Action,
    FlashbackStart,
    FlashbackEnd,
    EpisodeHeader,
    Empty,
    Other,
}

impl ElementKind {
    /// Whether the line is dialogue of either form.
    pub fn is_dialogue(self) -> bool {
        matches!(self, Self::DialogueWithEmotion | Self::SimpleDialogue)
    }
}

/// One entry of the priority table: the first rule whose predicate accepts
/// the trimmed line decides its kind.
pub struct Rule {
    pub kind: ElementKind,
    pub matches: fn(&str) -> bool,
}

/// Rules in priority order. Emotion dialogue must precede simple dialogue,
/// otherwise `张三（笑）：你好` would be read with `张三（笑）` as the speaker.
pub const RULES: &[Rule] = &[
    Rule {
        kind: ElementKind::Empty,
        matches: str::is_empty,
    },
    Rule {
        kind: ElementKind::FlashbackStart,
        matches: |line| line == FLASHBACK_START,
    },
    Rule {
        kind: ElementKind::FlashbackEnd,
        matches: |line| line == FLASHBACK_END,
    },
    Rule {
        kind: ElementKind::EpisodeHeader,
        matches: |line| EPISODE_HEADER.is_match(line),
    },
    Rule {
        kind: ElementKind::SceneHeader,
        matches: |line| SCENE_HEADER.is_match(line),
    },
    Rule {
        kind: ElementKind::CharacterList,
        matches: |line| CHARACTER_LIST.is_match(line),
    },
    Rule {
        kind: ElementKind::Action,
        matches: |line| ACTION.is_match(line),
    },
    Rule {
        kind: ElementKind::DialogueWithEmotion,
        matches: |line| EMOTION_DIALOGUE.is_match(line),
    },
    Rule {
        kind: ElementKind::SimpleDialogue,
        matches: |line| SIMPLE_DIALOGUE.is_match(line),
    },
];

/// Classifies screenplay lines using the ordered [`RULES`] table.
pub struct LineClassifier;

impl LineClassifier {
    /// Classifies a line. Total: anything no rule accepts is [`ElementKind::Other`].
    pub fn classify(&self, line: &str) -> ElementKind {
        let trimmed = line.trim();
        RULES
            .iter()
            .find(|rule| (rule.matches)(trimmed))
            .map_or(ElementKind::Other, |rule| rule.kind)
    }
}

/// Shorthand for `LineClassifier.classify(line)`.
pub fn classify(line: &str) -> ElementKind {
    LineClassifier.classify(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", ElementKind::Empty)]
    #[case("   \t", ElementKind::Empty)]
    #[case("【闪回】", ElementKind::FlashbackStart)]
    #[case("  【闪回结束】  ", ElementKind::FlashbackEnd)]
    #[case("# 第1集", ElementKind::EpisodeHeader)]
    #[case("## 第十二集 重逢", ElementKind::EpisodeHeader)]
    #[case("1-1 日 内 客厅", ElementKind::SceneHeader)]
    #[case("12-30 夜 外 城市 天台", ElementKind::SceneHeader)]
    #[case("人 张三 李四", ElementKind::CharacterList)]
    #[case("△ 李四站起来", ElementKind::Action)]
    #[case("张三（笑）：你好", ElementKind::DialogueWithEmotion)]
    #[case("张三：你好", ElementKind::SimpleDialogue)]
    #[case("他走进房间。", ElementKind::Other)]
    fn test_classify(#[case] line: &str, #[case] expected: ElementKind) {
        assert_eq!(classify(line), expected);
    }

    #[test]
    fn test_malformed_header_is_not_a_scene_header() {
        assert_eq!(classify("3-2"), ElementKind::Other);
        assert_eq!(classify("3-2 日 里 客厅"), ElementKind::Other);
    }

    #[test]
    fn test_action_with_colon_stays_action() {
        assert_eq!(classify("△ 门上写着：闲人免进"), ElementKind::Action);
    }

    #[test]
    fn test_any_full_width_colon_reads_as_dialogue() {
        // Permissive on purpose: the rule order is the only disambiguation.
        assert_eq!(classify("时间：三年后"), ElementKind::SimpleDialogue);
    }

    #[test]
    fn test_every_rule_is_reachable() {
        let samples = [
            "",
            "【闪回】",
            "【闪回结束】",
            "# 第1集",
            "1-1 日 内 客厅",
            "人 张三",
            "△ 动作",
            "张三（笑）：你好",
            "张三：你好",
        ];
        for (rule, sample) in RULES.iter().zip(samples) {
            assert_eq!(classify(sample), rule.kind, "sample {sample:?}");
        }
    }
}
