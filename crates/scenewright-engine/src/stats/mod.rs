//! Script statistics folded from a [`DocumentIndex`].

mod cache;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

pub use cache::LruCache;

use crate::index::DocumentIndex;
use crate::parsing::SceneNumber;

/// Number of summaries [`StatisticsAggregator`] keeps by default.
pub const DEFAULT_CACHE_CAPACITY: usize = 8;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Totals {
    pub scenes: usize,
    pub episodes: u32,
    pub words: usize,
    pub duration_minutes: f64,
    pub flashback_scenes: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeSummary {
    pub episode: u32,
    pub scenes: usize,
    pub words: usize,
    pub duration_minutes: f64,
    pub flashback_scenes: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacterSummary {
    pub name: String,
    /// Scenes whose character list names them.
    pub scenes: usize,
    /// Episodes those scenes belong to, ascending.
    pub episodes: Vec<u32>,
    pub dialogue_lines: usize,
    pub dialogue_words: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagSummary {
    pub tag: String,
    pub occurrences: usize,
    /// Scenes carrying the tag at least once, in line order.
    pub scenes: Vec<SceneNumber>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScriptStatistics {
    pub fingerprint: String,
    pub totals: Totals,
    /// Ascending by episode.
    pub episodes: Vec<EpisodeSummary>,
    /// Most scene appearances first, then by name.
    pub characters: Vec<CharacterSummary>,
    /// Most occurrences first, then by tag.
    pub tags: Vec<TagSummary>,
}

#[derive(Default)]
struct CharacterTally {
    scenes: usize,
    episodes: Vec<u32>,
    dialogue_lines: usize,
    dialogue_words: usize,
}

/// Computes statistics without caching.
pub fn summarize(index: &DocumentIndex) -> ScriptStatistics {
    let mut totals = Totals {
        episodes: index.episode_count,
        ..Totals::default()
    };
    let mut episodes: BTreeMap<u32, EpisodeSummary> = BTreeMap::new();
    let mut characters: BTreeMap<&str, CharacterTally> = BTreeMap::new();
    let mut tags: BTreeMap<&str, TagSummary> = BTreeMap::new();

    for scene in &index.scenes {
        totals.scenes += 1;
        totals.words += scene.word_count;
        totals.duration_minutes += scene.duration_minutes;
        totals.flashback_scenes += usize::from(scene.is_flashback);

        let episode = episodes
            .entry(scene.episode)
            .or_insert_with(|| EpisodeSummary {
                episode: scene.episode,
                scenes: 0,
                words: 0,
                duration_minutes: 0.0,
                flashback_scenes: 0,
            });
        episode.scenes += 1;
        episode.words += scene.word_count;
        episode.duration_minutes += scene.duration_minutes;
        episode.flashback_scenes += usize::from(scene.is_flashback);

        for name in &scene.characters {
            let tally = characters.entry(name).or_default();
            tally.scenes += 1;
            if !tally.episodes.contains(&scene.episode) {
                tally.episodes.push(scene.episode);
            }
        }
        for speaker in &scene.speakers {
            let tally = characters.entry(&speaker.name).or_default();
            tally.dialogue_lines += speaker.lines;
            tally.dialogue_words += speaker.words;
        }

        for tag in &scene.tags {
            let summary = tags.entry(tag).or_insert_with(|| TagSummary {
                tag: tag.clone(),
                occurrences: 0,
                scenes: Vec::new(),
            });
            summary.occurrences += 1;
            if summary.scenes.last() != Some(&scene.number()) {
                summary.scenes.push(scene.number());
            }
        }
    }

    let mut characters: Vec<CharacterSummary> = characters
        .into_iter()
        .map(|(name, mut tally)| {
            tally.episodes.sort_unstable();
            CharacterSummary {
                name: name.to_string(),
                scenes: tally.scenes,
                episodes: tally.episodes,
                dialogue_lines: tally.dialogue_lines,
                dialogue_words: tally.dialogue_words,
            }
        })
        .collect();
    // Stable sort keeps the BTreeMap's name order for ties.
    characters.sort_by(|a, b| b.scenes.cmp(&a.scenes));

    let mut tags: Vec<TagSummary> = tags.into_values().collect();
    tags.sort_by(|a, b| b.occurrences.cmp(&a.occurrences));

    ScriptStatistics {
        fingerprint: index.fingerprint.clone(),
        totals,
        episodes: episodes.into_values().collect(),
        characters,
        tags,
    }
}

/// Memoizes [`summarize`] by document fingerprint.
#[derive(Debug)]
pub struct StatisticsAggregator {
    cache: LruCache<String, Arc<ScriptStatistics>>,
}

impl Default for StatisticsAggregator {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

impl StatisticsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cache: LruCache::new(capacity),
        }
    }

    pub fn summarize(&mut self, index: &DocumentIndex) -> Arc<ScriptStatistics> {
        if let Some(stats) = self.cache.get(&index.fingerprint) {
            log::trace!("statistics cache hit for {}", index.fingerprint);
            return Arc::clone(stats);
        }

        let stats = Arc::new(summarize(index));
        self.cache.insert(index.fingerprint.clone(), Arc::clone(&stats));
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::index_document;
    use pretty_assertions::assert_eq;

    const SCRIPT: &str = "1-1 日 内 客厅
人 张三 李四
张三：你好
【标签：开场】
李四（笑）：好久不见
【闪回】
1-2 夜 外 老街
人 张三
张三：快走
【标签：伏笔】
【闪回结束】
2-1 日 内 办公室
人 李四 王五
王五：坐
△ 李四坐下【标签：伏笔】【标签：伏笔】
";

    #[test]
    fn test_totals() {
        let stats = summarize(&index_document(SCRIPT));
        assert_eq!(
            stats.totals,
            Totals {
                scenes: 3,
                episodes: 2,
                words: 2 + 4 + 2 + 1,
                duration_minutes: 1.5,
                flashback_scenes: 1,
            }
        );
    }

    #[test]
    fn test_episode_summaries() {
        let stats = summarize(&index_document(SCRIPT));
        let rows: Vec<(u32, usize, usize, usize)> = stats
            .episodes
            .iter()
            .map(|e| (e.episode, e.scenes, e.words, e.flashback_scenes))
            .collect();
        assert_eq!(rows, vec![(1, 2, 8, 1), (2, 1, 1, 0)]);
    }

    #[test]
    fn test_character_summaries() {
        let stats = summarize(&index_document(SCRIPT));
        let names: Vec<&str> = stats.characters.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["张三", "李四", "王五"]);

        let zhang = &stats.characters[0];
        assert_eq!(zhang.scenes, 2);
        assert_eq!(zhang.episodes, vec![1]);
        assert_eq!(zhang.dialogue_lines, 2);
        assert_eq!(zhang.dialogue_words, 4);

        let li = &stats.characters[1];
        assert_eq!(li.episodes, vec![1, 2]);
        assert_eq!(li.dialogue_words, 4);
    }

    #[test]
    fn test_tag_summaries() {
        let stats = summarize(&index_document(SCRIPT));
        assert_eq!(
            stats.tags,
            vec![
                TagSummary {
                    tag: "伏笔".to_string(),
                    occurrences: 3,
                    scenes: vec![SceneNumber::new(1, 2), SceneNumber::new(2, 1)],
                },
                TagSummary {
                    tag: "开场".to_string(),
                    occurrences: 1,
                    scenes: vec![SceneNumber::new(1, 1)],
                },
            ]
        );
    }

    #[test]
    fn test_empty_index() {
        let stats = summarize(&index_document(""));
        assert_eq!(stats.totals, Totals::default());
        assert!(stats.episodes.is_empty());
        assert!(stats.characters.is_empty());
    }

    #[test]
    fn test_aggregator_memoizes_by_fingerprint() {
        let mut aggregator = StatisticsAggregator::new();
        let index = index_document(SCRIPT);

        let first = aggregator.summarize(&index);
        let second = aggregator.summarize(&index_document(SCRIPT));
        assert!(Arc::ptr_eq(&first, &second));

        let other = aggregator.summarize(&index_document("1-1 日 内 客厅"));
        assert!(!Arc::ptr_eq(&first, &other));
    }
}
