//! Scene index of a whole script.
//!
//! The document is scanned once, top to bottom, as a fold over its lines.
//! Malformed headers are read as prose here; `parsing::validate` reports them.

mod fingerprint;
mod scan;
mod types;

use std::sync::Arc;

use chrono::Utc;

pub use fingerprint::fingerprint;
pub use types::{DocumentIndex, SceneRecord, SpeakerLines};

use scan::SceneScan;

/// Builds [`DocumentIndex`]es, reusing the previous one when text is unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentIndexer;

impl DocumentIndexer {
    /// Indexes `text`. When `previous` was built from identical text it is
    /// returned as is (same `Arc`), skipping the scan.
    pub fn index(&self, text: &str, previous: Option<&Arc<DocumentIndex>>) -> Arc<DocumentIndex> {
        let fingerprint = fingerprint(text);

        if let Some(previous) = previous
            && previous.fingerprint == fingerprint
        {
            log::trace!("index unchanged ({fingerprint}), reusing");
            return Arc::clone(previous);
        }

        Arc::new(build(text, fingerprint))
    }
}

/// Indexes `text` without memoization.
pub fn index_document(text: &str) -> DocumentIndex {
    build(text, fingerprint(text))
}

fn build(text: &str, fingerprint: String) -> DocumentIndex {
    let (scenes, episode_count) = text
        .lines()
        .enumerate()
        .fold(SceneScan::default(), SceneScan::push)
        .finish();

    log::debug!(
        "indexed {} scenes across {} episodes",
        scenes.len(),
        episode_count
    );

    DocumentIndex {
        scenes,
        episode_count,
        fingerprint,
        built_at: Utc::now(),
    }
}
