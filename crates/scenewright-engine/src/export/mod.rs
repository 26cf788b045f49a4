//! Rendering a script into other formats.
//!
//! Every renderer works from the same sequence of [`Element`]s, so a line is
//! interpreted once and the formats only differ in how they print it.

mod fountain;
mod html;
mod plain;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::index::{DocumentIndex, SceneRecord};
use crate::parsing::patterns::{
    ACTION, CHARACTER_LIST, DIALOGUE_COLON, EMOTION_DIALOGUE, HEADING_MARKER, INLINE_TAG, SEPARATOR,
    SIMPLE_DIALOGUE, TAG_OPEN, extract_tags,
};
use crate::parsing::{ElementKind, SceneHeader, parse_header, parse_lines};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[serde(rename = "txt")]
    PlainText,
    Html,
    Fountain,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [Self::PlainText, Self::Html, Self::Fountain];

    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::PlainText => "txt",
            Self::Html => "html",
            Self::Fountain => "fountain",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown export format \"{0}\", expected txt, html or fountain")]
pub struct UnknownFormat(pub String);

impl FromStr for ExportFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "txt" | "text" | "plain" => Ok(Self::PlainText),
            "html" | "htm" => Ok(Self::Html),
            "fountain" => Ok(Self::Fountain),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportOptions {
    pub title: Option<String>,
    pub author: Option<String>,
    pub include_scene_numbers: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            title: None,
            author: None,
            include_scene_numbers: true,
        }
    }
}

/// A line of the script as the renderers see it. Text fields still carry
/// any inline tags; each renderer decides what to do with them.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Element<'a> {
    Episode(&'a str),
    Scene {
        header: SceneHeader,
        record: Option<&'a SceneRecord>,
    },
    Characters {
        names: Vec<&'a str>,
        tags: Vec<&'a str>,
    },
    Action(&'a str),
    Dialogue {
        speaker: &'a str,
        emotion: Option<&'a str>,
        text: &'a str,
    },
    FlashbackStart,
    FlashbackEnd,
    /// A line made of tags only.
    Tags(Vec<&'a str>),
    Separator,
    Prose(&'a str),
    Blank,
}

pub(crate) fn elements<'a>(text: &'a str, index: &'a DocumentIndex) -> Vec<Element<'a>> {
    parse_lines(text)
        .map(|line| {
            let trimmed = line.raw.trim();
            match line.kind {
                ElementKind::Empty => Element::Blank,
                ElementKind::FlashbackStart => Element::FlashbackStart,
                ElementKind::FlashbackEnd => Element::FlashbackEnd,
                ElementKind::EpisodeHeader => episode(trimmed),
                ElementKind::SceneHeader => match parse_header(trimmed) {
                    Some(header) => Element::Scene {
                        header,
                        record: index.scenes.iter().find(|s| s.line_index == line.index),
                    },
                    None => Element::Prose(trimmed),
                },
                ElementKind::CharacterList => characters(trimmed),
                ElementKind::Action => ACTION
                    .captures(trimmed)
                    .and_then(|caps| caps.get(1))
                    .map_or(Element::Prose(trimmed), |m| Element::Action(m.as_str())),
                ElementKind::DialogueWithEmotion | ElementKind::SimpleDialogue => {
                    dialogue(line.kind, trimmed)
                }
                ElementKind::Other if trimmed == SEPARATOR => Element::Separator,
                ElementKind::Other => Element::Prose(trimmed),
            }
        })
        .collect()
}

fn episode(trimmed: &str) -> Element<'_> {
    Element::Episode(trimmed.trim_start_matches(HEADING_MARKER).trim())
}

fn characters(trimmed: &str) -> Element<'_> {
    let names = CHARACTER_LIST
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map(|m| {
            m.as_str()
                .split_whitespace()
                .filter(|name| !name.starts_with(TAG_OPEN))
                .collect()
        })
        .unwrap_or_default();
    Element::Characters {
        names,
        tags: extract_tags(trimmed).collect(),
    }
}

fn dialogue(kind: ElementKind, trimmed: &str) -> Element<'_> {
    if trimmed.starts_with(TAG_OPEN) {
        let tags: Vec<&str> = extract_tags(trimmed).collect();
        return if tags.is_empty() {
            Element::Prose(trimmed)
        } else {
            Element::Tags(tags)
        };
    }

    // The only colon may sit inside a tag.
    if !INLINE_TAG.replace_all(trimmed, "").contains(DIALOGUE_COLON) {
        return Element::Prose(trimmed);
    }

    let parsed = if kind == ElementKind::DialogueWithEmotion {
        EMOTION_DIALOGUE.captures(trimmed).and_then(|caps| {
            Some(Element::Dialogue {
                speaker: caps.get(1)?.as_str().trim(),
                emotion: Some(caps.get(2)?.as_str().trim()),
                text: caps.get(3)?.as_str().trim(),
            })
        })
    } else {
        SIMPLE_DIALOGUE.captures(trimmed).and_then(|caps| {
            Some(Element::Dialogue {
                speaker: caps.get(1)?.as_str().trim(),
                emotion: None,
                text: caps.get(2)?.as_str().trim(),
            })
        })
    };

    parsed.unwrap_or(Element::Prose(trimmed))
}

/// Renders `text` in `format`. `index` must have been built from `text`.
pub fn export(
    text: &str,
    index: &DocumentIndex,
    format: ExportFormat,
    options: &ExportOptions,
) -> String {
    let elements = elements(text, index);
    log::debug!("exporting {} lines as {format}", elements.len());
    match format {
        ExportFormat::PlainText => plain::render(&elements, options),
        ExportFormat::Html => html::render(&elements, options),
        ExportFormat::Fountain => fountain::render(&elements, options),
    }
}

/// `日 内 客厅`, optionally prefixed by the scene number.
pub(crate) fn heading_text(header: &SceneHeader, include_number: bool) -> String {
    let body = format!(
        "{} {} {}",
        header.time, header.location_kind, header.location
    );
    if include_number {
        format!("{} {body}", header.number())
    } else {
        body
    }
}

/// A run of text or an inline tag label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    Text(&'a str),
    Tag(&'a str),
}

/// Splits `text` around its inline tags, dropping empty text runs.
pub(crate) fn segments(text: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut last = 0;
    for caps in INLINE_TAG.captures_iter(text) {
        let (Some(whole), Some(label)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            out.push(Segment::Text(&text[last..whole.start()]));
        }
        out.push(Segment::Tag(label.as_str()));
        last = whole.end();
    }
    if last < text.len() {
        out.push(Segment::Text(&text[last..]));
    }
    out
}

/// `text` with its inline tags removed.
pub(crate) fn strip_tags(text: &str) -> String {
    segments(text)
        .into_iter()
        .filter_map(|segment| match segment {
            Segment::Text(text) => Some(text),
            Segment::Tag(_) => None,
        })
        .collect::<String>()
        .trim()
        .to_string()
}
