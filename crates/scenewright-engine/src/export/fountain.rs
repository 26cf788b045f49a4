use crate::parsing::patterns::{FLASHBACK_END, FLASHBACK_START, TAG_CLOSE, TAG_OPEN};

use super::{Element, ExportOptions, Segment, segments};

/// Fountain markup. Scene headings and character cues are forced (`.` and
/// `@`) since CJK text has no uppercase to be recognised by.
pub(super) fn render(elements: &[Element<'_>], options: &ExportOptions) -> String {
    let mut blocks: Vec<String> = Vec::new();

    let mut title_page = Vec::new();
    if let Some(title) = &options.title {
        title_page.push(format!("Title: {title}"));
    }
    if let Some(author) = &options.author {
        title_page.push(format!("Author: {author}"));
    }
    if !title_page.is_empty() {
        blocks.push(title_page.join("\n"));
    }

    for element in elements {
        let block = match element {
            Element::Episode(text) => format!("# {}", inline(text)),
            Element::Scene { header, .. } => {
                let mut heading = format!(
                    ".{} {} - {}",
                    header.location_kind, header.location, header.time
                );
                if options.include_scene_numbers {
                    heading.push_str(&format!(" #{}#", header.number()));
                }
                heading
            }
            Element::Characters { names, tags } => {
                let mut note = format!("[[人物：{}]]", names.join(" "));
                for tag in tags {
                    note.push(' ');
                    note.push_str(&note_for(tag));
                }
                note
            }
            Element::Action(text) => format!("!{}", inline(text)),
            Element::Dialogue {
                speaker,
                emotion,
                text,
            } => match emotion {
                Some(emotion) => format!("@{speaker}\n({emotion})\n{}", inline(text)),
                None => format!("@{speaker}\n{}", inline(text)),
            },
            Element::FlashbackStart => centered(FLASHBACK_START),
            Element::FlashbackEnd => centered(FLASHBACK_END),
            Element::Tags(tags) => tags.iter().map(|t| note_for(t)).collect::<Vec<_>>().join(" "),
            Element::Separator => "===".to_string(),
            Element::Prose(text) => inline(text),
            Element::Blank => continue,
        };
        blocks.push(block);
    }

    if blocks.is_empty() {
        return String::new();
    }
    let mut out = blocks.join("\n\n");
    out.push('\n');
    out
}

fn note_for(label: &str) -> String {
    format!("[[{}{label}]]", TAG_OPEN.trim_start_matches('【'))
}

/// `【闪回】` becomes `> 闪回 <`.
fn centered(marker: &str) -> String {
    let inner = marker.trim_start_matches('【').trim_end_matches(TAG_CLOSE);
    format!("> {inner} <")
}

/// Inline tags become Fountain notes in place.
fn inline(text: &str) -> String {
    segments(text)
        .into_iter()
        .map(|segment| match segment {
            Segment::Text(text) => text.to_string(),
            Segment::Tag(label) => note_for(label),
        })
        .collect()
}
