use std::fmt::Write;

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::parsing::patterns::{FLASHBACK_END, FLASHBACK_START};

use super::{Element, ExportOptions, Segment, heading_text, segments};

const STYLE: &str = "body{font-family:serif;max-width:40em;margin:2em auto;line-height:1.6}\
.scene-heading{font-weight:bold;margin-top:2em}\
.flashback{font-style:italic}\
.characters{color:#555}\
.dialogue{margin:0.5em 4em}\
.dialogue .character{font-weight:bold;margin:0}\
.dialogue .parenthetical,.dialogue .line{margin:0}\
.transition{text-align:center}\
.tag{font-size:0.8em;color:#a60;border:1px solid #a60;padding:0 0.2em;margin:0 0.2em}";

/// A self-contained HTML page with one element per script line.
pub(super) fn render(elements: &[Element<'_>], options: &ExportOptions) -> String {
    let title = options.title.as_deref().unwrap_or("Untitled");

    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html lang=\"zh\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(out, "<title>{}</title>", encode_text(title));
    let _ = writeln!(out, "<style>{STYLE}</style>");
    out.push_str("</head>\n<body>\n");

    if let Some(title) = &options.title {
        let _ = writeln!(out, "<h1 class=\"title\">{}</h1>", encode_text(title));
    }
    if let Some(author) = &options.author {
        let _ = writeln!(out, "<p class=\"author\">{}</p>", encode_text(author));
    }

    for element in elements {
        render_element(&mut out, element, options);
    }

    out.push_str("</body>\n</html>\n");
    out
}

fn render_element(out: &mut String, element: &Element<'_>, options: &ExportOptions) {
    // Writing to a String cannot fail.
    let _ = match element {
        Element::Episode(text) => writeln!(out, "<h2 class=\"episode\">{}</h2>", inline(text)),
        Element::Scene { header, record } => {
            let class = if record.is_some_and(|r| r.is_flashback) {
                "scene-heading flashback"
            } else {
                "scene-heading"
            };
            let duration = record
                .map(|r| format!(" data-duration=\"{}\"", r.duration_minutes))
                .unwrap_or_default();
            writeln!(
                out,
                "<h3 class=\"{class}\" id=\"scene-{}\"{duration}>{}</h3>",
                encode_double_quoted_attribute(&header.number().to_string()),
                encode_text(&heading_text(header, options.include_scene_numbers))
            )
        }
        Element::Characters { names, tags } => {
            let names: Vec<String> = names.iter().map(|n| encode_text(n).into_owned()).collect();
            let tags: String = tags.iter().map(|t| tag(t)).collect();
            writeln!(out, "<p class=\"characters\">{}{tags}</p>", names.join("、"))
        }
        Element::Action(text) => writeln!(out, "<p class=\"action\">{}</p>", inline(text)),
        Element::Dialogue {
            speaker,
            emotion,
            text,
        } => {
            out.push_str("<div class=\"dialogue\">\n");
            let _ = writeln!(out, "<p class=\"character\">{}</p>", encode_text(speaker));
            if let Some(emotion) = emotion {
                let _ = writeln!(
                    out,
                    "<p class=\"parenthetical\">（{}）</p>",
                    encode_text(emotion)
                );
            }
            let _ = writeln!(out, "<p class=\"line\">{}</p>", inline(text));
            writeln!(out, "</div>")
        }
        Element::FlashbackStart => {
            writeln!(out, "<p class=\"transition\">{FLASHBACK_START}</p>")
        }
        Element::FlashbackEnd => writeln!(out, "<p class=\"transition\">{FLASHBACK_END}</p>"),
        Element::Tags(tags) => {
            let tags: String = tags.iter().map(|t| tag(t)).collect();
            writeln!(out, "<p class=\"tags\">{tags}</p>")
        }
        Element::Separator => writeln!(out, "<hr>"),
        Element::Prose(text) => writeln!(out, "<p>{}</p>", inline(text)),
        Element::Blank => Ok(()),
    };
}

fn tag(label: &str) -> String {
    format!("<span class=\"tag\">{}</span>", encode_text(label))
}

/// Escaped text with inline tags turned into spans.
fn inline(text: &str) -> String {
    segments(text)
        .into_iter()
        .map(|segment| match segment {
            Segment::Text(text) => encode_text(text).into_owned(),
            Segment::Tag(label) => tag(label),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{ExportFormat, export};
    use crate::index::index_document;

    #[test]
    fn test_inline_escapes_and_wraps_tags() {
        assert_eq!(
            inline("a<b>&【标签：伏笔】"),
            "a&lt;b&gt;&amp;<span class=\"tag\">伏笔</span>"
        );
    }

    #[test]
    fn test_html_document() {
        let text = "【闪回】\n1-1 夜 外 老街\n人 张三\n张三（低声）：快走\n【闪回结束】\n---\n";
        let index = index_document(text);
        let options = ExportOptions {
            title: Some("风起 & 云涌".to_string()),
            ..ExportOptions::default()
        };
        let out = export(text, &index, ExportFormat::Html, &options);

        assert!(out.starts_with("<!DOCTYPE html>"));
        assert!(out.contains("<title>风起 &amp; 云涌</title>"));
        assert!(out.contains(
            "<h3 class=\"scene-heading flashback\" id=\"scene-1-1\" data-duration=\"0.5\">1-1 夜 外 老街</h3>"
        ));
        assert!(out.contains("<p class=\"characters\">张三</p>"));
        assert!(out.contains(
            "<div class=\"dialogue\">\n<p class=\"character\">张三</p>\n<p class=\"parenthetical\">（低声）</p>\n<p class=\"line\">快走</p>\n</div>"
        ));
        assert!(out.contains("<p class=\"transition\">【闪回】</p>"));
        assert!(out.contains("<hr>"));
        assert!(out.ends_with("</body>\n</html>\n"));
    }

    #[test]
    fn test_scene_numbers_can_be_hidden() {
        let text = "1-1 日 内 客厅";
        let index = index_document(text);
        let options = ExportOptions {
            include_scene_numbers: false,
            ..ExportOptions::default()
        };
        let out = export(text, &index, ExportFormat::Html, &options);
        assert!(out.contains(">日 内 客厅</h3>"));
    }
}
