use crate::parsing::patterns::{FLASHBACK_END, FLASHBACK_START, SEPARATOR};

use super::{Element, ExportOptions, heading_text, strip_tags};

/// Plain text for reading or printing: tags removed, character lists spelled
/// out, runs of blank lines collapsed.
pub(super) fn render(elements: &[Element<'_>], options: &ExportOptions) -> String {
    let mut lines: Vec<String> = Vec::new();

    if let Some(title) = &options.title {
        lines.push(title.clone());
    }
    if let Some(author) = &options.author {
        lines.push(author.clone());
    }
    if !lines.is_empty() {
        lines.push(String::new());
    }

    for element in elements {
        let line = match element {
            Element::Episode(text) => strip_tags(text),
            Element::Scene { header, .. } => heading_text(header, options.include_scene_numbers),
            Element::Characters { names, .. } if names.is_empty() => continue,
            Element::Characters { names, .. } => format!("人物：{}", names.join("、")),
            Element::Action(text) => strip_tags(text),
            Element::Dialogue {
                speaker,
                emotion: Some(emotion),
                text,
            } => format!("{speaker}（{emotion}）：{}", strip_tags(text)),
            Element::Dialogue { speaker, text, .. } => format!("{speaker}：{}", strip_tags(text)),
            Element::FlashbackStart => FLASHBACK_START.to_string(),
            Element::FlashbackEnd => FLASHBACK_END.to_string(),
            Element::Tags(_) => continue,
            Element::Separator => SEPARATOR.to_string(),
            Element::Prose(text) => {
                let text = strip_tags(text);
                if text.is_empty() {
                    continue;
                }
                text
            }
            Element::Blank => String::new(),
        };

        if line.is_empty() && lines.last().is_none_or(String::is_empty) {
            continue;
        }
        lines.push(line);
    }

    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    if lines.is_empty() {
        return String::new();
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use crate::export::{ExportFormat, ExportOptions, export};
    use crate::index::index_document;
    use pretty_assertions::assert_eq;

    const SCRIPT: &str = "# 第1集

1-1 日 内 客厅
人 张三 李四


张三（笑）：你好【标签：开场】
【标签：伏笔】
△ 李四站起来
";

    #[test]
    fn test_plain_text() {
        let index = index_document(SCRIPT);
        let out = export(SCRIPT, &index, ExportFormat::PlainText, &ExportOptions::default());
        assert_eq!(
            out,
            "第1集\n\n1-1 日 内 客厅\n人物：张三、李四\n\n张三（笑）：你好\n李四站起来\n"
        );
    }

    #[test]
    fn test_plain_text_title_and_no_numbers() {
        let index = index_document(SCRIPT);
        let options = ExportOptions {
            title: Some("风起".to_string()),
            author: Some("佚名".to_string()),
            include_scene_numbers: false,
        };
        let out = export(SCRIPT, &index, ExportFormat::PlainText, &options);
        assert!(out.starts_with("风起\n佚名\n\n第1集\n\n日 内 客厅\n"));
    }

    #[test]
    fn test_empty_script() {
        let index = index_document("");
        let out = export("", &index, ExportFormat::PlainText, &ExportOptions::default());
        assert_eq!(out, "");
    }
}
