pub mod classify;
pub mod header;
pub mod patterns;
pub mod validate;

#[cfg(test)]
mod tests;

pub use classify::{ElementKind, LineClassifier, classify};
pub use header::{LocationKind, SceneHeader, SceneNumber, parse_header, with_scene_number};
pub use validate::{
    Diagnostic, Severity, ValidationError, ValidationResult, validate_document, validate_header,
};

/// A line of a script together with its classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine<'a> {
    /// Zero-based line index in the document.
    pub index: usize,
    pub kind: ElementKind,
    pub raw: &'a str,
}

impl ParsedLine<'_> {
    pub fn trimmed(&self) -> &str {
        self.raw.trim()
    }
}

/// Classifies every line of `text`.
pub fn parse_lines(text: &str) -> impl Iterator<Item = ParsedLine<'_>> {
    let classifier = LineClassifier;
    text.lines().enumerate().map(move |(index, raw)| ParsedLine {
        index,
        kind: classifier.classify(raw),
        raw,
    })
}
