//! Strict header diagnostics.
//!
//! The indexer is lenient and silently treats malformed headers as prose;
//! this module is where problems get reported, each with a char offset into
//! the trimmed line so the editor can underline it.

use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::header::{LocationKind, SceneNumber, parse_header};
use super::patterns::{
    EXTERIOR_TOKEN, FLASHBACK_END, FLASHBACK_START, INTERIOR_TOKEN, SCENE_NUMBER_PREFIX,
};

static FIELD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+").expect("Invalid field regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// Offset in chars into the trimmed line.
    pub offset: usize,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Validates a scene header in stages, reporting every defect found once the
/// number pair is present rather than stopping at the first.
pub fn validate_header(line: &str) -> ValidationResult {
    let trimmed = line.trim();
    let char_offset = |byte: usize| trimmed[..byte].chars().count();
    let line_end = char_offset(trimmed.len());
    let error = |offset: usize, message: String| ValidationError { offset, message };

    if trimmed.is_empty() {
        return ValidationResult::from_errors(vec![error(0, "scene header is empty".into())]);
    }

    let Some(number) = SCENE_NUMBER_PREFIX.captures(trimmed) else {
        return ValidationResult::from_errors(vec![error(
            0,
            "missing episode-scene number, expected e.g. 1-1".into(),
        )]);
    };

    let mut errors = Vec::new();

    // The indexer stores both numbers as u32.
    for (group, what) in [(1, "episode"), (2, "scene")] {
        if let Some(m) = number.get(group)
            && m.as_str().parse::<u32>().is_err()
        {
            errors.push(error(
                char_offset(m.start()),
                format!("{what} number {} is too large", m.as_str()),
            ));
        }
    }

    let prefix_end = number.get(0).map_or(0, |m| m.end());
    let rest = &trimmed[prefix_end..];
    if rest.chars().next().is_some_and(|c| !c.is_whitespace()) {
        errors.push(error(
            char_offset(prefix_end),
            "scene number must be followed by a space".into(),
        ));
    }

    let mut fields: Vec<(usize, &str)> = FIELD
        .find_iter(rest)
        .map(|m| (char_offset(prefix_end + m.start()), m.as_str()))
        .collect();

    // `1-1 内 客厅`: the time was left out, the kind token is not a time.
    let starts_with_kind = fields
        .first()
        .is_some_and(|(_, field)| LocationKind::from_token(field).is_some());
    if fields.is_empty() {
        errors.push(error(line_end, "missing time of day".into()));
    } else if starts_with_kind {
        errors.push(error(fields[0].0, "missing time of day".into()));
    } else {
        fields.remove(0);
    }

    let mut fields = fields.into_iter();
    match fields.next() {
        None => errors.push(error(
            line_end,
            format!("missing interior/exterior marker ({INTERIOR_TOKEN} or {EXTERIOR_TOKEN})"),
        )),
        Some((offset, token)) if LocationKind::from_token(token).is_none() => {
            errors.push(error(
                offset,
                format!(
                    "invalid interior/exterior marker \"{token}\", expected {INTERIOR_TOKEN} or {EXTERIOR_TOKEN}"
                ),
            ));
        }
        Some(_) => {}
    }

    if fields.next().is_none() {
        errors.push(error(line_end, "missing location".into()));
    }

    ValidationResult::from_errors(errors)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Error,
    Warning,
}

/// A problem found on one line of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Zero-based line index.
    pub line: usize,
    /// Offset in chars into the trimmed line.
    pub offset: usize,
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    fn error(line: usize, offset: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            offset,
            severity: Severity::Error,
            message: message.into(),
        }
    }

    fn warning(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            offset: 0,
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}

/// Checks every scene-number-prefixed line, duplicate and non-dense scene
/// numbers, and flashback marker balance. Diagnostics come back in line order.
pub fn validate_document(text: &str) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut seen = HashSet::new();
    let mut last_in_episode: BTreeMap<u32, u32> = BTreeMap::new();
    let mut open_flashback: Option<usize> = None;

    for (index, line) in text.lines().enumerate() {
        let trimmed = line.trim();

        if trimmed == FLASHBACK_START {
            if open_flashback.is_some() {
                diagnostics.push(Diagnostic::error(
                    index,
                    0,
                    "flashback started while another is still open",
                ));
            }
            open_flashback = Some(index);
            continue;
        }
        if trimmed == FLASHBACK_END {
            if open_flashback.take().is_none() {
                diagnostics.push(Diagnostic::error(
                    index,
                    0,
                    "flashback end without a matching start",
                ));
            }
            continue;
        }

        if !SCENE_NUMBER_PREFIX.is_match(trimmed) {
            continue;
        }

        let result = validate_header(trimmed);
        diagnostics.extend(
            result
                .errors
                .into_iter()
                .map(|e| Diagnostic::error(index, e.offset, e.message)),
        );

        let Some(header) = parse_header(trimmed) else {
            continue;
        };
        let number = header.number();
        if !seen.insert(number) {
            diagnostics.push(Diagnostic::error(
                index,
                0,
                format!("duplicate scene number {number}"),
            ));
            continue;
        }

        let previous = last_in_episode.insert(number.episode, number.scene);
        let expected = previous.map_or(Some(1), |scene| scene.checked_add(1));
        if Some(number.scene) != expected {
            let message = match previous {
                Some(scene) => format!(
                    "scene numbers jump from {} to {number}",
                    SceneNumber::new(number.episode, scene)
                ),
                None => format!("episode {} starts at {number}", number.episode),
            };
            diagnostics.push(Diagnostic::warning(index, message));
        }
    }

    if let Some(index) = open_flashback {
        diagnostics.push(Diagnostic::error(index, 0, "flashback is never closed"));
    }

    diagnostics.sort_by_key(|d| d.line);
    diagnostics
}
