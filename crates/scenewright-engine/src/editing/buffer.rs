use std::ops::Range;

use xi_rope::delta::Builder;
use xi_rope::{LinesMetric, Rope, RopeInfo};

use crate::editing::Patch;
use crate::numbering::{CursorTarget, TextEdit};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EditError {
    #[error("Edit range {start}..{end} is outside the document ({line_count} lines)")]
    OutOfRange {
        start: usize,
        end: usize,
        line_count: usize,
    },
    #[error("Edits overlap at line {0}")]
    Overlapping(usize),
    #[error("Script is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

/// Script text held in an xi-rope buffer, changed only through line-based
/// [`TextEdit`]s.
///
/// Saving writes the rope back verbatim, so line endings and everything the
/// edits did not touch survive byte for byte.
pub struct ScriptBuffer {
    buffer: Rope,
    version: u64,
}

impl ScriptBuffer {
    pub fn from_text(text: &str) -> Self {
        Self {
            buffer: Rope::from(text),
            version: 0,
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EditError> {
        Ok(Self::from_text(std::str::from_utf8(bytes)?))
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of lines, counted the way `str::lines` counts them.
    pub fn line_count(&self) -> usize {
        let breaks = self.buffer.measure::<LinesMetric>();
        if self.buffer.offset_of_line(breaks) < self.buffer.len() {
            breaks + 1
        } else {
            breaks
        }
    }

    /// Text of a line without its line ending.
    pub fn line(&self, line: usize) -> Option<String> {
        if line >= self.line_count() {
            return None;
        }
        let span = self.line_span(line);
        Some(self.buffer.slice_to_cow(span).into_owned())
    }

    /// Byte offset of a caret position; the column is clamped to the line.
    pub fn offset_of(&self, cursor: CursorTarget) -> usize {
        if cursor.line >= self.line_count() {
            return self.buffer.len();
        }
        let span = self.line_span(cursor.line);
        let text = self.buffer.slice_to_cow(span.clone());
        let column = text
            .char_indices()
            .nth(cursor.column)
            .map_or(text.len(), |(byte, _)| byte);
        span.start + column
    }

    /// Applies edits that all refer to line numbers of the current text, as
    /// one change. Their order does not matter; they must not overlap.
    pub fn apply(&mut self, edits: &[TextEdit]) -> Result<Patch, EditError> {
        let line_count = self.line_count();
        let mut sorted: Vec<&TextEdit> = edits.iter().collect();
        sorted.sort_by_key(|edit| (edit.lines.start, edit.lines.end));

        let mut last_end = 0;
        for edit in &sorted {
            let Range { start, end } = edit.lines;
            if start > end || end > line_count {
                return Err(EditError::OutOfRange {
                    start,
                    end,
                    line_count,
                });
            }
            if start < last_end {
                return Err(EditError::Overlapping(start));
            }
            last_end = end;
        }

        let mut builder = Builder::<RopeInfo>::new(self.buffer.len());
        let mut changed = Vec::with_capacity(sorted.len());
        let mut shift: isize = 0;
        for edit in sorted {
            let (range, text) = self.byte_edit(edit, line_count);
            let new_start = (range.start as isize + shift) as usize;
            changed.push(new_start..new_start + text.len());
            shift += text.len() as isize - range.len() as isize;
            builder.replace(range, Rope::from(text));
        }

        self.buffer = builder.build().apply(&self.buffer);
        self.version += 1;
        log::debug!("applied {} edits, version {}", changed.len(), self.version);

        Ok(Patch {
            changed,
            version: self.version,
        })
    }

    /// Byte range of a line's content, excluding `\n` or `\r\n`.
    fn line_span(&self, line: usize) -> Range<usize> {
        let start = self.buffer.offset_of_line(line);
        let next = self.buffer.offset_of_line(line + 1);
        let raw = self.buffer.slice_to_cow(start..next);
        let content = raw.strip_suffix('\n').unwrap_or(&*raw);
        let content = content.strip_suffix('\r').unwrap_or(content);
        start..start + content.len()
    }

    fn ends_with_newline(&self) -> bool {
        let len = self.buffer.len();
        len > 0 && self.buffer.offset_of_line(self.buffer.measure::<LinesMetric>()) == len
    }

    /// Translates a line edit into a byte range and the text to put there.
    fn byte_edit(&self, edit: &TextEdit, line_count: usize) -> (Range<usize>, String) {
        let Range { start, end } = edit.lines;
        let replacement = &edit.replacement;

        if start < end {
            let from = self.buffer.offset_of_line(start);
            let to = self.line_span(end - 1).end;
            return (from..to, replacement.clone());
        }

        if start < line_count {
            let at = self.buffer.offset_of_line(start);
            return (at..at, format!("{replacement}\n"));
        }

        let len = self.buffer.len();
        let text = if len == 0 {
            replacement.clone()
        } else if self.ends_with_newline() {
            format!("{replacement}\n")
        } else {
            format!("\n{replacement}")
        };
        (len..len, text)
    }
}
