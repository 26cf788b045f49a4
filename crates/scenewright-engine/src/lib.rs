pub mod completion;
pub mod editing;
pub mod estimate;
pub mod export;
pub mod index;
pub mod io;
pub mod numbering;
pub mod parsing;
pub mod stats;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use completion::{Completion, CompletionKind, CompletionSources, suggest};
pub use editing::{EditError, Patch, ScriptBuffer};
pub use estimate::{
    WORDS_PER_MINUTE, content_word_count, estimate_duration_minutes, line_word_count,
};
pub use export::{ExportFormat, ExportOptions, UnknownFormat, export};
pub use index::{DocumentIndex, DocumentIndexer, SceneRecord, SpeakerLines, index_document};
pub use io::*;
pub use numbering::{
    CursorTarget, InsertionPlan, NumberingError, TextEdit, needs_renumbering, next_scene_number,
    plan_resequence, plan_scene_insertion, scenes_to_renumber,
};
pub use parsing::{
    Diagnostic, ElementKind, LineClassifier, LocationKind, ParsedLine, SceneHeader, SceneNumber,
    Severity, ValidationError, ValidationResult, classify, parse_header, parse_lines,
    validate_document, validate_header,
};
pub use stats::{ScriptStatistics, StatisticsAggregator};
