/*!
 * # Applying planned edits
 *
 * The numbering engine only computes [`TextEdit`](crate::numbering::TextEdit)s.
 * This module owns the text they are applied to:
 *
 * - **`buffer`**: `ScriptBuffer`, an xi-rope buffer edited by line ranges;
 *   all edits of one plan refer to the same snapshot and land as one delta
 * - **`patch`**: what changed, in new-buffer byte ranges, plus the version
 *
 * ```rust
 * use scenewright_engine::editing::ScriptBuffer;
 * use scenewright_engine::index::index_document;
 * use scenewright_engine::numbering::plan_scene_insertion;
 *
 * let text = "1-1 日 内 客厅\n△ 开门\n1-2 夜 外 街道\n";
 * let index = index_document(text);
 * let plan = plan_scene_insertion(&index, text, 1).unwrap();
 *
 * let mut buffer = ScriptBuffer::from_text(text);
 * buffer.apply(&plan.edits).unwrap();
 * assert_eq!(buffer.text(), "1-1 日 内 客厅\n△ 开门\n1-2 \n1-3 夜 外 街道\n");
 * ```
 */

pub mod buffer;
pub mod patch;

pub use buffer::{EditError, ScriptBuffer};
pub use patch::Patch;
