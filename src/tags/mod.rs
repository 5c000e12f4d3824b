/*!
 * Tag processing for highlight records.
 *
 * Notes attached to highlights may carry small textual commands that rewrite
 * the record before it is rendered:
 * - `...` at the start of a note joins the highlight with the next one
 * - `#red` marks a highlight for emphasis
 * - `#part`, `#sec`, `#ch`, `#subsec`, `#subsubsec` turn a highlight into a heading
 *
 * # Architecture
 *
 * - `combine`: Continuation merges
 * - `emphasis`: Emphasis markup
 * - `section`: Heading markup
 * - `cleanup`: Removal of leftover `#` characters
 * - `note_format`: "Note: " labels and note styling
 * - `pipeline`: Runs all stages in order
 *
 * Every stage borrows its input and returns a new sequence, so stages can be
 * run alone or in a different order.
 */

pub mod combine;
pub mod emphasis;
pub mod section;
pub mod cleanup;
pub mod note_format;
pub mod pipeline;

// Re-export main types
pub use combine::process_combine_tags;
pub use emphasis::{process_emphasis_tags, EmphasisOutcome};
pub use section::process_section_tags;
pub use cleanup::process_remaining_tags;
pub use note_format::format_notes;
pub use pipeline::{ProcessedNotes, TagOptions, TagPipeline};

/// Note prefix asking for a merge with the following highlight
pub const CONTINUATION_MARKER: &str = "...";

/// Note marker for an emphasised highlight
pub const EMPHASIS_MARKER: &str = "#red";

/// Character every marker starts with
pub const MARKER_CHAR: char = '#';
