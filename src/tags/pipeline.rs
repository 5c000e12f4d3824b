/*!
 * Tag pipeline that runs every tag stage in order.
 *
 * combine -> emphasis -> section -> cleanup -> note formatting
 *
 * Later stages assume earlier ones have fully resolved their markers, so a
 * failing stage aborts the whole run.
 */

use log::debug;

use crate::app_config::{Config, EmphasisStyle, NoteStyle, SectionMatching, TailMergePolicy};
use crate::errors::TagError;
use crate::notes_extractor::Record;

use super::{format_notes, process_combine_tags, process_emphasis_tags, process_remaining_tags, process_section_tags};

/// Options for the tag pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TagOptions {
    /// Markup for `#red` highlights
    pub emphasis: EmphasisStyle,
    /// Optional note styling
    pub note_style: Option<NoteStyle>,
    /// Whether emphasised highlights are also collected separately
    pub collect_important: bool,
    /// Structural marker matching mode
    pub section_matching: SectionMatching,
    /// Handling of a continuation marker on the last record
    pub tail_policy: TailMergePolicy,
}

impl From<&Config> for TagOptions {
    fn from(config: &Config) -> Self {
        Self {
            emphasis: config.emphasis,
            note_style: config.note_style,
            collect_important: config.important_section,
            section_matching: config.section_matching,
            tail_policy: config.trailing_continuation,
        }
    }
}

/// Records ready to be rendered
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessedNotes {
    /// All records in document order
    pub records: Vec<Record>,
    /// Emphasised highlights, filled only when collection is enabled
    pub important: Vec<Record>,
}

/// Tag pipeline
pub struct TagPipeline {
    options: TagOptions,
}

impl TagPipeline {
    /// Create a pipeline with the given options
    pub fn new(options: TagOptions) -> Self {
        Self { options }
    }

    /// Options in use
    pub fn options(&self) -> &TagOptions {
        &self.options
    }

    /// Run every stage over the records
    pub fn process(&self, records: &[Record]) -> Result<ProcessedNotes, TagError> {
        debug!("Tag pipeline input: {} records", records.len());

        let combined = process_combine_tags(records, self.options.tail_policy)?;
        debug!("After combine: {} records", combined.len());

        let emphasis = process_emphasis_tags(&combined, self.options.emphasis, self.options.collect_important);
        debug!("After emphasis: {} important highlights", emphasis.important.len());

        let sectioned = process_section_tags(&emphasis.records, self.options.section_matching);
        let cleaned = process_remaining_tags(&sectioned);
        let formatted = format_notes(&cleaned, self.options.note_style);

        Ok(ProcessedNotes {
            records: formatted,
            important: emphasis.important,
        })
    }
}

impl Default for TagPipeline {
    fn default() -> Self {
        Self::new(TagOptions::default())
    }
}
