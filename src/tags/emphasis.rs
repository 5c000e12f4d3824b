/*!
 * Emphasis markup for highlights tagged "#red".
 */

use crate::app_config::EmphasisStyle;
use crate::notes_extractor::Record;

use super::EMPHASIS_MARKER;

/// Records after emphasis processing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmphasisOutcome {
    /// Full sequence, emphasised records rewritten in place
    pub records: Vec<Record>,
    /// Emphasised records only, when collection was requested
    pub important: Vec<Record>,
}

/// Wrap the highlight of every `#red` record in the style's markup
///
/// The note of an emphasised record is dropped. With `collect_important`
/// the rewritten records are also gathered into a separate list.
pub fn process_emphasis_tags(records: &[Record], style: EmphasisStyle, collect_important: bool) -> EmphasisOutcome {
    let (open, close) = style.markup();
    let mut outcome = EmphasisOutcome {
        records: Vec::with_capacity(records.len()),
        important: Vec::new(),
    };

    for record in records {
        if !record.note.contains(EMPHASIS_MARKER) {
            outcome.records.push(record.clone());
            continue;
        }

        let emphasised = Record::new(format!("{}{}{}", open, record.highlight, close), "");
        if collect_important {
            outcome.important.push(emphasised.clone());
        }
        outcome.records.push(emphasised);
    }

    outcome
}
