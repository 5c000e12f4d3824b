/*!
 * Removal of leftover marker characters.
 *
 * `#` is a special character in LaTeX, so any marker that no stage consumed
 * would break compilation of the generated document.
 */

use crate::notes_extractor::Record;

use super::MARKER_CHAR;

/// Remove every `#` from notes, leaving highlights as they are
pub fn process_remaining_tags(records: &[Record]) -> Vec<Record> {
    records
        .iter()
        .map(|record| {
            if record.note.contains(MARKER_CHAR) {
                Record::new(record.highlight.clone(), record.note.replace(MARKER_CHAR, ""))
            } else {
                record.clone()
            }
        })
        .collect()
}
