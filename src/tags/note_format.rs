/*!
 * Note labelling and styling, the last tag stage.
 */

use crate::app_config::NoteStyle;
use crate::notes_extractor::Record;

/// Label that sets notes apart from highlight text
pub const NOTE_LABEL: &str = "Note: ";

/// Prefix non-empty notes with "Note: " and apply the optional style
///
/// Meant to run after every tag stage, since those may clear notes.
pub fn format_notes(records: &[Record], style: Option<NoteStyle>) -> Vec<Record> {
    records
        .iter()
        .map(|record| {
            if !record.has_note() {
                return record.clone();
            }

            let labelled = format!("{}{}", NOTE_LABEL, record.note);
            let note = match style {
                Some(style) => {
                    let (open, close) = style.markup();
                    format!("{}{}{}", open, labelled, close)
                }
                None => labelled,
            };
            Record::new(record.highlight.clone(), note)
        })
        .collect()
}
