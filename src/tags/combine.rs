/*!
 * Continuation merges.
 *
 * A note starting with "..." says the highlight continues in the next one,
 * usually because the passage crossed a page. Both highlights become a single
 * record carrying the second record's note.
 */

use log::{info, warn};

use crate::app_config::TailMergePolicy;
use crate::errors::TagError;
use crate::notes_extractor::Record;

use super::CONTINUATION_MARKER;

/// Separator placed between two merged highlights
pub const MERGE_SEPARATOR: &str = "[...] ";

/// Merge every flagged record with its successor
///
/// Each merge consumes two input records and produces one. A merged record is
/// not scanned again, so a chain of three flagged records merges pairwise.
pub fn process_combine_tags(records: &[Record], tail_policy: TailMergePolicy) -> Result<Vec<Record>, TagError> {
    let mut combined = Vec::with_capacity(records.len());
    let mut index = 0;

    while index < records.len() {
        let current = &records[index];

        if !current.note.starts_with(CONTINUATION_MARKER) {
            combined.push(current.clone());
            index += 1;
            continue;
        }

        let Some(next) = records.get(index + 1) else {
            match tail_policy {
                TailMergePolicy::Fail => {
                    return Err(TagError::OutOfRangeMerge {
                        index,
                        highlight: current.highlight.clone(),
                    });
                }
                TailMergePolicy::Drop => {
                    warn!("Dropping last highlight, it has nothing to be combined with: {}", current.highlight);
                    break;
                }
            }
        };

        info!("Combining the following highlights:");
        info!("1st: {}", current.highlight);
        info!("2nd: {}", next.highlight);

        combined.push(Record {
            highlight: format!("{}{}{}", current.highlight, MERGE_SEPARATOR, next.highlight),
            note: next.note.clone(),
        });
        index += 2;
    }

    Ok(combined)
}
