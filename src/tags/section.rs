/*!
 * Heading markup for structural markers.
 *
 * A highlight tagged with a structural marker is the name of a part,
 * chapter or (sub)section of the book, and is rendered as the matching
 * LaTeX sectioning command so the document gets a table of contents.
 */

use crate::app_config::SectionMatching;
use crate::notes_extractor::Record;

/// LaTeX sectioning levels reachable from note markers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingLevel {
    Part,
    Section,
    Subsection,
    Subsubsection,
}

impl HeadingLevel {
    /// Levels in the order their markers are tested
    pub const PRIORITY: [HeadingLevel; 4] = [
        HeadingLevel::Part,
        HeadingLevel::Section,
        HeadingLevel::Subsection,
        HeadingLevel::Subsubsection,
    ];

    /// Note markers selecting this level; "#ch" is the older spelling of "#sec"
    pub fn markers(&self) -> &'static [&'static str] {
        match self {
            Self::Part => &["#part"],
            Self::Section => &["#sec", "#ch"],
            Self::Subsection => &["#subsec"],
            Self::Subsubsection => &["#subsubsec"],
        }
    }

    /// LaTeX command name
    pub fn command(&self) -> &'static str {
        match self {
            Self::Part => "part",
            Self::Section => "section",
            Self::Subsection => "subsection",
            Self::Subsubsection => "subsubsection",
        }
    }

    /// Wrap a heading text in this level's command
    pub fn wrap(&self, text: &str) -> String {
        format!("\\{}{{{}}}", self.command(), text)
    }

    fn matches(&self, note: &str, matching: SectionMatching) -> bool {
        self.markers().iter().any(|marker| match matching {
            SectionMatching::Containment => note.contains(marker),
            SectionMatching::ExactToken => note.split_whitespace().any(|token| token == *marker),
        })
    }

    /// First level whose marker appears in the note
    pub fn detect(note: &str, matching: SectionMatching) -> Option<Self> {
        Self::PRIORITY.into_iter().find(|level| level.matches(note, matching))
    }
}

/// Rewrite every record carrying a structural marker as a heading
///
/// With `SectionMatching::Containment` a marker also fires as the prefix of a
/// longer word, so "#chapter" or "#sections" select `\section`.
pub fn process_section_tags(records: &[Record], matching: SectionMatching) -> Vec<Record> {
    records
        .iter()
        .map(|record| match HeadingLevel::detect(&record.note, matching) {
            Some(level) => Record::new(level.wrap(&record.highlight), ""),
            None => record.clone(),
        })
        .collect()
}
