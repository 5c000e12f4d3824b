use deunicode::deunicode;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::errors::ExtractionError;

// @module: Reading highlights, notes and book metadata from a notes page

// @const: Trailing characters that are unsafe at the end of a file name
static TRAILING_UNSAFE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^A-Za-z0-9_.]+$").expect("Invalid trailing character regex")
});

// @const: Number of words kept when a title has no natural cut point
const TITLE_FALLBACK_WORDS: usize = 5;

// @struct: One highlighted passage and its annotation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record {
    // @field: Quoted passage, empty after some rewrites
    pub highlight: String,

    // @field: Annotation text, possibly carrying markers
    pub note: String,
}

impl Record {
    pub fn new(highlight: impl Into<String>, note: impl Into<String>) -> Self {
        Record {
            highlight: highlight.into(),
            note: note.into(),
        }
    }

    /// Whether the record carries any annotation text
    pub fn has_note(&self) -> bool {
        !self.note.is_empty()
    }
}

/// A highlight row as found on the page, before validation
///
/// Every text element of each kind found in the row is kept; a well formed
/// row holds exactly one of each.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightRow {
    pub highlights: Vec<String>,
    pub notes: Vec<String>,
}

/// Raw author and title strings as printed on the page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawBookMetadata {
    pub author: Option<String>,
    pub title: Option<String>,
}

/// Highlighting statistics shown on the notes page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditStats {
    pub highlights_summary: String,
    pub notes_summary: String,
    pub last_edited: String,
}

impl EditStats {
    /// Split the stats banner into its highlight and note sentences
    ///
    /// The banner reads like "You have 12 highlighted passagesYou have 3 notes";
    /// the second sentence starts at the second "You".
    pub fn from_banner(banner: &str, last_edited: &str) -> Self {
        let banner = banner.replace('\n', "");
        let search_from = banner.char_indices().nth(1).map(|(i, _)| i).unwrap_or(banner.len());
        let split_at = banner[search_from..].find("You").map(|i| i + search_from);

        let (highlights, notes) = match split_at {
            Some(idx) => (banner[..idx].to_string(), banner[idx..].to_string()),
            None => (banner.clone(), String::new()),
        };

        EditStats {
            highlights_summary: highlights.trim().to_string(),
            notes_summary: notes.trim().to_string(),
            last_edited: last_edited.trim().to_string(),
        }
    }
}

/// Read-only view of a notes page
///
/// The extractor only ever asks for rows and their two text parts, so any
/// source able to answer these questions can feed the pipeline.
pub trait NotesPage {
    /// All highlight rows in document order
    fn highlight_rows(&self) -> Vec<HighlightRow>;

    /// Author and title as printed
    fn book_metadata(&self) -> RawBookMetadata;

    /// Highlighting statistics, when the page shows them
    fn edit_stats(&self) -> Option<EditStats> {
        None
    }
}

// @struct: Compiled CSS selectors for the Kindle notes layout
struct PageSelectors {
    row: Selector,
    highlight: Selector,
    note: Selector,
    author: Selector,
    title: Selector,
    stats: Selector,
    last_edit: Selector,
}

impl PageSelectors {
    fn compile() -> Result<Self, ExtractionError> {
        Ok(Self {
            row: compile_selector("div.highlightRow.yourHighlight")?,
            highlight: compile_selector("span.highlight")?,
            note: compile_selector("span.noteContent")?,
            author: compile_selector("span.author")?,
            title: compile_selector("span.title")?,
            stats: compile_selector("div.yourHighlightsStats")?,
            last_edit: compile_selector("div.lastHighlighted")?,
        })
    }
}

fn compile_selector(selector: &str) -> Result<Selector, ExtractionError> {
    Selector::parse(selector).map_err(|e| ExtractionError::InvalidSelector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}

/// Kindle notes page parsed from HTML
pub struct HtmlNotesPage {
    document: Html,
    selectors: PageSelectors,
}

impl HtmlNotesPage {
    /// Parse a saved notes page
    pub fn parse(html: &str) -> Result<Self, ExtractionError> {
        Ok(Self {
            document: Html::parse_document(html),
            selectors: PageSelectors::compile()?,
        })
    }

    fn first_text(&self, selector: &Selector) -> Option<String> {
        self.document.select(selector).next().map(element_text)
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

impl NotesPage for HtmlNotesPage {
    fn highlight_rows(&self) -> Vec<HighlightRow> {
        self.document
            .select(&self.selectors.row)
            .map(|row| HighlightRow {
                highlights: row.select(&self.selectors.highlight).map(element_text).collect(),
                notes: row.select(&self.selectors.note).map(element_text).collect(),
            })
            .collect()
    }

    fn book_metadata(&self) -> RawBookMetadata {
        RawBookMetadata {
            author: self.first_text(&self.selectors.author),
            title: self.first_text(&self.selectors.title),
        }
    }

    fn edit_stats(&self) -> Option<EditStats> {
        let banner = self.first_text(&self.selectors.stats)?;
        let last_edited = self.first_text(&self.selectors.last_edit).unwrap_or_default();
        Some(EditStats::from_banner(&banner, &last_edited))
    }
}

/// Turn every highlight row into a record, keeping document order
///
/// A row lacking either part, or holding more than one of a part, is an
/// error; nothing is skipped.
pub fn extract_records<P: NotesPage + ?Sized>(page: &P) -> Result<Vec<Record>, ExtractionError> {
    page.highlight_rows()
        .into_iter()
        .enumerate()
        .map(|(row, raw)| -> Result<Record, ExtractionError> {
            let highlight = single_part(raw.highlights, row, "highlight", ExtractionError::MissingHighlight { row })?;
            let note = single_part(raw.notes, row, "note", ExtractionError::MissingNote { row })?;
            Ok(Record { highlight, note })
        })
        .collect()
}

// @returns: The only element of a row part
fn single_part(
    mut parts: Vec<String>,
    row: usize,
    part: &'static str,
    missing: ExtractionError,
) -> Result<String, ExtractionError> {
    if parts.len() > 1 {
        return Err(ExtractionError::DuplicatePart { row, part, count: parts.len() });
    }
    parts.pop().ok_or(missing)
}

// @struct: Cleaned book metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookInfo {
    pub author: String,
    pub title: String,
    // @field: Short, file-name friendly title
    pub truncated_title: String,
}

impl BookInfo {
    /// Clean raw author and title strings
    ///
    /// Both are transliterated to ASCII first, so they stay usable in file
    /// names whatever script the book is written in.
    pub fn from_raw(author: &str, title: &str, max_title_chars: usize) -> Self {
        let author = deunicode(author);
        let title = deunicode(title);

        let author = title_case(author.replacen("by", "", 1).trim());
        let title = title_case(title.trim())
            .replace("'S ", "'s ")
            .replace("'T ", "'t ");
        let truncated_title = truncate_title(&title, max_title_chars);

        BookInfo {
            author,
            title,
            truncated_title,
        }
    }

    /// Output file stem, "Author - Short Title"
    pub fn file_stem(&self) -> String {
        format!("{} - {}", self.author, self.truncated_title)
    }
}

/// Read and clean the book metadata of a page
pub fn extract_book_info<P: NotesPage + ?Sized>(
    page: &P,
    max_title_chars: usize,
) -> Result<BookInfo, ExtractionError> {
    let raw = page.book_metadata();
    let author = raw.author.ok_or(ExtractionError::MissingBookInfo("author"))?;
    let title = raw.title.ok_or(ExtractionError::MissingBookInfo("title"))?;
    Ok(BookInfo::from_raw(&author, &title, max_title_chars))
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest
pub fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut previous_is_letter = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            result.push(c);
            previous_is_letter = false;
        }
    }

    result
}

/// Shorten a title so it can be used in a file name
pub fn truncate_title(title: &str, max_chars: usize) -> String {
    let mut truncated = title.replace(':', " --").replace('?', "");

    if truncated.chars().count() > max_chars {
        truncated = truncated.split(" --").next().unwrap_or_default().to_string();
        truncated = truncated.split(" (").next().unwrap_or_default().to_string();

        if truncated.chars().count() > max_chars {
            truncated = truncated
                .split_whitespace()
                .take(TITLE_FALLBACK_WORDS)
                .collect::<Vec<_>>()
                .join(" ");
        }
    }

    TRAILING_UNSAFE_REGEX.replace(&truncated, "").into_owned()
}
