/*!
 * LaTeX document rendering.
 *
 * The document is a fixed preamble with the book's author and title filled
 * in, followed by one paragraph per highlight and note line and the closing
 * `\end{document}`.
 */

use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::errors::RenderError;
use crate::file_utils::FileManager;
use crate::notes_extractor::{BookInfo, Record};
use crate::tags::ProcessedNotes;

/// Placeholder replaced by the book author
pub const AUTHOR_PLACEHOLDER: &str = "_BOOK_AUTHOR";

/// Placeholder replaced by the book title
pub const TITLE_PLACEHOLDER: &str = "_BOOK_TITLE";

/// Closing marker appended after the body
pub const DOCUMENT_END: &str = "\\end{document}";

/// Heading of the optional block of emphasised highlights
pub const IMPORTANT_HEADING: &str = "\\section*{Important Highlights}";

/// Separator between body lines; a blank line starts a new LaTeX paragraph
const LINE_SEPARATOR: &str = "\n\n";

/// Preamble used when no template file is configured
pub const DEFAULT_TEMPLATE: &str = include_str!("../tex/latex_template.tex");

/// LaTeX renderer
#[derive(Debug, Clone)]
pub struct LatexRenderer {
    template: String,
}

impl LatexRenderer {
    /// Create a renderer from template text
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Load the template from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RenderError> {
        let path = path.as_ref();
        let template = fs::read_to_string(path).map_err(|source| RenderError::TemplateUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded LaTeX template from {:?}", path);
        Ok(Self::new(template))
    }

    /// Use the configured template, or the built-in one
    pub fn from_config(config: &Config) -> Result<Self, RenderError> {
        match &config.template_path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Flatten records into body text, one paragraph per line
    pub fn render_body(records: &[Record]) -> String {
        records
            .iter()
            .flat_map(|record| {
                std::iter::once(record.highlight.as_str())
                    .chain(record.has_note().then_some(record.note.as_str()))
            })
            .collect::<Vec<_>>()
            .join(LINE_SEPARATOR)
    }

    /// Produce the complete document text
    pub fn render(&self, book: &BookInfo, notes: &ProcessedNotes) -> String {
        let header = self
            .template
            .replace(AUTHOR_PLACEHOLDER, &book.author)
            .replace(TITLE_PLACEHOLDER, &book.title);

        let mut body = String::new();
        if !notes.important.is_empty() {
            body.push_str(IMPORTANT_HEADING);
            body.push_str(LINE_SEPARATOR);
            body.push_str(&Self::render_body(&notes.important));
            body.push_str(LINE_SEPARATOR);
        }
        body.push_str(&Self::render_body(&notes.records));
        body.push('\n');
        body.push_str(DOCUMENT_END);

        format!("{}\n\n{}", header, body)
    }

    /// Destination of a book's document, "<dir>/<Author> - <Short Title>.tex"
    pub fn output_path<P: AsRef<Path>>(output_dir: P, book: &BookInfo) -> PathBuf {
        FileManager::generate_output_path(output_dir, &book.file_stem(), "tex")
    }

    /// Render and write the document, returning its path
    ///
    /// The file appears only once it is complete.
    pub fn write<P: AsRef<Path>>(&self, book: &BookInfo, notes: &ProcessedNotes, output_dir: P) -> Result<PathBuf, RenderError> {
        let path = Self::output_path(output_dir, book);
        let document = self.render(book, notes);

        FileManager::write_atomically(&path, &document).map_err(|source| RenderError::WriteFailed {
            path: path.clone(),
            source,
        })?;

        debug!("Wrote {} bytes to {:?}", document.len(), path);
        Ok(path)
    }
}

impl Default for LatexRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }
}
