/*!
 * Error types for the kindle-latex application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading records and metadata from a notes page
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// A highlight row without a highlight text element
    #[error("Highlight row {row} has no highlight text")]
    MissingHighlight {
        /// Zero-based row index in document order
        row: usize,
    },

    /// A highlight row without a note text element
    #[error("Highlight row {row} has no note element")]
    MissingNote {
        /// Zero-based row index in document order
        row: usize,
    },

    /// A highlight row with more than one element of the same part
    #[error("Highlight row {row} has {count} {part} elements, expected one")]
    DuplicatePart {
        /// Zero-based row index in document order
        row: usize,
        /// "highlight" or "note"
        part: &'static str,
        count: usize,
    },

    /// The page carries no author or title
    #[error("Notes page has no {0}")]
    MissingBookInfo(&'static str),

    /// A CSS selector could not be compiled
    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector {
        selector: String,
        message: String,
    },
}

/// Errors raised by the tag processors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TagError {
    /// A continuation marker on the final record, with nothing to merge into
    #[error("Record {index} asks to be combined with the next highlight, but it is the last one: {highlight:?}")]
    OutOfRangeMerge {
        /// Index of the flagged record in the stage input
        index: usize,
        /// Highlight text of the flagged record
        highlight: String,
    },
}

/// Errors detected while loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Emphasis style outside the supported set
    #[error("Unknown emphasis style '{0}' (expected one of: bold, italics, underline, large_font, red)")]
    UnknownEmphasisStyle(String),

    /// Note style outside the supported set
    #[error("Unknown note style '{0}' (expected one of: italics, small, footnotesize, gray, none)")]
    UnknownNoteStyle(String),

    /// Section matching mode outside the supported set
    #[error("Unknown section matching mode '{0}' (expected containment or exact_token)")]
    UnknownSectionMatching(String),

    /// Tail merge policy outside the supported set
    #[error("Unknown trailing continuation policy '{0}' (expected fail or drop)")]
    UnknownTailMergePolicy(String),

    /// A value that parses but makes no sense
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// The configuration file could not be read or written
    #[error("Configuration file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for this schema
    #[error("Failed to parse configuration file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors that can occur while producing the LaTeX document
#[derive(Error, Debug)]
pub enum RenderError {
    /// The template file could not be read
    #[error("Failed to read LaTeX template {path:?}: {source}")]
    TemplateUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output document could not be written
    #[error("Failed to write LaTeX document {path:?}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation, or a missing input
    #[error("File error: {0}")]
    File(String),

    /// Error while extracting notes
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Error from the tag pipeline
    #[error("Tag error: {0}")]
    Tag(#[from] TagError),

    /// Error in configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error while rendering
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

// File utilities report through anyhow with the failing path in the context
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::File(format!("{:#}", error))
    }
}
