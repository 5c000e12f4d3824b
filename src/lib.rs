/*!
 * # kindle-latex - Kindle highlights to LaTeX
 *
 * A Rust library that turns a saved Kindle "Your Highlights" page into a
 * LaTeX document.
 *
 * ## Features
 *
 * - Extract highlights, notes, author and title from a notes page
 * - Process commands written in notes:
 *   - `...`: combine the highlight with the next one
 *   - `#red`: emphasise the highlight (bold, italics, underline, large font or red)
 *   - `#part`, `#sec`/`#ch`, `#subsec`, `#subsubsec`: turn the highlight into a heading
 * - Label and optionally style notes
 * - Render into a LaTeX template with a table of contents
 * - Convert a single page or a whole folder of pages
 * - Rename saved pages after their book
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `notes_extractor`: Records and book metadata from notes pages
 * - `tags`: Tag processing stages and the pipeline running them
 * - `latex_renderer`: Document rendering and writing
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod file_utils;
pub mod notes_extractor;
pub mod tags;
pub mod latex_renderer;
pub mod app_controller;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use notes_extractor::{BookInfo, HtmlNotesPage, NotesPage, Record};
pub use tags::{ProcessedNotes, TagPipeline};
pub use latex_renderer::LatexRenderer;
pub use app_controller::Controller;
pub use errors::{AppError, ConfigError, ExtractionError, RenderError, TagError};
