use log::{error, warn, info, debug};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use indicatif::{ProgressBar, ProgressStyle};

use crate::app_config::Config;
use crate::errors::AppError;
use crate::file_utils::{FileManager, NOTES_PAGE_EXTENSIONS};
use crate::latex_renderer::LatexRenderer;
use crate::notes_extractor::{extract_book_info, extract_records, BookInfo, HtmlNotesPage, NotesPage};
use crate::tags::{TagOptions, TagPipeline};

// @module: Application controller for notes conversion

/// Result of converting a single notes page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutcome {
    /// A document was written
    Written(PathBuf),
    /// The document already existed and overwriting was not requested
    Skipped(PathBuf),
}

/// Counts reported after converting a folder
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderSummary {
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Counts reported after renaming a folder of pages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameSummary {
    pub renamed: usize,
    /// Pages already carrying their "Author - Title" name
    pub unchanged: usize,
    pub failed: usize,
}

/// Main application controller for notes conversion
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Tag pipeline built from the configuration
    pipeline: TagPipeline,
    // @field: Renderer holding the loaded template
    renderer: LatexRenderer,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self, AppError> {
        config.validate()?;

        let renderer = LatexRenderer::from_config(&config)?;
        let pipeline = TagPipeline::new(TagOptions::from(&config));

        Ok(Self {
            config,
            pipeline,
            renderer,
        })
    }

    /// Configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    // @method: Read and parse a notes page with its cleaned book metadata
    fn load_page(&self, input_file: &Path) -> Result<(HtmlNotesPage, BookInfo), AppError> {
        if !FileManager::file_exists(input_file) {
            return Err(AppError::File(format!("Input file does not exist: {:?}", input_file)));
        }

        let html = FileManager::read_to_string(input_file)?;
        let page = HtmlNotesPage::parse(&html)?;
        let book = extract_book_info(&page, self.config.max_title_chars)?;

        Ok((page, book))
    }

    /// Convert a single saved notes page into a LaTeX document
    pub fn convert_file<P: AsRef<Path>>(&self, input_file: P, force_overwrite: bool) -> Result<ConversionOutcome, AppError> {
        let input_file = input_file.as_ref();
        let start_time = Instant::now();

        let (page, book) = self.load_page(input_file)?;

        let output_path = LatexRenderer::output_path(&self.config.output_dir, &book);
        if output_path.exists() && !force_overwrite {
            warn!("Skipping {:?}, document already exists (use -f to force overwrite)", output_path);
            return Ok(ConversionOutcome::Skipped(output_path));
        }

        info!("Processing notes for \"{}\" by {}", book.title, book.author);
        if let Some(stats) = page.edit_stats() {
            info!("{} / {} / {}", stats.highlights_summary, stats.notes_summary, stats.last_edited);
        }

        let records = extract_records(&page)?;
        debug!("Extracted {} highlights from {:?}", records.len(), input_file);

        let processed = self.pipeline.process(&records)?;
        let written = self.renderer.write(&book, &processed, &self.config.output_dir)?;

        info!("Success: {:?} ({})", written, Self::format_duration(start_time.elapsed()));
        Ok(ConversionOutcome::Written(written))
    }

    /// Convert every notes page found in a directory
    ///
    /// A page that fails is logged and counted; the rest of the folder is
    /// still converted.
    pub fn convert_folder<P: AsRef<Path>>(&self, input_dir: P, force_overwrite: bool) -> Result<FolderSummary, AppError> {
        let input_dir = input_dir.as_ref();
        let start_time = Instant::now();

        let pages = Self::find_pages(input_dir)?;
        let folder_pb = Self::folder_progress_bar(pages.len());
        let mut summary = FolderSummary::default();

        for page in &pages {
            let file_name = Self::display_name(page);
            folder_pb.set_message(format!("Processing: {}", file_name));

            match self.convert_file(page, force_overwrite) {
                Ok(ConversionOutcome::Written(_)) => summary.converted += 1,
                Ok(ConversionOutcome::Skipped(_)) => summary.skipped += 1,
                Err(e) => {
                    folder_pb.suspend(|| error!("Error processing file {}: {}", file_name, e));
                    summary.failed += 1;
                }
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder processing complete");

        let summary_message = format!(
            "Folder processing completed: {} converted, {} skipped, {} errors - Duration: {}",
            summary.converted,
            summary.skipped,
            summary.failed,
            Self::format_duration(start_time.elapsed())
        );
        info!("{}", summary_message);

        let log_file_path = self.config.output_dir.join("kindle-latex.log");
        let log_line = format!("{} ({})", summary_message, input_dir.display());
        if let Err(e) = FileManager::append_to_log_file(&log_file_path, &log_line) {
            warn!("Failed to write folder summary to {:?}: {}", log_file_path, e);
        }

        Ok(summary)
    }

    /// Rename a saved notes page to "<Author> - <Short Title>.<ext>" next to it
    pub fn rename_page<P: AsRef<Path>>(&self, page_path: P) -> Result<PathBuf, AppError> {
        let page_path = page_path.as_ref();
        if !FileManager::is_notes_page(page_path) {
            return Err(AppError::File(format!("Not a saved notes page: {:?}", page_path)));
        }

        let (_, book) = self.load_page(page_path)?;

        let extension = page_path.extension().map(|e| e.to_string_lossy().to_string()).unwrap_or_default();
        let parent = page_path.parent().unwrap_or_else(|| Path::new(""));
        let renamed = FileManager::generate_output_path(parent, &book.file_stem(), &extension);

        if renamed == page_path {
            debug!("{:?} already carries its book name", page_path);
            return Ok(renamed);
        }

        FileManager::rename_file(page_path, &renamed)?;
        info!("Renamed {:?} to {:?}", page_path, renamed);
        Ok(renamed)
    }

    /// Rename every notes page found in a directory
    pub fn rename_folder<P: AsRef<Path>>(&self, input_dir: P) -> Result<RenameSummary, AppError> {
        let pages = Self::find_pages(input_dir.as_ref())?;
        let mut summary = RenameSummary::default();

        for page in &pages {
            match self.rename_page(page) {
                Ok(renamed) if &renamed == page => summary.unchanged += 1,
                Ok(_) => summary.renamed += 1,
                Err(e) => {
                    error!("Error renaming file {}: {}", Self::display_name(page), e);
                    summary.failed += 1;
                }
            }
        }

        info!(
            "Renaming completed: {} renamed, {} unchanged, {} errors",
            summary.renamed, summary.unchanged, summary.failed
        );
        Ok(summary)
    }

    // @returns: Notes pages under a directory, failing when there are none
    fn find_pages(input_dir: &Path) -> Result<Vec<PathBuf>, AppError> {
        if !FileManager::dir_exists(input_dir) {
            return Err(AppError::File(format!("Input directory does not exist: {:?}", input_dir)));
        }

        let pages = FileManager::find_files(input_dir, &NOTES_PAGE_EXTENSIONS)?;
        if pages.is_empty() {
            return Err(AppError::File(format!("No notes pages found in directory: {:?}", input_dir)));
        }

        Ok(pages)
    }

    fn folder_progress_bar(len: usize) -> ProgressBar {
        let folder_pb = ProgressBar::new(len as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(style.progress_chars("##-"));
        folder_pb
    }

    fn display_name(path: &Path) -> String {
        path.file_name()
            .map(|f| f.to_string_lossy().to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }

    // @returns: Human readable duration
    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;

        if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
