/*!
 * Tests for the full application lifecycle through the controller
 */

use std::fs;
use std::path::PathBuf;
use anyhow::Result;

use kindle_latex::app_config::{Config, TailMergePolicy};
use kindle_latex::app_controller::{ConversionOutcome, Controller, FolderSummary, RenameSummary};
use kindle_latex::errors::{AppError, ConfigError, ExtractionError, TagError};
use crate::common;

const EXPECTED_DOCUMENT: &str = "Jane Doe - Thinking In Systems -- A Primer.tex";

fn config_with_output(output_dir: PathBuf) -> Config {
    Config {
        output_dir,
        ..Config::default()
    }
}

/// Test controller creation with the default configuration
#[test]
fn test_controller_withDefaultConfig_shouldBeCreated() -> Result<()> {
    let controller = Controller::with_config(Config::default())?;

    assert_eq!(controller.config(), &Config::default());
    Ok(())
}

/// Test that an invalid configuration is rejected up front
#[test]
fn test_controller_withInvalidConfig_shouldFail() {
    let config = Config {
        max_title_chars: 0,
        ..Config::default()
    };

    assert!(matches!(Controller::with_config(config), Err(AppError::Config(ConfigError::Invalid(_)))));
}

/// Test that a missing template file is rejected up front
#[test]
fn test_controller_withMissingTemplate_shouldFail() {
    let config = Config {
        template_path: Some(PathBuf::from("/definitely/not/here.tex")),
        ..Config::default()
    };

    assert!(Controller::with_config(config).is_err());
}

/// Test converting a single page, then skipping it on a second run
#[test]
fn test_convertFile_runTwice_shouldSkipUnlessForced() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let page = common::create_test_notes_page(temp_dir.path(), "notes.html")?;
    let output_dir = temp_dir.path().join("tex");
    let controller = Controller::with_config(config_with_output(output_dir.clone()))?;
    let expected = output_dir.join(EXPECTED_DOCUMENT);

    let first = controller.convert_file(&page, false)?;
    assert_eq!(first, ConversionOutcome::Written(expected.clone()));
    let document = fs::read_to_string(&expected)?;
    assert!(document.contains("A system is more than[...] the sum of its parts.\n\nNote: key idea"));

    fs::write(&expected, "edited by hand")?;
    let second = controller.convert_file(&page, false)?;
    assert_eq!(second, ConversionOutcome::Skipped(expected.clone()));
    assert_eq!(fs::read_to_string(&expected)?, "edited by hand");

    let forced = controller.convert_file(&page, true)?;
    assert_eq!(forced, ConversionOutcome::Written(expected.clone()));
    assert_eq!(fs::read_to_string(&expected)?, document);

    Ok(())
}

/// Test that a missing input file is an error
#[test]
fn test_convertFile_withMissingInput_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::with_config(config_with_output(temp_dir.path().join("tex")))?;

    let result = controller.convert_file(temp_dir.path().join("absent.html"), false);
    assert!(matches!(result, Err(AppError::File(message)) if message.contains("absent.html")));
    Ok(())
}

/// Test that a trailing continuation fails by default and is dropped on request
#[test]
fn test_convertFile_withTrailingContinuation_shouldFollowPolicy() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let html = common::notes_page_html("by ann", "loose ends", &[("First", ""), ("Dangling", "...")]);
    let page = common::create_test_file(temp_dir.path(), "loose.html", &html)?;
    let output_dir = temp_dir.path().join("tex");

    let strict = Controller::with_config(config_with_output(output_dir.clone()))?;
    assert!(matches!(
        strict.convert_file(&page, false),
        Err(AppError::Tag(TagError::OutOfRangeMerge { index: 1, .. }))
    ));
    assert!(!output_dir.join("Ann - Loose Ends.tex").exists());

    let lenient = Controller::with_config(Config {
        trailing_continuation: TailMergePolicy::Drop,
        ..config_with_output(output_dir.clone())
    })?;
    lenient.convert_file(&page, false)?;

    let document = fs::read_to_string(output_dir.join("Ann - Loose Ends.tex"))?;
    assert!(document.contains("First\n\\end{document}"));
    assert!(!document.contains("Dangling"));
    Ok(())
}

/// Test folder conversion counts successes, skips and failures
#[test]
fn test_convertFolder_withMixedPages_shouldSummarize() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input_dir = temp_dir.path().join("pages");
    fs::create_dir_all(&input_dir)?;
    let output_dir = temp_dir.path().join("tex");

    common::create_test_notes_page(&input_dir, "a.html")?;
    let other = common::notes_page_html("by bo", "second book", &[("Only line", "")]);
    common::create_test_file(&input_dir, "b.html", &other)?;
    common::create_test_file(&input_dir, "c.html", "<html><body>no notes here</body></html>")?;
    common::create_test_file(&input_dir, "readme.txt", "ignored")?;

    let controller = Controller::with_config(config_with_output(output_dir.clone()))?;

    let summary = controller.convert_folder(&input_dir, false)?;
    assert_eq!(summary, FolderSummary { converted: 2, skipped: 0, failed: 1 });
    assert!(output_dir.join(EXPECTED_DOCUMENT).exists());
    assert!(output_dir.join("Bo - Second Book.tex").exists());

    let rerun = controller.convert_folder(&input_dir, false)?;
    assert_eq!(rerun, FolderSummary { converted: 0, skipped: 2, failed: 1 });

    let log = fs::read_to_string(output_dir.join("kindle-latex.log"))?;
    assert_eq!(log.lines().count(), 2);
    Ok(())
}

/// Test that an empty folder is reported as an error
#[test]
fn test_convertFolder_withNoPages_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::with_config(config_with_output(temp_dir.path().join("tex")))?;

    assert!(controller.convert_folder(temp_dir.path(), false).is_err());
    Ok(())
}

/// Test that a page with a duplicated note element is rejected
#[test]
fn test_convertFile_withDuplicatedNote_shouldReportExtractionError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let html = common::notes_page_html("by ann", "doubles", &[("Passage", "one</span><span class=\"noteContent\">two")]);
    let page = common::create_test_file(temp_dir.path(), "doubles.html", &html)?;
    let controller = Controller::with_config(config_with_output(temp_dir.path().join("tex")))?;

    assert!(matches!(
        controller.convert_file(&page, false),
        Err(AppError::Extraction(ExtractionError::DuplicatePart { row: 0, part: "note", count: 2 }))
    ));
    Ok(())
}

/// Test that books by one author with non-Latin titles get separate documents
#[test]
fn test_convertFolder_withCyrillicTitles_shouldWriteOneDocumentEach() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input_dir = temp_dir.path().join("pages");
    fs::create_dir_all(&input_dir)?;
    let output_dir = temp_dir.path().join("tex");

    let karenina = common::notes_page_html("by Лев Толстой", "Анна Каренина", &[("Все счастливые семьи", "")]);
    let war_and_peace = common::notes_page_html("by Лев Толстой", "Война и мир", &[("Eh bien, mon prince", "")]);
    common::create_test_file(&input_dir, "a.html", &karenina)?;
    common::create_test_file(&input_dir, "b.html", &war_and_peace)?;

    let controller = Controller::with_config(config_with_output(output_dir.clone()))?;
    let summary = controller.convert_folder(&input_dir, false)?;

    assert_eq!(summary, FolderSummary { converted: 2, skipped: 0, failed: 0 });
    let documents = kindle_latex::file_utils::FileManager::find_files(&output_dir, &["tex"])?;
    assert_eq!(documents.len(), 2);
    Ok(())
}

/// Test renaming a page after its book, then renaming it again
#[test]
fn test_renamePage_runTwice_shouldRenameOnce() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let page = common::create_test_notes_page(temp_dir.path(), "000.html")?;
    let controller = Controller::with_config(config_with_output(temp_dir.path().join("tex")))?;

    let renamed = controller.rename_page(&page)?;

    assert_eq!(renamed, temp_dir.path().join("Jane Doe - Thinking In Systems -- A Primer.html"));
    assert!(renamed.is_file());
    assert!(!page.exists());

    assert_eq!(controller.rename_page(&renamed)?, renamed);
    Ok(())
}

/// Test that renaming never replaces another page
#[test]
fn test_renamePage_withSameBookTwice_shouldNotOverwrite() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let first = common::create_test_notes_page(temp_dir.path(), "first.html")?;
    let second = common::create_test_notes_page(temp_dir.path(), "second.html")?;
    let controller = Controller::with_config(config_with_output(temp_dir.path().join("tex")))?;

    controller.rename_page(&first)?;

    assert!(matches!(controller.rename_page(&second), Err(AppError::File(_))));
    assert!(second.is_file());
    Ok(())
}

/// Test that only saved notes pages are renamed
#[test]
fn test_renamePage_withTextFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let notes = common::create_test_file(temp_dir.path(), "notes.txt", "plain")?;
    let controller = Controller::with_config(config_with_output(temp_dir.path().join("tex")))?;

    assert!(matches!(controller.rename_page(&notes), Err(AppError::File(_))));
    assert!(notes.is_file());
    Ok(())
}

/// Test folder renaming counts renamed, unchanged and failed pages
#[test]
fn test_renameFolder_withMixedPages_shouldSummarize() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input_dir = temp_dir.path().join("pages");
    fs::create_dir_all(&input_dir)?;

    common::create_test_notes_page(&input_dir, "a.html")?;
    let other = common::notes_page_html("by bo", "second book", &[("Only line", "")]);
    common::create_test_file(&input_dir, "b.html", &other)?;
    common::create_test_file(&input_dir, "c.html", "<html><body>no notes here</body></html>")?;

    let controller = Controller::with_config(config_with_output(temp_dir.path().join("tex")))?;

    let summary = controller.rename_folder(&input_dir)?;
    assert_eq!(summary, RenameSummary { renamed: 2, unchanged: 0, failed: 1 });
    assert!(input_dir.join("Bo - Second Book.html").is_file());

    let rerun = controller.rename_folder(&input_dir)?;
    assert_eq!(rerun, RenameSummary { renamed: 0, unchanged: 2, failed: 1 });
    Ok(())
}
