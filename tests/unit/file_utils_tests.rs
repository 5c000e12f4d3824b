/*!
 * Tests for file utility functions
 */

use std::fs;
use std::path::Path;
use anyhow::Result;
use kindle_latex::file_utils::{FileManager, NOTES_PAGE_EXTENSIONS};
use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "test_file_exists.tmp", "test content")?;

    assert!(FileManager::file_exists(&test_file));

    Ok(())
}

/// Test that file_exists returns false for non-existent files
#[test]
fn test_file_exists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_file.tmp"));
}

/// Test that dir_exists returns false for non-existent directories
#[test]
fn test_dir_exists_withNonExistentDir_shouldReturnFalse() {
    assert!(!FileManager::dir_exists("./non_existent_directory_12345"));
}

/// Test that generate_output_path creates the correct path
#[test]
fn test_generate_output_path_withValidInputs_shouldCreateCorrectPath() {
    let output_path = FileManager::generate_output_path("/tmp/output", "Jane Doe - A Title", "tex");

    assert_eq!(output_path, Path::new("/tmp/output/Jane Doe - A Title.tex"));
}

/// Test that path separators in a stem stay inside the output directory
#[test]
fn test_generate_output_path_withSlashInStem_shouldSanitize() {
    let output_path = FileManager::generate_output_path("/tmp/output", "AC/DC - Live", "tex");

    assert_eq!(output_path, Path::new("/tmp/output/AC-DC - Live.tex"));
}

/// Test that ensure_dir creates directories as needed
#[test]
fn test_ensure_dir_withNonExistentDir_shouldCreateDirectory() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_subdir = temp_dir.path().join("a").join("b");

    FileManager::ensure_dir(&test_subdir)?;

    assert!(test_subdir.is_dir());

    Ok(())
}

/// Test that find_files only returns notes pages, in name order
#[test]
fn test_find_files_withMixedFiles_shouldReturnHtmlOnly() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("nested");
    fs::create_dir_all(&nested)?;

    common::create_test_file(temp_dir.path(), "b.html", "")?;
    common::create_test_file(temp_dir.path(), "a.HTM", "")?;
    common::create_test_file(temp_dir.path(), "notes.txt", "")?;
    common::create_test_file(&nested, "c.html", "")?;

    let found = FileManager::find_files(temp_dir.path(), &NOTES_PAGE_EXTENSIONS)?;
    let names: Vec<String> = found
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();

    assert_eq!(names.len(), 3);
    assert!(names.contains(&"a.HTM".to_string()));
    assert!(names.contains(&"b.html".to_string()));
    assert!(names.contains(&"c.html".to_string()));
    assert!(!names.contains(&"notes.txt".to_string()));

    Ok(())
}

/// Test that read_to_string returns file content correctly
#[test]
fn test_read_to_string_withValidFile_shouldReturnContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let content = "Hello, World!";
    let test_file = common::create_test_file(temp_dir.path(), "test_read_file.tmp", content)?;

    assert_eq!(FileManager::read_to_string(&test_file)?, content);

    Ok(())
}

/// Test that write_atomically creates parents and writes the content
#[test]
fn test_write_atomically_withNewPath_shouldCreateFileWithContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = temp_dir.path().join("out").join("doc.tex");

    FileManager::write_atomically(&test_file, "\\begin{document}")?;

    assert_eq!(fs::read_to_string(&test_file)?, "\\begin{document}");
    assert_eq!(fs::read_dir(temp_dir.path().join("out"))?.count(), 1);

    Ok(())
}

/// Test that append_to_log_file keeps earlier lines
#[test]
fn test_append_to_log_file_calledTwice_shouldKeepBothLines() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let log_file = temp_dir.path().join("run.log");

    FileManager::append_to_log_file(&log_file, "first")?;
    FileManager::append_to_log_file(&log_file, "second")?;

    let content = fs::read_to_string(&log_file)?;
    assert_eq!(content.lines().count(), 2);
    assert!(content.lines().next().unwrap().ends_with("first"));

    Ok(())
}

/// Test notes page detection by extension
#[test]
fn test_is_notes_page_shouldCheckExtension() {
    assert!(FileManager::is_notes_page("book.html"));
    assert!(FileManager::is_notes_page("book.HTM"));
    assert!(!FileManager::is_notes_page("book.tex"));
    assert!(!FileManager::is_notes_page("book"));
}
