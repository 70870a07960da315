/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use std::path::Path;
use vttlate::file_utils::{FileManager, SUBTITLE_EXTENSION};

use crate::common;

#[test]
fn test_generate_output_path_shouldInsertLanguageBeforeExtension() {
    let output = FileManager::generate_output_path("/subs/episode.vtt", "/out", "en", SUBTITLE_EXTENSION);
    assert_eq!(output, Path::new("/out/episode.en.vtt"));
}

#[test]
fn test_is_subtitle_file_shouldMatchVttCaseInsensitively() {
    assert!(FileManager::is_subtitle_file("a.vtt"));
    assert!(FileManager::is_subtitle_file("a.VTT"));
    assert!(!FileManager::is_subtitle_file("a.srt"));
    assert!(!FileManager::is_subtitle_file("vtt"));
}

#[test]
fn test_find_files_withNestedDirectories_shouldFindSortedMatches() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("season1");
    FileManager::ensure_dir(&nested)?;

    common::create_test_subtitle(temp_dir.path(), "b.vtt")?;
    common::create_test_subtitle(temp_dir.path(), "a.vtt")?;
    common::create_test_subtitle(&nested, "c.vtt")?;
    common::create_test_file(temp_dir.path(), "notes.txt", "not a subtitle")?;

    let files = FileManager::find_files(temp_dir.path(), "vtt")?;
    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();

    assert_eq!(files.len(), 3);
    assert!(names.contains(&"c.vtt".to_string()));
    assert_eq!(&names[..2], &["a.vtt".to_string(), "b.vtt".to_string()]);
    Ok(())
}

#[test]
fn test_write_to_file_withMissingParent_shouldCreateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("deep").join("dir").join("out.vtt");

    FileManager::write_to_file(&path, "WEBVTT\n")?;
    assert!(FileManager::file_exists(&path));
    assert_eq!(FileManager::read_to_string(&path)?, "WEBVTT\n");
    Ok(())
}

#[test]
fn test_read_to_string_withMissingFile_shouldFail() {
    assert!(FileManager::read_to_string("/definitely/not/here.vtt").is_err());
}
