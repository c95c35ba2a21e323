//! Integration tests for loading page directories as volumes.

use std::fs;
use std::path::Path;

use hocrflow::render::{self, JsonFormat, RenderOptions, VolumeReport};
use hocrflow::{open_volume, Error, PageSelection, ParseOptions, Volume};
use tempfile::TempDir;

const FIXTURE: &str = "tests/fixtures/page_fused.html";
const BLANK: &str = "<div class='ocr_page' title='bbox 0 0 2000 3000'></div>";

/// A volume directory: the fixture as pages 1 and 3, a blank page 2,
/// and a file that is not a page.
fn volume_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    let fixture = fs::read_to_string(FIXTURE).unwrap();
    fs::write(dir.path().join("page_0001.html"), &fixture).unwrap();
    fs::write(dir.path().join("page_0002.html"), BLANK).unwrap();
    fs::write(dir.path().join("page_0003.hocr"), &fixture).unwrap();
    fs::write(dir.path().join("notes.txt"), "not a page").unwrap();
    dir
}

#[test]
fn test_page_files_sorted_and_filtered() {
    let dir = volume_dir();
    let files = Volume::page_files(dir.path()).unwrap();

    let names: Vec<String> = files
        .iter()
        .map(|f| f.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["page_0001.html", "page_0002.html", "page_0003.hocr"]);
}

#[test]
fn test_open_volume_parallel() {
    let dir = volume_dir();
    let volume = open_volume(dir.path(), &ParseOptions::default()).unwrap();

    assert_eq!(volume.page_count(), 3);
    let numbers: Vec<u32> = volume.pages().iter().map(|p| p.number()).collect();
    assert_eq!(numbers, vec![1, 2, 3]);

    assert!(volume.page(2).unwrap().is_blank());
    // Pages are repaired while loading
    assert!(volume.pages().iter().all(|p| p.fused_lines().is_empty()));
    assert_eq!(volume.page(3).unwrap().lines().len(), 14);
}

#[test]
fn test_sequential_matches_parallel() {
    let dir = volume_dir();
    let parallel = open_volume(dir.path(), &ParseOptions::default()).unwrap();
    let sequential = open_volume(dir.path(), &ParseOptions::new().sequential()).unwrap();

    let options = RenderOptions::default();
    assert_eq!(
        render::volume_to_xml(&parallel, &options).unwrap(),
        render::volume_to_xml(&sequential, &options).unwrap()
    );
}

#[test]
fn test_page_selection() {
    let dir = volume_dir();
    let options = ParseOptions::new().with_pages(PageSelection::parse("2-3").unwrap());
    let volume = open_volume(dir.path(), &options).unwrap();

    let numbers: Vec<u32> = volume.pages().iter().map(|p| p.number()).collect();
    assert_eq!(numbers, vec![2, 3]);
    assert!(volume.page(1).is_none());
}

#[test]
fn test_deferred_repair() {
    let dir = volume_dir();
    let mut volume = open_volume(dir.path(), &ParseOptions::new().with_repair(false)).unwrap();

    let detected: usize = volume.pages().iter().map(|p| p.fused_lines().len()).sum();
    assert_eq!(detected, 2);
    assert_eq!(volume.repair_fused_lines().unwrap(), 2);
    assert_eq!(volume.repair_fused_lines().unwrap(), 0);
}

#[test]
fn test_malformed_page_strict_and_lenient() {
    let dir = volume_dir();
    fs::write(dir.path().join("page_0004.html"), "<div class='ocr_page'><span").unwrap();

    let strict = open_volume(dir.path(), &ParseOptions::default());
    assert!(matches!(strict, Err(Error::Xml(_))));

    let volume = open_volume(dir.path(), &ParseOptions::new().lenient()).unwrap();
    assert_eq!(volume.page_count(), 3);
}

#[test]
fn test_volume_name_and_reports() {
    let dir = volume_dir();
    let volume = open_volume(dir.path(), &ParseOptions::default()).unwrap();
    let name = dir
        .path()
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap();
    assert_eq!(volume.name(), name);

    let json = render::volume_to_json(&volume, JsonFormat::Compact).unwrap();
    let report: VolumeReport = serde_json::from_str(&json).unwrap();
    assert_eq!(report.pages.len(), 3);
    assert_eq!(report.pages[0].titles, vec!["EPISTOLA PRIMA."]);
    assert!(report.pages[1].columns.is_empty());

    let text = render::volume_to_text(&volume, &RenderOptions::default()).unwrap();
    assert_eq!(text.matches("ἐπὶ τῇ φιλίᾳ").count(), 2);
}

#[test]
fn test_open_volume_missing_directory() {
    let result = open_volume(Path::new("no/such/volume"), &ParseOptions::default());
    assert!(result.is_err());
}
