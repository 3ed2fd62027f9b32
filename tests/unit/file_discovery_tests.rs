use std::collections::HashSet;
use std::fs;

use tempfile::TempDir;

use crate::common::test_helpers::{TestFixtures, create_documents};
use sword_xml::FileDiscovery;

const DOCUMENT: &str = r#"<service xmlns="http://www.w3.org/2007/app"/>"#;

fn file_names(files: &[std::path::PathBuf]) -> HashSet<String> {
    files
        .iter()
        .map(|f| f.file_name().unwrap().to_string_lossy().to_string())
        .collect()
}

#[test]
fn test_fixture_tree_discovery() {
    let fixtures = TestFixtures::new();
    let files = FileDiscovery::new()
        .discover_files(&fixtures.fixtures_dir)
        .unwrap();

    let names = file_names(&files);
    assert_eq!(files.len(), 8);
    assert!(names.contains("service.xml"));
    assert!(names.contains("not_well_formed.xml"));
    assert!(!names.contains("relaxed.toml"));
}

#[test]
fn test_custom_extensions() {
    let temp_dir = TempDir::new().unwrap();
    create_documents(
        temp_dir.path(),
        &[
            ("service.xml", DOCUMENT),
            ("receipt.atom", DOCUMENT),
            ("notes.txt", "text"),
        ],
    );

    let discovery =
        FileDiscovery::new().with_extensions(vec!["xml".to_string(), "atom".to_string()]);
    let files = discovery.discover_files(temp_dir.path()).unwrap();

    assert_eq!(
        file_names(&files),
        HashSet::from(["service.xml".to_string(), "receipt.atom".to_string()])
    );
}

#[test]
fn test_include_and_exclude_together() {
    let temp_dir = TempDir::new().unwrap();
    create_documents(
        temp_dir.path(),
        &[
            ("responses/service.xml", DOCUMENT),
            ("responses/archive/old.xml", DOCUMENT),
            ("requests/entry.xml", DOCUMENT),
        ],
    );

    let discovery = FileDiscovery::new()
        .with_include_patterns(vec!["**/responses/**".to_string()])
        .unwrap()
        .with_exclude_patterns(vec!["**/archive/**".to_string()])
        .unwrap();
    let files = discovery.discover_files(temp_dir.path()).unwrap();

    assert_eq!(
        file_names(&files),
        HashSet::from(["service.xml".to_string()])
    );
}

#[test]
fn test_hidden_and_ignored_files_are_walked() {
    let temp_dir = TempDir::new().unwrap();
    create_documents(
        temp_dir.path(),
        &[(".hidden/service.xml", DOCUMENT), ("skipped.xml", DOCUMENT)],
    );
    fs::write(temp_dir.path().join(".gitignore"), "skipped.xml\n").unwrap();

    let files = FileDiscovery::new().discover_files(temp_dir.path()).unwrap();
    assert_eq!(files.len(), 2);
}

#[test]
fn test_max_depth_zero_keeps_top_level_only() {
    let temp_dir = TempDir::new().unwrap();
    create_documents(
        temp_dir.path(),
        &[("top.xml", DOCUMENT), ("nested/deeper.xml", DOCUMENT)],
    );

    let files = FileDiscovery::new()
        .with_max_depth(Some(0))
        .discover_files(temp_dir.path())
        .unwrap();
    assert_eq!(file_names(&files), HashSet::from(["top.xml".to_string()]));
}

#[test]
fn test_single_file_with_other_extension() {
    let temp_dir = TempDir::new().unwrap();
    let paths = create_documents(temp_dir.path(), &[("notes.txt", "text")]);

    let files = FileDiscovery::new().discover_files(&paths[0]).unwrap();
    assert!(files.is_empty());
}
