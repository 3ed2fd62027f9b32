use serde_json::Value;

use crate::common::test_helpers::TestFixtures;
use sword_xml::output::{format_duration, report_to_json};
use sword_xml::{
    Document, EngineConfig, Output, OutputFormat, ValidationConfig, ValidationEngine,
    ValidationResults, VerbosityLevel,
};

fn fixture_results() -> ValidationResults {
    let fixtures = TestFixtures::new();
    let files = vec![
        fixtures.service(),
        fixtures.incomplete_collection(),
        fixtures.bad_service(),
        fixtures.not_well_formed(),
    ];
    ValidationEngine::new(EngineConfig::default())
        .validate_files(&files)
        .unwrap()
}

fn output(verbosity: VerbosityLevel, format: OutputFormat) -> Output {
    Output::new(verbosity, format).with_colors(false)
}

#[test]
fn test_human_normal_output() {
    let text = output(VerbosityLevel::Normal, OutputFormat::Human).format_results(&fixture_results());

    assert!(text.contains("✓ VALID"));
    assert!(text.contains("service.xml (service,"));
    assert!(text.contains("! WARNING"));
    assert!(text.contains("✗ INVALID"));
    assert!(text.contains("ERROR <sword:level>: Compliance level must be 0 or 1 [7]"));
    assert!(text.contains("⚠ ERROR"));
    assert!(text.contains("Total files: 4"));
    assert!(text.contains("Success rate: 25.0%"));
}

#[test]
fn test_human_quiet_output_hides_valid_files() {
    let text = output(VerbosityLevel::Quiet, OutputFormat::Human).format_results(&fixture_results());

    assert!(!text.contains("✓ VALID"));
    assert!(!text.contains("Validation Summary:"));
    assert!(text.contains("bad_service.xml"));
    assert!(!text.contains("INFO"));
}

#[test]
fn test_human_verbose_output_shows_valid_nodes() {
    let text =
        output(VerbosityLevel::Verbose, OutputFormat::Human).format_results(&fixture_results());
    assert!(text.contains("VALID <sword:version>"));
}

#[test]
fn test_json_output() {
    let text = output(VerbosityLevel::Normal, OutputFormat::Json).format_results(&fixture_results());
    let value: Value = serde_json::from_str(&text).unwrap();

    let files = value["files"].as_array().unwrap();
    assert_eq!(files.len(), 4);
    assert_eq!(files[0]["status"], "valid");
    assert_eq!(files[0]["document"], "service");
    assert_eq!(files[0]["report"]["severity"], "VALID");
    assert_eq!(files[1]["status"], "warning");
    assert_eq!(files[2]["status"], "invalid");
    assert_eq!(files[3]["status"], "error");
    assert!(files[3]["report"].is_null());
    assert_eq!(value["summary"]["error_files"], 1);
}

#[test]
fn test_summary_output() {
    let text =
        output(VerbosityLevel::Normal, OutputFormat::Summary).format_results(&fixture_results());
    assert!(text.starts_with("Validation Summary:"));
    assert!(!text.contains("service.xml"));
}

#[test]
fn test_report_json_nests_child_groups() {
    let fixtures = TestFixtures::new();
    let (_, report) = Document::parse(
        &fixtures.read(&fixtures.bad_service()),
        &ValidationConfig::default(),
    )
    .unwrap();

    let value = report_to_json(&report);
    assert_eq!(value["subject"], "service");
    let unmarshal = value["element_unmarshal"].as_array().unwrap();
    assert!(
        unmarshal
            .iter()
            .any(|node| node["subject"] == "sword:level" && node["content"] == "7")
    );
}

#[test]
fn test_duration_formatting() {
    assert_eq!(format_duration(std::time::Duration::from_millis(250)), "250ms");
}
