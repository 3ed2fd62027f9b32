#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use sword_xml::{ReportVisitor, Severity, ValidationReport};
use sword_xml::report::ChildGroup;

/// Test fixture paths
pub struct TestFixtures {
    pub fixtures_dir: PathBuf,
}

impl TestFixtures {
    pub fn new() -> Self {
        let fixtures_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures");

        Self { fixtures_dir }
    }

    pub fn xml_valid_dir(&self) -> PathBuf {
        self.fixtures_dir.join("xml").join("valid")
    }

    pub fn xml_invalid_dir(&self) -> PathBuf {
        self.fixtures_dir.join("xml").join("invalid")
    }

    pub fn xml_malformed_dir(&self) -> PathBuf {
        self.fixtures_dir.join("xml").join("malformed")
    }

    pub fn configs_dir(&self) -> PathBuf {
        self.fixtures_dir.join("configs")
    }

    pub fn service(&self) -> PathBuf {
        self.xml_valid_dir().join("service.xml")
    }

    pub fn deposit_receipt(&self) -> PathBuf {
        self.xml_valid_dir().join("deposit_receipt.xml")
    }

    pub fn error_document(&self) -> PathBuf {
        self.xml_valid_dir().join("error_document.xml")
    }

    pub fn bad_service(&self) -> PathBuf {
        self.xml_invalid_dir().join("bad_service.xml")
    }

    pub fn incomplete_collection(&self) -> PathBuf {
        self.xml_invalid_dir().join("incomplete_collection.xml")
    }

    pub fn author_without_name(&self) -> PathBuf {
        self.xml_invalid_dir().join("author_without_name.xml")
    }

    pub fn not_well_formed(&self) -> PathBuf {
        self.xml_malformed_dir().join("not_well_formed.xml")
    }

    pub fn relaxed_config(&self) -> PathBuf {
        self.configs_dir().join("relaxed.toml")
    }

    pub fn read(&self, path: &Path) -> String {
        fs::read_to_string(path)
            .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e))
    }
}

/// Write `files` (name, content) below `dir`, creating parent directories.
pub fn create_documents(dir: &Path, files: &[(&str, &str)]) -> Vec<PathBuf> {
    files
        .iter()
        .map(|(name, content)| {
            let path = dir.join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&path, content).unwrap();
            path
        })
        .collect()
}

/// A finding found anywhere in a report tree.
#[derive(Debug, Clone)]
pub struct Finding {
    pub subject: String,
    pub severity: Severity,
    pub message: String,
    pub group: Option<ChildGroup>,
}

#[derive(Default)]
struct Collector {
    findings: Vec<Finding>,
}

impl ReportVisitor for Collector {
    fn enter(&mut self, node: &ValidationReport, group: Option<ChildGroup>, _depth: usize) {
        self.findings.push(Finding {
            subject: node.subject().to_string(),
            severity: node.severity(),
            message: node.message().to_string(),
            group,
        });
    }
}

/// Every node of `report`, depth first.
pub fn findings(report: &ValidationReport) -> Vec<Finding> {
    let mut collector = Collector::default();
    report.walk(&mut collector);
    collector.findings
}

/// Findings about `subject` (qualified name, e.g. `"sword:level"`).
pub fn findings_for(report: &ValidationReport, subject: &str) -> Vec<Finding> {
    findings(report)
        .into_iter()
        .filter(|finding| finding.subject == subject)
        .collect()
}

/// Highest severity among the findings about `subject`.
pub fn worst_for(report: &ValidationReport, subject: &str) -> Option<Severity> {
    findings_for(report, subject)
        .into_iter()
        .map(|finding| finding.severity)
        .max()
}
