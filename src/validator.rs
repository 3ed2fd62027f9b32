//! Batch validation of documents on disk.
//!
//! Each file is read, unmarshalled and validated independently, so the work
//! is spread over a rayon pool and the results are collected in input order.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::config::ValidationConfig;
use crate::document::Document;
use crate::error::{Result, SwordError};
use crate::file_discovery::FileDiscovery;
use crate::report::{Severity, SeverityTally, ValidationReport};

/// Options for a batch run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineConfig {
    /// Worker threads (None = one per core)
    pub threads: Option<usize>,
    /// Keep the re-marshalled document of every file
    pub marshal: bool,
    pub validation: ValidationConfig,
}

/// Outcome of checking a single file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationStatus {
    /// Report is VALID or INFO
    Valid,
    /// Report is WARNING
    Warning { warning_count: usize },
    /// Report is ERROR
    Invalid { error_count: usize },
    /// The file could not be read or is not a supported document
    Error { message: String },
}

impl ValidationStatus {
    fn from_report(report: &ValidationReport) -> Self {
        let tally = report.tally();
        match report.severity() {
            Severity::Valid | Severity::Info => ValidationStatus::Valid,
            Severity::Warning => ValidationStatus::Warning {
                warning_count: tally.warning,
            },
            Severity::Error => ValidationStatus::Invalid {
                error_count: tally.error,
            },
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationStatus::Valid)
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, ValidationStatus::Warning { .. })
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, ValidationStatus::Invalid { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ValidationStatus::Error { .. })
    }
}

/// Result of checking a single file
#[derive(Debug, Clone)]
pub struct FileValidationResult {
    pub path: PathBuf,
    pub status: ValidationStatus,
    /// Document kind, e.g. `"service"`, once the root was recognised
    pub document_kind: Option<&'static str>,
    /// Combined unmarshal and validation findings
    pub report: Option<ValidationReport>,
    /// The document written back out, when requested
    pub marshalled: Option<String>,
    pub duration: Duration,
}

impl FileValidationResult {
    pub fn checked(
        path: PathBuf,
        document: &Document,
        report: ValidationReport,
        marshalled: Option<String>,
        duration: Duration,
    ) -> Self {
        Self {
            path,
            status: ValidationStatus::from_report(&report),
            document_kind: Some(document.kind()),
            report: Some(report),
            marshalled,
            duration,
        }
    }

    pub fn error(path: PathBuf, error: SwordError, duration: Duration) -> Self {
        Self {
            path,
            status: ValidationStatus::Error {
                message: error.to_string(),
            },
            document_kind: None,
            report: None,
            marshalled: None,
            duration,
        }
    }
}

/// Aggregated results of a batch run
#[derive(Debug, Clone, Default)]
pub struct ValidationResults {
    pub total_files: usize,
    pub valid_files: usize,
    pub warning_files: usize,
    pub invalid_files: usize,
    pub error_files: usize,
    pub total_duration: Duration,
    /// Node counts over every report in the run
    pub findings: SeverityTally,
    pub file_results: Vec<FileValidationResult>,
}

impl ValidationResults {
    pub fn aggregate(file_results: Vec<FileValidationResult>, total_duration: Duration) -> Self {
        let mut results = ValidationResults {
            total_files: file_results.len(),
            total_duration,
            ..Default::default()
        };

        for result in &file_results {
            match result.status {
                ValidationStatus::Valid => results.valid_files += 1,
                ValidationStatus::Warning { .. } => results.warning_files += 1,
                ValidationStatus::Invalid { .. } => results.invalid_files += 1,
                ValidationStatus::Error { .. } => results.error_files += 1,
            }
            if let Some(report) = &result.report {
                let tally = report.tally();
                results.findings.valid += tally.valid;
                results.findings.info += tally.info;
                results.findings.warning += tally.warning;
                results.findings.error += tally.error;
            }
        }

        results.file_results = file_results;
        results
    }

    pub fn all_valid(&self) -> bool {
        self.valid_files == self.total_files && self.total_files > 0
    }

    pub fn has_errors(&self) -> bool {
        self.error_files > 0 || self.invalid_files > 0
    }

    pub fn has_warnings(&self) -> bool {
        self.warning_files > 0
    }

    pub fn success_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.valid_files as f64 / self.total_files as f64) * 100.0
        }
    }

    /// 0 when everything passed, 1 when a document failed (or warned, in
    /// strict mode), 2 when a file could not be processed at all.
    pub fn exit_code(&self, strict: bool) -> i32 {
        if self.error_files > 0 {
            2
        } else if self.invalid_files > 0 || (strict && self.has_warnings()) {
            1
        } else {
            0
        }
    }
}

/// Runs documents through unmarshal and validation in parallel
#[derive(Debug, Clone, Default)]
pub struct ValidationEngine {
    config: EngineConfig,
}

impl ValidationEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Discover and check every matching file below `path`
    pub fn validate_path(
        &self,
        path: &Path,
        file_discovery: &FileDiscovery,
    ) -> Result<ValidationResults> {
        let files = file_discovery.discover_files(path)?;
        tracing::info!(count = files.len(), "discovered documents");
        self.validate_files(&files)
    }

    /// Check `files`, keeping their order in the results
    pub fn validate_files(&self, files: &[PathBuf]) -> Result<ValidationResults> {
        let start = Instant::now();

        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(threads) = self.config.threads {
            builder = builder.num_threads(threads);
        }
        let pool = builder
            .build()
            .map_err(|e| SwordError::Config(format!("Failed to start worker pool: {}", e)))?;

        let file_results: Vec<FileValidationResult> = pool.install(|| {
            files
                .par_iter()
                .map(|path| self.validate_file(path))
                .collect()
        });

        Ok(ValidationResults::aggregate(file_results, start.elapsed()))
    }

    /// Check a single file. Failures end up in the result, never as `Err`.
    pub fn validate_file(&self, path: &Path) -> FileValidationResult {
        let start = Instant::now();
        match self.check(path) {
            Ok((document, report, marshalled)) => {
                tracing::debug!(
                    file = %path.display(),
                    kind = document.kind(),
                    severity = %report.severity(),
                    "checked document"
                );
                FileValidationResult::checked(
                    path.to_path_buf(),
                    &document,
                    report,
                    marshalled,
                    start.elapsed(),
                )
            }
            Err(error) => {
                tracing::warn!(file = %path.display(), error = %error, "could not check document");
                FileValidationResult::error(path.to_path_buf(), error, start.elapsed())
            }
        }
    }

    fn check(&self, path: &Path) -> Result<(Document, ValidationReport, Option<String>)> {
        let xml = std::fs::read_to_string(path)?;
        let (document, report) =
            Document::parse(&xml, &self.config.validation).map_err(|error| match error {
                SwordError::Io(_) | SwordError::DocumentFailed { .. } => error,
                other => SwordError::DocumentFailed {
                    file: path.to_path_buf(),
                    details: other.to_string(),
                },
            })?;
        let marshalled = if self.config.marshal {
            Some(document.to_xml(true)?)
        } else {
            None
        };
        Ok((document, report, marshalled))
    }
}
