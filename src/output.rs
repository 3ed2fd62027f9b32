//! Output and Reporting
//!
//! Renders validation reports and batch results as an indented tree, as JSON
//! or as severity counts.

use std::time::Duration;

use serde_json::{Map, Value, json};

use crate::cli::{OutputFormat, VerbosityLevel};
use crate::report::{ChildGroup, ReportVisitor, Severity, SubjectKind, ValidationReport};
use crate::validator::{FileValidationResult, ValidationResults, ValidationStatus};

/// Output formatter for validation results
pub struct Output {
    verbosity: VerbosityLevel,
    format: OutputFormat,
    show_colors: bool,
}

impl Output {
    pub fn new(verbosity: VerbosityLevel, format: OutputFormat) -> Self {
        Self {
            verbosity,
            format,
            show_colors: atty::is(atty::Stream::Stdout),
        }
    }

    pub fn with_colors(mut self, show_colors: bool) -> Self {
        self.show_colors = show_colors;
        self
    }

    fn colorize(&self, text: &str, color: &str) -> String {
        if self.show_colors {
            format!("\x1b[{}m{}\x1b[0m", color, text)
        } else {
            text.to_string()
        }
    }

    fn severity_color(severity: Severity) -> &'static str {
        match severity {
            Severity::Valid => "32",
            Severity::Info => "36",
            Severity::Warning => "33",
            Severity::Error => "31",
        }
    }

    /// Lowest severity a report node needs to be printed.
    fn threshold(&self) -> Severity {
        match self.verbosity {
            VerbosityLevel::Quiet => Severity::Warning,
            VerbosityLevel::Normal => Severity::Info,
            VerbosityLevel::Verbose => Severity::Valid,
        }
    }

    pub fn format_results(&self, results: &ValidationResults) -> String {
        match self.format {
            OutputFormat::Human => self.format_human(results),
            OutputFormat::Json => {
                // Serializing a `Value` cannot fail.
                serde_json::to_string_pretty(&results_to_json(results)).unwrap_or_default()
            }
            OutputFormat::Summary => self.format_summary(results),
        }
    }

    fn format_human(&self, results: &ValidationResults) -> String {
        let mut output = String::new();

        for file_result in &results.file_results {
            if self.verbosity == VerbosityLevel::Quiet && file_result.status.is_valid() {
                continue;
            }
            output.push_str(&self.format_file_result(file_result));
            output.push('\n');
        }

        if self.verbosity != VerbosityLevel::Quiet {
            output.push_str(&self.format_summary(results));
        }
        output
    }

    pub fn format_file_result(&self, result: &FileValidationResult) -> String {
        let path_display = result.path.display();
        let duration_str = format_duration(result.duration);
        let kind = result.document_kind.unwrap_or("unknown");

        let mut output = match &result.status {
            ValidationStatus::Valid => format!(
                "{}  {} ({}, {})",
                self.colorize("✓ VALID", "32"),
                path_display,
                kind,
                duration_str
            ),
            ValidationStatus::Warning { warning_count } => format!(
                "{}  {} ({}, {}) - {} warning{}",
                self.colorize("! WARNING", "33"),
                path_display,
                kind,
                duration_str,
                warning_count,
                if *warning_count == 1 { "" } else { "s" }
            ),
            ValidationStatus::Invalid { error_count } => format!(
                "{}  {} ({}, {}) - {} error{}",
                self.colorize("✗ INVALID", "31"),
                path_display,
                kind,
                duration_str,
                error_count,
                if *error_count == 1 { "" } else { "s" }
            ),
            ValidationStatus::Error { message } => format!(
                "{}  {} ({}) - {}",
                self.colorize("⚠ ERROR", "35"),
                path_display,
                duration_str,
                message
            ),
        };

        if let Some(report) = &result.report {
            let tree = self.format_report(report);
            if !tree.is_empty() {
                output.push('\n');
                output.push_str(tree.trim_end());
            }
        }

        if let Some(marshalled) = &result.marshalled {
            output.push('\n');
            output.push_str(marshalled.trim_end());
        }

        output
    }

    /// Indented tree of the nodes at or above the verbosity threshold.
    pub fn format_report(&self, report: &ValidationReport) -> String {
        let mut printer = TreePrinter {
            output: self,
            threshold: self.threshold(),
            text: String::new(),
        };
        report.walk(&mut printer);
        printer.text
    }

    pub fn format_summary(&self, results: &ValidationResults) -> String {
        let mut output = String::new();
        output.push_str("Validation Summary:\n");
        output.push_str(&format!("  Total files: {}\n", results.total_files));
        output.push_str(&format!(
            "  {} {}\n",
            self.colorize("Valid:", "32"),
            results.valid_files
        ));

        if results.warning_files > 0 {
            output.push_str(&format!(
                "  {} {}\n",
                self.colorize("Warnings:", "33"),
                results.warning_files
            ));
        }
        if results.invalid_files > 0 {
            output.push_str(&format!(
                "  {} {}\n",
                self.colorize("Invalid:", "31"),
                results.invalid_files
            ));
        }
        if results.error_files > 0 {
            output.push_str(&format!(
                "  {} {}\n",
                self.colorize("Errors:", "35"),
                results.error_files
            ));
        }

        let findings = &results.findings;
        output.push_str(&format!(
            "  Findings: {} valid, {} info, {} warning, {} error\n",
            findings.valid, findings.info, findings.warning, findings.error
        ));
        output.push_str(&format!("  Success rate: {:.1}%\n", results.success_rate()));
        output.push_str(&format!(
            "  Duration: {}\n",
            format_duration(results.total_duration)
        ));
        output
    }
}

struct TreePrinter<'a> {
    output: &'a Output,
    threshold: Severity,
    text: String,
}

impl ReportVisitor for TreePrinter<'_> {
    fn enter(&mut self, node: &ValidationReport, _group: Option<ChildGroup>, depth: usize) {
        // Parents are never below their children, so skipping a node
        // skips nothing that would pass the threshold.
        if node.severity() < self.threshold {
            return;
        }

        let severity = node.severity();
        let label = match node.kind() {
            SubjectKind::Element => format!("<{}>", node.subject()),
            SubjectKind::Attribute => format!("@{}", node.subject()),
        };
        self.text.push_str(&"  ".repeat(depth + 1));
        self.text.push_str(
            &self
                .output
                .colorize(severity.as_str(), Output::severity_color(severity)),
        );
        self.text
            .push_str(&format!(" {}: {}", label, node.message()));
        if let Some(content) = node.content() {
            self.text.push_str(&format!(" [{}]", content));
        }
        self.text.push('\n');
    }
}

fn group_key(group: ChildGroup) -> &'static str {
    match group {
        ChildGroup::AttributeValidation => "attribute_validation",
        ChildGroup::AttributeUnmarshal => "attribute_unmarshal",
        ChildGroup::ElementValidation => "element_validation",
        ChildGroup::ElementUnmarshal => "element_unmarshal",
    }
}

/// Builds the JSON tree bottom-up: a node is attached to its parent when
/// the walk leaves it.
#[derive(Default)]
struct JsonBuilder {
    stack: Vec<Map<String, Value>>,
    root: Option<Value>,
}

impl ReportVisitor for JsonBuilder {
    fn enter(&mut self, node: &ValidationReport, _group: Option<ChildGroup>, _depth: usize) {
        let mut object = Map::new();
        object.insert("severity".into(), json!(node.severity()));
        object.insert("subject".into(), json!(node.subject().to_string()));
        object.insert("kind".into(), json!(node.kind()));
        object.insert("message".into(), json!(node.message()));
        if let Some(content) = node.content() {
            object.insert("content".into(), json!(content));
        }
        self.stack.push(object);
    }

    fn leave(&mut self, _node: &ValidationReport, group: Option<ChildGroup>, _depth: usize) {
        let Some(object) = self.stack.pop() else {
            return;
        };
        match (self.stack.last_mut(), group) {
            (Some(parent), Some(group)) => {
                let children = parent
                    .entry(group_key(group))
                    .or_insert_with(|| Value::Array(Vec::new()));
                if let Value::Array(children) = children {
                    children.push(Value::Object(object));
                }
            }
            _ => self.root = Some(Value::Object(object)),
        }
    }
}

/// The report as nested JSON objects. Empty child groups are left out.
pub fn report_to_json(report: &ValidationReport) -> Value {
    let mut builder = JsonBuilder::default();
    report.walk(&mut builder);
    builder.root.unwrap_or(Value::Null)
}

fn file_result_to_json(result: &FileValidationResult) -> Value {
    let mut object = Map::new();
    object.insert("file".into(), json!(result.path.display().to_string()));
    object.insert("document".into(), json!(result.document_kind));
    let status = match &result.status {
        ValidationStatus::Valid => "valid",
        ValidationStatus::Warning { .. } => "warning",
        ValidationStatus::Invalid { .. } => "invalid",
        ValidationStatus::Error { .. } => "error",
    };
    object.insert("status".into(), json!(status));
    if let ValidationStatus::Error { message } = &result.status {
        object.insert("error".into(), json!(message));
    }
    object.insert(
        "duration_ms".into(),
        json!(result.duration.as_millis() as u64),
    );
    if let Some(report) = &result.report {
        object.insert("report".into(), report_to_json(report));
    }
    if let Some(marshalled) = &result.marshalled {
        object.insert("marshalled".into(), json!(marshalled));
    }
    Value::Object(object)
}

pub fn results_to_json(results: &ValidationResults) -> Value {
    json!({
        "files": results.file_results.iter().map(file_result_to_json).collect::<Vec<_>>(),
        "summary": {
            "total_files": results.total_files,
            "valid_files": results.valid_files,
            "warning_files": results.warning_files,
            "invalid_files": results.invalid_files,
            "error_files": results.error_files,
            "findings": results.findings,
            "duration_ms": results.total_duration.as_millis() as u64,
        }
    })
}

pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs_f64();
    if total_secs < 1.0 {
        format!("{}ms", duration.as_millis())
    } else if total_secs < 60.0 {
        format!("{:.2}s", total_secs)
    } else {
        let mins = (total_secs / 60.0) as u64;
        let secs = total_secs % 60.0;
        format!("{}m{:.1}s", mins, secs)
    }
}
