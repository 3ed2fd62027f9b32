//! Hierarchical validation report.
//!
//! A [`ValidationReport`] mirrors the XML structure it describes. Each node
//! keeps four ordered groups of child findings and its own severity is kept at
//! or above the maximum severity of every child: pushing a child can only raise
//! the parent, never lower it.

use std::fmt;

use serde::Serialize;

use crate::name::QualifiedName;

/// Finding severity, totally ordered `Valid < Info < Warning < Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    #[default]
    Valid,
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Valid => "VALID",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a finding is about an element or one of its attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectKind {
    Element,
    Attribute,
}

/// The four child groups of a report node, in traversal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChildGroup {
    AttributeValidation,
    AttributeUnmarshal,
    ElementValidation,
    ElementUnmarshal,
}

impl ChildGroup {
    pub const ALL: [ChildGroup; 4] = [
        ChildGroup::AttributeValidation,
        ChildGroup::AttributeUnmarshal,
        ChildGroup::ElementValidation,
        ChildGroup::ElementUnmarshal,
    ];
}

pub const MSG_VALID: &str = "Valid";
pub const MSG_CONTAINS_INFO: &str = "Contains informational findings";
pub const MSG_CONTAINS_WARNINGS: &str = "Contains warnings";
pub const MSG_CONTAINS_ERRORS: &str = "Contains errors";

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    severity: Severity,
    subject: QualifiedName,
    kind: SubjectKind,
    message: String,
    content: Option<String>,
    attribute_validation: Vec<ValidationReport>,
    attribute_unmarshal: Vec<ValidationReport>,
    element_validation: Vec<ValidationReport>,
    element_unmarshal: Vec<ValidationReport>,
}

impl ValidationReport {
    /// A VALID node about an element, ready to collect child findings.
    pub fn for_element(subject: QualifiedName) -> Self {
        Self::new(subject, SubjectKind::Element, Severity::Valid, MSG_VALID)
    }

    pub fn element(subject: QualifiedName, severity: Severity, message: impl Into<String>) -> Self {
        Self::new(subject, SubjectKind::Element, severity, message)
    }

    pub fn attribute(
        subject: QualifiedName,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self::new(subject, SubjectKind::Attribute, severity, message)
    }

    fn new(
        subject: QualifiedName,
        kind: SubjectKind,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            subject,
            kind,
            message: message.into(),
            content: None,
            attribute_validation: Vec::new(),
            attribute_unmarshal: Vec::new(),
            element_validation: Vec::new(),
            element_unmarshal: Vec::new(),
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn subject(&self) -> &QualifiedName {
        &self.subject
    }

    pub fn kind(&self) -> SubjectKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn is_valid(&self) -> bool {
        self.severity == Severity::Valid
    }

    pub fn children(&self, group: ChildGroup) -> &[ValidationReport] {
        match group {
            ChildGroup::AttributeValidation => &self.attribute_validation,
            ChildGroup::AttributeUnmarshal => &self.attribute_unmarshal,
            ChildGroup::ElementValidation => &self.element_validation,
            ChildGroup::ElementUnmarshal => &self.element_unmarshal,
        }
    }

    /// Children of every group, in traversal order.
    pub fn all_children(&self) -> impl Iterator<Item = (ChildGroup, &ValidationReport)> {
        ChildGroup::ALL
            .into_iter()
            .flat_map(move |group| self.children(group).iter().map(move |child| (group, child)))
    }

    /// Raise this node to at least `severity`, replacing the message when the
    /// severity actually increases.
    pub fn raise(&mut self, severity: Severity, message: impl Into<String>) {
        if severity > self.severity {
            self.severity = severity;
            self.message = message.into();
        }
    }

    pub fn push(&mut self, group: ChildGroup, child: ValidationReport) {
        self.severity = self.severity.max(child.severity);
        match group {
            ChildGroup::AttributeValidation => self.attribute_validation.push(child),
            ChildGroup::AttributeUnmarshal => self.attribute_unmarshal.push(child),
            ChildGroup::ElementValidation => self.element_validation.push(child),
            ChildGroup::ElementUnmarshal => self.element_unmarshal.push(child),
        }
    }

    pub fn add_attribute_validation(&mut self, child: ValidationReport) {
        self.push(ChildGroup::AttributeValidation, child);
    }

    pub fn add_attribute_unmarshal(&mut self, child: ValidationReport) {
        self.push(ChildGroup::AttributeUnmarshal, child);
    }

    pub fn add_element_validation(&mut self, child: ValidationReport) {
        self.push(ChildGroup::ElementValidation, child);
    }

    pub fn add_element_unmarshal(&mut self, child: ValidationReport) {
        self.push(ChildGroup::ElementUnmarshal, child);
    }

    /// Fold another report about the same subject into this one.
    pub fn merge(&mut self, other: ValidationReport) {
        let ValidationReport {
            severity,
            message,
            content,
            attribute_validation,
            attribute_unmarshal,
            element_validation,
            element_unmarshal,
            ..
        } = other;

        if self.content.is_none() {
            self.content = content;
        }
        for child in attribute_validation {
            self.add_attribute_validation(child);
        }
        for child in attribute_unmarshal {
            self.add_attribute_unmarshal(child);
        }
        for child in element_validation {
            self.add_element_validation(child);
        }
        for child in element_unmarshal {
            self.add_element_unmarshal(child);
        }
        self.raise(severity, message);
        self.summarize();
    }

    /// Recompute every severity bottom-up from the leaves. Nodes built only
    /// through [`push`](Self::push) already satisfy the invariant; this is
    /// for trees assembled by other means.
    pub fn aggregate(&mut self) -> Severity {
        let mut max = self.severity;
        for group in ChildGroup::ALL {
            let children = match group {
                ChildGroup::AttributeValidation => &mut self.attribute_validation,
                ChildGroup::AttributeUnmarshal => &mut self.attribute_unmarshal,
                ChildGroup::ElementValidation => &mut self.element_validation,
                ChildGroup::ElementUnmarshal => &mut self.element_unmarshal,
            };
            for child in children.iter_mut() {
                max = max.max(child.aggregate());
            }
        }
        self.severity = max;
        max
    }

    /// Set a generic message for a container node whose severity came from
    /// its children.
    pub fn summarize(&mut self) {
        if self.message == MSG_VALID
            || self.message == MSG_CONTAINS_INFO
            || self.message == MSG_CONTAINS_WARNINGS
        {
            self.message = match self.severity {
                Severity::Valid => MSG_VALID,
                Severity::Info => MSG_CONTAINS_INFO,
                Severity::Warning => MSG_CONTAINS_WARNINGS,
                Severity::Error => MSG_CONTAINS_ERRORS,
            }
            .to_string();
        }
    }

    /// Depth-first traversal.
    pub fn walk<V: ReportVisitor + ?Sized>(&self, visitor: &mut V) {
        self.walk_inner(visitor, None, 0);
    }

    fn walk_inner<V: ReportVisitor + ?Sized>(
        &self,
        visitor: &mut V,
        group: Option<ChildGroup>,
        depth: usize,
    ) {
        visitor.enter(self, group, depth);
        for (group, child) in self.all_children() {
            child.walk_inner(visitor, Some(group), depth + 1);
        }
        visitor.leave(self, group, depth);
    }

    /// Count of nodes per severity in the whole tree.
    pub fn tally(&self) -> SeverityTally {
        let mut tally = SeverityTally::default();
        self.walk(&mut tally);
        tally
    }
}

/// Visitor over a report tree. `group` is `None` for the node the walk
/// started from.
pub trait ReportVisitor {
    fn enter(&mut self, node: &ValidationReport, group: Option<ChildGroup>, depth: usize);

    fn leave(&mut self, _node: &ValidationReport, _group: Option<ChildGroup>, _depth: usize) {}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityTally {
    pub valid: usize,
    pub info: usize,
    pub warning: usize,
    pub error: usize,
}

impl SeverityTally {
    pub fn total(&self) -> usize {
        self.valid + self.info + self.warning + self.error
    }
}

impl ReportVisitor for SeverityTally {
    fn enter(&mut self, node: &ValidationReport, _group: Option<ChildGroup>, _depth: usize) {
        match node.severity() {
            Severity::Valid => self.valid += 1,
            Severity::Info => self.info += 1,
            Severity::Warning => self.warning += 1,
            Severity::Error => self.error += 1,
        }
    }
}
