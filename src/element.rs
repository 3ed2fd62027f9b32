//! The contract shared by every protocol element, plus the helpers composites
//! use to recognise their children.

use crate::config::ValidationConfig;
use crate::dom::XmlElement;
use crate::error::{Result, SwordError};
use crate::name::QualifiedName;
use crate::namespaces::NS_XML;
use crate::policy::{FieldState, Requirement, apply_to_child, element_finding};
use crate::report::{Severity, ValidationReport};

pub const MSG_UNKNOWN_ELEMENT: &str = "Element is not part of the vocabulary and was skipped";
pub const MSG_UNKNOWN_ATTRIBUTE: &str = "Attribute is not part of the vocabulary";
pub const MSG_CHILD_FAILED: &str = "Child element could not be read";

/// Marshal, unmarshal and validate.
///
/// `populate` only reads the element and returns what went wrong while
/// reading it. `validate` derives a report from the current field values,
/// whatever their origin. `unmarshal` does both and returns one report.
pub trait SwordElement {
    /// The qualified name this element is written with and recognised by.
    fn element_name(&self) -> QualifiedName;

    fn marshal(&self) -> XmlElement;

    /// Read `element` into this value.
    ///
    /// Fails only when `element` is not the expected element at all. Any other
    /// problem becomes a finding in the returned report.
    fn populate(&mut self, element: &XmlElement, config: &ValidationConfig)
    -> Result<ValidationReport>;

    fn validate(&self, config: &ValidationConfig) -> ValidationReport;

    fn unmarshal(
        &mut self,
        element: &XmlElement,
        config: &ValidationConfig,
    ) -> Result<ValidationReport> {
        let mut report = self.populate(element, config)?;
        report.merge(self.validate(config));
        Ok(report)
    }
}

/// The hard failure for a composite handed the wrong element.
pub fn expect_element(element: &XmlElement, expected: &QualifiedName) -> Result<()> {
    if element.name() == expected {
        Ok(())
    } else {
        Err(SwordError::WrongElement {
            expected: expected.clone(),
            found: element.name().clone(),
        })
    }
}

/// Look up which field a child element belongs to.
pub fn dispatch<K: Copy>(table: &[(&str, &str, K)], element: &XmlElement) -> Option<K> {
    table
        .iter()
        .find(|(local, namespace, _)| element.name().matches(local, namespace))
        .map(|(_, _, kind)| *kind)
}

/// Record a child element no field claimed.
pub fn skip_unknown(report: &mut ValidationReport, element: &XmlElement, config: &ValidationConfig) {
    if config.report_unknown_elements {
        report.add_element_unmarshal(ValidationReport::element(
            element.name().clone(),
            Severity::Info,
            MSG_UNKNOWN_ELEMENT,
        ));
    }
}

/// Report every attribute of `element` whose local name is not in `known`.
/// Namespace declarations never reach here and `xml:*` attributes are
/// always accepted.
pub fn check_attributes(
    report: &mut ValidationReport,
    element: &XmlElement,
    known: &[&str],
    config: &ValidationConfig,
) {
    if !config.report_extension_attributes {
        return;
    }
    for attribute in element.attributes() {
        let name = &attribute.name;
        if name.namespace() == NS_XML {
            continue;
        }
        if name.namespace().is_empty() && known.contains(&name.local_name()) {
            continue;
        }
        report.add_attribute_unmarshal(
            ValidationReport::attribute(name.clone(), Severity::Info, MSG_UNKNOWN_ATTRIBUTE)
                .with_content(attribute.value.as_str()),
        );
    }
}

/// Unmarshal a child element, turning a hard failure into an ERROR finding
/// so the rest of the parent can still be read.
pub fn read_child<T: SwordElement>(
    target: &mut T,
    element: &XmlElement,
    config: &ValidationConfig,
) -> ValidationReport {
    match target.populate(element, config) {
        Ok(report) => report,
        Err(err) => ValidationReport::element(
            element.name().clone(),
            Severity::Error,
            format!("{}: {}", MSG_CHILD_FAILED, err),
        ),
    }
}

/// Keep the unmarshal findings of a child only when they say something.
pub fn keep_findings(report: &mut ValidationReport, child: ValidationReport) {
    if !child.is_valid() || child.all_children().next().is_some() {
        report.add_element_unmarshal(child);
    }
}

/// Validate an optional child composite under `requirement`.
pub fn validate_child<T: SwordElement>(
    report: &mut ValidationReport,
    name: QualifiedName,
    requirement: Requirement,
    child: Option<&T>,
    config: &ValidationConfig,
) {
    let finding = match child {
        Some(child) => apply_to_child(requirement, child.validate(config)),
        None => element_finding(&name, requirement, FieldState::Absent, None),
    };
    report.add_element_validation(finding);
}

/// Validate a repeated child composite. An empty list counts as absent.
pub fn validate_children<T: SwordElement>(
    report: &mut ValidationReport,
    name: QualifiedName,
    requirement: Requirement,
    children: &[T],
    config: &ValidationConfig,
) {
    if children.is_empty() {
        report.add_element_validation(element_finding(
            &name,
            requirement,
            FieldState::Absent,
            None,
        ));
    }
    for child in children {
        report.add_element_validation(apply_to_child(requirement, child.validate(config)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_document;
    use crate::namespaces::{NS_APP, NS_ATOM, NS_SWORD};
    use crate::report::ChildGroup;

    #[derive(Clone, Copy, Debug, PartialEq)]
    enum Field {
        Verbose,
        Workspace,
    }

    const TABLE: &[(&str, &str, Field)] = &[
        ("verbose", NS_SWORD, Field::Verbose),
        ("workspace", NS_APP, Field::Workspace),
    ];

    #[test]
    fn test_dispatch_by_name_and_namespace() {
        let root = parse_document(
            r#"<service xmlns="http://www.w3.org/2007/app" xmlns:sword="http://purl.org/net/sword/" xmlns:atom="http://www.w3.org/2005/Atom">
                 <sword:verbose>true</sword:verbose><workspace/><atom:verbose/>
               </service>"#,
        )
        .unwrap();
        let kinds: Vec<_> = root.child_elements().map(|c| dispatch(TABLE, c)).collect();
        assert_eq!(kinds, vec![Some(Field::Verbose), Some(Field::Workspace), None]);
    }

    #[test]
    fn test_expect_element_mismatch() {
        let root = parse_document(r#"<entry xmlns="http://www.w3.org/2005/Atom"/>"#).unwrap();
        let expected = QualifiedName::new("", "collection", NS_APP);
        let err = expect_element(&root, &expected).unwrap_err();
        assert!(matches!(err, SwordError::WrongElement { .. }));
        assert!(expect_element(&root, &QualifiedName::new("atom", "entry", NS_ATOM)).is_ok());
    }

    #[test]
    fn test_unknown_elements_reported_only_when_enabled() {
        let root = parse_document(r#"<x xmlns="urn:test"/>"#).unwrap();
        let mut report = ValidationReport::for_element(root.name().clone());

        skip_unknown(&mut report, &root, &ValidationConfig::default());
        assert!(report.is_valid());

        let config = ValidationConfig {
            report_unknown_elements: true,
            ..ValidationConfig::default()
        };
        skip_unknown(&mut report, &root, &config);
        assert_eq!(report.severity(), Severity::Info);
    }

    #[test]
    fn test_attribute_check() {
        let root = parse_document(
            r#"<link xmlns="http://www.w3.org/2005/Atom" href="x" xml:lang="en" test="one"/>"#,
        )
        .unwrap();
        let mut report = ValidationReport::for_element(root.name().clone());
        check_attributes(&mut report, &root, &["href"], &ValidationConfig::default());

        let findings = report.children(ChildGroup::AttributeUnmarshal);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].subject().local_name(), "test");
        assert_eq!(findings[0].content(), Some("one"));
        assert_eq!(report.severity(), Severity::Info);
    }
}
