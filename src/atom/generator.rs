use crate::config::ValidationConfig;
use crate::dom::{XmlElement, XmlNode};
use crate::element::{SwordElement, check_attributes, expect_element, skip_unknown};
use crate::error::Result;
use crate::name::QualifiedName;
use crate::namespaces::{NS_ATOM, PREFIX_ATOM};
use crate::policy::{Requirement, attribute_finding, element_finding, text_state, uri_state};
use crate::report::ValidationReport;

pub const ATTRIBUTE_URI: &str = "uri";
pub const ATTRIBUTE_VERSION: &str = "version";

/// `atom:generator`, identifying the software that produced a document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Generator {
    pub uri: Option<String>,
    pub version: Option<String>,
    pub content: Option<String>,
}

impl Generator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name() -> QualifiedName {
        QualifiedName::new(PREFIX_ATOM, "generator", NS_ATOM)
    }
}

impl SwordElement for Generator {
    fn element_name(&self) -> QualifiedName {
        Self::name()
    }

    fn marshal(&self) -> XmlElement {
        let mut element = XmlElement::new(Self::name());
        if let Some(uri) = &self.uri {
            element.set_attribute(QualifiedName::unqualified(ATTRIBUTE_URI), uri.as_str());
        }
        if let Some(version) = &self.version {
            element.set_attribute(
                QualifiedName::unqualified(ATTRIBUTE_VERSION),
                version.as_str(),
            );
        }
        if let Some(content) = &self.content {
            element.push_text(content.as_str());
        }
        element
    }

    fn populate(
        &mut self,
        element: &XmlElement,
        config: &ValidationConfig,
    ) -> Result<ValidationReport> {
        expect_element(element, &Self::name())?;
        *self = Self::new();

        let mut report = ValidationReport::for_element(Self::name());
        check_attributes(
            &mut report,
            element,
            &[ATTRIBUTE_URI, ATTRIBUTE_VERSION],
            config,
        );
        self.uri = element.attribute(ATTRIBUTE_URI).map(str::to_string);
        self.version = element.attribute(ATTRIBUTE_VERSION).map(str::to_string);

        for node in element.children() {
            match node {
                XmlNode::Text(text) => self.content = Some(text.clone()),
                XmlNode::Element(child) => skip_unknown(&mut report, child, config),
            }
        }
        Ok(report)
    }

    fn validate(&self, config: &ValidationConfig) -> ValidationReport {
        let mut report = ValidationReport::for_element(Self::name());
        report.add_attribute_validation(attribute_finding(
            &QualifiedName::unqualified(ATTRIBUTE_URI),
            Requirement::Recommended,
            uri_state(self.uri.as_deref(), config.require_absolute_uris),
            self.uri.as_deref(),
        ));
        report.add_attribute_validation(attribute_finding(
            &QualifiedName::unqualified(ATTRIBUTE_VERSION),
            Requirement::Recommended,
            text_state(self.version.as_deref()),
            self.version.as_deref(),
        ));
        report.add_element_validation(element_finding(
            &Self::name(),
            Requirement::Optional,
            text_state(self.content.as_deref()),
            self.content.as_deref(),
        ));
        report.summarize();
        report
    }
}
