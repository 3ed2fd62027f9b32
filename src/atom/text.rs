use std::fmt;
use std::str::FromStr;

use crate::config::ValidationConfig;
use crate::dom::{XmlElement, XmlNode};
use crate::element::{SwordElement, check_attributes, expect_element};
use crate::error::Result;
use crate::name::QualifiedName;
use crate::namespaces::{NS_ATOM, PREFIX_ATOM};
use crate::policy::{FieldState, Requirement, attribute_finding, element_finding, text_state};
use crate::report::{Severity, ValidationReport};

pub const ATTRIBUTE_TYPE: &str = "type";

/// The `type` attribute of an Atom text construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Text,
    Html,
    Xhtml,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Text => "text",
            ContentType::Html => "html",
            ContentType::Xhtml => "xhtml",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "text" => Ok(ContentType::Text),
            "html" => Ok(ContentType::Html),
            "xhtml" => Ok(ContentType::Xhtml),
            other => Err(format!("'{}' is not one of text, html or xhtml", other)),
        }
    }
}

/// Which text construct an element is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRole {
    Title,
    Summary,
    Rights,
}

impl TextRole {
    fn local_name(self) -> &'static str {
        match self {
            TextRole::Title => "title",
            TextRole::Summary => "summary",
            TextRole::Rights => "rights",
        }
    }
}

/// `atom:title`, `atom:summary` or `atom:rights`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextConstruct {
    role: TextRole,
    pub content: Option<String>,
    pub content_type: Option<ContentType>,
}

pub type Title = TextConstruct;
pub type Summary = TextConstruct;
pub type Rights = TextConstruct;

impl TextConstruct {
    pub fn new(role: TextRole) -> Self {
        Self {
            role,
            content: None,
            content_type: None,
        }
    }

    pub fn title() -> Self {
        Self::new(TextRole::Title)
    }

    pub fn summary() -> Self {
        Self::new(TextRole::Summary)
    }

    pub fn rights() -> Self {
        Self::new(TextRole::Rights)
    }

    /// A plain-text construct.
    pub fn text(role: TextRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            content_type: Some(ContentType::Text),
        }
    }

    pub fn role(&self) -> TextRole {
        self.role
    }
}

fn collect_text(element: &XmlElement, out: &mut String) {
    for node in element.children() {
        match node {
            XmlNode::Text(text) => out.push_str(text),
            XmlNode::Element(child) => collect_text(child, out),
        }
    }
}

impl SwordElement for TextConstruct {
    fn element_name(&self) -> QualifiedName {
        QualifiedName::new(PREFIX_ATOM, self.role.local_name(), NS_ATOM)
    }

    fn marshal(&self) -> XmlElement {
        let mut element = XmlElement::new(self.element_name());
        if let Some(content_type) = self.content_type {
            element.set_attribute(
                QualifiedName::unqualified(ATTRIBUTE_TYPE),
                content_type.as_str(),
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
        let name = self.element_name();
        expect_element(element, &name)?;
        *self = Self::new(self.role);

        let mut report = ValidationReport::for_element(name);
        check_attributes(&mut report, element, &[ATTRIBUTE_TYPE], config);

        if let Some(raw) = element.attribute(ATTRIBUTE_TYPE) {
            match raw.parse::<ContentType>() {
                Ok(content_type) => self.content_type = Some(content_type),
                Err(message) => report.add_attribute_unmarshal(
                    ValidationReport::attribute(
                        QualifiedName::unqualified(ATTRIBUTE_TYPE),
                        Severity::Error,
                        message,
                    )
                    .with_content(raw),
                ),
            }
        }

        if element.child_elements().next().is_some() {
            report.add_element_unmarshal(ValidationReport::element(
                element.name().clone(),
                Severity::Info,
                "Markup content was read as plain text",
            ));
        }
        if !element.children().is_empty() {
            let mut content = String::new();
            collect_text(element, &mut content);
            self.content = Some(content);
        }
        Ok(report)
    }

    fn validate(&self, _config: &ValidationConfig) -> ValidationReport {
        let name = self.element_name();
        let mut report = ValidationReport::for_element(name.clone());
        let type_state = match self.content_type {
            Some(_) => FieldState::Complete,
            None => FieldState::Absent,
        };
        let type_text = self.content_type.map(|t| t.as_str());
        report.add_attribute_validation(attribute_finding(
            &QualifiedName::unqualified(ATTRIBUTE_TYPE),
            Requirement::Optional,
            type_state,
            type_text,
        ));
        report.add_element_validation(element_finding(
            &name,
            Requirement::Recommended,
            text_state(self.content.as_deref()),
            self.content.as_deref(),
        ));
        report.summarize();
        report
    }
}
