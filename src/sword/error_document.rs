use std::ops::{Deref, DerefMut};

use crate::atom::entry::EntryRules;
use crate::config::ValidationConfig;
use crate::dom::XmlElement;
use crate::element::{SwordElement, check_attributes, expect_element};
use crate::error::Result;
use crate::name::QualifiedName;
use crate::namespaces::error_codes::{in_error_namespace, is_known};
use crate::namespaces::{NS_SWORD, PREFIX_SWORD};
use crate::policy::{FieldState, Requirement, attribute_finding, text_state};
use crate::report::ValidationReport;
use crate::sword::entry::SwordEntry;

pub const ATTRIBUTE_HREF: &str = "href";

/// `sword:error`, returned instead of a deposit receipt when a deposit fails.
///
/// The body has the same fields as a [`SwordEntry`] but none of them are
/// expected. The `href` attribute names the error code.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorDocument {
    pub error_uri: Option<String>,
    pub body: SwordEntry,
}

impl Deref for ErrorDocument {
    type Target = SwordEntry;

    fn deref(&self) -> &SwordEntry {
        &self.body
    }
}

impl DerefMut for ErrorDocument {
    fn deref_mut(&mut self) -> &mut SwordEntry {
        &mut self.body
    }
}

impl ErrorDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// An error document for one of the codes in
    /// [`error_codes`](crate::namespaces::error_codes), or any other URI.
    pub fn with_code(error_uri: impl Into<String>) -> Self {
        Self {
            error_uri: Some(error_uri.into()),
            body: SwordEntry::new(),
        }
    }

    pub fn name() -> QualifiedName {
        QualifiedName::new(PREFIX_SWORD, "error", NS_SWORD)
    }

    /// A URI that claims the protocol error namespace must be one of its
    /// codes. Anything outside that namespace is accepted as-is.
    fn error_uri_state(&self) -> FieldState {
        match self.error_uri.as_deref() {
            Some(uri) if in_error_namespace(uri) && !is_known(uri) => FieldState::Invalid,
            uri => text_state(uri),
        }
    }
}

impl SwordElement for ErrorDocument {
    fn element_name(&self) -> QualifiedName {
        Self::name()
    }

    fn marshal(&self) -> XmlElement {
        let mut element = XmlElement::new(Self::name());
        if let Some(uri) = &self.error_uri {
            element.set_attribute(QualifiedName::unqualified(ATTRIBUTE_HREF), uri.as_str());
        }
        self.body.marshal_children(&mut element);
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
        check_attributes(&mut report, element, &[ATTRIBUTE_HREF], config);
        self.error_uri = element.attribute(ATTRIBUTE_HREF).map(str::to_string);
        self.body.populate_children(&mut report, element, config);
        Ok(report)
    }

    fn validate(&self, config: &ValidationConfig) -> ValidationReport {
        let mut report = ValidationReport::for_element(Self::name());
        report.add_attribute_validation(attribute_finding(
            &QualifiedName::unqualified(ATTRIBUTE_HREF),
            Requirement::Recommended,
            self.error_uri_state(),
            self.error_uri.as_deref(),
        ));
        self.body
            .validate_fields(&EntryRules::ERROR_BODY, &mut report, config);
        report.summarize();
        report
    }
}
