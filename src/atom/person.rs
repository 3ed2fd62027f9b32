use crate::config::ValidationConfig;
use crate::dom::XmlElement;
use crate::element::{SwordElement, check_attributes, dispatch, expect_element, skip_unknown};
use crate::error::Result;
use crate::leaf::{EmailKind, LeafKind, NameKind, UriKind, read_leaf, write_leaf};
use crate::name::QualifiedName;
use crate::namespaces::{NS_ATOM, PREFIX_ATOM};
use crate::policy::{Requirement, element_finding, text_state, uri_state};
use crate::report::ValidationReport;

/// Which Atom person construct this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonRole {
    Author,
    Contributor,
}

impl PersonRole {
    fn local_name(self) -> &'static str {
        match self {
            PersonRole::Author => "author",
            PersonRole::Contributor => "contributor",
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum PersonChild {
    Name,
    Uri,
    Email,
}

const PERSON_CHILDREN: &[(&str, &str, PersonChild)] = &[
    ("name", NS_ATOM, PersonChild::Name),
    ("uri", NS_ATOM, PersonChild::Uri),
    ("email", NS_ATOM, PersonChild::Email),
];

/// An `atom:author` or `atom:contributor`.
///
/// The name is what makes a person construct meaningful, so a person without
/// one is reported as a placeholder by whoever owns it.
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    role: PersonRole,
    pub name: Option<String>,
    pub uri: Option<String>,
    pub email: Option<String>,
}

pub type Author = Person;
pub type Contributor = Person;

impl Person {
    pub fn new(role: PersonRole) -> Self {
        Self {
            role,
            name: None,
            uri: None,
            email: None,
        }
    }

    pub fn author() -> Self {
        Self::new(PersonRole::Author)
    }

    pub fn contributor() -> Self {
        Self::new(PersonRole::Contributor)
    }

    /// Shorthand for a person with just a name.
    pub fn named(role: PersonRole, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new(role)
        }
    }

    pub fn role(&self) -> PersonRole {
        self.role
    }
}

impl SwordElement for Person {
    fn element_name(&self) -> QualifiedName {
        QualifiedName::new(PREFIX_ATOM, self.role.local_name(), NS_ATOM)
    }

    fn marshal(&self) -> XmlElement {
        let mut element = XmlElement::new(self.element_name());
        write_leaf::<NameKind>(&mut element, self.name.as_ref());
        write_leaf::<UriKind>(&mut element, self.uri.as_ref());
        write_leaf::<EmailKind>(&mut element, self.email.as_ref());
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
        check_attributes(&mut report, element, &[], config);
        for child in element.child_elements() {
            match dispatch(PERSON_CHILDREN, child) {
                Some(PersonChild::Name) => {
                    self.name = read_leaf::<NameKind>(&mut report, child, config)
                }
                Some(PersonChild::Uri) => {
                    self.uri = read_leaf::<UriKind>(&mut report, child, config)
                }
                Some(PersonChild::Email) => {
                    self.email = read_leaf::<EmailKind>(&mut report, child, config)
                }
                None => skip_unknown(&mut report, child, config),
            }
        }
        Ok(report)
    }

    fn validate(&self, config: &ValidationConfig) -> ValidationReport {
        let mut report = ValidationReport::for_element(self.element_name());
        report.add_element_validation(element_finding(
            &NameKind::name(),
            Requirement::Required,
            text_state(self.name.as_deref()),
            self.name.as_deref(),
        ));
        report.add_element_validation(element_finding(
            &UriKind::name(),
            Requirement::Optional,
            uri_state(self.uri.as_deref(), config.require_absolute_uris),
            self.uri.as_deref(),
        ));
        report.add_element_validation(element_finding(
            &EmailKind::name(),
            Requirement::Optional,
            text_state(self.email.as_deref()),
            self.email.as_deref(),
        ));
        report.summarize();
        report
    }
}
