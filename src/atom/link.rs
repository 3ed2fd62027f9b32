use crate::config::ValidationConfig;
use crate::dom::XmlElement;
use crate::element::{SwordElement, check_attributes, expect_element, skip_unknown};
use crate::error::Result;
use crate::name::QualifiedName;
use crate::namespaces::{NS_ATOM, PREFIX_ATOM};
use crate::policy::{FieldState, Requirement, attribute_finding, text_state};
use crate::report::ValidationReport;

pub const ATTRIBUTE_HREF: &str = "href";
pub const ATTRIBUTE_REL: &str = "rel";
pub const ATTRIBUTE_TYPE: &str = "type";
pub const ATTRIBUTE_HREF_LANG: &str = "hreflang";
pub const ATTRIBUTE_TITLE: &str = "title";
pub const ATTRIBUTE_LENGTH: &str = "length";

const KNOWN_ATTRIBUTES: [&str; 6] = [
    ATTRIBUTE_HREF,
    ATTRIBUTE_REL,
    ATTRIBUTE_TYPE,
    ATTRIBUTE_HREF_LANG,
    ATTRIBUTE_TITLE,
    ATTRIBUTE_LENGTH,
];

/// `atom:link`. Everything lives in attributes; `href` is the only one a
/// link cannot do without.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Link {
    pub href: Option<String>,
    pub rel: Option<String>,
    pub media_type: Option<String>,
    pub href_lang: Option<String>,
    pub title: Option<String>,
    pub length: Option<String>,
}

impl Link {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to(href: impl Into<String>) -> Self {
        Self {
            href: Some(href.into()),
            ..Self::default()
        }
    }

    pub fn name() -> QualifiedName {
        QualifiedName::new(PREFIX_ATOM, "link", NS_ATOM)
    }

    fn fields(&self) -> [(&'static str, &Option<String>); 6] {
        [
            (ATTRIBUTE_HREF, &self.href),
            (ATTRIBUTE_REL, &self.rel),
            (ATTRIBUTE_TYPE, &self.media_type),
            (ATTRIBUTE_HREF_LANG, &self.href_lang),
            (ATTRIBUTE_TITLE, &self.title),
            (ATTRIBUTE_LENGTH, &self.length),
        ]
    }
}

impl SwordElement for Link {
    fn element_name(&self) -> QualifiedName {
        Self::name()
    }

    fn marshal(&self) -> XmlElement {
        let mut element = XmlElement::new(Self::name());
        for (attribute, value) in self.fields() {
            if let Some(value) = value {
                element.set_attribute(QualifiedName::unqualified(attribute), value.as_str());
            }
        }
        element
    }

    fn populate(
        &mut self,
        element: &XmlElement,
        config: &ValidationConfig,
    ) -> Result<ValidationReport> {
        expect_element(element, &Self::name())?;

        let mut report = ValidationReport::for_element(Self::name());
        check_attributes(&mut report, element, &KNOWN_ATTRIBUTES, config);

        let read = |attribute: &str| element.attribute(attribute).map(str::to_string);
        *self = Self {
            href: read(ATTRIBUTE_HREF),
            rel: read(ATTRIBUTE_REL),
            media_type: read(ATTRIBUTE_TYPE),
            href_lang: read(ATTRIBUTE_HREF_LANG),
            title: read(ATTRIBUTE_TITLE),
            length: read(ATTRIBUTE_LENGTH),
        };

        for child in element.child_elements() {
            skip_unknown(&mut report, child, config);
        }
        Ok(report)
    }

    fn validate(&self, _config: &ValidationConfig) -> ValidationReport {
        let mut report = ValidationReport::for_element(Self::name());
        report.add_attribute_validation(attribute_finding(
            &QualifiedName::unqualified(ATTRIBUTE_HREF),
            Requirement::Required,
            text_state(self.href.as_deref()),
            self.href.as_deref(),
        ));

        for (attribute, value) in self.fields().into_iter().skip(1) {
            let state = match (attribute, value.as_deref()) {
                (ATTRIBUTE_LENGTH, Some(length)) if length.trim().parse::<u64>().is_err() => {
                    FieldState::Incomplete
                }
                (_, value) => text_state(value),
            };
            report.add_attribute_validation(attribute_finding(
                &QualifiedName::unqualified(attribute),
                Requirement::Optional,
                state,
                value.as_deref(),
            ));
        }
        report.summarize();
        report
    }
}
