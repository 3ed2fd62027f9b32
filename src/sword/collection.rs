use std::collections::BTreeMap;

use crate::atom::text::{TextConstruct, TextRole, Title};
use crate::config::ValidationConfig;
use crate::dom::XmlElement;
use crate::element::{
    SwordElement, check_attributes, dispatch, expect_element, keep_findings, read_child,
    skip_unknown, validate_child,
};
use crate::error::Result;
use crate::leaf::{
    AbstractKind, AcceptKind, CollectionPolicyKind, FormatNamespaceKind, LeafKind,
    MediationKind, RejectedLeaves, ServiceKind, TreatmentKind, read_leaf, read_typed_leaf,
    write_leaf,
};
use crate::name::QualifiedName;
use crate::namespaces::{NS_APP, NS_ATOM, NS_DC_TERMS, NS_SWORD, PREFIX_APP};
use crate::policy::{
    FieldState, Requirement, attribute_finding, element_finding, text_state, uri_state,
};
use crate::report::ValidationReport;
use crate::sword::accept_packaging::{
    QualityValue, accept_packaging_name, marshal_accept_packaging, read_accept_packaging,
};

pub const ATTRIBUTE_HREF: &str = "href";

#[derive(Debug, Clone, Copy)]
enum CollectionChild {
    Title,
    Accept,
    AcceptPackaging,
    CollectionPolicy,
    Abstract,
    Service,
    Mediation,
    Treatment,
    FormatNamespace,
}

const COLLECTION_CHILDREN: &[(&str, &str, CollectionChild)] = &[
    ("title", NS_ATOM, CollectionChild::Title),
    ("accept", NS_APP, CollectionChild::Accept),
    ("acceptPackaging", NS_SWORD, CollectionChild::AcceptPackaging),
    ("collectionPolicy", NS_SWORD, CollectionChild::CollectionPolicy),
    ("abstract", NS_DC_TERMS, CollectionChild::Abstract),
    ("service", NS_SWORD, CollectionChild::Service),
    ("mediation", NS_SWORD, CollectionChild::Mediation),
    ("treatment", NS_SWORD, CollectionChild::Treatment),
    ("formatNamespace", NS_SWORD, CollectionChild::FormatNamespace),
];

/// `app:collection`, a deposit target inside a workspace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collection {
    /// The `href` attribute: where deposits are sent.
    pub location: Option<String>,
    pub title: Option<Title>,
    pub accepts: Vec<String>,
    /// Packaging format identifier to preference. Adding a format that is
    /// already present replaces its quality.
    pub accept_packaging: BTreeMap<String, QualityValue>,
    pub collection_policy: Option<String>,
    pub dc_abstract: Option<String>,
    /// Location of a nested service document.
    pub service: Option<String>,
    /// `None` until explicitly set either way.
    pub mediation: Option<bool>,
    pub treatment: Option<String>,
    pub format_namespace: Option<String>,
    /// Typed values the last read could not accept.
    pub rejected: RejectedLeaves,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name() -> QualifiedName {
        QualifiedName::new(PREFIX_APP, "collection", NS_APP)
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(TextConstruct::text(TextRole::Title, title));
    }

    pub fn add_accept(&mut self, accept: impl Into<String>) {
        self.accepts.push(accept.into());
    }

    /// Record a packaging format with an explicit quality.
    pub fn add_accept_packaging(&mut self, format: impl Into<String>, quality: f32) -> Result<()> {
        self.accept_packaging
            .insert(format.into(), QualityValue::new(quality)?);
        Ok(())
    }

    /// Record a packaging format with the default quality of 1.0.
    pub fn add_default_accept_packaging(&mut self, format: impl Into<String>) {
        self.accept_packaging
            .insert(format.into(), QualityValue::default());
    }
}

impl SwordElement for Collection {
    fn element_name(&self) -> QualifiedName {
        Self::name()
    }

    fn marshal(&self) -> XmlElement {
        let mut element = XmlElement::new(Self::name());
        if let Some(location) = &self.location {
            element.set_attribute(QualifiedName::unqualified(ATTRIBUTE_HREF), location.as_str());
        }
        if let Some(title) = &self.title {
            element.push_element(title.marshal());
        }
        for accept in &self.accepts {
            write_leaf::<AcceptKind>(&mut element, Some(accept));
        }
        for (format, quality) in &self.accept_packaging {
            element.push_element(marshal_accept_packaging(format, *quality));
        }
        write_leaf::<CollectionPolicyKind>(&mut element, self.collection_policy.as_ref());
        write_leaf::<AbstractKind>(&mut element, self.dc_abstract.as_ref());
        write_leaf::<ServiceKind>(&mut element, self.service.as_ref());
        write_leaf::<MediationKind>(&mut element, self.mediation.as_ref());
        write_leaf::<TreatmentKind>(&mut element, self.treatment.as_ref());
        write_leaf::<FormatNamespaceKind>(&mut element, self.format_namespace.as_ref());
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
        self.location = element.attribute(ATTRIBUTE_HREF).map(str::to_string);

        for child in element.child_elements() {
            let Some(kind) = dispatch(COLLECTION_CHILDREN, child) else {
                skip_unknown(&mut report, child, config);
                continue;
            };
            match kind {
                CollectionChild::Title => {
                    let mut title = TextConstruct::title();
                    keep_findings(&mut report, read_child(&mut title, child, config));
                    self.title = Some(title);
                }
                CollectionChild::Accept => {
                    if let Some(accept) = read_leaf::<AcceptKind>(&mut report, child, config) {
                        self.accepts.push(accept);
                    }
                }
                CollectionChild::AcceptPackaging => {
                    let (found, finding) = read_accept_packaging(child, config);
                    keep_findings(&mut report, finding);
                    if let Some((format, quality)) = found {
                        self.accept_packaging.insert(format, quality);
                    }
                }
                CollectionChild::CollectionPolicy => {
                    self.collection_policy =
                        read_leaf::<CollectionPolicyKind>(&mut report, child, config)
                }
                CollectionChild::Abstract => {
                    self.dc_abstract = read_leaf::<AbstractKind>(&mut report, child, config)
                }
                CollectionChild::Service => {
                    self.service = read_leaf::<ServiceKind>(&mut report, child, config)
                }
                CollectionChild::Mediation => {
                    self.mediation = read_typed_leaf::<MediationKind>(
                        &mut report,
                        child,
                        config,
                        &mut self.rejected,
                    )
                }
                CollectionChild::Treatment => {
                    self.treatment = read_leaf::<TreatmentKind>(&mut report, child, config)
                }
                CollectionChild::FormatNamespace => {
                    self.format_namespace =
                        read_leaf::<FormatNamespaceKind>(&mut report, child, config)
                }
            }
        }
        Ok(report)
    }

    fn validate(&self, config: &ValidationConfig) -> ValidationReport {
        let mut report = ValidationReport::for_element(Self::name());
        report.add_attribute_validation(attribute_finding(
            &QualifiedName::unqualified(ATTRIBUTE_HREF),
            Requirement::Recommended,
            text_state(self.location.as_deref()),
            self.location.as_deref(),
        ));

        validate_child(
            &mut report,
            TextConstruct::title().element_name(),
            Requirement::Optional,
            self.title.as_ref(),
            config,
        );

        if self.accepts.is_empty() {
            report.add_element_validation(element_finding(
                &AcceptKind::name(),
                Requirement::Recommended,
                FieldState::Absent,
                None,
            ));
        }
        for accept in &self.accepts {
            report.add_element_validation(element_finding(
                &AcceptKind::name(),
                Requirement::Recommended,
                text_state(Some(accept)),
                Some(accept),
            ));
        }

        if self.accept_packaging.is_empty() {
            report.add_element_validation(element_finding(
                &accept_packaging_name(),
                Requirement::Optional,
                FieldState::Absent,
                None,
            ));
        }
        for format in self.accept_packaging.keys() {
            report.add_element_validation(element_finding(
                &accept_packaging_name(),
                Requirement::Optional,
                uri_state(Some(format), config.require_absolute_uris),
                Some(format),
            ));
        }

        let optional_text = [
            (CollectionPolicyKind::name(), &self.collection_policy),
            (AbstractKind::name(), &self.dc_abstract),
        ];
        for (name, value) in optional_text {
            report.add_element_validation(element_finding(
                &name,
                Requirement::Optional,
                text_state(value.as_deref()),
                value.as_deref(),
            ));
        }
        report.add_element_validation(element_finding(
            &ServiceKind::name(),
            Requirement::Optional,
            uri_state(self.service.as_deref(), config.require_absolute_uris),
            self.service.as_deref(),
        ));

        let (mediation_state, mediation) = match self.mediation {
            Some(flag) => (FieldState::Complete, Some(flag.to_string())),
            None => self.rejected.unset_state(&MediationKind::name()),
        };
        report.add_element_validation(element_finding(
            &MediationKind::name(),
            Requirement::Recommended,
            mediation_state,
            mediation.as_deref(),
        ));

        let optional_text = [
            (TreatmentKind::name(), &self.treatment),
            (FormatNamespaceKind::name(), &self.format_namespace),
        ];
        for (name, value) in optional_text {
            report.add_element_validation(element_finding(
                &name,
                Requirement::Optional,
                text_state(value.as_deref()),
                value.as_deref(),
            ));
        }

        report.summarize();
        report
    }
}
