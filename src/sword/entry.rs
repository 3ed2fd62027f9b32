use std::ops::{Deref, DerefMut};

use crate::atom::entry::{Entry, EntryRules};
use crate::config::ValidationConfig;
use crate::dom::XmlElement;
use crate::element::{SwordElement, check_attributes, dispatch, expect_element, skip_unknown};
use crate::error::Result;
use crate::leaf::{
    LeafKind, NoOpKind, PackagingKind, RejectedLeaves, TreatmentKind, UserAgentKind,
    VerboseDescriptionKind, read_leaf, read_typed_leaf, write_leaf,
};
use crate::name::QualifiedName;
use crate::namespaces::NS_SWORD;
use crate::policy::{FieldState, Requirement, element_finding, text_state};
use crate::report::ValidationReport;

#[derive(Debug, Clone, Copy)]
enum ExtensionChild {
    Treatment,
    VerboseDescription,
    NoOp,
    UserAgent,
    Packaging,
}

const EXTENSION_CHILDREN: &[(&str, &str, ExtensionChild)] = &[
    ("treatment", NS_SWORD, ExtensionChild::Treatment),
    ("verboseDescription", NS_SWORD, ExtensionChild::VerboseDescription),
    ("noOp", NS_SWORD, ExtensionChild::NoOp),
    ("userAgent", NS_SWORD, ExtensionChild::UserAgent),
    ("packaging", NS_SWORD, ExtensionChild::Packaging),
];

/// An `atom:entry` deposit receipt with the protocol's extension fields.
///
/// Derefs to the common [`Entry`] fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SwordEntry {
    pub entry: Entry,
    pub treatment: Option<String>,
    pub verbose_description: Option<String>,
    /// `None` until explicitly set either way.
    pub no_op: Option<bool>,
    pub user_agent: Option<String>,
    pub packaging: Option<String>,
    /// Typed values the last read could not accept.
    pub rejected: RejectedLeaves,
}

impl Deref for SwordEntry {
    type Target = Entry;

    fn deref(&self) -> &Entry {
        &self.entry
    }
}

impl DerefMut for SwordEntry {
    fn deref_mut(&mut self) -> &mut Entry {
        &mut self.entry
    }
}

impl SwordEntry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn marshal_children(&self, element: &mut XmlElement) {
        self.entry.marshal_children(element);
        write_leaf::<TreatmentKind>(element, self.treatment.as_ref());
        write_leaf::<VerboseDescriptionKind>(element, self.verbose_description.as_ref());
        write_leaf::<NoOpKind>(element, self.no_op.as_ref());
        write_leaf::<UserAgentKind>(element, self.user_agent.as_ref());
        write_leaf::<PackagingKind>(element, self.packaging.as_ref());
    }

    /// Read every child of `element` into the entry and extension fields.
    pub(crate) fn populate_children(
        &mut self,
        report: &mut ValidationReport,
        element: &XmlElement,
        config: &ValidationConfig,
    ) {
        for child in element.child_elements() {
            if self.entry.populate_child(report, child, config) {
                continue;
            }
            match dispatch(EXTENSION_CHILDREN, child) {
                Some(ExtensionChild::Treatment) => {
                    self.treatment = read_leaf::<TreatmentKind>(report, child, config)
                }
                Some(ExtensionChild::VerboseDescription) => {
                    self.verbose_description =
                        read_leaf::<VerboseDescriptionKind>(report, child, config)
                }
                Some(ExtensionChild::NoOp) => {
                    self.no_op =
                        read_typed_leaf::<NoOpKind>(report, child, config, &mut self.rejected)
                }
                Some(ExtensionChild::UserAgent) => {
                    self.user_agent = read_leaf::<UserAgentKind>(report, child, config)
                }
                Some(ExtensionChild::Packaging) => {
                    self.packaging = read_leaf::<PackagingKind>(report, child, config)
                }
                None => skip_unknown(report, child, config),
            }
        }
    }

    pub(crate) fn validate_fields(
        &self,
        rules: &EntryRules,
        report: &mut ValidationReport,
        config: &ValidationConfig,
    ) {
        self.entry.validate_fields(rules, report, config);

        let text_fields = [
            (TreatmentKind::name(), &self.treatment),
            (VerboseDescriptionKind::name(), &self.verbose_description),
        ];
        for (name, value) in text_fields {
            report.add_element_validation(element_finding(
                &name,
                Requirement::Optional,
                text_state(value.as_deref()),
                value.as_deref(),
            ));
        }

        let (no_op_state, no_op) = match self.no_op {
            Some(flag) => (FieldState::Complete, Some(flag.to_string())),
            None => self.rejected.unset_state(&NoOpKind::name()),
        };
        report.add_element_validation(element_finding(
            &NoOpKind::name(),
            Requirement::Optional,
            no_op_state,
            no_op.as_deref(),
        ));

        let text_fields = [
            (UserAgentKind::name(), &self.user_agent),
            (PackagingKind::name(), &self.packaging),
        ];
        for (name, value) in text_fields {
            report.add_element_validation(element_finding(
                &name,
                Requirement::Optional,
                text_state(value.as_deref()),
                value.as_deref(),
            ));
        }
    }
}

impl SwordElement for SwordEntry {
    fn element_name(&self) -> QualifiedName {
        Entry::name()
    }

    fn marshal(&self) -> XmlElement {
        let mut element = XmlElement::new(Entry::name());
        self.marshal_children(&mut element);
        element
    }

    fn populate(
        &mut self,
        element: &XmlElement,
        config: &ValidationConfig,
    ) -> Result<ValidationReport> {
        expect_element(element, &Entry::name())?;
        *self = Self::new();

        let mut report = ValidationReport::for_element(Entry::name());
        check_attributes(&mut report, element, &[], config);
        self.populate_children(&mut report, element, config);
        Ok(report)
    }

    fn validate(&self, config: &ValidationConfig) -> ValidationReport {
        let mut report = ValidationReport::for_element(Entry::name());
        self.validate_fields(&EntryRules::DEPOSIT_RECEIPT, &mut report, config);
        report.summarize();
        report
    }
}
