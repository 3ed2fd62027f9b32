use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::atom::generator::Generator;
use crate::atom::link::Link;
use crate::atom::person::{Author, Contributor, Person, PersonRole};
use crate::atom::text::{Rights, Summary, TextConstruct, TextRole, Title};
use crate::config::ValidationConfig;
use crate::dom::XmlElement;
use crate::element::{
    SwordElement, check_attributes, dispatch, expect_element, keep_findings, read_child,
    skip_unknown, validate_child, validate_children,
};
use crate::error::Result;
use crate::leaf::{
    CategoryKind, IdKind, LeafKind, PublishedKind, UpdatedKind, read_leaf, write_leaf,
};
use crate::name::QualifiedName;
use crate::namespaces::{NS_ATOM, PREFIX_ATOM};
use crate::policy::{FieldState, Requirement, element_finding, text_state};
use crate::report::ValidationReport;

/// Format used for `atom:published` and `atom:updated` values we generate.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// How strictly each common entry field is checked.
///
/// A deposit receipt and the body of an error document carry the same
/// fields but an error document may leave all of them out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryRules {
    pub id: Requirement,
    pub title: Requirement,
    pub authors: Requirement,
    pub contributors: Requirement,
    pub categories: Requirement,
    pub links: Requirement,
    pub published: Requirement,
    pub updated: Requirement,
    pub rights: Requirement,
    pub summary: Requirement,
    pub generator: Requirement,
}

impl EntryRules {
    pub const DEPOSIT_RECEIPT: EntryRules = EntryRules {
        id: Requirement::Recommended,
        title: Requirement::Required,
        authors: Requirement::Optional,
        contributors: Requirement::Optional,
        categories: Requirement::Recommended,
        links: Requirement::Optional,
        published: Requirement::Recommended,
        updated: Requirement::Recommended,
        rights: Requirement::Optional,
        summary: Requirement::Optional,
        generator: Requirement::Required,
    };

    pub const ERROR_BODY: EntryRules = EntryRules {
        id: Requirement::Optional,
        title: Requirement::Optional,
        authors: Requirement::Optional,
        contributors: Requirement::Optional,
        categories: Requirement::Optional,
        links: Requirement::Optional,
        published: Requirement::Optional,
        updated: Requirement::Optional,
        rights: Requirement::Optional,
        summary: Requirement::Optional,
        generator: Requirement::Optional,
    };
}

#[derive(Debug, Clone, Copy)]
enum EntryChild {
    Id,
    Title,
    Author,
    Contributor,
    Category,
    Link,
    Published,
    Updated,
    Rights,
    Summary,
    Generator,
}

const ENTRY_CHILDREN: &[(&str, &str, EntryChild)] = &[
    ("id", NS_ATOM, EntryChild::Id),
    ("title", NS_ATOM, EntryChild::Title),
    ("author", NS_ATOM, EntryChild::Author),
    ("contributor", NS_ATOM, EntryChild::Contributor),
    ("category", NS_ATOM, EntryChild::Category),
    ("link", NS_ATOM, EntryChild::Link),
    ("published", NS_ATOM, EntryChild::Published),
    ("updated", NS_ATOM, EntryChild::Updated),
    ("rights", NS_ATOM, EntryChild::Rights),
    ("summary", NS_ATOM, EntryChild::Summary),
    ("generator", NS_ATOM, EntryChild::Generator),
];

/// The fields every `atom:entry` carries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entry {
    pub id: Option<String>,
    pub title: Option<Title>,
    pub authors: Vec<Author>,
    pub contributors: Vec<Contributor>,
    categories: Vec<String>,
    pub links: Vec<Link>,
    pub published: Option<String>,
    pub updated: Option<String>,
    pub rights: Option<Rights>,
    pub summary: Option<Summary>,
    pub generator: Option<Generator>,
}

impl Entry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name() -> QualifiedName {
        QualifiedName::new(PREFIX_ATOM, "entry", NS_ATOM)
    }

    /// Format `at` the way entry timestamps are written.
    pub fn timestamp(at: DateTime<Utc>) -> String {
        at.format(TIMESTAMP_FORMAT).to_string()
    }

    /// A fresh `urn:uuid:` identifier for a new entry.
    pub fn generated_id() -> String {
        format!("urn:uuid:{}", Uuid::new_v4())
    }

    pub fn set_published_at(&mut self, at: DateTime<Utc>) {
        self.published = Some(Self::timestamp(at));
    }

    pub fn set_updated_at(&mut self, at: DateTime<Utc>) {
        self.updated = Some(Self::timestamp(at));
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Add a category label. Labels already present are not repeated.
    pub fn add_category(&mut self, category: impl Into<String>) {
        let category = category.into();
        if !self.categories.contains(&category) {
            self.categories.push(category);
        }
    }

    pub fn clear_categories(&mut self) {
        self.categories.clear();
    }

    /// Append the entry fields to `element` in their fixed order.
    pub(crate) fn marshal_children(&self, element: &mut XmlElement) {
        write_leaf::<IdKind>(element, self.id.as_ref());
        if let Some(title) = &self.title {
            element.push_element(title.marshal());
        }
        for author in &self.authors {
            element.push_element(author.marshal());
        }
        for contributor in &self.contributors {
            element.push_element(contributor.marshal());
        }
        for category in &self.categories {
            write_leaf::<CategoryKind>(element, Some(category));
        }
        for link in &self.links {
            element.push_element(link.marshal());
        }
        write_leaf::<PublishedKind>(element, self.published.as_ref());
        write_leaf::<UpdatedKind>(element, self.updated.as_ref());
        if let Some(rights) = &self.rights {
            element.push_element(rights.marshal());
        }
        if let Some(summary) = &self.summary {
            element.push_element(summary.marshal());
        }
        if let Some(generator) = &self.generator {
            element.push_element(generator.marshal());
        }
    }

    /// Read `child` into the matching field. Returns `false` when the child
    /// is not an entry field.
    pub(crate) fn populate_child(
        &mut self,
        report: &mut ValidationReport,
        child: &XmlElement,
        config: &ValidationConfig,
    ) -> bool {
        let Some(kind) = dispatch(ENTRY_CHILDREN, child) else {
            return false;
        };
        match kind {
            EntryChild::Id => self.id = read_leaf::<IdKind>(report, child, config),
            EntryChild::Published => {
                self.published = read_leaf::<PublishedKind>(report, child, config)
            }
            EntryChild::Updated => {
                self.updated = read_leaf::<UpdatedKind>(report, child, config)
            }
            EntryChild::Category => {
                if let Some(category) = read_leaf::<CategoryKind>(report, child, config) {
                    self.add_category(category);
                }
            }
            EntryChild::Title => {
                self.title = Some(read_text(report, TextRole::Title, child, config))
            }
            EntryChild::Rights => {
                self.rights = Some(read_text(report, TextRole::Rights, child, config))
            }
            EntryChild::Summary => {
                self.summary = Some(read_text(report, TextRole::Summary, child, config))
            }
            EntryChild::Author => {
                let mut author = Person::new(PersonRole::Author);
                keep_findings(report, read_child(&mut author, child, config));
                self.authors.push(author);
            }
            EntryChild::Contributor => {
                let mut contributor = Person::new(PersonRole::Contributor);
                keep_findings(report, read_child(&mut contributor, child, config));
                self.contributors.push(contributor);
            }
            EntryChild::Link => {
                let mut link = Link::new();
                keep_findings(report, read_child(&mut link, child, config));
                self.links.push(link);
            }
            EntryChild::Generator => {
                let mut generator = Generator::new();
                keep_findings(report, read_child(&mut generator, child, config));
                self.generator = Some(generator);
            }
        }
        true
    }

    /// Add one finding per entry field to `report`.
    pub(crate) fn validate_fields(
        &self,
        rules: &EntryRules,
        report: &mut ValidationReport,
        config: &ValidationConfig,
    ) {
        report.add_element_validation(element_finding(
            &IdKind::name(),
            rules.id,
            text_state(self.id.as_deref()),
            self.id.as_deref(),
        ));
        validate_child(
            report,
            TextConstruct::title().element_name(),
            rules.title,
            self.title.as_ref(),
            config,
        );
        validate_children(
            report,
            Person::author().element_name(),
            rules.authors,
            &self.authors,
            config,
        );
        validate_children(
            report,
            Person::contributor().element_name(),
            rules.contributors,
            &self.contributors,
            config,
        );

        if self.categories.is_empty() {
            report.add_element_validation(element_finding(
                &CategoryKind::name(),
                rules.categories,
                FieldState::Absent,
                None,
            ));
        }
        for category in &self.categories {
            report.add_element_validation(element_finding(
                &CategoryKind::name(),
                rules.categories,
                text_state(Some(category)),
                Some(category),
            ));
        }

        validate_children(report, Link::name(), rules.links, &self.links, config);
        report.add_element_validation(element_finding(
            &PublishedKind::name(),
            rules.published,
            text_state(self.published.as_deref()),
            self.published.as_deref(),
        ));
        report.add_element_validation(element_finding(
            &UpdatedKind::name(),
            rules.updated,
            text_state(self.updated.as_deref()),
            self.updated.as_deref(),
        ));
        validate_child(
            report,
            TextConstruct::rights().element_name(),
            rules.rights,
            self.rights.as_ref(),
            config,
        );
        validate_child(
            report,
            TextConstruct::summary().element_name(),
            rules.summary,
            self.summary.as_ref(),
            config,
        );
        validate_child(
            report,
            Generator::name(),
            rules.generator,
            self.generator.as_ref(),
            config,
        );
    }
}

fn read_text(
    report: &mut ValidationReport,
    role: TextRole,
    child: &XmlElement,
    config: &ValidationConfig,
) -> TextConstruct {
    let mut text = TextConstruct::new(role);
    keep_findings(report, read_child(&mut text, child, config));
    text
}

impl SwordElement for Entry {
    fn element_name(&self) -> QualifiedName {
        Self::name()
    }

    fn marshal(&self) -> XmlElement {
        let mut element = XmlElement::new(Self::name());
        self.marshal_children(&mut element);
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
        check_attributes(&mut report, element, &[], config);
        for child in element.child_elements() {
            if !self.populate_child(&mut report, child, config) {
                skip_unknown(&mut report, child, config);
            }
        }
        Ok(report)
    }

    fn validate(&self, config: &ValidationConfig) -> ValidationReport {
        let mut report = ValidationReport::for_element(Self::name());
        self.validate_fields(&EntryRules::DEPOSIT_RECEIPT, &mut report, config);
        report.summarize();
        report
    }
}
