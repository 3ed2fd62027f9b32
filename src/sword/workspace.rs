use crate::atom::text::{TextConstruct, TextRole, Title};
use crate::config::ValidationConfig;
use crate::dom::XmlElement;
use crate::element::{
    SwordElement, check_attributes, dispatch, expect_element, keep_findings, read_child,
    skip_unknown, validate_child, validate_children,
};
use crate::error::Result;
use crate::name::QualifiedName;
use crate::namespaces::{NS_APP, NS_ATOM, PREFIX_APP};
use crate::policy::Requirement;
use crate::report::ValidationReport;
use crate::sword::collection::Collection;

#[derive(Debug, Clone, Copy)]
enum WorkspaceChild {
    Title,
    Collection,
}

const WORKSPACE_CHILDREN: &[(&str, &str, WorkspaceChild)] = &[
    ("title", NS_ATOM, WorkspaceChild::Title),
    ("collection", NS_APP, WorkspaceChild::Collection),
];

/// `app:workspace`, a titled group of collections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workspace {
    pub title: Option<Title>,
    pub collections: Vec<Collection>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(TextConstruct::text(TextRole::Title, title)),
            collections: Vec::new(),
        }
    }

    pub fn name() -> QualifiedName {
        QualifiedName::new(PREFIX_APP, "workspace", NS_APP)
    }

    pub fn add_collection(&mut self, collection: Collection) {
        self.collections.push(collection);
    }
}

impl SwordElement for Workspace {
    fn element_name(&self) -> QualifiedName {
        Self::name()
    }

    fn marshal(&self) -> XmlElement {
        let mut element = XmlElement::new(Self::name());
        if let Some(title) = &self.title {
            element.push_element(title.marshal());
        }
        for collection in &self.collections {
            element.push_element(collection.marshal());
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
        check_attributes(&mut report, element, &[], config);
        for child in element.child_elements() {
            match dispatch(WORKSPACE_CHILDREN, child) {
                Some(WorkspaceChild::Title) => {
                    let mut title = TextConstruct::title();
                    keep_findings(&mut report, read_child(&mut title, child, config));
                    self.title = Some(title);
                }
                Some(WorkspaceChild::Collection) => {
                    let mut collection = Collection::new();
                    keep_findings(&mut report, read_child(&mut collection, child, config));
                    self.collections.push(collection);
                }
                None => skip_unknown(&mut report, child, config),
            }
        }
        Ok(report)
    }

    fn validate(&self, config: &ValidationConfig) -> ValidationReport {
        let mut report = ValidationReport::for_element(Self::name());
        validate_child(
            &mut report,
            TextConstruct::title().element_name(),
            Requirement::Optional,
            self.title.as_ref(),
            config,
        );
        validate_children(
            &mut report,
            Collection::name(),
            Requirement::Recommended,
            &self.collections,
            config,
        );
        report.summarize();
        report
    }
}
