//! Whole documents: recognise the root element, read it into the matching
//! type and write it back out.

use crate::atom::Entry;
use crate::config::ValidationConfig;
use crate::dom::{XmlElement, parse_document, to_xml_string};
use crate::element::SwordElement;
use crate::error::{Result, SwordError};
use crate::namespaces::DOCUMENT_BINDINGS;
use crate::report::ValidationReport;
use crate::sword::{Collection, ErrorDocument, Service, SwordEntry, Workspace};

/// Any document that can stand on its own.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Service(Service),
    Workspace(Workspace),
    Collection(Collection),
    Entry(SwordEntry),
    ErrorDocument(ErrorDocument),
}

impl Document {
    /// Parse `xml`, choose the type from the root element and unmarshal it.
    ///
    /// Malformed XML and unknown roots are errors. Everything else ends up in
    /// the returned report.
    pub fn parse(xml: &str, config: &ValidationConfig) -> Result<(Document, ValidationReport)> {
        let root = parse_document(xml)?;
        Self::from_element(&root, config)
    }

    pub fn from_element(
        root: &XmlElement,
        config: &ValidationConfig,
    ) -> Result<(Document, ValidationReport)> {
        let name = root.name();
        if name == &Service::name() {
            let mut service = Service::new();
            let report = service.unmarshal(root, config)?;
            Ok((Document::Service(service), report))
        } else if name == &Workspace::name() {
            let mut workspace = Workspace::new();
            let report = workspace.unmarshal(root, config)?;
            Ok((Document::Workspace(workspace), report))
        } else if name == &Collection::name() {
            let mut collection = Collection::new();
            let report = collection.unmarshal(root, config)?;
            Ok((Document::Collection(collection), report))
        } else if name == &Entry::name() {
            let mut entry = SwordEntry::new();
            let report = entry.unmarshal(root, config)?;
            Ok((Document::Entry(entry), report))
        } else if name == &ErrorDocument::name() {
            let mut error = ErrorDocument::new();
            let report = error.unmarshal(root, config)?;
            Ok((Document::ErrorDocument(error), report))
        } else {
            Err(SwordError::UnsupportedDocument {
                found: name.clone(),
            })
        }
    }

    fn element(&self) -> &dyn SwordElement {
        match self {
            Document::Service(service) => service,
            Document::Workspace(workspace) => workspace,
            Document::Collection(collection) => collection,
            Document::Entry(entry) => entry,
            Document::ErrorDocument(error) => error,
        }
    }

    /// Short label for the kind of document, e.g. `"service"`.
    pub fn kind(&self) -> &'static str {
        match self {
            Document::Service(_) => "service",
            Document::Workspace(_) => "workspace",
            Document::Collection(_) => "collection",
            Document::Entry(_) => "entry",
            Document::ErrorDocument(_) => "error",
        }
    }

    pub fn validate(&self, config: &ValidationConfig) -> ValidationReport {
        self.element().validate(config)
    }

    /// The root element with every vocabulary namespace declared on it.
    pub fn marshal(&self) -> XmlElement {
        let mut root = self.element().marshal();
        for (prefix, uri) in DOCUMENT_BINDINGS {
            root.declare_namespace(prefix, uri);
        }
        root
    }

    pub fn to_xml(&self, pretty: bool) -> Result<String> {
        to_xml_string(&self.marshal(), pretty)
    }
}

impl From<Service> for Document {
    fn from(service: Service) -> Self {
        Document::Service(service)
    }
}

impl From<Workspace> for Document {
    fn from(workspace: Workspace) -> Self {
        Document::Workspace(workspace)
    }
}

impl From<Collection> for Document {
    fn from(collection: Collection) -> Self {
        Document::Collection(collection)
    }
}

impl From<SwordEntry> for Document {
    fn from(entry: SwordEntry) -> Self {
        Document::Entry(entry)
    }
}

impl From<ErrorDocument> for Document {
    fn from(error: ErrorDocument) -> Self {
        Document::ErrorDocument(error)
    }
}
