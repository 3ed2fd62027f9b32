//! Elements that hold a single primitive value, such as
//! `<sword:verbose>true</sword:verbose>`.

use std::fmt;
use std::marker::PhantomData;

use crate::config::ValidationConfig;
use crate::dom::{XmlAttribute, XmlElement, XmlNode};
use crate::element::{SwordElement, keep_findings};
use crate::error::Result;
use crate::name::QualifiedName;
use crate::namespaces::{
    NS_APP, NS_ATOM, NS_DC_TERMS, NS_SWORD, PREFIX_APP, PREFIX_ATOM, PREFIX_DC_TERMS,
    PREFIX_SWORD,
};
use crate::policy::FieldState;
use crate::report::{Severity, ValidationReport};

pub const MSG_WRONG_ELEMENT: &str = "Element does not match the expected name";
pub const MSG_NOT_SINGLE_TEXT: &str = "Element must hold a single text value";
pub const MSG_EMPTY: &str = "Element is present but has no content";
pub const MSG_EXTENSION_ATTRIBUTE: &str = "Attribute is not part of the vocabulary";

/// A primitive that can live in a leaf element.
pub trait LeafValue: Clone + fmt::Debug + PartialEq {
    /// Used in messages, e.g. "boolean".
    const TYPE_NAME: &'static str;

    fn parse_text(text: &str) -> Option<Self>;

    fn to_text(&self) -> String;

    /// Value of an element with no children at all.
    fn empty() -> Option<Self> {
        None
    }

    fn is_blank(&self) -> bool {
        false
    }
}

impl LeafValue for bool {
    const TYPE_NAME: &'static str = "boolean";

    fn parse_text(text: &str) -> Option<Self> {
        match text.trim() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }

    fn to_text(&self) -> String {
        self.to_string()
    }
}

impl LeafValue for i64 {
    const TYPE_NAME: &'static str = "integer";

    fn parse_text(text: &str) -> Option<Self> {
        text.trim().parse().ok()
    }

    fn to_text(&self) -> String {
        self.to_string()
    }
}

impl LeafValue for String {
    const TYPE_NAME: &'static str = "text";

    fn parse_text(text: &str) -> Option<Self> {
        Some(text.to_string())
    }

    fn to_text(&self) -> String {
        self.clone()
    }

    fn empty() -> Option<Self> {
        Some(String::new())
    }

    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

/// Binds a leaf to its qualified name and value type.
pub trait LeafKind {
    type Value: LeafValue;
    const PREFIX: &'static str;
    const LOCAL: &'static str;
    const NAMESPACE: &'static str;

    fn name() -> QualifiedName {
        QualifiedName::new(Self::PREFIX, Self::LOCAL, Self::NAMESPACE)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Leaf<K: LeafKind> {
    content: Option<K::Value>,
    /// Text read from XML that did not parse as `K::Value`.
    malformed: Option<String>,
    attributes: Vec<XmlAttribute>,
    kind: PhantomData<K>,
}

impl<K: LeafKind> Default for Leaf<K> {
    fn default() -> Self {
        Self {
            content: None,
            malformed: None,
            attributes: Vec::new(),
            kind: PhantomData,
        }
    }
}

impl<K: LeafKind> Leaf<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content(content: K::Value) -> Self {
        let mut leaf = Self::new();
        leaf.set_content(content);
        leaf
    }

    pub fn name() -> QualifiedName {
        K::name()
    }

    pub fn content(&self) -> Option<&K::Value> {
        self.content.as_ref()
    }

    pub fn set_content(&mut self, content: K::Value) {
        self.content = Some(content);
        self.malformed = None;
    }

    pub fn clear(&mut self) {
        self.content = None;
        self.malformed = None;
    }

    pub fn into_content(self) -> Option<K::Value> {
        self.content
    }

    /// Text read from XML that was rejected, if any.
    pub fn malformed(&self) -> Option<&str> {
        self.malformed.as_deref()
    }

    /// Attributes found on the element, none of which a leaf defines.
    pub fn attributes(&self) -> &[XmlAttribute] {
        &self.attributes
    }

    fn excerpt(&self) -> Option<String> {
        self.content
            .as_ref()
            .map(LeafValue::to_text)
            .or_else(|| self.malformed.clone())
    }
}

impl<K: LeafKind> SwordElement for Leaf<K> {
    fn element_name(&self) -> QualifiedName {
        K::name()
    }

    fn marshal(&self) -> XmlElement {
        let mut element = XmlElement::new(K::name());
        for attribute in &self.attributes {
            element.set_attribute(attribute.name.clone(), attribute.value.as_str());
        }
        if let Some(content) = &self.content {
            let text = content.to_text();
            if !text.is_empty() {
                element.push_text(text);
            }
        }
        element
    }

    fn populate(
        &mut self,
        element: &XmlElement,
        _config: &ValidationConfig,
    ) -> Result<ValidationReport> {
        let mut report = ValidationReport::for_element(K::name());
        if element.name() != &K::name() {
            report.raise(
                Severity::Error,
                format!("{}: found {}", MSG_WRONG_ELEMENT, element.name()),
            );
            return Ok(report);
        }

        self.clear();
        self.attributes = element.attributes().to_vec();

        match element.children() {
            [] => self.content = K::Value::empty(),
            [XmlNode::Text(text)] if text.trim().is_empty() => {
                self.content = K::Value::parse_text(text).or_else(K::Value::empty)
            }
            [XmlNode::Text(text)] => match K::Value::parse_text(text) {
                Some(value) => self.content = Some(value),
                None => {
                    self.malformed = Some(text.clone());
                    report = report.with_content(text.as_str());
                    report.raise(
                        Severity::Error,
                        format!("Content is not a valid {} value", K::Value::TYPE_NAME),
                    );
                }
            },
            children => {
                let text: String = children
                    .iter()
                    .filter_map(|node| match node {
                        XmlNode::Text(text) => Some(text.as_str()),
                        XmlNode::Element(_) => None,
                    })
                    .collect();
                self.malformed = Some(text);
                report.raise(Severity::Error, MSG_NOT_SINGLE_TEXT);
            }
        }
        Ok(report)
    }

    fn validate(&self, config: &ValidationConfig) -> ValidationReport {
        let mut report = ValidationReport::for_element(K::name());
        if let Some(excerpt) = self.excerpt() {
            report = report.with_content(excerpt);
        }

        if self.malformed.is_some() {
            report.raise(
                Severity::Error,
                format!("Content is not a valid {} value", K::Value::TYPE_NAME),
            );
        } else if self.content.as_ref().is_none_or(LeafValue::is_blank) {
            report.raise(Severity::Warning, MSG_EMPTY);
        }

        if config.report_extension_attributes {
            for attribute in &self.attributes {
                report.add_attribute_validation(
                    ValidationReport::attribute(
                        attribute.name.clone(),
                        Severity::Info,
                        MSG_EXTENSION_ATTRIBUTE,
                    )
                    .with_content(attribute.value.as_str()),
                );
            }
        }
        report
    }
}

/// Unmarshal a leaf child into a plain value, keeping any findings on the
/// parent report.
pub fn read_leaf<K: LeafKind>(
    report: &mut ValidationReport,
    element: &XmlElement,
    config: &ValidationConfig,
) -> Option<K::Value> {
    unmarshal_leaf::<K>(report, element, config).into_content()
}

/// Like [`read_leaf`], recording text that did not parse in `rejected`.
pub fn read_typed_leaf<K: LeafKind>(
    report: &mut ValidationReport,
    element: &XmlElement,
    config: &ValidationConfig,
    rejected: &mut RejectedLeaves,
) -> Option<K::Value> {
    let leaf = unmarshal_leaf::<K>(report, element, config);
    if let Some(text) = leaf.malformed() {
        rejected.record(K::name(), text);
    }
    leaf.into_content()
}

fn unmarshal_leaf<K: LeafKind>(
    report: &mut ValidationReport,
    element: &XmlElement,
    config: &ValidationConfig,
) -> Leaf<K> {
    let mut leaf = Leaf::<K>::new();
    match leaf.unmarshal(element, config) {
        Ok(found) => keep_findings(report, found),
        Err(err) => report.add_element_unmarshal(ValidationReport::element(
            element.name().clone(),
            Severity::Error,
            err.to_string(),
        )),
    }
    leaf
}

/// Text of typed elements a composite read but could not accept, by
/// element name. A field left unset with rejected text validates as
/// [`FieldState::Invalid`] rather than absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RejectedLeaves(Vec<(QualifiedName, String)>);

impl RejectedLeaves {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Remember `text` for `name`, replacing an earlier entry.
    pub fn record(&mut self, name: QualifiedName, text: impl Into<String>) {
        let text = text.into();
        match self.0.iter_mut().find(|(known, _)| *known == name) {
            Some(entry) => entry.1 = text,
            None => self.0.push((name, text)),
        }
    }

    pub fn get(&self, name: &QualifiedName) -> Option<&str> {
        self.0
            .iter()
            .find(|(known, _)| known == name)
            .map(|(_, text)| text.as_str())
    }

    /// State and excerpt of an unset field.
    pub fn unset_state(&self, name: &QualifiedName) -> (FieldState, Option<String>) {
        match self.get(name) {
            Some(text) => (FieldState::Invalid, Some(text.to_string())),
            None => (FieldState::Absent, None),
        }
    }
}

/// Append `<K>value</K>` to `parent` when `value` is set.
pub fn write_leaf<K: LeafKind>(parent: &mut XmlElement, value: Option<&K::Value>) {
    if let Some(value) = value {
        parent.push_element(Leaf::<K>::with_content(value.clone()).marshal());
    }
}

macro_rules! leaf_kinds {
    ($($(#[$meta:meta])* $alias:ident => $kind:ident($value:ty, $prefix:expr, $local:literal, $ns:expr);)*) => {
        $(
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
            pub struct $kind;

            impl LeafKind for $kind {
                type Value = $value;
                const PREFIX: &'static str = $prefix;
                const LOCAL: &'static str = $local;
                const NAMESPACE: &'static str = $ns;
            }

            $(#[$meta])*
            pub type $alias = Leaf<$kind>;
        )*
    };
}

leaf_kinds! {
    /// `sword:version`, the protocol version a server supports.
    SwordVersion => VersionKind(String, PREFIX_SWORD, "version", NS_SWORD);
    SwordVerbose => VerboseKind(bool, PREFIX_SWORD, "verbose", NS_SWORD);
    SwordNoOp => NoOpKind(bool, PREFIX_SWORD, "noOp", NS_SWORD);
    /// `sword:maxUploadSize` in kilobytes.
    SwordMaxUploadSize => MaxUploadSizeKind(i64, PREFIX_SWORD, "maxUploadSize", NS_SWORD);
    SwordLevel => LevelKind(i64, PREFIX_SWORD, "level", NS_SWORD);
    SwordCollectionPolicy => CollectionPolicyKind(String, PREFIX_SWORD, "collectionPolicy", NS_SWORD);
    SwordTreatment => TreatmentKind(String, PREFIX_SWORD, "treatment", NS_SWORD);
    SwordVerboseDescription => VerboseDescriptionKind(String, PREFIX_SWORD, "verboseDescription", NS_SWORD);
    SwordUserAgent => UserAgentKind(String, PREFIX_SWORD, "userAgent", NS_SWORD);
    SwordPackaging => PackagingKind(String, PREFIX_SWORD, "packaging", NS_SWORD);
    /// `sword:service`, a link to a nested service document.
    SwordService => ServiceKind(String, PREFIX_SWORD, "service", NS_SWORD);
    SwordMediation => MediationKind(bool, PREFIX_SWORD, "mediation", NS_SWORD);
    SwordFormatNamespace => FormatNamespaceKind(String, PREFIX_SWORD, "formatNamespace", NS_SWORD);
    DcTermsAbstract => AbstractKind(String, PREFIX_DC_TERMS, "abstract", NS_DC_TERMS);
    /// `app:accept`, a media range a collection takes.
    AppAccept => AcceptKind(String, PREFIX_APP, "accept", NS_APP);
    AtomId => IdKind(String, PREFIX_ATOM, "id", NS_ATOM);
    AtomPublished => PublishedKind(String, PREFIX_ATOM, "published", NS_ATOM);
    AtomUpdated => UpdatedKind(String, PREFIX_ATOM, "updated", NS_ATOM);
    AtomCategory => CategoryKind(String, PREFIX_ATOM, "category", NS_ATOM);
    AtomName => NameKind(String, PREFIX_ATOM, "name", NS_ATOM);
    AtomUri => UriKind(String, PREFIX_ATOM, "uri", NS_ATOM);
    AtomEmail => EmailKind(String, PREFIX_ATOM, "email", NS_ATOM);
}
