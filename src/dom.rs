//! Owned XML tree used as the marshal target and the unmarshal source.
//!
//! Reading is done with `quick-xml`'s pull parser while tracking namespace
//! scopes, so every element and attribute carries its resolved namespace.
//! Writing goes through `quick-xml`'s [`Writer`].

use std::collections::HashSet;

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::{Result, SwordError};
use crate::name::QualifiedName;
use crate::namespaces::NS_XML;

/// A single attribute with its resolved name.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlAttribute {
    pub name: QualifiedName,
    pub value: String,
}

/// A child of an element.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

/// An element with its namespace declarations, attributes and children.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    name: QualifiedName,
    namespaces: Vec<(String, String)>,
    attributes: Vec<XmlAttribute>,
    children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: QualifiedName) -> Self {
        Self {
            name,
            namespaces: Vec::new(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// An element holding a single text child.
    pub fn with_text(name: QualifiedName, text: impl Into<String>) -> Self {
        let mut element = Self::new(name);
        element.push_text(text);
        element
    }

    pub fn name(&self) -> &QualifiedName {
        &self.name
    }

    pub fn namespaces(&self) -> &[(String, String)] {
        &self.namespaces
    }

    pub fn attributes(&self) -> &[XmlAttribute] {
        &self.attributes
    }

    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        })
    }

    /// Value of an attribute that has no namespace, such as `href`.
    pub fn attribute(&self, local_name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name.matches(local_name, ""))
            .map(|attr| attr.value.as_str())
    }

    /// The text of this element when its only child is a text node.
    pub fn single_text(&self) -> Option<&str> {
        match self.children.as_slice() {
            [XmlNode::Text(text)] => Some(text),
            _ => None,
        }
    }

    pub fn declare_namespace(&mut self, prefix: &str, uri: &str) {
        if !self.namespaces.iter().any(|(p, _)| p == prefix) {
            self.namespaces.push((prefix.to_string(), uri.to_string()));
        }
    }

    pub fn set_attribute(&mut self, name: QualifiedName, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|attr| attr.name == name) {
            Some(existing) => existing.value = value,
            None => self.attributes.push(XmlAttribute { name, value }),
        }
    }

    pub fn push_element(&mut self, element: XmlElement) {
        self.children.push(XmlNode::Element(element));
    }

    /// Append text, merging with a preceding text node.
    pub fn push_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if let Some(XmlNode::Text(existing)) = self.children.last_mut() {
            existing.push_str(&text);
        } else {
            self.children.push(XmlNode::Text(text));
        }
    }

    /// Append `<name>text</name>`.
    pub fn push_text_element(&mut self, name: QualifiedName, text: impl Into<String>) {
        self.push_element(XmlElement::with_text(name, text));
    }

    /// Serialize this element as a standalone document.
    pub fn to_xml_string(&self, pretty: bool) -> Result<String> {
        to_xml_string(self, pretty)
    }

    /// Whitespace between child elements is layout. In a text-only element
    /// it is the value and stays.
    fn drop_layout_text(&mut self) {
        if self.child_elements().next().is_none() {
            return;
        }
        self.children
            .retain(|node| !matches!(node, XmlNode::Text(text) if text.trim().is_empty()));
    }
}

/// Parse a complete document and return its root element.
pub fn parse_document(xml: &str) -> Result<XmlElement> {
    let mut reader = Reader::from_str(xml);
    let mut scopes: Vec<Vec<(String, String)>> = Vec::new();
    let mut open: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                let element = open_element(&start, &mut scopes)?;
                open.push(element);
            }
            Event::Empty(start) => {
                let element = open_element(&start, &mut scopes)?;
                scopes.pop();
                attach(element, &mut open, &mut root)?;
            }
            Event::End(_) => {
                let mut element = open.pop().ok_or_else(|| SwordError::Xml {
                    details: "unexpected end tag".to_string(),
                })?;
                scopes.pop();
                element.drop_layout_text();
                attach(element, &mut open, &mut root)?;
            }
            Event::Text(text) => {
                let text = text.unescape()?;
                match open.last_mut() {
                    Some(current) => current.push_text(text.into_owned()),
                    None if text.trim().is_empty() => {}
                    None => {
                        return Err(SwordError::Xml {
                            details: "text outside of the root element".to_string(),
                        });
                    }
                }
            }
            Event::CData(data) => {
                let text = String::from_utf8(data.into_inner().into_owned())?;
                if let Some(current) = open.last_mut() {
                    current.push_text(text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(unclosed) = open.last() {
        return Err(SwordError::Xml {
            details: format!("unclosed element {}", unclosed.name()),
        });
    }

    root.ok_or(SwordError::EmptyDocument)
}

fn attach(
    element: XmlElement,
    open: &mut [XmlElement],
    root: &mut Option<XmlElement>,
) -> Result<()> {
    match open.last_mut() {
        Some(parent) => {
            parent.push_element(element);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        None => Err(SwordError::Xml {
            details: "more than one root element".to_string(),
        }),
    }
}

fn open_element(start: &BytesStart<'_>, scopes: &mut Vec<Vec<(String, String)>>) -> Result<XmlElement> {
    let mut declarations = Vec::new();
    let mut raw_attributes = Vec::new();

    for attr in start.attributes() {
        let attr = attr?;
        let key = String::from_utf8(attr.key.as_ref().to_vec())?;
        let value = attr.unescape_value()?.into_owned();
        if key == "xmlns" {
            declarations.push((String::new(), value));
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            declarations.push((prefix.to_string(), value));
        } else {
            raw_attributes.push((key, value));
        }
    }
    scopes.push(declarations.clone());

    let raw_name = String::from_utf8(start.name().as_ref().to_vec())?;
    let (prefix, local) = split_name(&raw_name);
    let namespace = resolve(scopes, prefix, true)?;

    let mut element = XmlElement::new(QualifiedName::new(prefix, local, namespace));
    element.namespaces = declarations;
    for (key, value) in raw_attributes {
        let (prefix, local) = split_name(&key);
        // Unprefixed attributes never take the default namespace.
        let namespace = resolve(scopes, prefix, false)?;
        element.attributes.push(XmlAttribute {
            name: QualifiedName::new(prefix, local, namespace),
            value,
        });
    }
    Ok(element)
}

fn split_name(raw: &str) -> (&str, &str) {
    match raw.split_once(':') {
        Some((prefix, local)) => (prefix, local),
        None => ("", raw),
    }
}

fn resolve(scopes: &[Vec<(String, String)>], prefix: &str, use_default: bool) -> Result<String> {
    if prefix.is_empty() && !use_default {
        return Ok(String::new());
    }
    if prefix == "xml" {
        return Ok(NS_XML.to_string());
    }
    for scope in scopes.iter().rev() {
        if let Some((_, uri)) = scope.iter().find(|(p, _)| p == prefix) {
            return Ok(uri.clone());
        }
    }
    if prefix.is_empty() {
        Ok(String::new())
    } else {
        Err(SwordError::Xml {
            details: format!("unbound namespace prefix '{}'", prefix),
        })
    }
}

/// Serialize `root` as a document, declaring on the root every binding the
/// tree uses but does not declare.
pub fn to_xml_string(root: &XmlElement, pretty: bool) -> Result<String> {
    let mut root = root.clone();
    let mut used = Vec::new();
    collect_bindings(&root, &mut used, &mut HashSet::new());
    for (prefix, uri) in used {
        root.declare_namespace(&prefix, &uri);
    }

    let mut writer = if pretty {
        Writer::new_with_indent(Vec::new(), b' ', 2)
    } else {
        Writer::new(Vec::new())
    };
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_element(&mut writer, &root)?;
    Ok(String::from_utf8(writer.into_inner())?)
}

fn collect_bindings(
    element: &XmlElement,
    used: &mut Vec<(String, String)>,
    seen: &mut HashSet<String>,
) {
    let name = element.name();
    if !name.namespace().is_empty() && seen.insert(name.prefix().to_string()) {
        used.push((name.prefix().to_string(), name.namespace().to_string()));
    }
    for attr in element.attributes() {
        let prefix = attr.name.prefix();
        if !prefix.is_empty() && prefix != "xml" && seen.insert(prefix.to_string()) {
            used.push((prefix.to_string(), attr.name.namespace().to_string()));
        }
    }
    for child in element.child_elements() {
        collect_bindings(child, used, seen);
    }
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &XmlElement) -> Result<()> {
    let tag = element.name().qualified();
    let mut start = BytesStart::new(tag.as_str());
    for (prefix, uri) in element.namespaces() {
        let key = if prefix.is_empty() {
            "xmlns".to_string()
        } else {
            format!("xmlns:{}", prefix)
        };
        start.push_attribute((key.as_str(), uri.as_str()));
    }
    for attr in element.attributes() {
        let key = attr.name.qualified();
        start.push_attribute((key.as_str(), attr.value.as_str()));
    }

    if element.children().is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for child in element.children() {
        match child {
            XmlNode::Element(child) => write_element(writer, child)?,
            XmlNode::Text(text) => writer.write_event(Event::Text(BytesText::new(text)))?,
        }
    }
    writer.write_event(Event::End(BytesEnd::new(tag.as_str())))?;
    Ok(())
}
