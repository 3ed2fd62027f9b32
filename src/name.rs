//! Qualified names used to generate and recognise elements and attributes.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Serialize, Serializer};

/// An immutable (prefix, local name, namespace URI) triple.
///
/// Equality and hashing only consider the local name and the namespace; the
/// prefix is presentation only and is used when writing XML.
#[derive(Debug, Clone, Eq)]
pub struct QualifiedName {
    prefix: String,
    local_name: String,
    namespace: String,
}

impl QualifiedName {
    pub fn new(
        prefix: impl Into<String>,
        local_name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            local_name: local_name.into(),
            namespace: namespace.into(),
        }
    }

    /// A name without prefix or namespace, as used by plain attributes such as `href`.
    pub fn unqualified(local_name: impl Into<String>) -> Self {
        Self::new("", local_name, "")
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Compare against a candidate (local name, namespace) pair.
    pub fn matches(&self, local_name: &str, namespace: &str) -> bool {
        self.local_name == local_name && self.namespace == namespace
    }

    /// Build a sibling name that shares this name's prefix and namespace.
    pub fn sibling(&self, local_name: impl Into<String>) -> Self {
        Self::new(self.prefix.clone(), local_name, self.namespace.clone())
    }

    /// The `prefix:local` form written into XML, or just `local` when the
    /// prefix is empty.
    pub fn qualified(&self) -> String {
        if self.prefix.trim().is_empty() {
            self.local_name.clone()
        } else {
            format!("{}:{}", self.prefix, self.local_name)
        }
    }
}

impl PartialEq for QualifiedName {
    fn eq(&self, other: &Self) -> bool {
        self.matches(&other.local_name, &other.namespace)
    }
}

impl Hash for QualifiedName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.local_name.hash(state);
        self.namespace.hash(state);
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified())
    }
}

impl Serialize for QualifiedName {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.qualified())
    }
}
