//! # sword-xml Library
//!
//! An object model for the deposit protocol's XML vocabulary: service
//! documents, workspaces, collections, deposit receipts and error documents.
//!
//! Every element can be marshalled to XML, unmarshalled from XML and
//! validated. Unmarshalling never stops at the first problem. Findings are
//! collected in a [`ValidationReport`] tree whose severities come from a
//! small policy table (see [`policy`]).
//!
//! ```
//! use sword_xml::{Document, ValidationConfig};
//!
//! let xml = r#"<sword:error xmlns:sword="http://purl.org/net/sword/"
//!     href="http://purl.org/net/sword/error/ErrorContent"/>"#;
//! let (document, report) = Document::parse(xml, &ValidationConfig::default()).unwrap();
//! assert_eq!(document.kind(), "error");
//! assert!(report.is_valid());
//! ```

pub mod atom;
pub mod cli;
pub mod config;
pub mod document;
pub mod dom;
pub mod element;
pub mod error;
pub mod file_discovery;
pub mod leaf;
pub mod name;
pub mod namespaces;
pub mod output;
pub mod policy;
pub mod report;
pub mod sword;
pub mod validator;

pub use atom::{Entry, Generator, Link, Person, TextConstruct};
pub use cli::{Cli, OutputFormat, VerbosityLevel};
pub use config::{Config, ConfigManager, ValidationConfig};
pub use document::Document;
pub use dom::XmlElement;
pub use element::SwordElement;
pub use error::{ConfigError, Result, SwordError};
pub use file_discovery::{DiscoveryStats, FileDiscovery};
pub use name::QualifiedName;
pub use output::Output;
pub use policy::{FieldState, Requirement};
pub use report::{ChildGroup, ReportVisitor, Severity, SeverityTally, ValidationReport};
pub use sword::{
    Collection, ErrorDocument, QualityValue, Service, ServiceLevel, SwordEntry, Workspace,
};
pub use validator::{
    EngineConfig, FileValidationResult, ValidationEngine, ValidationResults, ValidationStatus,
};
