use std::path::PathBuf;

use thiserror::Error;

use crate::name::QualifiedName;

/// Main library error type.
///
/// Only structural problems surface here. Everything that concerns the
/// *content* of a document is reported through a
/// [`ValidationReport`](crate::report::ValidationReport) instead.
#[derive(Error, Debug)]
pub enum SwordError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unexpected element: expected {expected}, found {found}")]
    WrongElement {
        expected: QualifiedName,
        found: QualifiedName,
    },

    #[error("XML error: {details}")]
    Xml { details: String },

    #[error("Document has no root element")]
    EmptyDocument,

    #[error("Unsupported root element: {found}")]
    UnsupportedDocument { found: QualifiedName },

    #[error("Quality value out of range: {value} (expected 0.0 to 1.0)")]
    QualityValue { value: f32 },

    #[error("Not a quality value: '{text}'")]
    UnparsableQualityValue { text: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Document processing failed: {file} - {details}")]
    DocumentFailed { file: PathBuf, details: String },
}

impl From<quick_xml::Error> for SwordError {
    fn from(err: quick_xml::Error) -> Self {
        SwordError::Xml {
            details: err.to_string(),
        }
    }
}

impl From<quick_xml::events::attributes::AttrError> for SwordError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        SwordError::Xml {
            details: err.to_string(),
        }
    }
}

impl From<std::string::FromUtf8Error> for SwordError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        SwordError::Xml {
            details: format!("invalid UTF-8: {}", err),
        }
    }
}

/// Configuration-specific error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("JSON parsing error: {0}")]
    JsonParsing(#[from] serde_json::Error),

    #[error("Configuration validation error: {0}")]
    Validation(String),

    #[error("Environment variable error: {0}")]
    Environment(String),

    #[error("Unsupported configuration file format: {0}")]
    UnsupportedFormat(String),
}

impl From<ConfigError> for SwordError {
    fn from(err: ConfigError) -> Self {
        SwordError::Config(err.to_string())
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, SwordError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
