//! `sword:acceptPackaging` and its quality values.

use std::fmt;
use std::str::FromStr;

use crate::config::ValidationConfig;
use crate::dom::{XmlElement, XmlNode};
use crate::element::check_attributes;
use crate::error::{Result, SwordError};
use crate::name::QualifiedName;
use crate::namespaces::{NS_SWORD, PREFIX_SWORD};
use crate::report::{Severity, ValidationReport};

pub const ATTRIBUTE_Q: &str = "q";

/// A preference weight in `[0.0, 1.0]`, as used in HTTP `Accept` headers.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct QualityValue(f32);

impl QualityValue {
    pub const MAX: QualityValue = QualityValue(1.0);

    pub fn new(value: f32) -> Result<Self> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(SwordError::QualityValue { value })
        }
    }

    pub fn value(&self) -> f32 {
        self.0
    }
}

impl Default for QualityValue {
    fn default() -> Self {
        Self::MAX
    }
}

impl fmt::Display for QualityValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 {
            write!(f, "{:.1}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl FromStr for QualityValue {
    type Err = SwordError;

    fn from_str(s: &str) -> Result<Self> {
        let value: f32 = s
            .trim()
            .parse()
            .map_err(|_| SwordError::UnparsableQualityValue {
                text: s.to_string(),
            })?;
        Self::new(value)
    }
}

pub fn accept_packaging_name() -> QualifiedName {
    QualifiedName::new(PREFIX_SWORD, "acceptPackaging", NS_SWORD)
}

pub(crate) fn marshal_accept_packaging(format: &str, quality: QualityValue) -> XmlElement {
    let mut element = XmlElement::new(accept_packaging_name());
    element.set_attribute(QualifiedName::unqualified(ATTRIBUTE_Q), quality.to_string());
    element.push_text(format);
    element
}

/// Read one `sword:acceptPackaging` element.
///
/// A missing or unusable `q` falls back to the default quality. Returns
/// `None` when there is no packaging identifier to record.
pub(crate) fn read_accept_packaging(
    element: &XmlElement,
    config: &ValidationConfig,
) -> (Option<(String, QualityValue)>, ValidationReport) {
    let mut report = ValidationReport::for_element(accept_packaging_name());
    check_attributes(&mut report, element, &[ATTRIBUTE_Q], config);

    let quality = match element.attribute(ATTRIBUTE_Q) {
        None => QualityValue::default(),
        Some(raw) => raw.parse().unwrap_or_else(|err: SwordError| {
            report.add_attribute_unmarshal(
                ValidationReport::attribute(
                    QualifiedName::unqualified(ATTRIBUTE_Q),
                    Severity::Error,
                    err.to_string(),
                )
                .with_content(raw),
            );
            QualityValue::default()
        }),
    };

    let format = match element.children() {
        [XmlNode::Text(text)] if !text.trim().is_empty() => text.trim().to_string(),
        [] | [XmlNode::Text(_)] => {
            report.raise(Severity::Warning, "No packaging format given");
            return (None, report);
        }
        _ => {
            report.raise(Severity::Error, "Element must hold a single text value");
            return (None, report);
        }
    };
    let report = report.with_content(format.as_str());
    (Some((format, quality)), report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_document;

    fn read(xml: &str) -> (Option<(String, QualityValue)>, ValidationReport) {
        let element = parse_document(xml).unwrap();
        read_accept_packaging(&element, &ValidationConfig::default())
    }

    #[test]
    fn test_quality_value_range() {
        assert!(QualityValue::new(0.0).is_ok());
        assert!(QualityValue::new(1.0).is_ok());
        assert!(matches!(
            QualityValue::new(1.5),
            Err(SwordError::QualityValue { .. })
        ));
        assert!(QualityValue::new(-0.1).is_err());
        assert!(QualityValue::new(f32::NAN).is_err());
    }

    #[test]
    fn test_quality_value_display() {
        assert_eq!(QualityValue::default().to_string(), "1.0");
        assert_eq!(QualityValue::new(0.0).unwrap().to_string(), "0.0");
        assert_eq!(QualityValue::new(0.8).unwrap().to_string(), "0.8");
    }

    #[test]
    fn test_quality_value_parse() {
        let q: QualityValue = " 0.5 ".parse().unwrap();
        assert_eq!(q.value(), 0.5);
        assert!(matches!(
            "high".parse::<QualityValue>(),
            Err(SwordError::UnparsableQualityValue { .. })
        ));
    }

    #[test]
    fn test_read_with_quality() {
        let (found, report) = read(
            r#"<sword:acceptPackaging xmlns:sword="http://purl.org/net/sword/" q="0.8">http://purl.org/net/sword-types/METSDSpaceSIP</sword:acceptPackaging>"#,
        );
        let (format, quality) = found.unwrap();
        assert_eq!(format, "http://purl.org/net/sword-types/METSDSpaceSIP");
        assert_eq!(quality.value(), 0.8);
        assert!(report.is_valid());
    }

    #[test]
    fn test_bad_quality_defaults_with_error() {
        let (found, report) = read(
            r#"<sword:acceptPackaging xmlns:sword="http://purl.org/net/sword/" q="2">http://x</sword:acceptPackaging>"#,
        );
        assert_eq!(found.unwrap().1, QualityValue::default());
        assert_eq!(report.severity(), Severity::Error);
    }

    #[test]
    fn test_empty_element_is_skipped() {
        let (found, report) =
            read(r#"<sword:acceptPackaging xmlns:sword="http://purl.org/net/sword/"/>"#);
        assert!(found.is_none());
        assert_eq!(report.severity(), Severity::Warning);
    }
}
