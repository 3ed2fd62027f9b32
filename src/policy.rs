//! Field-level severity policy.
//!
//! Every field of a composite is classified by a [`Requirement`] and, when it
//! is inspected, by a [`FieldState`]. [`evaluate`] maps the pair to a
//! severity:
//!
//! | requirement  | absent  | complete | incomplete | placeholder | invalid |
//! |--------------|---------|----------|------------|-------------|---------|
//! | required     | ERROR   | VALID    | WARNING    | WARNING     | ERROR   |
//! | recommended  | WARNING | VALID    | WARNING    | WARNING     | ERROR   |
//! | optional     | VALID   | VALID    | WARNING    | ERROR       | ERROR   |
//!
//! A placeholder is an element that is present but lacks the inner value it
//! cannot exist without, such as an author without a name.

use std::sync::LazyLock;

use regex::Regex;

use crate::name::QualifiedName;
use crate::report::{Severity, ValidationReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Required,
    Recommended,
    Optional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    Absent,
    Complete,
    /// Present, but its content is empty or not in the expected shape.
    Incomplete,
    /// Present, but missing its own mandatory inner content.
    Placeholder,
    /// Present with a value the vocabulary forbids.
    Invalid,
}

pub const MSG_MISSING_REQUIRED: &str = "Required element is missing";
pub const MSG_MISSING_RECOMMENDED: &str = "Recommended element is missing";
pub const MSG_MISSING_REQUIRED_ATTRIBUTE: &str = "Required attribute is missing";
pub const MSG_MISSING_RECOMMENDED_ATTRIBUTE: &str = "Recommended attribute is missing";
pub const MSG_PRESENT: &str = "Valid";
pub const MSG_NOT_OPTIONAL: &str = "Optional element is not present";
pub const MSG_INCOMPLETE: &str = "Element is present but its content is empty or malformed";
pub const MSG_PLACEHOLDER: &str = "Element is present but is missing mandatory content";
pub const MSG_INVALID: &str = "Element has a value that is not allowed";

/// Map a requirement and an observed state to a severity.
pub fn evaluate(requirement: Requirement, state: FieldState) -> Severity {
    use FieldState::*;
    use Requirement::*;

    match (requirement, state) {
        (_, Complete) => Severity::Valid,
        (_, Invalid) => Severity::Error,
        (Required, Absent) => Severity::Error,
        (Recommended, Absent) => Severity::Warning,
        (Optional, Absent) => Severity::Valid,
        (_, Incomplete) => Severity::Warning,
        (Required | Recommended, Placeholder) => Severity::Warning,
        (Optional, Placeholder) => Severity::Error,
    }
}

fn message_for(requirement: Requirement, state: FieldState, attribute: bool) -> &'static str {
    match (state, requirement, attribute) {
        (FieldState::Absent, Requirement::Required, false) => MSG_MISSING_REQUIRED,
        (FieldState::Absent, Requirement::Required, true) => MSG_MISSING_REQUIRED_ATTRIBUTE,
        (FieldState::Absent, Requirement::Recommended, false) => MSG_MISSING_RECOMMENDED,
        (FieldState::Absent, Requirement::Recommended, true) => MSG_MISSING_RECOMMENDED_ATTRIBUTE,
        (FieldState::Absent, Requirement::Optional, _) => MSG_NOT_OPTIONAL,
        (FieldState::Complete, _, _) => MSG_PRESENT,
        (FieldState::Incomplete, _, _) => MSG_INCOMPLETE,
        (FieldState::Placeholder, _, _) => MSG_PLACEHOLDER,
        (FieldState::Invalid, _, _) => MSG_INVALID,
    }
}

/// Derive the state of a present child element from its own report.
pub fn state_of(report: &ValidationReport) -> FieldState {
    match report.severity() {
        Severity::Valid | Severity::Info => FieldState::Complete,
        Severity::Warning => FieldState::Incomplete,
        Severity::Error => FieldState::Placeholder,
    }
}

/// State of a scalar text value.
pub fn text_state(value: Option<&str>) -> FieldState {
    match value {
        None => FieldState::Absent,
        Some(text) if text.trim().is_empty() => FieldState::Incomplete,
        Some(_) => FieldState::Complete,
    }
}

static ABSOLUTE_URI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:[^\s]+$").expect("absolute URI pattern is valid")
});

pub fn is_absolute_uri(value: &str) -> bool {
    ABSOLUTE_URI.is_match(value)
}

/// State of a value that should be an absolute URI. With `strict` off, any
/// non-blank text counts as complete.
pub fn uri_state(value: Option<&str>, strict: bool) -> FieldState {
    match text_state(value) {
        FieldState::Complete if strict && !value.is_some_and(is_absolute_uri) => {
            FieldState::Incomplete
        }
        state => state,
    }
}

/// Build the finding for one element field.
pub fn element_finding(
    name: &QualifiedName,
    requirement: Requirement,
    state: FieldState,
    content: Option<&str>,
) -> ValidationReport {
    let severity = evaluate(requirement, state);
    let report = ValidationReport::element(
        name.clone(),
        severity,
        message_for(requirement, state, false),
    );
    match content {
        Some(content) => report.with_content(content),
        None => report,
    }
}

/// Build the finding for one attribute field.
pub fn attribute_finding(
    name: &QualifiedName,
    requirement: Requirement,
    state: FieldState,
    content: Option<&str>,
) -> ValidationReport {
    let severity = evaluate(requirement, state);
    let report = ValidationReport::attribute(
        name.clone(),
        severity,
        message_for(requirement, state, true),
    );
    match content {
        Some(content) => report.with_content(content),
        None => report,
    }
}

/// Apply the field rule to the report of a present child composite.
pub fn apply_to_child(requirement: Requirement, mut child: ValidationReport) -> ValidationReport {
    let state = state_of(&child);
    child.raise(evaluate(requirement, state), message_for(requirement, state, false));
    child
}
