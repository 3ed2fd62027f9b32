use std::fmt;

use crate::atom::generator::Generator;
use crate::config::ValidationConfig;
use crate::dom::XmlElement;
use crate::element::{
    SwordElement, check_attributes, dispatch, expect_element, keep_findings, read_child,
    skip_unknown, validate_child, validate_children,
};
use crate::error::Result;
use crate::leaf::{
    LeafKind, LevelKind, MaxUploadSizeKind, NoOpKind, RejectedLeaves, VerboseKind, VersionKind,
    read_leaf, read_typed_leaf, write_leaf,
};
use crate::name::QualifiedName;
use crate::namespaces::{NS_APP, NS_ATOM, NS_SWORD, PREFIX_APP};
use crate::policy::{FieldState, Requirement, element_finding, text_state};
use crate::report::{Severity, ValidationReport};
use crate::sword::workspace::Workspace;

/// Protocol compliance level a server claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceLevel {
    Zero,
    One,
}

impl ServiceLevel {
    pub fn number(self) -> i64 {
        match self {
            ServiceLevel::Zero => 0,
            ServiceLevel::One => 1,
        }
    }

    pub fn from_number(number: i64) -> Option<Self> {
        match number {
            0 => Some(ServiceLevel::Zero),
            1 => Some(ServiceLevel::One),
            _ => None,
        }
    }
}

impl fmt::Display for ServiceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

#[derive(Debug, Clone, Copy)]
enum ServiceChild {
    Level,
    Version,
    Verbose,
    NoOp,
    MaxUploadSize,
    Generator,
    Workspace,
}

const SERVICE_CHILDREN: &[(&str, &str, ServiceChild)] = &[
    ("level", NS_SWORD, ServiceChild::Level),
    ("version", NS_SWORD, ServiceChild::Version),
    ("verbose", NS_SWORD, ServiceChild::Verbose),
    ("noOp", NS_SWORD, ServiceChild::NoOp),
    ("maxUploadSize", NS_SWORD, ServiceChild::MaxUploadSize),
    ("generator", NS_ATOM, ServiceChild::Generator),
    ("workspace", NS_APP, ServiceChild::Workspace),
];

/// `app:service`, the service document a client fetches first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Service {
    pub level: Option<ServiceLevel>,
    pub version: Option<String>,
    pub verbose: Option<bool>,
    pub no_op: Option<bool>,
    /// In kilobytes.
    pub max_upload_size: Option<i64>,
    pub generator: Option<Generator>,
    pub workspaces: Vec<Workspace>,
    /// Typed values the last read could not accept.
    pub rejected: RejectedLeaves,
}

impl Service {
    pub fn new() -> Self {
        Self::default()
    }

    /// A service advertising the given protocol version and capabilities.
    pub fn with_capabilities(version: impl Into<String>, verbose: bool, no_op: bool) -> Self {
        Self {
            version: Some(version.into()),
            verbose: Some(verbose),
            no_op: Some(no_op),
            ..Self::default()
        }
    }

    pub fn name() -> QualifiedName {
        QualifiedName::new(PREFIX_APP, "service", NS_APP)
    }

    pub fn add_workspace(&mut self, workspace: Workspace) {
        self.workspaces.push(workspace);
    }
}

impl SwordElement for Service {
    fn element_name(&self) -> QualifiedName {
        Self::name()
    }

    fn marshal(&self) -> XmlElement {
        let mut element = XmlElement::new(Self::name());
        let level = self.level.map(ServiceLevel::number);
        write_leaf::<LevelKind>(&mut element, level.as_ref());
        write_leaf::<VersionKind>(&mut element, self.version.as_ref());
        write_leaf::<VerboseKind>(&mut element, self.verbose.as_ref());
        write_leaf::<NoOpKind>(&mut element, self.no_op.as_ref());
        write_leaf::<MaxUploadSizeKind>(&mut element, self.max_upload_size.as_ref());
        if let Some(generator) = &self.generator {
            element.push_element(generator.marshal());
        }
        for workspace in &self.workspaces {
            element.push_element(workspace.marshal());
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
            let Some(kind) = dispatch(SERVICE_CHILDREN, child) else {
                skip_unknown(&mut report, child, config);
                continue;
            };
            match kind {
                ServiceChild::Level => {
                    let number =
                        read_typed_leaf::<LevelKind>(&mut report, child, config, &mut self.rejected);
                    if let Some(number) = number {
                        self.level = ServiceLevel::from_number(number);
                        if self.level.is_none() {
                            self.rejected.record(LevelKind::name(), number.to_string());
                            report.add_element_unmarshal(
                                ValidationReport::element(
                                    LevelKind::name(),
                                    Severity::Error,
                                    "Compliance level must be 0 or 1",
                                )
                                .with_content(number.to_string()),
                            );
                        }
                    }
                }
                ServiceChild::Version => {
                    self.version = read_leaf::<VersionKind>(&mut report, child, config)
                }
                ServiceChild::Verbose => {
                    self.verbose =
                        read_typed_leaf::<VerboseKind>(&mut report, child, config, &mut self.rejected)
                }
                ServiceChild::NoOp => {
                    self.no_op =
                        read_typed_leaf::<NoOpKind>(&mut report, child, config, &mut self.rejected)
                }
                ServiceChild::MaxUploadSize => {
                    self.max_upload_size = read_typed_leaf::<MaxUploadSizeKind>(
                        &mut report,
                        child,
                        config,
                        &mut self.rejected,
                    )
                }
                ServiceChild::Generator => {
                    let mut generator = Generator::new();
                    keep_findings(&mut report, read_child(&mut generator, child, config));
                    self.generator = Some(generator);
                }
                ServiceChild::Workspace => {
                    let mut workspace = Workspace::new();
                    keep_findings(&mut report, read_child(&mut workspace, child, config));
                    self.workspaces.push(workspace);
                }
            }
        }
        Ok(report)
    }

    fn validate(&self, config: &ValidationConfig) -> ValidationReport {
        let mut report = ValidationReport::for_element(Self::name());

        let (level_state, level) = match self.level {
            Some(level) => (FieldState::Complete, Some(level.to_string())),
            None => self.rejected.unset_state(&LevelKind::name()),
        };
        report.add_element_validation(element_finding(
            &LevelKind::name(),
            Requirement::Optional,
            level_state,
            level.as_deref(),
        ));
        report.add_element_validation(element_finding(
            &VersionKind::name(),
            Requirement::Required,
            text_state(self.version.as_deref()),
            self.version.as_deref(),
        ));

        let flags = [
            (VerboseKind::name(), self.verbose),
            (NoOpKind::name(), self.no_op),
        ];
        for (name, flag) in flags {
            let (state, text) = match flag {
                Some(flag) => (FieldState::Complete, Some(flag.to_string())),
                None => self.rejected.unset_state(&name),
            };
            report.add_element_validation(element_finding(
                &name,
                Requirement::Recommended,
                state,
                text.as_deref(),
            ));
        }

        let (size_state, size) = match self.max_upload_size {
            None => self.rejected.unset_state(&MaxUploadSizeKind::name()),
            Some(size) if size > 0 => (FieldState::Complete, Some(size.to_string())),
            Some(size) => (FieldState::Incomplete, Some(size.to_string())),
        };
        report.add_element_validation(element_finding(
            &MaxUploadSizeKind::name(),
            Requirement::Optional,
            size_state,
            size.as_deref(),
        ));

        validate_child(
            &mut report,
            Generator::name(),
            Requirement::Optional,
            self.generator.as_ref(),
            config,
        );
        validate_children(
            &mut report,
            Workspace::name(),
            Requirement::Recommended,
            &self.workspaces,
            config,
        );
        report.summarize();
        report
    }
}
