//! Audit records produced by a conversion run.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::time::Duration;

use serde::{Serialize, Serializer};

/// How a report entry's target tag was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionMethod {
    DirectMapping,
    SectionMapping,
    ContextLookup,
    ControlOpen,
    ControlClose,
    Unmapped,
    Unhandled,
}

impl ResolutionMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            ResolutionMethod::DirectMapping => "direct-mapping",
            ResolutionMethod::SectionMapping => "section-mapping",
            ResolutionMethod::ContextLookup => "context-lookup",
            ResolutionMethod::ControlOpen => "control-open",
            ResolutionMethod::ControlClose => "control-close",
            ResolutionMethod::Unmapped => "unmapped",
            ResolutionMethod::Unhandled => "unhandled",
        }
    }

    /// Whether this method resolved a merge field to a target.
    pub fn is_field_mapping(self) -> bool {
        matches!(
            self,
            ResolutionMethod::DirectMapping
                | ResolutionMethod::SectionMapping
                | ResolutionMethod::ContextLookup
        )
    }
}

impl Display for ResolutionMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// One audit record per merge field or control tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingReportEntry {
    /// The source-dialect tag as written.
    pub source_tag: String,
    /// The emitted target-dialect tag, or `None` when the source tag was
    /// passed through unchanged.
    pub target_tag: Option<String>,
    pub method: ResolutionMethod,
    pub note: Option<String>,
    /// Position of the element in the converted sequence.
    pub element_index: usize,
}

/// The kind of issue found during conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    MissingParameter,
    UnexpectedBlockEnd,
    MismatchedBlockEnd,
    UnclosedBlock,
    UnmappedField,
    UnhandledControlTag,
    EmptyInput,
}

impl IssueKind {
    /// Severity is fixed per kind: structural breakage the author must fix is
    /// an error, best-effort substitution is a warning.
    pub fn severity(self) -> Severity {
        match self {
            IssueKind::MissingParameter
            | IssueKind::UnexpectedBlockEnd
            | IssueKind::UnclosedBlock => Severity::Error,
            IssueKind::MismatchedBlockEnd
            | IssueKind::UnmappedField
            | IssueKind::UnhandledControlTag
            | IssueKind::EmptyInput => Severity::Warning,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IssueKind::MissingParameter => "missing-parameter",
            IssueKind::UnexpectedBlockEnd => "unexpected-block-end",
            IssueKind::MismatchedBlockEnd => "mismatched-block-end",
            IssueKind::UnclosedBlock => "unclosed-block",
            IssueKind::UnmappedField => "unmapped-field",
            IssueKind::UnhandledControlTag => "unhandled-control-tag",
            IssueKind::EmptyInput => "empty-input",
        }
    }
}

impl Display for IssueKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// A recoverable issue recorded during conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub kind: IssueKind,
    pub severity: Severity,
    /// The offending source tag, if the issue concerns one.
    pub tag: Option<String>,
    pub message: String,
    /// Position of the offending element, if any.
    pub element_index: Option<usize>,
}

impl ValidationError {
    /// Creates an issue about the element at `index`.
    pub fn at(kind: IssueKind, index: usize, tag: &str, message: impl Into<String>) -> Self {
        ValidationError {
            kind,
            severity: kind.severity(),
            tag: Some(tag.to_string()),
            message: message.into(),
            element_index: Some(index),
        }
    }

    /// Creates an issue not tied to a single element.
    pub fn general(kind: IssueKind, message: impl Into<String>) -> Self {
        ValidationError {
            kind,
            severity: kind.severity(),
            tag: None,
            message: message.into(),
            element_index: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}[{}]: {}", self.severity, self.kind, self.message)
    }
}

/// Counters and timing for one conversion run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConversionMetrics {
    pub element_count: usize,
    pub merge_field_count: usize,
    pub control_tag_count: usize,
    #[serde(rename = "elapsed_seconds", serialize_with = "serialize_seconds")]
    pub elapsed: Duration,
}

fn serialize_seconds<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(elapsed.as_secs_f64())
}

/// The complete outcome of converting one element sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionResult {
    /// The converted target-dialect document.
    pub converted: String,
    /// One entry per non-text element, in document order.
    pub report: Vec<MappingReportEntry>,
    /// Issues in the order they were detected.
    pub errors: Vec<ValidationError>,
    pub metrics: ConversionMetrics,
}

impl ConversionResult {
    /// Whether any issue requires the author to fix the source document.
    pub fn has_errors(&self) -> bool {
        self.errors.iter().any(ValidationError::is_error)
    }

    /// Number of issues with the given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.errors.iter().filter(|e| e.severity == severity).count()
    }

    /// Issues of one kind, in detection order.
    pub fn issues_of(&self, kind: IssueKind) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter().filter(move |e| e.kind == kind)
    }

    /// Report entries resolved with `method`.
    pub fn entries_with(
        &self,
        method: ResolutionMethod,
    ) -> impl Iterator<Item = &MappingReportEntry> {
        self.report.iter().filter(move |e| e.method == method)
    }
}
