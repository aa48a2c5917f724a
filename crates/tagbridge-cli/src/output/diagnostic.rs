//! Miette diagnostics for conversion issues.

use std::fmt::Display;
use std::iter::once;
use std::ops::Range;
use std::path::Path;

use miette::{
    Diagnostic, LabeledSpan, NamedSource, Severity as DiagnosticSeverity, SourceCode, SourceSpan,
};
use tagbridge::{IssueKind, Severity, ValidationError};
use thiserror::Error;

/// A conversion issue rendered against the template it was found in.
///
/// Severity is per issue, so `Diagnostic` is implemented by hand.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TagDiagnostic {
    src: NamedSource<String>,
    span: Option<SourceSpan>,
    kind: IssueKind,
    severity: Severity,
    message: String,
}

impl TagDiagnostic {
    /// Create a diagnostic for `issue`, pointing at the element it names.
    ///
    /// `spans` holds the byte range of each element, indexed like the
    /// element sequence the issue was produced from.
    pub fn from_issue(
        path: &Path,
        content: &str,
        spans: &[Range<usize>],
        issue: &ValidationError,
    ) -> Self {
        let span = issue
            .element_index
            .and_then(|index| spans.get(index))
            .map(|range| SourceSpan::from(range.start..range.end));

        TagDiagnostic {
            src: NamedSource::new(path.display().to_string(), content.to_string()),
            span,
            kind: issue.kind,
            severity: issue.severity,
            message: issue.message.clone(),
        }
    }
}

impl Diagnostic for TagDiagnostic {
    fn code<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        Some(Box::new(format!("tagbridge::{}", self.kind)))
    }

    fn severity(&self) -> Option<DiagnosticSeverity> {
        Some(match self.severity {
            Severity::Error => DiagnosticSeverity::Error,
            Severity::Warning => DiagnosticSeverity::Warning,
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        let help = help_for(self.kind)?;
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        Some(&self.src)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.span?;
        let label = LabeledSpan::new_with_span(Some(self.kind.to_string()), span);
        Some(Box::new(once(label)))
    }
}

fn help_for(kind: IssueKind) -> Option<&'static str> {
    match kind {
        IssueKind::MissingParameter => Some("name the block, e.g. {{TableStart:Rows}}"),
        IssueKind::UnexpectedBlockEnd => {
            Some("remove this closer or add the opener it belongs to")
        }
        IssueKind::MismatchedBlockEnd => Some("the closer was applied to the innermost open block"),
        IssueKind::UnclosedBlock => Some("close the block before the end of the document"),
        IssueKind::UnmappedField => {
            Some("add a direct mapping or a context row for this field")
        }
        IssueKind::UnhandledControlTag => {
            Some("this control type has no equivalent in the target dialect")
        }
        IssueKind::EmptyInput => None,
    }
}
