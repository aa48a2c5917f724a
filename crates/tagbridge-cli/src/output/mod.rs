//! Human-readable output: diagnostics, tables and issue lines.

mod diagnostic;
pub mod table;

use owo_colors::{OwoColorize, Stream};
use tagbridge::{Severity, ValidationError};

pub use diagnostic::TagDiagnostic;

/// Format one issue as a single line for stderr.
pub fn format_issue(issue: &ValidationError) -> String {
    let label = match issue.severity {
        Severity::Error => "error"
            .if_supports_color(Stream::Stderr, |text| text.red())
            .to_string(),
        Severity::Warning => "warning"
            .if_supports_color(Stream::Stderr, |text| text.yellow())
            .to_string(),
    };
    let location = issue
        .element_index
        .map(|index| format!(" (element {index})"))
        .unwrap_or_default();
    format!("{label}[{}]: {}{location}", issue.kind, issue.message)
}

/// Format a success marker for stdout.
pub fn format_ok(subject: &str) -> String {
    format!(
        "{} {subject}",
        "ok".if_supports_color(Stream::Stdout, |text| text.green())
    )
}
