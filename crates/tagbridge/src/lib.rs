//! Converts mail-merge templates from the `{{TableStart:X}}`/`{{IF:c}}` tag
//! dialect into the `{{#x}}…{{/x}}` dialect, recording every field-level
//! decision in a mapping report.
//!
//! The pipeline is: [`tokenize`] raw text into [`Element`]s, then [`convert`]
//! them against [`MappingSources`] to get a [`ConversionResult`].

pub mod dialect;
pub mod engine;
pub mod parser;
pub mod sources;
pub mod types;

pub use engine::{
    BlockBalancer, ConvertError, MappingResolver, Resolution, convert, convert_text,
};
pub use parser::{ControlKind, Element, tokenize, tokenize_runs};
pub use sources::LoadError;
pub use types::{
    ContextRow, ConversionMetrics, ConversionResult, DirectMappingTable, IssueKind,
    MappingReportEntry, MappingSources, RepeatingSection, ResolutionMethod, SchemaExport,
    SchemaField, Severity, TypeRules, ValidationError,
};
