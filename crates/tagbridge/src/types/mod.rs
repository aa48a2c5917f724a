//! Core data types: mapping sources and conversion reports.

mod context;
mod mapping;
mod report;
mod schema;

pub use context::ContextRow;
pub use mapping::{DirectMappingTable, MappingSources, RepeatingSection, TypeRules};
pub use report::{
    ConversionMetrics, ConversionResult, IssueKind, MappingReportEntry, ResolutionMethod,
    Severity, ValidationError,
};
pub use schema::{SchemaExport, SchemaField};
