//! Implementation of the `tagbridge convert` command.

use std::fs::write;
use std::path::{Path, PathBuf};

use clap::Args;
use miette::{miette, IntoDiagnostic, Result, WrapErr};
use serde::Serialize;
use tagbridge::sources::{load_context_file, load_mapping_file, load_query_file, SchemaMapping};
use tagbridge::{convert_text, ConversionResult, MappingSources, SchemaExport, Severity};
use tracing::debug;

use super::read_template;
use crate::output::format_issue;
use crate::output::table::format_report_table;

/// Arguments for the convert command.
#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Template file to convert
    pub input: PathBuf,

    /// JSON mapping file (direct mappings, type rules, repeating sections)
    #[arg(long, env = "TAGBRIDGE_MAPPING")]
    pub mapping: Option<PathBuf>,

    /// CSV context file with fallback field associations
    #[arg(long, env = "TAGBRIDGE_CONTEXT")]
    pub context: Option<PathBuf>,

    /// SQL file whose SELECT lists name the fields in the query context
    #[arg(long, env = "TAGBRIDGE_QUERY")]
    pub query: Option<PathBuf>,

    /// Write the converted document here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write the full conversion result as JSON
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Write the referenced target fields as JSON
    #[arg(long)]
    pub schema: Option<PathBuf>,

    /// Print the conversion result as JSON instead of the document
    #[arg(long)]
    pub json: bool,

    /// Exit with a non-zero code if any error-severity issue is found
    #[arg(long)]
    pub strict: bool,
}

/// Run the convert command.
///
/// The document goes to `--output` or stdout. The report table and issue
/// lines go to stderr so that stdout stays usable in pipelines.
pub fn run_convert(args: ConvertArgs) -> Result<i32> {
    let content = read_template(&args.input)?;
    let sources = load_sources(&args)?;

    let result = convert_text(&content, &sources)
        .map_err(|e| miette!("cannot convert {}: {}", args.input.display(), e))?;

    if let Some(path) = &args.report {
        write_json(path, &result)?;
    }
    if let Some(path) = &args.schema {
        write_json(path, &SchemaExport::from_result(&result, &sources))?;
    }
    if let Some(path) = &args.output {
        write(path, &result.converted)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to write {}", path.display()))?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result).into_diagnostic()?);
    } else {
        if args.output.is_none() {
            print!("{}", result.converted);
        }
        print_summary(&result);
    }

    if args.strict && result.has_errors() {
        Ok(exitcode::DATAERR)
    } else {
        Ok(exitcode::OK)
    }
}

/// Assemble mapping sources from whichever files were given.
fn load_sources(args: &ConvertArgs) -> Result<MappingSources> {
    let mapping = match &args.mapping {
        Some(path) => load_mapping_file(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to load mapping file {}", path.display()))?,
        None => SchemaMapping::default(),
    };
    let sections = mapping.sections().into_diagnostic()?;

    let context = match &args.context {
        Some(path) => load_context_file(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to load context file {}", path.display()))?,
        None => Vec::new(),
    };

    let query_fields = match &args.query {
        Some(path) => load_query_file(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to load query file {}", path.display()))?,
        None => Vec::new(),
    };

    debug!(
        direct = mapping.direct_mappings.len(),
        sections = sections.len(),
        context_rows = context.len(),
        query_fields = query_fields.len(),
        "loaded mapping sources"
    );

    Ok(MappingSources::builder()
        .direct(mapping.direct_table())
        .context(context)
        .sections(sections)
        .type_rules(mapping.type_rules)
        .query_fields(query_fields)
        .build())
}

fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let json = serde_json::to_string_pretty(value).into_diagnostic()?;
    write(path, json)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to write {}", path.display()))
}

fn print_summary(result: &ConversionResult) {
    if !result.report.is_empty() {
        eprintln!("{}", format_report_table(&result.report));
    }
    for issue in &result.errors {
        eprintln!("{}", format_issue(issue));
    }
    eprintln!(
        "{} merge fields, {} control tags: {} errors, {} warnings",
        result.metrics.merge_field_count,
        result.metrics.control_tag_count,
        result.count(Severity::Error),
        result.count(Severity::Warning),
    );
}
