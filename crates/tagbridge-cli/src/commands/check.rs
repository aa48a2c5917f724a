//! Implementation of the `tagbridge check` command.

use std::ops::Range;
use std::path::PathBuf;

use clap::Args;
use miette::{miette, IntoDiagnostic, Report, Result};
use serde::Serialize;
use tagbridge::{convert, tokenize, Element, IssueKind, MappingSources, ValidationError};

use super::read_template;
use crate::output::{format_ok, TagDiagnostic};

/// Arguments for the check command.
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Template files to check
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output for one checked file.
#[derive(Debug, Serialize)]
struct CheckJson {
    file: String,
    issues: Vec<ValidationError>,
}

/// Run the check command.
///
/// Only block structure is checked. Field mappings are not consulted, so
/// unmapped-field issues are not reported.
pub fn run_check(args: CheckArgs) -> Result<i32> {
    let mut any_errors = false;
    let mut json_output = Vec::new();

    for path in &args.files {
        let content = read_template(path)?;
        let (spans, elements): (Vec<Range<usize>>, Vec<Element>) =
            tokenize(&content).spanned().unzip();

        let result = convert(&elements, &MappingSources::empty())
            .map_err(|e| miette!("cannot check {}: {}", path.display(), e))?;
        let issues: Vec<ValidationError> = result
            .errors
            .into_iter()
            .filter(|issue| issue.kind != IssueKind::UnmappedField)
            .collect();
        any_errors |= issues.iter().any(ValidationError::is_error);

        if args.json {
            json_output.push(CheckJson {
                file: path.display().to_string(),
                issues,
            });
        } else if issues.is_empty() {
            println!("{}", format_ok(&path.display().to_string()));
        } else {
            for issue in &issues {
                let diagnostic = TagDiagnostic::from_issue(path, &content, &spans, issue);
                eprintln!("{:?}", Report::new(diagnostic));
            }
        }
    }

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json_output).into_diagnostic()?
        );
    }

    if any_errors {
        Ok(exitcode::DATAERR)
    } else {
        Ok(exitcode::OK)
    }
}
