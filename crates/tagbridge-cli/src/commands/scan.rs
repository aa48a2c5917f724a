//! Implementation of the `tagbridge scan` command.

use std::path::PathBuf;

use clap::Args;
use miette::{IntoDiagnostic, Result};
use tagbridge::{tokenize, Element};

use super::read_template;
use crate::output::table::format_element_table;

/// Arguments for the scan command.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Template file to scan
    pub input: PathBuf,

    /// Include whitespace-only text runs
    #[arg(long)]
    pub all: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the scan command.
pub fn run_scan(args: ScanArgs) -> Result<i32> {
    let content = read_template(&args.input)?;
    let elements: Vec<Element> = tokenize(&content).collect();

    if args.json {
        let shown: Vec<&Element> = elements
            .iter()
            .filter(|element| args.all || !element.is_blank_text())
            .collect();
        println!("{}", serde_json::to_string_pretty(&shown).into_diagnostic()?);
    } else {
        println!("{}", format_element_table(&elements, args.all));
    }

    Ok(exitcode::OK)
}
