//! CLI command implementations.

mod check;
mod convert;
mod scan;

use std::fs::read_to_string;
use std::path::Path;

use miette::{IntoDiagnostic, Result, WrapErr};

pub use check::{run_check, CheckArgs};
pub use convert::{run_convert, ConvertArgs};
pub use scan::{run_scan, ScanArgs};

/// Read a template file.
fn read_template(path: &Path) -> Result<String> {
    read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read template {}", path.display()))
}
