//! CSV context file: fallback field associations.
//!
//! Accepts both the export headers (`CongaField,RelatedBoxField,DataType,
//! SourceTable`) and snake-case headers (`source_key,target,data_type,origin`).
//! Only the source key column is required.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use tracing::debug;

use super::LoadError;
use crate::types::ContextRow;

#[derive(Debug, Deserialize)]
struct RawContextRow {
    #[serde(alias = "CongaField")]
    source_key: String,
    #[serde(default, alias = "RelatedBoxField")]
    target: Option<String>,
    #[serde(default, alias = "DataType")]
    data_type: Option<String>,
    #[serde(default, alias = "SourceTable")]
    origin: Option<String>,
}

impl RawContextRow {
    fn into_row(self) -> ContextRow {
        let mut row = ContextRow::new(&self.source_key, self.target.as_deref());
        if let Some(data_type) = &self.data_type {
            row = row.with_data_type(data_type);
        }
        if let Some(origin) = &self.origin {
            row = row.with_origin(origin);
        }
        row
    }
}

/// Parses context rows from CSV data with a header line.
///
/// Rows keep their file order. Rows with a blank source key are skipped.
pub fn parse_context_csv(reader: impl Read) -> Result<Vec<ContextRow>, LoadError> {
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv_reader.deserialize::<RawContextRow>() {
        let row = record?.into_row();
        if row.source_key.is_empty() {
            debug!("skipping context row with blank source key");
            continue;
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Reads and parses a context file.
pub fn load_context_file(path: &Path) -> Result<Vec<ContextRow>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_context_csv(file)
}
