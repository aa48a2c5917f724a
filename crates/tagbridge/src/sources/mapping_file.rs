//! JSON mapping file: direct mappings, type rules and repeating sections.
//!
//! ```json
//! {
//!   "direct_mappings": { "{{SenderName}}": "sender.full_name" },
//!   "type_rules": { "date": "YYYY-MM-DD" },
//!   "nested_paths": {
//!     "opportunity.line_items": {
//!       "source_path": "TableStart:LineItems",
//!       "fields": { "{{ProductName}}": "name" }
//!     }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs::read_to_string;
use std::path::Path;

use serde::Deserialize;

use super::LoadError;
use crate::types::{DirectMappingTable, MappingSources, RepeatingSection, TypeRules};

const SECTION_PREFIX: &str = "TableStart:";

/// The parsed contents of a mapping file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SchemaMapping {
    #[serde(default)]
    pub direct_mappings: BTreeMap<String, String>,
    #[serde(default)]
    pub type_rules: TypeRules,
    #[serde(default)]
    pub nested_paths: BTreeMap<String, NestedPath>,
}

/// A nested-path descriptor as written in the mapping file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NestedPath {
    /// The source block, written `TableStart:<Block>`.
    pub source_path: String,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

impl SchemaMapping {
    /// The direct-mapping table with normalized keys.
    pub fn direct_table(&self) -> DirectMappingTable {
        self.direct_mappings.iter().collect()
    }

    /// Repeating sections declared by `nested_paths`, in target-path order.
    pub fn sections(&self) -> Result<Vec<RepeatingSection>, LoadError> {
        self.nested_paths
            .iter()
            .map(|(target_path, nested)| section(target_path, nested))
            .collect()
    }

    /// Builds mapping sources from this file alone.
    pub fn into_sources(self) -> Result<MappingSources, LoadError> {
        let direct = self.direct_table();
        let sections = self.sections()?;
        Ok(MappingSources::builder()
            .direct(direct)
            .sections(sections)
            .type_rules(self.type_rules)
            .build())
    }
}

fn section(target_path: &str, nested: &NestedPath) -> Result<RepeatingSection, LoadError> {
    let Some(block) = nested.source_path.trim().strip_prefix(SECTION_PREFIX) else {
        return Err(LoadError::Section {
            name: target_path.to_string(),
            message: format!(
                "source_path '{}' must start with '{SECTION_PREFIX}'",
                nested.source_path
            ),
        });
    };
    let block = block.trim();
    if block.is_empty() {
        return Err(LoadError::Section {
            name: target_path.to_string(),
            message: "source_path names no block".to_string(),
        });
    }
    if target_path.trim().is_empty() {
        return Err(LoadError::Section {
            name: target_path.to_string(),
            message: "target path is empty".to_string(),
        });
    }

    Ok(RepeatingSection {
        target_path: target_path.trim().to_string(),
        block: block.to_string(),
        fields: nested.fields.iter().collect(),
    })
}

/// Parses a mapping file's contents.
pub fn parse_mapping_json(content: &str) -> Result<SchemaMapping, LoadError> {
    Ok(serde_json::from_str(content)?)
}

/// Reads and parses a mapping file.
pub fn load_mapping_file(path: &Path) -> Result<SchemaMapping, LoadError> {
    let content = read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_mapping_json(&content)
}
