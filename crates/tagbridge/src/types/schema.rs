use serde::Serialize;

use super::{ConversionResult, MappingSources};
use crate::dialect::unwrap_target;

const SCHEMA_VERSION: &str = "v1";

/// Target fields referenced by a converted document.
///
/// Lists every distinct resolved target path in first-seen order, so the
/// target system can be checked for the fields a template needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaExport {
    pub schema_version: String,
    pub fields: Vec<SchemaField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaField {
    /// Target path without delimiters. Fields resolved inside a repeating
    /// section are relative to the section's collection path.
    pub name: String,
    /// Data type from the first context row targeting this path.
    #[serde(rename = "type")]
    pub data_type: Option<String>,
    /// Source tags that resolved to this path.
    pub source_tags: Vec<String>,
}

impl SchemaExport {
    /// Collects the resolved merge-field targets of `result`.
    pub fn from_result(result: &ConversionResult, sources: &MappingSources) -> SchemaExport {
        let mut fields: Vec<SchemaField> = Vec::new();

        for entry in &result.report {
            if !entry.method.is_field_mapping() {
                continue;
            }
            let Some(target) = &entry.target_tag else {
                continue;
            };
            let name = unwrap_target(target);

            let position = match fields.iter().position(|f| f.name == name) {
                Some(position) => position,
                None => {
                    fields.push(SchemaField {
                        name: name.to_string(),
                        data_type: data_type_for(sources, name),
                        source_tags: Vec::new(),
                    });
                    fields.len() - 1
                }
            };

            let field = &mut fields[position];
            if !field.source_tags.contains(&entry.source_tag) {
                field.source_tags.push(entry.source_tag.clone());
            }
        }

        SchemaExport {
            schema_version: SCHEMA_VERSION.to_string(),
            fields,
        }
    }
}

fn data_type_for(sources: &MappingSources, name: &str) -> Option<String> {
    sources
        .context
        .iter()
        .filter(|row| row.target().is_some_and(|t| unwrap_target(t) == name))
        .find_map(|row| row.data_type.clone())
}
