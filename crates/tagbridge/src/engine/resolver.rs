//! Merge-field resolution against layered mapping sources.

use crate::dialect::wrap_target;
use crate::types::{ContextRow, MappingSources, RepeatingSection, ResolutionMethod};

/// The outcome of resolving one field key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The wrapped target-dialect tag, or `None` when unmapped.
    pub target: Option<String>,
    pub method: ResolutionMethod,
    pub note: Option<String>,
}

/// Resolves field keys to target tags.
///
/// Lookup order:
/// 1. The direct-mapping table
/// 2. The field table of the enclosing repeating section, if any
/// 3. The first context row with a matching key and a non-empty target
///
/// Resolution is pure: it reads the sources and never records anything.
#[derive(Debug, Clone, Copy)]
pub struct MappingResolver<'a> {
    sources: &'a MappingSources,
}

impl<'a> MappingResolver<'a> {
    pub fn new(sources: &'a MappingSources) -> Self {
        Self { sources }
    }

    /// Resolves `key` outside of any repeating section.
    pub fn resolve(&self, key: &str) -> Resolution {
        self.resolve_in(key, None)
    }

    /// Resolves `key`, consulting `section`'s fields after direct mappings.
    pub fn resolve_in(&self, key: &str, section: Option<&RepeatingSection>) -> Resolution {
        if let Some(target) = non_empty(self.sources.direct.get(key)) {
            return Resolution {
                target: Some(wrap_target(target)),
                method: ResolutionMethod::DirectMapping,
                note: None,
            };
        }

        if let Some(section) = section {
            if let Some(target) = non_empty(section.fields.get(key)) {
                return Resolution {
                    target: Some(wrap_target(target)),
                    method: ResolutionMethod::SectionMapping,
                    note: Some(format!(
                        "repeating section '{}' ({})",
                        section.block, section.target_path
                    )),
                };
            }
        }

        let row = self
            .sources
            .context
            .iter()
            .find(|row| row.source_key == key && row.target().is_some());
        if let Some(row) = row {
            return Resolution {
                target: row.target().map(wrap_target),
                method: ResolutionMethod::ContextLookup,
                note: Some(self.context_note(row)),
            };
        }

        let note = if self.sources.is_query_field(key) {
            "selected by the query context but no mapping rule found"
        } else {
            "no mapping rule found"
        };
        Resolution {
            target: None,
            method: ResolutionMethod::Unmapped,
            note: Some(note.to_string()),
        }
    }

    fn context_note(&self, row: &ContextRow) -> String {
        let data_type = row.data_type.as_deref().unwrap_or("n/a");
        let origin = row.origin.as_deref().unwrap_or("n/a");
        let mut note = format!("type: {data_type}, origin: {origin}");
        let rule = row
            .data_type
            .as_ref()
            .and_then(|t| self.sources.type_rules.get(t));
        if let Some(rule) = rule {
            note.push_str(&format!(", format: {rule}"));
        }
        note
    }
}

fn non_empty(target: Option<&str>) -> Option<&str> {
    target.filter(|t| !t.trim().is_empty())
}
