use serde::Serialize;

use crate::dialect::field_key;

/// One row of the tabular context data set.
///
/// Rows are a fallback association between a source field key and a target
/// reference, consulted when no direct mapping exists. The first row with a
/// matching key and a non-empty target wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextRow {
    /// Normalized source field key.
    pub source_key: String,
    /// Target field reference, if the row supplies one.
    pub target: Option<String>,
    /// Declared data type, e.g. `string`, `date`.
    pub data_type: Option<String>,
    /// Where the value originates, e.g. a source table name.
    pub origin: Option<String>,
}

impl ContextRow {
    /// Creates a row. The key is normalized; a blank target is treated as absent.
    pub fn new(source_key: &str, target: Option<&str>) -> ContextRow {
        ContextRow {
            source_key: field_key(source_key),
            target: non_blank(target),
            data_type: None,
            origin: None,
        }
    }

    pub fn with_data_type(mut self, data_type: &str) -> ContextRow {
        self.data_type = non_blank(Some(data_type));
        self
    }

    pub fn with_origin(mut self, origin: &str) -> ContextRow {
        self.origin = non_blank(Some(origin));
        self
    }

    /// The target reference, ignoring blank values.
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref().filter(|t| !t.trim().is_empty())
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
