use std::collections::BTreeMap;
use std::collections::btree_map::Iter;

use bon::Builder;
use serde::Serialize;

use super::ContextRow;
use crate::dialect::field_key;

/// Data-type name to formatting rule, e.g. `"date" -> "YYYY-MM-DD"`.
pub type TypeRules = BTreeMap<String, String>;

/// Explicit field key to target reference associations.
///
/// Keys are normalized with [`field_key`] on insert, so `{{Name}}` and `Name`
/// address the same entry. Targets may be bare paths (`contact.name`) or
/// complete target-dialect tags (`{{contact.name}}`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DirectMappingTable {
    entries: BTreeMap<String, String>,
}

impl DirectMappingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a mapping, returning the previous target for the key.
    pub fn insert(&mut self, key: &str, target: impl Into<String>) -> Option<String> {
        let target: String = target.into();
        self.entries.insert(field_key(key), target.trim().to_string())
    }

    /// Looks up the target for an already-normalized field key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> Iter<'_, String, String> {
        self.entries.iter()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for DirectMappingTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = DirectMappingTable::new();
        for (key, target) in iter {
            table.insert(key.as_ref(), target);
        }
        table
    }
}

/// A repeating section: a source `TableStart` block mapped to a target
/// collection path, with its own field table for merge fields inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepeatingSection {
    /// Target collection path, e.g. `opportunity.line_items`.
    pub target_path: String,
    /// Source block parameter, e.g. `LineItems` for `{{TableStart:LineItems}}`.
    pub block: String,
    /// Field mappings that apply inside the block.
    pub fields: DirectMappingTable,
}

/// All mapping sources consulted during one conversion run.
///
/// # Example
///
/// ```
/// use tagbridge::{ContextRow, MappingSources};
///
/// let sources = MappingSources::builder()
///     .direct([("Name", "contact.name")].into_iter().collect())
///     .context(vec![ContextRow::new("Email", Some("contact.email"))])
///     .build();
///
/// assert_eq!(sources.direct.get("Name"), Some("contact.name"));
/// assert_eq!(sources.context.len(), 1);
/// ```
#[derive(Debug, Clone, Default, Builder)]
pub struct MappingSources {
    /// Highest-priority explicit mappings.
    #[builder(default)]
    pub direct: DirectMappingTable,

    /// Tabular fallback rows, scanned in order.
    #[builder(default)]
    pub context: Vec<ContextRow>,

    /// Repeating sections keyed by their source block.
    #[builder(default)]
    pub sections: Vec<RepeatingSection>,

    /// Formatting rules recorded in report notes for typed context rows.
    #[builder(default)]
    pub type_rules: TypeRules,

    /// Field names selected by the query context, used to annotate
    /// unmapped-field warnings.
    #[builder(default)]
    pub query_fields: Vec<String>,
}

impl MappingSources {
    /// Sources with no mappings at all. Every merge field resolves as unmapped.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The repeating section declared for a source block, if any.
    pub fn section_for_block(&self, block: &str) -> Option<&RepeatingSection> {
        self.sections.iter().find(|section| section.block == block)
    }

    /// Whether the query context selects `key`.
    pub fn is_query_field(&self, key: &str) -> bool {
        self.query_fields.iter().any(|field| field == key)
    }
}
