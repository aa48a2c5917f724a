//! Table formatting utilities for CLI output.

use comfy_table::{presets, ContentArrangement, Table};
use tagbridge::{Element, MappingReportEntry};

const ABSENT: &str = "-";

/// Format mapping report entries as a table.
pub fn format_report_table(entries: &[MappingReportEntry]) -> Table {
    let mut table = new_table(vec!["#", "Source", "Target", "Method", "Note"]);

    for entry in entries {
        table.add_row(vec![
            entry.element_index.to_string(),
            entry.source_tag.clone(),
            entry.target_tag.clone().unwrap_or_else(|| ABSENT.to_string()),
            entry.method.to_string(),
            entry.note.clone().unwrap_or_default(),
        ]);
    }

    table
}

/// Format tokenized elements as a table. Blank text runs are skipped unless
/// `show_blank` is set.
pub fn format_element_table(elements: &[Element], show_blank: bool) -> Table {
    let mut table = new_table(vec!["#", "Kind", "Tag", "Control Type", "Parameter"]);

    for (index, element) in elements.iter().enumerate() {
        if element.is_blank_text() && !show_blank {
            continue;
        }
        let row = match element {
            Element::Text { content } => vec![
                index.to_string(),
                "text".to_string(),
                format!("{content:?}"),
                ABSENT.to_string(),
                ABSENT.to_string(),
            ],
            Element::MergeField { original_tag, .. } => vec![
                index.to_string(),
                "merge-field".to_string(),
                original_tag.clone(),
                ABSENT.to_string(),
                ABSENT.to_string(),
            ],
            Element::ControlTag {
                original_tag,
                control_type,
                parameter,
            } => vec![
                index.to_string(),
                "control-tag".to_string(),
                original_tag.clone(),
                control_type.clone(),
                parameter.clone().unwrap_or_else(|| ABSENT.to_string()),
            ],
        };
        table.add_row(row);
    }

    table
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_BORDERS_ONLY);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    table
}
