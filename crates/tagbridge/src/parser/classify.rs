//! Classifies the inner content of a matched tag.

use super::ast::{ControlKind, Element};

/// Classifies a tag given its full text and the content between the delimiters.
///
/// Content containing a colon is a control tag split on the first colon: the
/// left side is the control type, the right side the parameter (`None` when
/// empty). Content without a colon is a merge field, except for the closer
/// keywords `ENDIF` and `TableEnd`, which are written bare in the source
/// dialect.
///
/// A merge field whose name contains a colon is therefore classified as a
/// control tag. This is an accepted limitation of the source dialect.
pub fn classify(original_tag: &str, inner: &str) -> Element {
    let trimmed = inner.trim();

    if let Some((control_type, parameter)) = trimmed.split_once(':') {
        let parameter = parameter.trim();
        return Element::ControlTag {
            original_tag: original_tag.to_string(),
            control_type: control_type.trim().to_string(),
            parameter: (!parameter.is_empty()).then(|| parameter.to_string()),
        };
    }

    if ControlKind::is_bare_closer(trimmed) {
        return Element::ControlTag {
            original_tag: original_tag.to_string(),
            control_type: trimmed.to_string(),
            parameter: None,
        };
    }

    Element::MergeField {
        original_tag: original_tag.to_string(),
        field_name: trimmed.to_string(),
    }
}
