//! Public element types produced by the tokenizer.
//!
//! These types are public so that callers can build element sequences by hand
//! (for example from a document extractor that already knows tag boundaries)
//! and feed them to [`crate::convert`].

use serde::Serialize;

/// A single element of a tokenized source-dialect document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Element {
    /// Literal text between tags, preserved byte for byte.
    Text { content: String },
    /// A scalar placeholder: `{{Field}}`.
    MergeField {
        /// The full tag as written, delimiters included.
        original_tag: String,
        /// Trimmed content between the delimiters.
        field_name: String,
    },
    /// A structural tag: `{{TableStart:Rows}}`, `{{IF:cond}}`, `{{ENDIF}}`.
    ControlTag {
        original_tag: String,
        /// Text before the first colon, trimmed.
        control_type: String,
        /// Text after the first colon, trimmed. `None` when absent or empty.
        parameter: Option<String>,
    },
}

impl Element {
    /// Creates a text element.
    pub fn text(content: impl Into<String>) -> Element {
        Element::Text {
            content: content.into(),
        }
    }

    /// Creates a merge field element for `{{name}}`.
    pub fn merge_field(name: impl Into<String>) -> Element {
        let field_name = name.into();
        Element::MergeField {
            original_tag: format!("{{{{{field_name}}}}}"),
            field_name,
        }
    }

    /// Creates a control tag element, writing the original tag in canonical
    /// `{{Type:Parameter}}` or `{{Type}}` form.
    pub fn control(control_type: impl Into<String>, parameter: Option<&str>) -> Element {
        let control_type = control_type.into();
        let original_tag = match parameter {
            Some(p) => format!("{{{{{control_type}:{p}}}}}"),
            None => format!("{{{{{control_type}}}}}"),
        };
        Element::ControlTag {
            original_tag,
            control_type,
            parameter: parameter.map(str::to_string),
        }
    }

    /// The exact source text this element covers.
    pub fn source_text(&self) -> &str {
        match self {
            Element::Text { content } => content,
            Element::MergeField { original_tag, .. } | Element::ControlTag { original_tag, .. } => {
                original_tag
            }
        }
    }

    /// Whether this is a text element containing only whitespace.
    pub fn is_blank_text(&self) -> bool {
        matches!(self, Element::Text { content } if content.trim().is_empty())
    }

    /// The control kind of a control tag, or `None` for other elements.
    pub fn control_kind(&self) -> Option<ControlKind> {
        match self {
            Element::ControlTag { control_type, .. } => Some(ControlKind::from_name(control_type)),
            Element::Text { .. } | Element::MergeField { .. } => None,
        }
    }
}

/// The structural role of a control tag in the source dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKind {
    /// `TableStart:<dataset>` opens a repeating table section.
    TableStart,
    /// `IF:<condition>` opens a conditional block.
    If,
    /// `TableEnd[:<dataset>]` closes the innermost block.
    TableEnd,
    /// `ENDIF` closes the innermost block.
    EndIf,
    /// Any control type the converter does not understand.
    Other,
}

impl ControlKind {
    /// Maps a control-type name to its kind. Matching is exact.
    pub fn from_name(name: &str) -> ControlKind {
        match name {
            "TableStart" => ControlKind::TableStart,
            "IF" => ControlKind::If,
            "TableEnd" => ControlKind::TableEnd,
            "ENDIF" => ControlKind::EndIf,
            _ => ControlKind::Other,
        }
    }

    pub fn opens_block(self) -> bool {
        matches!(self, ControlKind::TableStart | ControlKind::If)
    }

    pub fn closes_block(self) -> bool {
        matches!(self, ControlKind::TableEnd | ControlKind::EndIf)
    }

    /// Whether `name` is a closer keyword that may appear without a colon.
    pub fn is_bare_closer(name: &str) -> bool {
        ControlKind::from_name(name).closes_block()
    }
}
