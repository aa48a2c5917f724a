//! Delimiters of the two tag dialects.
//!
//! Both dialects share the `{{ }}` delimiter pair. The target dialect writes
//! block openers as `{{#name}}` and closers as `{{/name}}`.

pub const OPEN_DELIMITER: &str = "{{";
pub const CLOSE_DELIMITER: &str = "}}";

/// Whether `target` is already a complete `{{...}}` tag.
pub fn is_wrapped(target: &str) -> bool {
    target.len() >= OPEN_DELIMITER.len() + CLOSE_DELIMITER.len()
        && target.starts_with(OPEN_DELIMITER)
        && target.ends_with(CLOSE_DELIMITER)
}

/// Wraps a bare target path in delimiters. Already-wrapped tags pass through.
pub fn wrap_target(target: &str) -> String {
    if is_wrapped(target) {
        target.to_string()
    } else {
        format!("{OPEN_DELIMITER}{target}{CLOSE_DELIMITER}")
    }
}

/// Strips one pair of delimiters, if present, and trims the remainder.
pub fn unwrap_target(target: &str) -> &str {
    if is_wrapped(target) {
        target[OPEN_DELIMITER.len()..target.len() - CLOSE_DELIMITER.len()].trim()
    } else {
        target.trim()
    }
}

/// Normalizes a mapping-source key to the bare field name used for lookup.
///
/// Mapping files may spell keys as `Name` or as the full tag `{{Name}}`; both
/// resolve to `Name`.
pub fn field_key(raw: &str) -> String {
    unwrap_target(raw.trim()).to_string()
}

/// Target-dialect block opener for `name`.
pub fn open_block(name: &str) -> String {
    format!("{OPEN_DELIMITER}#{name}{CLOSE_DELIMITER}")
}

/// Target-dialect block closer for `name`.
pub fn close_block(name: &str) -> String {
    format!("{OPEN_DELIMITER}/{name}{CLOSE_DELIMITER}")
}
