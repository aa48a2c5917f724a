//! SQL query-context file: field names selected by SELECT statements.
//!
//! Only the SELECT list of each statement is parsed. Each item contributes
//! its alias (`expr AS Alias` or `expr Alias`) or, without one, its
//! expression text. Everything after the list is ignored, and statements
//! that are not SELECTs are skipped.

use std::fs::read_to_string;
use std::iter::repeat_n;
use std::path::Path;

use tracing::warn;
use winnow::ascii::{Caseless, multispace0, multispace1};
use winnow::combinator::{alt, delimited, eof, not, opt, preceded, repeat, separated, terminated};
use winnow::prelude::*;
use winnow::token::{literal, one_of, take_till, take_while};

use super::LoadError;

const CLAUSE_KEYWORDS: [&str; 8] = [
    "FROM", "INTO", "WHERE", "GROUP", "ORDER", "HAVING", "LIMIT", "UNION",
];

/// Extracts selected field names, de-duplicated in first-seen order.
pub fn parse_query_sql(content: &str) -> Result<Vec<String>, LoadError> {
    let cleaned = strip_line_comments(content);
    let mut fields: Vec<String> = Vec::new();

    for (offset, statement) in split_statements(&cleaned) {
        let trimmed = statement.trim();
        if trimmed.is_empty() {
            continue;
        }
        let mut probe = trimmed;
        if keyword("SELECT").parse_next(&mut probe).is_err() {
            warn!(
                statement = first_word(trimmed),
                "skipping non-SELECT statement in query context"
            );
            continue;
        }

        let mut input = statement;
        match select_statement(&mut input) {
            Ok(items) => {
                for item in items {
                    let name = field_name(&item);
                    if !name.is_empty() && !fields.contains(&name) {
                        fields.push(name);
                    }
                }
            }
            Err(_) => {
                let start = offset + (statement.len() - statement.trim_start().len());
                let (line, column) = calculate_position(&cleaned, start);
                return Err(LoadError::Query {
                    line,
                    column,
                    message: "malformed or empty select list".to_string(),
                });
            }
        }
    }

    Ok(fields)
}

/// Reads and parses a query-context file.
pub fn load_query_file(path: &Path) -> Result<Vec<String>, LoadError> {
    let content = read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_query_sql(&content)
}

/// Calculate line and column from a byte offset.
fn calculate_position(original: &str, consumed: usize) -> (usize, usize) {
    let consumed_str = &original[..consumed];
    let line = consumed_str.chars().filter(|&c| c == '\n').count() + 1;
    let column = match consumed_str.rfind('\n') {
        Some(pos) => consumed - pos,
        None => consumed + 1,
    };
    (line, column)
}

/// Blanks out `--` comments, keeping byte offsets intact.
fn strip_line_comments(content: &str) -> String {
    let mut result = String::with_capacity(content.len());
    let mut in_quote: Option<char> = None;
    let mut in_comment = false;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if in_comment {
            if c == '\n' {
                in_comment = false;
                result.push(c);
            } else {
                result.extend(repeat_n(' ', c.len_utf8()));
            }
            continue;
        }
        match in_quote {
            Some(quote) if c == quote => in_quote = None,
            Some(_) => {}
            None if c == '\'' || c == '"' => in_quote = Some(c),
            None if c == '-' && chars.peek() == Some(&'-') => {
                in_comment = true;
                result.push(' ');
                continue;
            }
            None => {}
        }
        result.push(c);
    }
    result
}

/// Splits on `;` outside quotes, yielding each statement with its byte offset.
fn split_statements(content: &str) -> Vec<(usize, &str)> {
    let mut statements = Vec::new();
    let mut start = 0;
    let mut in_quote: Option<char> = None;

    for (index, c) in content.char_indices() {
        match in_quote {
            Some(quote) if c == quote => in_quote = None,
            Some(_) => {}
            None if c == '\'' || c == '"' => in_quote = Some(c),
            None if c == ';' => {
                statements.push((start, &content[start..index]));
                start = index + 1;
            }
            None => {}
        }
    }
    statements.push((start, &content[start..]));
    statements
}

fn first_word(statement: &str) -> &str {
    statement.split_whitespace().next().unwrap_or_default()
}

/// The name a select-list item contributes: its alias, or the expression.
fn field_name(item: &str) -> String {
    let tokens: Vec<&str> = item.split_whitespace().collect();
    if let [.., before, last] = tokens.as_slice() {
        let alias = last.trim_matches(|c| c == '"' || c == '\'');
        let is_identifier = !alias.is_empty() && alias.chars().all(is_word_char);
        if is_identifier && !before.ends_with(['+', '-', '*', '/', '|']) {
            return alias.to_string();
        }
    }
    item.trim().to_string()
}

/// Parse `SELECT [DISTINCT] item, item, ...` up to the first clause keyword.
fn select_statement(input: &mut &str) -> ModalResult<Vec<String>> {
    preceded(
        (
            multispace0,
            keyword("SELECT"),
            opt((multispace1, keyword("DISTINCT"))),
        ),
        terminated(
            separated(1.., select_item, ','),
            (multispace0, alt((eof, clause_keyword))),
        ),
    )
    .parse_next(input)
}

/// Parse one select-list item, returning its trimmed text.
fn select_item(input: &mut &str) -> ModalResult<String> {
    let _ = multispace0.parse_next(input)?;
    let pieces: Vec<&str> = repeat(1.., item_piece).parse_next(input)?;
    Ok(pieces.concat().trim().to_string())
}

/// Parse one piece of a select-list item.
fn item_piece<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    alt((
        paren_group,
        quoted,
        word,
        multispace1,
        take_while(1.., |c: char| {
            !c.is_whitespace() && !is_word_char(c) && !matches!(c, ',' | '(' | ')' | '\'' | '"')
        }),
    ))
    .parse_next(input)
}

/// Parse a word that is not a clause keyword.
fn word<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., |c: char| is_word_char(c) || c == '.')
        .verify(|w: &str| !is_clause_keyword(w))
        .parse_next(input)
}

/// Parse a balanced parenthesized group, e.g. a function call or subquery.
fn paren_group<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    delimited('(', repeat::<_, _, (), _, _>(0.., group_piece), ')')
        .take()
        .parse_next(input)
}

fn group_piece<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    alt((
        paren_group,
        quoted,
        take_while(1.., |c: char| !matches!(c, '(' | ')' | '\'' | '"')),
    ))
    .parse_next(input)
}

/// Parse a single- or double-quoted literal.
fn quoted<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    alt((
        delimited('\'', take_till(0.., '\''), '\'').take(),
        delimited('"', take_till(0.., '"'), '"').take(),
    ))
    .parse_next(input)
}

fn clause_keyword<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., is_word_char)
        .verify(is_clause_keyword)
        .parse_next(input)
}

/// Parse a case-insensitive keyword that is not a prefix of a longer word.
fn keyword<'i>(word: &'static str) -> impl FnMut(&mut &'i str) -> ModalResult<&'i str> {
    move |input: &mut &'i str| {
        terminated(literal(Caseless(word)), not(one_of(is_word_char))).parse_next(input)
    }
}

fn is_clause_keyword(word: &str) -> bool {
    CLAUSE_KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(word))
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
