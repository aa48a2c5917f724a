//! Tag tokenizer using winnow.
//!
//! Splits raw document text into literal text runs and tags. A tag is `{{`,
//! one or more characters other than `}`, then `}}`. Anything that does not
//! match, including an unterminated `{{`, stays literal text.

use std::ops::Range;

use winnow::combinator::delimited;
use winnow::prelude::*;
use winnow::token::take_till;

use super::ast::Element;
use super::classify::classify;

/// Returns a lazy iterator over the elements of `input`.
///
/// The iterator is `Clone`, so a sequence can be restarted from any point.
/// Concatenating [`Element::source_text`] over all elements reproduces
/// `input` exactly.
pub fn tokenize(input: &str) -> Tokens<'_> {
    Tokens { input, position: 0 }
}

/// Tokenizes several text runs (paragraphs, table cells) in document order.
///
/// Tags never span runs. Consecutive runs are separated by a newline text
/// element so that the converted document keeps one run per line.
pub fn tokenize_runs<'a>(runs: impl IntoIterator<Item = &'a str>) -> Vec<Element> {
    let mut elements = Vec::new();
    for (index, run) in runs.into_iter().enumerate() {
        if index > 0 {
            elements.push(Element::text("\n"));
        }
        elements.extend(tokenize(run));
    }
    elements
}

/// Iterator over the elements of a text run.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Tokens<'a> {
    /// Yields each element together with the byte range it covers.
    pub fn spanned(self) -> SpannedTokens<'a> {
        SpannedTokens { tokens: self }
    }

    fn next_spanned(&mut self) -> Option<(Range<usize>, Element)> {
        let start = self.position;
        if start >= self.input.len() {
            return None;
        }

        match find_tag(self.input, start) {
            Some(found) if found.span.start == start => {
                self.position = found.span.end;
                let element = classify(&self.input[found.span.clone()], found.inner);
                Some((found.span, element))
            }
            Some(found) => {
                self.position = found.span.start;
                Some((
                    start..found.span.start,
                    Element::text(&self.input[start..found.span.start]),
                ))
            }
            None => {
                self.position = self.input.len();
                Some((start..self.input.len(), Element::text(&self.input[start..])))
            }
        }
    }
}

impl Iterator for Tokens<'_> {
    type Item = Element;

    fn next(&mut self) -> Option<Element> {
        self.next_spanned().map(|(_, element)| element)
    }
}

/// Iterator over elements paired with their byte ranges in the input.
#[derive(Debug, Clone)]
pub struct SpannedTokens<'a> {
    tokens: Tokens<'a>,
}

impl Iterator for SpannedTokens<'_> {
    type Item = (Range<usize>, Element);

    fn next(&mut self) -> Option<Self::Item> {
        self.tokens.next_spanned()
    }
}

/// A tag located in the input.
struct TagMatch<'i> {
    span: Range<usize>,
    inner: &'i str,
}

/// Finds the leftmost tag starting at or after `from`.
fn find_tag(input: &str, from: usize) -> Option<TagMatch<'_>> {
    let mut search = from;
    while let Some(offset) = input[search..].find("{{") {
        let start = search + offset;
        let mut remaining = &input[start..];
        if let Ok(inner) = tag(&mut remaining) {
            let end = input.len() - remaining.len();
            return Some(TagMatch {
                span: start..end,
                inner,
            });
        }
        // `{` is one byte, so the next candidate starts on a char boundary.
        search = start + 1;
    }
    None
}

/// Parse a single tag, returning the content between the delimiters.
fn tag<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    delimited("{{", take_till(1.., '}'), "}}").parse_next(input)
}
