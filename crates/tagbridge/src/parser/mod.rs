//! Source-dialect tokenizer and tag classifier.
//!
//! This module turns raw document text into an ordered sequence of
//! [`Element`]s. It never fails: malformed tag syntax is kept as literal text.

pub mod ast;
mod classify;
mod tokenizer;

pub use ast::{ControlKind, Element};
pub use classify::classify;
pub use tokenizer::{SpannedTokens, Tokens, tokenize, tokenize_runs};
