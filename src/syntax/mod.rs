//! Snippet grammar: lexer, parser and name extraction for source fragments.

use crate::error::ParseError;

pub mod expression;
pub mod lexer;
pub mod names;
pub mod parser;
pub mod position;
pub mod precedence;
pub mod statement;
pub mod token;
pub mod token_type;
pub mod visit;

pub use names::referenced_names;

use lexer::Lexer;
use parser::Parser;
use statement::Snippet;

/// Parse a (dedented) source fragment.
pub fn parse_snippet(source: &str) -> Result<Snippet, ParseError> {
    Parser::new(Lexer::new(source)).parse_snippet()
}
