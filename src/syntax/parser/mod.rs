//! Recursive-descent parser for source snippets.
//!
//! The grammar is the statement and expression grammar of an
//! indentation-sensitive scripting language, with two relaxations that make
//! sense for isolated fragments: a block header at the end of the input may
//! have no body, and `elif` / `else` / `except` / `finally` / `case` headers
//! and decorators are accepted on their own.

use crate::error::ParseError;
use crate::syntax::{
    lexer::Lexer, position::Position, statement::Snippet, token::Token, token_type::TokenType,
};

mod expression;
mod pattern;
mod statement;

pub type ParseResult<T> = Result<T, ParseError>;

/// Brackets, unary operators, lambdas and conditionals nested deeper than
/// this are rejected instead of exhausting the stack.
pub const MAX_NESTING: usize = 100;

pub struct Parser {
    tokens: Vec<Token>,
    index: usize,
    depth: usize,
}

impl Parser {
    pub fn new(lexer: Lexer) -> Self {
        let mut tokens = lexer.tokenize();
        if tokens.is_empty() {
            tokens.push(Token::new(TokenType::Eof, "", 1, 0));
        }
        Self {
            tokens,
            index: 0,
            depth: 0,
        }
    }

    pub fn parse_snippet(&mut self) -> ParseResult<Snippet> {
        let mut snippet = Snippet::default();
        loop {
            match self.current().token_type {
                TokenType::Eof => break,
                TokenType::Newline => self.next_token(),
                TokenType::Indent => return Err(self.error("unexpected indent")),
                TokenType::Dedent => return Err(self.error("unexpected unindent")),
                _ => snippet.statements.extend(self.parse_statement()?),
            }
        }
        Ok(snippet)
    }

    fn current(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.index.min(last)]
    }

    fn peek(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.index + 1).min(last)]
    }

    /// Whether the current token is the identifier `word`.
    fn current_is_word(&self, word: &str) -> bool {
        self.current_is(TokenType::Ident) && self.current().literal == word
    }

    fn current_is(&self, token_type: TokenType) -> bool {
        self.current().token_type == token_type
    }

    fn peek_is(&self, token_type: TokenType) -> bool {
        self.peek().token_type == token_type
    }

    fn next_token(&mut self) {
        if self.index < self.tokens.len() - 1 {
            self.index += 1;
        }
    }

    /// Consume the current token if it has the given type.
    fn eat(&mut self, token_type: TokenType) -> bool {
        if self.current_is(token_type) {
            self.next_token();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token_type: TokenType) -> ParseResult<Token> {
        if self.current_is(token_type) {
            let token = self.current().clone();
            self.next_token();
            Ok(token)
        } else {
            Err(self.unexpected(&format!("expected `{}`", token_type)))
        }
    }

    fn expect_ident(&mut self) -> ParseResult<(String, Position)> {
        let token = self.expect(TokenType::Ident)?;
        Ok((token.literal, token.position))
    }

    /// Run `parse` one nesting level deeper.
    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        if self.depth >= MAX_NESTING {
            return Err(self.error("expression nested too deeply"));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        let position = self.current().position;
        ParseError::new(position.line, position.column + 1, message)
    }

    /// Error describing the current token, prefixed with `context`.
    fn unexpected(&self, context: &str) -> ParseError {
        let token = self.current();
        let found = match token.token_type {
            TokenType::Eof => "end of input".to_string(),
            TokenType::Newline => "end of line".to_string(),
            TokenType::Indent => "indent".to_string(),
            TokenType::Dedent => "unindent".to_string(),
            TokenType::Illegal if token.literal.contains(['\'', '"']) => {
                "unterminated string literal".to_string()
            }
            TokenType::Illegal => token.literal.clone(),
            _ => format!("`{}`", token.literal),
        };
        self.error(format!("{}, found {}", context, found))
    }
}
