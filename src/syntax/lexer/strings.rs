//! String literal scanning (prefixes, triple quotes, escapes)

use crate::syntax::token::Token;
use crate::syntax::token_type::TokenType;

use super::Lexer;

/// Prefixes that may precede a quote: raw, bytes, formatted and unicode.
pub(super) fn is_string_prefix(ident: &str) -> bool {
    matches!(
        ident.to_ascii_lowercase().as_str(),
        "r" | "u" | "f" | "b" | "br" | "rb" | "fr" | "rf"
    )
}

impl Lexer {
    /// Read a string literal whose optional `prefix` was already consumed.
    /// The token literal keeps the prefix and the quotes. An unterminated
    /// literal comes back as an `Illegal` token.
    pub(super) fn read_string(&mut self, prefix: String, line: usize, column: usize) -> Token {
        let Some(quote) = self.current_char() else {
            return Token::new(TokenType::Illegal, prefix, line, column);
        };
        let triple = self.peek_char() == Some(quote) && self.peek_nth(2) == Some(quote);

        let mut literal = prefix;
        let opening = if triple { 3 } else { 1 };
        for _ in 0..opening {
            literal.push(quote);
            self.read_char();
        }

        loop {
            match self.current_char() {
                None => return Token::new(TokenType::Illegal, literal, line, column),
                Some('\\') => {
                    // Escapes hide the next char from quote matching, raw or not.
                    literal.push('\\');
                    self.read_char();
                    if let Some(next) = self.current_char() {
                        literal.push(next);
                        self.read_char();
                    }
                }
                Some('\n') if !triple => {
                    return Token::new(TokenType::Illegal, literal, line, column);
                }
                Some(ch) if ch == quote => {
                    if !triple {
                        literal.push(ch);
                        self.read_char();
                        return Token::new(TokenType::String, literal, line, column);
                    }
                    if self.peek_char() == Some(quote) && self.peek_nth(2) == Some(quote) {
                        for _ in 0..3 {
                            literal.push(quote);
                            self.read_char();
                        }
                        return Token::new(TokenType::String, literal, line, column);
                    }
                    literal.push(ch);
                    self.read_char();
                }
                Some(ch) => {
                    literal.push(ch);
                    self.read_char();
                }
            }
        }
    }
}

/// Split a string token literal into `(prefix, body)` where `body` is the
/// text between the quotes.
pub fn split_string_literal(literal: &str) -> (&str, &str) {
    let prefix_len = literal
        .find(['\'', '"'])
        .unwrap_or(literal.len());
    let (prefix, quoted) = literal.split_at(prefix_len);
    let quote_len = if quoted.starts_with("'''") || quoted.starts_with("\"\"\"") {
        3
    } else {
        1
    };
    if quoted.len() < quote_len * 2 {
        return (prefix, "");
    }
    (prefix, &quoted[quote_len..quoted.len() - quote_len])
}
