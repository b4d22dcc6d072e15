//! Snippet lexer - turns a source fragment into layout-aware tokens

mod state;
mod strings;

use std::collections::VecDeque;

use state::LayoutState;

use crate::syntax::token::Token;
use crate::syntax::token_type::{SYMBOLS, TokenType, lookup_ident};

pub use strings::split_string_literal;

/// Tokenizer for the indentation-sensitive snippet language.
///
/// Besides ordinary tokens it produces `Newline` at the end of every logical
/// line, and `Indent` / `Dedent` when the indentation of a logical line
/// changes. Newlines inside brackets and after a `\` continuation are joined.
#[derive(Debug, Clone)]
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    state: LayoutState,
    pending: VecDeque<Token>,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 0,
            state: LayoutState::new(),
            pending: VecDeque::new(),
        }
    }

    /// Lex the whole input. The returned vector always ends with `Eof`.
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.token_type == TokenType::Eof;
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }

    pub fn next_token(&mut self) -> Token {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return token;
            }
            if self.state.finished {
                return Token::new(TokenType::Eof, "", self.line, self.column);
            }
            if self.state.at_line_start {
                self.state.at_line_start = false;
                if self.state.depth == 0 {
                    self.read_indentation();
                    continue;
                }
            }

            self.skip_whitespace();
            let (line, column) = (self.line, self.column);

            match self.current_char() {
                None => self.finish(),
                Some('#') => self.skip_comment(),
                Some('\n') => {
                    self.read_char();
                    if self.state.depth == 0 {
                        self.state.at_line_start = true;
                        if self.state.line_has_tokens {
                            self.state.line_has_tokens = false;
                            return Token::new(TokenType::Newline, "\n", line, column);
                        }
                    }
                }
                Some('\\') => {
                    if !self.skip_continuation() {
                        self.read_char();
                        self.state.line_has_tokens = true;
                        return Token::new(TokenType::Illegal, "\\", line, column);
                    }
                }
                Some(_) => {
                    let token = self.read_token(line, column);
                    self.state.line_has_tokens = true;
                    return token;
                }
            }
        }
    }

    fn read_token(&mut self, line: usize, column: usize) -> Token {
        let Some(ch) = self.current_char() else {
            return Token::new(TokenType::Eof, "", line, column);
        };

        if is_ident_start(ch) {
            let ident = self.read_identifier();
            if strings::is_string_prefix(&ident)
                && matches!(self.current_char(), Some('\'') | Some('"'))
            {
                return self.read_string(ident, line, column);
            }
            return Token::new(lookup_ident(&ident), ident, line, column);
        }

        if ch.is_ascii_digit()
            || (ch == '.' && self.peek_char().is_some_and(|c| c.is_ascii_digit()))
        {
            let number = self.read_number();
            return Token::new(TokenType::Number, number, line, column);
        }

        if ch == '\'' || ch == '"' {
            return self.read_string(String::new(), line, column);
        }

        for (symbol, token_type) in SYMBOLS {
            if self.starts_with(symbol) {
                for _ in 0..symbol.chars().count() {
                    self.read_char();
                }
                self.track_bracket(*token_type);
                return Token::new(*token_type, *symbol, line, column);
            }
        }

        self.read_char();
        Token::new(TokenType::Illegal, ch.to_string(), line, column)
    }

    fn read_identifier(&mut self) -> String {
        let mut ident = String::new();
        while let Some(ch) = self.current_char() {
            if !is_ident_continue(ch) {
                break;
            }
            ident.push(ch);
            self.read_char();
        }
        ident
    }

    fn read_number(&mut self) -> String {
        let mut number = String::new();
        let is_hex = self.current_char() == Some('0')
            && matches!(self.peek_char(), Some('x') | Some('X'));
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_alphanumeric() || ch == '_' || ch == '.' {
                number.push(ch);
                self.read_char();
                if !is_hex
                    && matches!(ch, 'e' | 'E')
                    && let Some(sign @ ('+' | '-')) = self.current_char()
                {
                    number.push(sign);
                    self.read_char();
                }
            } else {
                break;
            }
        }
        number
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if matches!(ch, ' ' | '\t' | '\r' | '\x0c') {
                self.read_char();
            } else {
                break;
            }
        }
    }

    fn skip_comment(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch == '\n' {
                break;
            }
            self.read_char();
        }
    }

    /// Consume a `\` line continuation. Returns `false` when the backslash is
    /// not followed by a line break.
    fn skip_continuation(&mut self) -> bool {
        let after = match (self.peek_char(), self.peek_nth(2)) {
            (Some('\n'), _) => 2,
            (Some('\r'), Some('\n')) => 3,
            _ => return false,
        };
        for _ in 0..after {
            self.read_char();
        }
        true
    }

    fn starts_with(&self, symbol: &str) -> bool {
        symbol
            .chars()
            .enumerate()
            .all(|(offset, expected)| self.input.get(self.position + offset) == Some(&expected))
    }

    pub(super) fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    pub(super) fn peek_char(&self) -> Option<char> {
        self.peek_nth(1)
    }

    pub(super) fn peek_nth(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    pub(super) fn read_char(&mut self) {
        if let Some(ch) = self.current_char() {
            self.position += 1;
            if ch == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
        }
    }
}

fn is_ident_start(ch: char) -> bool {
    ch == '_' || ch.is_alphabetic()
}

fn is_ident_continue(ch: char) -> bool {
    ch == '_' || ch.is_alphanumeric()
}
