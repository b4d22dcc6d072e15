//! Line layout tracking: indentation stack, bracket depth, logical lines

use crate::syntax::token::Token;
use crate::syntax::token_type::TokenType;

use super::Lexer;

const TAB_WIDTH: usize = 8;

#[derive(Debug, Clone)]
pub(super) struct LayoutState {
    /// Open indentation levels; the bottom entry is always 0.
    pub indents: Vec<usize>,
    /// Nesting depth of (), [] and {}. Newlines inside brackets are joined.
    pub depth: usize,
    pub at_line_start: bool,
    pub line_has_tokens: bool,
    pub finished: bool,
}

impl LayoutState {
    pub fn new() -> Self {
        Self {
            indents: vec![0],
            depth: 0,
            at_line_start: true,
            line_has_tokens: false,
            finished: false,
        }
    }
}

impl Lexer {
    /// Measure the indentation of the line under the cursor and queue the
    /// matching INDENT / DEDENT tokens. Blank and comment-only lines are left
    /// alone; they never open or close a block.
    pub(super) fn read_indentation(&mut self) {
        let mut width = 0usize;
        let mut offset = self.position;
        while let Some(ch) = self.input.get(offset) {
            match ch {
                ' ' => width += 1,
                '\t' => width = (width / TAB_WIDTH + 1) * TAB_WIDTH,
                '\x0c' => width = 0,
                _ => break,
            }
            offset += 1;
        }

        if matches!(
            self.input.get(offset),
            None | Some('\n') | Some('\r') | Some('#')
        ) {
            return;
        }

        while self.position < offset {
            self.read_char();
        }
        self.push_layout(width);
    }

    fn push_layout(&mut self, width: usize) {
        let line = self.line;
        let current = self.state.indents.last().copied().unwrap_or(0);
        if width > current {
            self.state.indents.push(width);
            self.pending
                .push_back(Token::new(TokenType::Indent, "", line, 0));
            return;
        }

        while self.state.indents.len() > 1
            && self.state.indents.last().is_some_and(|&level| level > width)
        {
            self.state.indents.pop();
            self.pending
                .push_back(Token::new(TokenType::Dedent, "", line, 0));
        }

        if self.state.indents.last().copied().unwrap_or(0) != width {
            self.pending.push_back(Token::new(
                TokenType::Illegal,
                "unindent does not match any outer indentation level",
                line,
                width,
            ));
        }
    }

    /// Flush the trailing NEWLINE and DEDENT tokens at end of input.
    pub(super) fn finish(&mut self) {
        let (line, column) = (self.line, self.column);
        if self.state.line_has_tokens && self.state.depth == 0 {
            self.state.line_has_tokens = false;
            self.pending
                .push_back(Token::new(TokenType::Newline, "", line, column));
        }
        while self.state.indents.len() > 1 {
            self.state.indents.pop();
            self.pending
                .push_back(Token::new(TokenType::Dedent, "", line, column));
        }
        self.state.finished = true;
    }

    pub(super) fn track_bracket(&mut self, token_type: TokenType) {
        if token_type.opens_bracket() {
            self.state.depth += 1;
        } else if token_type.closes_bracket() {
            self.state.depth = self.state.depth.saturating_sub(1);
        }
    }
}
