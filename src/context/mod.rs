//! Minimal source context around a faulting line.
//!
//! A single physical line is often not a statement on its own: a call whose
//! arguments wrap across lines faults on its last line. The resolver grows
//! the fragment backwards until it is complete, either by parsing it or by
//! balancing parentheses, within a fixed look-back bound.

use std::collections::{BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::source::LineSource;
use crate::syntax;

mod brackets;
pub mod identifiers;
mod text;

pub use brackets::strip_comment;
pub use text::dedent;

use brackets::paren_balance;
use identifiers::lexical_names;
use text::trim_blank_lines;

/// Placeholder for a window line that cannot be read.
pub const MISSING_LINE: &str = "~";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Prepend lines until the fragment parses.
    #[default]
    Parse,
    /// Prepend lines until parentheses balance.
    Brackets,
}

/// Lines surrounding the faulting line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Window {
    pub before: Vec<String>,
    pub line: String,
    pub after: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFragment {
    /// Dedented statement text; empty when the faulting line is unavailable.
    pub text: String,
    pub first_line: usize,
    pub target_line: usize,
    pub identifiers: BTreeSet<String>,
    /// Whether `text` parsed (or balanced) before the look-back gave out.
    pub complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<Window>,
}

impl SourceFragment {
    pub fn empty(target_line: usize) -> Self {
        Self {
            text: String::new(),
            first_line: target_line,
            target_line,
            identifiers: BTreeSet::new(),
            complete: false,
            window: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ContextResolver {
    strategy: Strategy,
    max_lookback: usize,
    context_lines: usize,
}

impl Default for ContextResolver {
    fn default() -> Self {
        Self::new(Strategy::Parse)
    }
}

impl ContextResolver {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            max_lookback: 10,
            context_lines: 0,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            strategy: config.strategy,
            max_lookback: config.max_lookback,
            context_lines: config.context_lines,
        }
    }

    pub fn with_lookback(mut self, max_lookback: usize) -> Self {
        self.max_lookback = max_lookback;
        self
    }

    pub fn with_context_lines(mut self, context_lines: usize) -> Self {
        self.context_lines = context_lines;
        self
    }

    /// Resolve the fragment containing line `line` (1-based) of `source`.
    pub fn resolve<S: LineSource + ?Sized>(&self, source: &S, line: usize) -> SourceFragment {
        let Some(target) = source.line(line).filter(|text| !text.trim().is_empty()) else {
            return SourceFragment::empty(line);
        };

        let mut fragment = match self.strategy {
            Strategy::Parse => self.expand_until_parsed(source, line, target),
            Strategy::Brackets => self.expand_until_balanced(source, line, target),
        };
        if self.context_lines > 0 {
            fragment.window = Some(self.window(source, line, target));
        }
        fragment
    }

    fn expand_until_parsed<S: LineSource + ?Sized>(
        &self,
        source: &S,
        line: usize,
        target: &str,
    ) -> SourceFragment {
        let mut lines = VecDeque::from([target]);
        let mut first_line = line;
        loop {
            let text = dedent(&join(&lines));
            match syntax::parse_snippet(&text) {
                Ok(snippet) => {
                    return SourceFragment {
                        text: trim_blank_lines(&text).to_string(),
                        first_line,
                        target_line: line,
                        identifiers: syntax::referenced_names(&snippet),
                        complete: true,
                        window: None,
                    };
                }
                Err(err) => {
                    let added = line - first_line;
                    let previous = (added < self.max_lookback)
                        .then(|| first_line.checked_sub(1))
                        .flatten()
                        .and_then(|number| source.line(number));
                    match previous {
                        Some(previous) => {
                            lines.push_front(previous);
                            first_line -= 1;
                        }
                        None => {
                            log::debug!(
                                "line {} still incomplete after {} look-back lines: {}",
                                line,
                                added,
                                err
                            );
                            return incomplete(&text, first_line, line);
                        }
                    }
                }
            }
        }
    }

    fn expand_until_balanced<S: LineSource + ?Sized>(
        &self,
        source: &S,
        line: usize,
        target: &str,
    ) -> SourceFragment {
        let mut lines = VecDeque::from([strip_comment(target)]);
        let mut balance = paren_balance(lines[0]);
        let mut first_line = line;
        while balance > 0 && line - first_line < self.max_lookback {
            let Some(previous) = first_line.checked_sub(1).and_then(|n| source.line(n)) else {
                break;
            };
            let previous = strip_comment(previous);
            balance += paren_balance(previous);
            lines.push_front(previous);
            first_line -= 1;
        }

        let text = dedent(&join(&lines));
        if balance > 0 {
            log::debug!("parentheses around line {} never balanced", line);
            return incomplete(&text, first_line, line);
        }
        // The balanced text may still be outside the built-in grammar.
        let identifiers = match syntax::parse_snippet(&text) {
            Ok(snippet) => syntax::referenced_names(&snippet),
            Err(_) => lexical_names(&text),
        };
        SourceFragment {
            text: trim_blank_lines(&text).to_string(),
            first_line,
            target_line: line,
            identifiers,
            complete: true,
            window: None,
        }
    }

    fn window<S: LineSource + ?Sized>(&self, source: &S, line: usize, target: &str) -> Window {
        let read = |number: usize| {
            source
                .line(number)
                .map_or_else(|| MISSING_LINE.to_string(), str::to_string)
        };
        let start = line.saturating_sub(self.context_lines).max(1);
        Window {
            before: (start..line).map(read).collect(),
            line: target.to_string(),
            after: (line + 1..=line + self.context_lines).map(read).collect(),
        }
    }
}

fn join(lines: &VecDeque<&str>) -> String {
    lines.iter().copied().collect::<Vec<_>>().join("\n")
}

fn incomplete(text: &str, first_line: usize, target_line: usize) -> SourceFragment {
    SourceFragment {
        text: trim_blank_lines(text).to_string(),
        first_line,
        target_line,
        identifiers: lexical_names(text),
        complete: false,
        window: None,
    }
}

#[cfg(test)]
mod context_test;
