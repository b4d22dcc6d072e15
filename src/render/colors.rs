//! ANSI codes for console output
//!
//! Colors are applied only when stdout is a terminal and NO_COLOR is unset.

use std::{
    env,
    io::{self, IsTerminal},
};

use super::Style;

const RESET: &str = "\u{1b}[0m";
const BOLD: &str = "\u{1b}[1m";
const RED: &str = "\u{1b}[31m";
const GREEN: &str = "\u{1b}[32m";
const YELLOW: &str = "\u{1b}[33m";
const WHITE: &str = "\u{1b}[37m";
const REVERSE_RED: &str = "\u{1b}[7m\u{1b}[31m";
const DARK_WHITE: &str = "\u{1b}[2m\u{1b}[37m";

/// Start sequence for a style: attributes first, then the color.
pub fn start(style: Style) -> &'static str {
    match style {
        Style::Banner | Style::Undefined | Style::Unprintable => RED,
        Style::FileName | Style::LineNumber | Style::Scope | Style::Code => BOLD,
        Style::Name => YELLOW,
        Style::Value => GREEN,
        Style::Summary => REVERSE_RED,
        Style::Duration | Style::ContextLine => DARK_WHITE,
        Style::CurrentLine => WHITE,
    }
}

/// Wrap every line of `text` in the style's codes, so that a line can be
/// indented or logged on its own.
pub fn paint(text: &str, style: Style) -> String {
    let start = start(style);
    text.split('\n')
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{}{}{}", start, line, RESET)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Check if colors should be disabled
pub fn colors_disabled() -> bool {
    env::var_os("NO_COLOR").is_some()
}

pub fn stdout_supports_color() -> bool {
    io::stdout().is_terminal() && !colors_disabled()
}

pub fn strip_ansi(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\u{1b}'
            && let Some('[') = chars.peek().copied()
        {
            chars.next();
            for seq_ch in chars.by_ref() {
                if ('@'..='~').contains(&seq_ch) {
                    break;
                }
            }
            continue;
        }
        out.push(ch);
    }
    out
}
