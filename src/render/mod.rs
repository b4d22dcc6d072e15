//! Display tree and its two output sinks.
//!
//! Reports are built as a [`DisplayNode`] tree, then flattened into lines.
//! Block nodes (banner, file reference, code, variable, summary, call,
//! line) start their own line; `Indent` pushes its children one level
//! deeper. `Text` and `Styled` are inline and concatenate within a line.

use std::{
    fmt,
    io::{self, Write},
    time::Duration,
};

use log::{Level, Metadata, Record};

use crate::context::Window;
use crate::variables::{BindingState, UNDEFINED, UNPRINTABLE, VariableBinding};

mod colors;

pub use colors::{colors_disabled, strip_ansi};

use colors::{paint, stdout_supports_color};

/// Target of every record written to a [`Sink::Log`].
pub const LOG_TARGET: &str = "framelens";

const DEFAULT_INDENT: &str = "  ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Banner,
    FileName,
    LineNumber,
    Scope,
    Code,
    Name,
    Value,
    Undefined,
    Unprintable,
    Summary,
    Duration,
    ContextLine,
    CurrentLine,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayNode {
    Text(String),
    Styled(Style, Vec<DisplayNode>),
    Banner(String),
    /// `File "path", line N[, in scope]`
    FileRef {
        path: String,
        line: usize,
        scope: Option<String>,
    },
    /// A resolved fragment, or the surrounding window when one was read.
    Code {
        text: String,
        window: Option<Window>,
    },
    Variable(VariableBinding),
    Summary(String),
    /// `name(a=1, b=2)…`
    Call {
        name: String,
        arguments: Vec<(String, String)>,
    },
    /// `… = value [elapsed]`
    CallReturn {
        value: String,
        elapsed: Option<Duration>,
    },
    Line(Vec<DisplayNode>),
    Indent(Vec<DisplayNode>),
    Group(Vec<DisplayNode>),
}

impl DisplayNode {
    pub fn text(text: impl Into<String>) -> Self {
        DisplayNode::Text(text.into())
    }

    pub fn styled(style: Style, text: impl Into<String>) -> Self {
        DisplayNode::Styled(style, vec![DisplayNode::text(text)])
    }
}

/// Where rendered lines go.
#[derive(Clone, Copy)]
pub enum Sink<'a> {
    /// Standard output, colored when it is a terminal.
    Console,
    /// One `Debug` record per line, without styling.
    Log(&'a dyn log::Log),
}

impl Sink<'static> {
    /// The logger installed with the `log` crate.
    pub fn global_log() -> Self {
        Sink::Log(log::logger())
    }
}

impl fmt::Debug for Sink<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sink::Console => f.write_str("Console"),
            Sink::Log(_) => f.write_str("Log(..)"),
        }
    }
}

/// Flattens display trees into indented lines.
#[derive(Debug, Clone)]
pub struct Renderer {
    indent: String,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(DEFAULT_INDENT)
    }
}

impl Renderer {
    pub fn new(indent: impl Into<String>) -> Self {
        Self {
            indent: indent.into(),
        }
    }

    pub fn render(&self, node: &DisplayNode, sink: Sink<'_>) {
        match sink {
            Sink::Console => {
                let styled = stdout_supports_color();
                let mut out = io::stdout().lock();
                for line in self.lines(node, styled) {
                    // A closed stdout must not turn diagnostics into a failure.
                    if writeln!(out, "{}", line).is_err() {
                        return;
                    }
                }
            }
            Sink::Log(logger) => {
                let metadata = Metadata::builder()
                    .level(Level::Debug)
                    .target(LOG_TARGET)
                    .build();
                if !logger.enabled(&metadata) {
                    return;
                }
                for line in self.lines(node, false) {
                    logger.log(
                        &Record::builder()
                            .metadata(metadata.clone())
                            .args(format_args!("{}", line))
                            .build(),
                    );
                }
            }
        }
    }

    pub fn render_to_string(&self, node: &DisplayNode, styled: bool) -> String {
        self.lines(node, styled).join("\n")
    }

    /// Output lines with indentation applied.
    pub fn lines(&self, node: &DisplayNode, styled: bool) -> Vec<String> {
        let mut lines = Vec::new();
        collect(node, 0, styled, &mut lines);
        lines
            .into_iter()
            .map(|(depth, line)| {
                if line.is_empty() {
                    line
                } else {
                    format!("{}{}", self.indent.repeat(depth), line)
                }
            })
            .collect()
    }
}

pub fn render(node: &DisplayNode, sink: Sink<'_>) {
    Renderer::default().render(node, sink);
}

pub fn render_to_string(node: &DisplayNode, styled: bool) -> String {
    Renderer::default().render_to_string(node, styled)
}

fn style(text: &str, style: Style, styled: bool) -> String {
    if styled {
        paint(text, style)
    } else {
        text.to_string()
    }
}

fn push_text(out: &mut Vec<(usize, String)>, depth: usize, text: &str) {
    out.extend(text.split('\n').map(|line| (depth, line.to_string())));
}

fn collect(node: &DisplayNode, depth: usize, styled: bool, out: &mut Vec<(usize, String)>) {
    match node {
        DisplayNode::Group(children) => {
            for child in children {
                collect(child, depth, styled, out);
            }
        }
        DisplayNode::Indent(children) => {
            for child in children {
                collect(child, depth + 1, styled, out);
            }
        }
        DisplayNode::Line(children) => {
            let text: String = children.iter().map(|child| inline(child, styled)).collect();
            push_text(out, depth, &text);
        }
        DisplayNode::Text(_) | DisplayNode::Styled(..) => {
            push_text(out, depth, &inline(node, styled));
        }
        DisplayNode::Banner(text) => push_text(out, depth, &style(text, Style::Banner, styled)),
        DisplayNode::FileRef { path, line, scope } => {
            let mut text = format!(
                "File \"{}\", line {}",
                style(path, Style::FileName, styled),
                style(&line.to_string(), Style::LineNumber, styled)
            );
            if let Some(scope) = scope {
                text.push_str(", in ");
                text.push_str(&style(scope, Style::Scope, styled));
            }
            push_text(out, depth, &text);
        }
        DisplayNode::Code { text, window: None } => {
            push_text(out, depth, &style(text, Style::Code, styled));
        }
        DisplayNode::Code {
            window: Some(window),
            ..
        } => {
            for line in &window.before {
                out.push((depth, format!("  {}", style(line, Style::ContextLine, styled))));
            }
            out.push((
                depth,
                format!("→ {}", style(&window.line, Style::CurrentLine, styled)),
            ));
            for line in &window.after {
                out.push((depth, format!("  {}", style(line, Style::ContextLine, styled))));
            }
        }
        DisplayNode::Variable(VariableBinding { name, state }) => {
            let name = style(name, Style::Name, styled);
            match state {
                BindingState::Short(value) => push_text(
                    out,
                    depth,
                    &format!("{} = {}", name, style(value, Style::Value, styled)),
                ),
                BindingState::Long(value) => {
                    out.push((depth, format!("{} = \\", name)));
                    push_text(out, depth + 1, &style(value, Style::Value, styled));
                }
                BindingState::Unprintable => out.push((
                    depth,
                    format!("{} = {}", name, style(UNPRINTABLE, Style::Unprintable, styled)),
                )),
                BindingState::Undefined => out.push((
                    depth,
                    format!("{} = {}", name, style(UNDEFINED, Style::Undefined, styled)),
                )),
            }
        }
        DisplayNode::Summary(text) => push_text(out, depth, &style(text, Style::Summary, styled)),
        DisplayNode::Call { name, arguments } => {
            let arguments: Vec<String> = arguments
                .iter()
                .map(|(key, value)| {
                    format!(
                        "{}={}",
                        style(key, Style::Name, styled),
                        style(value, Style::Value, styled)
                    )
                })
                .collect();
            push_text(
                out,
                depth,
                &format!("{}({})…", style(name, Style::Name, styled), arguments.join(", ")),
            );
        }
        DisplayNode::CallReturn { value, elapsed } => {
            let mut text = format!("… = {}", style(value, Style::Value, styled));
            if let Some(elapsed) = elapsed {
                text.push(' ');
                text.push_str(&style(&format!("{:.3?}", elapsed), Style::Duration, styled));
            }
            push_text(out, depth, &text);
        }
    }
}

fn inline(node: &DisplayNode, styled: bool) -> String {
    match node {
        DisplayNode::Text(text) => text.clone(),
        DisplayNode::Styled(tag, children) => {
            let text: String = children.iter().map(|child| inline(child, styled)).collect();
            style(&text, *tag, styled)
        }
        block => {
            let mut lines = Vec::new();
            collect(block, 0, styled, &mut lines);
            lines
                .into_iter()
                .map(|(_, line)| line)
                .collect::<Vec<_>>()
                .join("\n")
        }
    }
}

#[cfg(test)]
mod render_test;
