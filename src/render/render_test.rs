use std::time::Duration;

use log::{Level, Log, Metadata, Record};
use parking_lot::Mutex;

use super::{DisplayNode, LOG_TARGET, Renderer, Sink, Style, render, render_to_string, strip_ansi};
use crate::context::Window;
use crate::variables::{BindingState, VariableBinding};

#[derive(Default)]
struct Capture {
    records: Mutex<Vec<(Level, String, String)>>,
}

impl Log for Capture {
    fn enabled(&self, _: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        self.records.lock().push((
            record.level(),
            record.target().to_string(),
            record.args().to_string(),
        ));
    }

    fn flush(&self) {}
}

fn variable(name: &str, state: BindingState) -> DisplayNode {
    DisplayNode::Variable(VariableBinding {
        name: name.to_string(),
        state,
    })
}

fn frame_report() -> DisplayNode {
    DisplayNode::Group(vec![
        DisplayNode::Banner("Traceback (most recent call last):".to_string()),
        DisplayNode::FileRef {
            path: "app.py".to_string(),
            line: 7,
            scope: Some("handler".to_string()),
        },
        DisplayNode::Indent(vec![
            DisplayNode::Code {
                text: "total = price * qty".to_string(),
                window: None,
            },
            DisplayNode::Indent(vec![
                variable("price", BindingState::Short("3".to_string())),
                variable("qty", BindingState::Long("[1,\n 2]".to_string())),
                variable("rate", BindingState::Undefined),
                variable("user", BindingState::Unprintable),
            ]),
        ]),
        DisplayNode::Summary("TypeError: unsupported operand".to_string()),
    ])
}

#[test]
fn plain_rendering_indents_by_depth() {
    insta::assert_snapshot!(render_to_string(&frame_report(), false), @r#"
    Traceback (most recent call last):
    File "app.py", line 7, in handler
      total = price * qty
        price = 3
        qty = \
          [1,
           2]
        rate = <undefined>
        user = <unprintable>
    TypeError: unsupported operand
    "#);
}

#[test]
fn styled_rendering_strips_back_to_plain() {
    let node = frame_report();
    let styled = render_to_string(&node, true);
    assert_ne!(styled, render_to_string(&node, false));
    assert_eq!(strip_ansi(&styled), render_to_string(&node, false));
}

#[test]
fn styled_variable_colors_name_and_value() {
    let node = variable("x", BindingState::Short("1".to_string()));
    assert_eq!(
        render_to_string(&node, true),
        "\u{1b}[33mx\u{1b}[0m = \u{1b}[32m1\u{1b}[0m"
    );
}

#[test]
fn window_marks_current_line() {
    let node = DisplayNode::Code {
        text: "b = a / 0".to_string(),
        window: Some(Window {
            before: vec!["a = 1".to_string()],
            line: "b = a / 0".to_string(),
            after: vec!["~".to_string()],
        }),
    };
    assert_eq!(
        render_to_string(&node, false),
        "  a = 1\n→ b = a / 0\n  ~"
    );
}

#[test]
fn calls_and_returns() {
    let node = DisplayNode::Group(vec![
        DisplayNode::FileRef {
            path: "lib.py".to_string(),
            line: 3,
            scope: None,
        },
        DisplayNode::Call {
            name: "area".to_string(),
            arguments: vec![
                ("h".to_string(), "2".to_string()),
                ("w".to_string(), "5".to_string()),
            ],
        },
        DisplayNode::Indent(vec![DisplayNode::CallReturn {
            value: "10".to_string(),
            elapsed: Some(Duration::from_micros(1500)),
        }]),
        DisplayNode::CallReturn {
            value: "None".to_string(),
            elapsed: None,
        },
    ]);
    insta::assert_snapshot!(render_to_string(&node, false), @r#"
    File "lib.py", line 3
    area(h=2, w=5)…
      … = 10 1.500ms
    … = None
    "#);
}

#[test]
fn inline_nodes_share_a_line() {
    let node = DisplayNode::Line(vec![
        DisplayNode::text("status: "),
        DisplayNode::styled(Style::Value, "ok"),
    ]);
    assert_eq!(render_to_string(&node, false), "status: ok");
}

#[test]
fn log_sink_emits_one_debug_record_per_line() {
    let capture = Capture::default();
    render(&frame_report(), Sink::Log(&capture));

    let records = capture.records.lock();
    assert_eq!(records.len(), 10);
    assert!(records
        .iter()
        .all(|(level, target, _)| *level == Level::Debug && target == LOG_TARGET));
    assert_eq!(records[2].2, "  total = price * qty");
    assert_eq!(records[5].2, "      [1,");
    assert!(!records.iter().any(|(_, _, line)| line.contains('\u{1b}')));
}

#[test]
fn global_log_sink_reaches_the_installed_logger() {
    // The only test in this binary that installs a global logger.
    let capture: &'static Capture = Box::leak(Box::new(Capture::default()));
    log::set_logger(capture).unwrap();
    render(&DisplayNode::Summary("KeyError: 'id'".to_string()), Sink::global_log());

    let records = capture.records.lock();
    assert!(records.contains(&(Level::Debug, LOG_TARGET.to_string(), "KeyError: 'id'".to_string())));
}

#[test]
fn custom_indent_unit() {
    let node = DisplayNode::Indent(vec![DisplayNode::text("x")]);
    assert_eq!(Renderer::new("\t").render_to_string(&node, false), "\tx");
}
