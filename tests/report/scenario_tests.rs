use std::rc::Rc;

use framelens::{
    Bindings, Config, Failure, Frame, Reporter, Value,
    render::Sink,
    source::SourceCache,
};
use log::{Log, Metadata, Record};
use parking_lot::Mutex;

#[derive(Default)]
struct Capture {
    lines: Mutex<Vec<String>>,
}

impl Log for Capture {
    fn enabled(&self, _: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        self.lines.lock().push(record.args().to_string());
    }

    fn flush(&self) {}
}

fn render(cache: &SourceCache, failure: &Failure) -> String {
    let config = Config::default();
    Reporter::with_cache(&config, cache).render_to_string(failure, false)
}

#[test]
fn nested_call_failing_on_a_literal_statement() {
    let cache = SourceCache::new();
    cache.register(
        "<scenario_a>",
        "def f():\n    g()\n\n\ndef g():\n    x = 1/0\n",
    );
    let globals = Rc::new(
        Bindings::new()
            .with("f", Value::callable("f"))
            .with("g", Value::callable("g")),
    );
    let failure = Failure::new("ValueError", "boom")
        .with_frame(Frame::new("<scenario_a>", 2, "f").with_globals(Rc::clone(&globals)))
        .with_frame(Frame::new("<scenario_a>", 6, "g").with_globals(globals));

    insta::assert_snapshot!(render(&cache, &failure), @r#"
    Traceback (most recent call last):
    File "<scenario_a>", line 2, in f
      g()
        g = <function g>
    File "<scenario_a>", line 6, in g
      x = 1/0
    ValueError: boom
    "#);
}

#[test]
fn short_values_inline_and_long_values_as_blocks() {
    let cache = SourceCache::new();
    cache.register("<scenario_b>", "def show(user, matrix):\n    print(user, matrix)\n");
    let matrix = Value::list((0..3).map(|row| Value::list((0..10).map(|col| Value::Int(row * 10 + col)))));
    let user = Value::dict([(Value::str("id"), Value::Int(1))]);
    let failure = Failure::new("TypeError", "cannot render").with_frame(
        Frame::new("<scenario_b>", 2, "show")
            .with_local("user", user)
            .with_local("matrix", matrix),
    );

    insta::assert_snapshot!(render(&cache, &failure), @r#"
    Traceback (most recent call last):
    File "<scenario_b>", line 2, in show
      print(user, matrix)
        matrix = \
          [[0, 1, 2, 3, 4, 5, 6, 7, 8, 9],
           [10, 11, 12, 13, 14, 15, 16, 17, 18, 19],
           [20, 21, 22, 23, 24, 25, 26, 27, 28, 29]]
        print = <function print>
        user = {'id': 1}
    TypeError: cannot render
    "#);
}

#[test]
fn deleted_source_keeps_only_the_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("job.py");
    std::fs::write(&path, "def run(limit):\n    return limit / 0\n").unwrap();

    let config = Config::default();
    let reporter = Reporter::new(&config);
    let failure = Failure::new("ZeroDivisionError", "division by zero")
        .with_frame(Frame::new(&path, 2, "run").with_local("limit", 3));
    assert!(reporter.render_to_string(&failure, false).contains("limit = 3"));

    std::fs::remove_file(&path).unwrap();
    let output = reporter.render_to_string(&failure, false);
    assert_eq!(
        output,
        format!(
            "Traceback (most recent call last):\nFile \"{}\", line 2, in run\nZeroDivisionError: division by zero",
            path.display()
        )
    );
}

#[test]
fn multiline_statement_is_shown_whole() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/testdata/checkout.py");
    let failure = Failure::new("AttributeError", "'Cart' object has no attribute 'items'").with_frame(
        Frame::new(path, 8, "checkout")
            .with_local("cart", Value::callable("Cart"))
            .with_local("rate", 1.2),
    );
    let output = render(SourceCache::global(), &failure);
    let code: Vec<&str> = output.lines().skip(2).take(4).collect();
    assert_eq!(
        code,
        [
            "  total = sum(",
            "      item.price * item.qty  # per line",
            "      for item in cart.items",
            "  )",
        ]
    );
    assert!(output.contains("    cart = <function Cart>"), "{}", output);
    assert!(output.contains("    sum = <function sum>"), "{}", output);
    assert!(!output.contains("rate ="), "{}", output);
}

#[test]
fn log_sink_receives_the_same_lines() {
    let cache = SourceCache::new();
    cache.register("<log>", "count = len(items) / size\n");
    let failure = Failure::new("ZeroDivisionError", "division by zero").with_frame(
        Frame::new("<log>", 1, "<module>")
            .with_local("items", Value::list([]))
            .with_local("size", 0),
    );
    let config = Config::default();
    let reporter = Reporter::with_cache(&config, &cache);

    let capture = Capture::default();
    reporter.report(&failure, Sink::Log(&capture));
    let logged = capture.lines.lock().join("\n");
    assert_eq!(logged, reporter.render_to_string(&failure, false));
    assert!(logged.contains("size = 0"), "{}", logged);
    assert!(logged.contains("items = []"), "{}", logged);
}
