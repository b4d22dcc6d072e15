use std::{
    panic,
    sync::{Arc, atomic::{AtomicUsize, Ordering}},
};

use framelens::{
    Bindings, Config, Failure, Frame, Value, capture_frame,
    render::Sink,
    tracer::{self, TraceHook, trace_calls},
};
use log::{Log, Metadata, Record};
use parking_lot::Mutex;

// The hook slot is process-wide.
static SERIAL: Mutex<()> = Mutex::new(());

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

fn capture() -> &'static Capture {
    Box::leak(Box::new(Capture::default()))
}

fn config() -> Config {
    Config {
        show_durations: false,
        ..Config::default()
    }
}

fn fib(n: i64) -> i64 {
    let frame = capture_frame!(scope = "fib");
    tracer::call(&frame, &Bindings::new().with("n", n));
    let result = if n < 2 { n } else { fib(n - 1) + fib(n - 2) };
    tracer::ret(&frame, &Value::Int(result));
    result
}

#[test]
fn recursive_calls_nest() {
    let _serial = SERIAL.lock();
    let sink = capture();
    let result = trace_calls(Sink::Log(sink), &config(), || fib(2));
    assert_eq!(result, 1);

    let lines = sink.lines.lock();
    let calls: Vec<&str> = lines
        .iter()
        .map(String::as_str)
        .filter(|line| !line.trim_start().starts_with("File "))
        .collect();
    assert_eq!(
        calls,
        [
            "fib(n=2)…",
            "  fib(n=1)…",
            "    … = 1",
            "  fib(n=0)…",
            "    … = 0",
            "  … = 1",
        ]
    );
    assert!(lines[0].starts_with("File \"tests/tracer/tracer_tests.rs\", line "), "{}", lines[0]);
}

#[test]
fn long_arguments_keep_their_layout() {
    let _serial = SERIAL.lock();
    let sink = capture();
    let narrow = Config {
        value_width: 10,
        ..config()
    };
    let frame = Frame::new("batch.py", 4, "submit");
    trace_calls(Sink::Log(sink), &narrow, || {
        tracer::call(&frame, &Bindings::new().with("ids", Value::list((1..=4).map(Value::Int))));
        tracer::ret(&frame, &Value::None);
    });

    assert_eq!(
        sink.lines.lock()[1..],
        ["submit(ids=[1,", " 2,", " 3,", " 4])…", "  … = None"]
    );
}

#[derive(Default)]
struct FailureCounter {
    failures: AtomicUsize,
}

struct SharedCounter(Arc<FailureCounter>);

impl TraceHook for SharedCounter {
    fn exception(&self, _: &Frame, _: &Failure) {
        self.0.failures.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn custom_hooks_only_see_what_they_override() {
    let _serial = SERIAL.lock();
    let counter = Arc::new(FailureCounter::default());
    let frame = Frame::new("app.py", 1, "main");
    {
        let _guard = tracer::install(SharedCounter(Arc::clone(&counter)));
        tracer::call(&frame, &Bindings::new());
        tracer::exception(&frame, &Failure::new("ValueError", "boom"));
        tracer::ret(&frame, &Value::None);
    }
    assert_eq!(counter.failures.load(Ordering::SeqCst), 1);
    assert!(!tracer::is_active());
}

#[test]
fn panicking_body_still_uninstalls_the_logger() {
    let _serial = SERIAL.lock();
    let sink = capture();
    let outcome = panic::catch_unwind(panic::AssertUnwindSafe(|| {
        trace_calls(Sink::Log(sink), &config(), || {
            if tracer::is_active() {
                panic!("body failed");
            }
            0
        })
    }));
    assert!(outcome.is_err());
    assert!(!tracer::is_active());
}
