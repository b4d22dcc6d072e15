use std::sync::atomic::{AtomicUsize, Ordering};

use log::{Log, Metadata, Record};
use parking_lot::Mutex;

use super::*;

// Tests share the process-wide hook slot.
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

fn leaked_capture() -> &'static Capture {
    Box::leak(Box::new(Capture::default()))
}

#[derive(Default)]
struct Counter {
    calls: AtomicUsize,
}

impl TraceHook for Arc<Counter> {
    fn call(&self, _: &Frame, _: &Bindings) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

fn quiet_config() -> Config {
    Config {
        show_durations: false,
        ..Config::default()
    }
}

#[test]
fn nested_calls_indent_by_depth() {
    let _serial = SERIAL.lock();
    let capture = leaked_capture();
    let outer = Frame::new("lib.py", 3, "area");
    let inner = Frame::new("lib.py", 9, "helper");

    trace_calls(Sink::Log(capture), &quiet_config(), || {
        call(&outer, &Bindings::new().with("w", 5).with("h", 2));
        call(&inner, &Bindings::new().with("n", 1));
        ret(&inner, &Value::Int(1));
        ret(&outer, &Value::Int(10));
    });

    assert_eq!(
        *capture.lines.lock(),
        [
            "File \"lib.py\", line 3",
            "area(h=2, w=5)…",
            "  File \"lib.py\", line 9",
            "  helper(n=1)…",
            "    … = 1",
            "  … = 10",
        ]
    );
}

#[test]
fn durations_follow_return_values() {
    let _serial = SERIAL.lock();
    let capture = leaked_capture();
    let frame = Frame::new("lib.py", 1, "tick");

    trace_calls(Sink::Log(capture), &Config::default(), || {
        call(&frame, &Bindings::new());
        ret(&frame, &Value::None);
    });

    let lines = capture.lines.lock();
    assert_eq!(lines[1], "tick()…");
    assert!(lines[2].starts_with("  … = None "), "{}", lines[2]);
    assert!(lines[2].ends_with('s'), "{}", lines[2]);
}

#[test]
fn failures_are_shown_inside_the_frame() {
    let _serial = SERIAL.lock();
    let capture = leaked_capture();
    let frame = Frame::new("lib.py", 2, "parse");

    trace_calls(Sink::Log(capture), &quiet_config(), || {
        call(&frame, &Bindings::new().with("text", "x"));
        exception(&frame, &Failure::new("ValueError", "bad digit"));
        ret(&frame, &Value::None);
    });

    assert_eq!(
        capture.lines.lock()[1..],
        ["parse(text='x')…", "  ValueError: bad digit", "  … = None"]
    );
}

#[test]
fn guards_restore_hooks_in_reverse_order() {
    let _serial = SERIAL.lock();
    let first = Arc::new(Counter::default());
    let second = Arc::new(Counter::default());
    let frame = Frame::new("app.py", 1, "main");

    assert!(!is_active());
    {
        let _outer = install(Arc::clone(&first));
        call(&frame, &Bindings::new());
        {
            let _inner = install(Arc::clone(&second));
            call(&frame, &Bindings::new());
        }
        call(&frame, &Bindings::new());
    }
    call(&frame, &Bindings::new());

    assert!(!is_active());
    assert_eq!(first.calls.load(Ordering::SeqCst), 2);
    assert_eq!(second.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn guard_restores_the_hook_during_unwinding() {
    let _serial = SERIAL.lock();
    let counter = Arc::new(Counter::default());
    let result = std::panic::catch_unwind(|| {
        let _guard = install(Arc::clone(&counter));
        if is_active() {
            panic!("traced body failed");
        }
    });
    assert!(result.is_err());
    assert!(!is_active());
}

#[test]
fn dispatch_without_a_hook_is_a_no_op() {
    let _serial = SERIAL.lock();
    let frame = Frame::new("app.py", 1, "main");
    call(&frame, &Bindings::new());
    ret(&frame, &Value::None);
    exception(&frame, &Failure::new("E", ""));
}
