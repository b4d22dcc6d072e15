use std::{borrow::Cow, panic, rc::Rc};

use framelens::{
    Diagnose, Failure, Frame,
    failure::{clear_current, raise},
    render::Sink,
    report::{NO_CURRENT_FAILURE, report_failure, with_diagnostics},
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

impl Capture {
    fn last(&self) -> Option<String> {
        self.lines.lock().last().cloned()
    }
}

#[derive(Debug, PartialEq, thiserror::Error)]
#[error("quota exceeded for {tenant}")]
struct QuotaError {
    tenant: String,
}

impl Diagnose for QuotaError {
    fn failure(&self) -> Cow<'_, Failure> {
        Cow::Owned(
            Failure::new("QuotaError", self.to_string())
                .with_frame(Frame::new("/srv/quota.py", 12, "charge").with_local("tenant", self.tenant.as_str())),
        )
    }
}

#[test]
fn errors_are_reported_and_returned_unchanged() {
    let capture = Capture::default();
    let result: Result<(), QuotaError> = with_diagnostics(Sink::Log(&capture), || {
        Err(QuotaError {
            tenant: "acme".to_string(),
        })
    });

    assert_eq!(
        result,
        Err(QuotaError {
            tenant: "acme".to_string()
        })
    );
    let lines = capture.lines.lock();
    assert_eq!(lines[0], "Traceback (most recent call last):");
    assert_eq!(lines[1], "File \"/srv/quota.py\", line 12, in charge");
    assert_eq!(lines.last().map(String::as_str), Some("QuotaError: quota exceeded for acme"));
}

#[test]
fn raised_failures_are_reported_as_is() {
    let capture = Capture::default();
    let result: Result<u32, Rc<Failure>> = with_diagnostics(Sink::Log(&capture), || {
        Err(raise(Failure::new("KeyError", "'sku'")))
    });

    let error = result.unwrap_err();
    assert_eq!(error.kind, "KeyError");
    assert_eq!(capture.last().as_deref(), Some("KeyError: 'sku'"));
    clear_current();
}

#[test]
fn panics_are_reported_then_resumed() {
    clear_current();
    let capture = Capture::default();
    let outcome = panic::catch_unwind(panic::AssertUnwindSafe(|| {
        let _: Result<(), QuotaError> = with_diagnostics(Sink::Log(&capture), || panic!("ledger corrupted"));
    }));

    let payload = outcome.unwrap_err();
    assert_eq!(payload.downcast_ref::<&str>(), Some(&"ledger corrupted"));
    assert_eq!(capture.last().as_deref(), Some("panic: ledger corrupted"));
}

#[test]
fn stale_failures_do_not_describe_later_panics() {
    raise(Failure::new("KeyError", "'sku'"));
    let capture = Capture::default();
    let outcome = panic::catch_unwind(panic::AssertUnwindSafe(|| {
        let _: Result<i32, QuotaError> = with_diagnostics(Sink::Log(&capture), || {
            let rows: Vec<i32> = Vec::new();
            let index = rows.len();
            Ok(rows[index])
        });
    }));
    clear_current();

    assert!(outcome.is_err());
    let last = capture.last().unwrap_or_default();
    assert!(last.starts_with("panic: index out of bounds"), "{}", last);
}

#[test]
fn failures_raised_inside_the_body_describe_its_panic() {
    raise(Failure::new("KeyError", "'sku'"));
    let capture = Capture::default();
    let outcome = panic::catch_unwind(panic::AssertUnwindSafe(|| {
        let _: Result<(), QuotaError> = with_diagnostics(Sink::Log(&capture), || {
            raise(Failure::new("ValueError", "negative quantity"));
            panic!("unwinding after raise")
        });
    }));
    clear_current();

    assert!(outcome.is_err());
    assert_eq!(capture.last().as_deref(), Some("ValueError: negative quantity"));
}

#[test]
fn report_failure_without_a_current_failure() {
    clear_current();
    let capture = Capture::default();
    report_failure(Sink::Log(&capture));
    assert_eq!(*capture.lines.lock(), [NO_CURRENT_FAILURE]);
}

#[test]
fn report_failure_uses_the_current_failure() {
    let capture = Capture::default();
    raise(Failure::new("IndexError", "list index out of range"));
    report_failure(Sink::Log(&capture));
    clear_current();

    assert_eq!(
        *capture.lines.lock(),
        ["Traceback (most recent call last):", "IndexError: list index out of range"]
    );
}

#[test]
fn io_errors_describe_themselves() {
    let capture = Capture::default();
    let result = with_diagnostics(Sink::Log(&capture), || {
        std::fs::read_to_string("/definitely/not/here.cfg")
    });

    assert!(result.is_err());
    let last = capture.last().unwrap_or_default();
    assert!(last.starts_with("Error: "), "{}", last);
}
