//! Process-wide call tracing hook.
//!
//! The host dispatches call, return and failure events through [`call`],
//! [`ret`] and [`exception`]; whichever hook is installed sees them.
//! [`install`] hands back a [`HookGuard`] that puts the previous hook back
//! when dropped, so nested installations unwind in LIFO order even when a
//! panic passes through.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use parking_lot::Mutex;

use crate::config::Config;
use crate::failure::Failure;
use crate::frame::{Bindings, Frame};
use crate::render::{DisplayNode, Renderer, Sink};
use crate::value::{Value, pformat};
use crate::variables::UNPRINTABLE;

pub(crate) const SOURCE_FILE: &str = file!();

/// Receives trace events. Every method defaults to doing nothing.
pub trait TraceHook: Send + Sync {
    fn call(&self, _frame: &Frame, _arguments: &Bindings) {}

    fn ret(&self, _frame: &Frame, _value: &Value) {}

    /// A failure passing through `frame`. A `ret` for the same frame
    /// follows if the host unwinds it.
    fn exception(&self, _frame: &Frame, _failure: &Failure) {}
}

static HOOK: Mutex<Option<Arc<dyn TraceHook>>> = Mutex::new(None);

/// Restores the previously installed hook on drop.
#[must_use = "the hook is uninstalled as soon as the guard is dropped"]
pub struct HookGuard {
    previous: Option<Arc<dyn TraceHook>>,
}

impl Drop for HookGuard {
    fn drop(&mut self) {
        log::debug!("restoring previous trace hook");
        *HOOK.lock() = self.previous.take();
    }
}

pub fn install(hook: impl TraceHook + 'static) -> HookGuard {
    let hook: Arc<dyn TraceHook> = Arc::new(hook);
    let previous = HOOK.lock().replace(hook);
    log::debug!("installed trace hook (replacing one: {})", previous.is_some());
    HookGuard { previous }
}

pub fn is_active() -> bool {
    HOOK.lock().is_some()
}

// The slot is released before dispatch so hooks may install or dispatch
// themselves.
fn active() -> Option<Arc<dyn TraceHook>> {
    HOOK.lock().clone()
}

pub fn call(frame: &Frame, arguments: &Bindings) {
    if let Some(hook) = active() {
        hook.call(frame, arguments);
    }
}

pub fn ret(frame: &Frame, value: &Value) {
    if let Some(hook) = active() {
        hook.ret(frame, value);
    }
}

pub fn exception(frame: &Frame, failure: &Failure) {
    if let Some(hook) = active() {
        hook.exception(frame, failure);
    }
}

/// Prints every call with its arguments and every return with its value,
/// indented by call depth.
pub struct CallLogger {
    sink: Sink<'static>,
    renderer: Renderer,
    width: usize,
    show_durations: bool,
    started: Mutex<Vec<Instant>>,
}

impl CallLogger {
    pub fn new(sink: Sink<'static>, config: &Config) -> Self {
        Self {
            sink,
            renderer: Renderer::new(config.indent.clone()),
            width: config.value_width,
            show_durations: config.show_durations,
            started: Mutex::new(Vec::new()),
        }
    }

    fn format(&self, value: &Value) -> String {
        pformat(value, self.width).unwrap_or_else(|_| UNPRINTABLE.to_string())
    }

    fn emit(&self, depth: usize, nodes: Vec<DisplayNode>) {
        let node = (0..depth).fold(DisplayNode::Group(nodes), |node, _| {
            DisplayNode::Indent(vec![node])
        });
        self.renderer.render(&node, self.sink);
    }
}

impl TraceHook for CallLogger {
    fn call(&self, frame: &Frame, arguments: &Bindings) {
        let mut arguments: Vec<(String, String)> = arguments
            .iter()
            .map(|(name, value)| (name.to_string(), self.format(value)))
            .collect();
        arguments.sort_by(|a, b| a.0.cmp(&b.0));

        let depth = {
            let mut started = self.started.lock();
            started.push(Instant::now());
            started.len() - 1
        };
        self.emit(
            depth,
            vec![
                DisplayNode::FileRef {
                    path: frame.path.display().to_string(),
                    line: frame.line,
                    scope: None,
                },
                DisplayNode::Call {
                    name: frame.scope.clone(),
                    arguments,
                },
            ],
        );
    }

    fn ret(&self, _frame: &Frame, value: &Value) {
        let (depth, elapsed) = {
            let mut started = self.started.lock();
            let start = started.pop();
            (started.len(), start.map(|start| start.elapsed()))
        };
        let elapsed: Option<Duration> = elapsed.filter(|_| self.show_durations);
        self.emit(
            depth + 1,
            vec![DisplayNode::CallReturn {
                value: self.format(value),
                elapsed,
            }],
        );
    }

    fn exception(&self, _frame: &Frame, failure: &Failure) {
        let depth = self.started.lock().len();
        self.emit(depth, vec![DisplayNode::Summary(failure.summary())]);
    }
}

/// Trace every call made by `body` to `sink`.
pub fn trace_calls<R>(sink: Sink<'static>, config: &Config, body: impl FnOnce() -> R) -> R {
    let _guard = install(CallLogger::new(sink, config));
    body()
}

#[cfg(test)]
mod tracer_test;
