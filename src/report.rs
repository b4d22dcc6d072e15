//! Reporting entry points.
//!
//! None of these return errors or let a panic escape from the engine:
//! anything that goes wrong while building a report is reduced to the
//! failure's one-line summary.

use std::{
    panic::{self, AssertUnwindSafe},
    rc::Rc,
};

use crate::config::Config;
use crate::failure::{self, Diagnose, Failure};
use crate::render::{DisplayNode, Renderer, Sink};
use crate::source::SourceCache;
use crate::walker::FrameWalker;

pub(crate) const SOURCE_FILE: &str = file!();

pub const NO_CURRENT_FAILURE: &str = "No failure is currently being handled.";

/// Reports failures with one configuration and source cache.
#[derive(Debug, Clone, Copy)]
pub struct Reporter<'a> {
    config: &'a Config,
    cache: &'a SourceCache,
}

impl<'a> Reporter<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self::with_cache(config, SourceCache::global())
    }

    pub fn with_cache(config: &'a Config, cache: &'a SourceCache) -> Self {
        Self { config, cache }
    }

    /// Report the failure currently being handled on this thread.
    pub fn report_failure(&self, sink: Sink<'_>) {
        match failure::current() {
            Some(current) => self.report(&current, sink),
            None => self.emit(&DisplayNode::text(NO_CURRENT_FAILURE), sink),
        }
    }

    pub fn report(&self, failure: &Failure, sink: Sink<'_>) {
        let node = self.build(failure);
        self.emit(&node, sink);
    }

    /// The plain or styled text `report` would print.
    pub fn render_to_string(&self, failure: &Failure, styled: bool) -> String {
        self.renderer().render_to_string(&self.build(failure), styled)
    }

    /// Run `body`, reporting its error or panic before handing it back
    /// unchanged. A panic is described by the failure `body` raised, if it
    /// raised one, and by the panic message otherwise.
    pub fn with_diagnostics<T, E, F>(&self, sink: Sink<'_>, body: F) -> Result<T, E>
    where
        E: Diagnose,
        F: FnOnce() -> Result<T, E>,
    {
        let before = failure::current();
        match panic::catch_unwind(AssertUnwindSafe(body)) {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(error)) => {
                self.report(&error.failure(), sink);
                Err(error)
            }
            Err(payload) => {
                // Only a failure raised inside `body` explains the panic.
                let raised = failure::current().filter(|current| {
                    before
                        .as_ref()
                        .is_none_or(|before| !Rc::ptr_eq(before, current))
                });
                let failure = match raised {
                    Some(current) => Failure::clone(&current),
                    None => Failure::from_panic(payload.as_ref()),
                };
                self.report(&failure, sink);
                panic::resume_unwind(payload)
            }
        }
    }

    fn renderer(&self) -> Renderer {
        Renderer::new(self.config.indent.clone())
    }

    fn build(&self, failure: &Failure) -> DisplayNode {
        let walker = FrameWalker::with_cache(self.config, self.cache);
        panic::catch_unwind(AssertUnwindSafe(|| walker.walk(failure).to_display())).unwrap_or_else(
            |_| {
                log::debug!("report for {} degraded to its summary", failure.kind);
                DisplayNode::Summary(failure.summary())
            },
        )
    }

    fn emit(&self, node: &DisplayNode, sink: Sink<'_>) {
        let renderer = self.renderer();
        if panic::catch_unwind(AssertUnwindSafe(|| renderer.render(node, sink))).is_err() {
            log::debug!("rendering to {:?} panicked", sink);
        }
    }
}

/// Report the current failure of this thread with the default
/// configuration.
pub fn report_failure(sink: Sink<'_>) {
    Reporter::new(&Config::default()).report_failure(sink);
}

pub fn report(failure: &Failure, sink: Sink<'_>) {
    Reporter::new(&Config::default()).report(failure, sink);
}

pub fn with_diagnostics<T, E, F>(sink: Sink<'_>, body: F) -> Result<T, E>
where
    E: Diagnose,
    F: FnOnce() -> Result<T, E>,
{
    Reporter::new(&Config::default()).with_diagnostics(sink, body)
}
