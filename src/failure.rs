//! Failures being diagnosed, and the per-thread "current failure" slot.

use std::{any::Any, borrow::Cow, cell::RefCell, error::Error, fmt, rc::Rc};

use crate::frame::Frame;

/// A failure propagating through the diagnosed program.
#[derive(Debug, Clone)]
pub struct Failure {
    /// Failure type name, e.g. `ValueError`.
    pub kind: String,
    pub message: String,
    /// Outermost frame first.
    pub frames: Vec<Frame>,
    /// Host-formatted traceback, shown when `full_traceback` is set.
    pub traceback: Option<String>,
}

impl Failure {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            frames: Vec::new(),
            traceback: None,
        }
    }

    /// Describe a Rust error: the kind is the error's type name and the
    /// traceback lists its source chain.
    pub fn from_error<E: Error + ?Sized>(error: &E) -> Self {
        let mut failure = Self::new(short_type_name::<E>(), error.to_string());
        let causes: Vec<String> = std::iter::successors(error.source(), |e| (*e).source())
            .map(|cause| format!("Caused by: {}", cause))
            .collect();
        if !causes.is_empty() {
            failure.traceback = Some(causes.join("\n"));
        }
        failure
    }

    /// Describe a panic payload.
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|text| text.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "Box<dyn Any>".to_string());
        Self::new("panic", message)
    }

    pub fn with_frame(mut self, frame: Frame) -> Self {
        self.frames.push(frame);
        self
    }

    pub fn with_frames(mut self, frames: impl IntoIterator<Item = Frame>) -> Self {
        self.frames.extend(frames);
        self
    }

    pub fn with_traceback(mut self, traceback: impl Into<String>) -> Self {
        self.traceback = Some(traceback.into());
        self
    }

    /// `Kind: message`, or just `Kind` without a message.
    pub fn summary(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.kind, self.message)
        }
    }
}

fn short_type_name<T: ?Sized>() -> &'static str {
    let name = std::any::type_name::<T>();
    let base = name.split('<').next().unwrap_or(name);
    base.rsplit("::").next().unwrap_or(base)
}

/// Errors that can describe themselves as a [`Failure`].
pub trait Diagnose {
    fn failure(&self) -> Cow<'_, Failure>;
}

impl Diagnose for Failure {
    fn failure(&self) -> Cow<'_, Failure> {
        Cow::Borrowed(self)
    }
}

impl Diagnose for Rc<Failure> {
    fn failure(&self) -> Cow<'_, Failure> {
        Cow::Borrowed(self.as_ref())
    }
}

impl Diagnose for std::io::Error {
    fn failure(&self) -> Cow<'_, Failure> {
        Cow::Owned(Failure::from_error(self))
    }
}

thread_local! {
    static CURRENT: RefCell<Option<Rc<Failure>>> = const { RefCell::new(None) };
}

/// Make `failure` the current failure of this thread and hand it back.
pub fn raise(failure: Failure) -> Rc<Failure> {
    let failure = Rc::new(failure);
    set_current(Rc::clone(&failure));
    failure
}

pub fn set_current(failure: Rc<Failure>) {
    CURRENT.with(|slot| *slot.borrow_mut() = Some(failure));
}

/// The failure currently being handled on this thread.
pub fn current() -> Option<Rc<Failure>> {
    CURRENT.with(|slot| slot.borrow().clone())
}

/// Mark the current failure as handled.
pub fn clear_current() -> Option<Rc<Failure>> {
    CURRENT.with(|slot| slot.borrow_mut().take())
}
