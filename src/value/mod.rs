use std::{fmt, rc::Rc};

mod pformat;
mod repr;

pub use pformat::pformat;

/// A value of the diagnosed program, as handed over by the host.
///
/// Heap variants are `Rc`-shared so cloning a frame's bindings is O(1).
/// Collections preserve the host's element order; the formatter sorts set
/// elements and dict keys itself.
#[derive(Debug, Clone)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Rc<str>),
    Bytes(Rc<[u8]>),
    List(Rc<Vec<Value>>),
    Tuple(Rc<Vec<Value>>),
    Set(Rc<Vec<Value>>),
    Dict(Rc<Vec<(Value, Value)>>),
    /// A function or other callable, by name.
    Callable(Rc<str>),
    /// A host-defined value whose representation may fail.
    Object(Rc<dyn Repr>),
}

/// Representation of a host-defined value.
///
/// An error means the value cannot be shown; it is reported as unprintable
/// and never aborts the surrounding report.
pub trait Repr: fmt::Debug {
    fn repr(&self) -> Result<String, fmt::Error>;

    fn type_name(&self) -> &str {
        "object"
    }
}

/// A value captured from Rust code through its `Debug` output.
#[derive(Debug)]
struct DebugValue {
    type_name: &'static str,
    text: String,
}

impl Repr for DebugValue {
    fn repr(&self) -> Result<String, fmt::Error> {
        Ok(self.text.clone())
    }

    fn type_name(&self) -> &str {
        self.type_name
    }
}

impl Value {
    pub fn str(text: impl AsRef<str>) -> Self {
        Value::Str(Rc::from(text.as_ref()))
    }

    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(Rc::new(items.into_iter().collect()))
    }

    pub fn tuple(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Tuple(Rc::new(items.into_iter().collect()))
    }

    pub fn set(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Set(Rc::new(items.into_iter().collect()))
    }

    pub fn dict(pairs: impl IntoIterator<Item = (Value, Value)>) -> Self {
        Value::Dict(Rc::new(pairs.into_iter().collect()))
    }

    pub fn callable(name: impl AsRef<str>) -> Self {
        Value::Callable(Rc::from(name.as_ref()))
    }

    pub fn object(object: impl Repr + 'static) -> Self {
        Value::Object(Rc::new(object))
    }

    /// Capture any `Debug` value; its representation is the `{:?}` output.
    pub fn from_debug<T: fmt::Debug + ?Sized>(value: &T) -> Self {
        Value::Object(Rc::new(DebugValue {
            type_name: std::any::type_name::<T>(),
            text: format!("{:?}", value),
        }))
    }

    pub fn type_name(&self) -> &str {
        match self {
            Value::None => "NoneType",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Bytes(_) => "bytes",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Set(_) => "set",
            Value::Dict(_) => "dict",
            Value::Callable(_) => "function",
            Value::Object(object) => object.type_name(),
        }
    }

    /// Single-line representation in host-language syntax.
    ///
    /// Dicts keep insertion order here; only [`pformat`] sorts them.
    pub fn repr(&self) -> Result<String, fmt::Error> {
        repr::repr(self, false)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::str(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(Rc::from(value))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(Rc::new(items))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::None, Into::into)
    }
}
