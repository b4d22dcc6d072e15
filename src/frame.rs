//! Call-stack frames supplied by the host.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    rc::Rc,
};

use crate::value::Value;

/// Names bound in one scope.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    values: HashMap<String, Value>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// The callables every frame can see unless the host supplies its own.
    pub fn default_builtins() -> Rc<Bindings> {
        DEFAULT_BUILTINS.with(Rc::clone)
    }
}

const BUILTIN_NAMES: &[&str] = &[
    "abs", "all", "any", "bool", "dict", "enumerate", "filter", "float", "getattr", "hasattr",
    "int", "isinstance", "iter", "len", "list", "map", "max", "min", "next", "open", "print",
    "range", "repr", "reversed", "set", "sorted", "str", "sum", "tuple", "type", "zip",
];

thread_local! {
    static DEFAULT_BUILTINS: Rc<Bindings> = Rc::new(
        BUILTIN_NAMES
            .iter()
            .fold(Bindings::new(), |bindings, name| bindings.with(*name, Value::callable(name))),
    );
}

impl FromIterator<(String, Value)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// One activation in the failing call chain.
#[derive(Debug, Clone)]
pub struct Frame {
    pub path: PathBuf,
    /// 1-based line being executed.
    pub line: usize,
    /// Function name, or the module name for top-level code.
    pub scope: String,
    pub locals: Bindings,
    pub globals: Rc<Bindings>,
    pub builtins: Rc<Bindings>,
}

impl Frame {
    pub fn new(path: impl Into<PathBuf>, line: usize, scope: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            line,
            scope: scope.into(),
            locals: Bindings::new(),
            globals: Rc::new(Bindings::new()),
            builtins: Bindings::default_builtins(),
        }
    }

    pub fn with_local(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.locals.insert(name, value);
        self
    }

    pub fn with_locals(mut self, locals: Bindings) -> Self {
        self.locals = locals;
        self
    }

    pub fn with_globals(mut self, globals: Rc<Bindings>) -> Self {
        self.globals = globals;
        self
    }

    pub fn with_builtins(mut self, builtins: Rc<Bindings>) -> Self {
        self.builtins = builtins;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Scopes in lookup order.
    pub fn scope_chain(&self) -> [&Bindings; 3] {
        [&self.locals, &self.globals, &self.builtins]
    }

    /// First binding of `name` along the scope chain.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.scope_chain()
            .into_iter()
            .find_map(|bindings| bindings.get(name))
    }
}

/// Capture the current Rust location as a [`Frame`].
///
/// Each listed variable becomes a local, shown through its `Debug` output.
/// The scope defaults to `module_path!()`.
///
/// ```
/// let attempts = 3;
/// let frame = framelens::capture_frame!(scope = "retry", attempts);
/// assert_eq!(frame.scope, "retry");
/// assert!(frame.locals.contains("attempts"));
/// ```
#[macro_export]
macro_rules! capture_frame {
    (scope = $scope:expr $(, $name:ident)* $(,)?) => {
        $crate::frame::Frame::new(file!(), line!() as usize, $scope)
            $(.with_local(stringify!($name), $crate::value::Value::from_debug(&$name)))*
    };
    ($($name:ident),* $(,)?) => {
        $crate::frame::Frame::new(file!(), line!() as usize, module_path!())
            $(.with_local(stringify!($name), $crate::value::Value::from_debug(&$name)))*
    };
}
