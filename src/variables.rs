//! Resolution and classification of the variables a fragment mentions.

use std::collections::BTreeSet;

use crate::frame::Frame;
use crate::value::pformat;

pub const UNPRINTABLE: &str = "<unprintable>";
pub const UNDEFINED: &str = "<undefined>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingState {
    /// Single-line representation.
    Short(String),
    /// Multi-line representation.
    Long(String),
    /// The value exists but could not be represented.
    Unprintable,
    /// No scope binds the name.
    Undefined,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableBinding {
    pub name: String,
    pub state: BindingState,
}

/// Look up and format one name in `frame`.
///
/// Presence decides, not truthiness: `0`, `""` and empty containers are
/// shown like any other value.
pub fn resolve(name: &str, frame: &Frame, width: usize) -> VariableBinding {
    let state = match frame.lookup(name) {
        None => BindingState::Undefined,
        Some(value) => match pformat(value, width) {
            Ok(text) if text.contains('\n') => BindingState::Long(text),
            Ok(text) => BindingState::Short(text),
            Err(_) => {
                log::trace!("representation of `{}` failed", name);
                BindingState::Unprintable
            }
        },
    };
    VariableBinding {
        name: name.to_string(),
        state,
    }
}

/// Resolve every identifier, in lexicographic order.
pub fn resolve_all(identifiers: &BTreeSet<String>, frame: &Frame, width: usize) -> Vec<VariableBinding> {
    identifiers
        .iter()
        .map(|name| resolve(name, frame, width))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::{fmt, rc::Rc};

    use super::*;
    use crate::frame::Bindings;
    use crate::value::{Repr, Value};

    #[derive(Debug)]
    struct Exploding;

    impl Repr for Exploding {
        fn repr(&self) -> Result<String, fmt::Error> {
            Err(fmt::Error)
        }
    }

    fn names(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn classifies_each_binding() {
        let frame = Frame::new("app.py", 1, "main")
            .with_local("short", 5)
            .with_local("long", Value::list((0..40).map(Value::Int)))
            .with_local("broken", Value::object(Exploding));
        let bindings = resolve_all(&names(&["short", "long", "broken", "ghost"]), &frame, 60);

        let order: Vec<&str> = bindings.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(order, ["broken", "ghost", "long", "short"]);
        assert_eq!(bindings[0].state, BindingState::Unprintable);
        assert_eq!(bindings[1].state, BindingState::Undefined);
        assert!(matches!(bindings[2].state, BindingState::Long(_)));
        assert_eq!(bindings[3].state, BindingState::Short("5".to_string()));
    }

    #[test]
    fn falsy_values_are_short_not_undefined() {
        let frame = Frame::new("app.py", 1, "main")
            .with_local("zero", 0)
            .with_local("text", "")
            .with_local("items", Value::list([]))
            .with_local("mapping", Value::dict([]))
            .with_local("nothing", Value::None)
            .with_local("flag", false);
        let bindings = resolve_all(
            &names(&["zero", "text", "items", "mapping", "nothing", "flag"]),
            &frame,
            60,
        );
        let shown: Vec<(&str, &BindingState)> =
            bindings.iter().map(|b| (b.name.as_str(), &b.state)).collect();
        assert_eq!(
            shown,
            [
                ("flag", &BindingState::Short("False".to_string())),
                ("items", &BindingState::Short("[]".to_string())),
                ("mapping", &BindingState::Short("{}".to_string())),
                ("nothing", &BindingState::Short("None".to_string())),
                ("text", &BindingState::Short("''".to_string())),
                ("zero", &BindingState::Short("0".to_string())),
            ]
        );
    }

    #[test]
    fn deeply_nested_values_are_unprintable() {
        let chain = (0..1_000).fold(Value::Int(0), |inner, _| Value::tuple([Value::Int(1), inner]));
        let frame = Frame::new("app.py", 1, "main").with_local("chain", chain);
        assert_eq!(resolve("chain", &frame, 60).state, BindingState::Unprintable);
    }

    #[test]
    fn falls_back_through_globals_and_builtins() {
        let globals = Rc::new(Bindings::new().with("limit", 10));
        let frame = Frame::new("app.py", 1, "main").with_globals(globals);
        let bindings = resolve_all(&names(&["limit", "len"]), &frame, 60);
        assert_eq!(bindings[0].state, BindingState::Short("<function len>".to_string()));
        assert_eq!(bindings[1].state, BindingState::Short("10".to_string()));
    }
}
