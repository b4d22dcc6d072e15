use std::collections::{BTreeSet, HashSet};

use crate::syntax::{
    expression::{Expression, NameContext, Parameter},
    statement::{Snippet, Statement, TypeParameter},
    visit::{self, Visitor},
};

/// Collects the names a snippet reads.
///
/// Only `Load` names count. Names bound by a lambda, comprehension or type
/// alias are skipped inside that construct, since they never refer to the
/// frame. Pattern captures are bindings and never count.
struct NameCollector {
    scopes: Vec<HashSet<String>>,
    names: BTreeSet<String>,
}

impl NameCollector {
    fn new() -> Self {
        Self {
            scopes: Vec::new(),
            names: BTreeSet::new(),
        }
    }

    fn define(&mut self, name: &str) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string());
        }
    }

    fn is_bound(&self, name: &str) -> bool {
        self.scopes.iter().rev().any(|s| s.contains(name))
    }

    fn push_scope(&mut self) {
        self.scopes.push(HashSet::new());
    }

    fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    fn define_target(&mut self, target: &Expression) {
        match target {
            Expression::Name { name, .. } => self.define(name),
            Expression::Tuple(items) | Expression::List(items) => {
                for item in items {
                    self.define_target(item);
                }
            }
            Expression::Starred(inner) => self.define_target(inner),
            // Attribute and subscript targets bind nothing but read their base.
            _ => {}
        }
    }
}

impl<'ast> Visitor<'ast> for NameCollector {
    fn visit_stmt(&mut self, stmt: &'ast Statement) {
        let Statement::TypeAlias {
            name: _,
            parameters,
            value,
        } = stmt
        else {
            return visit::walk_stmt(self, stmt);
        };
        self.push_scope();
        for TypeParameter { name, .. } in parameters {
            self.define(name);
        }
        for TypeParameter { bound, default, .. } in parameters {
            for expr in [bound, default].into_iter().flatten() {
                self.visit_expr(expr);
            }
        }
        self.visit_expr(value);
        self.pop_scope();
    }

    fn visit_expr(&mut self, expr: &'ast Expression) {
        match expr {
            Expression::Name {
                name,
                context: NameContext::Load,
                position: _,
            } => {
                if !self.is_bound(name) {
                    self.names.insert(name.clone());
                }
            }
            Expression::Name { .. } => {}
            Expression::Lambda { parameters, body } => {
                // Defaults are evaluated in the enclosing scope.
                for parameter in parameters {
                    self.visit_parameter(parameter);
                }
                self.push_scope();
                for Parameter { name, .. } in parameters {
                    self.define(name);
                }
                self.visit_expr(body);
                self.pop_scope();
            }
            Expression::Comprehension {
                kind: _,
                element,
                value,
                generators,
            } => {
                self.push_scope();
                for generator in generators {
                    self.visit_expr(&generator.iter);
                    self.define_target(&generator.target);
                    self.visit_expr(&generator.target);
                    for condition in &generator.conditions {
                        self.visit_expr(condition);
                    }
                }
                self.visit_expr(element);
                if let Some(value) = value {
                    self.visit_expr(value);
                }
                self.pop_scope();
            }
            _ => visit::walk_expr(self, expr),
        }
    }
}

/// Names read by `snippet`, in lexicographic order.
pub fn referenced_names(snippet: &Snippet) -> BTreeSet<String> {
    let mut collector = NameCollector::new();
    collector.visit_snippet(snippet);
    collector.names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parse_snippet;

    fn names(source: &str) -> Vec<String> {
        let snippet = parse_snippet(source).expect("snippet should parse");
        referenced_names(&snippet).into_iter().collect()
    }

    #[test]
    fn collects_reads_in_order() {
        assert_eq!(names("result = compute(b, a) + a"), ["a", "b", "compute"]);
    }

    #[test]
    fn skips_assignment_targets_and_attributes() {
        assert_eq!(names("obj.attr = value.field"), ["obj", "value"]);
        assert_eq!(names("x = y"), ["y"]);
    }

    #[test]
    fn augmented_target_is_read() {
        assert_eq!(names("total += step"), ["step", "total"]);
    }

    #[test]
    fn skips_keyword_argument_names() {
        assert_eq!(names("f(key=value)"), ["f", "value"]);
    }

    #[test]
    fn comprehension_variables_are_local() {
        assert_eq!(
            names("[item * k for item in items if item]"),
            ["items", "k"]
        );
    }

    #[test]
    fn lambda_parameters_are_local() {
        assert_eq!(names("key = lambda x, d=default: x + y"), ["default", "y"]);
    }

    #[test]
    fn skips_definition_names_and_parameters() {
        assert_eq!(names("def handler(event, limit=cap):"), ["cap"]);
        assert_eq!(names("class Child(Base):"), ["Base"]);
    }

    #[test]
    fn reads_format_fields() {
        assert_eq!(names("message = f'{user.name} owes {amount!r}'"), ["amount", "user"]);
    }

    #[test]
    fn match_subject_is_read() {
        assert_eq!(names("match command.split():"), ["command"]);
        assert_eq!(names("match point, scale:"), ["point", "scale"]);
    }

    #[test]
    fn case_captures_are_bindings() {
        assert_eq!(names("case [first, *rest]:"), Vec::<String>::new());
        assert_eq!(names("case {\"id\": key, **extra} as row:"), Vec::<String>::new());
        assert_eq!(names("case Point(x=0, y=py) if py > limit:"), ["Point", "limit", "py"]);
        assert_eq!(names("case Color.RED | Color.GREEN:"), ["Color"]);
        assert_eq!(names("case _:"), Vec::<String>::new());
    }

    #[test]
    fn type_alias_parameters_are_local() {
        assert_eq!(
            names("type Pairs[T: Base] = list[tuple[T, Extra]]"),
            ["Base", "Extra", "list", "tuple"]
        );
    }

    #[test]
    fn ignores_strings_numbers_and_keywords() {
        assert_eq!(names("if 'label' and 42 and flag:"), ["flag"]);
    }
}
