use crate::syntax::{
    expression::{Argument, DictItem, Expression, Generator, Parameter, Pattern},
    statement::{Header, Snippet, Statement, TypeParameter, WithItem},
};

/// Read-only snippet visitor.
///
/// Every `visit_*` method has a default that calls the corresponding `walk_*`
/// free function, which recurses into child nodes. Override a method to
/// intercept a node; call `walk_*` from within your override to continue
/// the traversal.
pub trait Visitor<'ast> {
    fn visit_snippet(&mut self, snippet: &'ast Snippet) {
        walk_snippet(self, snippet);
    }

    fn visit_stmt(&mut self, stmt: &'ast Statement) {
        walk_stmt(self, stmt);
    }

    fn visit_header(&mut self, header: &'ast Header) {
        walk_header(self, header);
    }

    fn visit_expr(&mut self, expr: &'ast Expression) {
        walk_expr(self, expr);
    }

    fn visit_argument(&mut self, argument: &'ast Argument) {
        walk_argument(self, argument);
    }

    fn visit_parameter(&mut self, parameter: &'ast Parameter) {
        walk_parameter(self, parameter);
    }

    fn visit_generator(&mut self, generator: &'ast Generator) {
        walk_generator(self, generator);
    }

    fn visit_pattern(&mut self, pattern: &'ast Pattern) {
        walk_pattern(self, pattern);
    }
}

// ---------------------------------------------------------------------------
// walk_* free functions - exhaustive destructuring so that adding a new
// field or variant causes a compile error until this code is updated.
// ---------------------------------------------------------------------------

pub fn walk_snippet<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, snippet: &'ast Snippet) {
    let Snippet { statements } = snippet;
    for stmt in statements {
        visitor.visit_stmt(stmt);
    }
}

pub fn walk_stmt<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, stmt: &'ast Statement) {
    match stmt {
        Statement::Expression(expr) | Statement::Decorator(expr) => visitor.visit_expr(expr),
        Statement::Assign { targets, value } => {
            visitor.visit_expr(value);
            for target in targets {
                visitor.visit_expr(target);
            }
        }
        Statement::AugAssign {
            target,
            operator: _,
            value,
        } => {
            visitor.visit_expr(target);
            visitor.visit_expr(value);
        }
        Statement::AnnAssign {
            target,
            annotation,
            value,
        } => {
            visitor.visit_expr(annotation);
            if let Some(value) = value {
                visitor.visit_expr(value);
            }
            visitor.visit_expr(target);
        }
        Statement::Return(value) => {
            if let Some(value) = value {
                visitor.visit_expr(value);
            }
        }
        Statement::Raise { exception, cause } => {
            if let Some(exception) = exception {
                visitor.visit_expr(exception);
            }
            if let Some(cause) = cause {
                visitor.visit_expr(cause);
            }
        }
        Statement::Delete(targets) => {
            for target in targets {
                visitor.visit_expr(target);
            }
        }
        Statement::Assert { test, message } => {
            visitor.visit_expr(test);
            if let Some(message) = message {
                visitor.visit_expr(message);
            }
        }
        Statement::TypeAlias {
            name: _,
            parameters,
            value,
        } => {
            for TypeParameter {
                name: _,
                bound,
                default,
            } in parameters
            {
                for expr in [bound, default].into_iter().flatten() {
                    visitor.visit_expr(expr);
                }
            }
            visitor.visit_expr(value);
        }
        Statement::Compound { header, body } => {
            visitor.visit_header(header);
            for stmt in body {
                visitor.visit_stmt(stmt);
            }
        }
        Statement::Pass
        | Statement::Break
        | Statement::Continue
        | Statement::Global(_)
        | Statement::Nonlocal(_)
        | Statement::Import(_)
        | Statement::ImportFrom { .. } => {}
    }
}

pub fn walk_header<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, header: &'ast Header) {
    match header {
        Header::If(test) | Header::Elif(test) | Header::While(test) => visitor.visit_expr(test),
        Header::For {
            target,
            iter,
            is_async: _,
        } => {
            visitor.visit_expr(iter);
            visitor.visit_expr(target);
        }
        Header::Except { kind, name: _ } => {
            if let Some(kind) = kind {
                visitor.visit_expr(kind);
            }
        }
        Header::With { items, is_async: _ } => {
            for WithItem { context, target } in items {
                visitor.visit_expr(context);
                if let Some(target) = target {
                    visitor.visit_expr(target);
                }
            }
        }
        Header::Def {
            name: _,
            parameters,
            returns,
            is_async: _,
        } => {
            for parameter in parameters {
                visitor.visit_parameter(parameter);
            }
            if let Some(returns) = returns {
                visitor.visit_expr(returns);
            }
        }
        Header::Class { name: _, bases } => {
            for base in bases {
                visitor.visit_argument(base);
            }
        }
        Header::Match(subject) => visitor.visit_expr(subject),
        Header::Case { pattern, guard } => {
            visitor.visit_pattern(pattern);
            if let Some(guard) = guard {
                visitor.visit_expr(guard);
            }
        }
        Header::Else | Header::Try | Header::Finally => {}
    }
}

pub fn walk_expr<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, expr: &'ast Expression) {
    match expr {
        Expression::Name { .. } | Expression::Literal { .. } => {}
        Expression::FormattedString { fields } => {
            for field in fields {
                visitor.visit_expr(field);
            }
        }
        Expression::Attribute {
            value,
            attribute: _,
        } => visitor.visit_expr(value),
        Expression::Subscript { value, index } => {
            visitor.visit_expr(value);
            visitor.visit_expr(index);
        }
        Expression::Slice { lower, upper, step } => {
            for bound in [lower, upper, step].into_iter().flatten() {
                visitor.visit_expr(bound);
            }
        }
        Expression::Call {
            function,
            arguments,
        } => {
            visitor.visit_expr(function);
            for argument in arguments {
                visitor.visit_argument(argument);
            }
        }
        Expression::Unary {
            operator: _,
            operand,
        } => visitor.visit_expr(operand),
        Expression::Binary {
            left,
            operator: _,
            right,
        } => {
            visitor.visit_expr(left);
            visitor.visit_expr(right);
        }
        Expression::Conditional {
            condition,
            consequence,
            alternative,
        } => {
            visitor.visit_expr(condition);
            visitor.visit_expr(consequence);
            visitor.visit_expr(alternative);
        }
        Expression::Lambda { parameters, body } => {
            for parameter in parameters {
                visitor.visit_parameter(parameter);
            }
            visitor.visit_expr(body);
        }
        Expression::NamedExpr { target, value } => {
            visitor.visit_expr(value);
            visitor.visit_expr(target);
        }
        Expression::Tuple(items) | Expression::List(items) | Expression::Set(items) => {
            for item in items {
                visitor.visit_expr(item);
            }
        }
        Expression::Dict(items) => {
            for item in items {
                match item {
                    DictItem::Pair { key, value } => {
                        visitor.visit_expr(key);
                        visitor.visit_expr(value);
                    }
                    DictItem::Unpack(mapping) => visitor.visit_expr(mapping),
                }
            }
        }
        Expression::Comprehension {
            kind: _,
            element,
            value,
            generators,
        } => {
            for generator in generators {
                visitor.visit_generator(generator);
            }
            visitor.visit_expr(element);
            if let Some(value) = value {
                visitor.visit_expr(value);
            }
        }
        Expression::Starred(inner) | Expression::Await(inner) | Expression::YieldFrom(inner) => {
            visitor.visit_expr(inner)
        }
        Expression::Yield(value) => {
            if let Some(value) = value {
                visitor.visit_expr(value);
            }
        }
    }
}

pub fn walk_argument<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, argument: &'ast Argument) {
    match argument {
        Argument::Positional(value)
        | Argument::Keyword { name: _, value }
        | Argument::Unpack(value)
        | Argument::UnpackMap(value) => visitor.visit_expr(value),
    }
}

pub fn walk_parameter<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    parameter: &'ast Parameter,
) {
    let Parameter {
        name: _,
        kind: _,
        annotation,
        default,
    } = parameter;
    if let Some(annotation) = annotation {
        visitor.visit_expr(annotation);
    }
    if let Some(default) = default {
        visitor.visit_expr(default);
    }
}

pub fn walk_generator<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    generator: &'ast Generator,
) {
    let Generator {
        target,
        iter,
        conditions,
        is_async: _,
    } = generator;
    visitor.visit_expr(iter);
    visitor.visit_expr(target);
    for condition in conditions {
        visitor.visit_expr(condition);
    }
}

pub fn walk_pattern<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, pattern: &'ast Pattern) {
    match pattern {
        Pattern::Wildcard | Pattern::Capture(_) | Pattern::Star(_) => {}
        Pattern::Value(value) => visitor.visit_expr(value),
        Pattern::Sequence(items) | Pattern::Or(items) => {
            for item in items {
                visitor.visit_pattern(item);
            }
        }
        Pattern::Mapping { entries, rest: _ } => {
            for (key, value) in entries {
                visitor.visit_expr(key);
                visitor.visit_pattern(value);
            }
        }
        Pattern::Class {
            class,
            positional,
            keywords,
        } => {
            visitor.visit_expr(class);
            for item in positional {
                visitor.visit_pattern(item);
            }
            for (_, value) in keywords {
                visitor.visit_pattern(value);
            }
        }
        Pattern::As { pattern, name: _ } => visitor.visit_pattern(pattern),
    }
}
