use super::expression::{Argument, Expression, Parameter, Pattern};

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Expression(Expression),
    Assign {
        targets: Vec<Expression>,
        value: Expression,
    },
    AugAssign {
        target: Expression,
        operator: String,
        value: Expression,
    },
    AnnAssign {
        target: Expression,
        annotation: Expression,
        value: Option<Expression>,
    },
    Return(Option<Expression>),
    Raise {
        exception: Option<Expression>,
        cause: Option<Expression>,
    },
    Delete(Vec<Expression>),
    Assert {
        test: Expression,
        message: Option<Expression>,
    },
    Pass,
    Break,
    Continue,
    Global(Vec<String>),
    Nonlocal(Vec<String>),
    Import(Vec<Alias>),
    ImportFrom {
        module: String,
        names: Vec<Alias>,
    },
    /// `type Name[T] = value`
    TypeAlias {
        name: String,
        parameters: Vec<TypeParameter>,
        value: Expression,
    },
    /// `@decorator` line. Accepted on its own so a fault raised while
    /// evaluating a decorator still resolves to a fragment.
    Decorator(Expression),
    /// A block header with its (possibly empty) body. A header at the very
    /// end of a snippet has an empty body.
    Compound {
        header: Header,
        body: Vec<Statement>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Alias {
    pub name: String,
    pub alias: Option<String>,
}

/// `T`, `T: bound`, `*Ts` or `**P`, with an optional `= default`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeParameter {
    pub name: String,
    pub bound: Option<Expression>,
    pub default: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WithItem {
    pub context: Expression,
    pub target: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Header {
    If(Expression),
    Elif(Expression),
    Else,
    While(Expression),
    For {
        target: Expression,
        iter: Expression,
        is_async: bool,
    },
    Try,
    Except {
        kind: Option<Expression>,
        name: Option<String>,
    },
    Finally,
    With {
        items: Vec<WithItem>,
        is_async: bool,
    },
    Def {
        name: String,
        parameters: Vec<Parameter>,
        returns: Option<Expression>,
        is_async: bool,
    },
    Class {
        name: String,
        bases: Vec<Argument>,
    },
    Match(Expression),
    Case {
        pattern: Pattern,
        guard: Option<Expression>,
    },
}

/// A parsed source fragment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snippet {
    pub statements: Vec<Statement>,
}
