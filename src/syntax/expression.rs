use super::position::Position;

/// Whether a name is read or bound at this point of the snippet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameContext {
    Load,
    Store,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Number,
    String,
    Bytes,
    True,
    False,
    None,
    Ellipsis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComprehensionKind {
    List,
    Set,
    Dict,
    Generator,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Name {
        name: String,
        context: NameContext,
        position: Position,
    },
    Literal {
        kind: LiteralKind,
        text: String,
    },
    /// An f-string; only the embedded replacement-field expressions are kept.
    FormattedString {
        fields: Vec<Expression>,
    },
    Attribute {
        value: Box<Expression>,
        attribute: String,
    },
    Subscript {
        value: Box<Expression>,
        index: Box<Expression>,
    },
    Slice {
        lower: Option<Box<Expression>>,
        upper: Option<Box<Expression>>,
        step: Option<Box<Expression>>,
    },
    Call {
        function: Box<Expression>,
        arguments: Vec<Argument>,
    },
    Unary {
        operator: String,
        operand: Box<Expression>,
    },
    Binary {
        left: Box<Expression>,
        operator: String,
        right: Box<Expression>,
    },
    Conditional {
        condition: Box<Expression>,
        consequence: Box<Expression>,
        alternative: Box<Expression>,
    },
    Lambda {
        parameters: Vec<Parameter>,
        body: Box<Expression>,
    },
    NamedExpr {
        target: Box<Expression>,
        value: Box<Expression>,
    },
    Tuple(Vec<Expression>),
    List(Vec<Expression>),
    Set(Vec<Expression>),
    Dict(Vec<DictItem>),
    Comprehension {
        kind: ComprehensionKind,
        element: Box<Expression>,
        /// Value expression of a dict comprehension (`element` is the key).
        value: Option<Box<Expression>>,
        generators: Vec<Generator>,
    },
    Starred(Box<Expression>),
    Await(Box<Expression>),
    Yield(Option<Box<Expression>>),
    YieldFrom(Box<Expression>),
}

impl Expression {
    pub fn name(name: impl Into<String>, context: NameContext, position: Position) -> Self {
        Expression::Name {
            name: name.into(),
            context,
            position,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    Positional(Expression),
    Keyword { name: String, value: Expression },
    /// `*iterable`
    Unpack(Expression),
    /// `**mapping`
    UnpackMap(Expression),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    Regular,
    VarArgs,
    KwArgs,
    /// A bare `*` or `/` marker.
    Separator,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub kind: ParameterKind,
    pub annotation: Option<Expression>,
    pub default: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DictItem {
    Pair { key: Expression, value: Expression },
    Unpack(Expression),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Generator {
    pub target: Expression,
    pub iter: Expression,
    pub conditions: Vec<Expression>,
    pub is_async: bool,
}

/// A `case` pattern. Names a pattern binds are kept as plain strings, since
/// they are never reads.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// `_`
    Wildcard,
    Capture(String),
    /// Literal or dotted-name constant compared against the subject.
    Value(Expression),
    Sequence(Vec<Pattern>),
    /// `*rest` inside a sequence pattern; `None` for `*_`.
    Star(Option<String>),
    Mapping {
        entries: Vec<(Expression, Pattern)>,
        rest: Option<String>,
    },
    Class {
        class: Expression,
        positional: Vec<Pattern>,
        keywords: Vec<(String, Pattern)>,
    },
    Or(Vec<Pattern>),
    As {
        pattern: Box<Pattern>,
        name: String,
    },
}
