use crate::error::ParseError;
use crate::syntax::{
    expression::{
        Argument, ComprehensionKind, DictItem, Expression, Generator, LiteralKind, NameContext,
    },
    lexer::{Lexer, split_string_literal},
    position::Position,
    precedence::{Precedence, infix_precedence, is_comparison},
    token_type::TokenType,
};

use super::{ParseResult, Parser};

impl Parser {
    /// `yield_expr | testlist_star_expr`
    pub(super) fn parse_yield_or_testlist(&mut self) -> ParseResult<Expression> {
        if self.current_is(TokenType::Yield) {
            self.parse_yield()
        } else {
            self.parse_testlist_star_expr()
        }
    }

    fn parse_yield(&mut self) -> ParseResult<Expression> {
        self.next_token();
        if self.eat(TokenType::From) {
            return Ok(Expression::YieldFrom(Box::new(self.parse_test()?)));
        }
        if self.at_statement_end() || self.current_is(TokenType::RParen) {
            return Ok(Expression::Yield(None));
        }
        Ok(Expression::Yield(Some(Box::new(
            self.parse_testlist_star_expr()?,
        ))))
    }

    /// Comma separated `test` / `*expr` items; a lone item without a
    /// trailing comma is returned as is, anything else becomes a tuple.
    pub(super) fn parse_testlist_star_expr(&mut self) -> ParseResult<Expression> {
        self.parse_tuple_of(|parser| parser.parse_star_or_test())
    }

    /// Subject of a `match` statement.
    pub(super) fn parse_subject(&mut self) -> ParseResult<Expression> {
        self.parse_tuple_of(|parser| parser.parse_star_or_named())
    }

    /// Targets of `for` and `del`: comma separated `expr` / `*expr` items.
    pub(super) fn parse_exprlist(&mut self) -> ParseResult<Expression> {
        self.parse_tuple_of(|parser| {
            if parser.current_is(TokenType::Asterisk) {
                parser.parse_star_expr()
            } else {
                parser.parse_bitwise_or()
            }
        })
    }

    fn parse_tuple_of(
        &mut self,
        mut item: impl FnMut(&mut Self) -> ParseResult<Expression>,
    ) -> ParseResult<Expression> {
        let first = item(self)?;
        if !self.current_is(TokenType::Comma) {
            return Ok(first);
        }
        let mut items = vec![first];
        while self.eat(TokenType::Comma) {
            if self.at_sequence_end() {
                break;
            }
            items.push(item(self)?);
        }
        Ok(Expression::Tuple(items))
    }

    fn at_sequence_end(&self) -> bool {
        let token_type = self.current().token_type;
        token_type.is_augmented_assign()
            || matches!(
                token_type,
                TokenType::Newline
                    | TokenType::Eof
                    | TokenType::Semicolon
                    | TokenType::Assign
                    | TokenType::RParen
                    | TokenType::RBracket
                    | TokenType::RBrace
                    | TokenType::Colon
                    | TokenType::In
            )
    }

    fn parse_star_or_test(&mut self) -> ParseResult<Expression> {
        if self.current_is(TokenType::Asterisk) {
            self.parse_star_expr()
        } else {
            self.parse_test()
        }
    }

    fn parse_star_or_named(&mut self) -> ParseResult<Expression> {
        if self.current_is(TokenType::Asterisk) {
            self.parse_star_expr()
        } else {
            self.parse_named_expr_test()
        }
    }

    fn parse_star_expr(&mut self) -> ParseResult<Expression> {
        self.expect(TokenType::Asterisk)?;
        Ok(Expression::Starred(Box::new(self.parse_bitwise_or()?)))
    }

    /// `NAME ':=' test | test`
    pub(super) fn parse_named_expr_test(&mut self) -> ParseResult<Expression> {
        if self.current_is(TokenType::Ident) && self.peek_is(TokenType::Walrus) {
            let (name, position) = self.expect_ident()?;
            self.next_token();
            let value = self.parse_test()?;
            return Ok(Expression::NamedExpr {
                target: Box::new(Expression::name(name, NameContext::Store, position)),
                value: Box::new(value),
            });
        }
        self.parse_test()
    }

    /// `or_test ['if' or_test 'else' test] | lambdef`
    pub(super) fn parse_test(&mut self) -> ParseResult<Expression> {
        if self.current_is(TokenType::Lambda) {
            return self.parse_lambda();
        }
        let expression = self.parse_or_test()?;
        if !self.current_is(TokenType::If) {
            return Ok(expression);
        }
        self.next_token();
        let condition = self.parse_or_test()?;
        self.expect(TokenType::Else)?;
        let alternative = self.nested(Self::parse_test)?;
        Ok(Expression::Conditional {
            condition: Box::new(condition),
            consequence: Box::new(expression),
            alternative: Box::new(alternative),
        })
    }

    fn parse_lambda(&mut self) -> ParseResult<Expression> {
        self.expect(TokenType::Lambda)?;
        let parameters = self.parse_parameters(TokenType::Colon)?;
        self.expect(TokenType::Colon)?;
        let body = self.nested(Self::parse_test)?;
        Ok(Expression::Lambda {
            parameters,
            body: Box::new(body),
        })
    }

    fn parse_or_test(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_and_test()?;
        while self.eat(TokenType::Or) {
            let right = self.parse_and_test()?;
            left = binary(left, "or", right);
        }
        Ok(left)
    }

    fn parse_and_test(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_not_test()?;
        while self.eat(TokenType::And) {
            let right = self.parse_not_test()?;
            left = binary(left, "and", right);
        }
        Ok(left)
    }

    fn parse_not_test(&mut self) -> ParseResult<Expression> {
        if self.eat(TokenType::Not) {
            let operand = self.nested(Self::parse_not_test)?;
            return Ok(Expression::Unary {
                operator: "not".to_string(),
                operand: Box::new(operand),
            });
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_bitwise_or()?;
        while is_comparison(self.current().token_type) {
            let operator = match self.current().token_type {
                TokenType::Not => {
                    self.next_token();
                    self.expect(TokenType::In)?;
                    "not in".to_string()
                }
                TokenType::Is => {
                    self.next_token();
                    if self.eat(TokenType::Not) {
                        "is not".to_string()
                    } else {
                        "is".to_string()
                    }
                }
                _ => {
                    let operator = self.current().literal.clone();
                    self.next_token();
                    operator
                }
            };
            let right = self.parse_bitwise_or()?;
            left = binary(left, &operator, right);
        }
        Ok(left)
    }

    pub(super) fn parse_bitwise_or(&mut self) -> ParseResult<Expression> {
        self.parse_binary(Precedence::BitOr)
    }

    /// Precedence climbing over the left-associative binary operators.
    fn parse_binary(&mut self, min: Precedence) -> ParseResult<Expression> {
        let mut left = self.parse_factor()?;
        while let Some(precedence) = infix_precedence(self.current().token_type) {
            if precedence < min {
                break;
            }
            let operator = self.current().literal.clone();
            self.next_token();
            let right = self.parse_binary(precedence.tighter())?;
            left = binary(left, &operator, right);
        }
        Ok(left)
    }

    fn parse_factor(&mut self) -> ParseResult<Expression> {
        if matches!(
            self.current().token_type,
            TokenType::Plus | TokenType::Minus | TokenType::Tilde
        ) {
            let operator = self.current().literal.clone();
            self.next_token();
            let operand = self.nested(Self::parse_factor)?;
            return Ok(Expression::Unary {
                operator,
                operand: Box::new(operand),
            });
        }
        self.parse_power()
    }

    fn parse_power(&mut self) -> ParseResult<Expression> {
        let base = if self.eat(TokenType::Await) {
            Expression::Await(Box::new(self.parse_primary()?))
        } else {
            self.parse_primary()?
        };
        if self.eat(TokenType::DoubleStar) {
            let exponent = self.nested(Self::parse_factor)?;
            return Ok(binary(base, "**", exponent));
        }
        Ok(base)
    }

    /// An atom followed by any number of `.name`, `(args)` and `[index]`.
    fn parse_primary(&mut self) -> ParseResult<Expression> {
        let mut expression = self.parse_atom()?;
        loop {
            match self.current().token_type {
                TokenType::Dot => {
                    self.next_token();
                    let (attribute, _) = self.expect_ident()?;
                    expression = Expression::Attribute {
                        value: Box::new(expression),
                        attribute,
                    };
                }
                TokenType::LParen => {
                    self.next_token();
                    let arguments = self.parse_arguments(TokenType::RParen)?;
                    self.expect(TokenType::RParen)?;
                    expression = Expression::Call {
                        function: Box::new(expression),
                        arguments,
                    };
                }
                TokenType::LBracket => {
                    self.next_token();
                    let index = self.parse_subscript_list()?;
                    self.expect(TokenType::RBracket)?;
                    expression = Expression::Subscript {
                        value: Box::new(expression),
                        index: Box::new(index),
                    };
                }
                _ => return Ok(expression),
            }
        }
    }

    pub(super) fn parse_arguments(&mut self, closer: TokenType) -> ParseResult<Vec<Argument>> {
        let mut arguments = Vec::new();
        while !self.current_is(closer) {
            let argument = if self.eat(TokenType::Asterisk) {
                Argument::Unpack(self.parse_test()?)
            } else if self.eat(TokenType::DoubleStar) {
                Argument::UnpackMap(self.parse_test()?)
            } else if self.current_is(TokenType::Ident) && self.peek_is(TokenType::Assign) {
                let (name, _) = self.expect_ident()?;
                self.next_token();
                Argument::Keyword {
                    name,
                    value: self.parse_test()?,
                }
            } else {
                let value = self.parse_named_expr_test()?;
                if self.at_comprehension() {
                    let generators = self.parse_generators()?;
                    Argument::Positional(Expression::Comprehension {
                        kind: ComprehensionKind::Generator,
                        element: Box::new(value),
                        value: None,
                        generators,
                    })
                } else {
                    Argument::Positional(value)
                }
            };
            arguments.push(argument);
            if !self.eat(TokenType::Comma) {
                break;
            }
        }
        Ok(arguments)
    }

    fn parse_subscript_list(&mut self) -> ParseResult<Expression> {
        let first = self.parse_subscript()?;
        if !self.current_is(TokenType::Comma) {
            return Ok(first);
        }
        let mut items = vec![first];
        while self.eat(TokenType::Comma) {
            if self.current_is(TokenType::RBracket) {
                break;
            }
            items.push(self.parse_subscript()?);
        }
        Ok(Expression::Tuple(items))
    }

    fn parse_subscript(&mut self) -> ParseResult<Expression> {
        let lower = if self.current_is(TokenType::Colon) {
            None
        } else {
            let lower = self.parse_star_or_named()?;
            if !self.current_is(TokenType::Colon) {
                return Ok(lower);
            }
            Some(Box::new(lower))
        };
        self.expect(TokenType::Colon)?;

        let upper = if self.at_slice_bound_end() {
            None
        } else {
            Some(Box::new(self.parse_test()?))
        };
        let step = if self.eat(TokenType::Colon) && !self.at_slice_bound_end() {
            Some(Box::new(self.parse_test()?))
        } else {
            None
        };
        Ok(Expression::Slice { lower, upper, step })
    }

    fn at_slice_bound_end(&self) -> bool {
        matches!(
            self.current().token_type,
            TokenType::Colon | TokenType::Comma | TokenType::RBracket
        )
    }

    fn at_comprehension(&self) -> bool {
        self.current_is(TokenType::For)
            || (self.current_is(TokenType::Async) && self.peek_is(TokenType::For))
    }

    fn parse_generators(&mut self) -> ParseResult<Vec<Generator>> {
        let mut generators = Vec::new();
        while self.at_comprehension() {
            let is_async = self.eat(TokenType::Async);
            self.expect(TokenType::For)?;
            let target = self.parse_exprlist()?;
            let target = self.into_target(target)?;
            self.expect(TokenType::In)?;
            let iter = self.parse_or_test()?;
            let mut conditions = Vec::new();
            while self.eat(TokenType::If) {
                conditions.push(self.parse_or_test()?);
            }
            generators.push(Generator {
                target,
                iter,
                conditions,
                is_async,
            });
        }
        Ok(generators)
    }

    pub(super) fn parse_atom(&mut self) -> ParseResult<Expression> {
        let token = self.current().clone();
        match token.token_type {
            TokenType::Ident => {
                self.next_token();
                Ok(Expression::name(
                    token.literal,
                    NameContext::Load,
                    token.position,
                ))
            }
            TokenType::Number => {
                self.next_token();
                Ok(literal(LiteralKind::Number, token.literal))
            }
            TokenType::String => self.parse_strings(),
            TokenType::True => {
                self.next_token();
                Ok(literal(LiteralKind::True, token.literal))
            }
            TokenType::False => {
                self.next_token();
                Ok(literal(LiteralKind::False, token.literal))
            }
            TokenType::None => {
                self.next_token();
                Ok(literal(LiteralKind::None, token.literal))
            }
            TokenType::Ellipsis => {
                self.next_token();
                Ok(literal(LiteralKind::Ellipsis, token.literal))
            }
            TokenType::LParen => self.nested(Self::parse_parenthesized),
            TokenType::LBracket => self.nested(Self::parse_list),
            TokenType::LBrace => self.nested(Self::parse_brace),
            _ => Err(self.unexpected("invalid syntax")),
        }
    }

    fn parse_parenthesized(&mut self) -> ParseResult<Expression> {
        self.expect(TokenType::LParen)?;
        if self.eat(TokenType::RParen) {
            return Ok(Expression::Tuple(Vec::new()));
        }
        if self.current_is(TokenType::Yield) {
            let expression = self.parse_yield()?;
            self.expect(TokenType::RParen)?;
            return Ok(expression);
        }

        let first = self.parse_star_or_named()?;
        if self.at_comprehension() {
            let generators = self.parse_generators()?;
            self.expect(TokenType::RParen)?;
            return Ok(Expression::Comprehension {
                kind: ComprehensionKind::Generator,
                element: Box::new(first),
                value: None,
                generators,
            });
        }
        if !self.current_is(TokenType::Comma) {
            self.expect(TokenType::RParen)?;
            return Ok(first);
        }

        let mut items = vec![first];
        while self.eat(TokenType::Comma) {
            if self.current_is(TokenType::RParen) {
                break;
            }
            items.push(self.parse_star_or_named()?);
        }
        self.expect(TokenType::RParen)?;
        Ok(Expression::Tuple(items))
    }

    fn parse_list(&mut self) -> ParseResult<Expression> {
        self.expect(TokenType::LBracket)?;
        if self.eat(TokenType::RBracket) {
            return Ok(Expression::List(Vec::new()));
        }
        let first = self.parse_star_or_named()?;
        if self.at_comprehension() {
            let generators = self.parse_generators()?;
            self.expect(TokenType::RBracket)?;
            return Ok(Expression::Comprehension {
                kind: ComprehensionKind::List,
                element: Box::new(first),
                value: None,
                generators,
            });
        }
        let items = self.parse_items_after(first, TokenType::RBracket)?;
        Ok(Expression::List(items))
    }

    /// Remaining `, item` entries of a list or set display, up to `closer`.
    fn parse_items_after(
        &mut self,
        first: Expression,
        closer: TokenType,
    ) -> ParseResult<Vec<Expression>> {
        let mut items = vec![first];
        while self.eat(TokenType::Comma) {
            if self.current_is(closer) {
                break;
            }
            items.push(self.parse_star_or_named()?);
        }
        self.expect(closer)?;
        Ok(items)
    }

    /// `{}` displays: dicts, sets and their comprehensions.
    fn parse_brace(&mut self) -> ParseResult<Expression> {
        self.expect(TokenType::LBrace)?;
        if self.eat(TokenType::RBrace) {
            return Ok(Expression::Dict(Vec::new()));
        }

        let first_item = if self.eat(TokenType::DoubleStar) {
            DictItem::Unpack(self.parse_bitwise_or()?)
        } else {
            let key = self.parse_star_or_named()?;
            if !self.eat(TokenType::Colon) {
                if self.at_comprehension() {
                    let generators = self.parse_generators()?;
                    self.expect(TokenType::RBrace)?;
                    return Ok(Expression::Comprehension {
                        kind: ComprehensionKind::Set,
                        element: Box::new(key),
                        value: None,
                        generators,
                    });
                }
                let items = self.parse_items_after(key, TokenType::RBrace)?;
                return Ok(Expression::Set(items));
            }
            let value = self.parse_test()?;
            if self.at_comprehension() {
                let generators = self.parse_generators()?;
                self.expect(TokenType::RBrace)?;
                return Ok(Expression::Comprehension {
                    kind: ComprehensionKind::Dict,
                    element: Box::new(key),
                    value: Some(Box::new(value)),
                    generators,
                });
            }
            DictItem::Pair { key, value }
        };

        let mut items = vec![first_item];
        while self.eat(TokenType::Comma) {
            if self.current_is(TokenType::RBrace) {
                break;
            }
            if self.eat(TokenType::DoubleStar) {
                items.push(DictItem::Unpack(self.parse_bitwise_or()?));
                continue;
            }
            let key = self.parse_test()?;
            self.expect(TokenType::Colon)?;
            let value = self.parse_test()?;
            items.push(DictItem::Pair { key, value });
        }
        self.expect(TokenType::RBrace)?;
        Ok(Expression::Dict(items))
    }

    /// Adjacent string literals concatenate. An f-string anywhere in the run
    /// turns the whole run into a formatted string.
    pub(super) fn parse_strings(&mut self) -> ParseResult<Expression> {
        let mut text = String::new();
        let mut fields = Vec::new();
        let mut formatted = false;
        let mut bytes = false;

        while self.current_is(TokenType::String) {
            let token = self.current().clone();
            let (prefix, body) = split_string_literal(&token.literal);
            let prefix = prefix.to_ascii_lowercase();
            if prefix.contains('b') {
                bytes = true;
            }
            if prefix.contains('f') {
                formatted = true;
                fields.extend(parse_format_fields(body, token.position)?);
            }
            text.push_str(&token.literal);
            self.next_token();
        }

        if formatted {
            Ok(Expression::FormattedString { fields })
        } else if bytes {
            Ok(literal(LiteralKind::Bytes, text))
        } else {
            Ok(literal(LiteralKind::String, text))
        }
    }
}

fn binary(left: Expression, operator: &str, right: Expression) -> Expression {
    Expression::Binary {
        left: Box::new(left),
        operator: operator.to_string(),
        right: Box::new(right),
    }
}

fn literal(kind: LiteralKind, text: String) -> Expression {
    Expression::Literal { kind, text }
}

/// Parse the replacement fields `{expr!conv:spec}` of an f-string body.
/// Nested fields inside a format spec are parsed as well.
fn parse_format_fields(body: &str, position: Position) -> ParseResult<Vec<Expression>> {
    let chars: Vec<char> = body.chars().collect();
    let mut fields = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '{' if chars.get(i + 1) == Some(&'{') => i += 2,
            '}' if chars.get(i + 1) == Some(&'}') => i += 2,
            '{' => {
                let (expression, end) = scan_field(&chars, i + 1);
                fields.push(parse_field_expression(&expression, position)?);
                i = end;
                // Format spec: collect nested `{...}` fields up to the closing brace.
                if chars.get(i) == Some(&'!') {
                    while i < chars.len() && chars[i] != ':' && chars[i] != '}' {
                        i += 1;
                    }
                }
                if chars.get(i) == Some(&':') {
                    i += 1;
                    while i < chars.len() && chars[i] != '}' {
                        if chars[i] == '{' {
                            let (nested, end) = scan_field(&chars, i + 1);
                            fields.push(parse_field_expression(&nested, position)?);
                            i = end;
                        }
                        i += 1;
                    }
                }
                if chars.get(i) != Some(&'}') {
                    return Err(ParseError::new(
                        position.line,
                        position.column + 1,
                        "f-string: expecting '}'",
                    ));
                }
                i += 1;
            }
            _ => i += 1,
        }
    }
    Ok(fields)
}

/// Scan a replacement-field expression starting at `start`; returns the
/// expression text and the index of the terminating `!`, `:` or `}`.
fn scan_field(chars: &[char], start: usize) -> (String, usize) {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut i = start;
    while i < chars.len() {
        let ch = chars[i];
        if let Some(q) = quote {
            if ch == q {
                quote = None;
            }
            i += 1;
            continue;
        }
        match ch {
            '\'' | '"' => quote = Some(ch),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            '}' if depth > 0 => depth -= 1,
            '}' => break,
            '!' if depth == 0 && chars.get(i + 1) != Some(&'=') => break,
            ':' if depth == 0 => break,
            _ => {}
        }
        i += 1;
    }
    (chars[start..i].iter().collect(), i)
}

fn parse_field_expression(text: &str, position: Position) -> ParseResult<Expression> {
    let mut text = text.trim();
    // `{value=}` self-documenting fields.
    if let Some(stripped) = text.strip_suffix('=')
        && !stripped.ends_with(['=', '!', '<', '>'])
    {
        text = stripped.trim_end();
    }
    if text.is_empty() {
        return Err(ParseError::new(
            position.line,
            position.column + 1,
            "f-string: empty expression not allowed",
        ));
    }
    let wrapped = format!("({})", text);
    let mut parser = Parser::new(Lexer::new(&wrapped));
    let expression = parser.parse_testlist_star_expr().map_err(|err| {
        ParseError::new(
            position.line,
            position.column + 1,
            format!("f-string: {}", err.message),
        )
    })?;
    if !parser.at_statement_end() {
        return Err(ParseError::new(
            position.line,
            position.column + 1,
            "f-string: invalid expression",
        ));
    }
    Ok(expression)
}
