use crate::syntax::{
    expression::{Expression, NameContext, Parameter, ParameterKind},
    statement::{Alias, Header, Statement, TypeParameter, WithItem},
    token_type::TokenType,
};

use super::{ParseResult, Parser};

impl Parser {
    pub(super) fn parse_statement(&mut self) -> ParseResult<Vec<Statement>> {
        match self.current().token_type {
            TokenType::If
            | TokenType::Elif
            | TokenType::Else
            | TokenType::While
            | TokenType::For
            | TokenType::Try
            | TokenType::Except
            | TokenType::Finally
            | TokenType::With
            | TokenType::Def
            | TokenType::Class
            | TokenType::At => Ok(vec![self.parse_compound()?]),
            TokenType::Async
                if matches!(
                    self.peek().token_type,
                    TokenType::Def | TokenType::For | TokenType::With
                ) =>
            {
                Ok(vec![self.parse_compound()?])
            }
            // `match` and `case` are also ordinary names: `match(x)`,
            // `case = 3`.
            TokenType::Ident if self.current_is_word("match") || self.current_is_word("case") => {
                let start = self.index;
                match self.parse_compound() {
                    Ok(statement) => Ok(vec![statement]),
                    Err(err) => {
                        self.index = start;
                        self.parse_simple_line().map_err(|_| err)
                    }
                }
            }
            _ => self.parse_simple_line(),
        }
    }

    /// `small_stmt (';' small_stmt)* [';'] NEWLINE`
    fn parse_simple_line(&mut self) -> ParseResult<Vec<Statement>> {
        let mut statements = vec![self.parse_small_statement()?];
        while self.eat(TokenType::Semicolon) {
            if matches!(
                self.current().token_type,
                TokenType::Newline | TokenType::Eof
            ) {
                break;
            }
            statements.push(self.parse_small_statement()?);
        }
        self.expect_line_end()?;
        Ok(statements)
    }

    fn expect_line_end(&mut self) -> ParseResult<()> {
        match self.current().token_type {
            TokenType::Newline => {
                self.next_token();
                Ok(())
            }
            TokenType::Eof => Ok(()),
            _ => Err(self.unexpected("expected end of statement")),
        }
    }

    pub(super) fn at_statement_end(&self) -> bool {
        matches!(
            self.current().token_type,
            TokenType::Newline | TokenType::Eof | TokenType::Semicolon
        )
    }

    fn parse_small_statement(&mut self) -> ParseResult<Statement> {
        match self.current().token_type {
            TokenType::Pass => {
                self.next_token();
                Ok(Statement::Pass)
            }
            TokenType::Break => {
                self.next_token();
                Ok(Statement::Break)
            }
            TokenType::Continue => {
                self.next_token();
                Ok(Statement::Continue)
            }
            TokenType::Return => {
                self.next_token();
                if self.at_statement_end() {
                    return Ok(Statement::Return(None));
                }
                Ok(Statement::Return(Some(self.parse_testlist_star_expr()?)))
            }
            TokenType::Raise => {
                self.next_token();
                if self.at_statement_end() {
                    return Ok(Statement::Raise {
                        exception: None,
                        cause: None,
                    });
                }
                let exception = self.parse_test()?;
                let cause = if self.eat(TokenType::From) {
                    Some(self.parse_test()?)
                } else {
                    None
                };
                Ok(Statement::Raise {
                    exception: Some(exception),
                    cause,
                })
            }
            TokenType::Del => {
                self.next_token();
                let targets = match self.parse_exprlist()? {
                    Expression::Tuple(items) => items,
                    single => vec![single],
                };
                let targets = targets
                    .into_iter()
                    .map(|target| self.into_target(target))
                    .collect::<ParseResult<Vec<_>>>()?;
                Ok(Statement::Delete(targets))
            }
            TokenType::Assert => {
                self.next_token();
                let test = self.parse_test()?;
                let message = if self.eat(TokenType::Comma) {
                    Some(self.parse_test()?)
                } else {
                    None
                };
                Ok(Statement::Assert { test, message })
            }
            TokenType::Global => {
                self.next_token();
                Ok(Statement::Global(self.parse_name_list()?))
            }
            TokenType::Nonlocal => {
                self.next_token();
                Ok(Statement::Nonlocal(self.parse_name_list()?))
            }
            TokenType::Import => self.parse_import(),
            TokenType::From => self.parse_from_import(),
            TokenType::Ident if self.current_is_word("type") && self.peek_is(TokenType::Ident) => {
                self.parse_type_alias()
            }
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_expression_statement(&mut self) -> ParseResult<Statement> {
        let first = self.parse_yield_or_testlist()?;

        if self.current_is(TokenType::Colon) {
            self.next_token();
            let annotation = self.parse_test()?;
            let value = if self.eat(TokenType::Assign) {
                Some(self.parse_yield_or_testlist()?)
            } else {
                None
            };
            let target = self.into_target(first)?;
            return Ok(Statement::AnnAssign {
                target,
                annotation,
                value,
            });
        }

        if self.current().token_type.is_augmented_assign() {
            // The target is read before it is written, so it keeps its
            // load context.
            self.check_target(&first)?;
            let operator = self.current().literal.clone();
            self.next_token();
            let value = self.parse_yield_or_testlist()?;
            return Ok(Statement::AugAssign {
                target: first,
                operator,
                value,
            });
        }

        if !self.current_is(TokenType::Assign) {
            return Ok(Statement::Expression(first));
        }

        let mut targets = vec![first];
        let value = loop {
            self.next_token();
            let rhs = self.parse_yield_or_testlist()?;
            if self.current_is(TokenType::Assign) {
                targets.push(rhs);
            } else {
                break rhs;
            }
        };
        let targets = targets
            .into_iter()
            .map(|target| self.into_target(target))
            .collect::<ParseResult<Vec<_>>>()?;
        Ok(Statement::Assign { targets, value })
    }

    fn parse_type_alias(&mut self) -> ParseResult<Statement> {
        self.next_token();
        let (name, _) = self.expect_ident()?;
        let mut parameters = Vec::new();
        if self.eat(TokenType::LBracket) {
            while !self.current_is(TokenType::RBracket) {
                parameters.push(self.parse_type_parameter()?);
                if !self.eat(TokenType::Comma) {
                    break;
                }
            }
            self.expect(TokenType::RBracket)?;
        }
        self.expect(TokenType::Assign)?;
        let value = self.parse_test()?;
        Ok(Statement::TypeAlias {
            name,
            parameters,
            value,
        })
    }

    fn parse_type_parameter(&mut self) -> ParseResult<TypeParameter> {
        let variadic = self.eat(TokenType::Asterisk) || self.eat(TokenType::DoubleStar);
        let (name, _) = self.expect_ident()?;
        let bound = if !variadic && self.eat(TokenType::Colon) {
            Some(self.parse_test()?)
        } else {
            None
        };
        let default = if self.eat(TokenType::Assign) {
            Some(self.parse_test()?)
        } else {
            None
        };
        Ok(TypeParameter {
            name,
            bound,
            default,
        })
    }

    fn parse_name_list(&mut self) -> ParseResult<Vec<String>> {
        let mut names = vec![self.expect_ident()?.0];
        while self.eat(TokenType::Comma) {
            names.push(self.expect_ident()?.0);
        }
        Ok(names)
    }

    fn parse_dotted_name(&mut self) -> ParseResult<String> {
        let mut name = self.expect_ident()?.0;
        while self.eat(TokenType::Dot) {
            name.push('.');
            name.push_str(&self.expect_ident()?.0);
        }
        Ok(name)
    }

    fn parse_alias(&mut self, dotted: bool) -> ParseResult<Alias> {
        let name = if dotted {
            self.parse_dotted_name()?
        } else {
            self.expect_ident()?.0
        };
        let alias = if self.eat(TokenType::As) {
            Some(self.expect_ident()?.0)
        } else {
            None
        };
        Ok(Alias { name, alias })
    }

    fn parse_import(&mut self) -> ParseResult<Statement> {
        self.next_token();
        let mut names = vec![self.parse_alias(true)?];
        while self.eat(TokenType::Comma) {
            names.push(self.parse_alias(true)?);
        }
        Ok(Statement::Import(names))
    }

    fn parse_from_import(&mut self) -> ParseResult<Statement> {
        self.next_token();
        let mut module = String::new();
        loop {
            match self.current().token_type {
                TokenType::Dot => module.push('.'),
                TokenType::Ellipsis => module.push_str("..."),
                _ => break,
            }
            self.next_token();
        }
        if self.current_is(TokenType::Ident) {
            module.push_str(&self.parse_dotted_name()?);
        }
        if module.is_empty() {
            return Err(self.unexpected("expected module name"));
        }
        self.expect(TokenType::Import)?;

        if self.eat(TokenType::Asterisk) {
            return Ok(Statement::ImportFrom {
                module,
                names: vec![Alias {
                    name: "*".to_string(),
                    alias: None,
                }],
            });
        }

        let parenthesized = self.eat(TokenType::LParen);
        let mut names = vec![self.parse_alias(false)?];
        while self.eat(TokenType::Comma) {
            if parenthesized && self.current_is(TokenType::RParen) {
                break;
            }
            names.push(self.parse_alias(false)?);
        }
        if parenthesized {
            self.expect(TokenType::RParen)?;
        }
        Ok(Statement::ImportFrom { module, names })
    }

    fn parse_compound(&mut self) -> ParseResult<Statement> {
        if self.eat(TokenType::At) {
            let decorator = self.parse_named_expr_test()?;
            self.expect_line_end()?;
            return Ok(Statement::Decorator(decorator));
        }

        let is_async = self.eat(TokenType::Async);
        let header = match self.current().token_type {
            TokenType::If => {
                self.next_token();
                Header::If(self.parse_named_expr_test()?)
            }
            TokenType::Elif => {
                self.next_token();
                Header::Elif(self.parse_named_expr_test()?)
            }
            TokenType::Else => {
                self.next_token();
                Header::Else
            }
            TokenType::While => {
                self.next_token();
                Header::While(self.parse_named_expr_test()?)
            }
            TokenType::For => {
                self.next_token();
                let target = self.parse_exprlist()?;
                let target = self.into_target(target)?;
                self.expect(TokenType::In)?;
                let iter = self.parse_testlist_star_expr()?;
                Header::For {
                    target,
                    iter,
                    is_async,
                }
            }
            TokenType::Try => {
                self.next_token();
                Header::Try
            }
            TokenType::Except => {
                self.next_token();
                self.eat(TokenType::Asterisk);
                let mut kind = None;
                let mut name = None;
                if !self.current_is(TokenType::Colon) {
                    kind = Some(self.parse_test()?);
                    if self.eat(TokenType::As) {
                        name = Some(self.expect_ident()?.0);
                    }
                }
                Header::Except { kind, name }
            }
            TokenType::Finally => {
                self.next_token();
                Header::Finally
            }
            TokenType::With => {
                self.next_token();
                let mut items = vec![self.parse_with_item()?];
                while self.eat(TokenType::Comma) {
                    items.push(self.parse_with_item()?);
                }
                Header::With { items, is_async }
            }
            TokenType::Def => {
                self.next_token();
                let (name, _) = self.expect_ident()?;
                self.expect(TokenType::LParen)?;
                let parameters = self.parse_parameters(TokenType::RParen)?;
                self.expect(TokenType::RParen)?;
                let returns = if self.eat(TokenType::Arrow) {
                    Some(self.parse_test()?)
                } else {
                    None
                };
                Header::Def {
                    name,
                    parameters,
                    returns,
                    is_async,
                }
            }
            TokenType::Class => {
                self.next_token();
                let (name, _) = self.expect_ident()?;
                let bases = if self.eat(TokenType::LParen) {
                    let bases = self.parse_arguments(TokenType::RParen)?;
                    self.expect(TokenType::RParen)?;
                    bases
                } else {
                    Vec::new()
                };
                Header::Class { name, bases }
            }
            TokenType::Ident if self.current_is_word("match") => {
                self.next_token();
                Header::Match(self.parse_subject()?)
            }
            TokenType::Ident if self.current_is_word("case") => {
                self.next_token();
                let pattern = self.parse_case_pattern()?;
                let guard = if self.eat(TokenType::If) {
                    Some(self.parse_named_expr_test()?)
                } else {
                    None
                };
                Header::Case { pattern, guard }
            }
            _ => return Err(self.unexpected("expected a block statement")),
        };

        self.expect(TokenType::Colon)?;
        let body = self.parse_suite()?;
        Ok(Statement::Compound { header, body })
    }

    fn parse_with_item(&mut self) -> ParseResult<WithItem> {
        let context = self.parse_test()?;
        let target = if self.eat(TokenType::As) {
            let target = self.parse_bitwise_or()?;
            Some(self.into_target(target)?)
        } else {
            None
        };
        Ok(WithItem { context, target })
    }

    /// Body of a block header: a same-line simple statement list, an
    /// indented block, or nothing when the snippet ends after the header.
    fn parse_suite(&mut self) -> ParseResult<Vec<Statement>> {
        match self.current().token_type {
            TokenType::Eof => return Ok(Vec::new()),
            TokenType::Newline => self.next_token(),
            _ => return self.parse_simple_line(),
        }

        match self.current().token_type {
            TokenType::Eof => Ok(Vec::new()),
            TokenType::Indent => {
                self.next_token();
                let mut body = Vec::new();
                loop {
                    match self.current().token_type {
                        TokenType::Dedent => {
                            self.next_token();
                            break;
                        }
                        TokenType::Eof => break,
                        TokenType::Newline => self.next_token(),
                        _ => body.extend(self.parse_statement()?),
                    }
                }
                Ok(body)
            }
            _ => Err(self.error("expected an indented block")),
        }
    }

    /// Parameter list of a `def` (closed by `)`) or a `lambda` (closed by `:`).
    pub(super) fn parse_parameters(&mut self, closer: TokenType) -> ParseResult<Vec<Parameter>> {
        let mut parameters = Vec::new();
        while !self.current_is(closer) {
            let kind = if self.eat(TokenType::Asterisk) {
                if self.current_is(TokenType::Ident) {
                    ParameterKind::VarArgs
                } else {
                    ParameterKind::Separator
                }
            } else if self.eat(TokenType::DoubleStar) {
                ParameterKind::KwArgs
            } else if self.eat(TokenType::Slash) {
                ParameterKind::Separator
            } else {
                ParameterKind::Regular
            };

            let name = if kind == ParameterKind::Separator {
                String::new()
            } else {
                self.expect_ident()?.0
            };
            let annotation = if closer == TokenType::RParen
                && kind != ParameterKind::Separator
                && self.eat(TokenType::Colon)
            {
                Some(self.parse_test()?)
            } else {
                None
            };
            let default = if self.eat(TokenType::Assign) {
                Some(self.parse_test()?)
            } else {
                None
            };
            parameters.push(Parameter {
                name,
                kind,
                annotation,
                default,
            });

            if !self.eat(TokenType::Comma) {
                break;
            }
        }
        Ok(parameters)
    }

    /// Turn a parsed expression into an assignment target, switching bare
    /// names to store context.
    pub(super) fn into_target(&self, expression: Expression) -> ParseResult<Expression> {
        match expression {
            Expression::Name { name, position, .. } => {
                Ok(Expression::name(name, NameContext::Store, position))
            }
            Expression::Attribute { .. } | Expression::Subscript { .. } => Ok(expression),
            Expression::Tuple(items) => Ok(Expression::Tuple(
                items
                    .into_iter()
                    .map(|item| self.into_target(item))
                    .collect::<ParseResult<Vec<_>>>()?,
            )),
            Expression::List(items) => Ok(Expression::List(
                items
                    .into_iter()
                    .map(|item| self.into_target(item))
                    .collect::<ParseResult<Vec<_>>>()?,
            )),
            Expression::Starred(inner) => {
                Ok(Expression::Starred(Box::new(self.into_target(*inner)?)))
            }
            _ => Err(self.error("cannot assign to expression")),
        }
    }

    fn check_target(&self, expression: &Expression) -> ParseResult<()> {
        match expression {
            Expression::Name { .. } | Expression::Attribute { .. } | Expression::Subscript { .. } => {
                Ok(())
            }
            _ => Err(self.error("illegal expression for augmented assignment")),
        }
    }
}
