use crate::syntax::{
    expression::{Expression, LiteralKind, NameContext, Pattern},
    token_type::TokenType,
};

use super::{ParseResult, Parser};

impl Parser {
    /// Pattern after `case`; a top-level comma list is a sequence pattern.
    pub(super) fn parse_case_pattern(&mut self) -> ParseResult<Pattern> {
        let first = self.parse_star_or_pattern()?;
        if !self.current_is(TokenType::Comma) {
            if matches!(first, Pattern::Star(_)) {
                return Err(self.error("star pattern outside a sequence"));
            }
            return Ok(first);
        }
        let mut items = vec![first];
        while self.eat(TokenType::Comma) {
            if self.current_is(TokenType::Colon) || self.current_is(TokenType::If) {
                break;
            }
            items.push(self.parse_star_or_pattern()?);
        }
        Ok(Pattern::Sequence(items))
    }

    fn parse_star_or_pattern(&mut self) -> ParseResult<Pattern> {
        if self.eat(TokenType::Asterisk) {
            let (name, _) = self.expect_ident()?;
            return Ok(Pattern::Star((name != "_").then_some(name)));
        }
        self.parse_pattern()
    }

    /// `or_pattern ['as' NAME]`
    fn parse_pattern(&mut self) -> ParseResult<Pattern> {
        let pattern = self.parse_or_pattern()?;
        if !self.eat(TokenType::As) {
            return Ok(pattern);
        }
        let (name, _) = self.expect_ident()?;
        if name == "_" {
            return Err(self.error("cannot use '_' as a target"));
        }
        Ok(Pattern::As {
            pattern: Box::new(pattern),
            name,
        })
    }

    fn parse_or_pattern(&mut self) -> ParseResult<Pattern> {
        let first = self.parse_closed_pattern()?;
        if !self.current_is(TokenType::Bar) {
            return Ok(first);
        }
        let mut alternatives = vec![first];
        while self.eat(TokenType::Bar) {
            alternatives.push(self.parse_closed_pattern()?);
        }
        Ok(Pattern::Or(alternatives))
    }

    fn parse_closed_pattern(&mut self) -> ParseResult<Pattern> {
        match self.current().token_type {
            TokenType::Ident => self.parse_name_pattern(),
            TokenType::LParen => self.nested(Self::parse_group_pattern),
            TokenType::LBracket => self.nested(Self::parse_list_pattern),
            TokenType::LBrace => self.nested(Self::parse_mapping_pattern),
            _ => Ok(Pattern::Value(self.parse_literal_pattern()?)),
        }
    }

    /// Capture, wildcard, dotted constant or class pattern.
    fn parse_name_pattern(&mut self) -> ParseResult<Pattern> {
        let (name, position) = self.expect_ident()?;
        if !self.current_is(TokenType::Dot) && !self.current_is(TokenType::LParen) {
            if name == "_" {
                return Ok(Pattern::Wildcard);
            }
            return Ok(Pattern::Capture(name));
        }
        let mut value = Expression::name(name, NameContext::Load, position);
        while self.eat(TokenType::Dot) {
            let (attribute, _) = self.expect_ident()?;
            value = Expression::Attribute {
                value: Box::new(value),
                attribute,
            };
        }
        if !self.current_is(TokenType::LParen) {
            return Ok(Pattern::Value(value));
        }
        self.nested(|parser| parser.parse_class_pattern(value))
    }

    fn parse_class_pattern(&mut self, class: Expression) -> ParseResult<Pattern> {
        self.expect(TokenType::LParen)?;
        let mut positional = Vec::new();
        let mut keywords = Vec::new();
        while !self.current_is(TokenType::RParen) {
            if self.current_is(TokenType::Ident) && self.peek_is(TokenType::Assign) {
                let (name, _) = self.expect_ident()?;
                self.next_token();
                keywords.push((name, self.parse_pattern()?));
            } else if !keywords.is_empty() {
                return Err(self.error("positional patterns follow keyword patterns"));
            } else {
                positional.push(self.parse_pattern()?);
            }
            if !self.eat(TokenType::Comma) {
                break;
            }
        }
        self.expect(TokenType::RParen)?;
        Ok(Pattern::Class {
            class,
            positional,
            keywords,
        })
    }

    /// `(p)` groups, `(p,)` and `(p, q)` are sequences.
    fn parse_group_pattern(&mut self) -> ParseResult<Pattern> {
        self.expect(TokenType::LParen)?;
        if self.eat(TokenType::RParen) {
            return Ok(Pattern::Sequence(Vec::new()));
        }
        let first = self.parse_star_or_pattern()?;
        if !matches!(first, Pattern::Star(_)) && self.eat(TokenType::RParen) {
            return Ok(first);
        }
        Ok(Pattern::Sequence(
            self.parse_pattern_items_after(first, TokenType::RParen)?,
        ))
    }

    fn parse_list_pattern(&mut self) -> ParseResult<Pattern> {
        self.expect(TokenType::LBracket)?;
        if self.eat(TokenType::RBracket) {
            return Ok(Pattern::Sequence(Vec::new()));
        }
        let first = self.parse_star_or_pattern()?;
        Ok(Pattern::Sequence(
            self.parse_pattern_items_after(first, TokenType::RBracket)?,
        ))
    }

    fn parse_pattern_items_after(
        &mut self,
        first: Pattern,
        closer: TokenType,
    ) -> ParseResult<Vec<Pattern>> {
        let mut items = vec![first];
        while self.eat(TokenType::Comma) {
            if self.current_is(closer) {
                break;
            }
            items.push(self.parse_star_or_pattern()?);
        }
        self.expect(closer)?;
        Ok(items)
    }

    fn parse_mapping_pattern(&mut self) -> ParseResult<Pattern> {
        self.expect(TokenType::LBrace)?;
        let mut entries = Vec::new();
        let mut rest = None;
        while !self.current_is(TokenType::RBrace) {
            if self.eat(TokenType::DoubleStar) {
                rest = Some(self.expect_ident()?.0);
                self.eat(TokenType::Comma);
                break;
            }
            let key = if self.current_is(TokenType::Ident) {
                match self.parse_name_pattern()? {
                    Pattern::Value(value) => value,
                    _ => {
                        return Err(
                            self.error("mapping pattern keys must be literals or dotted names")
                        );
                    }
                }
            } else {
                self.parse_literal_pattern()?
            };
            self.expect(TokenType::Colon)?;
            entries.push((key, self.parse_pattern()?));
            if !self.eat(TokenType::Comma) {
                break;
            }
        }
        self.expect(TokenType::RBrace)?;
        Ok(Pattern::Mapping { entries, rest })
    }

    /// Strings, `None` / `True` / `False`, and signed real or complex
    /// numbers such as `-1` and `3 + 4j`.
    fn parse_literal_pattern(&mut self) -> ParseResult<Expression> {
        match self.current().token_type {
            TokenType::String => self.parse_strings(),
            TokenType::None | TokenType::True | TokenType::False => self.parse_atom(),
            TokenType::Minus | TokenType::Number => {
                let mut value = self.parse_signed_number()?;
                if matches!(self.current().token_type, TokenType::Plus | TokenType::Minus)
                    && self.peek_is(TokenType::Number)
                {
                    let operator = self.current().literal.clone();
                    self.next_token();
                    let imaginary = self.parse_signed_number()?;
                    value = Expression::Binary {
                        left: Box::new(value),
                        operator,
                        right: Box::new(imaginary),
                    };
                }
                Ok(value)
            }
            _ => Err(self.unexpected("expected a pattern")),
        }
    }

    fn parse_signed_number(&mut self) -> ParseResult<Expression> {
        let negative = self.eat(TokenType::Minus);
        let token = self.expect(TokenType::Number)?;
        let number = Expression::Literal {
            kind: LiteralKind::Number,
            text: token.literal,
        };
        if !negative {
            return Ok(number);
        }
        Ok(Expression::Unary {
            operator: "-".to_string(),
            operand: Box::new(number),
        })
    }
}
