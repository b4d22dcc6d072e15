use crate::syntax::token_type::TokenType;

/// Binding strength of the left-associative binary operators, weakest first.
/// Boolean operators, comparisons, unary operators and `**` are handled by
/// dedicated parser levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    BitOr,   // |
    BitXor,  // ^
    BitAnd,  // &
    Shift,   // <<, >>
    Sum,     // +, -
    Product, // *, /, //, %, @
    Factor,  // unary +x, -x, ~x
}

impl Precedence {
    pub fn tighter(self) -> Precedence {
        match self {
            Precedence::BitOr => Precedence::BitXor,
            Precedence::BitXor => Precedence::BitAnd,
            Precedence::BitAnd => Precedence::Shift,
            Precedence::Shift => Precedence::Sum,
            Precedence::Sum => Precedence::Product,
            Precedence::Product | Precedence::Factor => Precedence::Factor,
        }
    }
}

// Single source of truth for binary operator precedence.
const INFIX_TABLE: &[(TokenType, Precedence)] = &[
    (TokenType::Bar, Precedence::BitOr),
    (TokenType::Caret, Precedence::BitXor),
    (TokenType::Amp, Precedence::BitAnd),
    (TokenType::ShiftLeft, Precedence::Shift),
    (TokenType::ShiftRight, Precedence::Shift),
    (TokenType::Plus, Precedence::Sum),
    (TokenType::Minus, Precedence::Sum),
    (TokenType::Asterisk, Precedence::Product),
    (TokenType::Slash, Precedence::Product),
    (TokenType::DoubleSlash, Precedence::Product),
    (TokenType::Percent, Precedence::Product),
    (TokenType::At, Precedence::Product),
];

pub fn infix_precedence(token_type: TokenType) -> Option<Precedence> {
    INFIX_TABLE
        .iter()
        .find(|(candidate, _)| *candidate == token_type)
        .map(|(_, precedence)| *precedence)
}

pub fn is_comparison(token_type: TokenType) -> bool {
    matches!(
        token_type,
        TokenType::Lt
            | TokenType::Gt
            | TokenType::Lte
            | TokenType::Gte
            | TokenType::Eq
            | TokenType::NotEq
            | TokenType::In
            | TokenType::Is
            | TokenType::Not
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_binds_tighter_than_sum() {
        let sum = infix_precedence(TokenType::Plus).unwrap();
        let product = infix_precedence(TokenType::Asterisk).unwrap();
        assert!(product > sum);
        assert_eq!(sum.tighter(), product);
    }

    #[test]
    fn comparisons_are_not_binary_table_entries() {
        assert_eq!(infix_precedence(TokenType::Lt), None);
        assert!(is_comparison(TokenType::Lt));
    }
}
