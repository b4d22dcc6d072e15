use std::collections::BTreeSet;

use crate::syntax::{lexer::Lexer, token_type::TokenType};

/// Every identifier token in `text`, for fragments that do not parse.
///
/// String literals, comments, numbers and keywords are skipped. Unlike
/// [`crate::syntax::referenced_names`] this also returns assignment targets,
/// attribute names and keyword-argument names.
pub fn lexical_names(text: &str) -> BTreeSet<String> {
    Lexer::new(text)
        .tokenize()
        .into_iter()
        .filter(|token| token.token_type == TokenType::Ident)
        .map(|token| token.literal)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(text: &str) -> Vec<String> {
        lexical_names(text).into_iter().collect()
    }

    #[test]
    fn splits_on_non_word_characters() {
        assert_eq!(names("total = price*qty + tax"), ["price", "qty", "tax", "total"]);
    }

    #[test]
    fn over_approximates_attributes_and_keywords_args() {
        assert_eq!(names("obj.field(key=val"), ["field", "key", "obj", "val"]);
    }

    #[test]
    fn skips_strings_comments_numbers_and_keywords() {
        assert_eq!(
            names("if 'hidden' in seen and 3.5: # note here"),
            ["seen"]
        );
    }

    #[test]
    fn duplicates_collapse() {
        assert_eq!(names("a + a + a"), ["a"]);
    }
}
