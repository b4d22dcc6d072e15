use std::fmt;

macro_rules! define_tokens {
    (
        symbols { $($sym_name:ident => $sym_str:literal),* $(,)? }
        keywords { $($kw_name:ident => $kw_str:literal),* $(,)? }
    ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum TokenType {
            // Special
            Illegal,
            Eof,

            // Layout
            Newline,
            Indent,
            Dedent,

            // Identifiers & Literals
            Ident,
            Number,
            String,

            // Symbols (operators & delimiters)
            $($sym_name,)*

            // Keywords (auto-generated from macro)
            $($kw_name,)*
        }

        impl fmt::Display for TokenType {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let s = match self {
                    TokenType::Illegal => "ILLEGAL",
                    TokenType::Eof => "EOF",
                    TokenType::Newline => "NEWLINE",
                    TokenType::Indent => "INDENT",
                    TokenType::Dedent => "DEDENT",
                    TokenType::Ident => "IDENT",
                    TokenType::Number => "NUMBER",
                    TokenType::String => "STRING",
                    $(TokenType::$sym_name => $sym_str,)*
                    $(TokenType::$kw_name => $kw_str,)*
                };
                write!(f, "{}", s)
            }
        }

        pub fn lookup_ident(ident: &str) -> TokenType {
            match ident {
                $($kw_str => TokenType::$kw_name,)*
                _ => TokenType::Ident,
            }
        }

        /// Returns `true` for reserved words of the snippet language.
        pub fn is_keyword(ident: &str) -> bool {
            matches!(ident, $($kw_str)|*)
        }

        /// Operator spellings, longest first, for maximal-munch scanning.
        pub(crate) const SYMBOLS: &[(&str, TokenType)] = &{
            let mut table = [$(($sym_str, TokenType::$sym_name)),*];
            // Insertion sort by descending length; const-friendly.
            let mut i = 1;
            while i < table.len() {
                let mut j = i;
                while j > 0 && table[j - 1].0.len() < table[j].0.len() {
                    let tmp = table[j - 1];
                    table[j - 1] = table[j];
                    table[j] = tmp;
                    j -= 1;
                }
                i += 1;
            }
            table
        };
    };
}

// ════════════════════════════════════════════════════════════════════════════
//  TOKEN DEFINITIONS
// ════════════════════════════════════════════════════════════════════════════

define_tokens! {
    symbols {
        // Arithmetic
        Plus        => "+",
        Minus       => "-",
        Asterisk    => "*",
        DoubleStar  => "**",
        Slash       => "/",
        DoubleSlash => "//",
        Percent     => "%",
        At          => "@",

        // Bitwise
        Bar         => "|",
        Amp         => "&",
        Caret       => "^",
        Tilde       => "~",
        ShiftLeft   => "<<",
        ShiftRight  => ">>",

        // Comparison
        Lt          => "<",
        Gt          => ">",
        Lte         => "<=",
        Gte         => ">=",
        Eq          => "==",
        NotEq       => "!=",

        // Assignment
        Assign      => "=",
        Walrus      => ":=",
        PlusAssign        => "+=",
        MinusAssign       => "-=",
        StarAssign        => "*=",
        SlashAssign       => "/=",
        DoubleSlashAssign => "//=",
        PercentAssign     => "%=",
        AtAssign          => "@=",
        AmpAssign         => "&=",
        BarAssign         => "|=",
        CaretAssign       => "^=",
        ShiftLeftAssign   => "<<=",
        ShiftRightAssign  => ">>=",
        PowerAssign       => "**=",

        // Delimiters
        LParen      => "(",
        RParen      => ")",
        LBracket    => "[",
        RBracket    => "]",
        LBrace      => "{",
        RBrace      => "}",
        Comma       => ",",
        Colon       => ":",
        Semicolon   => ";",
        Dot         => ".",
        Ellipsis    => "...",
        Arrow       => "->",
    }

    keywords {
        False    => "False",
        None     => "None",
        True     => "True",
        And      => "and",
        As       => "as",
        Assert   => "assert",
        Async    => "async",
        Await    => "await",
        Break    => "break",
        Class    => "class",
        Continue => "continue",
        Def      => "def",
        Del      => "del",
        Elif     => "elif",
        Else     => "else",
        Except   => "except",
        Finally  => "finally",
        For      => "for",
        From     => "from",
        Global   => "global",
        If       => "if",
        Import   => "import",
        In       => "in",
        Is       => "is",
        Lambda   => "lambda",
        Nonlocal => "nonlocal",
        Not      => "not",
        Or       => "or",
        Pass     => "pass",
        Raise    => "raise",
        Return   => "return",
        Try      => "try",
        While    => "while",
        With     => "with",
        Yield    => "yield",
    }
}

impl TokenType {
    pub fn is_augmented_assign(self) -> bool {
        matches!(
            self,
            TokenType::PlusAssign
                | TokenType::MinusAssign
                | TokenType::StarAssign
                | TokenType::SlashAssign
                | TokenType::DoubleSlashAssign
                | TokenType::PercentAssign
                | TokenType::AtAssign
                | TokenType::AmpAssign
                | TokenType::BarAssign
                | TokenType::CaretAssign
                | TokenType::ShiftLeftAssign
                | TokenType::ShiftRightAssign
                | TokenType::PowerAssign
        )
    }

    pub fn opens_bracket(self) -> bool {
        matches!(
            self,
            TokenType::LParen | TokenType::LBracket | TokenType::LBrace
        )
    }

    pub fn closes_bracket(self) -> bool {
        matches!(
            self,
            TokenType::RParen | TokenType::RBracket | TokenType::RBrace
        )
    }
}
