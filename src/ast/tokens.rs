use std::fmt;

/// Character offset of a token within the query text (zero-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub offset: usize,
}

impl Position {
    pub fn new(offset: usize) -> Self {
        Position { offset }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.offset)
    }
}

/// The kind of a lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Identifiers
    /// Field name
    ///
    /// Letters, digits and underscores, starting with a letter or underscore.
    ///
    /// # Examples
    /// ```text
    /// Amount
    /// invoice_id
    /// ```
    Identifier,

    // Literals
    /// Numeric literal run, validated later by the literal parser
    ///
    /// The lexer takes the whole run (`-`, digits, `.`, trailing letters) so
    /// that malformed numbers such as `-0.1z` surface as number format errors.
    ///
    /// # Examples
    /// ```text
    /// 42
    /// -128.5
    /// ```
    Number,

    /// String literal enclosed in single quotes, contents kept verbatim
    ///
    /// # Examples
    /// ```text
    /// 'Foo'
    /// ```
    String,

    /// `true` or `false`
    Boolean,

    /// `null`
    Null,

    // Operators
    /// Equality (`=`)
    Equal,

    /// Inequality (`!=`)
    NotEqual,

    /// Less than (`<`)
    Lt,

    /// Less than or equal (`<=`)
    LtEq,

    /// Greater than (`>`)
    Gt,

    /// Greater than or equal (`>=`)
    GtEq,

    /// Negation prefix (`!`)
    ///
    /// # Examples
    /// ```text
    /// !Paid
    /// ```
    Exclamation,

    /// End of input
    Eof,
}

impl TokenKind {
    /// Returns `true` for tokens that may stand on the right side of a comparison.
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::Number | TokenKind::String | TokenKind::Boolean | TokenKind::Null
        )
    }
}

/// A lexical token with its source text and position.
///
/// For string literals `text` holds the unquoted contents; for every other
/// kind it is the slice of the query the token was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, position: Position) -> Self {
        Token {
            kind,
            text: text.into(),
            position,
        }
    }

    /// Short human-readable description used in syntax errors.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => "end of input".to_string(),
            _ => format!("'{}'", self.text),
        }
    }
}
