use crate::{
    ast::{Position, Token, TokenKind},
    error::{QueryError, Result},
};

/// Turns query text into tokens.
///
/// The lexer is a pure function of its input: it can be driven token by
/// token with [`Lexer::next_token`] or consumed as an iterator, which yields
/// every token up to and including [`TokenKind::Eof`] and then stops.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    finished: bool,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            finished: false,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn next_is(&self, expected: char) -> bool {
        self.input.get(self.position + 1) == Some(&expected)
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn here(&self) -> Position {
        Position::new(self.position)
    }

    /// Consumes characters while `accept` holds and returns them.
    fn eat_while(&mut self, accept: impl Fn(char) -> bool) -> String {
        let start = self.position;
        while self.current_char().is_some_and(&accept) {
            self.advance();
        }
        self.input[start..self.position].iter().collect()
    }

    fn read_identifier(&mut self) -> String {
        self.eat_while(|ch| ch.is_alphanumeric() || ch == '_')
    }

    fn read_string(&mut self) -> Result<String> {
        let start = self.here();
        self.advance(); // opening quote
        let contents = self.eat_while(|ch| ch != '\'');

        if self.current_char().is_none() {
            return Err(QueryError::syntax(
                "Unterminated string: missing closing quote",
                start,
            ));
        }
        self.advance(); // closing quote
        Ok(contents)
    }

    /// Reads a whole numeric run, including anything alphanumeric glued to it.
    ///
    /// Validation is left to [`crate::literal::parse_number`].
    fn read_number(&mut self) -> String {
        let sign = if self.current_char() == Some('-') {
            self.advance();
            "-"
        } else {
            ""
        };
        let run = self.eat_while(|ch| ch.is_alphanumeric() || ch == '.' || ch == '_');
        format!("{}{}", sign, run)
    }

    fn single(&mut self, kind: TokenKind, text: &str) -> Token {
        let position = self.here();
        for _ in text.chars() {
            self.advance();
        }
        Token::new(kind, text, position)
    }

    pub fn next_token(&mut self) -> Result<Token> {
        self.eat_while(char::is_whitespace);
        let start = self.here();

        let token = match self.current_char() {
            None => Token::new(TokenKind::Eof, "", start),
            Some('=') => self.single(TokenKind::Equal, "="),
            Some('!') => {
                if self.next_is('=') {
                    self.single(TokenKind::NotEqual, "!=")
                } else {
                    self.single(TokenKind::Exclamation, "!")
                }
            }
            Some('<') => {
                if self.next_is('=') {
                    self.single(TokenKind::LtEq, "<=")
                } else {
                    self.single(TokenKind::Lt, "<")
                }
            }
            Some('>') => {
                if self.next_is('=') {
                    self.single(TokenKind::GtEq, ">=")
                } else {
                    self.single(TokenKind::Gt, ">")
                }
            }
            Some('\'') => Token::new(TokenKind::String, self.read_string()?, start),
            Some(ch) if ch.is_alphabetic() || ch == '_' => {
                let ident = self.read_identifier();
                let kind = match ident.as_str() {
                    "null" => TokenKind::Null,
                    "true" | "false" => TokenKind::Boolean,
                    _ => TokenKind::Identifier,
                };
                Token::new(kind, ident, start)
            }
            Some(ch) if ch.is_ascii_digit() || ch == '-' => {
                Token::new(TokenKind::Number, self.read_number(), start)
            }
            Some(ch) => {
                return Err(QueryError::syntax(
                    format!("Unexpected character '{}'", ch),
                    start,
                ));
            }
        };

        tracing::trace!(kind = ?token.kind, text = %token.text, position = %token.position, "token");
        Ok(token)
    }
}

impl Iterator for Lexer {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let result = self.next_token();
        if !matches!(&result, Ok(token) if token.kind != TokenKind::Eof) {
            self.finished = true;
        }
        Some(result)
    }
}

/// Tokenizes `text` lazily.
pub fn tokenize(text: &str) -> Lexer {
    Lexer::new(text)
}
