use std::mem;

use crate::{
    ast::{CompareOp, Expr, Token, TokenKind},
    error::{QueryError, Result},
    lexer::Lexer,
    literal::parse_literal,
};

/// Builds the single-term syntax tree of a query.
pub struct Parser {
    lexer: Lexer,
    current_token: Token,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self> {
        let current_token = lexer.next_token()?;
        Ok(Parser {
            lexer,
            current_token,
        })
    }

    /// Replaces the current token with the next one and returns it.
    fn advance(&mut self) -> Result<Token> {
        let next = self.lexer.next_token()?;
        Ok(mem::replace(&mut self.current_token, next))
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current_token.kind == kind
    }

    fn unexpected(&self, expected: &str) -> QueryError {
        QueryError::syntax(
            format!(
                "Expected {}, got {}",
                expected,
                self.current_token.describe()
            ),
            self.current_token.position,
        )
    }

    fn expect_identifier(&mut self) -> Result<String> {
        if !self.check(TokenKind::Identifier) {
            return Err(self.unexpected("a field name"));
        }
        Ok(self.advance()?.text)
    }

    fn comparison_op(kind: TokenKind) -> Option<CompareOp> {
        match kind {
            TokenKind::Equal => Some(CompareOp::Equal),
            TokenKind::NotEqual => Some(CompareOp::NotEqual),
            TokenKind::Lt => Some(CompareOp::LessThan),
            TokenKind::LtEq => Some(CompareOp::LessEqual),
            TokenKind::Gt => Some(CompareOp::GreaterThan),
            TokenKind::GtEq => Some(CompareOp::GreaterEqual),
            _ => None,
        }
    }

    /// Negation := '!' Identifier
    fn parse_negation(&mut self) -> Result<Expr> {
        self.advance()?; // consume '!'
        let field = self.expect_identifier()?;
        Ok(Expr::Negation { field })
    }

    /// Comparison := Identifier ComparisonOp Literal
    /// ImplicitBooleanTest := Identifier
    fn parse_field_term(&mut self) -> Result<Expr> {
        let field = self.expect_identifier()?;

        let Some(op) = Self::comparison_op(self.current_token.kind) else {
            return Ok(Expr::ImplicitBooleanTest { field });
        };
        self.advance()?;

        if !self.current_token.kind.is_literal() {
            return Err(self.unexpected(&format!("a literal after '{}'", op)));
        }
        let literal = parse_literal(&self.current_token)?;
        self.advance()?;

        Ok(Expr::Comparison { field, op, literal })
    }

    /// Parses exactly one term followed by end of input.
    pub fn parse(&mut self) -> Result<Expr> {
        let expr = match self.current_token.kind {
            TokenKind::Exclamation => self.parse_negation()?,
            TokenKind::Identifier => self.parse_field_term()?,
            _ => return Err(self.unexpected("a field name or '!'")),
        };

        if !self.check(TokenKind::Eof) {
            return Err(self.unexpected("end of input"));
        }
        Ok(expr)
    }
}

/// Lexes and parses `text` into a syntax tree.
///
/// # Examples
///
/// ```
/// use sieve_lang::parser::parse;
/// use sieve_lang::ast::{CompareOp, Expr, Literal};
///
/// let expr = parse("ID = 1").unwrap();
/// assert_eq!(
///     expr,
///     Expr::Comparison {
///         field: "ID".to_string(),
///         op: CompareOp::Equal,
///         literal: Literal::Integer(1),
///     }
/// );
/// ```
pub fn parse(text: &str) -> Result<Expr> {
    Parser::new(Lexer::new(text))?.parse()
}
