//! Literal validation and conversion.
//!
//! Numbers follow a strict grammar:
//!
//! ```text
//! Number := '-'? ('0' | [1-9][0-9]*) ('.' [0-9]+)?
//! ```
//!
//! No leading zeros on multi-digit integer parts, at most one `.`, at least one
//! digit after it, nothing trailing. Anything else fails with
//! [`QueryError::NumberFormat`] ("Invalid number format.").

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use crate::{
    ast::{Literal, Token, TokenKind},
    error::{QueryError, Result},
};

static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?(0|[1-9][0-9]*)(\.[0-9]+)?$").expect("number grammar is a valid regex")
});

/// Parses a numeric literal into [`Literal::Integer`] or [`Literal::Decimal`].
///
/// Integers that do not fit in `i64` are kept exactly as decimals. Literals
/// needing more precision than [`Decimal`] holds are rejected, never rounded.
///
/// # Examples
///
/// ```
/// use sieve_lang::literal::parse_number;
/// use sieve_lang::ast::Literal;
///
/// assert_eq!(parse_number("96").unwrap(), Literal::Integer(96));
/// assert!(matches!(parse_number("-128.5").unwrap(), Literal::Decimal(_)));
/// assert_eq!(parse_number("00.1").unwrap_err().to_string(), "Invalid number format.");
/// ```
pub fn parse_number(text: &str) -> Result<Literal> {
    if !NUMBER.is_match(text) {
        return Err(QueryError::NumberFormat);
    }

    if text.contains('.') {
        return parse_decimal(text).map(Literal::Decimal);
    }

    match text.parse::<i64>() {
        Ok(n) => Ok(Literal::Integer(n)),
        Err(_) => parse_decimal(text).map(Literal::Decimal),
    }
}

fn parse_decimal(text: &str) -> Result<Decimal> {
    Decimal::from_str_exact(text).map_err(|_| QueryError::NumberFormat)
}

/// Wraps the unquoted contents of a string literal. No escapes are processed.
pub fn parse_string(text: &str) -> Literal {
    Literal::Text(text.to_string())
}

pub fn parse_null(text: &str) -> Option<Literal> {
    (text == "null").then_some(Literal::Null)
}

pub fn parse_bool(text: &str) -> Option<Literal> {
    match text {
        "true" => Some(Literal::Bool(true)),
        "false" => Some(Literal::Bool(false)),
        _ => None,
    }
}

/// Converts a literal token into its value.
pub fn parse_literal(token: &Token) -> Result<Literal> {
    let literal = match token.kind {
        TokenKind::Number => return parse_number(&token.text),
        TokenKind::String => Some(parse_string(&token.text)),
        TokenKind::Null => parse_null(&token.text),
        TokenKind::Boolean => parse_bool(&token.text),
        _ => None,
    };

    literal.ok_or_else(|| {
        QueryError::syntax(
            format!("Expected a literal, got {}", token.describe()),
            token.position,
        )
    })
}
