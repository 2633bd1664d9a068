use std::fmt;

use rust_decimal::Decimal;

use crate::ast::CompareOp;

/// Literal value on the right side of a comparison.
///
/// Decimals are kept as exact [`Decimal`] values, never binary floats, so
/// `Amount = 48.5` compares exactly against decimal fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// Number without a decimal point
    ///
    /// # Example
    /// ```text
    /// 96
    /// ```
    Integer(i64),

    /// Number with a decimal point (or an integer too large for `i64`)
    ///
    /// # Example
    /// ```text
    /// -128.5
    /// ```
    Decimal(Decimal),

    /// Single-quoted text
    Text(String),

    /// `true` / `false`
    Bool(bool),

    /// `null`
    Null,
}

impl Literal {
    /// Human-readable kind, used in type mismatch messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Literal::Integer(_) => "integer",
            Literal::Decimal(_) => "decimal",
            Literal::Text(_) => "text",
            Literal::Bool(_) => "boolean",
            Literal::Null => "null",
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Integer(n) => write!(f, "{}", n),
            Literal::Decimal(d) => write!(f, "{}", d),
            Literal::Text(s) => write!(f, "'{}'", s),
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Null => f.write_str("null"),
        }
    }
}

/// Abstract Syntax Tree node for a query.
///
/// The grammar is flat: every query is exactly one of these terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Field compared against a literal
    ///
    /// # Examples
    /// ```text
    /// ID = 1
    /// Comment != null
    /// ```
    Comparison {
        field: String,
        op: CompareOp,
        literal: Literal,
    },

    /// Bare boolean field, true when the field is `true`
    ///
    /// # Example
    /// ```text
    /// Paid
    /// ```
    ImplicitBooleanTest { field: String },

    /// Negated boolean field, true when the field is `false`
    ///
    /// # Example
    /// ```text
    /// !Paid
    /// ```
    Negation { field: String },
}

impl Expr {
    /// The field name this term refers to, as written in the query.
    pub fn field(&self) -> &str {
        match self {
            Expr::Comparison { field, .. }
            | Expr::ImplicitBooleanTest { field }
            | Expr::Negation { field } => field,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Comparison { field, op, literal } => write!(f, "{} {} {}", field, op, literal),
            Expr::ImplicitBooleanTest { field } => f.write_str(field),
            Expr::Negation { field } => write!(f, "!{}", field),
        }
    }
}
