//! # Sieve Query Language - Abstract Syntax Tree
//!
//! This module defines the tokens and the syntax tree of the sieve filter
//! language, a compact textual way to select records by their mapped fields.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer, with positions
//! - **[expressions]** - The query term ([`Expr`]) and its [`Literal`] operand
//! - **[operators]** - Comparison operators
//!
//! ## Grammar
//!
//! ```text
//! Query               := Negation | Comparison | ImplicitBooleanTest
//! Negation            := '!' Identifier
//! Comparison          := Identifier ComparisonOp Literal
//! ImplicitBooleanTest := Identifier
//! ```
//!
//! Every query is exactly one term; there is no `and` / `or`.
//!
//! ## Examples
//!
//! ```text
//! ID = 1
//! Amount >= 48.5
//! Comment = 'Foo'
//! Discount = null
//! Paid
//! !Paid
//! ```
pub mod expressions;
pub mod operators;
pub mod tokens;

pub use expressions::{Expr, Literal};
pub use operators::CompareOp;
pub use tokens::{Position, Token, TokenKind};
