//! # Sieve
//!
//! A compact filter language for collections of typed records.
//!
//! Fields are registered once in a [`MappingBuilder`] and frozen into a
//! [`MappingRegistry`]. Query text such as `ID = 1`, `!Paid` or
//! `Discount = null` is then lexed, parsed and bound against that registry
//! into a [`Predicate`], which filters any iterator or stream of records.
//!
//! ```
//! use rust_decimal::Decimal;
//! use sieve_lang::{MappingBuilder, QueryProvider};
//!
//! struct Invoice {
//!     id: i32,
//!     amount: Decimal,
//!     paid: bool,
//!     comment: Option<String>,
//! }
//!
//! let registry = MappingBuilder::new()
//!     .map("Id", |i: &Invoice| &i.id)
//!     .map("Amount", |i: &Invoice| &i.amount)
//!     .map("Paid", |i: &Invoice| &i.paid)
//!     .map("Comment", |i: &Invoice| &i.comment)
//!     .freeze();
//!
//! let invoices = vec![
//!     Invoice { id: 1, amount: Decimal::new(125, 1), paid: true, comment: None },
//!     Invoice { id: 2, amount: Decimal::new(96, 0), paid: false, comment: Some("Foo".into()) },
//! ];
//!
//! let provider = QueryProvider::new(&registry);
//! let ids = |text: &str| -> Vec<i32> {
//!     provider.query(text, &invoices).unwrap().map(|i| i.id).collect()
//! };
//!
//! assert_eq!(ids("ID = 1"), vec![1]);
//! assert_eq!(ids("Amount = 96"), vec![2]);
//! assert_eq!(ids("!Paid"), vec![2]);
//! assert_eq!(ids("Comment = 'Foo'"), vec![2]);
//! assert!(provider.compile("Amount = 00.1").is_err());
//! ```
pub mod ast;
pub mod binder;
pub mod error;
#[cfg(feature = "json")]
pub mod json;
pub mod lexer;
pub mod literal;
pub mod mapping;
pub mod parser;
pub mod predicate;
pub mod provider;
pub mod registry;
pub mod value;

pub use ast::{CompareOp, Expr, Literal, Position, Token, TokenKind};
pub use binder::compile;
pub use error::{QueryError, Result};
pub use lexer::{Lexer, tokenize};
pub use mapping::{FieldMapping, MappingBuilder, Shape, SubtypeMapper};
pub use parser::{Parser, parse};
pub use predicate::Predicate;
pub use provider::{QueryProvider, query};
pub use registry::MappingRegistry;
pub use value::{Field, FieldType, ScalarType, Value};
