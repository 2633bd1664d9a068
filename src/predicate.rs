//! Compiled predicates and the value tests they apply.

use std::{borrow::Borrow, fmt};

use futures::{Stream, StreamExt, future};
use rust_decimal::Decimal;

use crate::{
    ast::{CompareOp, Expr},
    mapping::FieldMapping,
    value::Value,
};

/// Literal operand after binding, already converted to the field's kind.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Operand {
    Integer(i64),
    Decimal(Decimal),
    Text(String),
    Bool(bool),
}

/// Test applied to each value a mapping reaches in a record.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ValueTest {
    Compare { op: CompareOp, operand: Operand },
    IsNull,
    IsNotNull,
    IsTrue,
    IsFalse,
}

impl ValueTest {
    pub(crate) fn eval(&self, value: &Value<'_>) -> bool {
        match self {
            ValueTest::IsNull => value.is_null(),
            ValueTest::IsNotNull => !value.is_null(),
            ValueTest::IsTrue => value.as_bool() == Some(true),
            ValueTest::IsFalse => value.as_bool() == Some(false),
            ValueTest::Compare { op, operand } => compare(*op, value, operand),
        }
    }
}

fn compare(op: CompareOp, value: &Value<'_>, operand: &Operand) -> bool {
    // Lifted comparison: null differs from every value and orders with none.
    if value.is_null() {
        return op == CompareOp::NotEqual;
    }

    let ordering = match (value, operand) {
        (Value::Integer(a), Operand::Integer(b)) => Some(a.cmp(b)),
        (_, Operand::Integer(b)) => value.as_decimal().map(|a| a.cmp(&Decimal::from(*b))),
        (_, Operand::Decimal(b)) => value.as_decimal().map(|a| a.cmp(b)),
        (Value::Text(a), Operand::Text(b)) => Some((*a).cmp(b.as_str())),
        (Value::Bool(a), Operand::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    };
    // None: runtime value of another kind than declared, not applicable.
    ordering.is_some_and(|ordering| op.eval_ordering(ordering))
}

/// One mapping of the queried field with the test bound to its type.
///
/// With `complement` set, the field matches records the mapping applies to
/// where no reached value passes `test` (`!Flag` over a collection).
pub(crate) struct BoundField<R> {
    pub(crate) mapping: FieldMapping<R>,
    pub(crate) test: ValueTest,
    pub(crate) complement: bool,
}

impl<R> Clone for BoundField<R> {
    fn clone(&self) -> Self {
        BoundField {
            mapping: self.mapping.clone(),
            test: self.test.clone(),
            complement: self.complement,
        }
    }
}

impl<R> BoundField<R> {
    fn matches(&self, record: &R) -> bool {
        let passed = self.mapping.probe(record, &|value| self.test.eval(value));
        if self.complement {
            !passed && self.mapping.applies(record)
        } else {
            passed
        }
    }
}

/// A compiled query: a pure, reusable test over records of type `R`.
///
/// A record matches when at least one mapping of the queried field applies to
/// it and passes the test. Mappings restricted to another record shape never
/// apply, so such records simply do not match.
///
/// Predicates hold no mutable state; they are cheap to clone, can be cached
/// by query text and evaluated from many threads at once.
pub struct Predicate<R> {
    expr: Expr,
    pub(crate) fields: Vec<BoundField<R>>,
}

impl<R> Clone for Predicate<R> {
    fn clone(&self) -> Self {
        Predicate {
            expr: self.expr.clone(),
            fields: self.fields.clone(),
        }
    }
}

impl<R> fmt::Debug for Predicate<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("expr", &self.expr)
            .field(
                "mappings",
                &self
                    .fields
                    .iter()
                    .map(|b| (&b.mapping, &b.test, b.complement))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<R> fmt::Display for Predicate<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)
    }
}

impl<R> Predicate<R> {
    pub(crate) fn new(expr: Expr, fields: Vec<BoundField<R>>) -> Self {
        Predicate { expr, fields }
    }

    /// The syntax tree this predicate was compiled from.
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Tests a single record.
    pub fn matches(&self, record: &R) -> bool {
        self.fields.iter().any(|bound| bound.matches(record))
    }

    /// Lazily keeps the records that match, in their original order.
    ///
    /// Accepts owned records or references to them.
    pub fn filter<I, T>(&self, records: I) -> impl Iterator<Item = T>
    where
        I: IntoIterator<Item = T>,
        T: Borrow<R>,
    {
        records
            .into_iter()
            .filter(move |record| self.matches(Borrow::<R>::borrow(record)))
    }

    /// Like [`filter`](Predicate::filter), but the iterator owns the predicate.
    pub fn into_filter<I, T>(self, records: I) -> impl Iterator<Item = T>
    where
        I: IntoIterator<Item = T>,
        T: Borrow<R>,
    {
        records
            .into_iter()
            .filter(move |record| self.matches(Borrow::<R>::borrow(record)))
    }

    /// Keeps the matching items of an asynchronous stream, in stream order.
    pub fn into_stream_filter<S, T>(self, records: S) -> impl Stream<Item = T>
    where
        S: Stream<Item = T>,
        T: Borrow<R>,
    {
        records.filter(move |record| future::ready(self.matches(Borrow::<R>::borrow(record))))
    }
}
