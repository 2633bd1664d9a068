//! Query orchestration: text → tokens → syntax tree → predicate → filtered source.
//!
//! Compilation finishes, successfully or not, before the source is touched.
//! Filtering is lazy and keeps the source's order; materializing the result
//! is up to the caller (and, for streams, to the stream's own executor).

use std::borrow::Borrow;

use futures::Stream;

use crate::{
    binder,
    error::Result,
    parser,
    predicate::Predicate,
    registry::MappingRegistry,
};

/// Compiles query text against a registry and applies it to record sources.
///
/// # Examples
///
/// ```
/// use sieve_lang::{MappingBuilder, QueryProvider};
///
/// struct Invoice { id: i32, paid: bool }
///
/// let registry = MappingBuilder::new()
///     .map("Id", |i: &Invoice| &i.id)
///     .map("Paid", |i: &Invoice| &i.paid)
///     .freeze();
/// let invoices = vec![
///     Invoice { id: 1, paid: true },
///     Invoice { id: 2, paid: false },
///     Invoice { id: 3, paid: true },
/// ];
///
/// let provider = QueryProvider::new(&registry);
/// let ids: Vec<i32> = provider
///     .query("Paid", &invoices)
///     .unwrap()
///     .map(|i| i.id)
///     .collect();
/// assert_eq!(ids, vec![1, 3]);
/// ```
pub struct QueryProvider<'r, R> {
    registry: &'r MappingRegistry<R>,
}

impl<R> Clone for QueryProvider<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for QueryProvider<'_, R> {}

impl<'r, R> QueryProvider<'r, R> {
    pub fn new(registry: &'r MappingRegistry<R>) -> Self {
        QueryProvider { registry }
    }

    pub fn registry(&self) -> &'r MappingRegistry<R> {
        self.registry
    }

    /// Lexes, parses and binds `text` into a reusable predicate.
    pub fn compile(&self, text: &str) -> Result<Predicate<R>> {
        parser::parse(text)
            .and_then(|expr| binder::compile(&expr, self.registry))
            .inspect_err(|e| tracing::debug!(query = text, error = %e, "query rejected"))
    }

    /// Filters an in-memory or otherwise iterable source.
    ///
    /// The returned iterator is lazy and yields matching records in source order.
    pub fn query<I, T>(
        self,
        text: &str,
        source: I,
    ) -> Result<impl Iterator<Item = T> + use<R, I, T>>
    where
        I: IntoIterator<Item = T>,
        T: Borrow<R>,
    {
        Ok(self.compile(text)?.into_filter(source))
    }

    /// Filters an asynchronous source.
    ///
    /// Compilation is still synchronous; the returned stream is driven by the
    /// caller's executor and honors whatever cancellation the source supports.
    pub fn query_stream<S, T>(
        self,
        text: &str,
        source: S,
    ) -> Result<impl Stream<Item = T> + use<R, S, T>>
    where
        S: Stream<Item = T>,
        T: Borrow<R>,
    {
        Ok(self.compile(text)?.into_stream_filter(source))
    }
}

/// One-call entrypoint: compiles `text` against `registry` and filters `source`.
///
/// # Examples
///
/// ```
/// use sieve_lang::{MappingBuilder, query};
///
/// struct Invoice { id: i32, discount: Option<i32> }
///
/// let registry = MappingBuilder::new()
///     .map("Id", |i: &Invoice| &i.id)
///     .map("Discount", |i: &Invoice| &i.discount)
///     .freeze();
/// let invoices = vec![
///     Invoice { id: 1, discount: Some(20) },
///     Invoice { id: 2, discount: None },
/// ];
///
/// let unset: Vec<i32> = query(&registry, "Discount = null", &invoices)
///     .unwrap()
///     .map(|i| i.id)
///     .collect();
/// assert_eq!(unset, vec![2]);
/// ```
pub fn query<R, I, T>(
    registry: &MappingRegistry<R>,
    text: &str,
    source: I,
) -> Result<impl Iterator<Item = T> + use<R, I, T>>
where
    I: IntoIterator<Item = T>,
    T: Borrow<R>,
{
    QueryProvider::new(registry).query(text, source)
}
