//! Field mappings and the builder that collects them.
//!
//! A mapping associates a query field name with a way to read a [`Value`]
//! out of a record of type `R`. Three forms exist:
//!
//! - **scalar** - one value per record (`map`, `map_value`)
//! - **collection** - many values per record; a test on the field holds when
//!   it holds for at least one element (`map_collection`,
//!   `map_value_collection`); `!Field` holds when no element is `true`
//! - **shape-gated** - only applies to records of one shape, selected by a
//!   narrowing function (`map_subtype`); other records never match
//!
//! ```
//! use sieve_lang::{FieldType, MappingBuilder, Value};
//!
//! struct Tag { name: String }
//! struct Invoice { paid: bool, amount: i64 }
//! enum Document {
//!     Invoice { id: i32, tags: Vec<Tag>, invoice: Invoice },
//!     Memo { id: i32, tags: Vec<Tag> },
//! }
//!
//! impl Document {
//!     fn id(&self) -> &i32 {
//!         match self {
//!             Document::Invoice { id, .. } | Document::Memo { id, .. } => id,
//!         }
//!     }
//!     fn tags(&self) -> &Vec<Tag> {
//!         match self {
//!             Document::Invoice { tags, .. } | Document::Memo { tags, .. } => tags,
//!         }
//!     }
//! }
//!
//! let registry = MappingBuilder::<Document>::new()
//!     .map("Id", Document::id)
//!     .map_collection("Tag", Document::tags, |tag: &Tag| &tag.name)
//!     .map_subtype(
//!         |doc: &Document| match doc {
//!             Document::Invoice { invoice, .. } => Some(invoice),
//!             _ => None,
//!         },
//!         |invoice| {
//!             invoice
//!                 .map("Paid", |i: &Invoice| &i.paid)
//!                 .map_value("Large", FieldType::boolean(), |i: &Invoice| Value::Bool(i.amount > 1000))
//!         },
//!     )
//!     .freeze();
//!
//! assert_eq!(registry.len(), 4);
//! ```

use std::{
    any::{TypeId, type_name},
    fmt,
    sync::Arc,
};

use crate::{
    registry::MappingRegistry,
    value::{Field, FieldType, Value},
};

/// Runs a value test against every value a mapping reaches in a record.
///
/// Returns `true` as soon as one value passes. A mapping that does not apply
/// to the record (wrong shape, empty collection) reaches no value.
type Probe<R> = dyn Fn(&R, &dyn Fn(&Value<'_>) -> bool) -> bool + Send + Sync;

type Narrow<R, S> = dyn Fn(&R) -> Option<&S> + Send + Sync;

/// Whether a shape-gated mapping applies to a record at all.
type Applies<R> = dyn Fn(&R) -> bool + Send + Sync;

/// The record shape a mapping is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    id: TypeId,
    name: &'static str,
}

impl Shape {
    pub fn of<S: ?Sized + 'static>() -> Self {
        Shape {
            id: TypeId::of::<S>(),
            name: type_name::<S>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// A single resolved way to read a field from a record of type `R`.
pub struct FieldMapping<R> {
    name: String,
    field_type: FieldType,
    shape: Option<Shape>,
    collection: bool,
    probe: Arc<Probe<R>>,
    applies: Option<Arc<Applies<R>>>,
}

impl<R> Clone for FieldMapping<R> {
    fn clone(&self) -> Self {
        FieldMapping {
            name: self.name.clone(),
            field_type: self.field_type,
            shape: self.shape,
            collection: self.collection,
            probe: Arc::clone(&self.probe),
            applies: self.applies.clone(),
        }
    }
}

impl<R> fmt::Debug for FieldMapping<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldMapping")
            .field("name", &self.name)
            .field("field_type", &self.field_type)
            .field("shape", &self.shape.map(|s| s.name))
            .field("collection", &self.collection)
            .finish()
    }
}

impl<R: 'static> FieldMapping<R> {
    /// Maps a field through a typed accessor; the type comes from `T`.
    pub fn scalar<T, F>(name: impl Into<String>, accessor: F) -> Self
    where
        T: Field + ?Sized + 'static,
        F: Fn(&R) -> &T + Send + Sync + 'static,
    {
        FieldMapping {
            name: name.into(),
            field_type: T::TYPE,
            shape: None,
            collection: false,
            probe: Arc::new(move |record: &R, test: &dyn Fn(&Value<'_>) -> bool| {
                test(&accessor(record).value())
            }),
            applies: None,
        }
    }

    /// Maps a field through an accessor producing a [`Value`] directly.
    pub fn computed<F>(name: impl Into<String>, field_type: FieldType, accessor: F) -> Self
    where
        F: for<'a> Fn(&'a R) -> Value<'a> + Send + Sync + 'static,
    {
        FieldMapping {
            name: name.into(),
            field_type,
            shape: None,
            collection: false,
            probe: Arc::new(move |record: &R, test: &dyn Fn(&Value<'_>) -> bool| {
                test(&accessor(record))
            }),
            applies: None,
        }
    }

    /// Maps a field to a value inside each element of a collection.
    pub fn collection<C, E, T, FC, FE>(name: impl Into<String>, items: FC, element: FE) -> Self
    where
        C: ?Sized + 'static,
        for<'a> &'a C: IntoIterator<Item = &'a E>,
        E: 'static,
        T: Field + ?Sized + 'static,
        FC: Fn(&R) -> &C + Send + Sync + 'static,
        FE: Fn(&E) -> &T + Send + Sync + 'static,
    {
        FieldMapping {
            name: name.into(),
            field_type: T::TYPE,
            shape: None,
            collection: true,
            probe: Arc::new(move |record: &R, test: &dyn Fn(&Value<'_>) -> bool| {
                items(record)
                    .into_iter()
                    .any(|item| test(&element(item).value()))
            }),
            applies: None,
        }
    }

    /// Maps a field to values computed from each element of a collection.
    pub fn computed_collection<C, E, FC, FE>(
        name: impl Into<String>,
        field_type: FieldType,
        items: FC,
        element: FE,
    ) -> Self
    where
        C: ?Sized + 'static,
        for<'a> &'a C: IntoIterator<Item = &'a E>,
        E: 'static,
        FC: Fn(&R) -> &C + Send + Sync + 'static,
        FE: for<'a> Fn(&'a E) -> Value<'a> + Send + Sync + 'static,
    {
        FieldMapping {
            name: name.into(),
            field_type,
            shape: None,
            collection: true,
            probe: Arc::new(move |record: &R, test: &dyn Fn(&Value<'_>) -> bool| {
                items(record).into_iter().any(|item| test(&element(item)))
            }),
            applies: None,
        }
    }

    /// Builds a mapping straight from a probe function.
    ///
    /// The probe applies the test to each value it reaches and reports whether
    /// any passed; reaching no value means the mapping does not apply.
    pub(crate) fn from_probe<P>(
        name: impl Into<String>,
        field_type: FieldType,
        collection: bool,
        probe: P,
    ) -> Self
    where
        P: Fn(&R, &dyn Fn(&Value<'_>) -> bool) -> bool + Send + Sync + 'static,
    {
        FieldMapping {
            name: name.into(),
            field_type,
            shape: None,
            collection,
            probe: Arc::new(probe),
            applies: None,
        }
    }

    /// Restricts a mapping over shape `R` to the records of `P` that narrow to it.
    fn gate<P: 'static>(self, narrow: Arc<Narrow<P, R>>) -> FieldMapping<P> {
        let inner = self.probe;
        let inner_applies = self.applies;
        let narrow_probe = Arc::clone(&narrow);
        FieldMapping {
            name: self.name,
            field_type: self.field_type,
            shape: Some(self.shape.unwrap_or_else(Shape::of::<R>)),
            collection: self.collection,
            probe: Arc::new(move |record: &P, test: &dyn Fn(&Value<'_>) -> bool| {
                narrow_probe(record).is_some_and(|shaped| inner(shaped, test))
            }),
            applies: Some(Arc::new(move |record: &P| {
                narrow(record)
                    .is_some_and(|shaped| inner_applies.as_ref().is_none_or(|a| a(shaped)))
            })),
        }
    }
}

impl<R> FieldMapping<R> {
    /// The field name as registered.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// The shape this mapping is restricted to, if any.
    pub fn shape(&self) -> Option<Shape> {
        self.shape
    }

    pub fn is_collection(&self) -> bool {
        self.collection
    }

    /// Registry key: names are matched case-insensitively.
    pub(crate) fn key(&self) -> String {
        self.name.to_lowercase()
    }

    /// Applies `test` to the values this mapping reaches in `record`.
    pub(crate) fn probe(&self, record: &R, test: &dyn Fn(&Value<'_>) -> bool) -> bool {
        (self.probe)(record, test)
    }

    /// Whether `record` has the shape this mapping reads from.
    ///
    /// Ungated mappings apply to every record, including ones whose
    /// collection is empty.
    pub(crate) fn applies(&self, record: &R) -> bool {
        self.applies.as_ref().is_none_or(|applies| applies(record))
    }
}

/// Accumulates field mappings for records of type `R`.
///
/// Registering the same name twice for the same shape keeps the last one.
/// [`freeze`](MappingBuilder::freeze) turns the builder into an immutable
/// [`MappingRegistry`].
pub struct MappingBuilder<R> {
    mappings: Vec<FieldMapping<R>>,
}

impl<R> Default for MappingBuilder<R> {
    fn default() -> Self {
        MappingBuilder {
            mappings: Vec::new(),
        }
    }
}

impl<R: 'static> MappingBuilder<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a prepared mapping, replacing any mapping of the same name and shape.
    pub fn register(mut self, mapping: FieldMapping<R>) -> Self {
        let key = mapping.key();
        self.mappings
            .retain(|m| !(m.key() == key && m.shape == mapping.shape));
        self.mappings.push(mapping);
        self
    }

    /// Maps `name` to a field reached by reference; nullability follows `Option`.
    pub fn map<T, F>(self, name: &str, accessor: F) -> Self
    where
        T: Field + ?Sized + 'static,
        F: Fn(&R) -> &T + Send + Sync + 'static,
    {
        self.register(FieldMapping::scalar(name, accessor))
    }

    /// Maps `name` to a computed value of a declared type.
    pub fn map_value<F>(self, name: &str, field_type: FieldType, accessor: F) -> Self
    where
        F: for<'a> Fn(&'a R) -> Value<'a> + Send + Sync + 'static,
    {
        self.register(FieldMapping::computed(name, field_type, accessor))
    }

    /// Maps `name` to a field of the elements of a collection.
    ///
    /// `Tag = 'urgent'` then matches records with at least one element whose
    /// field equals `'urgent'`.
    pub fn map_collection<C, E, T, FC, FE>(self, name: &str, items: FC, element: FE) -> Self
    where
        C: ?Sized + 'static,
        for<'a> &'a C: IntoIterator<Item = &'a E>,
        E: 'static,
        T: Field + ?Sized + 'static,
        FC: Fn(&R) -> &C + Send + Sync + 'static,
        FE: Fn(&E) -> &T + Send + Sync + 'static,
    {
        self.register(FieldMapping::collection(name, items, element))
    }

    /// Maps `name` to a value computed from each element of a collection.
    pub fn map_value_collection<C, E, FC, FE>(
        self,
        name: &str,
        field_type: FieldType,
        items: FC,
        element: FE,
    ) -> Self
    where
        C: ?Sized + 'static,
        for<'a> &'a C: IntoIterator<Item = &'a E>,
        E: 'static,
        FC: Fn(&R) -> &C + Send + Sync + 'static,
        FE: for<'a> Fn(&'a E) -> Value<'a> + Send + Sync + 'static,
    {
        self.register(FieldMapping::computed_collection(name, field_type, items, element))
    }

    /// Registers mappings that only apply to records narrowing to shape `S`.
    pub fn map_subtype<S, N, C>(self, narrow: N, configure: C) -> Self
    where
        S: 'static,
        N: Fn(&R) -> Option<&S> + Send + Sync + 'static,
        C: FnOnce(SubtypeMapper<R, S>) -> SubtypeMapper<R, S>,
    {
        let mapper = configure(SubtypeMapper {
            builder: self,
            narrow: Arc::new(narrow),
        });
        mapper.builder
    }

    /// Freezes the collected mappings into an immutable registry.
    pub fn freeze(self) -> MappingRegistry<R> {
        MappingRegistry::from_mappings(self.mappings)
    }
}

/// Collects mappings for records of shape `S` inside a root type `R`.
///
/// Obtained from [`MappingBuilder::map_subtype`].
pub struct SubtypeMapper<R, S> {
    builder: MappingBuilder<R>,
    narrow: Arc<Narrow<R, S>>,
}

impl<R: 'static, S: 'static> SubtypeMapper<R, S> {
    fn register(mut self, mapping: FieldMapping<S>) -> Self {
        let gated = mapping.gate(Arc::clone(&self.narrow));
        self.builder = self.builder.register(gated);
        self
    }

    pub fn map<T, F>(self, name: &str, accessor: F) -> Self
    where
        T: Field + ?Sized + 'static,
        F: Fn(&S) -> &T + Send + Sync + 'static,
    {
        self.register(FieldMapping::scalar(name, accessor))
    }

    pub fn map_value<F>(self, name: &str, field_type: FieldType, accessor: F) -> Self
    where
        F: for<'a> Fn(&'a S) -> Value<'a> + Send + Sync + 'static,
    {
        self.register(FieldMapping::computed(name, field_type, accessor))
    }

    pub fn map_collection<C, E, T, FC, FE>(self, name: &str, items: FC, element: FE) -> Self
    where
        C: ?Sized + 'static,
        for<'a> &'a C: IntoIterator<Item = &'a E>,
        E: 'static,
        T: Field + ?Sized + 'static,
        FC: Fn(&S) -> &C + Send + Sync + 'static,
        FE: Fn(&E) -> &T + Send + Sync + 'static,
    {
        self.register(FieldMapping::collection(name, items, element))
    }

    pub fn map_value_collection<C, E, FC, FE>(
        self,
        name: &str,
        field_type: FieldType,
        items: FC,
        element: FE,
    ) -> Self
    where
        C: ?Sized + 'static,
        for<'a> &'a C: IntoIterator<Item = &'a E>,
        E: 'static,
        FC: Fn(&S) -> &C + Send + Sync + 'static,
        FE: for<'a> Fn(&'a E) -> Value<'a> + Send + Sync + 'static,
    {
        self.register(FieldMapping::computed_collection(name, field_type, items, element))
    }
}
