//! The frozen, read-only set of field mappings queries are compiled against.

use std::{collections::HashMap, fmt};

use crate::mapping::FieldMapping;

/// Immutable field-name → mapping table for records of type `R`.
///
/// Produced by [`MappingBuilder::freeze`](crate::MappingBuilder::freeze) and
/// never mutated afterwards, so it can be shared freely between threads and
/// resolves a given name the same way for its whole lifetime. Lookup is
/// case-insensitive. A name may carry several mappings when it is registered
/// for different record shapes.
pub struct MappingRegistry<R> {
    fields: HashMap<String, Vec<FieldMapping<R>>>,
}

impl<R> Clone for MappingRegistry<R> {
    fn clone(&self) -> Self {
        MappingRegistry {
            fields: self.fields.clone(),
        }
    }
}

impl<R> fmt::Debug for MappingRegistry<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappingRegistry")
            .field("fields", &self.fields)
            .finish()
    }
}

impl<R> MappingRegistry<R> {
    pub(crate) fn from_mappings(mappings: Vec<FieldMapping<R>>) -> Self {
        let mut fields: HashMap<String, Vec<FieldMapping<R>>> = HashMap::new();
        for mapping in mappings {
            fields.entry(mapping.key()).or_default().push(mapping);
        }
        tracing::debug!(fields = fields.len(), "mapping registry frozen");
        MappingRegistry { fields }
    }

    /// Returns every mapping registered under `name`, ignoring case.
    pub fn resolve(&self, name: &str) -> Option<&[FieldMapping<R>]> {
        self.fields.get(&name.to_lowercase()).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(&name.to_lowercase())
    }

    /// Number of distinct field names.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Registered field names in their original spelling, sorted.
    pub fn field_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .fields
            .values()
            .filter_map(|mappings| mappings.first().map(FieldMapping::name))
            .collect();
        names.sort_unstable();
        names
    }
}
