//! Mappings for records that are JSON documents.
//!
//! Fields are addressed with JSON pointers (RFC 6901). Missing members and
//! JSON `null` read as null; numbers read as integers when they fit in `i64`
//! and as exact decimals otherwise. Arrays and objects are not comparable
//! values, so a pointer landing on one never matches.
//!
//! ```
//! use serde_json::json;
//! use sieve_lang::{FieldType, MappingBuilder, QueryProvider, json::JsonMappings};
//!
//! let registry = MappingBuilder::<serde_json::Value>::new()
//!     .map_pointer("Id", FieldType::integer(), "/id")
//!     .map_pointer("Amount", FieldType::decimal(), "/amount")
//!     .map_pointer_collection("Tag", FieldType::text(), "/tags", "/name")
//!     .freeze();
//!
//! let docs = vec![
//!     json!({"id": 1, "amount": 12.5, "tags": [{"name": "draft"}]}),
//!     json!({"id": 2, "amount": 96, "tags": [{"name": "sent"}, {"name": "urgent"}]}),
//! ];
//!
//! let provider = QueryProvider::new(&registry);
//! let urgent: Vec<_> = provider.query("Tag = 'urgent'", &docs).unwrap().collect();
//! assert_eq!(urgent, vec![&docs[1]]);
//! ```

use rust_decimal::Decimal;
use serde_json::{Number, Value as JsonValue};

use crate::{
    mapping::{FieldMapping, MappingBuilder},
    value::{FieldType, Value},
};

/// Pointer-based mapping methods for builders over JSON records.
pub trait JsonMappings: Sized {
    /// Maps `name` to the value at `pointer` (`""` is the whole document).
    fn map_pointer(self, name: &str, field_type: FieldType, pointer: &str) -> Self;

    /// Maps `name` to the value at `element_pointer` inside each element of
    /// the array at `array_pointer`; the field matches when any element does.
    fn map_pointer_collection(
        self,
        name: &str,
        field_type: FieldType,
        array_pointer: &str,
        element_pointer: &str,
    ) -> Self;
}

impl JsonMappings for MappingBuilder<JsonValue> {
    fn map_pointer(self, name: &str, field_type: FieldType, pointer: &str) -> Self {
        let pointer = pointer.to_string();
        self.register(FieldMapping::from_probe(
            name,
            field_type,
            false,
            move |doc: &JsonValue, test: &dyn Fn(&Value<'_>) -> bool| {
                read(doc.pointer(&pointer)).is_some_and(|value| test(&value))
            },
        ))
    }

    fn map_pointer_collection(
        self,
        name: &str,
        field_type: FieldType,
        array_pointer: &str,
        element_pointer: &str,
    ) -> Self {
        let array_pointer = array_pointer.to_string();
        let element_pointer = element_pointer.to_string();
        self.register(FieldMapping::from_probe(
            name,
            field_type,
            true,
            move |doc: &JsonValue, test: &dyn Fn(&Value<'_>) -> bool| {
                doc.pointer(&array_pointer)
                    .and_then(JsonValue::as_array)
                    .is_some_and(|items| {
                        items.iter().any(|item| {
                            read(item.pointer(&element_pointer)).is_some_and(|value| test(&value))
                        })
                    })
            },
        ))
    }
}

/// Converts a JSON value into a comparable value, if it is a scalar.
fn read(value: Option<&JsonValue>) -> Option<Value<'_>> {
    match value {
        None | Some(JsonValue::Null) => Some(Value::Null),
        Some(JsonValue::Bool(b)) => Some(Value::Bool(*b)),
        Some(JsonValue::String(s)) => Some(Value::Text(s)),
        Some(JsonValue::Number(n)) => number(n),
        Some(JsonValue::Array(_) | JsonValue::Object(_)) => None,
    }
}

fn number(n: &Number) -> Option<Value<'static>> {
    if let Some(i) = n.as_i64() {
        return Some(Value::Integer(i));
    }
    let text = n.to_string();
    Decimal::from_str_exact(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
        .map(Value::Decimal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_scalars() {
        let doc = json!({"n": 3, "d": 48.5, "s": "Foo", "b": true, "z": null, "a": [1]});
        assert_eq!(read(doc.pointer("/n")), Some(Value::Integer(3)));
        assert_eq!(
            read(doc.pointer("/d")),
            Some(Value::Decimal(Decimal::new(485, 1)))
        );
        assert_eq!(read(doc.pointer("/s")), Some(Value::Text("Foo")));
        assert_eq!(read(doc.pointer("/b")), Some(Value::Bool(true)));
        assert_eq!(read(doc.pointer("/z")), Some(Value::Null));
        assert_eq!(read(doc.pointer("/missing")), Some(Value::Null));
        assert_eq!(read(doc.pointer("/a")), None);
    }

    #[test]
    fn large_unsigned_numbers_become_decimals() {
        let doc = json!({"big": u64::MAX});
        assert_eq!(
            read(doc.pointer("/big")),
            Some(Value::Decimal(Decimal::from(u64::MAX)))
        );
    }
}
