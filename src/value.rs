//! Runtime field values and declared field types.
//!
//! Accessors registered in a [`MappingBuilder`](crate::MappingBuilder) read a
//! [`Value`] out of a record. The [`Field`] trait lets plain struct fields be
//! mapped directly: the Rust type of the field decides its [`FieldType`].

use std::fmt;

use rust_decimal::Decimal;

/// Value of a field, borrowed from the record it was read from.
///
/// # Examples
///
/// ```
/// use sieve_lang::Value;
/// use rust_decimal::Decimal;
///
/// let comment: Option<&str> = Some("Foo");
/// assert_eq!(Value::from(comment), Value::Text("Foo"));
/// assert_eq!(Value::from(None::<i64>), Value::Null);
/// assert_eq!(Value::from(Decimal::new(485, 1)), Value::Decimal(Decimal::new(485, 1)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// Absent value of a nullable field
    Null,

    Bool(bool),

    /// Whole number
    Integer(i64),

    /// Exact decimal number
    Decimal(Decimal),

    /// Borrowed UTF-8 text
    Text(&'a str),
}

impl Value<'_> {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the numeric value widened to a decimal, if numeric.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Integer(n) => Some(Decimal::from(*n)),
            Value::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<bool> for Value<'_> {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value<'_> {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value<'_> {
    fn from(n: i32) -> Self {
        Value::Integer(n as i64)
    }
}

impl From<Decimal> for Value<'_> {
    fn from(d: Decimal) -> Self {
        Value::Decimal(d)
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::Text(s)
    }
}

impl<'a> From<&'a String> for Value<'a> {
    fn from(s: &'a String) -> Self {
        Value::Text(s)
    }
}

impl<'a, T: Into<Value<'a>>> From<Option<T>> for Value<'a> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// Scalar kind of a mapped field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Integer,
    Decimal,
    Text,
    Bool,
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScalarType::Integer => "integer",
            ScalarType::Decimal => "decimal",
            ScalarType::Text => "text",
            ScalarType::Bool => "boolean",
        })
    }
}

/// Declared type of a mapped field: its scalar kind and whether it may be null.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldType {
    pub scalar: ScalarType,
    pub nullable: bool,
}

impl FieldType {
    pub const fn new(scalar: ScalarType) -> Self {
        FieldType {
            scalar,
            nullable: false,
        }
    }

    pub const fn integer() -> Self {
        Self::new(ScalarType::Integer)
    }

    pub const fn decimal() -> Self {
        Self::new(ScalarType::Decimal)
    }

    pub const fn text() -> Self {
        Self::new(ScalarType::Text)
    }

    pub const fn boolean() -> Self {
        Self::new(ScalarType::Bool)
    }

    /// The same scalar kind, allowing null.
    pub const fn nullable(self) -> Self {
        FieldType {
            scalar: self.scalar,
            nullable: true,
        }
    }

    /// Whether `= null` / `!= null` can be asked of this field.
    ///
    /// Text fields are reference-typed and always admit the question.
    pub fn admits_null(self) -> bool {
        self.nullable || self.scalar == ScalarType::Text
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            write!(f, "nullable {}", self.scalar)
        } else {
            write!(f, "{}", self.scalar)
        }
    }
}

/// A Rust type that can be the target of a field mapping.
///
/// Implemented for the signed integers up to `i64`, the unsigned integers up
/// to `u32`, [`Decimal`], `bool`, `String`, `str`, and `Option` of any of the
/// sized ones (which makes the field nullable).
pub trait Field {
    /// Declared type of fields of this Rust type.
    const TYPE: FieldType;

    /// Reads the value for comparison.
    fn value(&self) -> Value<'_>;
}

macro_rules! integer_field {
    ($($ty:ty),*) => {
        $(
            impl Field for $ty {
                const TYPE: FieldType = FieldType::integer();

                fn value(&self) -> Value<'_> {
                    Value::Integer(i64::from(*self))
                }
            }
        )*
    };
}

integer_field!(i8, i16, i32, i64, u8, u16, u32);

impl Field for Decimal {
    const TYPE: FieldType = FieldType::decimal();

    fn value(&self) -> Value<'_> {
        Value::Decimal(*self)
    }
}

impl Field for bool {
    const TYPE: FieldType = FieldType::boolean();

    fn value(&self) -> Value<'_> {
        Value::Bool(*self)
    }
}

impl Field for str {
    const TYPE: FieldType = FieldType::text();

    fn value(&self) -> Value<'_> {
        Value::Text(self)
    }
}

impl Field for String {
    const TYPE: FieldType = FieldType::text();

    fn value(&self) -> Value<'_> {
        Value::Text(self)
    }
}

impl<T: Field> Field for Option<T> {
    const TYPE: FieldType = T::TYPE.nullable();

    fn value(&self) -> Value<'_> {
        match self {
            Some(inner) => inner.value(),
            None => Value::Null,
        }
    }
}
