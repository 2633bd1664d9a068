//! Binds a parsed query to a registry and compiles it into a [`Predicate`].
//!
//! Binding resolves the field name and checks the literal against the
//! declared type of every mapping registered under it:
//!
//! | literal | integer field | decimal field | text field | boolean field |
//! |---|---|---|---|---|
//! | integer | all operators | all, widened to decimal | - | - |
//! | decimal | all, field widened | all operators | - | - |
//! | text | - | - | `=` `!=` | - |
//! | `true`/`false` | - | - | - | `=` `!=` |
//! | `null` | `=` `!=` if nullable | `=` `!=` if nullable | `=` `!=` | `=` `!=` if nullable |
//!
//! Bare field names and `!field` require boolean fields. On a collection,
//! `field` holds when some element is `true` and `!field` when none is.

use rust_decimal::Decimal;

use crate::{
    ast::{CompareOp, Expr, Literal},
    error::{QueryError, Result},
    predicate::{BoundField, Operand, Predicate, ValueTest},
    registry::MappingRegistry,
    value::{FieldType, ScalarType},
};

/// Compiles `expr` against `registry`.
///
/// Fails with [`QueryError::UnknownField`] when the field is not registered and
/// [`QueryError::TypeMismatch`] when the query cannot apply to its type.
pub fn compile<R>(expr: &Expr, registry: &MappingRegistry<R>) -> Result<Predicate<R>> {
    let name = expr.field();
    let mappings = registry
        .resolve(name)
        .ok_or_else(|| QueryError::UnknownField {
            name: name.to_string(),
        })?;

    let fields = mappings
        .iter()
        .map(|mapping| {
            let test = bind_test(name, mapping.field_type(), expr)?;
            // `!Tags` over a collection: no element is true.
            let complement = mapping.is_collection() && matches!(expr, Expr::Negation { .. });
            Ok(BoundField {
                mapping: mapping.clone(),
                test: if complement { ValueTest::IsTrue } else { test },
                complement,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(query = %expr, field = name, mappings = fields.len(), "query compiled");
    Ok(Predicate::new(expr.clone(), fields))
}

fn bind_test(field: &str, field_type: FieldType, expr: &Expr) -> Result<ValueTest> {
    match expr {
        Expr::ImplicitBooleanTest { .. } => {
            require_boolean(field, field_type)?;
            Ok(ValueTest::IsTrue)
        }
        Expr::Negation { .. } => {
            require_boolean(field, field_type)?;
            Ok(ValueTest::IsFalse)
        }
        Expr::Comparison { op, literal, .. } => bind_comparison(field, field_type, *op, literal),
    }
}

fn require_boolean(field: &str, field_type: FieldType) -> Result<()> {
    if field_type.scalar == ScalarType::Bool {
        Ok(())
    } else {
        Err(QueryError::mismatch(
            field,
            format!("expected a boolean field, found {}", field_type),
        ))
    }
}

fn bind_comparison(
    field: &str,
    field_type: FieldType,
    op: CompareOp,
    literal: &Literal,
) -> Result<ValueTest> {
    let incompatible = || {
        QueryError::mismatch(
            field,
            format!(
                "cannot compare {} field with {} literal using '{}'",
                field_type,
                literal.kind_name(),
                op
            ),
        )
    };

    let operand = match (literal, field_type.scalar) {
        (Literal::Null, _) => {
            if !op.is_equality() {
                return Err(incompatible());
            }
            if !field_type.admits_null() {
                return Err(QueryError::mismatch(
                    field,
                    format!("{} field cannot be null", field_type),
                ));
            }
            return Ok(match op {
                CompareOp::Equal => ValueTest::IsNull,
                _ => ValueTest::IsNotNull,
            });
        }
        (Literal::Integer(n), ScalarType::Integer) => Operand::Integer(*n),
        (Literal::Integer(n), ScalarType::Decimal) => Operand::Decimal(Decimal::from(*n)),
        (Literal::Decimal(d), ScalarType::Integer | ScalarType::Decimal) => Operand::Decimal(*d),
        (Literal::Text(s), ScalarType::Text) if op.is_equality() => Operand::Text(s.clone()),
        (Literal::Bool(b), ScalarType::Bool) if op.is_equality() => Operand::Bool(*b),
        _ => return Err(incompatible()),
    };

    Ok(ValueTest::Compare { op, operand })
}
