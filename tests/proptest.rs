//! Property-based tests for query compilation and filtering using proptest.

use proptest::prelude::*;
use rust_decimal::Decimal;
use sieve_lang::ast::Literal;
use sieve_lang::literal::parse_number;
use sieve_lang::{MappingBuilder, MappingRegistry, QueryError, QueryProvider, parse};

// ============================================================================
// Test helpers
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
struct TestItem {
    id: i64,
    amount: Decimal,
    paid: bool,
    discount: Option<i32>,
}

fn registry() -> MappingRegistry<TestItem> {
    MappingBuilder::new()
        .map("Id", |i: &TestItem| &i.id)
        .map("Amount", |i: &TestItem| &i.amount)
        .map("Paid", |i: &TestItem| &i.paid)
        .map("Discount", |i: &TestItem| &i.discount)
        .freeze()
}

fn test_item_strategy() -> impl Strategy<Value = TestItem> {
    (
        -1000i64..1000,
        -100_000i64..100_000,
        any::<bool>(),
        prop::option::of(0i32..50),
    )
        .prop_map(|(id, cents, paid, discount)| TestItem {
            id,
            amount: Decimal::new(cents, 2),
            paid,
            discount,
        })
}

fn op_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["=", "!=", "<", "<=", ">", ">="])
}

fn filter(query: &str, items: &[TestItem]) -> Vec<TestItem> {
    let registry = registry();
    QueryProvider::new(&registry)
        .query(query, items)
        .unwrap()
        .cloned()
        .collect()
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// The same query over the same records always gives the same result.
    #[test]
    fn filtering_is_deterministic(
        items in prop::collection::vec(test_item_strategy(), 0..50),
        op in op_strategy(),
        threshold in -1000i64..1000,
    ) {
        let query = format!("Id {} {}", op, threshold);
        prop_assert_eq!(filter(&query, &items), filter(&query, &items));
    }

    /// Filtering the output again changes nothing.
    #[test]
    fn filtering_is_idempotent(
        items in prop::collection::vec(test_item_strategy(), 0..50),
        op in op_strategy(),
        threshold in -1000i64..1000,
    ) {
        let query = format!("Amount {} {}", op, threshold);
        let once = filter(&query, &items);
        let twice = filter(&query, &once);
        prop_assert_eq!(once, twice);
    }

    /// Results are a subsequence of the source, in source order.
    #[test]
    fn filtering_preserves_order(
        items in prop::collection::vec(test_item_strategy(), 0..50),
        threshold in -1000i64..1000,
    ) {
        let expected: Vec<TestItem> = items
            .iter()
            .filter(|i| i.id > threshold)
            .cloned()
            .collect();
        prop_assert_eq!(filter(&format!("Id > {}", threshold), &items), expected);
    }

    /// A field and its negation partition non-null booleans.
    #[test]
    fn boolean_and_negation_partition(
        items in prop::collection::vec(test_item_strategy(), 0..50),
    ) {
        let paid = filter("Paid", &items).len();
        let unpaid = filter("!Paid", &items).len();
        prop_assert_eq!(paid + unpaid, items.len());
    }

    /// `= null` and `!= null` partition a nullable field.
    #[test]
    fn null_tests_partition(
        items in prop::collection::vec(test_item_strategy(), 0..50),
    ) {
        let unset = filter("Discount = null", &items).len();
        let set = filter("Discount != null", &items).len();
        prop_assert_eq!(unset + set, items.len());
    }

    /// Decimal comparisons agree with exact decimal arithmetic.
    #[test]
    fn decimal_comparison_is_exact(
        items in prop::collection::vec(test_item_strategy(), 0..50),
        cents in -100_000i64..100_000,
    ) {
        let threshold = Decimal::new(cents, 2);
        let expected: Vec<TestItem> = items
            .iter()
            .filter(|i| i.amount <= threshold)
            .cloned()
            .collect();
        prop_assert_eq!(filter(&format!("Amount <= {}", threshold), &items), expected);
    }

    /// Every well-formed number is accepted.
    #[test]
    fn well_formed_numbers_parse(text in "-?(0|[1-9][0-9]{0,17})(\\.[0-9]{1,10})?") {
        let literal = parse_number(&text);
        prop_assert!(literal.is_ok(), "rejected {}", text);
        if text.contains('.') {
            prop_assert!(matches!(literal, Ok(Literal::Decimal(_))));
        } else {
            prop_assert!(matches!(literal, Ok(Literal::Integer(_))));
        }
    }

    /// Leading zeros are always rejected.
    #[test]
    fn leading_zeros_are_rejected(text in "-?0[0-9]{1,5}(\\.[0-9]{1,3})?") {
        prop_assert_eq!(parse_number(&text), Err(QueryError::NumberFormat));
    }

    /// Junk glued to a number makes the whole query fail with a number error.
    #[test]
    fn trailing_junk_is_rejected(
        number in "-?[1-9][0-9]{0,5}(\\.[0-9]{1,3})?",
        junk in "[a-z_.]{1,3}",
    ) {
        let query = format!("Amount = {}{}", number, junk);
        prop_assert_eq!(parse(&query), Err(QueryError::NumberFormat));
    }
}
