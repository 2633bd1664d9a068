use rust_decimal::Decimal;
use sieve_lang::{FieldType, MappingBuilder, MappingRegistry, QueryError, QueryProvider, Shape, Value};

#[derive(Debug)]
struct Tag {
    name: String,
}

#[derive(Debug)]
struct Company {
    name: String,
}

#[derive(Debug)]
struct Invoice {
    company: Company,
    paid: bool,
    amount: Decimal,
    comment: Option<String>,
    cancelled: Option<bool>,
    discount: Option<i32>,
}

#[derive(Debug)]
enum Body {
    Invoice(Invoice),
    Note { text: String },
}

#[derive(Debug)]
struct Document {
    id: i32,
    tags: Vec<Tag>,
    body: Body,
}

fn tags(names: &[&str]) -> Vec<Tag> {
    names
        .iter()
        .map(|name| Tag {
            name: name.to_string(),
        })
        .collect()
}

fn invoice(id: i32, company: &str, paid: bool, amount: i64, tag_names: &[&str]) -> Document {
    Document {
        id,
        tags: tags(tag_names),
        body: Body::Invoice(Invoice {
            company: Company {
                name: company.to_string(),
            },
            paid,
            amount: Decimal::from(amount),
            comment: None,
            cancelled: None,
            discount: None,
        }),
    }
}

fn note(id: i32, text: &str, tag_names: &[&str]) -> Document {
    Document {
        id,
        tags: tags(tag_names),
        body: Body::Note {
            text: text.to_string(),
        },
    }
}

fn seed() -> Vec<Document> {
    vec![
        invoice(1, "Acme", true, 100, &["urgent", "q1"]),
        note(2, "call back", &["urgent"]),
        invoice(3, "Initech", false, 250, &[]),
        note(4, "lunch", &[]),
        invoice(5, "Acme", false, 75, &["q2"]),
    ]
}

fn as_invoice(doc: &Document) -> Option<&Invoice> {
    match &doc.body {
        Body::Invoice(invoice) => Some(invoice),
        Body::Note { .. } => None,
    }
}

fn configure() -> MappingRegistry<Document> {
    MappingBuilder::new()
        .map("Id", |d: &Document| &d.id)
        .map_collection("Tag", |d: &Document| &d.tags, |t: &Tag| &t.name)
        .map_subtype(as_invoice, |invoice| {
            invoice
                .map("Company", |i: &Invoice| &i.company.name)
                .map("Paid", |i: &Invoice| &i.paid)
                .map("Amount", |i: &Invoice| &i.amount)
                .map("Comment", |i: &Invoice| &i.comment)
                .map("Cancelled", |i: &Invoice| &i.cancelled)
                .map("Discount", |i: &Invoice| &i.discount)
        })
        .freeze()
}

fn ids(query: &str) -> Vec<i32> {
    let registry = configure();
    let docs = seed();
    QueryProvider::new(&registry)
        .query(query, &docs)
        .unwrap()
        .map(|doc| doc.id)
        .collect()
}

// ============================================================================
// Root fields
// ============================================================================

#[test]
fn test_root_field_applies_to_every_document() {
    assert_eq!(ids("Id > 1"), vec![2, 3, 4, 5]);
    assert_eq!(ids("id = 4"), vec![4]);
}

// ============================================================================
// Collections
// ============================================================================

#[test]
fn test_collection_matches_any_element() {
    assert_eq!(ids("Tag = 'urgent'"), vec![1, 2]);
    assert_eq!(ids("Tag = 'q2'"), vec![5]);
}

#[test]
fn test_collection_without_elements_never_matches() {
    // != is still existential: some tag must differ
    assert_eq!(ids("Tag != 'urgent'"), vec![1, 5]);
    assert_eq!(ids("Tag = 'missing'"), Vec::<i32>::new());
}

// ============================================================================
// Subtypes
// ============================================================================

#[test]
fn test_subtype_field_filters_out_other_shapes() {
    assert_eq!(ids("Paid"), vec![1]);
    assert_eq!(ids("!Paid"), vec![3, 5]);
    assert_eq!(ids("Amount >= 100"), vec![1, 3]);
}

#[test]
fn test_nested_path() {
    assert_eq!(ids("Company = 'Acme'"), vec![1, 5]);
    assert_eq!(ids("Company != 'Acme'"), vec![3]);
}

#[test]
fn test_null_tests_only_see_the_subtype() {
    assert_eq!(ids("Comment = null"), vec![1, 3, 5]);
    assert_eq!(ids("Discount = null"), vec![1, 3, 5]);
}

#[test]
fn test_subtype_mapping_metadata() {
    let registry = configure();
    let mapping = &registry.resolve("company").unwrap()[0];
    assert_eq!(mapping.shape(), Some(Shape::of::<Invoice>()));
    assert_eq!(mapping.field_type(), FieldType::text());

    let tag = &registry.resolve("TAG").unwrap()[0];
    assert!(tag.is_collection());
    assert_eq!(tag.shape(), None);

    assert_eq!(
        registry.field_names(),
        vec!["Amount", "Cancelled", "Comment", "Company", "Discount", "Id", "Paid", "Tag"]
    );
}

// ============================================================================
// Same name, several shapes
// ============================================================================

#[test]
fn test_same_name_in_two_shapes_matches_either() {
    let registry = MappingBuilder::<Document>::new()
        .map("Id", |d: &Document| &d.id)
        .map_subtype(as_invoice, |invoice| {
            invoice.map("Label", |i: &Invoice| &i.company.name)
        })
        .map_subtype(
            |d: &Document| match &d.body {
                Body::Note { text } => Some(text),
                Body::Invoice(_) => None,
            },
            |text| text.map("Label", |t: &String| t),
        )
        .freeze();

    assert_eq!(registry.resolve("Label").map(<[_]>::len), Some(2));

    let docs = seed();
    let labelled: Vec<i32> = QueryProvider::new(&registry)
        .query("Label = 'lunch'", &docs)
        .unwrap()
        .map(|d| d.id)
        .collect();
    assert_eq!(labelled, vec![4]);

    let acme: Vec<i32> = QueryProvider::new(&registry)
        .query("Label = 'Acme'", &docs)
        .unwrap()
        .map(|d| d.id)
        .collect();
    assert_eq!(acme, vec![1, 5]);
}

#[test]
fn test_type_mismatch_is_reported_for_subtype_fields() {
    let registry = configure();
    let err = QueryProvider::new(&registry).compile("Company > 'A'").unwrap_err();
    assert!(matches!(err, QueryError::TypeMismatch { ref field, .. } if field == "Company"));
}

// ============================================================================
// Computed values
// ============================================================================

#[test]
fn test_computed_subtype_value() {
    let registry = MappingBuilder::<Document>::new()
        .map("Id", |d: &Document| &d.id)
        .map_subtype(as_invoice, |invoice| {
            invoice.map_value("Open", FieldType::boolean(), |i: &Invoice| {
                Value::Bool(!i.paid && i.cancelled != Some(true))
            })
        })
        .freeze();

    let docs = seed();
    let open: Vec<i32> = QueryProvider::new(&registry)
        .query("Open", &docs)
        .unwrap()
        .map(|d| d.id)
        .collect();
    assert_eq!(open, vec![3, 5]);
}

// ============================================================================
// Boolean collections
// ============================================================================

#[derive(Debug)]
enum Entry {
    Checklist { id: i32, flags: Vec<bool> },
    Blank { id: i32 },
}

impl Entry {
    fn id(&self) -> &i32 {
        match self {
            Entry::Checklist { id, .. } | Entry::Blank { id } => id,
        }
    }
}

fn entries() -> Vec<Entry> {
    vec![
        Entry::Checklist {
            id: 1,
            flags: vec![true, false],
        },
        Entry::Checklist {
            id: 2,
            flags: vec![false],
        },
        Entry::Checklist {
            id: 3,
            flags: Vec::new(),
        },
        Entry::Blank { id: 4 },
    ]
}

fn entry_ids(registry: &MappingRegistry<Entry>, query: &str) -> Vec<i32> {
    let entries = entries();
    QueryProvider::new(registry)
        .query(query, &entries)
        .unwrap()
        .map(|e| *e.id())
        .collect()
}

#[test]
fn test_negated_boolean_collection_is_the_complement() {
    let registry = MappingBuilder::new()
        .map("Id", Entry::id)
        .map_collection(
            "Flag",
            |e: &Entry| match e {
                Entry::Checklist { flags, .. } => flags.as_slice(),
                Entry::Blank { .. } => &[][..],
            },
            |f: &bool| f,
        )
        .freeze();

    assert_eq!(entry_ids(&registry, "Flag"), vec![1]);
    assert_eq!(entry_ids(&registry, "!Flag"), vec![2, 3, 4]);
}

#[test]
fn test_negated_gated_collection_skips_other_shapes() {
    let registry = MappingBuilder::new()
        .map("Id", Entry::id)
        .map_subtype(
            |e: &Entry| match e {
                Entry::Checklist { flags, .. } => Some(flags),
                Entry::Blank { .. } => None,
            },
            |flags| flags.map_collection("Flag", |f: &Vec<bool>| f, |f: &bool| f),
        )
        .freeze();

    assert_eq!(entry_ids(&registry, "Flag"), vec![1]);
    assert_eq!(entry_ids(&registry, "!Flag"), vec![2, 3]);
}

#[test]
fn test_computed_collection_values() {
    let registry = configure_with_tag_initials();
    let docs = seed();
    let matched: Vec<i32> = QueryProvider::new(&registry)
        .query("Initial = 'u'", &docs)
        .unwrap()
        .map(|d| d.id)
        .collect();
    assert_eq!(matched, vec![1, 2]);
}

fn configure_with_tag_initials() -> MappingRegistry<Document> {
    MappingBuilder::new()
        .map("Id", |d: &Document| &d.id)
        .map_value_collection(
            "Initial",
            FieldType::text(),
            |d: &Document| &d.tags,
            |t: &Tag| Value::Text(&t.name[..1]),
        )
        .freeze()
}
