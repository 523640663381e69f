// src/tests/fieldselect_tests.rs

//! tests for `fieldselect.rs`

use crate::common::FieldIndexes;
use crate::data::fieldselect::{
    apply_indexes,
    resolve,
    FieldParseError,
    FieldRange,
    FieldSelection,
};

use ::rand::seq::SliceRandom; // brings in `shuffle`
use ::si_trace_print::stack::stack_offset_set;
use ::test_case::test_case;

#[test_case("1", 5, &[1])]
#[test_case("3,1,1-2", 5, &[1, 2, 3])]
#[test_case("2-4", 5, &[2, 3, 4])]
#[test_case("-2", 5, &[1, 2])]
#[test_case("4-", 5, &[4, 5])]
#[test_case("4-", 3, &[]; "from beyond field count")]
#[test_case("10-", 5, &[])]
#[test_case("1, 3", 5, &[1, 3]; "whitespace around token")]
#[test_case("2,2,2", 5, &[2])]
#[test_case("1-3,2-5", 5, &[1, 2, 3, 4, 5])]
#[test_case("7", 5, &[7]; "index beyond field count")]
fn test_resolve(
    expression: &str,
    field_count: usize,
    expect: &[usize],
) {
    stack_offset_set(Some(2));
    let indexes: FieldIndexes = resolve(expression, field_count).unwrap();
    assert_eq!(indexes.as_slice(), expect, "resolve({:?}, {})", expression, field_count);
}

#[test_case("", FieldParseError::Empty)]
#[test_case("  ", FieldParseError::Empty)]
#[test_case("2-1", FieldParseError::RangeOrder(2, 1))]
#[test_case("0", FieldParseError::ZeroIndex(String::from("0")))]
#[test_case("0-3", FieldParseError::ZeroIndex(String::from("0-3")))]
#[test_case("a", FieldParseError::BadToken(String::from("a")))]
#[test_case("-", FieldParseError::BadToken(String::from("-")))]
#[test_case("1,,2", FieldParseError::BadToken(String::from("")))]
#[test_case("1-2-3", FieldParseError::BadToken(String::from("1-2-3")))]
#[test_case("99999999999999999999999", FieldParseError::BadToken(String::from("99999999999999999999999")))]
fn test_resolve_err(
    expression: &str,
    expect: FieldParseError,
) {
    stack_offset_set(Some(2));
    assert_eq!(resolve(expression, 5), Err(expect));
}

#[test]
fn test_fieldselection_ranges() {
    let fs = FieldSelection::new("1,-2,3-,4-5").unwrap();
    assert_eq!(
        fs.ranges(),
        &[
            FieldRange::Index(1),
            FieldRange::To(2),
            FieldRange::From(3),
            FieldRange::Between(4, 5),
        ]
    );
}

#[test]
fn test_resolve_token_order_is_irrelevant() {
    let mut tokens: Vec<&str> = vec!["1", "3-4", "7-", "-2", "9", "5"];
    let expect: FieldIndexes = resolve(tokens.join(",").as_str(), 10).unwrap();
    assert_eq!(expect, vec![1, 2, 3, 4, 5, 7, 8, 9, 10]);
    let mut rng = ::rand::rng();
    for _ in 0..20 {
        tokens.shuffle(&mut rng);
        let expression = tokens.join(",");
        assert_eq!(resolve(expression.as_str(), 10).unwrap(), expect, "expression {:?}", expression);
    }
}

#[test_case("2", &["A", "100", "x"], Some("100"))]
#[test_case("1-2", &["A", "100", "x"], Some("A 100"))]
#[test_case("3,1", &["A", "100", "x"], Some("A x"))]
#[test_case("2,7", &["A", "100", "x"], Some("100"); "partly out of range")]
#[test_case("7", &["A", "100", "x"], None; "entirely out of range")]
#[test_case("2-", &["A", "100", "x"], Some("100 x"))]
#[test_case("1", &[], None; "no fields")]
fn test_fieldselection_apply(
    expression: &str,
    fields: &[&str],
    expect: Option<&str>,
) {
    let fs = FieldSelection::new(expression).unwrap();
    assert_eq!(fs.apply(fields).as_deref(), expect);
}

#[test_case("7", 5, &[]; "index beyond field count")]
#[test_case("-9", 3, &[1, 2, 3])]
#[test_case("2-9", 3, &[2, 3])]
#[test_case("4-9", 3, &[]; "between beyond field count")]
#[test_case("3,1,1-2", 5, &[1, 2, 3])]
#[test_case("2-200000000", 2, &[2]; "wide range")]
#[test_case("-200000000,1", 0, &[]; "wide range no fields")]
fn test_resolve_bounded(
    expression: &str,
    field_count: usize,
    expect: &[usize],
) {
    let fs = FieldSelection::new(expression).unwrap();
    assert_eq!(fs.resolve_bounded(field_count).as_slice(), expect);
}

#[test]
fn test_fieldselection_apply_wide_range_each_record() {
    let fs = FieldSelection::new("2-200000000").unwrap();
    for _ in 0..3 {
        assert_eq!(fs.apply(&["A", "100"]).as_deref(), Some("100"));
    }
    let fs = FieldSelection::new("-4000000000").unwrap();
    assert_eq!(fs.apply(&["A", "100", "x"]).as_deref(), Some("A 100 x"));
}

#[test]
fn test_apply_indexes() {
    let fields = ["Jan", "2", "03:04:05", "host"];
    assert_eq!(apply_indexes(&fields, &[1, 2, 3]), Some(String::from("Jan 2 03:04:05")));
    assert_eq!(apply_indexes(&fields, &[4, 5, 6]), Some(String::from("host")));
    assert_eq!(apply_indexes(&fields, &[5, 6]), None);
    assert_eq!(apply_indexes(&fields, &[]), None);
}
