// src/tests/record_tests.rs

//! tests for `record.rs`

use crate::data::record::{Delimiter, Record};

use ::test_case::test_case;

#[test]
fn test_delimiter_new() {
    assert_eq!(Delimiter::new(""), None);
    assert_eq!(Delimiter::new(" "), Some(Delimiter::Whitespace));
    assert_eq!(Delimiter::new(","), Some(Delimiter::Str(String::from(","))));
    assert_eq!(Delimiter::new("  "), Some(Delimiter::Str(String::from("  "))));
}

#[test_case(" ", "a  b\tc", &["a", "b", "c"]; "whitespace runs")]
#[test_case(" ", "  a b  ", &["a", "b"]; "whitespace leading trailing")]
#[test_case(" ", "", &[]; "whitespace empty line")]
#[test_case(",", "a,,b", &["a", "", "b"]; "comma adjacent")]
#[test_case(",", "a,b,", &["a", "b", ""]; "comma trailing")]
#[test_case(",", "", &[""]; "comma empty line")]
#[test_case("::", "a::b:c", &["a", "b:c"]; "multi-char delimiter")]
#[test_case("\t", "2000-01-02\t03:04:05\tmsg one", &["2000-01-02", "03:04:05", "msg one"]; "tab")]
fn test_record_fields(
    delimiter: &str,
    line: &str,
    expect: &[&str],
) {
    let delimiter = Delimiter::new(delimiter).unwrap();
    let record = Record::new(String::from(line), &delimiter);
    assert_eq!(record.fields(), expect);
    assert_eq!(record.field_count(), expect.len());
    // fields are split once; asking again is the same
    assert_eq!(record.fields(), expect);
}

#[test_case("A 100\n", "A 100")]
#[test_case("A 100\r\n", "A 100")]
#[test_case("A 100", "A 100")]
#[test_case("\n", "")]
fn test_record_line_ending(
    line: &str,
    expect: &str,
) {
    let delimiter = Delimiter::Whitespace;
    let record = Record::new(String::from(line), &delimiter);
    assert_eq!(record.line(), expect);
    assert_eq!(record.into_line(), expect);
}

#[test]
fn test_record_multibyte() {
    let delimiter = Delimiter::new("→").unwrap();
    let record = Record::new(String::from("ä→ö→ü"), &delimiter);
    assert_eq!(record.fields(), vec!["ä", "ö", "ü"]);
}
