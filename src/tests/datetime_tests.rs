// src/tests/datetime_tests.rs

//! tests for `datetime.rs` functions

#![allow(non_snake_case)]

use crate::common::ResultS3;
use crate::data::datetime::{
    datetime_from_epoch_str,
    datetime_parse_free,
    datetime_parse_from_str,
    dt_pass_filters,
    leading_integer,
    month_abbr_to_month,
    pattern_template_to_regex,
    DateTimeExtractor,
    DateTimeL,
    DateTimeLOpt,
    DateTimeStrategy,
    ExtractError,
    PatternComponent,
    PatternConfigError,
    PatternParser,
    Result_Filter_DateTime2,
    CGP_MONTH,
    CGP_YEAR,
    RAW_PARSE_PATTERNS,
};
use crate::tests::common::{utc_now_fixed, ymdhms, FO_0, FO_M8, FO_P1};

use std::collections::HashSet;

use ::si_trace_print::stack::stack_offset_set;
use ::test_case::test_case;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// pattern parser in UTC that errors on non-match
fn pattern(template: &str) -> PatternParser {
    PatternParser::new(template, *FO_0, false).unwrap()
}

fn found(result: ResultS3<DateTimeL, ExtractError>) -> DateTimeL {
    match result {
        ResultS3::Found(dt) => dt,
        ResultS3::Skip => panic!("expected Found, got Skip"),
        ResultS3::Err(err) => panic!("expected Found, got Err {}", err),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// datetime_parse_from_str
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test]
fn test_datetime_parse_from_str() {
    stack_offset_set(Some(2));
    assert_eq!(
        datetime_parse_from_str("2000-01-02 03:04:05", "%Y-%m-%d %H:%M:%S", false, &FO_M8),
        Some(ymdhms(&FO_M8, 2000, 1, 2, 3, 4, 5))
    );
    assert_eq!(
        datetime_parse_from_str("2000-01-02 03:04:05 +0100", "%Y-%m-%d %H:%M:%S %z", true, &FO_M8),
        Some(ymdhms(&FO_P1, 2000, 1, 2, 3, 4, 5))
    );
    assert_eq!(datetime_parse_from_str("2000-01-02", "%Y-%m-%d %H:%M:%S", false, &FO_0), None);
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// raw
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test]
fn test_RAW_PARSE_PATTERNS_unique() {
    let mut seen: HashSet<&str> = HashSet::new();
    for (pattern, _, _, _, _) in RAW_PARSE_PATTERNS.iter() {
        assert!(seen.insert(pattern), "duplicate pattern {:?}", pattern);
    }
}

#[test_case("2010-10-03 20:03:42", Some(ymdhms(&FO_P1, 2010, 10, 3, 20, 3, 42)); "iso space")]
#[test_case("2010-10-03T20:03:42", Some(ymdhms(&FO_P1, 2010, 10, 3, 20, 3, 42)); "iso T")]
#[test_case("2010-10-03 20:03", Some(ymdhms(&FO_P1, 2010, 10, 3, 20, 3, 0)); "iso no seconds")]
#[test_case("2010-10-03T20:03:42Z", Some(ymdhms(&FO_0, 2010, 10, 3, 20, 3, 42)); "rfc3339 Z")]
#[test_case("2010-10-03T20:03:42-08:00", Some(ymdhms(&FO_M8, 2010, 10, 3, 20, 3, 42)); "rfc3339 offset")]
#[test_case("Tue, 14 Nov 2023 22:13:20 +0000", Some(ymdhms(&FO_0, 2023, 11, 14, 22, 13, 20)); "rfc2822")]
#[test_case("2000/01/02 03:04:05", Some(ymdhms(&FO_P1, 2000, 1, 2, 3, 4, 5)); "slashes")]
#[test_case("20000102T030405", Some(ymdhms(&FO_P1, 2000, 1, 2, 3, 4, 5)); "compact")]
#[test_case("10/Oct/2000:13:55:36 -0800", Some(ymdhms(&FO_M8, 2000, 10, 10, 13, 55, 36)); "apache")]
#[test_case("2000-01-02", Some(ymdhms(&FO_P1, 2000, 1, 2, 0, 0, 0)); "date only")]
#[test_case("Nov 14 22:13:20", Some(ymdhms(&FO_P1, 2023, 11, 14, 22, 13, 20)); "syslog no year")]
#[test_case("20:03:42", Some(ymdhms(&FO_P1, 2023, 12, 1, 20, 3, 42)); "time only")]
#[test_case("@1700000000", Some(ymdhms(&FO_0, 2023, 11, 14, 22, 13, 20)); "at epoch")]
#[test_case("  2000-01-02 03:04:05  ", Some(ymdhms(&FO_P1, 2000, 1, 2, 3, 4, 5)); "surrounding whitespace")]
#[test_case("", None; "empty")]
#[test_case("garbage", None; "garbage")]
#[test_case("@", None; "at only")]
fn test_datetime_parse_free(
    data: &str,
    expect: DateTimeLOpt,
) {
    stack_offset_set(Some(2));
    let dt = datetime_parse_free(data, &FO_P1, &utc_now_fixed());
    assert_eq!(dt, expect, "datetime_parse_free({:?})", data);
}

#[test]
fn test_datetime_parse_free_fractional() {
    let dt = datetime_parse_free("2000-01-02 03:04:05.250", &FO_0, &utc_now_fixed()).unwrap();
    assert_eq!(dt.timestamp(), ymdhms(&FO_0, 2000, 1, 2, 3, 4, 5).timestamp());
    assert_eq!(dt.timestamp_subsec_millis(), 250);
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// epoch
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test_case("1700000000", Some(1700000000))]
#[test_case("1700000000.5", Some(1700000000))]
#[test_case("  42 seconds", Some(42))]
#[test_case("-1", Some(-1))]
#[test_case("+7", Some(7))]
#[test_case("0", Some(0))]
#[test_case("not-a-number", None)]
#[test_case("-", None)]
#[test_case("", None)]
#[test_case("99999999999999999999999", None; "overflow")]
fn test_leading_integer(
    data: &str,
    expect: Option<i64>,
) {
    assert_eq!(leading_integer(data), expect);
}

#[test]
fn test_datetime_from_epoch_str() {
    stack_offset_set(Some(2));
    assert_eq!(
        datetime_from_epoch_str("1700000000"),
        Some(ymdhms(&FO_0, 2023, 11, 14, 22, 13, 20))
    );
    assert_eq!(
        datetime_from_epoch_str("-1"),
        Some(ymdhms(&FO_0, 1969, 12, 31, 23, 59, 59))
    );
    assert_eq!(datetime_from_epoch_str("not-a-number"), None);
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// pattern
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test_case("jan", Some(1))]
#[test_case("Feb", Some(2))]
#[test_case("SEP", Some(9))]
#[test_case("dec", Some(12))]
#[test_case("foo", None)]
#[test_case("janu", None)]
fn test_month_abbr_to_month(
    abbr: &str,
    expect: Option<u32>,
) {
    assert_eq!(month_abbr_to_month(abbr), expect);
}

#[test]
fn test_pattern_template_to_regex() {
    let (regex, components) = pattern_template_to_regex("%Y-%m").unwrap();
    assert_eq!(regex, format!("(?i){}-{}", CGP_YEAR, CGP_MONTH));
    assert_eq!(components, vec![PatternComponent::Year, PatternComponent::Month]);

    let (regex, components) = pattern_template_to_regex("100%%").unwrap();
    assert_eq!(regex, "(?i)100%");
    assert!(components.is_empty());
}

#[test_case("%Q", PatternConfigError::UnknownSpecifier('Q'))]
#[test_case("%y", PatternConfigError::UnknownSpecifier('y'))]
#[test_case("%Y%", PatternConfigError::DanglingPercent)]
#[test_case("%m %b", PatternConfigError::ConflictingMonth)]
#[test_case("%Y %Y", PatternConfigError::DuplicateSpecifier('Y'))]
fn test_pattern_config_error(
    template: &str,
    expect: PatternConfigError,
) {
    stack_offset_set(Some(2));
    assert_eq!(PatternParser::new(template, *FO_0, false).unwrap_err(), expect);
}

#[test]
fn test_pattern_config_error_regex() {
    match PatternParser::new("(%Y", *FO_0, false) {
        Err(PatternConfigError::Regex(_)) => {}
        other => panic!("expected PatternConfigError::Regex, got {:?}", other),
    }
}

#[test]
fn test_pattern_full() {
    stack_offset_set(Some(2));
    let dt = found(pattern("%Y-%m-%d %H:%M:%S").extract_at("2010-10-03 20:03:42", &utc_now_fixed()));
    assert_eq!(dt, ymdhms(&FO_0, 2010, 10, 3, 20, 3, 42));
}

#[test]
fn test_pattern_time_only_is_today() {
    let dt = found(pattern("%H:%M:%S").extract_at("20:03:42", &utc_now_fixed()));
    assert_eq!(dt, ymdhms(&FO_0, 2023, 12, 1, 20, 3, 42));
}

#[test]
fn test_pattern_missing_seconds_from_now() {
    let dt = found(pattern("%Y-%m-%d %H:%M").extract_at("2010-10-03 20:03", &utc_now_fixed()));
    assert_eq!(dt, ymdhms(&FO_0, 2010, 10, 3, 20, 3, 7));
}

#[test]
fn test_pattern_tz_offset() {
    let parser = PatternParser::new("%Y-%m-%d %H:%M:%S", *FO_M8, false).unwrap();
    let dt = found(parser.extract_at("2010-10-03 20:03:42", &utc_now_fixed()));
    assert_eq!(dt, ymdhms(&FO_M8, 2010, 10, 3, 20, 3, 42));
}

#[test]
fn test_pattern_abbrev_month_case_insensitive() {
    let dt = found(pattern("%b %d %H:%M:%S").extract_at("nov 14 22:13:20", &utc_now_fixed()));
    assert_eq!(dt, ymdhms(&FO_0, 2023, 11, 14, 22, 13, 20));
    let dt = found(pattern("%b %d %Y").extract_at("NOV 14 2020", &utc_now_fixed()));
    assert_eq!(dt, ymdhms(&FO_0, 2020, 11, 14, 5, 6, 7));
}

#[test]
fn test_pattern_unanchored() {
    let dt = found(pattern("at %H:%M:%S").extract_at("started at 20:03:42 ok", &utc_now_fixed()));
    assert_eq!(dt, ymdhms(&FO_0, 2023, 12, 1, 20, 3, 42));
}

#[test]
fn test_pattern_literal_percent() {
    let dt = found(pattern("100%% %H:%M:%S").extract_at("100% 20:03:42", &utc_now_fixed()));
    assert_eq!(dt, ymdhms(&FO_0, 2023, 12, 1, 20, 3, 42));
}

#[test]
fn test_pattern_invalid_month() {
    let result = pattern("%b %d").extract_at("Foo 14", &utc_now_fixed());
    assert_eq!(
        result,
        ResultS3::Err(ExtractError::InvalidMonth {
            month: String::from("Foo"),
            data: String::from("Foo 14"),
        })
    );
}

#[test_case("2010-13-03"; "month 13")]
#[test_case("2010-02-30"; "february 30")]
#[test_case("2010-10-00"; "day 0")]
fn test_pattern_invalid_datetime(data: &str) {
    let result = pattern("%Y-%m-%d").extract_at(data, &utc_now_fixed());
    assert_eq!(
        result,
        ResultS3::Err(ExtractError::InvalidDateTime {
            data: String::from(data),
        })
    );
}

#[test]
fn test_pattern_invalid_hour() {
    let result = pattern("%H:%M:%S").extract_at("25:00:00", &utc_now_fixed());
    assert!(matches!(result, ResultS3::Err(ExtractError::InvalidDateTime { .. })));
}

#[test]
fn test_pattern_no_match() {
    let result = pattern("%H:%M:%S").extract_at("no time here", &utc_now_fixed());
    assert_eq!(
        result,
        ResultS3::Err(ExtractError::NoMatch {
            pattern: String::from("%H:%M:%S"),
            data: String::from("no time here"),
        })
    );
    let parser = PatternParser::new("%H:%M:%S", *FO_0, true).unwrap();
    assert_eq!(parser.extract_at("no time here", &utc_now_fixed()), ResultS3::Skip);
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// DateTimeExtractor
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test]
fn test_extractor_epoch() {
    let extractor = DateTimeExtractor::new(&DateTimeStrategy::Epoch, *FO_P1, false).unwrap();
    assert_eq!(
        extractor.extract("1700000000"),
        ResultS3::Found(ymdhms(&FO_0, 2023, 11, 14, 22, 13, 20))
    );
    assert_eq!(
        extractor.extract("not-a-number"),
        ResultS3::Err(ExtractError::ParseFailure {
            strategy: "epoch",
            data: String::from("not-a-number"),
        })
    );
}

#[test]
fn test_extractor_raw() {
    let extractor = DateTimeExtractor::new(&DateTimeStrategy::Raw, *FO_P1, false).unwrap();
    assert_eq!(
        extractor.extract("2000-01-02 03:04:05"),
        ResultS3::Found(ymdhms(&FO_P1, 2000, 1, 2, 3, 4, 5))
    );
    assert!(extractor.extract("garbage").is_err());
}

#[test]
fn test_extractor_pattern() {
    let strategy = DateTimeStrategy::Pattern(String::from("%Y%m%d"));
    let extractor = DateTimeExtractor::new(&strategy, *FO_0, false).unwrap();
    assert_eq!(
        extractor.extract_at("x 20000102 y", &utc_now_fixed()),
        ResultS3::Found(ymdhms(&FO_0, 2000, 1, 2, 5, 6, 7))
    );
    let strategy = DateTimeStrategy::Pattern(String::from("%Q"));
    assert!(DateTimeExtractor::new(&strategy, *FO_0, false).is_err());
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// filters
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// basic test of `dt_pass_filters`
#[rustfmt::skip]
#[test]
fn test_dt_pass_filters() {
    stack_offset_set(Some(2));
    let a = ymdhms(&FO_0, 2000, 1, 1, 1, 1, 0);
    let b = ymdhms(&FO_0, 2000, 1, 1, 1, 1, 5);
    for (da, dt, db, exp_result) in [
        (None, a, None, Result_Filter_DateTime2::InRange),
        (Some(a), a, None, Result_Filter_DateTime2::InRange),
        (Some(b), a, None, Result_Filter_DateTime2::BeforeRange),
        (None, b, Some(b), Result_Filter_DateTime2::InRange),
        (None, b, Some(a), Result_Filter_DateTime2::AfterRange),
        (Some(a), b, Some(b), Result_Filter_DateTime2::InRange),
        (Some(a), a, Some(b), Result_Filter_DateTime2::InRange),
        // same instant in another offset
        (Some(a.with_timezone(&*FO_P1)), a, Some(a.with_timezone(&*FO_M8)), Result_Filter_DateTime2::InRange),
    ] {
        let result = dt_pass_filters(&dt, &da, &db);
        assert_eq!(exp_result, result, "Expected {:?} Got {:?} for {:?} among dt_pass_filters({:?}, {:?})", exp_result, result, dt, da, db);
    }
    assert!(Result_Filter_DateTime2::InRange.is_pass());
    assert!(!Result_Filter_DateTime2::AfterRange.is_pass());
}
