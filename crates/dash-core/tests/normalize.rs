// File: crates/dash-core/tests/normalize.rs
// Purpose: Locale classification of numeric strings and the NaN sentinel.

use dash_core::normalize::{is_clean_metric, normalize_number, normalize_value, parse_number};
use serde_json::{json, Value};

#[test]
fn classifies_each_locale_format() {
    assert_eq!(normalize_number("1,234,567.89"), "1234567.89");
    assert_eq!(normalize_number("1.234.567,89"), "1234567.89");
    assert_eq!(normalize_number("101715,30"), "101715.30");
    assert_eq!(normalize_number("2.261"), "2.261");
    assert_eq!(normalize_number("42"), "42");
}

#[test]
fn empty_and_null_become_nan_sentinel() {
    assert_eq!(normalize_number(""), "NaN");
    assert_eq!(normalize_number("  \" "), "NaN");
    assert_eq!(normalize_value(None), "NaN");
    assert_eq!(normalize_value(Some(&Value::Null)), "NaN");
    assert!(parse_number(Some(&Value::Null)).is_nan());
}

#[test]
fn strips_quotes_and_whitespace_first() {
    assert_eq!(normalize_number("\" 3 512,44 \""), "3512.44");
    assert_eq!(normalize_number(" 103,140.1 "), "103140.1");
}

#[test]
fn malformed_strings_fall_through_and_fail_to_parse() {
    // Grouping with a bad group width matches no rule.
    assert_eq!(normalize_number("12,34,567"), "12,34,567");
    assert!(parse_number(Some(&json!("12,34,567"))).is_nan());
    assert!(parse_number(Some(&json!("abc"))).is_nan());
    // European grouping without a decimal comma is not reinterpreted.
    assert!(parse_number(Some(&json!("1.234.567"))).is_nan());
}

#[test]
fn json_numbers_pass_through() {
    assert_eq!(parse_number(Some(&json!(1015.25))), 1015.25);
    assert_eq!(parse_number(Some(&json!(0))), 0.0);
}

#[test]
fn clean_metric_requires_finite_non_negative() {
    assert!(is_clean_metric(0.0));
    assert!(is_clean_metric(12.5));
    assert!(!is_clean_metric(-0.01));
    assert!(!is_clean_metric(f64::NAN));
    assert!(!is_clean_metric(f64::INFINITY));
}
