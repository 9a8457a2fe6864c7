// File: crates/dash-core/tests/clean.rs
// Purpose: Row admission rules (timestamps, series keys, strict vs optional metrics).

use chrono::{TimeZone, Utc};
use dash_core::clean::{clean_row, clean_rows, parse_timestamp, MetricColumn, RowSchema};
use dash_core::RawRow;
use serde_json::{json, Value};

fn row(v: Value) -> RawRow {
    match v {
        Value::Object(m) => m,
        _ => unreachable!("fixture rows are objects"),
    }
}

fn crypto_schema() -> RowSchema {
    RowSchema::wide(
        &["ts", "timestamp"],
        vec![
            MetricColumn::strict("q2025", "Q2025"),
            MetricColumn::optional("g2025", "G2025"),
            MetricColumn::strict("cmc20", "CMC20"),
        ],
    )
}

#[test]
fn parses_supported_timestamp_forms() {
    let t = Utc.with_ymd_and_hms(2025, 3, 1, 12, 30, 0).unwrap();
    assert_eq!(parse_timestamp("2025-03-01T12:30:00Z"), Some(t));
    assert_eq!(parse_timestamp("2025-03-01T12:30:00.000Z"), Some(t));
    assert_eq!(parse_timestamp("2025-03-01 12:30:00+00"), Some(t));
    assert_eq!(parse_timestamp("2025-03-01T14:30:00+02:00"), Some(t));
    assert_eq!(parse_timestamp("2025-03-01 12:30:00"), Some(t));
    assert_eq!(parse_timestamp("1740832200"), Some(t));
    assert_eq!(parse_timestamp("1740832200000"), Some(t));
    assert_eq!(
        parse_timestamp("2025-03-01"),
        Some(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap())
    );
    assert_eq!(parse_timestamp("yesterday"), None);
    assert_eq!(parse_timestamp(""), None);
}

#[test]
fn strict_metric_failure_rejects_whole_row() {
    let schema = crypto_schema();
    let bad = row(json!({ "ts": "2025-03-01T00:00:00Z", "q2025": "-5", "g2025": "10", "cmc20": "1" }));
    assert!(clean_row(&bad, &schema).is_none());

    let missing = row(json!({ "ts": "2025-03-01T00:00:00Z", "g2025": "10", "cmc20": "1" }));
    assert!(clean_row(&missing, &schema).is_none());
}

#[test]
fn optional_metric_degrades_to_absent() {
    let schema = crypto_schema();
    let r = row(json!({ "ts": "2025-03-01T00:00:00Z", "q2025": "1,012.50", "g2025": null, "cmc20": "181,2" }));
    let obs = clean_row(&r, &schema).expect("row admitted");
    let keys: Vec<&str> = obs.iter().map(|o| o.key.as_str()).collect();
    assert_eq!(keys, ["Q2025", "CMC20"]);
    assert_eq!(obs[0].value, 1012.5);
    assert_eq!(obs[1].value, 181.2);
}

#[test]
fn timestamp_alias_fallback_and_rejection() {
    let schema = crypto_schema();
    let alias = row(json!({ "timestamp": "2025-03-01T00:00:00Z", "q2025": 1, "cmc20": 2 }));
    assert!(clean_row(&alias, &schema).is_some());

    let bad_ts = row(json!({ "ts": "not a time", "q2025": 1, "cmc20": 2 }));
    assert!(clean_row(&bad_ts, &schema).is_none());
}

#[test]
fn long_rows_need_a_non_empty_key() {
    let schema = RowSchema::long(&["timestamp"], "portfolio", "value");
    let blank = row(json!({ "timestamp": "2025-03-01T00:00:00Z", "portfolio": "   ", "value": "1" }));
    assert!(clean_row(&blank, &schema).is_none());

    let absent = row(json!({ "timestamp": "2025-03-01T00:00:00Z", "value": "1" }));
    assert!(clean_row(&absent, &schema).is_none());

    let with_placeholder = schema.clone().with_placeholder("UNKNOWN");
    let obs = clean_row(&absent, &with_placeholder).expect("placeholder applies");
    assert_eq!(obs[0].key, "UNKNOWN");

    let trimmed = row(json!({ "timestamp": "2025-03-01T00:00:00Z", "portfolio": " SSE ", "value": "3.012,5" }));
    let obs = clean_row(&trimmed, &schema).expect("admitted");
    assert_eq!(obs[0].key, "SSE");
    assert_eq!(obs[0].value, 3012.5);
}

#[test]
fn clean_rows_counts_rejections() {
    let schema = RowSchema::long(&["timestamp"], "portfolio", "value");
    let rows = vec![
        row(json!({ "timestamp": "2025-03-01T00:00:00Z", "portfolio": "P1", "value": "1" })),
        row(json!({ "timestamp": "2025-03-01T00:00:00Z", "portfolio": "P1", "value": "oops" })),
        row(json!({ "timestamp": "bad", "portfolio": "P1", "value": "1" })),
    ];
    let (obs, rejected) = clean_rows(&rows, &schema);
    assert_eq!(obs.len(), 1);
    assert_eq!(rejected, 2);
}

#[test]
fn select_list_names_primary_timestamp_and_fields() {
    assert_eq!(crypto_schema().fields(), ["ts", "q2025", "g2025", "cmc20"]);
}
