// File: crates/dash-core/src/clean.rs
// Summary: Row cleaner; per-record validity gate turning raw rows into timestamped observations.
// Notes:
// - Rejected rows are dropped silently; callers only see a count.
// - Strict metrics gate admission of the whole row, optional metrics degrade
//   to "no data for this key at this instant".

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

use crate::normalize::{is_clean_metric, parse_number};
use crate::types::{RawRow, SeriesKey};

/// How a numeric field participates in row admission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldPolicy {
    /// Must be finite and non-negative, otherwise the row is rejected.
    Strict,
    /// Finite and non-negative, or absent; never rejects the row.
    Optional,
}

/// One metric column of a wide row, plotted under `key`.
#[derive(Clone, Debug, PartialEq)]
pub struct MetricColumn {
    pub field: String,
    pub key: SeriesKey,
    pub policy: FieldPolicy,
}

impl MetricColumn {
    pub fn strict(field: impl Into<String>, key: impl Into<String>) -> Self {
        Self { field: field.into(), key: key.into(), policy: FieldPolicy::Strict }
    }

    pub fn optional(field: impl Into<String>, key: impl Into<String>) -> Self {
        Self { field: field.into(), key: key.into(), policy: FieldPolicy::Optional }
    }
}

/// Shape of the rows a profile consumes.
#[derive(Clone, Debug, PartialEq)]
pub enum RowLayout {
    /// One row per (timestamp, key, value).
    Long {
        key_field: String,
        value_field: String,
        value_policy: FieldPolicy,
        /// Key used when the key field is missing entirely (single-series sources).
        placeholder: Option<SeriesKey>,
    },
    /// One row per timestamp carrying several metric columns.
    Wide { metrics: Vec<MetricColumn> },
}

/// Field mapping for the row cleaner.
#[derive(Clone, Debug, PartialEq)]
pub struct RowSchema {
    /// Timestamp aliases, tried in order; the first present one is used.
    pub timestamp_fields: Vec<String>,
    pub layout: RowLayout,
}

impl RowSchema {
    pub fn long(
        timestamp_fields: &[&str],
        key_field: impl Into<String>,
        value_field: impl Into<String>,
    ) -> Self {
        Self {
            timestamp_fields: timestamp_fields.iter().map(|s| s.to_string()).collect(),
            layout: RowLayout::Long {
                key_field: key_field.into(),
                value_field: value_field.into(),
                value_policy: FieldPolicy::Strict,
                placeholder: None,
            },
        }
    }

    pub fn wide(timestamp_fields: &[&str], metrics: Vec<MetricColumn>) -> Self {
        Self {
            timestamp_fields: timestamp_fields.iter().map(|s| s.to_string()).collect(),
            layout: RowLayout::Wide { metrics },
        }
    }

    /// Set the fallback key for long rows with no key field.
    pub fn with_placeholder(mut self, key: impl Into<String>) -> Self {
        if let RowLayout::Long { placeholder, .. } = &mut self.layout {
            *placeholder = Some(key.into());
        }
        self
    }

    /// Set the admission policy of the long-form value field.
    pub fn with_value_policy(mut self, policy: FieldPolicy) -> Self {
        if let RowLayout::Long { value_policy, .. } = &mut self.layout {
            *value_policy = policy;
        }
        self
    }

    /// Fields the source must return for this schema. Only the primary
    /// timestamp alias is requested; the others are tolerated on read.
    pub fn fields(&self) -> Vec<String> {
        let mut out: Vec<String> = self.timestamp_fields.iter().take(1).cloned().collect();
        match &self.layout {
            RowLayout::Long { key_field, value_field, .. } => {
                out.push(key_field.clone());
                out.push(value_field.clone());
            }
            RowLayout::Wide { metrics } => out.extend(metrics.iter().map(|m| m.field.clone())),
        }
        out
    }
}

/// A validated long-form triple.
#[derive(Clone, Debug, PartialEq)]
pub struct Observation {
    pub time: DateTime<Utc>,
    pub key: SeriesKey,
    pub value: f64,
}

/// Clean one row; `None` means rejected. An admitted row yields one
/// observation per key that carries data.
pub fn clean_row(row: &RawRow, schema: &RowSchema) -> Option<Vec<Observation>> {
    let time = schema
        .timestamp_fields
        .iter()
        .find_map(|f| row.get(f).filter(|v| !v.is_null()))
        .and_then(parse_timestamp_value)?;

    match &schema.layout {
        RowLayout::Long { key_field, value_field, value_policy, placeholder } => {
            let key = match row.get(key_field) {
                None | Some(Value::Null) => placeholder.clone()?,
                Some(Value::String(s)) => non_empty(s)?,
                Some(Value::Number(n)) => n.to_string(),
                Some(_) => return None,
            };
            let value = parse_number(row.get(value_field));
            match (is_clean_metric(value), value_policy) {
                (true, _) => Some(vec![Observation { time, key, value }]),
                (false, FieldPolicy::Strict) => None,
                (false, FieldPolicy::Optional) => Some(Vec::new()),
            }
        }
        RowLayout::Wide { metrics } => {
            let mut out = Vec::with_capacity(metrics.len());
            for m in metrics {
                let value = parse_number(row.get(&m.field));
                if is_clean_metric(value) {
                    out.push(Observation { time, key: m.key.clone(), value });
                } else if m.policy == FieldPolicy::Strict {
                    return None;
                }
            }
            Some(out)
        }
    }
}

/// Clean every row, returning the admitted observations and the number of
/// rejected rows.
pub fn clean_rows(rows: &[RawRow], schema: &RowSchema) -> (Vec<Observation>, usize) {
    let mut observations = Vec::with_capacity(rows.len());
    let mut rejected = 0usize;
    for row in rows {
        match clean_row(row, schema) {
            Some(obs) => observations.extend(obs),
            None => rejected += 1,
        }
    }
    (observations, rejected)
}

fn non_empty(s: &str) -> Option<String> {
    let t = s.trim();
    if t.is_empty() { None } else { Some(t.to_string()) }
}

/// Parse a timestamp carried by a JSON value (string or epoch number).
pub fn parse_timestamp_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_timestamp(s),
        Value::Number(n) => n.as_i64().and_then(from_epoch),
        _ => None,
    }
}

/// Parse the timestamp forms emitted by the sources.
///
/// Accepts RFC 3339 (also with a space separator or an hour-only offset),
/// naive date-times and dates (taken as UTC) and integer epochs (ms above 10^12).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if s.bytes().all(|b| b.is_ascii_digit()) {
        return s.parse::<i64>().ok().and_then(from_epoch);
    }

    let s = if s.as_bytes().get(10) == Some(&b' ') {
        let mut owned = s.to_string();
        owned.replace_range(10..11, "T");
        owned
    } else {
        s.to_string()
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M:%S%.f%#z") {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&s, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(&s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn from_epoch(n: i64) -> Option<DateTime<Utc>> {
    if n > 10_i64.pow(12) {
        DateTime::from_timestamp_millis(n)
    } else {
        DateTime::from_timestamp(n, 0)
    }
}
