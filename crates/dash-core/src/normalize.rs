// File: crates/dash-core/src/normalize.rs
// Summary: Locale-tolerant numeric normalizer (plain, decimal-comma, US and European grouping).

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

/// Sentinel produced for absent or empty input; parses to NaN.
pub const NAN_SENTINEL: &str = "NaN";

macro_rules! re {
    ($pat:expr) => {
        LazyLock::new(|| Regex::new($pat).unwrap())
    };
}

// ASCII digit classes only; `\d` would also admit non-ASCII digits.
static PLAIN: LazyLock<Regex> = re!(r"^[0-9]+(\.[0-9]+)?$");
static DECIMAL_COMMA: LazyLock<Regex> = re!(r"^[0-9]+(,[0-9]+)?$");
static US_GROUPED: LazyLock<Regex> = re!(r"^[0-9]{1,3}(,[0-9]{3})+(\.[0-9]+)?$");
static EU_GROUPED: LazyLock<Regex> = re!(r"^[0-9]{1,3}(\.[0-9]{3})+(,[0-9]+)?$");

/// Normalize one textual number into `[-]?digits(.digits)?` form or `"NaN"`.
///
/// Classification is ordered and the first match wins:
/// plain decimal, decimal comma, US grouping, European grouping (requires both
/// separators). Anything else is returned stripped but otherwise unchanged and
/// left for the numeric parse to accept or reject.
pub fn normalize_number(raw: &str) -> String {
    let value: String = raw
        .chars()
        .filter(|c| *c != '"' && !c.is_whitespace())
        .collect();
    if value.is_empty() {
        return NAN_SENTINEL.to_string();
    }

    if PLAIN.is_match(&value) {
        return value;
    }
    if value.contains(',') && DECIMAL_COMMA.is_match(&value) {
        return value.replacen(',', ".", 1);
    }
    if US_GROUPED.is_match(&value) {
        return value.replace(',', "");
    }
    if value.contains('.') && value.contains(',') && EU_GROUPED.is_match(&value) {
        return value.replace('.', "").replacen(',', ".", 1);
    }
    value
}

/// Normalize a JSON field that may be absent, null, a string or a number.
pub fn normalize_value(raw: Option<&Value>) -> String {
    match raw {
        None | Some(Value::Null) => NAN_SENTINEL.to_string(),
        Some(Value::String(s)) => normalize_number(s),
        Some(Value::Number(n)) => normalize_number(&n.to_string()),
        Some(Value::Bool(b)) => normalize_number(&b.to_string()),
        Some(Value::Array(_)) | Some(Value::Object(_)) => NAN_SENTINEL.to_string(),
    }
}

/// Normalize then parse; any failure yields NaN.
pub fn parse_number(raw: Option<&Value>) -> f64 {
    parse_normalized(&normalize_value(raw))
}

/// Parse an already-normalized string; the whole string must be a number.
pub fn parse_normalized(normalized: &str) -> f64 {
    normalized.parse::<f64>().unwrap_or(f64::NAN)
}

/// Finite and non-negative, the admission rule for metric values.
#[inline]
pub fn is_clean_metric(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}
