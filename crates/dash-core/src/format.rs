// File: crates/dash-core/src/format.rs
// Summary: Value, percent and date formatting shared by chart options, highlights and panels.

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

use crate::transform::DisplayMode;

/// How absolute values are written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ValueStyle {
    /// US dollars; at most 2 fraction digits at or above 1000, else at most 4 (min 2).
    #[default]
    Currency,
    /// Grouped decimal with exactly 2 digits at or above 1000, else 4.
    Plain,
    /// Grouped decimal with a fixed number of digits.
    Fixed(u8),
}

/// Formatter descriptor handed to the chart renderer; also usable in-process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ValueFormat {
    Currency { currency: &'static str },
    Plain,
    Fixed { digits: u8 },
    Percent { digits: u8 },
}

impl ValueFormat {
    pub fn for_mode(style: ValueStyle, mode: DisplayMode) -> Self {
        match (mode, style) {
            (DisplayMode::Percent, _) => ValueFormat::Percent { digits: 2 },
            (DisplayMode::Absolute, ValueStyle::Currency) => ValueFormat::Currency { currency: "USD" },
            (DisplayMode::Absolute, ValueStyle::Plain) => ValueFormat::Plain,
            (DisplayMode::Absolute, ValueStyle::Fixed(digits)) => ValueFormat::Fixed { digits },
        }
    }

    /// Format one value; non-finite values format as an empty string.
    pub fn format(&self, value: f64) -> String {
        if !value.is_finite() {
            return String::new();
        }
        match *self {
            ValueFormat::Currency { .. } => format_currency(value),
            ValueFormat::Plain => format_plain(value),
            ValueFormat::Fixed { digits } => format_grouped(value, digits as usize, digits as usize),
            ValueFormat::Percent { .. } => format_percent(value),
        }
    }
}

/// Insert `,` every three digits of an unsigned integer string.
pub fn group_thousands(digits: &str) -> String {
    let n = digits.len();
    let mut out = String::with_capacity(n + n / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (n - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Grouped decimal with between `min` and `max` fraction digits.
pub fn format_grouped(value: f64, min: usize, max: usize) -> String {
    let fixed = format!("{:.*}", max, value.abs());
    let (int_part, frac) = match fixed.split_once('.') {
        Some((i, f)) => (i.to_string(), f.to_string()),
        None => (fixed.clone(), String::new()),
    };
    let mut frac = frac;
    while frac.len() > min && frac.ends_with('0') {
        frac.pop();
    }
    let negative = value < 0.0 && (int_part.bytes().any(|b| b != b'0') || frac.bytes().any(|b| b != b'0'));
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&group_thousands(&int_part));
    if !frac.is_empty() {
        out.push('.');
        out.push_str(&frac);
    }
    out
}

pub fn format_currency(value: f64) -> String {
    let max = if value >= 1000.0 { 2 } else { 4 };
    usd(value, 2, max)
}

/// USD with an exact number of fraction digits.
pub fn format_usd_exact(value: f64, digits: usize) -> String {
    usd(value, digits, digits)
}

fn usd(value: f64, min: usize, max: usize) -> String {
    let body = format_grouped(value, min, max);
    match body.strip_prefix('-') {
        Some(rest) => format!("-${rest}"),
        None => format!("${body}"),
    }
}

pub fn format_plain(value: f64) -> String {
    let digits = if value >= 1000.0 { 2 } else { 4 };
    format_grouped(value, digits, digits)
}

/// `+1.23%` / `-0.50%`.
pub fn format_percent(value: f64) -> String {
    let text = format!("{value:.2}");
    match text.strip_prefix('-') {
        // Rounds to zero: drop the sign of `-0.00`.
        Some(rest) if rest.bytes().all(|b| b == b'0' || b == b'.') => format!("+{rest}%"),
        Some(_) => format!("{text}%"),
        None => format!("+{text}%"),
    }
}

/// Format an absolute or percent cell for display.
pub fn format_value(value: f64, style: ValueStyle, mode: DisplayMode) -> String {
    ValueFormat::for_mode(style, mode).format(value)
}

/// Fraction digits carried by a raw numeric string, capped at 8.
pub fn fraction_digits_of(raw: &str) -> usize {
    raw.split_once('.').map(|(_, f)| f.len()).unwrap_or(0).min(8)
}

/// `YYYY-MM-DD HH:MM:SS`, UTC.
pub fn format_datetime(time: &DateTime<Utc>) -> String {
    time.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// `M/D`, for daily category axes.
pub fn format_date_label(time: &DateTime<Utc>) -> String {
    format!("{}/{}", time.month(), time.day())
}

/// Escape text for interpolation into HTML.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
