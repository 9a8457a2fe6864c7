// File: crates/dash-core/src/transform.rs
// Summary: Display-mode projection (absolute values or percent change from a per-key baseline).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::error::ParseModeError;
use crate::timeline::Timeline;
use crate::types::SeriesKey;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DisplayMode {
    #[default]
    Absolute,
    Percent,
}

impl DisplayMode {
    pub const fn id(self) -> &'static str {
        match self {
            DisplayMode::Absolute => "absolute",
            DisplayMode::Percent => "percent",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for DisplayMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "absolute" | "abs" => Ok(DisplayMode::Absolute),
            "percent" | "pct" | "%" => Ok(DisplayMode::Percent),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

/// `(value - base) / base * 100`, or `None` when the result would not be a
/// finite number (non-finite inputs or a zero base).
pub fn percent_change(value: f64, base: f64) -> Option<f64> {
    if !value.is_finite() || !base.is_finite() || base == 0.0 {
        return None;
    }
    Some((value - base) / base * 100.0).filter(|v| v.is_finite())
}

/// Baseline of `key`: its first finite value in `view`, else in `fallback`.
pub fn baseline(view: &Timeline, fallback: &Timeline, key: &str) -> Option<f64> {
    view.first_finite(key).or_else(|| fallback.first_finite(key))
}

/// One projected row; `cells` aligns with `Projection::keys`.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectedPoint {
    pub timestamp: String,
    pub time: DateTime<Utc>,
    pub cells: Vec<Option<f64>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Projection {
    pub mode: DisplayMode,
    pub keys: Vec<SeriesKey>,
    pub points: Vec<ProjectedPoint>,
}

impl Projection {
    /// Column of cells for the key at `index`.
    pub fn column(&self, index: usize) -> impl Iterator<Item = Option<f64>> + '_ {
        self.points.iter().map(move |p| p.cells.get(index).copied().flatten())
    }
}

/// Project `view` for charting. Pure: the timelines are never modified.
///
/// `fallback` is the unfiltered timeline, consulted only for percent-mode
/// baselines when `view` holds no finite value for a key.
pub fn project(view: &Timeline, fallback: &Timeline, keys: &[SeriesKey], mode: DisplayMode) -> Projection {
    let bases: Vec<Option<f64>> = match mode {
        DisplayMode::Absolute => vec![None; keys.len()],
        DisplayMode::Percent => keys.iter().map(|k| baseline(view, fallback, k)).collect(),
    };

    let points = view
        .points
        .iter()
        .map(|p| {
            let cells = keys
                .iter()
                .zip(&bases)
                .map(|(key, base)| {
                    let value = p.finite(key)?;
                    match mode {
                        DisplayMode::Absolute => Some(value),
                        DisplayMode::Percent => percent_change(value, (*base)?),
                    }
                })
                .collect();
            ProjectedPoint { timestamp: p.timestamp.clone(), time: p.time, cells }
        })
        .collect();

    Projection { mode, keys: keys.to_vec(), points }
}
