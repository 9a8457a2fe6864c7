// File: crates/dash-core/src/timeline.rs
// Summary: Wide-form timeline model and the long-to-wide reshaper.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, SecondsFormat, Utc};

use crate::clean::Observation;
use crate::types::SeriesKey;

/// Canonical bucket key of an instant (ISO-8601, UTC, milliseconds).
pub fn bucket_key(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// All series values observed at one instant.
#[derive(Clone, Debug, PartialEq)]
pub struct TimePoint {
    pub timestamp: String,
    pub time: DateTime<Utc>,
    pub values: BTreeMap<SeriesKey, f64>,
}

impl TimePoint {
    pub fn new(time: DateTime<Utc>) -> Self {
        Self { timestamp: bucket_key(&time), time, values: BTreeMap::new() }
    }

    pub fn with_value(mut self, key: impl Into<String>, value: f64) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    /// Value for `key` when present and finite.
    pub fn finite(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied().filter(|v| v.is_finite())
    }

    pub fn has_finite(&self) -> bool {
        self.values.values().any(|v| v.is_finite())
    }
}

/// Time-ordered sequence of points, ascending by instant.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Timeline {
    pub points: Vec<TimePoint>,
}

impl Timeline {
    /// Build from points, sorting them ascending (stable).
    pub fn from_points(mut points: Vec<TimePoint>) -> Self {
        points.sort_by(|a, b| a.time.cmp(&b.time));
        Self { points }
    }

    pub fn len(&self) -> usize { self.points.len() }

    pub fn is_empty(&self) -> bool { self.points.is_empty() }

    pub fn first(&self) -> Option<&TimePoint> { self.points.first() }

    pub fn latest(&self) -> Option<&TimePoint> { self.points.last() }

    pub fn iter(&self) -> std::slice::Iter<'_, TimePoint> { self.points.iter() }

    /// First finite value of `key`, scanning forward.
    pub fn first_finite(&self, key: &str) -> Option<f64> {
        self.points.iter().find_map(|p| p.finite(key))
    }

    /// Last finite value of `key`, scanning backward.
    pub fn last_finite(&self, key: &str) -> Option<f64> {
        self.points.iter().rev().find_map(|p| p.finite(key))
    }
}

/// Output of the reshaper: the timeline plus keys in display order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Reshaped {
    pub timeline: Timeline,
    pub keys: Vec<SeriesKey>,
}

/// Group long-form observations into one point per instant.
///
/// Later observations overwrite earlier ones for the same (instant, key);
/// keys are reported in order of first appearance.
pub fn reshape<'a, I>(observations: I) -> Reshaped
where
    I: IntoIterator<Item = &'a Observation>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut points: Vec<TimePoint> = Vec::new();
    let mut seen: HashSet<SeriesKey> = HashSet::new();
    let mut keys: Vec<SeriesKey> = Vec::new();

    for obs in observations {
        let bucket = bucket_key(&obs.time);
        let slot = match index.get(&bucket) {
            Some(&i) => i,
            None => {
                points.push(TimePoint::new(obs.time));
                index.insert(bucket, points.len() - 1);
                points.len() - 1
            }
        };
        points[slot].values.insert(obs.key.clone(), obs.value);
        if seen.insert(obs.key.clone()) {
            keys.push(obs.key.clone());
        }
    }

    Reshaped { timeline: Timeline::from_points(points), keys }
}

/// Display ordering applied to discovered keys.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum KeyOrder {
    /// Order of first appearance.
    #[default]
    FirstSeen,
    /// First appearance, with one privileged key moved to the front.
    Pinned(SeriesKey),
    /// Listed keys first in the listed order, then the rest as first seen.
    Declared(Vec<SeriesKey>),
    /// Digit-aware sort, with an optional privileged key first.
    Natural { pinned: Option<SeriesKey> },
}

impl KeyOrder {
    pub fn apply(&self, keys: &mut Vec<SeriesKey>) {
        match self {
            KeyOrder::FirstSeen => {}
            KeyOrder::Pinned(pin) => {
                if let Some(pos) = keys.iter().position(|k| k == pin) {
                    let k = keys.remove(pos);
                    keys.insert(0, k);
                }
            }
            KeyOrder::Declared(order) => {
                let rank = |k: &SeriesKey| order.iter().position(|o| o == k).unwrap_or(order.len());
                keys.sort_by_key(rank);
            }
            KeyOrder::Natural { pinned } => {
                keys.sort_by(|a, b| {
                    let pa = pinned.as_deref() == Some(a.as_str());
                    let pb = pinned.as_deref() == Some(b.as_str());
                    pb.cmp(&pa).then_with(|| natural_cmp(a, b))
                });
            }
        }
    }
}

/// Compare strings treating runs of ASCII digits as numbers ("P2" < "P10").
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (mut ia, mut ib) = (a.char_indices().peekable(), b.char_indices().peekable());
    loop {
        match (ia.peek().copied(), ib.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some((sa, ca)), Some((sb, cb))) => {
                if ca.is_ascii_digit() && cb.is_ascii_digit() {
                    let ea = digit_run_end(a, sa);
                    let eb = digit_run_end(b, sb);
                    let na = a[sa..ea].trim_start_matches('0');
                    let nb = b[sb..eb].trim_start_matches('0');
                    let ord = na.len().cmp(&nb.len()).then_with(|| na.cmp(nb));
                    if ord != Ordering::Equal {
                        return ord;
                    }
                    while ia.peek().is_some_and(|&(i, _)| i < ea) { ia.next(); }
                    while ib.peek().is_some_and(|&(i, _)| i < eb) { ib.next(); }
                } else {
                    let ord = ca.to_lowercase().cmp(cb.to_lowercase()).then_with(|| ca.cmp(&cb));
                    if ord != Ordering::Equal {
                        return ord;
                    }
                    ia.next();
                    ib.next();
                }
            }
        }
    }
}

fn digit_run_end(s: &str, start: usize) -> usize {
    s[start..]
        .find(|c: char| !c.is_ascii_digit())
        .map(|off| start + off)
        .unwrap_or(s.len())
}
