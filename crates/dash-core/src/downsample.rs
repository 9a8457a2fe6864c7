// File: crates/dash-core/src/downsample.rs
// Summary: Downsampling utilities (per-key mean over fixed-width time buckets).

use std::collections::BTreeMap;

use chrono::{DateTime, Duration};

use crate::timeline::{TimePoint, Timeline};
use crate::types::SeriesKey;

/// Average every key's finite values inside buckets of `width`.
///
/// Buckets are `floor(instant / width)` and are stamped with their start
/// instant. A key with no finite value in a bucket stays absent, and buckets
/// without any finite value are dropped. A non-positive width returns the
/// input unchanged.
pub fn bucket_average(timeline: &Timeline, width: Duration) -> Timeline {
    let width_ms = width.num_milliseconds();
    if width_ms <= 0 || timeline.is_empty() {
        return timeline.clone();
    }

    let mut buckets: BTreeMap<i64, BTreeMap<SeriesKey, (f64, usize)>> = BTreeMap::new();
    for p in &timeline.points {
        let slot = p.time.timestamp_millis().div_euclid(width_ms);
        let acc = buckets.entry(slot).or_default();
        for (key, &v) in &p.values {
            if !v.is_finite() { continue; }
            let e = acc.entry(key.clone()).or_insert((0.0, 0));
            e.0 += v;
            e.1 += 1;
        }
    }

    let points = buckets
        .into_iter()
        .filter_map(|(slot, acc)| {
            let start = DateTime::from_timestamp_millis(slot.checked_mul(width_ms)?)?;
            let mut point = TimePoint::new(start);
            for (key, (sum, count)) in acc {
                if count > 0 {
                    point.values.insert(key, sum / count as f64);
                }
            }
            point.has_finite().then_some(point)
        })
        .collect();

    Timeline { points }
}
