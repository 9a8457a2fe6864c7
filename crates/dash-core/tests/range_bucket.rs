// File: crates/dash-core/tests/range_bucket.rs
// Purpose: Trailing-window range filter and hourly bucket averaging.

use chrono::{DateTime, Duration, TimeZone, Utc};
use dash_core::downsample::bucket_average;
use dash_core::range::{filter_by_range, RangeSpec};
use dash_core::timeline::{TimePoint, Timeline};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()
}

fn hourly(n: i64) -> Timeline {
    Timeline::from_points((0..n).map(|h| TimePoint::new(t0() + Duration::hours(h)).with_value("A", h as f64)).collect())
}

#[test]
fn window_keeps_points_at_or_after_cutoff() {
    let tl = hourly(48);
    let latest = tl.latest().unwrap().time;
    let day = filter_by_range(&tl, RangeSpec::Hours24);
    assert_eq!(day.len(), 25);
    assert!(day.iter().all(|p| p.time >= latest - Duration::hours(24)));
    assert_eq!(day.first().unwrap().time, latest - Duration::hours(24));
}

#[test]
fn all_range_returns_input_unchanged() {
    let tl = hourly(10);
    assert_eq!(filter_by_range(&tl, RangeSpec::All), tl);
    assert!(filter_by_range(&Timeline::default(), RangeSpec::Hours24).is_empty());
}

#[test]
fn range_ids_parse_case_insensitively() {
    assert_eq!("72H".parse::<RangeSpec>(), Ok(RangeSpec::Hours72));
    assert_eq!("all".parse::<RangeSpec>(), Ok(RangeSpec::All));
    assert!("90d".parse::<RangeSpec>().is_err());
    assert_eq!(RangeSpec::Days7.window_hours(), Some(168));
    assert_eq!(RangeSpec::Days30.label(), "30D");
}

#[test]
fn bucket_mean_ignores_non_finite_and_absent() {
    let base = t0() + Duration::minutes(5);
    let points = vec![
        TimePoint::new(base).with_value("A", 10.0),
        TimePoint::new(base + Duration::minutes(10)).with_value("A", 20.0),
        TimePoint::new(base + Duration::minutes(20)).with_value("A", f64::NAN),
        TimePoint::new(base + Duration::minutes(30)).with_value("A", 30.0),
        TimePoint::new(base + Duration::minutes(40)).with_value("B", 7.0),
    ];
    let out = bucket_average(&Timeline::from_points(points), Duration::hours(1));
    assert_eq!(out.len(), 1);
    let bucket = out.first().unwrap();
    assert_eq!(bucket.time, t0());
    assert_eq!(bucket.finite("A"), Some(20.0));
    assert_eq!(bucket.finite("B"), Some(7.0));
}

#[test]
fn buckets_without_finite_values_are_dropped() {
    let points = vec![
        TimePoint::new(t0()).with_value("A", 1.0),
        TimePoint::new(t0() + Duration::hours(1)).with_value("A", f64::NAN),
        TimePoint::new(t0() + Duration::minutes(150)).with_value("A", 3.0),
    ];
    let out = bucket_average(&Timeline::from_points(points), Duration::hours(1));
    let starts: Vec<_> = out.iter().map(|p| p.time).collect();
    assert_eq!(starts, [t0(), t0() + Duration::hours(2)]);
    assert!(out.iter().all(|p| p.finite("A").is_some()));
}
