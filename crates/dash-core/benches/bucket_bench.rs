use chrono::{Duration, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, black_box};
use dash_core::downsample::bucket_average;
use dash_core::range::{filter_by_range, RangeSpec};
use dash_core::timeline::{TimePoint, Timeline};

fn gen_minutes(n: i64, keys: &[&str]) -> Timeline {
    let t0 = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let points = (0..n)
        .map(|i| {
            keys.iter().enumerate().fold(TimePoint::new(t0 + Duration::minutes(i)), |p, (j, k)| {
                p.with_value(*k, 1000.0 + (i as f64 * 0.01 + j as f64).sin() * 25.0)
            })
        })
        .collect();
    Timeline::from_points(points)
}

fn bench_bucket(c: &mut Criterion) {
    let keys = ["SSE", "P1", "P2", "P10"];
    let mut group = c.benchmark_group("bucket");
    for &n in &[43_200i64, 100_000i64] {
        let tl = gen_minutes(n, &keys);
        group.bench_with_input(BenchmarkId::new("hourly", n), &tl, |b, tl| {
            b.iter(|| black_box(bucket_average(tl, Duration::hours(1))));
        });
        group.bench_with_input(BenchmarkId::new("filter_7d", n), &tl, |b, tl| {
            b.iter(|| black_box(filter_by_range(tl, RangeSpec::Days7)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_bucket);
criterion_main!(benches);
