use chrono::{TimeZone, Utc};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, black_box};
use dash_core::source::synthetic::mock_stock_index;
use dash_core::{build_series, Profile};

fn bench_reshape(c: &mut Criterion) {
    let profile = Profile::china_stock();
    let anchor = Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap();
    let mut group = c.benchmark_group("reshape");
    for &hours in &[720i64, 4_000i64] {
        // Four portfolios per hour, alternating locale formats.
        let rows = mock_stock_index(anchor, hours);
        group.bench_with_input(BenchmarkId::from_parameter(format!("rows{}", rows.len())), &rows, |b, rows| {
            b.iter(|| black_box(build_series(rows, &profile.schema, &profile.key_order)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_reshape);
criterion_main!(benches);
