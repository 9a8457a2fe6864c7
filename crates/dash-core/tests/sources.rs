// File: crates/dash-core/tests/sources.rs
// Purpose: Synthetic, CSV and REST sources feeding the common pipeline.

use chrono::{DateTime, TimeZone, Utc};
use dash_core::source::synthetic::{mock_kline, mock_vix};
use dash_core::source::{DataSource, Query};
use dash_core::{
    build_series, load_range, ConfigError, CsvSource, Dashboard, DisplayMode, LoadError, MemorySurface, Profile,
    RangeSpec, RestSource, SourceConfig, SyntheticSource,
};

fn anchor() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap()
}

#[test]
fn synthetic_generators_are_deterministic() {
    assert_eq!(mock_kline(anchor(), "VDY.TO", 60), mock_kline(anchor(), "VDY.TO", 60));
    assert_ne!(mock_kline(anchor(), "VDY.TO", 60), mock_kline(anchor(), "ZQQ.TO", 60));
    let vix = mock_vix(anchor(), 60);
    assert_eq!(vix.len(), 61);
    // i = 0 is the anchor day: 16 + 3 sin(0) + 0.
    assert_eq!(vix.last().unwrap()["value"], serde_json::json!(16.0));
}

#[tokio::test]
async fn synthetic_source_honours_filters_and_paging() {
    let source = SyntheticSource::new(anchor());
    let q = Query::new("world_etf_kline").eq("symbol", "XBM.TO").order_by("ts").page(10, 55);
    let rows = source.fetch(&q).await.unwrap();
    assert_eq!(rows.len(), 6);
    assert!(rows.iter().all(|r| r["symbol"] == "XBM.TO"));

    let unknown = source.fetch(&Query::new("nope")).await.unwrap();
    assert!(unknown.is_empty());
}

#[tokio::test]
async fn crypto_profile_loads_from_synthetic_source() {
    let source = SyntheticSource::new(anchor());
    let profile = Profile::crypto_index();
    let r = load_range(&source, &profile, RangeSpec::All, anchor()).await.unwrap();
    assert_eq!(r.keys, ["Q2025", "G2025", "B2025", "CMC20", "CMC100"]);
    assert_eq!(r.timeline.len(), 721);
    // The late metrics are absent from the first half without dropping rows.
    assert!(r.timeline.first().unwrap().finite("G2025").is_none());
    assert!(r.timeline.latest().unwrap().finite("G2025").is_some());
}

#[tokio::test]
async fn china_profile_buckets_coarse_ranges_and_pins_sse() {
    let source = SyntheticSource::new(anchor());
    let dash = Dashboard::new(Profile::china_stock(), source).with_clock(anchor);
    dash.start().await;
    {
        let state = dash.state();
        assert_eq!(state.range, RangeSpec::Hours24);
        assert_eq!(state.keys.first().map(String::as_str), Some("SSE"));
        assert_eq!(state.view.len(), 25);
    }

    dash.select_range(RangeSpec::Days7).await;
    dash.select_mode(DisplayMode::Percent);
    let mut surface = MemorySurface::new();
    dash.render(&mut surface);

    assert_eq!(dash.state().view.len(), 169);
    assert_eq!(surface.text("stock-range-label"), Some("7D"));
    assert_eq!(surface.text("stock-portfolio-title"), Some("SSE · P1 · P10 · P2"));
    assert!(surface.text("stock-updated").unwrap().starts_with("Last updated: "));
    assert!(surface.html("stock-cards").unwrap().contains("card-primary"));
    let chart = surface.chart("stock-chart").unwrap();
    assert_eq!(chart.series.len(), 4);
}

#[tokio::test]
async fn legacy_csv_export_runs_through_the_same_pipeline() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/legacy_index.csv");
    let source = CsvSource::from_path(path).unwrap();
    assert_eq!(source.len(), 6);

    let profile = Profile::legacy_index();
    let r = load_range(&source, &profile, RangeSpec::All, anchor()).await.unwrap();
    assert_eq!(r.timeline.len(), 3);
    assert_eq!(r.timeline.first().unwrap().finite("Q2025"), Some(1012.5));
    assert_eq!(r.timeline.latest().unwrap().finite("Q2025"), Some(1020.75));
    assert!(r.timeline.first().unwrap().finite("G2025").is_none());
}

#[tokio::test]
async fn empty_result_is_a_load_failure() {
    let source = CsvSource::from_reader("timestamp,q2025\n".as_bytes()).unwrap();
    let err = load_range(&source, &Profile::legacy_index(), RangeSpec::All, anchor()).await.unwrap_err();
    assert!(matches!(err, LoadError::Empty { .. }));

    let dash = Dashboard::new(Profile::legacy_index(), source);
    dash.start().await;
    let mut surface = MemorySurface::new();
    dash.render(&mut surface);
    assert_eq!(surface.text("index-updated"), Some("Load failed: no usable rows in index"));
    assert_eq!(surface.text("index-range-label"), Some("--"));
}

#[test]
fn build_series_is_usable_without_a_source() {
    let rows = mock_vix(anchor(), 3);
    let r = build_series(&rows, &Profile::world_vix().schema, &Profile::world_vix().key_order);
    assert_eq!(r.keys, ["VIX"]);
    assert_eq!(r.timeline.len(), 4);
}

#[test]
fn rest_source_needs_credentials_and_encodes_queries() {
    assert_eq!(RestSource::new(&SourceConfig::new("", "k")).unwrap_err(), ConfigError::MissingUrl);
    assert_eq!(RestSource::new(&SourceConfig::new("https://db.example.com", " ")).unwrap_err(), ConfigError::MissingKey);

    let rest = RestSource::new(&SourceConfig::new("https://db.example.com/", "key")).unwrap();
    let q = Query::new("stock_index")
        .select(["timestamp", "value"])
        .gte("timestamp", "2025-03-01T00:00:00.000Z")
        .page(1000, 0);
    let url = rest.url_for(&q).unwrap();
    assert_eq!(url.path(), "/rest/v1/stock_index");
    assert_eq!(
        url.query(),
        Some("select=timestamp%2Cvalue&timestamp=gte.2025-03-01T00%3A00%3A00.000Z&limit=1000&offset=0")
    );
}
