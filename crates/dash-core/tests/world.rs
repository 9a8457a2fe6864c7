// File: crates/dash-core/tests/world.rs
// Purpose: World board panels load together and fail independently; ticker and news rendering.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use dash_core::news::{load_news, render_news_html, NewsItem};
use dash_core::source::{DataSource, Query};
use dash_core::ticker::{coin_name, render_ticker_html, Quote};
use dash_core::world::{clean_candles, symbol_slug, ETF_SYMBOLS, NEWS_ID, TICKER_ID};
use dash_core::{FetchError, MemorySurface, RawRow, SyntheticSource, WorldBoard};
use serde_json::{json, Value};

fn anchor() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap()
}

fn row(v: Value) -> RawRow {
    match v {
        Value::Object(m) => m,
        _ => unreachable!("fixture rows are objects"),
    }
}

/// Synthetic data, except that the listed tables fail.
struct Flaky {
    inner: SyntheticSource,
    failing: &'static [&'static str],
}

#[async_trait(?Send)]
impl DataSource for Flaky {
    async fn fetch(&self, query: &Query) -> Result<Vec<RawRow>, FetchError> {
        if self.failing.contains(&query.table.as_str()) {
            return Err(FetchError::Status { status: 500, body: format!("{} unavailable", query.table) });
        }
        self.inner.fetch(query).await
    }
}

#[tokio::test]
async fn every_panel_renders_from_synthetic_data() {
    let board = WorldBoard::new(SyntheticSource::new(anchor()));
    let snapshot = board.refresh_all(anchor()).await;
    let mut surface = MemorySurface::new();
    board.render(&snapshot, &mut surface);

    for symbol in ETF_SYMBOLS {
        let chart = surface.chart(&format!("etf-chart-{}", symbol_slug(symbol))).expect("candles rendered");
        assert_eq!(chart.series[0].data.len(), 61);
    }
    assert!(surface.chart("vix-chart").is_some());
    assert!(surface.html(TICKER_ID).unwrap().contains("Bitcoin"));
    // The synthetic source carries no headlines.
    assert_eq!(surface.html(NEWS_ID), Some("<li class=\"news-empty\">No news yet.</li>"));
}

#[tokio::test]
async fn failing_panels_do_not_block_the_others() {
    let source = Flaky { inner: SyntheticSource::new(anchor()), failing: &["world_vix", "market_data"] };
    let board = WorldBoard::new(source);
    let snapshot = board.refresh_all(anchor()).await;
    assert!(snapshot.vix.is_err());
    assert!(snapshot.quotes.is_err());
    assert!(snapshot.news.is_ok());
    assert!(snapshot.klines.iter().all(|(_, r)| r.is_ok()));

    let mut surface = MemorySurface::new();
    board.render(&snapshot, &mut surface);
    assert!(surface.chart("vix-chart").is_none());
    assert_eq!(
        surface.text("vix-updated"),
        Some("Load failed: data source returned 500: world_vix unavailable")
    );
    assert!(surface.html(TICKER_ID).unwrap().contains("Load failed"));
    assert!(surface.chart("etf-chart-bip-un-to").is_some());
}

#[test]
fn candles_outside_the_envelope_are_dropped() {
    let rows = vec![
        row(json!({ "ts": "2025-03-02T00:00:00Z", "open": "10", "high": "12", "low": "9", "close": "11" })),
        row(json!({ "ts": "2025-03-01T00:00:00Z", "open": "10", "high": "10.5", "low": "9", "close": "11" })),
        row(json!({ "ts": "2025-03-03T00:00:00Z", "open": "1.234,5", "high": "1.300,0", "low": "1.200,0", "close": "1.250,0" })),
        row(json!({ "ts": "bad", "open": 1, "high": 1, "low": 1, "close": 1 })),
    ];
    let candles = clean_candles(&rows);
    assert_eq!(candles.len(), 2);
    assert_eq!(candles[1].o, 1234.5);
    assert_eq!(candles[0].cell(), [10.0, 11.0, 9.0, 12.0]);
}

#[test]
fn ticker_rows_and_names() {
    assert_eq!(coin_name("ATOM"), "Cosmos");
    assert_eq!(coin_name("PEPE"), "PEPE");

    let quotes: Vec<Quote> = [
        json!({ "ticker": "BTC", "price": "103,140.1", "price_percentage_change_24h": "1.82" }),
        json!({ "ticker": "", "price": "1", "price_percentage_change_24h": "1" }),
        json!({ "ticker": "ETH", "price": "n/a", "price_percentage_change_24h": "1" }),
        json!({ "ticker": "DOGE", "price": "0.161874", "price_percentage_change_24h": "-2.5" }),
    ]
    .into_iter()
    .filter_map(|v| Quote::from_row(&row(v)))
    .collect();
    assert_eq!(quotes.len(), 2);
    assert_eq!(quotes[0].price_digits, 1);

    let html = render_ticker_html(&quotes);
    assert!(html.contains("$103,140.1"));
    assert!(html.contains("$0.161874"));
    assert!(html.contains("+1.82%"));
    assert!(html.contains("<span class=\"ticker-change down\">-2.50%</span>"));
}

#[test]
fn news_items_fall_back_and_escape() {
    let items = vec![
        NewsItem {
            title: Some("Rates <held>".into()),
            source: None,
            ts: Some(json!("2025-03-09T08:00:00Z")),
            link: Some("javascript:alert(1)".into()),
        },
        NewsItem { link: Some("https://news.example.com/a?b=1&c=2".into()), ..Default::default() },
    ];
    let html = render_news_html(&items);
    assert!(html.contains("Rates &lt;held&gt;"));
    assert!(html.contains("Unknown source · 2025-03-09 08:00:00"));
    assert!(html.contains("href=\"#\""));
    assert!(html.contains("href=\"https://news.example.com/a?b=1&amp;c=2\""));
    assert!(html.contains("rel=\"noopener\""));
    assert!(html.contains("Untitled"));
}

#[tokio::test]
async fn news_rows_with_epoch_timestamps_are_kept() {
    struct Headlines;

    #[async_trait(?Send)]
    impl DataSource for Headlines {
        async fn fetch(&self, _query: &Query) -> Result<Vec<RawRow>, FetchError> {
            Ok(vec![
                row(json!({ "title": "Epoch", "source": "Wire", "ts": 1741507200000_i64, "link": "https://a.example" })),
                row(json!({ "title": "Text", "ts": "2025-03-09T07:00:00Z" })),
                row(json!({ "title": "Bad", "ts": true })),
            ])
        }
    }

    let items = load_news(&Headlines).await.unwrap();
    assert_eq!(items.len(), 3);
    let html = render_news_html(&items);
    assert!(html.contains("Wire · 2025-03-09 08:00:00"));
    assert!(html.contains("Unknown source · 2025-03-09 07:00:00"));
    assert!(html.contains("Unknown source · --"));
}
