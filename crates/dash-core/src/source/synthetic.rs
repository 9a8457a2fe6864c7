// File: crates/dash-core/src/source/synthetic.rs
// Summary: Deterministic synthetic data provider (candlesticks, VIX, stock and crypto indices).
// Notes:
// - Selected by configuration only; real sources never fall back to it.
// - All generators are anchored at an injected instant so output is reproducible.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};

use crate::error::FetchError;
use crate::source::{serve_query, DataSource, Filter, Query};
use crate::timeline::bucket_key;
use crate::types::RawRow;

pub const KLINE_TABLE: &str = "world_etf_kline";
pub const VIX_TABLE: &str = "world_vix";
pub const NEWS_TABLE: &str = "world_news";
pub const STOCK_TABLE: &str = "stock_index";
pub const CRYPTO_TABLE: &str = "quant_index";
pub const MARKET_TABLE: &str = "market_data";

const DAYS: i64 = 60;
const HOURS: i64 = 30 * 24;
const PORTFOLIOS: [&str; 4] = ["P1", "SSE", "P10", "P2"];

#[derive(Clone, Debug)]
pub struct SyntheticSource {
    anchor: DateTime<Utc>,
}

impl SyntheticSource {
    pub fn new(anchor: DateTime<Utc>) -> Self {
        Self { anchor }
    }

    pub fn anchor(&self) -> DateTime<Utc> { self.anchor }

    fn rows_for(&self, query: &Query) -> Vec<RawRow> {
        match query.table.as_str() {
            KLINE_TABLE => {
                let symbol = query.filters.iter().find_map(|f| match f {
                    Filter::Eq { field, value } if field == "symbol" => Some(value.as_str()),
                    _ => None,
                });
                symbol.map(|s| mock_kline(self.anchor, s, DAYS)).unwrap_or_default()
            }
            VIX_TABLE => mock_vix(self.anchor, DAYS),
            STOCK_TABLE => mock_stock_index(self.anchor, HOURS),
            CRYPTO_TABLE => mock_crypto_index(self.anchor, HOURS),
            MARKET_TABLE => mock_market(),
            _ => Vec::new(),
        }
    }
}

#[async_trait(?Send)]
impl DataSource for SyntheticSource {
    async fn fetch(&self, query: &Query) -> Result<Vec<RawRow>, FetchError> {
        Ok(serve_query(&self.rows_for(query), query))
    }
}

fn row(value: Value) -> RawRow {
    match value {
        Value::Object(map) => map,
        _ => RawRow::new(),
    }
}

/// Seed derived from the symbol's character codes.
pub fn seed_from(symbol: &str) -> u32 {
    symbol.chars().map(|c| c as u32).sum()
}

fn base_price(symbol: &str) -> f64 {
    match symbol {
        "VDY.TO" => 45.0,
        "XBM.TO" => 30.0,
        "BIP.UN.TO" => 40.0,
        "ZQQ.TO" => 85.0,
        _ => 100.0,
    }
}

/// Daily candles for `days + 1` days ending at `anchor`.
pub fn mock_kline(anchor: DateTime<Utc>, symbol: &str, days: i64) -> Vec<RawRow> {
    let seed = (seed_from(symbol) % 97) as f64;
    let mut price = base_price(symbol);
    let mut out = Vec::with_capacity(days as usize + 1);
    for i in (0..=days).rev() {
        let ts = anchor - Duration::days(i);
        let k = i as f64 + seed;
        let drift = ((k / 6.0).sin() + 1.0) * 0.6;
        let open = price + drift;
        let close = open + ((k / 7.0).cos() - 0.2) * 0.9;
        let high = open.max(close) + 0.8;
        let low = open.min(close) - 0.8;
        out.push(row(json!({
            "symbol": symbol,
            "ts": bucket_key(&ts),
            "open": open,
            "high": high,
            "low": low,
            "close": close,
        })));
        price = close;
    }
    out
}

/// Daily VIX levels for `days + 1` days ending at `anchor`.
pub fn mock_vix(anchor: DateTime<Utc>, days: i64) -> Vec<RawRow> {
    (0..=days)
        .rev()
        .map(|i| {
            let ts = anchor - Duration::days(i);
            let value = 16.0 + (i as f64 / 5.0).sin() * 3.0 + (i % 7) as f64 * 0.2;
            row(json!({ "ts": bucket_key(&ts), "value": value }))
        })
        .collect()
}

/// Hourly long-form portfolio values, one row per (hour, portfolio).
pub fn mock_stock_index(anchor: DateTime<Utc>, hours: i64) -> Vec<RawRow> {
    let mut out = Vec::with_capacity((hours as usize + 1) * PORTFOLIOS.len());
    for h in (0..=hours).rev() {
        let ts = bucket_key(&(anchor - Duration::hours(h)));
        let step = (hours - h) as f64;
        for (j, name) in PORTFOLIOS.iter().enumerate() {
            let jf = j as f64;
            let level = 3000.0 * (1.0 + 0.1 * jf);
            let value = level * (1.0 + 0.02 * ((step + 7.0 * jf) / 24.0).sin()) + step * 0.25 * (jf - 1.0);
            out.push(row(json!({
                "timestamp": ts,
                "portfolio": name,
                // Source exports mix locales; alternate plain and decimal-comma strings.
                "value": if h % 2 == 0 { format!("{value:.2}") } else { format!("{value:.2}").replace('.', ",") },
            })));
        }
    }
    out
}

/// Hourly wide-form crypto composite rows; `g2025`/`b2025` start late.
pub fn mock_crypto_index(anchor: DateTime<Utc>, hours: i64) -> Vec<RawRow> {
    (0..=hours)
        .rev()
        .map(|h| {
            let ts = bucket_key(&(anchor - Duration::hours(h)));
            let step = (hours - h) as f64;
            let wave = (step / 36.0).sin();
            let late = h < hours / 2;
            row(json!({
                "ts": ts,
                "q2025": format!("{:.2}", 1000.0 + step * 0.8 + wave * 25.0),
                "cmc20": format!("{:.2}", 180.0 + wave * 6.0),
                "cmc100": format!("{:.2}", 210.0 + (step / 48.0).cos() * 5.0),
                "g2025": if late { Value::String(format!("{:.2}", 1000.0 + wave * 40.0)) } else { Value::Null },
                "b2025": if late { Value::String(format!("{:.2}", 1000.0 - wave * 15.0)) } else { Value::String(String::new()) },
            }))
        })
        .collect()
}

fn mock_market() -> Vec<RawRow> {
    [
        ("BTC", "103,140.1", "1.82"),
        ("ETH", "3.512,44", "-0.73"),
        ("SOL", "168.2215", "4.10"),
        ("DOGE", "0.161874", "-2.5"),
    ]
    .into_iter()
    .map(|(t, p, c)| row(json!({ "ticker": t, "price": p, "price_percentage_change_24h": c })))
    .collect()
}
