// File: crates/dash-core/src/world.rs
// Summary: World board: ETF candlesticks, VIX area chart, market ticker and news, loaded side by side.
// Notes:
// - Panels load concurrently on one thread and fail independently; each
//   failure lands in its own status slot.

use chrono::{DateTime, Utc};
use futures::future::join_all;

use crate::chart::ChartOption;
use crate::clean::parse_timestamp_value;
use crate::config::Profile;
use crate::error::LoadError;
use crate::format::escape_html;
use crate::news::{load_news, render_news_html, NewsItem};
use crate::normalize::parse_number;
use crate::pipeline::load_range;
use crate::present::{status_text, Surface};
use crate::range::RangeSpec;
use crate::series::Candle;
use crate::source::synthetic::KLINE_TABLE;
use crate::source::{fetch_all_pages, DataSource, Query};
use crate::state::Status;
use crate::theme::Theme;
use crate::ticker::{load_quotes, render_ticker_error, render_ticker_html, Quote};
use crate::timeline::Reshaped;
use crate::transform::{project, DisplayMode};
use crate::types::{Paging, RawRow};

pub const ETF_SYMBOLS: [&str; 4] = ["VDY.TO", "XBM.TO", "BIP.UN.TO", "ZQQ.TO"];

pub const TICKER_ID: &str = "market-ticker";
pub const NEWS_ID: &str = "world-news";

/// Element-id fragment of a symbol (`BIP.UN.TO` -> `bip-un-to`).
pub fn symbol_slug(symbol: &str) -> String {
    symbol
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect()
}

pub fn kline_query(symbol: &str) -> Query {
    Query::new(KLINE_TABLE)
        .select(["ts", "open", "high", "low", "close"])
        .eq("symbol", symbol)
        .order_by("ts")
}

/// Rows that fail timestamp parsing or the OHLC envelope are dropped.
pub fn clean_candles(rows: &[RawRow]) -> Vec<Candle> {
    let mut candles: Vec<Candle> = rows
        .iter()
        .filter_map(|row| {
            let time = row.get("ts").and_then(parse_timestamp_value)?;
            let [o, h, l, c] = ["open", "high", "low", "close"].map(|f| parse_number(row.get(f)));
            Candle::try_new(time, o, h, l, c).ok()
        })
        .collect();
    candles.sort_by(|a, b| a.time.cmp(&b.time));
    candles
}

pub async fn load_kline<S>(source: &S, symbol: &str, paging: Paging) -> Result<Vec<Candle>, LoadError>
where
    S: DataSource + ?Sized,
{
    let rows = fetch_all_pages(source, &kline_query(symbol), paging).await?;
    let candles = clean_candles(&rows);
    if candles.is_empty() {
        return Err(LoadError::Empty { table: format!("{KLINE_TABLE} ({symbol})") });
    }
    Ok(candles)
}

/// Outcome of one board refresh, one result per panel.
#[derive(Debug)]
pub struct WorldSnapshot {
    pub quotes: Result<Vec<Quote>, LoadError>,
    pub vix: Result<Reshaped, LoadError>,
    pub news: Result<Vec<NewsItem>, LoadError>,
    pub klines: Vec<(String, Result<Vec<Candle>, LoadError>)>,
    pub at: DateTime<Utc>,
}

pub struct WorldBoard<S> {
    source: S,
    vix: Profile,
    theme: Theme,
    paging: Paging,
}

impl<S: DataSource> WorldBoard<S> {
    pub fn new(source: S) -> Self {
        Self { source, vix: Profile::world_vix(), theme: Theme::default(), paging: Paging::default() }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_paging(mut self, paging: Paging) -> Self {
        self.paging = paging;
        self.vix.paging = paging;
        self
    }

    pub fn source(&self) -> &S { &self.source }

    /// Load every panel concurrently.
    pub async fn refresh_all(&self, now: DateTime<Utc>) -> WorldSnapshot {
        let klines = join_all(ETF_SYMBOLS.iter().map(|&symbol| async move {
            (symbol.to_string(), load_kline(&self.source, symbol, self.paging).await)
        }));
        let (quotes, vix, news, klines) = futures::join!(
            load_quotes(&self.source, self.paging),
            load_range(&self.source, &self.vix, RangeSpec::All, now),
            load_news(&self.source),
            klines,
        );

        let failed = [quotes.is_err(), vix.is_err(), news.is_err()]
            .into_iter()
            .chain(klines.iter().map(|(_, r)| r.is_err()))
            .filter(|&e| e)
            .count();
        if failed > 0 {
            tracing::warn!(failed, "world panels failed to load");
        }
        WorldSnapshot { quotes, vix, news, klines, at: now }
    }

    pub fn render(&self, snapshot: &WorldSnapshot, surface: &mut dyn Surface) {
        match &snapshot.quotes {
            Ok(quotes) => surface.set_html(TICKER_ID, &render_ticker_html(quotes)),
            Err(err) => surface.set_html(TICKER_ID, &render_ticker_error(&err.to_string())),
        }

        let ids = &self.vix.ids;
        match &snapshot.vix {
            Ok(reshaped) => {
                let projection = project(&reshaped.timeline, &reshaped.timeline, &reshaped.keys, DisplayMode::Absolute);
                let color = self.vix.colors.get("VIX").map(String::as_str).unwrap_or(self.theme.series_color(0));
                surface.set_chart(&ids.chart, &ChartOption::area(&projection, color, &self.theme));
                surface.set_text(&ids.updated, &status_text(&Status::Updated(snapshot.at)));
            }
            Err(err) => surface.set_text(&ids.updated, &status_text(&Status::Failed(err.to_string()))),
        }

        match &snapshot.news {
            Ok(items) => surface.set_html(NEWS_ID, &render_news_html(items)),
            Err(err) => surface.set_html(
                NEWS_ID,
                &format!("<li class=\"news-error\">Load failed: {}</li>", escape_html(&err.to_string())),
            ),
        }

        for (symbol, result) in &snapshot.klines {
            let slug = symbol_slug(symbol);
            let status_id = format!("etf-status-{slug}");
            match result {
                Ok(candles) => {
                    surface.set_chart(&format!("etf-chart-{slug}"), &ChartOption::candlestick(symbol, candles, &self.theme));
                    surface.set_text(&status_id, &status_text(&Status::Updated(snapshot.at)));
                }
                Err(err) => surface.set_text(&status_id, &status_text(&Status::Failed(err.to_string()))),
            }
        }
    }
}
