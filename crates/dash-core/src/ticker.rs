// File: crates/dash-core/src/ticker.rs
// Summary: Market ticker panel (latest price and 24h change per coin).

use crate::error::LoadError;
use crate::format::{escape_html, format_percent, format_usd_exact, fraction_digits_of};
use crate::normalize::{normalize_value, parse_normalized, parse_number};
use crate::present::Direction;
use crate::source::{fetch_all_pages, DataSource, Query};
use crate::source::synthetic::MARKET_TABLE;
use crate::types::{Paging, RawRow};

const COIN_NAMES: [(&str, &str); 9] = [
    ("BTC", "Bitcoin"),
    ("ETH", "Ethereum"),
    ("SOL", "Solana"),
    ("BNB", "BNB"),
    ("DOGE", "Dogecoin"),
    ("XRP", "XRP"),
    ("ADA", "Cardano"),
    ("ATOM", "Cosmos"),
    ("AVAX", "Avalanche"),
];

/// Display name of a ticker; unknown tickers name themselves.
pub fn coin_name(ticker: &str) -> &str {
    COIN_NAMES
        .iter()
        .find(|(t, _)| t.eq_ignore_ascii_case(ticker))
        .map(|(_, name)| *name)
        .unwrap_or(ticker)
}

#[derive(Clone, Debug, PartialEq)]
pub struct Quote {
    pub ticker: String,
    pub name: String,
    pub price: f64,
    /// Fraction digits the source carried for `price`.
    pub price_digits: usize,
    pub change_24h: f64,
}

impl Quote {
    /// `None` for rows with no ticker or a non-finite price or change.
    pub fn from_row(row: &RawRow) -> Option<Self> {
        let ticker = row.get("ticker")?.as_str()?.trim();
        if ticker.is_empty() {
            return None;
        }
        let normalized = normalize_value(row.get("price"));
        let price = parse_normalized(&normalized);
        let change_24h = parse_number(row.get("price_percentage_change_24h"));
        if !price.is_finite() || !change_24h.is_finite() {
            return None;
        }
        Some(Self {
            ticker: ticker.to_string(),
            name: coin_name(ticker).to_string(),
            price,
            price_digits: fraction_digits_of(&normalized),
            change_24h,
        })
    }
}

pub fn market_query() -> Query {
    Query::new(MARKET_TABLE).select(["ticker", "price", "price_percentage_change_24h"])
}

pub async fn load_quotes<S>(source: &S, paging: Paging) -> Result<Vec<Quote>, LoadError>
where
    S: DataSource + ?Sized,
{
    let rows = fetch_all_pages(source, &market_query(), paging).await?;
    let quotes: Vec<Quote> = rows.iter().filter_map(Quote::from_row).collect();
    if quotes.is_empty() {
        return Err(LoadError::Empty { table: MARKET_TABLE.to_string() });
    }
    Ok(quotes)
}

pub fn render_ticker_html(quotes: &[Quote]) -> String {
    quotes
        .iter()
        .map(|q| {
            let dir = Direction::of(q.change_24h).class();
            format!(
                "<div class=\"ticker-card {dir}\"><span class=\"ticker-symbol\">{ticker}</span>\
                 <span class=\"ticker-name\">{name}</span>\
                 <span class=\"ticker-price\">{price}</span>\
                 <span class=\"ticker-change {dir}\">{change}</span></div>",
                ticker = escape_html(&q.ticker),
                name = escape_html(&q.name),
                price = escape_html(&format_usd_exact(q.price, q.price_digits)),
                change = escape_html(&format_percent(q.change_24h)),
            )
        })
        .collect()
}

/// Failure text shown in the ticker slot.
pub fn render_ticker_error(message: &str) -> String {
    format!("<div class=\"ticker-error\">Load failed: {}</div>", escape_html(message))
}
