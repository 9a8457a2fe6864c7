// File: crates/dash-core/src/series.rs
// Summary: Chart series model for line, area and candlestick data as consumed by the renderer.
// Notes:
// - Line cells are `[timestamp, value|null]` pairs; null marks a missing value.
// - Candlestick cells use the renderer's `[open, close, low, high]` order.

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesType {
    Line,
    Candlestick,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candle {
    pub time: DateTime<Utc>,
    pub o: f64,
    pub h: f64,
    pub l: f64,
    pub c: f64,
}

impl Candle {
    /// Try to construct a candle enforcing OHLC invariants:
    /// all finite, l <= min(o,c) and h >= max(o,c), and l <= h.
    pub fn try_new(time: DateTime<Utc>, o: f64, h: f64, l: f64, c: f64) -> Result<Self, &'static str> {
        if ![o, h, l, c].iter().all(|v| v.is_finite()) { return Err("non-finite price"); }
        let lo = o.min(c);
        let hi = o.max(c);
        if l > lo { return Err("low above min(open,close)"); }
        if h < hi { return Err("high below max(open,close)"); }
        if l > h { return Err("low above high"); }
        Ok(Self { time, o, h, l, c })
    }

    /// Renderer cell order.
    pub fn cell(&self) -> [f64; 4] {
        [self.o, self.c, self.l, self.h]
    }
}

/// One datum of a series.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Point(String, Option<f64>),
    Ohlc([f64; 4]),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Falling-candle color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color0: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaStyle {
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub name: String,
    #[serde(rename = "type")]
    pub series_type: SeriesType,
    pub data: Vec<Cell>,
    pub show_symbol: bool,
    pub smooth: bool,
    /// Keep drawing across null cells instead of breaking the line.
    pub connect_nulls: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_style: Option<ItemStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_style: Option<AreaStyle>,
}

impl Series {
    pub fn line(name: impl Into<String>, data: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            series_type: SeriesType::Line,
            data,
            show_symbol: false,
            smooth: false,
            connect_nulls: true,
            item_style: None,
            area_style: None,
        }
    }

    pub fn from_candles(name: impl Into<String>, candles: &[Candle]) -> Self {
        Self {
            name: name.into(),
            series_type: SeriesType::Candlestick,
            data: candles.iter().map(|c| Cell::Ohlc(c.cell())).collect(),
            show_symbol: false,
            smooth: false,
            connect_nulls: false,
            item_style: None,
            area_style: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        let style = self.item_style.get_or_insert(ItemStyle { color: None, color0: None });
        style.color = Some(color.into());
        self
    }

    /// Up/down colors of a candlestick series.
    pub fn with_candle_colors(mut self, up: impl Into<String>, down: impl Into<String>) -> Self {
        self.item_style = Some(ItemStyle { color: Some(up.into()), color0: Some(down.into()) });
        self
    }

    pub fn with_area(mut self, color: impl Into<String>) -> Self {
        self.area_style = Some(AreaStyle { color: color.into() });
        self
    }

    pub fn smoothed(mut self) -> Self {
        self.smooth = true;
        self
    }
}
