// File: crates/dash-core/src/chart.rs
// Summary: Declarative chart option (legend, grid, axes, tooltip, series) handed to the external renderer.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::axis::Axis;
use crate::format::{format_date_label, ValueFormat};
use crate::series::{Candle, Cell, Series};
use crate::theme::Theme;
use crate::transform::Projection;
use crate::types::Insets;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Legend {
    pub show: bool,
    pub data: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tooltip {
    pub trigger: &'static str,
    pub value_format: ValueFormat,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOption {
    pub background_color: String,
    pub legend: Legend,
    pub grid: Insets,
    pub tooltip: Tooltip,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub series: Vec<Series>,
}

/// Presentation knobs for a multi-series line chart.
#[derive(Clone, Debug)]
pub struct LineStyle<'a> {
    pub time_axis: bool,
    pub format: ValueFormat,
    /// Fixed colors per key; keys without one take the theme palette.
    pub colors: &'a BTreeMap<String, String>,
    pub theme: &'a Theme,
    pub insets: Insets,
}

impl ChartOption {
    fn new(theme: &Theme, x_axis: Axis, y_axis: Axis, format: ValueFormat, series: Vec<Series>) -> Self {
        let names: Vec<String> = series.iter().map(|s| s.name.clone()).collect();
        Self {
            background_color: theme.background.to_string(),
            legend: Legend { show: names.len() > 1, data: names },
            grid: Insets::default(),
            tooltip: Tooltip { trigger: "axis", value_format: format },
            x_axis,
            y_axis,
            series,
        }
    }

    pub fn with_grid(mut self, insets: Insets) -> Self {
        self.grid = insets;
        self
    }

    /// One line per key of `projection`, cells `[timestamp, value|null]`.
    pub fn line(projection: &Projection, style: &LineStyle<'_>) -> Self {
        let series = projection
            .keys
            .iter()
            .enumerate()
            .map(|(i, key)| {
                let data = projection
                    .points
                    .iter()
                    .zip(projection.column(i))
                    .map(|(p, cell)| Cell::Point(p.timestamp.clone(), cell))
                    .collect();
                let color = style
                    .colors
                    .get(key)
                    .cloned()
                    .unwrap_or_else(|| style.theme.series_color(i).to_string());
                Series::line(key.clone(), data).with_color(color)
            })
            .collect();

        let x_axis = if style.time_axis {
            Axis::time()
        } else {
            Axis::category(projection.points.iter().map(|p| p.timestamp.clone()).collect())
        };
        Self::new(style.theme, x_axis, Axis::value(style.format), style.format, series).with_grid(style.insets)
    }

    /// Daily candlesticks on a `M/D` category axis.
    pub fn candlestick(symbol: &str, candles: &[Candle], theme: &Theme) -> Self {
        let labels = candles.iter().map(|c| format_date_label(&c.time)).collect();
        let series = Series::from_candles(symbol, candles).with_candle_colors(theme.candle_up, theme.candle_down);
        let format = ValueFormat::Fixed { digits: 2 };
        Self::new(theme, Axis::category(labels).with_boundary_gap(), Axis::value(format), format, vec![series])
    }

    /// Single filled area line with one-decimal labels.
    pub fn area(projection: &Projection, color: &str, theme: &Theme) -> Self {
        let format = ValueFormat::Fixed { digits: 1 };
        let labels: Vec<String> = projection.points.iter().map(|p| format_date_label(&p.time)).collect();
        let series = projection
            .keys
            .iter()
            .enumerate()
            .map(|(i, key)| {
                let data = labels
                    .iter()
                    .zip(projection.column(i))
                    .map(|(label, cell)| Cell::Point(label.clone(), cell))
                    .collect();
                Series::line(key.clone(), data).with_color(color).with_area(theme.area_fill).smoothed()
            })
            .collect();
        Self::new(theme, Axis::category(labels), Axis::value(format), format, series)
    }
}
