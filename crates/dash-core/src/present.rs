// File: crates/dash-core/src/present.rs
// Summary: Presentation assembler: chart option, summary rows, HTML fragments and status text.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::chart::{ChartOption, LineStyle};
use crate::config::{ElementIds, Profile};
use crate::format::{escape_html, format_datetime, format_percent, format_value, ValueFormat, ValueStyle};
use crate::state::{DashboardState, Status};
use crate::theme::Theme;
use crate::timeline::Timeline;
use crate::transform::{percent_change, project, DisplayMode};
use crate::types::SeriesKey;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn of(delta: f64) -> Self {
        if delta >= 0.0 { Direction::Up } else { Direction::Down }
    }

    pub const fn class(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

/// First vs last finite value of one key in the visible window.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SummaryRow {
    pub key: SeriesKey,
    pub first: f64,
    pub last: f64,
    pub delta: f64,
    /// `None` when the first value is zero.
    pub pct: Option<f64>,
    pub direction: Direction,
}

/// One row per key that has at least one finite value in `view`.
pub fn summarize(view: &Timeline, keys: &[SeriesKey]) -> Vec<SummaryRow> {
    keys.iter()
        .filter_map(|key| {
            let first = view.first_finite(key)?;
            let last = view.last_finite(key)?;
            let delta = last - first;
            Some(SummaryRow {
                key: key.clone(),
                first,
                last,
                delta,
                pct: percent_change(last, first),
                direction: Direction::of(delta),
            })
        })
        .collect()
}

fn signed_value(delta: f64, style: ValueStyle) -> String {
    let body = format_value(delta.abs(), style, DisplayMode::Absolute);
    if delta < 0.0 { format!("-{body}") } else { format!("+{body}") }
}

fn pct_text(pct: Option<f64>) -> String {
    pct.map(format_percent).unwrap_or_else(|| "n/a".to_string())
}

/// Highlights list: last value, signed delta and percent badge per key, then
/// a data-point footer.
pub fn render_highlights_html(rows: &[SummaryRow], style: ValueStyle, points: usize) -> String {
    let mut html = String::new();
    for row in rows {
        html.push_str(&format!(
            "<li class=\"highlight {dir}\"><span class=\"key\">{key}</span>\
             <span class=\"value\">{value}</span>\
             <span class=\"delta\">{delta}</span>\
             <span class=\"badge {dir}\">{pct}</span></li>",
            dir = row.direction.class(),
            key = escape_html(&row.key),
            value = escape_html(&format_value(row.last, style, DisplayMode::Absolute)),
            delta = escape_html(&signed_value(row.delta, style)),
            pct = escape_html(&pct_text(row.pct)),
        ));
    }
    html.push_str(&format!("<li class=\"highlight-footer\">Data points: {points}</li>"));
    html
}

/// Per-key cards; percent mode leads with the percent change.
pub fn render_cards_html(rows: &[SummaryRow], style: ValueStyle, mode: DisplayMode) -> String {
    rows.iter()
        .map(|row| {
            let absolute = format_value(row.last, style, DisplayMode::Absolute);
            let pct = pct_text(row.pct);
            let (primary, secondary) = match mode {
                DisplayMode::Percent => (pct, absolute),
                DisplayMode::Absolute => (absolute, pct),
            };
            format!(
                "<div class=\"card {dir}\"><div class=\"card-title\">{key}</div>\
                 <div class=\"card-primary\">{primary}</div>\
                 <div class=\"card-secondary\">{secondary}</div></div>",
                dir = row.direction.class(),
                key = escape_html(&row.key),
                primary = escape_html(&primary),
                secondary = escape_html(&secondary),
            )
        })
        .collect()
}

/// Keys joined by ` · `, or `default` when there are none.
pub fn title_for(keys: &[SeriesKey], default: &str) -> String {
    if keys.is_empty() { default.to_string() } else { keys.join(" · ") }
}

pub fn status_text(status: &Status) -> String {
    match status {
        Status::Idle => String::new(),
        Status::Loading => "Loading…".to_string(),
        Status::Updated(at) => format!("Last updated: {} UTC", format_datetime(at)),
        Status::Failed(message) => format!("Load failed: {message}"),
    }
}

/// Sink for rendered output, addressed by element id.
pub trait Surface {
    fn set_text(&mut self, id: &str, text: &str);
    fn set_html(&mut self, id: &str, html: &str);
    fn set_chart(&mut self, id: &str, option: &ChartOption);
}

/// Surface that keeps everything it is given, keyed by element id.
#[derive(Clone, Debug, Default)]
pub struct MemorySurface {
    pub text: BTreeMap<String, String>,
    pub html: BTreeMap<String, String>,
    pub charts: BTreeMap<String, ChartOption>,
}

impl MemorySurface {
    pub fn new() -> Self { Self::default() }

    pub fn text(&self, id: &str) -> Option<&str> { self.text.get(id).map(String::as_str) }

    pub fn html(&self, id: &str) -> Option<&str> { self.html.get(id).map(String::as_str) }

    pub fn chart(&self, id: &str) -> Option<&ChartOption> { self.charts.get(id) }
}

impl Surface for MemorySurface {
    fn set_text(&mut self, id: &str, text: &str) {
        self.text.insert(id.to_string(), text.to_string());
    }

    fn set_html(&mut self, id: &str, html: &str) {
        self.html.insert(id.to_string(), html.to_string());
    }

    fn set_chart(&mut self, id: &str, option: &ChartOption) {
        self.charts.insert(id.to_string(), option.clone());
    }
}

/// Everything one dashboard writes for one render.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    pub chart: ChartOption,
    pub summary: Vec<SummaryRow>,
    pub highlights_html: String,
    pub cards_html: Option<String>,
    pub title: Option<String>,
    pub updated: String,
    pub range_label: String,
}

impl Presentation {
    pub fn assemble(state: &DashboardState, profile: &Profile, theme: &Theme) -> Self {
        let projection = project(&state.view, &state.raw, &state.keys, state.mode);
        let style = LineStyle {
            time_axis: profile.time_axis,
            format: ValueFormat::for_mode(profile.value_style, state.mode),
            colors: &profile.colors,
            theme,
            insets: Default::default(),
        };
        let chart = ChartOption::line(&projection, &style);
        let summary = summarize(&state.view, &state.keys);
        let highlights_html = render_highlights_html(&summary, profile.value_style, state.view.len());
        let cards_html = profile
            .ids
            .cards
            .as_ref()
            .map(|_| render_cards_html(&summary, profile.value_style, state.mode));
        let title = profile.ids.title.as_ref().map(|_| title_for(&state.keys, &profile.title));
        let range_label = match state.status {
            Status::Failed(_) => "--".to_string(),
            _ => state.range.label().to_string(),
        };

        Self {
            chart,
            summary,
            highlights_html,
            cards_html,
            title,
            updated: status_text(&state.status),
            range_label,
        }
    }

    pub fn render_into(&self, ids: &ElementIds, surface: &mut dyn Surface) {
        surface.set_chart(&ids.chart, &self.chart);
        surface.set_text(&ids.updated, &self.updated);
        surface.set_text(&ids.range_label, &self.range_label);
        surface.set_html(&ids.highlights, &self.highlights_html);
        if let (Some(id), Some(html)) = (&ids.cards, &self.cards_html) {
            surface.set_html(id, html);
        }
        if let (Some(id), Some(title)) = (&ids.title, &self.title) {
            surface.set_text(id, title);
        }
    }
}
