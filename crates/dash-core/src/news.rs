// File: crates/dash-core/src/news.rs
// Summary: World news panel: latest headlines, newest first.

use serde::Deserialize;
use serde_json::Value;

use crate::clean::parse_timestamp_value;
use crate::error::LoadError;
use crate::format::{escape_html, format_datetime};
use crate::source::synthetic::NEWS_TABLE;
use crate::source::{DataSource, Query};

pub const NEWS_LIMIT: usize = 8;

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NewsItem {
    pub title: Option<String>,
    pub source: Option<String>,
    /// String or epoch number, as the table stores it.
    pub ts: Option<Value>,
    pub link: Option<String>,
}

pub fn news_query() -> Query {
    Query::new(NEWS_TABLE)
        .select(["title", "source", "ts", "link"])
        .order_by_desc("ts")
        .limit(NEWS_LIMIT)
}

/// Latest headlines; an empty list is a valid result.
pub async fn load_news<S>(source: &S) -> Result<Vec<NewsItem>, LoadError>
where
    S: DataSource + ?Sized,
{
    let rows = source.fetch(&news_query()).await?;
    Ok(rows
        .into_iter()
        .filter_map(|row| match serde_json::from_value::<NewsItem>(Value::Object(row)) {
            Ok(item) => Some(item),
            Err(err) => {
                tracing::debug!(error = %err, "skipped news row");
                None
            }
        })
        .collect())
}

fn safe_link(link: Option<&str>) -> &str {
    match link.map(str::trim) {
        Some(l) if l.starts_with("https://") || l.starts_with("http://") => l,
        _ => "#",
    }
}

fn text_or<'a>(value: &'a Option<String>, fallback: &'a str) -> &'a str {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty()).unwrap_or(fallback)
}

pub fn render_news_html(items: &[NewsItem]) -> String {
    if items.is_empty() {
        return "<li class=\"news-empty\">No news yet.</li>".to_string();
    }
    items
        .iter()
        .map(|item| {
            let when = item
                .ts
                .as_ref()
                .and_then(parse_timestamp_value)
                .map(|t| format_datetime(&t))
                .unwrap_or_else(|| "--".to_string());
            format!(
                "<li class=\"news-item\"><a href=\"{href}\" target=\"_blank\" rel=\"noopener\">{title}</a>\
                 <span class=\"news-meta\">{source} · {when}</span></li>",
                href = escape_html(safe_link(item.link.as_deref())),
                title = escape_html(text_or(&item.title, "Untitled")),
                source = escape_html(text_or(&item.source, "Unknown source")),
                when = escape_html(&when),
            )
        })
        .collect()
}
