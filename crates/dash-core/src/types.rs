// File: crates/dash-core/src/types.rs
// Summary: Shared types and constants (raw rows, paging limits, chart grid insets).

use serde::Serialize;
use serde_json::{Map, Value};

/// One untyped record as returned by the data source.
pub type RawRow = Map<String, Value>;

/// Identifier of one plotted series (portfolio, metric or ticker).
pub type SeriesKey = String;

/// Rows requested per page by the paginated fetch.
pub const DEFAULT_PAGE_SIZE: usize = 1000;
/// Upper bound on pages per query; exceeding it is a hard error.
pub const MAX_PAGES: usize = 50;
/// Width of one aggregation bucket, in hours.
pub const BUCKET_HOURS: i64 = 1;

/// Page size and page-count bound for one paginated query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Paging {
    pub page_size: usize,
    pub max_pages: usize,
}

impl Paging {
    pub const fn new(page_size: usize, max_pages: usize) -> Self {
        Self { page_size, max_pages }
    }
}

impl Default for Paging {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, MAX_PAGES)
    }
}

/// Chart grid margins, in pixels, as consumed by the chart renderer.
/// Contract: all fields are non-negative.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Insets {
    pub top: u32,
    pub left: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Insets {
    /// Create new insets (non-negative by type).
    pub const fn new(top: u32, left: u32, right: u32, bottom: u32) -> Self {
        Self { top, left, right, bottom }
    }
}

impl Default for Insets {
    fn default() -> Self {
        Self::new(64, 56, 32, 48)
    }
}
