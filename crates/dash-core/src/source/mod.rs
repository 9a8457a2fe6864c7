// File: crates/dash-core/src/source/mod.rs
// Summary: Data source abstraction, REST-style query model and the paginated fetch.

pub mod csv;
pub mod rest;
pub mod synthetic;

use std::cmp::Ordering;
use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::clean::parse_timestamp_value;
use crate::error::FetchError;
use crate::types::{Paging, RawRow};

pub use self::csv::CsvSource;
pub use self::rest::RestSource;
pub use self::synthetic::SyntheticSource;

/// Row filter in `{field}={op}.{value}` form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Filter {
    Gte { field: String, value: String },
    Eq { field: String, value: String },
}

impl Filter {
    fn pair(&self) -> (String, String) {
        match self {
            Filter::Gte { field, value } => (field.clone(), format!("gte.{value}")),
            Filter::Eq { field, value } => (field.clone(), format!("eq.{value}")),
        }
    }

    fn matches(&self, row: &RawRow) -> bool {
        match self {
            Filter::Eq { field, value } => row.get(field).map(value_text).as_deref() == Some(value.as_str()),
            Filter::Gte { field, value } => {
                let Some(have) = row.get(field) else { return false };
                compare_values(have, &Value::String(value.clone())) != Ordering::Less
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Order {
    pub field: String,
    pub descending: bool,
}

/// One read against a table: `{table}?select=..&order=..[&filters][&limit&offset]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Query {
    pub table: String,
    pub select: Vec<String>,
    pub order: Option<Order>,
    pub filters: Vec<Filter>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl Query {
    pub fn new(table: impl Into<String>) -> Self {
        Self { table: table.into(), select: Vec::new(), order: None, filters: Vec::new(), limit: None, offset: None }
    }

    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn order_by(mut self, field: impl Into<String>) -> Self {
        self.order = Some(Order { field: field.into(), descending: false });
        self
    }

    pub fn order_by_desc(mut self, field: impl Into<String>) -> Self {
        self.order = Some(Order { field: field.into(), descending: true });
        self
    }

    pub fn gte(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push(Filter::Gte { field: field.into(), value: value.into() });
        self
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push(Filter::Eq { field: field.into(), value: value.into() });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Copy of this query restricted to one page.
    pub fn page(&self, limit: usize, offset: usize) -> Self {
        let mut q = self.clone();
        q.limit = Some(limit);
        q.offset = Some(offset);
        q
    }

    /// Query-string pairs in wire order, not yet url-encoded.
    pub fn pairs(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        if !self.select.is_empty() {
            out.push(("select".to_string(), self.select.join(",")));
        }
        if let Some(order) = &self.order {
            let v = if order.descending { format!("{}.desc", order.field) } else { order.field.clone() };
            out.push(("order".to_string(), v));
        }
        out.extend(self.filters.iter().map(Filter::pair));
        if let Some(limit) = self.limit {
            out.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(offset) = self.offset {
            out.push(("offset".to_string(), offset.to_string()));
        }
        out
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.table)?;
        for (i, (k, v)) in self.pairs().iter().enumerate() {
            write!(f, "{}{k}={v}", if i == 0 { '?' } else { '&' })?;
        }
        Ok(())
    }
}

/// Anything that answers a [`Query`] with rows. Single-threaded by contract.
#[async_trait(?Send)]
pub trait DataSource {
    async fn fetch(&self, query: &Query) -> Result<Vec<RawRow>, FetchError>;
}

#[async_trait(?Send)]
impl<S: DataSource + ?Sized> DataSource for Box<S> {
    async fn fetch(&self, query: &Query) -> Result<Vec<RawRow>, FetchError> {
        (**self).fetch(query).await
    }
}

#[async_trait(?Send)]
impl<S: DataSource + ?Sized> DataSource for std::rc::Rc<S> {
    async fn fetch(&self, query: &Query) -> Result<Vec<RawRow>, FetchError> {
        (**self).fetch(query).await
    }
}

#[async_trait(?Send)]
impl<'a, S: DataSource + ?Sized> DataSource for &'a S {
    async fn fetch(&self, query: &Query) -> Result<Vec<RawRow>, FetchError> {
        (**self).fetch(query).await
    }
}

/// Fetch every row of `base`, one page at a time.
///
/// Pages are requested strictly in sequence and the first short page ends the
/// scan. Running past `paging.max_pages` is an error; partial results are
/// never returned.
pub async fn fetch_all_pages<S>(source: &S, base: &Query, paging: Paging) -> Result<Vec<RawRow>, FetchError>
where
    S: DataSource + ?Sized,
{
    let page_size = paging.page_size.max(1);
    let mut all = Vec::new();
    for page in 0..paging.max_pages {
        let query = base.page(page_size, page * page_size);
        let chunk = source.fetch(&query).await?;
        let n = chunk.len();
        tracing::debug!(table = %base.table, page, rows = n, "fetched page");
        all.extend(chunk);
        if n < page_size {
            return Ok(all);
        }
    }
    Err(FetchError::TooManyPages { max_pages: paging.max_pages, page_size })
}

/// Answer a query from rows held in memory (filters, order, offset, limit).
pub(crate) fn serve_query(rows: &[RawRow], query: &Query) -> Vec<RawRow> {
    let mut out: Vec<RawRow> = rows
        .iter()
        .filter(|r| query.filters.iter().all(|f| f.matches(r)))
        .cloned()
        .collect();
    if let Some(order) = &query.order {
        out.sort_by(|a, b| {
            let ord = match (a.get(&order.field), b.get(&order.field)) {
                (Some(x), Some(y)) => compare_values(x, y),
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            };
            if order.descending { ord.reverse() } else { ord }
        });
    }
    out.into_iter()
        .skip(query.offset.unwrap_or(0))
        .take(query.limit.unwrap_or(usize::MAX))
        .collect()
}

fn value_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// Timestamps compare as instants, everything else as text.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (parse_timestamp_value(a), parse_timestamp_value(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        _ => value_text(a).cmp(&value_text(b)),
    }
}
