// File: crates/dash-core/tests/pagination.rs
// Purpose: Sequential paging, short-page termination and the page-count bound.

use std::cell::RefCell;

use async_trait::async_trait;
use dash_core::source::{fetch_all_pages, DataSource, Query};
use dash_core::{FetchError, Paging, RawRow};
use serde_json::json;

/// Serves `total` numbered rows; records every (limit, offset) it is asked for.
struct Numbered {
    total: usize,
    calls: RefCell<Vec<(usize, usize)>>,
}

impl Numbered {
    fn new(total: usize) -> Self {
        Self { total, calls: RefCell::new(Vec::new()) }
    }
}

#[async_trait(?Send)]
impl DataSource for Numbered {
    async fn fetch(&self, query: &Query) -> Result<Vec<RawRow>, FetchError> {
        let limit = query.limit.unwrap_or(usize::MAX);
        let offset = query.offset.unwrap_or(0);
        self.calls.borrow_mut().push((limit, offset));
        Ok((offset..self.total.min(offset.saturating_add(limit)))
            .map(|i| {
                let mut row = RawRow::new();
                row.insert("n".into(), json!(i));
                row
            })
            .collect())
    }
}

#[tokio::test]
async fn fifty_pages_with_short_last_page() {
    let paging = Paging::new(10, 50);
    let source = Numbered::new(49 * 10 + 3);
    let rows = fetch_all_pages(&source, &Query::new("t"), paging).await.expect("fits in 50 pages");
    assert_eq!(rows.len(), 493);
    assert_eq!(rows.last().unwrap()["n"], json!(492));

    let calls = source.calls.borrow();
    assert_eq!(calls.len(), 50);
    assert!(calls.iter().enumerate().all(|(i, &(limit, offset))| limit == 10 && offset == i * 10));
}

#[tokio::test]
async fn never_short_is_an_error_without_partial_rows() {
    let paging = Paging::new(10, 50);
    let source = Numbered::new(10_000);
    let err = fetch_all_pages(&source, &Query::new("t"), paging).await.unwrap_err();
    assert!(matches!(err, FetchError::TooManyPages { max_pages: 50, page_size: 10 }));
    assert!(err.to_string().contains("narrow the query"));
    assert_eq!(source.calls.borrow().len(), 50);
}

#[tokio::test]
async fn exact_multiple_needs_one_empty_page() {
    let source = Numbered::new(20);
    let rows = fetch_all_pages(&source, &Query::new("t"), Paging::new(10, 50)).await.unwrap();
    assert_eq!(rows.len(), 20);
    assert_eq!(source.calls.borrow().len(), 3);
}

#[tokio::test]
async fn errors_propagate_from_any_page() {
    struct Failing;

    #[async_trait(?Send)]
    impl DataSource for Failing {
        async fn fetch(&self, _query: &Query) -> Result<Vec<RawRow>, FetchError> {
            Err(FetchError::Status { status: 503, body: "maintenance".into() })
        }
    }

    let err = fetch_all_pages(&Failing, &Query::new("t"), Paging::default()).await.unwrap_err();
    assert_eq!(err.to_string(), "data source returned 503: maintenance");
}

#[test]
fn query_renders_in_wire_order() {
    let q = Query::new("stock_index")
        .select(["timestamp", "portfolio", "value"])
        .order_by("timestamp")
        .gte("timestamp", "2025-03-01T00:00:00.000Z")
        .page(1000, 2000);
    assert_eq!(
        q.to_string(),
        "stock_index?select=timestamp,portfolio,value&order=timestamp&timestamp=gte.2025-03-01T00:00:00.000Z&limit=1000&offset=2000"
    );
}
