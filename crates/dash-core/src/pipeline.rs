// File: crates/dash-core/src/pipeline.rs
// Summary: Parameterized load pipeline: paged fetch, row cleaning, reshaping and key ordering.

use chrono::{DateTime, Utc};

use crate::clean::{clean_rows, RowSchema};
use crate::config::Profile;
use crate::error::LoadError;
use crate::range::RangeSpec;
use crate::source::{fetch_all_pages, DataSource};
use crate::timeline::{reshape, KeyOrder, Reshaped};
use crate::types::RawRow;

/// Clean and reshape raw rows, then order the discovered keys.
pub fn build_series(rows: &[RawRow], schema: &RowSchema, key_order: &KeyOrder) -> Reshaped {
    let (observations, rejected) = clean_rows(rows, schema);
    if rejected > 0 {
        tracing::debug!(rejected, total = rows.len(), "dropped malformed rows");
    }
    let mut reshaped = reshape(&observations);
    key_order.apply(&mut reshaped.keys);
    reshaped
}

/// Load the rows backing `range` and turn them into a timeline.
///
/// An empty timeline after cleaning is a load failure, not an empty chart.
pub async fn load_range<S>(source: &S, profile: &Profile, range: RangeSpec, now: DateTime<Utc>) -> Result<Reshaped, LoadError>
where
    S: DataSource + ?Sized,
{
    let query = profile.query_for(range, now);
    let rows = fetch_all_pages(source, &query, profile.paging).await?;
    let reshaped = build_series(&rows, &profile.schema, &profile.key_order);
    if reshaped.timeline.is_empty() {
        return Err(LoadError::Empty { table: query.table });
    }
    tracing::info!(
        profile = %profile.name,
        range = %range,
        rows = rows.len(),
        points = reshaped.timeline.len(),
        keys = reshaped.keys.len(),
        "loaded series"
    );
    Ok(reshaped)
}
