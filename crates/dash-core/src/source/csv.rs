// File: crates/dash-core/src/source/csv.rs
// Summary: CSV-backed data source for legacy index exports.

use std::io::Read;
use std::path::Path;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::FetchError;
use crate::source::{serve_query, DataSource, Query};
use crate::types::RawRow;

/// Headered CSV loaded into memory; every cell becomes a string field.
#[derive(Clone, Debug, Default)]
pub struct CsvSource {
    rows: Vec<RawRow>,
}

impl CsvSource {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FetchError> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::from_reader(file)
    }

    /// Records may be shorter than the header; missing cells are absent fields.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, FetchError> {
        let mut rdr = ::csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(::csv::Trim::Headers)
            .from_reader(reader);

        let headers = rdr.headers()?.iter().map(str::to_string).collect::<Vec<_>>();
        let mut rows = Vec::new();
        for rec in rdr.records() {
            let rec = rec?;
            let row: RawRow = headers
                .iter()
                .zip(rec.iter())
                .map(|(h, cell)| (h.clone(), Value::String(cell.to_string())))
                .collect();
            rows.push(row);
        }
        tracing::debug!(rows = rows.len(), columns = headers.len(), "loaded csv");
        Ok(Self { rows })
    }

    pub fn len(&self) -> usize { self.rows.len() }

    pub fn is_empty(&self) -> bool { self.rows.is_empty() }
}

#[async_trait(?Send)]
impl DataSource for CsvSource {
    /// The table name is ignored: a CSV file holds exactly one table.
    async fn fetch(&self, query: &Query) -> Result<Vec<RawRow>, FetchError> {
        Ok(serve_query(&self.rows, query))
    }
}
