// File: crates/dash-core/src/config.rs
// Summary: Source credentials and per-dashboard pipeline profiles (the parameterized variants).

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, SecondsFormat, Utc};

use crate::clean::{MetricColumn, RowSchema};
use crate::error::ConfigError;
use crate::format::ValueStyle;
use crate::range::RangeSpec;
use crate::source::Query;
use crate::timeline::KeyOrder;
use crate::types::{Paging, BUCKET_HOURS};

/// Credentials for the REST source. Injected by the host, never embedded.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceConfig {
    pub base_url: String,
    pub api_key: String,
}

impl SourceConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), api_key: api_key.into() }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::MissingUrl);
        }
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingKey);
        }
        Ok(())
    }
}

/// How a range change reaches the data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WindowStrategy {
    /// Fetch the full series once; ranges filter locally.
    #[default]
    ClientFilter,
    /// Reload on every range change with a `gte` cutoff on the order field.
    ServerCutoff,
}

/// Backing table of one range and an optional client-side bucket width.
#[derive(Clone, Debug, PartialEq)]
pub struct RangeSource {
    pub table: String,
    pub bucket: Option<Duration>,
}

impl RangeSource {
    pub fn raw(table: impl Into<String>) -> Self {
        Self { table: table.into(), bucket: None }
    }

    pub fn hourly(table: impl Into<String>) -> Self {
        Self { table: table.into(), bucket: Some(Duration::hours(BUCKET_HOURS)) }
    }
}

/// Element ids the presentation writes into.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementIds {
    pub chart: String,
    pub updated: String,
    pub range_label: String,
    pub highlights: String,
    pub cards: Option<String>,
    pub title: Option<String>,
}

impl ElementIds {
    pub fn with_prefix(prefix: &str) -> Self {
        let id = |name: &str| if prefix.is_empty() { name.to_string() } else { format!("{prefix}-{name}") };
        Self {
            chart: id("chart"),
            updated: id("updated"),
            range_label: id("range-label"),
            highlights: id("highlights"),
            cards: None,
            title: None,
        }
    }
}

/// Everything that distinguishes one dashboard from another.
#[derive(Clone, Debug, PartialEq)]
pub struct Profile {
    pub name: String,
    pub title: String,
    pub schema: RowSchema,
    pub order_field: String,
    pub default_table: String,
    /// Per-range overrides of the backing table / bucket width.
    pub tables: BTreeMap<RangeSpec, RangeSource>,
    pub ranges: Vec<RangeSpec>,
    pub default_range: RangeSpec,
    pub strategy: WindowStrategy,
    pub key_order: KeyOrder,
    pub value_style: ValueStyle,
    /// Fixed colors per key; others come from the theme palette.
    pub colors: BTreeMap<String, String>,
    /// Plot on a time axis instead of a category axis of timestamps.
    pub time_axis: bool,
    pub paging: Paging,
    pub ids: ElementIds,
}

impl Profile {
    /// Backing source for `range`.
    pub fn source_for(&self, range: RangeSpec) -> RangeSource {
        self.tables
            .get(&range)
            .cloned()
            .unwrap_or_else(|| RangeSource::raw(self.default_table.clone()))
    }

    /// Base query (unpaged) that loads `range`.
    ///
    /// Client-filter profiles always load the whole table; server-cutoff
    /// profiles restrict to `now - window`.
    pub fn query_for(&self, range: RangeSpec, now: DateTime<Utc>) -> Query {
        let source = self.source_for(range);
        let mut q = Query::new(source.table)
            .select(self.schema.fields())
            .order_by(self.order_field.clone());
        if self.strategy == WindowStrategy::ServerCutoff {
            if let Some(cutoff) = range.window().and_then(|w| now.checked_sub_signed(w)) {
                q = q.gte(self.order_field.clone(), cutoff.to_rfc3339_opts(SecondsFormat::Millis, true));
            }
        }
        q
    }

    pub fn with_table(mut self, range: RangeSpec, source: RangeSource) -> Self {
        self.tables.insert(range, source);
        self
    }

    pub fn with_paging(mut self, paging: Paging) -> Self {
        self.paging = paging;
        self
    }

    /// Crypto composite indices: wide rows, three strict and two optional metrics.
    pub fn crypto_index() -> Self {
        let metrics = vec![
            MetricColumn::strict("q2025", "Q2025"),
            MetricColumn::optional("g2025", "G2025"),
            MetricColumn::optional("b2025", "B2025"),
            MetricColumn::strict("cmc20", "CMC20"),
            MetricColumn::strict("cmc100", "CMC100"),
        ];
        let declared = metrics.iter().map(|m| m.key.clone()).collect();
        Self {
            name: "crypto-index".into(),
            title: "Crypto Index".into(),
            schema: RowSchema::wide(&["ts", "timestamp"], metrics),
            order_field: "ts".into(),
            default_table: "quant_index".into(),
            tables: BTreeMap::new(),
            ranges: vec![RangeSpec::All, RangeSpec::Hours72],
            default_range: RangeSpec::All,
            strategy: WindowStrategy::ClientFilter,
            key_order: KeyOrder::Declared(declared),
            value_style: ValueStyle::Currency,
            colors: [
                ("Q2025", "#2fb344"),
                ("G2025", "#a855f7"),
                ("B2025", "#0ea5e9"),
                ("CMC20", "#4c6ef5"),
                ("CMC100", "#fa8c16"),
            ]
            .into_iter()
            .map(|(k, c)| (k.to_string(), c.to_string()))
            .collect(),
            time_axis: true,
            paging: Paging::default(),
            ids: ElementIds::with_prefix("index"),
        }
    }

    /// Same composites exported as CSV with space-separated timestamps.
    pub fn legacy_index() -> Self {
        let mut p = Self::crypto_index();
        p.name = "legacy-index".into();
        p.title = "Crypto Index (CSV)".into();
        p.schema.timestamp_fields = vec!["timestamp".into(), "ts".into(), "time".into()];
        p.order_field = "timestamp".into();
        p.default_table = "index".into();
        p
    }

    /// China stock portfolios: long rows keyed by portfolio, reloaded per range.
    pub fn china_stock() -> Self {
        let mut ids = ElementIds::with_prefix("stock");
        ids.cards = Some("stock-cards".into());
        ids.title = Some("stock-portfolio-title".into());
        Self {
            name: "china-stock".into(),
            title: "China Stock Portfolios".into(),
            schema: RowSchema::long(&["timestamp", "ts"], "portfolio", "value").with_placeholder("UNKNOWN"),
            order_field: "timestamp".into(),
            default_table: "stock_index".into(),
            tables: [RangeSpec::Days7, RangeSpec::Days30, RangeSpec::All]
                .into_iter()
                .map(|r| (r, RangeSource::hourly("stock_index")))
                .collect(),
            ranges: RangeSpec::ALL_RANGES.to_vec(),
            default_range: RangeSpec::Hours24,
            strategy: WindowStrategy::ServerCutoff,
            key_order: KeyOrder::Pinned("SSE".into()),
            value_style: ValueStyle::Plain,
            colors: BTreeMap::new(),
            time_axis: false,
            paging: Paging::default(),
            ids,
        }
    }

    /// Single-series volatility index.
    pub fn world_vix() -> Self {
        Self {
            name: "world-vix".into(),
            title: "VIX".into(),
            schema: RowSchema::wide(&["ts"], vec![MetricColumn::strict("value", "VIX")]),
            order_field: "ts".into(),
            default_table: "world_vix".into(),
            tables: BTreeMap::new(),
            ranges: vec![RangeSpec::All],
            default_range: RangeSpec::All,
            strategy: WindowStrategy::ClientFilter,
            key_order: KeyOrder::FirstSeen,
            value_style: ValueStyle::Fixed(1),
            colors: [("VIX".to_string(), "#0f172a".to_string())].into_iter().collect(),
            time_axis: false,
            paging: Paging::default(),
            ids: ElementIds::with_prefix("vix"),
        }
    }

    /// Look a preset up by name.
    pub fn preset(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "crypto-index" | "crypto" | "index" => Some(Self::crypto_index()),
            "legacy-index" | "legacy" | "csv" => Some(Self::legacy_index()),
            "china-stock" | "china" | "stock" => Some(Self::china_stock()),
            "world-vix" | "vix" => Some(Self::world_vix()),
            _ => None,
        }
    }
}
