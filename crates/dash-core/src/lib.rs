// File: crates/dash-core/src/lib.rs
// Summary: Core library entry point; exports the normalization/reshaping pipeline, sources and dashboards.

pub mod types;
pub mod error;
pub mod normalize;
pub mod clean;
pub mod timeline;
pub mod range;
pub mod downsample;
pub mod transform;
pub mod token;
pub mod source;
pub mod config;
pub mod pipeline;
pub mod format;
pub mod theme;
pub mod axis;
pub mod series;
pub mod chart;
pub mod present;
pub mod state;
pub mod dashboard;
pub mod ticker;
pub mod news;
pub mod world;

pub use types::{Insets, Paging, RawRow, SeriesKey};
pub use error::{ConfigError, FetchError, LoadError, ParseModeError, ParseRangeError};
pub use normalize::{normalize_number, normalize_value, parse_number};
pub use clean::{clean_row, clean_rows, FieldPolicy, MetricColumn, Observation, RowLayout, RowSchema};
pub use timeline::{reshape, KeyOrder, Reshaped, TimePoint, Timeline};
pub use range::{filter_by_range, RangeSpec};
pub use downsample::bucket_average;
pub use transform::{project, DisplayMode, Projection};
pub use token::{RequestSequence, RequestToken};
pub use source::{fetch_all_pages, CsvSource, DataSource, Query, RestSource, SyntheticSource};
pub use config::{ElementIds, Profile, RangeSource, SourceConfig, WindowStrategy};
pub use pipeline::{build_series, load_range};
pub use format::{ValueFormat, ValueStyle};
pub use theme::Theme;
pub use chart::ChartOption;
pub use series::{Candle, Series, SeriesType};
pub use present::{MemorySurface, Presentation, Surface, SummaryRow};
pub use state::{DashboardState, Event, Status};
pub use dashboard::Dashboard;
pub use world::{WorldBoard, WorldSnapshot};
