// File: crates/dash-core/src/range.rs
// Summary: Selectable time ranges and the trailing-window range filter.

use std::fmt;
use std::str::FromStr;

use chrono::Duration;

use crate::error::ParseRangeError;
use crate::timeline::Timeline;

/// User-selectable range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RangeSpec {
    #[default]
    All,
    Days30,
    Days7,
    Hours72,
    Hours24,
}

impl RangeSpec {
    pub const ALL_RANGES: [RangeSpec; 5] =
        [RangeSpec::All, RangeSpec::Days30, RangeSpec::Days7, RangeSpec::Hours72, RangeSpec::Hours24];

    /// Trailing window in hours; `None` means unfiltered.
    pub const fn window_hours(self) -> Option<i64> {
        match self {
            RangeSpec::All => None,
            RangeSpec::Days30 => Some(30 * 24),
            RangeSpec::Days7 => Some(7 * 24),
            RangeSpec::Hours72 => Some(72),
            RangeSpec::Hours24 => Some(24),
        }
    }

    pub fn window(self) -> Option<Duration> {
        self.window_hours().map(Duration::hours)
    }

    /// Short identifier used in queries and element ids.
    pub const fn id(self) -> &'static str {
        match self {
            RangeSpec::All => "all",
            RangeSpec::Days30 => "30d",
            RangeSpec::Days7 => "7d",
            RangeSpec::Hours72 => "72h",
            RangeSpec::Hours24 => "24h",
        }
    }

    /// Label shown next to the chart.
    pub const fn label(self) -> &'static str {
        match self {
            RangeSpec::All => "ALL",
            RangeSpec::Days30 => "30D",
            RangeSpec::Days7 => "7D",
            RangeSpec::Hours72 => "72H",
            RangeSpec::Hours24 => "24H",
        }
    }
}

impl fmt::Display for RangeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for RangeSpec {
    type Err = ParseRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        RangeSpec::ALL_RANGES
            .into_iter()
            .find(|r| r.id().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseRangeError(s.to_string()))
    }
}

/// Keep the points at or after `latest - window`. Ranges without a window
/// and empty timelines come back unchanged.
pub fn filter_by_range(timeline: &Timeline, range: RangeSpec) -> Timeline {
    let (Some(window), Some(latest)) = (range.window(), timeline.latest()) else {
        return timeline.clone();
    };
    let Some(cutoff) = latest.time.checked_sub_signed(window) else {
        return timeline.clone();
    };
    Timeline {
        points: timeline
            .points
            .iter()
            .filter(|p| p.time >= cutoff)
            .cloned()
            .collect(),
    }
}
